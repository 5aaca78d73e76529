//! The runner sweeping a workload through the remote store, phase by phase.

use std::fmt;
use std::time::Instant;

use anyhow::Context;

use crate::http::HttpRemote;
use crate::record::Recorder;
use crate::workload::{Mode, Workload};

/// One request phase of a probe run.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Phase {
    /// Stores every workload entry.
    Set,
    /// Reads every key back while it is present.
    Get,
    /// Removes every key.
    Delete,
    /// Reads every key once more after deletion, expecting misses.
    Verify,
}

impl Phase {
    /// The phases a run executes for the given workload mode, in order.
    ///
    /// Sequential workloads recompute their keys per phase, so there is
    /// nothing left to verify once they are deleted. Retained workloads get
    /// a final read pass confirming the deletions took.
    pub fn sequence(mode: Mode) -> &'static [Phase] {
        match mode {
            Mode::Sequential => &[Phase::Set, Phase::Get, Phase::Delete],
            Mode::Random => &[Phase::Set, Phase::Get, Phase::Delete, Phase::Verify],
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Set => "SET",
            Phase::Get => "GET",
            Phase::Delete => "DELETE",
            Phase::Verify => "VERIFY",
        };
        f.write_str(name)
    }
}

/// Bookkeeping for a finished run.
#[derive(Debug, Default)]
pub struct RunSummary {
    /// The number of records produced per executed phase, in order.
    pub phases: Vec<(Phase, u64)>,
}

impl RunSummary {
    /// The total number of records across all phases.
    pub fn total_records(&self) -> u64 {
        self.phases.iter().map(|(_, records)| *records).sum()
    }
}

/// Runs all phases of the workload against the remote store.
///
/// Phases execute strictly back to back; within a phase, requests go out
/// one at a time in workload order. Every response becomes one record in
/// the recorder. A transport failure aborts the run immediately, with the
/// failed operation named in the error context.
pub fn run(
    remote: &HttpRemote,
    workload: &Workload,
    recorder: &mut Recorder,
) -> anyhow::Result<RunSummary> {
    let mut summary = RunSummary::default();
    for &phase in Phase::sequence(workload.mode()) {
        let records = run_phase(phase, remote, workload, recorder)?;
        summary.phases.push((phase, records));
    }
    recorder.flush().context("failed to flush response records")?;

    Ok(summary)
}

fn run_phase(
    phase: Phase,
    remote: &HttpRemote,
    workload: &Workload,
    recorder: &mut Recorder,
) -> anyhow::Result<u64> {
    tracing::info!(phase = %phase, keys = workload.len(), "phase starting");
    let started = Instant::now();

    let mut records = 0;
    for entry in workload.entries() {
        let record = match phase {
            Phase::Set => remote.set(&entry.key, &entry.value)?,
            Phase::Get | Phase::Verify => remote.get(&entry.key)?,
            Phase::Delete => remote.delete(&entry.key)?,
        };
        tracing::debug!(key = %record.key, status = record.status, "{phase}");

        recorder
            .record(&record)
            .context("failed to write response record")?;
        records += 1;
    }

    tracing::info!(
        phase = %phase,
        records,
        elapsed = ?started.elapsed(),
        "phase complete"
    );
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_runs_skip_verification() {
        assert_eq!(
            Phase::sequence(Mode::Sequential),
            [Phase::Set, Phase::Get, Phase::Delete]
        );
    }

    #[test]
    fn retained_runs_end_with_verification() {
        assert_eq!(
            Phase::sequence(Mode::Random),
            [Phase::Set, Phase::Get, Phase::Delete, Phase::Verify]
        );
    }

    #[test]
    fn summary_totals_span_all_phases() {
        let summary = RunSummary {
            phases: vec![(Phase::Set, 3), (Phase::Get, 3), (Phase::Delete, 3)],
        };
        assert_eq!(summary.total_records(), 9);
    }
}
