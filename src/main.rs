//! Command line entry point for the key/value store probe.
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

use std::path::PathBuf;

use argh::FromArgs;
use tracing_subscriber::EnvFilter;

use kvprobe::config::{Config, Output};
use kvprobe::http::HttpRemote;
use kvprobe::record::Recorder;
use kvprobe::workload::Workload;

/// Drive a generated workload against a remote key/value store.
#[derive(Debug, FromArgs)]
pub struct Args {
    /// path to the yaml configuration file
    #[argh(option, short = 'c')]
    pub config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args: Args = argh::from_env();
    init_tracing();

    let config = Config::load(args.config.as_deref())?;
    tracing::debug!(?config);

    let workload = Workload::builder(config.mode).count(config.count).build();
    let remote = HttpRemote::new(&config.base_url);
    let mut recorder = match &config.output {
        Output::Console => Recorder::console(),
        Output::File { path } => Recorder::file(path)?,
    };

    let summary = kvprobe::run(&remote, &workload, &mut recorder)?;
    tracing::info!(records = summary.total_records(), "run complete");

    Ok(())
}

/// Initializes the `tracing` subscriber.
///
/// Diagnostics go to stderr so that records stay clean on stdout when the
/// console sink is in use.
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
