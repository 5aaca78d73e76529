//! A workload-driven probe for remote key/value stores.
//!
//! The probe generates a set of key/value pairs, sweeps them through the
//! store's `/set`, `/get` and `/del` endpoints in strictly sequential
//! phases, and records one response line per request. A retained workload
//! ends with a verification pass that reads every key once more and expects
//! misses.
//!
//! Requests are issued one at a time over blocking I/O, so the recorded
//! `GET` timings reflect individual request latency without interference
//! from concurrent traffic.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod config;
pub mod http;
pub mod probe;
pub mod record;
pub mod workload;

pub use crate::probe::{RunSummary, run};
pub use crate::workload::Workload;
