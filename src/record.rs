//! Response records and the sinks they are written to.
//!
//! Every request produces exactly one [`ResponseRecord`], rendered as a
//! single line:
//!
//! ```text
//! <OPERATION> Response: <status> - <body>[, Elapsed Time: <seconds> seconds]
//! ```
//!
//! The elapsed suffix is only present for timed operations and always
//! carries six decimal places.

use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::time::Duration;

use anyhow::Context;

/// The request kind a record originated from.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Operation {
    /// A store request.
    Set,
    /// A lookup request.
    Get,
    /// A removal request.
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Set => "SET",
            Operation::Get => "GET",
            Operation::Delete => "DELETE",
        };
        f.write_str(name)
    }
}

/// The observed outcome of a single request.
///
/// Non-2xx statuses are data, not errors; the record captures whatever the
/// remote store answered.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ResponseRecord {
    /// The operation that was sent.
    pub operation: Operation,
    /// The key the request targeted. Not part of the rendered line; the
    /// response body already names it.
    pub key: String,
    /// The HTTP status code of the response.
    pub status: u16,
    /// The response body, verbatim.
    pub body: String,
    /// Wall-clock duration of the request, for timed operations.
    pub elapsed: Option<Duration>,
}

impl fmt::Display for ResponseRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Response: {} - {}", self.operation, self.status, self.body)?;
        if let Some(elapsed) = self.elapsed {
            write!(f, ", Elapsed Time: {:.6} seconds", elapsed.as_secs_f64())?;
        }
        Ok(())
    }
}

/// Writes response records to the configured sink, one line per record.
#[derive(Debug)]
pub struct Recorder {
    sink: Sink,
}

#[derive(Debug)]
enum Sink {
    Console(io::Stdout),
    File(BufWriter<File>),
}

impl Recorder {
    /// Creates a recorder writing to standard output.
    pub fn console() -> Self {
        Self {
            sink: Sink::Console(io::stdout()),
        }
    }

    /// Creates a recorder writing to the file at `path`.
    ///
    /// An existing file is truncated; records from earlier runs do not leak
    /// into the new output.
    pub fn file(path: &Path) -> anyhow::Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("failed to create output file `{}`", path.display()))?;
        Ok(Self {
            sink: Sink::File(BufWriter::new(file)),
        })
    }

    /// Appends a single record line to the sink.
    pub fn record(&mut self, record: &ResponseRecord) -> io::Result<()> {
        match &mut self.sink {
            Sink::Console(stdout) => writeln!(stdout, "{record}"),
            Sink::File(file) => writeln!(file, "{record}"),
        }
    }

    /// Flushes buffered records to the underlying sink.
    pub fn flush(&mut self) -> io::Result<()> {
        match &mut self.sink {
            Sink::Console(stdout) => stdout.flush(),
            Sink::File(file) => file.flush(),
        }
    }
}
