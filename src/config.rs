//! Run configuration, loaded from an optional YAML file.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

use crate::workload::Mode;

/// Where response records are written.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Output {
    /// Records go to standard output.
    Console,
    /// Records go to a file, replacing any previous contents.
    File {
        /// The path of the output file.
        #[serde(default = "default_output_path")]
        path: PathBuf,
    },
}

/// Configuration for a probe run.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default)]
pub struct Config {
    /// The number of key/value pairs to generate.
    pub count: usize,
    /// How keys and values are synthesized.
    pub mode: Mode,
    /// The base URL of the remote key/value store.
    pub base_url: String,
    /// Where response records are written.
    pub output: Output,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            count: 1000,
            mode: Mode::Random,
            base_url: "http://localhost:8080".to_owned(),
            output: Output::Console,
        }
    }
}

impl Config {
    /// Loads the configuration from the given YAML file.
    ///
    /// Without a path, and for an empty file, the defaults apply across the
    /// board. Keys missing from the file fall back to their defaults
    /// individually.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file `{}`", path.display()))?;
        if text.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_yaml::from_str(&text)
            .with_context(|| format!("failed to parse config file `{}`", path.display()))
    }
}

fn default_output_path() -> PathBuf {
    PathBuf::from("output.txt")
}
