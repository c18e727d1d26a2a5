//! Run configuration
//!
//! Defaults reproduce the classic run: variable counts 3 then 4, subset
//! sizes 2 and 3, results in `output.txt`, solver `go run main.go`.

use crate::error::ConfigError;
use f2sweep_solver::ExternalSolverConfig;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

/// Configuration for a full run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Variable counts to check, in order
    pub variable_counts: Vec<usize>,

    /// Smallest subset size (inclusive)
    pub min_subset: usize,

    /// Largest subset size (inclusive)
    pub max_subset: usize,

    /// Result log path, truncated at the start of the run
    pub output: PathBuf,

    /// Solver to run for each candidate
    pub solver: ExternalSolverConfig,

    /// Maximum candidates per (n, subset size), no limit if None
    pub limit: Option<u64>,

    /// Mark invocation failures in the result log
    pub annotate_failures: bool,

    /// Where to write the JSON run summary, if anywhere
    pub summary: Option<PathBuf>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            variable_counts: vec![3, 4],
            min_subset: 2,
            max_subset: 3,
            output: PathBuf::from("output.txt"),
            solver: ExternalSolverConfig::default(),
            limit: None,
            annotate_failures: true,
            summary: None,
        }
    }
}

impl RunConfig {
    /// Load a configuration from a JSON file. Missing fields take defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.variable_counts.is_empty() {
            return Err(ConfigError::NoVariableCounts);
        }
        if self.min_subset == 0 {
            return Err(ConfigError::ZeroSubsetSize);
        }
        if self.min_subset > self.max_subset {
            return Err(ConfigError::InvertedSubsetRange {
                min: self.min_subset,
                max: self.max_subset,
            });
        }
        Ok(())
    }

    pub fn subset_sizes(&self) -> RangeInclusive<usize> {
        self.min_subset..=self.max_subset
    }
}
