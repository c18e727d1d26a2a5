//! Error types for the driver and its configuration

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a run
///
/// Solver problems never show up here; they become verdicts. Only I/O on
/// the files the driver owns is fatal.
#[derive(Debug, Error)]
pub enum DriverError {
    /// Scoped temporary file for a solver-input document could not be created
    #[error("failed to create solver input file: {0}")]
    TempFile(#[source] std::io::Error),

    /// Document could not be written or synced
    #[error("failed to write solver input: {0}")]
    WriteInput(#[source] std::io::Error),

    /// Result log write or flush failed
    #[error("failed to write result log: {0}")]
    Log(#[source] std::io::Error),

    /// Report stream write failed
    #[error("failed to write report: {0}")]
    Report(#[source] std::io::Error),

    /// Run summary could not be written
    #[error("failed to write summary to {path}: {source}")]
    Summary {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Run summary could not be serialized
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for driver operations
pub type DriverResult<T> = Result<T, DriverError>;

/// Errors in a run configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file could not be read
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file is not valid JSON for a run configuration
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// No variable counts to check
    #[error("at least one variable count is required")]
    NoVariableCounts,

    /// Subset size of zero
    #[error("subset sizes must be at least 1")]
    ZeroSubsetSize,

    /// Smallest subset size above the largest
    #[error("invalid subset size range {min}..={max}")]
    InvertedSubsetRange { min: usize, max: usize },
}
