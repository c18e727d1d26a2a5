//! Solver capability interface
//!
//! The driver only needs one thing from a solver: given the path of a
//! solver-input document, run a check and say how it went. Everything about
//! how the check is carried out (an external process, a mock in tests) sits
//! behind [`Solver`].

use crate::report::SolverReport;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::io::Write;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Structured outcome of one solver check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Verdict {
    /// Solver ran to completion and printed its summary
    Success(SolverReport),

    /// Solver ran and reported an error (non-zero exit or crash)
    Failure {
        /// Exit code, `None` if the process was terminated by a signal
        exit_code: Option<i32>,
        /// Last lines of the solver's diagnostic stream
        diagnostics: Vec<String>,
    },

    /// No verdict could be established
    Indeterminate { reason: String },
}

impl Verdict {
    pub fn is_success(&self) -> bool {
        matches!(self, Verdict::Success(_))
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Verdict::Failure { .. })
    }

    pub fn is_indeterminate(&self) -> bool {
        matches!(self, Verdict::Indeterminate { .. })
    }

    /// Short lowercase label for logs and summaries
    pub fn label(&self) -> &'static str {
        match self {
            Verdict::Success(_) => "success",
            Verdict::Failure { .. } => "failure",
            Verdict::Indeterminate { .. } => "indeterminate",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::Success(report) => write!(f, "SUCCESS: {report}"),
            Verdict::Failure {
                exit_code: Some(code),
                diagnostics,
            } => {
                write!(f, "FAILURE: exit code {code}")?;
                if let Some(last) = diagnostics.last() {
                    write!(f, " ({last})")?;
                }
                Ok(())
            }
            Verdict::Failure {
                exit_code: None, ..
            } => write!(f, "FAILURE: terminated by signal"),
            Verdict::Indeterminate { reason } => write!(f, "INDETERMINATE: {reason}"),
        }
    }
}

/// Everything a solver check produced
#[derive(Debug, Clone)]
pub struct SolverOutcome {
    pub verdict: Verdict,
    /// Raw standard output, also streamed to the transcript
    pub stdout: Vec<u8>,
    /// Diagnostic stream, kept for the verdict and tracing only
    pub stderr: String,
    /// Exit code, `None` if the process never ran or was killed
    pub exit_code: Option<i32>,
    pub duration: Duration,
}

impl SolverOutcome {
    /// Outcome for a check that could not be carried out at all
    pub fn from_error(error: &SolverError, duration: Duration) -> Self {
        Self {
            verdict: Verdict::Indeterminate {
                reason: error.to_string(),
            },
            stdout: Vec::new(),
            stderr: String::new(),
            exit_code: None,
            duration,
        }
    }

    /// Standard output as text, with invalid UTF-8 replaced
    pub fn stdout_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.stdout)
    }

    /// The solver never produced a transcript (could not start, timed out)
    pub fn is_invocation_failure(&self) -> bool {
        self.verdict.is_indeterminate() && self.exit_code.is_none() && self.stdout.is_empty()
    }
}

/// Errors that prevent a solver check from producing a transcript
#[derive(Debug, Error)]
pub enum SolverError {
    /// Solver program could not be located
    #[error("solver not found: {0}")]
    NotFound(String),

    /// Solver-input document is missing or unreadable
    #[error("invalid solver input: {0}")]
    InvalidInput(String),

    /// Process could not be started or awaited
    #[error("failed to run solver '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Solver did not finish in time
    #[error("solver timed out after {0:?}")]
    Timeout(Duration),

    /// Solver output could not be copied into the transcript
    #[error("failed to write solver transcript: {0}")]
    Transcript(#[source] std::io::Error),

    /// Other I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Availability of a solver
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    Healthy,
    Unavailable { reason: String },
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        matches!(self, HealthStatus::Healthy)
    }
}

/// A decision procedure that checks one solver-input document at a time
#[async_trait]
pub trait Solver: Send + Sync {
    /// Human-readable name, used in logs
    fn name(&self) -> &str;

    /// Check the document at `document` and wait for the verdict.
    ///
    /// Standard output is copied into `transcript` as it is produced and is
    /// also returned in the outcome.
    async fn check(
        &self,
        document: &Path,
        transcript: &mut (dyn Write + Send),
    ) -> Result<SolverOutcome, SolverError>;

    /// Whether the solver can be run at all
    async fn health_check(&self) -> HealthStatus {
        HealthStatus::Healthy
    }
}
