//! Parsing of the solver's summary block
//!
//! The reference solver computes a reduced Gröbner basis of the input
//! system and ends its transcript with:
//!
//! ```text
//! N = 3
//! Original system:
//! ...
//! New system:
//! ...
//! Equal: true
//! Is minimal: true
//! Is reduced: true
//! ```
//!
//! Only the `Equal:` line is required for a transcript to count as a
//! complete report.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Summary lines printed at the end of a solver transcript
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolverReport {
    /// Variable count echoed by the solver
    pub n: Option<usize>,
    /// Original system and computed basis have the same solution set
    pub equal: bool,
    /// Computed basis is minimal
    pub minimal: Option<bool>,
    /// Computed basis is reduced
    pub reduced: Option<bool>,
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

impl SolverReport {
    /// Extract the summary from a transcript, `None` if `Equal:` is missing
    pub fn parse(transcript: &str) -> Option<Self> {
        let mut report = SolverReport::default();
        let mut saw_equal = false;

        for line in transcript.lines().map(str::trim) {
            if let Some(value) = line.strip_prefix("N =") {
                report.n = value.trim().parse().ok();
            } else if let Some(value) = line.strip_prefix("Equal:") {
                report.equal = parse_bool(value)?;
                saw_equal = true;
            } else if let Some(value) = line.strip_prefix("Is minimal:") {
                report.minimal = parse_bool(value);
            } else if let Some(value) = line.strip_prefix("Is reduced:") {
                report.reduced = parse_bool(value);
            }
        }

        saw_equal.then_some(report)
    }
}

impl fmt::Display for SolverReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "equal={}", self.equal)?;
        if let Some(minimal) = self.minimal {
            write!(f, " minimal={minimal}")?;
        }
        if let Some(reduced) = self.reduced {
            write!(f, " reduced={reduced}")?;
        }
        Ok(())
    }
}
