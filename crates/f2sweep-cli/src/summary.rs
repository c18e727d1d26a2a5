//! Run summary: candidate and verdict counts per batch

use crate::error::{DriverError, DriverResult};
use f2sweep_solver::{SolverOutcome, Verdict};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Counts for one (variable count, subset size) batch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Number of variables
    pub n: usize,
    /// Subset size
    pub count: usize,
    /// Size of the equation family
    pub family_size: usize,
    /// P(family_size, count), None if it overflows
    pub expected: Option<u64>,
    /// Candidates sent to the solver
    pub candidates: u64,
    pub success: u64,
    pub failure: u64,
    pub indeterminate: u64,
    /// Indeterminate candidates where the solver never produced a transcript
    pub invocation_failures: u64,
    /// Batch stopped early because of the candidate limit
    pub truncated: bool,
}

impl BatchSummary {
    pub fn new(n: usize, count: usize, family_size: usize, expected: Option<u64>) -> Self {
        Self {
            n,
            count,
            family_size,
            expected,
            ..Default::default()
        }
    }

    pub fn record(&mut self, outcome: &SolverOutcome) {
        self.candidates += 1;
        match outcome.verdict {
            Verdict::Success(_) => self.success += 1,
            Verdict::Failure { .. } => self.failure += 1,
            Verdict::Indeterminate { .. } => self.indeterminate += 1,
        }
        if outcome.is_invocation_failure() {
            self.invocation_failures += 1;
        }
    }
}

/// Counts for a whole run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub batches: Vec<BatchSummary>,
}

impl RunSummary {
    pub fn candidates(&self) -> u64 {
        self.batches.iter().map(|b| b.candidates).sum()
    }

    pub fn successes(&self) -> u64 {
        self.batches.iter().map(|b| b.success).sum()
    }

    pub fn failures(&self) -> u64 {
        self.batches.iter().map(|b| b.failure).sum()
    }

    pub fn indeterminate(&self) -> u64 {
        self.batches.iter().map(|b| b.indeterminate).sum()
    }

    /// Write the summary as pretty JSON
    pub fn write_json(&self, path: &Path) -> DriverResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|source| DriverError::Summary {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use f2sweep_solver::{SolverError, SolverReport};
    use std::time::Duration;

    fn outcome(verdict: Verdict, stdout: &[u8], exit_code: Option<i32>) -> SolverOutcome {
        SolverOutcome {
            verdict,
            stdout: stdout.to_vec(),
            stderr: String::new(),
            exit_code,
            duration: Duration::ZERO,
        }
    }

    #[test]
    fn record_counts_each_verdict() {
        let mut batch = BatchSummary::new(3, 2, 6, Some(30));
        batch.record(&outcome(
            Verdict::Success(SolverReport::default()),
            b"Equal: false\n",
            Some(0),
        ));
        batch.record(&outcome(
            Verdict::Failure {
                exit_code: Some(1),
                diagnostics: vec![],
            },
            b"",
            Some(1),
        ));
        batch.record(&SolverOutcome::from_error(
            &SolverError::Timeout(Duration::from_secs(1)),
            Duration::from_secs(1),
        ));

        assert_eq!(batch.candidates, 3);
        assert_eq!(batch.success, 1);
        assert_eq!(batch.failure, 1);
        assert_eq!(batch.indeterminate, 1);
        assert_eq!(batch.invocation_failures, 1);
    }

    #[test]
    fn totals_sum_batches() {
        let summary = RunSummary {
            batches: vec![
                BatchSummary {
                    candidates: 30,
                    success: 28,
                    failure: 2,
                    ..Default::default()
                },
                BatchSummary {
                    candidates: 120,
                    success: 100,
                    indeterminate: 20,
                    ..Default::default()
                },
            ],
        };
        assert_eq!(summary.candidates(), 150);
        assert_eq!(summary.successes(), 128);
        assert_eq!(summary.failures(), 2);
        assert_eq!(summary.indeterminate(), 20);
    }

    #[test]
    fn write_json_round_trips() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("summary.json");
        let summary = RunSummary {
            batches: vec![BatchSummary::new(4, 3, 12, Some(1320))],
        };
        summary.write_json(&path).unwrap();

        let back: RunSummary =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(back, summary);
    }

    #[test]
    fn write_json_reports_bad_path() {
        let summary = RunSummary::default();
        let err = summary
            .write_json(Path::new("/nonexistent/dir/summary.json"))
            .unwrap_err();
        assert!(matches!(err, DriverError::Summary { .. }));
    }
}
