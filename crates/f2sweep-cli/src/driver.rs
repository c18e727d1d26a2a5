//! Enumeration driver
//!
//! For one variable count `n` the driver generates the equation family,
//! prints it to the report stream, and then for every configured subset size
//! walks all ordered subsets of the family. Each candidate is written to a
//! scoped temporary file and checked by the solver, which streams its
//! transcript into the result log; the entry is then closed with a separator. Candidates are processed strictly one after
//! another.

use crate::config::RunConfig;
use crate::error::{DriverError, DriverResult};
use crate::log::ResultLog;
use crate::summary::{BatchSummary, RunSummary};
use f2sweep_core::{generate, permutation_count, Equation, Permutations, SolverInput};
use f2sweep_solver::{Solver, SolverError, SolverOutcome, Verdict};
use std::io::Write;
use std::ops::RangeInclusive;
use std::time::Instant;
use tempfile::TempPath;
use tracing::{debug, info, warn};

/// Options that shape the enumeration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverOptions {
    /// Subset sizes to enumerate, in order
    pub subset_sizes: RangeInclusive<usize>,
    /// Maximum candidates per subset size
    pub limit: Option<u64>,
    /// Write a `!!` line for candidates whose solver failed or never ran
    pub annotate_failures: bool,
}

impl Default for DriverOptions {
    fn default() -> Self {
        Self {
            subset_sizes: 2..=3,
            limit: None,
            annotate_failures: true,
        }
    }
}

impl From<&RunConfig> for DriverOptions {
    fn from(config: &RunConfig) -> Self {
        Self {
            subset_sizes: config.subset_sizes(),
            limit: config.limit,
            annotate_failures: config.annotate_failures,
        }
    }
}

/// Drives enumeration and solver dispatch for a borrowed solver
pub struct Driver<'a, S: Solver + ?Sized> {
    solver: &'a S,
    options: DriverOptions,
}

impl<'a, S: Solver + ?Sized> Driver<'a, S> {
    pub fn new(solver: &'a S, options: DriverOptions) -> Self {
        Self { solver, options }
    }

    /// Run every variable count in order against the same log
    pub async fn run_all<L: Write + Send, R: Write>(
        &self,
        variable_counts: &[usize],
        log: &mut ResultLog<L>,
        report: &mut R,
    ) -> DriverResult<RunSummary> {
        let mut summary = RunSummary::default();
        for &n in variable_counts {
            let batches = self.run(n, log, report).await?;
            summary.batches.extend(batches);
        }
        info!(
            candidates = summary.candidates(),
            success = summary.successes(),
            failure = summary.failures(),
            indeterminate = summary.indeterminate(),
            "Run complete"
        );
        Ok(summary)
    }

    /// Enumerate and check every candidate subset for `n` variables
    pub async fn run<L: Write + Send, R: Write>(
        &self,
        n: usize,
        log: &mut ResultLog<L>,
        report: &mut R,
    ) -> DriverResult<Vec<BatchSummary>> {
        let family = generate(n);
        info!(n, equations = family.len(), "Generated equation family");

        writeln!(report, "Check n = {n}").map_err(DriverError::Report)?;
        for equation in &family {
            writeln!(report, "{equation}").map_err(DriverError::Report)?;
        }

        let mut batches = Vec::new();
        for count in self.options.subset_sizes.clone() {
            writeln!(report, "Choose {count} equations").map_err(DriverError::Report)?;
            report.flush().map_err(DriverError::Report)?;

            let batch = self.run_batch(n, count, &family, log).await?;
            info!(
                n,
                count,
                candidates = batch.candidates,
                success = batch.success,
                failure = batch.failure,
                indeterminate = batch.indeterminate,
                "Finished subset size"
            );
            batches.push(batch);

            writeln!(report).map_err(DriverError::Report)?;
        }
        report.flush().map_err(DriverError::Report)?;
        Ok(batches)
    }

    async fn run_batch<L: Write + Send>(
        &self,
        n: usize,
        count: usize,
        family: &[Equation],
        log: &mut ResultLog<L>,
    ) -> DriverResult<BatchSummary> {
        let expected = permutation_count(family.len(), count);
        info!(n, count, expected = ?expected, "Enumerating candidates");
        let mut batch = BatchSummary::new(n, count, family.len(), expected);

        let mut candidates = Permutations::new(family.len(), count);
        while let Some(tuple) = candidates.next() {
            if self.options.limit.is_some_and(|limit| batch.candidates >= limit) {
                info!(n, count, position = candidates.position() - 1, "Candidate limit reached");
                batch.truncated = true;
                break;
            }
            let selection: Vec<&Equation> = tuple.iter().map(|&i| &family[i]).collect();
            debug!(n, count, ?tuple, "Checking candidate");
            let outcome = self.check_candidate(n, &selection, log).await?;
            batch.record(&outcome);
        }
        Ok(batch)
    }

    /// Write one candidate, run the solver on it, and archive the outcome
    async fn check_candidate<L: Write + Send>(
        &self,
        n: usize,
        selection: &[&Equation],
        log: &mut ResultLog<L>,
    ) -> DriverResult<SolverOutcome> {
        let input = SolverInput::from_selection(n, selection);
        let path = write_input(&input)?;

        let start = Instant::now();
        let outcome = match self.solver.check(&path, &mut *log).await {
            Ok(outcome) => outcome,
            Err(SolverError::Transcript(e)) => return Err(DriverError::Log(e)),
            Err(e) => {
                warn!(solver = self.solver.name(), error = %e, "Solver invocation failed");
                SolverOutcome::from_error(&e, start.elapsed())
            }
        };

        match &outcome.verdict {
            Verdict::Success(report) => debug!(%report, "Solver verdict"),
            Verdict::Failure { .. } | Verdict::Indeterminate { .. } => {
                warn!(verdict = %outcome.verdict, "Solver did not succeed");
            }
        }

        if self.options.annotate_failures {
            if let Some(note) = failure_note(&outcome) {
                log.annotate(&note).map_err(DriverError::Log)?;
            }
        }
        log.close_entry().map_err(DriverError::Log)?;

        if let Err(e) = path.close() {
            warn!(error = %e, "Failed to remove solver input file");
        }
        Ok(outcome)
    }
}

/// Log note for a candidate that produced no verdict from the solver
fn failure_note(outcome: &SolverOutcome) -> Option<String> {
    match &outcome.verdict {
        Verdict::Failure {
            exit_code,
            diagnostics,
        } => {
            let status = match exit_code {
                Some(code) => format!("exit {code}"),
                None => "terminated by signal".to_string(),
            };
            Some(match diagnostics.last() {
                Some(last) => format!("solver failed: {status}: {last}"),
                None => format!("solver failed: {status}"),
            })
        }
        Verdict::Indeterminate { reason } if outcome.is_invocation_failure() => {
            Some(format!("solver invocation failed: {reason}"))
        }
        _ => None,
    }
}

/// Write a document to a fresh temporary file that is removed on drop
fn write_input(input: &SolverInput) -> DriverResult<TempPath> {
    let mut file = tempfile::Builder::new()
        .prefix("f2sweep-")
        .suffix(".txt")
        .tempfile()
        .map_err(DriverError::TempFile)?;
    input.write_to(&mut file).map_err(DriverError::WriteInput)?;
    file.flush().map_err(DriverError::WriteInput)?;
    file.as_file().sync_all().map_err(DriverError::WriteInput)?;
    Ok(file.into_temp_path())
}
