//! Command-line interface

use crate::config::RunConfig;
use crate::error::ConfigError;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing::Level;

/// Generate GF(2) equation families and check every ordered subset with an
/// external solver
#[derive(Parser, Debug)]
#[command(name = "f2sweep", version, about)]
pub struct Cli {
    /// Variable counts to check, in order (comma separated)
    #[arg(short = 'n', long = "vars", value_delimiter = ',', env = "F2SWEEP_VARS")]
    pub vars: Option<Vec<usize>>,

    /// Smallest subset size
    #[arg(long, env = "F2SWEEP_MIN_SUBSET")]
    pub min_subset: Option<usize>,

    /// Largest subset size
    #[arg(long, env = "F2SWEEP_MAX_SUBSET")]
    pub max_subset: Option<usize>,

    /// Result log path
    #[arg(short, long, env = "F2SWEEP_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Solver program, resolved through PATH unless it is a path
    #[arg(long, env = "F2SWEEP_SOLVER")]
    pub solver: Option<PathBuf>,

    /// Argument placed before the document path (repeatable)
    #[arg(long = "solver-arg", allow_hyphen_values = true)]
    pub solver_args: Option<Vec<String>>,

    /// Working directory for the solver
    #[arg(long, env = "F2SWEEP_SOLVER_DIR")]
    pub solver_dir: Option<PathBuf>,

    /// Per-candidate solver timeout in seconds
    #[arg(long, env = "F2SWEEP_TIMEOUT")]
    pub timeout: Option<u64>,

    /// Maximum candidates per subset size
    #[arg(long, env = "F2SWEEP_LIMIT")]
    pub limit: Option<u64>,

    /// Do not mark invocation failures in the result log
    #[arg(long)]
    pub no_annotate: bool,

    /// Write a JSON run summary to this path
    #[arg(long, env = "F2SWEEP_SUMMARY")]
    pub summary: Option<PathBuf>,

    /// JSON configuration file; flags override its values
    #[arg(short, long, env = "F2SWEEP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn log_level(&self) -> Level {
        match self.verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }

    /// Build the run configuration: file (or defaults) first, flags on top
    pub fn into_config(self) -> Result<RunConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => RunConfig::load(path)?,
            None => RunConfig::default(),
        };

        if let Some(vars) = self.vars {
            config.variable_counts = vars;
        }
        if let Some(min) = self.min_subset {
            config.min_subset = min;
        }
        if let Some(max) = self.max_subset {
            config.max_subset = max;
        }
        if let Some(output) = self.output {
            config.output = output;
        }
        match (self.solver, self.solver_args) {
            (Some(program), args) => {
                config.solver.program = program;
                config.solver.args = args.unwrap_or_default();
            }
            (None, Some(args)) => config.solver.args = args,
            (None, None) => {}
        }
        if let Some(dir) = self.solver_dir {
            config.solver.working_dir = Some(dir);
        }
        if let Some(secs) = self.timeout {
            config.solver.timeout = Some(Duration::from_secs(secs));
        }
        if let Some(limit) = self.limit {
            config.limit = Some(limit);
        }
        if self.no_annotate {
            config.annotate_failures = false;
        }
        if let Some(summary) = self.summary {
            config.summary = Some(summary);
        }
        Ok(config)
    }
}
