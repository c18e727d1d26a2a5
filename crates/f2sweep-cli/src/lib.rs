//! Enumeration driver for f2sweep
//!
//! Generates the equation family for each configured variable count, walks
//! every ordered subset of the configured sizes, hands each candidate to a
//! [`Solver`](f2sweep_solver::Solver), and archives the transcripts in a
//! separator-delimited result log.

pub mod cli;
pub mod config;
pub mod driver;
pub mod error;
pub mod log;
pub mod summary;

pub use cli::Cli;
pub use config::RunConfig;
pub use driver::{Driver, DriverOptions};
pub use error::{ConfigError, DriverError, DriverResult};
pub use log::{separator, ResultLog, SEPARATOR_WIDTH};
pub use summary::{BatchSummary, RunSummary};
