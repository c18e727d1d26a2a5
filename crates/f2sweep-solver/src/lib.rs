//! Solver backends for f2sweep
//!
//! A solver receives the path of a solver-input document and returns a
//! [`SolverOutcome`]: the raw transcript plus a structured [`Verdict`].
//!
//! # Backends
//!
//! - [`ExternalSolver`]: runs an external program once per document
//!   (`go run main.go <document>` by default)
//!
//! Anything else, such as an in-process solver or a test double, only has
//! to implement [`Solver`].

pub mod external;
pub mod report;
pub mod traits;

pub use external::{ExternalSolver, ExternalSolverConfig};
pub use report::SolverReport;
pub use traits::{HealthStatus, Solver, SolverError, SolverOutcome, Verdict};
