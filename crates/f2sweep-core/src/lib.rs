//! Core model for f2sweep
//!
//! This crate holds everything that does not touch the outside world:
//! - [`Equation`] and [`Monomial`]: structured GF(2) equations with a single
//!   text serialisation
//! - [`generate`]: the pairwise equation family for `n` variables
//! - [`Permutations`]: lazy, restartable enumeration of ordered subsets
//! - [`SolverInput`]: the document handed to a solver for one candidate

pub mod document;
pub mod enumerate;
pub mod equation;
pub mod error;
pub mod generate;

pub use document::SolverInput;
pub use enumerate::{candidates, permutation_count, Permutations};
pub use equation::{Equation, Monomial, Variable};
pub use error::{EnumerationError, ParseError, ParseResult};
pub use generate::{family_size, generate, pair_equations, pairs, EquationPair};
