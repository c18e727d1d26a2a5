//! Solver-input documents
//!
//! A document is the variable count on the first line followed by one
//! equation per line:
//!
//! ```text
//! 3
//! x3 + x1*x2
//! x2 + x1*x3 + 1
//! ```

use crate::equation::Equation;
use crate::error::{ParseError, ParseResult};
use std::fmt;
use std::io::{self, Write};

/// A candidate subset ready to be handed to a solver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverInput {
    n: usize,
    equations: Vec<Equation>,
}

impl SolverInput {
    pub fn new(n: usize, equations: Vec<Equation>) -> Self {
        Self { n, equations }
    }

    /// Build a document from borrowed equations, as produced by enumeration
    pub fn from_selection(n: usize, selection: &[&Equation]) -> Self {
        Self {
            n,
            equations: selection.iter().map(|eq| (*eq).clone()).collect(),
        }
    }

    /// Number of variables
    pub fn n(&self) -> usize {
        self.n
    }

    pub fn equations(&self) -> &[Equation] {
        &self.equations
    }

    /// Write the document text. Every line, including the last, ends in `\n`.
    pub fn write_to<W: Write>(&self, mut writer: W) -> io::Result<()> {
        write!(writer, "{self}")
    }

    /// Parse document text.
    ///
    /// Blanks inside lines are ignored and empty lines are skipped. The
    /// variable count must be a positive integer and every variable index
    /// must lie in `1..=n`.
    pub fn parse(text: &str) -> ParseResult<Self> {
        if text.trim().is_empty() {
            return Err(ParseError::EmptyDocument);
        }

        let mut lines = text.split('\n');
        let header: String = lines
            .next()
            .unwrap_or_default()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        let n = header
            .parse::<i64>()
            .map_err(|_| ParseError::InvalidVariableCount(header.clone()).at_line(1))?;
        if n < 1 {
            return Err(ParseError::NonPositiveVariableCount(n).at_line(1));
        }
        let n = usize::try_from(n).map_err(|_| ParseError::InvalidVariableCount(header).at_line(1))?;

        let mut equations = Vec::new();
        for (offset, line) in lines.enumerate() {
            let line_no = offset + 2;
            if line.trim().is_empty() {
                continue;
            }
            let equation: Equation = line.parse().map_err(|e: ParseError| e.at_line(line_no))?;
            if let Some(index) = equation.max_index().filter(|&index| index > n) {
                return Err(ParseError::VariableOutOfRange { index, n }.at_line(line_no));
            }
            equations.push(equation);
        }

        Ok(Self { n, equations })
    }
}

impl fmt::Display for SolverInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.n)?;
        for equation in &self.equations {
            writeln!(f, "{equation}")?;
        }
        Ok(())
    }
}
