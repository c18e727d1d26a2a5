//! Monomials and equations over GF(2)
//!
//! An equation is a sum of monomials, each of which is a lone variable, a
//! product of two variables, or the constant `1`. The wire text
//! (`x3 + x1*x2 + 1`) is produced only by the `Display` impls in this module,
//! and read back only by the `FromStr` impls.

// =============================================
// Kani Proofs for the equation model
// =============================================

#[cfg(kani)]
mod kani_proofs {
    use super::*;

    /// Verify Variable::new rejects index 0
    #[kani::proof]
    fn proof_variable_new_rejects_zero() {
        kani::assert(Variable::new(0).is_none(), "index 0 must be rejected");
    }

    /// Verify from_position is 1-based
    #[kani::proof]
    fn proof_variable_from_position_offset() {
        let position: u16 = kani::any();
        let var = Variable::from_position(position as usize);
        kani::assert(
            var.index() == position as usize + 1,
            "position p should map to x(p+1)",
        );
    }

    /// Verify monomial degrees
    #[kani::proof]
    fn proof_monomial_degree() {
        let a = Variable::from_position(0);
        let b = Variable::from_position(1);
        kani::assert(Monomial::One.degree() == 0, "1 has degree 0");
        kani::assert(Monomial::Var(a).degree() == 1, "x has degree 1");
        kani::assert(Monomial::Product(a, b).degree() == 2, "x*y has degree 2");
    }
}

use crate::error::{ParseError, ParseResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A symbolic variable, identified by its 1-based index
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Variable(usize);

impl Variable {
    /// Variable with the given 1-based index. `None` for index 0.
    pub fn new(index: usize) -> Option<Self> {
        (index > 0).then_some(Self(index))
    }

    /// Variable at a 0-based position, so position 0 is `x1`
    pub fn from_position(position: usize) -> Self {
        Self(position + 1)
    }

    /// 1-based index
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{}", self.0)
    }
}

impl FromStr for Variable {
    type Err = ParseError;

    fn from_str(s: &str) -> ParseResult<Self> {
        let digits = s
            .strip_prefix('x')
            .ok_or_else(|| ParseError::invalid_monomial(s, "expected 'x' before a variable index"))?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseError::invalid_monomial(s, "invalid index of a variable"));
        }
        let index: usize = digits
            .parse()
            .map_err(|_| ParseError::invalid_monomial(s, "variable index too large"))?;
        Variable::new(index).ok_or_else(|| ParseError::invalid_monomial(s, "variable indices start at 1"))
    }
}

/// A single term of an equation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Monomial {
    /// A lone variable, `x3`
    Var(Variable),
    /// Product of two distinct variables, `x1*x2`
    Product(Variable, Variable),
    /// The constant unit, `1`
    One,
}

impl Monomial {
    pub fn degree(&self) -> usize {
        match self {
            Monomial::One => 0,
            Monomial::Var(_) => 1,
            Monomial::Product(..) => 2,
        }
    }

    pub fn is_one(&self) -> bool {
        matches!(self, Monomial::One)
    }

    pub fn is_product(&self) -> bool {
        matches!(self, Monomial::Product(..))
    }

    /// Largest variable index mentioned, `None` for the constant
    pub fn max_index(&self) -> Option<usize> {
        match self {
            Monomial::One => None,
            Monomial::Var(v) => Some(v.index()),
            Monomial::Product(a, b) => Some(a.index().max(b.index())),
        }
    }
}

impl fmt::Display for Monomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Monomial::Var(v) => write!(f, "{v}"),
            Monomial::Product(a, b) => write!(f, "{a}*{b}"),
            Monomial::One => f.write_str("1"),
        }
    }
}

impl FromStr for Monomial {
    type Err = ParseError;

    fn from_str(s: &str) -> ParseResult<Self> {
        if s == "1" {
            return Ok(Monomial::One);
        }
        if s.is_empty() {
            return Err(ParseError::invalid_monomial(s, "unexpected beginning of a monomial"));
        }
        let factors: Vec<&str> = s.split('*').collect();
        match factors.as_slice() {
            [single] => Ok(Monomial::Var(single.parse()?)),
            [left, right] => {
                let (a, b): (Variable, Variable) = (left.parse()?, right.parse()?);
                if a == b {
                    return Err(ParseError::invalid_monomial(s, "repeated variable in a product"));
                }
                Ok(Monomial::Product(a, b))
            }
            _ => Err(ParseError::invalid_monomial(
                s,
                "products of more than two variables are not supported",
            )),
        }
    }
}

/// Sum of monomials over GF(2)
///
/// Monomial order is kept as constructed so that the rendered text is
/// reproducible byte for byte.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Equation {
    monomials: Vec<Monomial>,
}

impl Equation {
    pub fn new(monomials: Vec<Monomial>) -> Self {
        Self { monomials }
    }

    pub fn monomials(&self) -> &[Monomial] {
        &self.monomials
    }

    pub fn len(&self) -> usize {
        self.monomials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.monomials.is_empty()
    }

    /// Copy of this equation with the constant `1` appended
    pub fn with_one(&self) -> Self {
        let mut monomials = self.monomials.clone();
        monomials.push(Monomial::One);
        Self { monomials }
    }

    /// Whether the equation carries a constant term
    pub fn is_affine(&self) -> bool {
        self.monomials.iter().any(Monomial::is_one)
    }

    /// The equation with every constant term removed
    pub fn homogeneous_part(&self) -> Self {
        Self {
            monomials: self
                .monomials
                .iter()
                .filter(|m| !m.is_one())
                .copied()
                .collect(),
        }
    }

    /// Variables of the first product term
    pub fn product(&self) -> Option<(Variable, Variable)> {
        self.monomials.iter().find_map(|m| match m {
            Monomial::Product(a, b) => Some((*a, *b)),
            _ => None,
        })
    }

    /// Largest variable index used anywhere in the equation
    pub fn max_index(&self) -> Option<usize> {
        self.monomials.iter().filter_map(Monomial::max_index).max()
    }
}

impl fmt::Display for Equation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, monomial) in self.monomials.iter().enumerate() {
            if idx > 0 {
                f.write_str(" + ")?;
            }
            write!(f, "{monomial}")?;
        }
        Ok(())
    }
}

impl FromStr for Equation {
    type Err = ParseError;

    /// Parse `x3 + x1*x2 + 1`. Whitespace is ignored anywhere in the line.
    fn from_str(s: &str) -> ParseResult<Self> {
        let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        if compact.is_empty() {
            return Err(ParseError::EmptyEquation);
        }
        let monomials = compact
            .split('+')
            .map(str::parse)
            .collect::<ParseResult<Vec<Monomial>>>()?;
        Ok(Self { monomials })
    }
}
