//! Pairwise equation family
//!
//! For `n` variables, every unordered pair `(i, j)` contributes two
//! equations: the sum of all other variables plus `xi*xj`, and the same sum
//! plus the constant `1`. Pairs are visited in lexicographic order and the
//! homogeneous equation always precedes the affine one.

use crate::equation::{Equation, Monomial, Variable};

/// The two equations generated for one variable pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EquationPair {
    /// 0-based position of the first variable
    pub i: usize,
    /// 0-based position of the second variable, `j > i`
    pub j: usize,
    /// Lone variables plus the product, no constant
    pub homogeneous: Equation,
    /// `homogeneous` with `1` appended
    pub affine: Equation,
}

/// Unordered pairs `(i, j)`, `i < j < n`, in generation order
pub fn pairs(n: usize) -> impl Iterator<Item = (usize, usize)> {
    (0..n).flat_map(move |i| (i + 1..n).map(move |j| (i, j)))
}

/// Build both equations for the pair `(i, j)` over `n` variables.
///
/// Positions are 0-based and must satisfy `i < j < n`.
pub fn pair_equations(n: usize, i: usize, j: usize) -> EquationPair {
    debug_assert!(i < j && j < n, "pair ({i}, {j}) out of range for n = {n}");

    let mut monomials: Vec<Monomial> = (0..n)
        .filter(|&k| k != i && k != j)
        .map(|k| Monomial::Var(Variable::from_position(k)))
        .collect();
    monomials.push(Monomial::Product(
        Variable::from_position(i),
        Variable::from_position(j),
    ));

    let homogeneous = Equation::new(monomials);
    let affine = homogeneous.with_one();
    EquationPair {
        i,
        j,
        homogeneous,
        affine,
    }
}

/// Generate the full equation family for `n` variables.
///
/// Returns `n * (n - 1)` equations, or nothing when `n < 2`.
pub fn generate(n: usize) -> Vec<Equation> {
    let mut equations = Vec::with_capacity(family_size(n));
    for (i, j) in pairs(n) {
        let pair = pair_equations(n, i, j);
        equations.push(pair.homogeneous);
        equations.push(pair.affine);
    }
    equations
}

/// Number of equations `generate(n)` returns
pub fn family_size(n: usize) -> usize {
    n * n.saturating_sub(1)
}
