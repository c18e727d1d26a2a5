//! Lazy enumeration of ordered subsets
//!
//! [`Permutations`] walks every ordered `k`-tuple of distinct indices from
//! `0..len` in lexicographic order, one tuple at a time. The walk can be
//! restarted from a position ([`Permutations::starting_at`]) or from the last
//! tuple that was processed ([`Permutations::resume`]), so a long run can be
//! stopped and picked up again without materialising the whole space.

// =============================================
// Kani Proofs for enumeration counts
// =============================================

#[cfg(kani)]
mod kani_proofs {
    use super::*;

    /// Verify P(n, 0) == 1
    #[kani::proof]
    fn proof_permutation_count_zero_k() {
        let n: u8 = kani::any();
        kani::assert(
            permutation_count(n as usize, 0) == Some(1),
            "there is exactly one empty tuple",
        );
    }

    /// Verify P(n, k) == 0 when k > n
    #[kani::proof]
    fn proof_permutation_count_k_exceeds_len() {
        let n: u8 = kani::any();
        kani::assume(n < 200);
        kani::assert(
            permutation_count(n as usize, n as usize + 1) == Some(0),
            "no tuple is longer than the item list",
        );
    }

    /// Verify the counts used by the default run
    #[kani::proof]
    fn proof_permutation_count_default_run() {
        kani::assert(permutation_count(6, 2) == Some(30), "P(6,2) = 30");
        kani::assert(permutation_count(6, 3) == Some(120), "P(6,3) = 120");
        kani::assert(permutation_count(12, 2) == Some(132), "P(12,2) = 132");
        kani::assert(permutation_count(12, 3) == Some(1320), "P(12,3) = 1320");
    }
}

use crate::error::EnumerationError;

/// Falling factorial `len! / (len - k)!`, `Some(0)` when `k > len`.
///
/// `None` if the count does not fit in a `u64`.
pub fn permutation_count(len: usize, k: usize) -> Option<u64> {
    if k > len {
        return Some(0);
    }
    (len - k + 1..=len).try_fold(1u64, |acc, factor| acc.checked_mul(factor as u64))
}

/// Position of `tuple` in lexicographic order.
///
/// The tuple must be a valid ordered `k`-subset of `0..len`.
fn rank(len: usize, tuple: &[usize]) -> Option<u64> {
    let k = tuple.len();
    let mut used = vec![false; len];
    let mut position = 0u64;
    for (p, &value) in tuple.iter().enumerate() {
        let smaller = used[..value].iter().filter(|&&u| !u).count() as u64;
        let block = permutation_count(len - p - 1, k - p - 1)?;
        position = position.checked_add(smaller.checked_mul(block)?)?;
        used[value] = true;
    }
    Some(position)
}

/// Tuple at `position` in lexicographic order, `None` past the end.
fn unrank(len: usize, k: usize, position: u64) -> Option<Vec<usize>> {
    if position >= permutation_count(len, k)? {
        return None;
    }
    let mut used = vec![false; len];
    let mut remaining = position;
    let mut tuple = Vec::with_capacity(k);
    for p in 0..k {
        let block = permutation_count(len - p - 1, k - p - 1)?;
        let nth = usize::try_from(remaining / block).ok()?;
        remaining %= block;
        let value = (0..len).filter(|&u| !used[u]).nth(nth)?;
        used[value] = true;
        tuple.push(value);
    }
    Some(tuple)
}

fn validate_cursor(len: usize, k: usize, cursor: &[usize]) -> Result<(), EnumerationError> {
    if cursor.len() != k {
        return Err(EnumerationError::CursorLength {
            expected: k,
            actual: cursor.len(),
        });
    }
    let mut seen = vec![false; len];
    for &index in cursor {
        if index >= len {
            return Err(EnumerationError::CursorOutOfRange { index, len });
        }
        if seen[index] {
            return Err(EnumerationError::CursorRepeats(index));
        }
        seen[index] = true;
    }
    Ok(())
}

/// Ordered `k`-subsets of `0..len` without repetition, produced lazily
#[derive(Debug, Clone)]
pub struct Permutations {
    len: usize,
    k: usize,
    /// Next tuple to yield
    current: Option<Vec<usize>>,
    /// Tuples yielded so far, counting any skipped by a restart
    produced: u64,
}

impl Permutations {
    /// Start at the first tuple `[0, 1, .., k-1]`
    pub fn new(len: usize, k: usize) -> Self {
        let current = (k <= len).then(|| (0..k).collect());
        Self {
            len,
            k,
            current,
            produced: 0,
        }
    }

    /// Start at the tuple with the given lexicographic position.
    ///
    /// A position past the end gives an exhausted enumeration.
    pub fn starting_at(len: usize, k: usize, position: u64) -> Self {
        Self {
            len,
            k,
            current: unrank(len, k, position),
            produced: position,
        }
    }

    /// Continue right after `cursor`, the last tuple that was processed.
    pub fn resume(len: usize, k: usize, cursor: &[usize]) -> Result<Self, EnumerationError> {
        validate_cursor(len, k, cursor)?;
        let position = rank(len, cursor).ok_or(EnumerationError::Overflow)?;
        let mut permutations = Self {
            len,
            k,
            current: Some(cursor.to_vec()),
            produced: position,
        };
        permutations.advance();
        permutations.produced = position + 1;
        Ok(permutations)
    }

    /// Number of tuples yielded so far, equal to the position of the next one
    pub fn position(&self) -> u64 {
        self.produced
    }

    /// Total number of tuples in the full enumeration
    pub fn total(&self) -> Option<u64> {
        permutation_count(self.len, self.k)
    }

    /// The tuple the next call to `next` will return
    pub fn peek(&self) -> Option<&[usize]> {
        self.current.as_deref()
    }

    /// Step `current` to its lexicographic successor
    fn advance(&mut self) {
        let Some(current) = self.current.as_mut() else {
            return;
        };
        let len = self.len;
        let k = self.k;

        let mut used = vec![false; len];
        for &value in current.iter() {
            used[value] = true;
        }

        for p in (0..k).rev() {
            used[current[p]] = false;
            if let Some(next) = (current[p] + 1..len).find(|&v| !used[v]) {
                used[next] = true;
                current[p] = next;
                let tail: Vec<usize> = (0..len).filter(|&v| !used[v]).take(k - p - 1).collect();
                current[p + 1..].copy_from_slice(&tail);
                return;
            }
        }
        self.current = None;
    }
}

impl Iterator for Permutations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Vec<usize>> {
        let tuple = self.current.clone()?;
        self.advance();
        self.produced += 1;
        Some(tuple)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.current.is_none() {
            return (0, Some(0));
        }
        let remaining = self
            .total()
            .and_then(|total| usize::try_from(total - self.produced).ok());
        match remaining {
            Some(n) => (n, Some(n)),
            None => (0, None),
        }
    }
}

/// Ordered `k`-subsets of `items`, as borrowed tuples
pub fn candidates<T>(items: &[T], k: usize) -> impl Iterator<Item = Vec<&T>> + '_ {
    Permutations::new(items.len(), k).map(move |tuple| tuple.into_iter().map(|i| &items[i]).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts() {
        assert_eq!(permutation_count(6, 2), Some(30));
        assert_eq!(permutation_count(6, 3), Some(120));
        assert_eq!(permutation_count(3, 4), Some(0));
        assert_eq!(permutation_count(0, 0), Some(1));
        assert_eq!(permutation_count(100, 50), None);
    }

    #[test]
    fn order_matches_lexicographic_indices() {
        let all: Vec<_> = Permutations::new(3, 2).collect();
        assert_eq!(
            all,
            vec![
                vec![0, 1],
                vec![0, 2],
                vec![1, 0],
                vec![1, 2],
                vec![2, 0],
                vec![2, 1],
            ]
        );
    }

    #[test]
    fn zero_length_tuple_yields_once() {
        let all: Vec<_> = Permutations::new(4, 0).collect();
        assert_eq!(all, vec![Vec::<usize>::new()]);
    }

    #[test]
    fn oversized_tuple_yields_nothing() {
        assert_eq!(Permutations::new(2, 3).count(), 0);
    }

    #[test]
    fn full_permutations_of_three() {
        let all: Vec<_> = Permutations::new(3, 3).collect();
        assert_eq!(all.len(), 6);
        assert_eq!(all.first(), Some(&vec![0, 1, 2]));
        assert_eq!(all.last(), Some(&vec![2, 1, 0]));
    }

    #[test]
    fn position_tracks_progress() {
        let mut perms = Permutations::new(4, 2);
        assert_eq!(perms.position(), 0);
        perms.next();
        perms.next();
        assert_eq!(perms.position(), 2);
        assert_eq!(perms.peek(), Some(&[0, 3][..]));
    }

    #[test]
    fn size_hint_is_exact() {
        let mut perms = Permutations::new(5, 2);
        assert_eq!(perms.size_hint(), (20, Some(20)));
        perms.next();
        assert_eq!(perms.size_hint(), (19, Some(19)));
    }

    #[test]
    fn starting_at_matches_skip() {
        for position in 0..30 {
            let restarted: Vec<_> = Permutations::starting_at(6, 2, position).collect();
            let skipped: Vec<_> = Permutations::new(6, 2).skip(position as usize).collect();
            assert_eq!(restarted, skipped, "position {position}");
        }
        assert_eq!(Permutations::starting_at(6, 2, 30).count(), 0);
    }

    #[test]
    fn resume_continues_after_cursor() {
        let resumed: Vec<_> = Permutations::resume(3, 2, &[1, 0]).unwrap().collect();
        assert_eq!(resumed, vec![vec![1, 2], vec![2, 0], vec![2, 1]]);
    }

    #[test]
    fn resume_sets_position() {
        let perms = Permutations::resume(6, 3, &[0, 1, 2]).unwrap();
        assert_eq!(perms.position(), 1);
        assert_eq!(perms.peek(), Some(&[0, 1, 3][..]));
    }

    #[test]
    fn resume_from_last_is_exhausted() {
        let mut perms = Permutations::resume(3, 2, &[2, 1]).unwrap();
        assert_eq!(perms.next(), None);
        assert_eq!(perms.position(), 6);
    }

    #[test]
    fn resume_rejects_bad_cursors() {
        assert_eq!(
            Permutations::resume(3, 2, &[0]).unwrap_err(),
            EnumerationError::CursorLength {
                expected: 2,
                actual: 1
            }
        );
        assert_eq!(
            Permutations::resume(3, 2, &[0, 3]).unwrap_err(),
            EnumerationError::CursorOutOfRange { index: 3, len: 3 }
        );
        assert_eq!(
            Permutations::resume(3, 2, &[1, 1]).unwrap_err(),
            EnumerationError::CursorRepeats(1)
        );
    }

    #[test]
    fn candidates_borrow_items() {
        let items = ["a", "b", "c"];
        let first: Vec<Vec<&&str>> = candidates(&items, 2).take(2).collect();
        assert_eq!(first, vec![vec![&"a", &"b"], vec![&"a", &"c"]]);
    }
}
