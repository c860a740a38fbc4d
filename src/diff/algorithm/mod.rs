//! Sequence alignment.
//!
//! Everything here works on abstract sequences through [`DiffSequence`]:
//! the same code aligns lines (as interned ids) and characters. Results
//! are expressed as the *changed* regions ([`SequenceDiff`]); matched
//! regions are the gaps between them.
//!
//! [`Aligner`] is the entry point. It strips the common prefix and suffix
//! exactly, then hands the remaining window to either the quadratic
//! [`DynamicProgrammingDiffing`] (small inputs) or [`MyersDiffAlgorithm`].

mod char_sequence;
mod dynamic_programming;
mod line_sequence;
mod myers;

pub use char_sequence::CharSequence;
pub use dynamic_programming::DynamicProgrammingDiffing;
pub use line_sequence::LineSequence;
pub use myers::MyersDiffAlgorithm;

use super::timeout::Deadline;
use crate::model::OffsetRange;

/// Table size (`len1 * len2`) up to which the DP algorithm is used.
pub const DEFAULT_DP_CELL_LIMIT: usize = 1_000_000;

// ============================================================================
// Sequences
// ============================================================================

/// A sequence the aligner can compare element by element.
pub trait DiffSequence {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether element `offset` of `self` equals element `other_offset` of
    /// `other`.
    fn is_same(&self, offset: usize, other: &Self, other_offset: usize) -> bool;
}

/// A contiguous window into another sequence.
struct Window<'a, S: ?Sized> {
    inner: &'a S,
    range: OffsetRange,
}

impl<S: DiffSequence + ?Sized> DiffSequence for Window<'_, S> {
    fn len(&self) -> usize {
        self.range.len()
    }

    fn is_same(&self, offset: usize, other: &Self, other_offset: usize) -> bool {
        self.inner.is_same(
            self.range.start + offset,
            other.inner,
            other.range.start + other_offset,
        )
    }
}

/// Adapts a slice plus an equality closure to [`DiffSequence`].
struct SliceSequence<'a, T, F> {
    items: &'a [T],
    eq: &'a F,
}

impl<T, F> DiffSequence for SliceSequence<'_, T, F>
where
    F: Fn(&T, &T) -> bool,
{
    fn len(&self) -> usize {
        self.items.len()
    }

    fn is_same(&self, offset: usize, other: &Self, other_offset: usize) -> bool {
        (self.eq)(&self.items[offset], &other.items[other_offset])
    }
}

// ============================================================================
// Results
// ============================================================================

/// A changed region: `seq1_range` in the first sequence was replaced by
/// `seq2_range` in the second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SequenceDiff {
    pub seq1_range: OffsetRange,
    pub seq2_range: OffsetRange,
}

impl SequenceDiff {
    #[must_use]
    pub const fn new(seq1_range: OffsetRange, seq2_range: OffsetRange) -> Self {
        Self {
            seq1_range,
            seq2_range,
        }
    }

    /// Both ranges empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.seq1_range.is_empty() && self.seq2_range.is_empty()
    }

    /// Smallest diff covering both (they must be in order).
    #[must_use]
    pub fn join(&self, other: &Self) -> Self {
        Self::new(
            self.seq1_range.join(&other.seq1_range),
            self.seq2_range.join(&other.seq2_range),
        )
    }

    /// Shift both ranges by `offset1` / `offset2`.
    #[must_use]
    pub fn delta(&self, offset1: isize, offset2: isize) -> Self {
        Self::new(self.seq1_range.delta(offset1), self.seq2_range.delta(offset2))
    }
}

/// Output of one alignment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlignmentResult {
    /// Changed regions, sorted and non-overlapping on both sides.
    pub diffs: Vec<SequenceDiff>,
    /// The deadline cut the search short; `diffs` is valid but may not be
    /// minimal.
    pub hit_timeout: bool,
}

impl AlignmentResult {
    #[must_use]
    pub const fn new(diffs: Vec<SequenceDiff>, hit_timeout: bool) -> Self {
        Self { diffs, hit_timeout }
    }

    /// Everything changed: one diff covering both sequences (none if both
    /// are empty).
    #[must_use]
    pub fn trivial(len1: usize, len2: usize, hit_timeout: bool) -> Self {
        let diffs = if len1 == 0 && len2 == 0 {
            Vec::new()
        } else {
            vec![SequenceDiff::new(
                OffsetRange::new(0, len1),
                OffsetRange::new(0, len2),
            )]
        };
        Self { diffs, hit_timeout }
    }
}

/// An alignment algorithm.
pub trait SequenceDiffAlgorithm {
    fn compute<S: DiffSequence + ?Sized>(
        &self,
        seq1: &S,
        seq2: &S,
        deadline: &Deadline,
    ) -> AlignmentResult;
}

// ============================================================================
// Aligner
// ============================================================================

/// Chooses an algorithm by input size and handles the common affixes.
#[derive(Debug, Clone, Copy)]
pub struct Aligner {
    dp_cell_limit: usize,
}

impl Default for Aligner {
    fn default() -> Self {
        Self::new(DEFAULT_DP_CELL_LIMIT)
    }
}

impl Aligner {
    #[must_use]
    pub const fn new(dp_cell_limit: usize) -> Self {
        Self { dp_cell_limit }
    }

    #[must_use]
    pub const fn dp_cell_limit(&self) -> usize {
        self.dp_cell_limit
    }

    /// Align `seq1` against `seq2`.
    ///
    /// Prefix/suffix trimming always runs to completion. If the deadline is
    /// already expired afterwards, the remaining window is reported as a
    /// single change.
    pub fn align<S: DiffSequence + ?Sized>(
        &self,
        seq1: &S,
        seq2: &S,
        deadline: &Deadline,
    ) -> AlignmentResult {
        let (len1, len2) = (seq1.len(), seq2.len());
        let (prefix, suffix) = common_affixes(seq1, seq2);

        let window1 = Window {
            inner: seq1,
            range: OffsetRange::new(prefix, len1 - suffix),
        };
        let window2 = Window {
            inner: seq2,
            range: OffsetRange::new(prefix, len2 - suffix),
        };

        if window1.is_empty() || window2.is_empty() {
            let diff = SequenceDiff::new(window1.range, window2.range);
            let diffs = if diff.is_empty() { Vec::new() } else { vec![diff] };
            return AlignmentResult::new(diffs, false);
        }

        let result = if deadline.expired() {
            AlignmentResult::trivial(window1.len(), window2.len(), true)
        } else if window1.len().saturating_mul(window2.len()) <= self.dp_cell_limit {
            DynamicProgrammingDiffing.compute(&window1, &window2, deadline)
        } else {
            MyersDiffAlgorithm.compute(&window1, &window2, deadline)
        };

        let offset = isize::try_from(prefix).unwrap_or(isize::MAX);
        AlignmentResult::new(
            result
                .diffs
                .into_iter()
                .map(|d| d.delta(offset, offset))
                .collect(),
            result.hit_timeout,
        )
    }
}

/// Lengths of the common prefix and (non-overlapping) common suffix.
fn common_affixes<S: DiffSequence + ?Sized>(seq1: &S, seq2: &S) -> (usize, usize) {
    let max = seq1.len().min(seq2.len());
    let mut prefix = 0;
    while prefix < max && seq1.is_same(prefix, seq2, prefix) {
        prefix += 1;
    }
    let mut suffix = 0;
    while suffix < max - prefix
        && seq1.is_same(seq1.len() - 1 - suffix, seq2, seq2.len() - 1 - suffix)
    {
        suffix += 1;
    }
    (prefix, suffix)
}

/// Align two slices of arbitrary elements with a custom equality.
pub fn align_by<T, F>(a: &[T], b: &[T], eq: F, deadline: &Deadline) -> AlignmentResult
where
    F: Fn(&T, &T) -> bool,
{
    let seq1 = SliceSequence { items: a, eq: &eq };
    let seq2 = SliceSequence { items: b, eq: &eq };
    Aligner::default().align(&seq1, &seq2, deadline)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    fn ranges(result: &AlignmentResult) -> Vec<((usize, usize), (usize, usize))> {
        result
            .diffs
            .iter()
            .map(|d| {
                (
                    (d.seq1_range.start, d.seq1_range.end_exclusive),
                    (d.seq2_range.start, d.seq2_range.end_exclusive),
                )
            })
            .collect()
    }

    #[test]
    fn test_identical_sequences_have_no_diffs() {
        let a = chars("abcdef");
        let result = align_by(&a, &a, |x, y| x == y, &Deadline::unbounded());
        assert!(result.diffs.is_empty());
        assert!(!result.hit_timeout);
    }

    #[test]
    fn test_prefix_and_suffix_are_trimmed() {
        let a = chars("abcXdef");
        let b = chars("abcYYdef");
        let result = align_by(&a, &b, |x, y| x == y, &Deadline::unbounded());
        assert_eq!(ranges(&result), vec![((3, 4), (3, 5))]);
    }

    #[test]
    fn test_pure_insertion_and_deletion() {
        let a = chars("abc");
        let b = chars("abXc");
        let inserted = align_by(&a, &b, |x, y| x == y, &Deadline::unbounded());
        assert_eq!(ranges(&inserted), vec![((2, 2), (2, 3))]);

        let deleted = align_by(&b, &a, |x, y| x == y, &Deadline::unbounded());
        assert_eq!(ranges(&deleted), vec![((2, 3), (2, 2))]);
    }

    #[test]
    fn test_empty_sides() {
        let empty: Vec<char> = Vec::new();
        let a = chars("ab");
        let result = align_by(&empty, &a, |x, y| x == y, &Deadline::unbounded());
        assert_eq!(ranges(&result), vec![((0, 0), (0, 2))]);
        let none = align_by(&empty, &empty, |x, y| x == y, &Deadline::unbounded());
        assert!(none.diffs.is_empty());
    }

    #[test]
    fn test_expired_deadline_keeps_affixes() {
        let a = chars("head-AAAA-tail");
        let b = chars("head-BB-tail");
        let result = align_by(&a, &b, |x, y| x == y, &Deadline::from_millis(0));
        assert!(result.hit_timeout);
        assert_eq!(ranges(&result), vec![((5, 9), (5, 7))]);
    }

    #[test]
    fn test_dp_and_myers_agree_on_edit_count() {
        let a = chars("the quick brown fox jumps over the lazy dog");
        let b = chars("the quick red fox jumped over a lazy dog!");
        let dp = Aligner::new(usize::MAX).align(&Slice(&a), &Slice(&b), &Deadline::unbounded());
        let myers = Aligner::new(0).align(&Slice(&a), &Slice(&b), &Deadline::unbounded());

        let cost = |r: &AlignmentResult| -> usize {
            r.diffs
                .iter()
                .map(|d| d.seq1_range.len() + d.seq2_range.len())
                .sum()
        };
        assert_eq!(cost(&dp), cost(&myers));
    }

    struct Slice<'a>(&'a [char]);

    impl DiffSequence for Slice<'_> {
        fn len(&self) -> usize {
            self.0.len()
        }

        fn is_same(&self, offset: usize, other: &Self, other_offset: usize) -> bool {
            self.0[offset] == other.0[other_offset]
        }
    }
}
