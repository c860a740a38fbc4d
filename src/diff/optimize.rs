//! Post-processing of raw alignments into readable change lists.
//!
//! Every pass takes a sorted, non-overlapping diff list and returns a new
//! one with the same property. None of them changes which elements count
//! as matched except the joins, which only ever grow changes.

use super::algorithm::{CharSequence, DiffSequence, SequenceDiff};
use crate::model::{Line, LineRangeMapping, OffsetRange};

/// Unchanged text between two line changes is absorbed when it has at most
/// this many non-whitespace characters...
pub const MAX_GAP_NON_WS_CHARS: usize = 4;
/// ...and one of the two changes spans more than this many lines (both
/// sides counted).
pub const MIN_NEIGHBOUR_LINES: usize = 5;
/// Upper bound on merge passes.
pub const MAX_MERGE_PASSES: usize = 10;
/// Character matches this short between two changes are absorbed.
pub const MAX_SHORT_MATCH: usize = 2;

// ============================================================================
// Pipelines
// ============================================================================

/// Line-level pass order: shift/join, then absorb short unchanged gaps.
#[must_use]
pub fn optimize_line_diffs<S: DiffSequence + ?Sized>(
    seq1: &S,
    seq2: &S,
    original_lines: &[Line],
    diffs: Vec<SequenceDiff>,
) -> Vec<SequenceDiff> {
    let diffs = shift_to_earliest(seq1, seq2, diffs);
    let diffs = merge_short_unchanged_gaps(original_lines, diffs);
    drop_empty_diffs(diffs)
}

/// Character-level pass order: shift/join, absorb tiny matches, and
/// widen to whole words when `extend_words` is set.
#[must_use]
pub fn optimize_char_diffs(
    seq1: &CharSequence,
    seq2: &CharSequence,
    diffs: Vec<SequenceDiff>,
    extend_words: bool,
) -> Vec<SequenceDiff> {
    let mut diffs = shift_to_earliest(seq1, seq2, diffs);
    diffs = remove_short_matches(diffs);
    if extend_words {
        diffs = extend_to_word_boundaries(seq1, seq2, diffs);
    }
    drop_empty_diffs(diffs)
}

// ============================================================================
// Shifting
// ============================================================================

/// Slide pure insertions and deletions as early as their content allows.
///
/// An insertion of `b[s..e)` can move one step left when `b[s-1] == b[e-1]`
/// (same for deletions on the first sequence). A diff that reaches its
/// predecessor is joined with it. Afterwards a pure diff that can slide
/// right all the way onto its successor is joined with that one; otherwise
/// it stays at its leftmost position.
#[must_use]
pub fn shift_to_earliest<S: DiffSequence + ?Sized>(
    seq1: &S,
    seq2: &S,
    diffs: Vec<SequenceDiff>,
) -> Vec<SequenceDiff> {
    let mut shifted: Vec<SequenceDiff> = Vec::with_capacity(diffs.len());

    for mut diff in diffs {
        let (floor1, floor2) = shifted.last().map_or((0, 0), |last| {
            (last.seq1_range.end_exclusive, last.seq2_range.end_exclusive)
        });
        while diff.seq1_range.start > floor1
            && diff.seq2_range.start > floor2
            && can_shift_left(seq1, seq2, &diff)
        {
            diff = diff.delta(-1, -1);
        }

        match shifted.last_mut() {
            Some(last) if touches(last, &diff) => *last = last.join(&diff),
            _ => shifted.push(diff),
        }
    }

    let mut joined: Vec<SequenceDiff> = Vec::with_capacity(shifted.len());
    let mut iter = shifted.into_iter().peekable();
    while let Some(diff) = iter.next() {
        if let Some(next) = iter.peek_mut()
            && let Some(moved) = shift_right_onto(seq1, seq2, diff, next)
        {
            *next = moved.join(next);
            continue;
        }
        joined.push(diff);
    }
    joined
}

fn can_shift_left<S: DiffSequence + ?Sized>(seq1: &S, seq2: &S, diff: &SequenceDiff) -> bool {
    let (r1, r2) = (diff.seq1_range, diff.seq2_range);
    if r1.is_empty() && !r2.is_empty() {
        seq2.is_same(r2.start - 1, seq2, r2.end_exclusive - 1)
    } else if r2.is_empty() && !r1.is_empty() {
        seq1.is_same(r1.start - 1, seq1, r1.end_exclusive - 1)
    } else {
        false
    }
}

/// `diff` slid right until it touches `next`, if its content allows.
fn shift_right_onto<S: DiffSequence + ?Sized>(
    seq1: &S,
    seq2: &S,
    diff: SequenceDiff,
    next: &SequenceDiff,
) -> Option<SequenceDiff> {
    let (r1, r2) = (diff.seq1_range, diff.seq2_range);
    let gap = next.seq1_range.start - r1.end_exclusive;
    let fits = if r1.is_empty() && !r2.is_empty() {
        (0..gap).all(|t| seq2.is_same(r2.start + t, seq2, r2.end_exclusive + t))
    } else if r2.is_empty() && !r1.is_empty() {
        (0..gap).all(|t| seq1.is_same(r1.start + t, seq1, r1.end_exclusive + t))
    } else {
        false
    };
    let gap = isize::try_from(gap).ok()?;
    fits.then(|| diff.delta(gap, gap))
}

fn touches(before: &SequenceDiff, after: &SequenceDiff) -> bool {
    before.seq1_range.end_exclusive == after.seq1_range.start
        || before.seq2_range.end_exclusive == after.seq2_range.start
}

/// Join diffs that touch.
#[must_use]
pub fn join_adjacent(diffs: Vec<SequenceDiff>) -> Vec<SequenceDiff> {
    let mut result: Vec<SequenceDiff> = Vec::with_capacity(diffs.len());
    for diff in diffs {
        match result.last_mut() {
            Some(last) if touches(last, &diff) => *last = last.join(&diff),
            _ => result.push(diff),
        }
    }
    result
}

// ============================================================================
// Line-level merging
// ============================================================================

/// Whether two line changes separated by unchanged text carrying
/// `gap_non_ws_chars` non-whitespace characters should become one change.
#[must_use]
pub fn should_join_line_diffs(
    gap_non_ws_chars: usize,
    before: &SequenceDiff,
    after: &SequenceDiff,
) -> bool {
    let span = |d: &SequenceDiff| d.seq1_range.len() + d.seq2_range.len();
    gap_non_ws_chars <= MAX_GAP_NON_WS_CHARS
        && (span(before) > MIN_NEIGHBOUR_LINES || span(after) > MIN_NEIGHBOUR_LINES)
}

/// Absorb nearly-empty unchanged stretches (a lone `}` or blank lines)
/// between large changes. Repeats until stable, at most
/// [`MAX_MERGE_PASSES`] times.
#[must_use]
pub fn merge_short_unchanged_gaps(
    original_lines: &[Line],
    mut diffs: Vec<SequenceDiff>,
) -> Vec<SequenceDiff> {
    let gap_weight = |gap: OffsetRange| -> usize {
        original_lines
            .get(gap.start..gap.end_exclusive)
            .unwrap_or_default()
            .iter()
            .map(|line| line.text.chars().filter(|c| !c.is_whitespace()).count())
            .sum()
    };

    for _ in 0..MAX_MERGE_PASSES {
        let mut changed = false;
        let mut result: Vec<SequenceDiff> = Vec::with_capacity(diffs.len());
        for diff in diffs {
            match result.last_mut() {
                Some(last)
                    if should_join_line_diffs(
                        gap_weight(OffsetRange::new(
                            last.seq1_range.end_exclusive,
                            diff.seq1_range.start,
                        )),
                        last,
                        &diff,
                    ) =>
                {
                    *last = last.join(&diff);
                    changed = true;
                }
                _ => result.push(diff),
            }
        }
        diffs = result;
        if !changed {
            break;
        }
    }
    diffs
}

// ============================================================================
// Character-level passes
// ============================================================================

/// Join character changes separated by at most [`MAX_SHORT_MATCH`]
/// matching characters.
#[must_use]
pub fn remove_short_matches(diffs: Vec<SequenceDiff>) -> Vec<SequenceDiff> {
    let mut result: Vec<SequenceDiff> = Vec::with_capacity(diffs.len());
    for diff in diffs {
        match result.last_mut() {
            Some(last)
                if diff.seq1_range.start - last.seq1_range.end_exclusive <= MAX_SHORT_MATCH
                    || diff.seq2_range.start - last.seq2_range.end_exclusive
                        <= MAX_SHORT_MATCH =>
            {
                *last = last.join(&diff);
            }
            _ => result.push(diff),
        }
    }
    result
}

/// Widen each change that starts or ends inside a word (or whitespace run)
/// to cover the whole run, on whichever side needs more. Never grows into
/// a neighbouring change; touching changes are joined afterwards.
#[must_use]
pub fn extend_to_word_boundaries(
    seq1: &CharSequence,
    seq2: &CharSequence,
    diffs: Vec<SequenceDiff>,
) -> Vec<SequenceDiff> {
    let mut extended: Vec<SequenceDiff> = Vec::with_capacity(diffs.len());

    for (i, diff) in diffs.iter().enumerate() {
        let (r1, r2) = (diff.seq1_range, diff.seq2_range);
        let (floor1, floor2) = extended.last().map_or((0, 0), |last| {
            (last.seq1_range.end_exclusive, last.seq2_range.end_exclusive)
        });
        let (ceil1, ceil2) = diffs.get(i + 1).map_or((seq1.len(), seq2.len()), |next| {
            (next.seq1_range.start, next.seq2_range.start)
        });

        let back = word_start_extension(seq1, r1)
            .max(word_start_extension(seq2, r2))
            .min(r1.start - floor1)
            .min(r2.start - floor2);
        let forward = word_end_extension(seq1, r1)
            .max(word_end_extension(seq2, r2))
            .min(ceil1 - r1.end_exclusive)
            .min(ceil2 - r2.end_exclusive);

        extended.push(SequenceDiff::new(
            OffsetRange::new(r1.start - back, r1.end_exclusive + forward),
            OffsetRange::new(r2.start - back, r2.end_exclusive + forward),
        ));
    }

    join_adjacent(extended)
}

fn word_start_extension(seq: &CharSequence, range: OffsetRange) -> usize {
    if seq.splits_run_at(range.start) {
        range.start - seq.word_at(range.start - 1).start
    } else {
        0
    }
}

fn word_end_extension(seq: &CharSequence, range: OffsetRange) -> usize {
    if seq.splits_run_at(range.end_exclusive) {
        seq.word_at(range.end_exclusive).end_exclusive - range.end_exclusive
    } else {
        0
    }
}

// ============================================================================
// Cleanup
// ============================================================================

fn drop_empty_diffs(mut diffs: Vec<SequenceDiff>) -> Vec<SequenceDiff> {
    diffs.retain(|d| !d.is_empty());
    diffs
}

/// Remove mappings that cover no lines on either side.
#[must_use]
pub fn drop_empty(mut mappings: Vec<LineRangeMapping>) -> Vec<LineRangeMapping> {
    mappings.retain(|m| !m.is_empty());
    mappings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::WhitespacePolicy;
    use crate::model::{Document, LineRange, Side};

    struct Ids(Vec<u32>);

    impl DiffSequence for Ids {
        fn len(&self) -> usize {
            self.0.len()
        }

        fn is_same(&self, offset: usize, other: &Self, other_offset: usize) -> bool {
            self.0[offset] == other.0[other_offset]
        }
    }

    fn ids(s: &str) -> Ids {
        Ids(s.bytes().map(u32::from).collect())
    }

    fn diff(s1: usize, e1: usize, s2: usize, e2: usize) -> SequenceDiff {
        SequenceDiff::new(OffsetRange::new(s1, e1), OffsetRange::new(s2, e2))
    }

    fn chars(text: &str) -> CharSequence {
        let doc = Document::tokenize(Side::Original, text);
        CharSequence::new(doc.lines(), 0, WhitespacePolicy::Significant)
    }

    mod shifting {
        use super::*;

        #[test]
        fn test_insertion_moves_to_earliest_position() {
            // "ab" -> "abab": inserting the second "ab" is equivalent to
            // inserting the first
            let result = shift_to_earliest(&ids("ab"), &ids("abab"), vec![diff(2, 2, 2, 4)]);
            assert_eq!(result, vec![diff(0, 0, 0, 2)]);
        }

        #[test]
        fn test_deletion_stops_at_previous_diff() {
            let seq1 = ids("xaab");
            let seq2 = ids("yab");
            // diff 0: x->y, diff 1: delete the second 'a'
            let result = shift_to_earliest(&seq1, &seq2, vec![diff(0, 1, 0, 1), diff(2, 3, 2, 2)]);
            // Sliding left reaches the first diff and joins it
            assert_eq!(result, vec![diff(0, 2, 0, 1)]);
        }

        #[test]
        fn test_slides_right_only_to_join() {
            let seq1 = ids("abbd");
            let seq2 = ids("abe");
            // delete the first 'b', then d->e
            let result = shift_to_earliest(&seq1, &seq2, vec![diff(1, 2, 1, 1), diff(3, 4, 2, 3)]);
            // Deleting the second 'b' instead lets both changes touch
            assert_eq!(result, vec![diff(2, 4, 2, 3)]);
        }

        #[test]
        fn test_replacements_do_not_move() {
            let result = shift_to_earliest(&ids("aXa"), &ids("aYa"), vec![diff(1, 2, 1, 2)]);
            assert_eq!(result, vec![diff(1, 2, 1, 2)]);
        }

        #[test]
        fn test_is_deterministic() {
            let seq1 = ids("aaaaab");
            let seq2 = ids("aaab");
            let input = vec![diff(3, 5, 3, 3)];
            let first = shift_to_earliest(&seq1, &seq2, input.clone());
            let second = shift_to_earliest(&seq1, &seq2, input);
            assert_eq!(first, second);
            assert_eq!(first, vec![diff(0, 2, 0, 0)]);
        }
    }

    mod line_merging {
        use super::*;

        #[test]
        fn test_policy_needs_a_large_neighbour() {
            let small = diff(0, 1, 0, 1);
            let large = diff(2, 6, 2, 5);
            assert!(should_join_line_diffs(1, &small, &large));
            assert!(!should_join_line_diffs(1, &small, &small));
            assert!(!should_join_line_diffs(5, &small, &large));
        }

        #[test]
        fn test_lone_brace_is_absorbed() {
            let doc = Document::tokenize(Side::Original, "a\nb\nc\n}\nd\ne\n");
            let diffs = vec![diff(0, 3, 0, 4), diff(4, 6, 5, 6)];
            let merged = merge_short_unchanged_gaps(doc.lines(), diffs);
            assert_eq!(merged, vec![diff(0, 6, 0, 6)]);
        }

        #[test]
        fn test_meaningful_gap_is_kept() {
            let doc = Document::tokenize(Side::Original, "a\nb\nc\nreturn x;\nd\n");
            let diffs = vec![diff(0, 3, 0, 4), diff(4, 5, 5, 6)];
            let merged = merge_short_unchanged_gaps(doc.lines(), diffs.clone());
            assert_eq!(merged, diffs);
        }
    }

    mod char_passes {
        use super::*;

        #[test]
        fn test_short_matches_are_joined() {
            let joined = remove_short_matches(vec![diff(0, 1, 0, 1), diff(3, 4, 3, 4), diff(9, 10, 9, 9)]);
            assert_eq!(joined, vec![diff(0, 4, 0, 4), diff(9, 10, 9, 9)]);
        }

        #[test]
        fn test_word_extension_covers_whole_word() {
            // "foo" -> "fXoo": insertion of 'X' inside a word
            let seq1 = chars("foo bar");
            let seq2 = chars("fXoo bar");
            let result = extend_to_word_boundaries(&seq1, &seq2, vec![diff(1, 1, 1, 2)]);
            assert_eq!(result, vec![diff(0, 3, 0, 4)]);
        }

        #[test]
        fn test_word_extension_respects_neighbours() {
            let seq1 = chars("abcdef");
            let seq2 = chars("aXcdYf");
            let result =
                extend_to_word_boundaries(&seq1, &seq2, vec![diff(1, 2, 1, 2), diff(4, 5, 4, 5)]);
            // Both grow to the word edges and meet in the middle
            assert_eq!(result, vec![diff(0, 6, 0, 6)]);
        }

        #[test]
        fn test_word_extension_leaves_whole_words_alone() {
            let seq1 = chars("one two");
            let seq2 = chars("one six");
            let result = extend_to_word_boundaries(&seq1, &seq2, vec![diff(4, 7, 4, 7)]);
            assert_eq!(result, vec![diff(4, 7, 4, 7)]);
        }
    }

    #[test]
    fn test_drop_empty_mappings() {
        let mappings = vec![
            LineRangeMapping::new(LineRange::new(1, 1), LineRange::new(2, 2)),
            LineRangeMapping::new(LineRange::new(1, 2), LineRange::new(2, 2)),
        ];
        let kept = drop_empty(mappings);
        assert_eq!(kept.len(), 1);
        assert!(kept[0].is_deletion());
    }
}
