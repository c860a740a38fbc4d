//! Move detection.
//!
//! A moved block shows up in a plain diff as a deletion in one place and a
//! similar insertion somewhere else. The detector pairs deleted line ranges
//! with inserted ones, accepts the best non-overlapping pairings and cuts
//! them out of the change list.

use std::cmp::Ordering;

use super::algorithm::SequenceDiff;
use super::engine_config::MoveDetectionConfig;
use super::timeout::Deadline;
use crate::matching::{LineMatcher, block_similarity};
use crate::model::{Document, LineRange, OffsetRange};

/// A block that may have moved from `original` to `modified`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveCandidate {
    pub original: LineRange,
    pub modified: LineRange,
    /// Mean line similarity of the block
    pub similarity: f64,
    /// Index of the diff the block is deleted from
    pub source: usize,
    /// Index of the diff the block is inserted by
    pub target: usize,
}

impl MoveCandidate {
    /// How far the block travelled, in lines.
    #[must_use]
    pub const fn distance(&self) -> usize {
        self.original.start.abs_diff(self.modified.start)
    }
}

/// Preference order between candidates: more similar first, then shorter
/// distance, then longer blocks, then earlier in the original.
#[must_use]
pub fn move_candidate_order(a: &MoveCandidate, b: &MoveCandidate) -> Ordering {
    b.similarity
        .total_cmp(&a.similarity)
        .then_with(|| a.distance().cmp(&b.distance()))
        .then_with(|| b.original.len().cmp(&a.original.len()))
        .then_with(|| a.original.start.cmp(&b.original.start))
        .then_with(|| a.modified.start.cmp(&b.modified.start))
}

/// Output of [`detect_moves`].
#[derive(Debug, Clone, Default)]
pub struct MoveDetection {
    /// Remaining changes, with moved lines removed
    pub diffs: Vec<SequenceDiff>,
    /// Accepted moves, ordered by original position
    pub moves: Vec<MoveCandidate>,
}

/// Input documents plus the line ids and matcher used to compare them.
pub struct MoveContext<'a> {
    pub original: &'a Document,
    pub modified: &'a Document,
    pub original_ids: &'a [u32],
    pub modified_ids: &'a [u32],
    pub matcher: &'a dyn LineMatcher,
    pub config: &'a MoveDetectionConfig,
}

/// Find moved blocks among `diffs`.
///
/// Returns the input unchanged when the deadline is already expired or
/// expires during the search.
#[must_use]
pub fn detect_moves(
    ctx: &MoveContext<'_>,
    diffs: Vec<SequenceDiff>,
    deadline: &Deadline,
) -> MoveDetection {
    if deadline.expired() {
        tracing::debug!("skipping move detection, deadline expired");
        return MoveDetection {
            diffs,
            moves: Vec::new(),
        };
    }

    let Some(mut candidates) = find_candidates(ctx, &diffs, deadline) else {
        tracing::debug!("move detection interrupted by deadline");
        return MoveDetection {
            diffs,
            moves: Vec::new(),
        };
    };
    candidates.sort_by(move_candidate_order);

    let mut accepted: Vec<MoveCandidate> = Vec::new();
    for candidate in candidates {
        let free = accepted.iter().all(|m| {
            !m.original.overlaps(&candidate.original) && !m.modified.overlaps(&candidate.modified)
        });
        if free {
            accepted.push(candidate);
        }
    }
    accepted.sort_by_key(|m| (m.original.start, m.modified.start));

    tracing::debug!(moves = accepted.len(), "move detection finished");
    MoveDetection {
        diffs: carve(&diffs, &accepted),
        moves: accepted,
    }
}

// ============================================================================
// Candidate search
// ============================================================================

fn find_candidates(
    ctx: &MoveContext<'_>,
    diffs: &[SequenceDiff],
    deadline: &Deadline,
) -> Option<Vec<MoveCandidate>> {
    let mut candidates = Vec::new();

    for (source, deleted) in diffs.iter().enumerate() {
        if deleted.seq1_range.len() < ctx.config.min_block_lines {
            continue;
        }
        for (target, inserted) in diffs.iter().enumerate() {
            if inserted.seq2_range.len() < ctx.config.min_block_lines {
                continue;
            }
            scan_pair(
                ctx,
                (source, deleted),
                (target, inserted),
                deadline,
                &mut candidates,
            )?;
        }
    }

    Some(candidates)
}

/// Walk every diagonal of `deleted.seq1_range x inserted.seq2_range` and
/// collect runs of similar lines.
fn scan_pair(
    ctx: &MoveContext<'_>,
    (source, deleted): (usize, &SequenceDiff),
    (target, inserted): (usize, &SequenceDiff),
    deadline: &Deadline,
    out: &mut Vec<MoveCandidate>,
) -> Option<()> {
    let del = deleted.seq1_range;
    let ins = inserted.seq2_range;

    // Diagonal `d` pairs original line `del.start + i` with modified line
    // `ins.start + i - d`.
    let lo = -(ins.len() as isize) + 1;
    let hi = del.len() as isize;
    for d in lo..hi {
        let first = d.max(0) as usize;
        let last = (del.len() as isize).min(ins.len() as isize + d) as usize;

        let mut run: Vec<f64> = Vec::new();
        let mut run_start = first;
        for i in first..last {
            if deadline.tick() {
                return None;
            }
            let a = del.start + i;
            let b = ins.start + (i as isize - d) as usize;
            match pair_similarity(ctx, a, b) {
                Some(score) => {
                    if run.is_empty() {
                        run_start = i;
                    }
                    run.push(score);
                }
                None => {
                    emit_run(ctx, (source, del), (target, ins), d, run_start, &run, out);
                    run.clear();
                }
            }
        }
        emit_run(ctx, (source, del), (target, ins), d, run_start, &run, out);
    }
    Some(())
}

/// Similarity of original line `a` and modified line `b` when it reaches
/// the threshold.
fn pair_similarity(ctx: &MoveContext<'_>, a: usize, b: usize) -> Option<f64> {
    if ctx.original_ids[a] == ctx.modified_ids[b] {
        return Some(1.0);
    }
    let (la, lb) = (ctx.original.line(a)?, ctx.modified.line(b)?);
    let threshold = ctx.config.similarity_threshold;
    if !ctx.matcher.similar(la, lb, threshold) {
        return None;
    }
    let score = ctx.matcher.similarity(la, lb);
    (score >= threshold).then_some(score)
}

fn emit_run(
    ctx: &MoveContext<'_>,
    (source, del): (usize, OffsetRange),
    (target, ins): (usize, OffsetRange),
    diagonal: isize,
    run_start: usize,
    run: &[f64],
    out: &mut Vec<MoveCandidate>,
) {
    if run.len() < ctx.config.min_block_lines {
        return;
    }

    let original = LineRange::new(del.start + run_start, del.start + run_start + run.len());
    let mod_start = ins.start + (run_start as isize - diagonal) as usize;
    let modified = LineRange::new(mod_start, mod_start + run.len());

    // Inside one diff, a block sitting at the same relative offset on both
    // sides is an in-place edit, not a move.
    if source == target {
        let rel_orig = OffsetRange::new(original.start - del.start, original.end_exclusive - del.start);
        let rel_mod = OffsetRange::new(modified.start - ins.start, modified.end_exclusive - ins.start);
        if rel_orig.overlaps(&rel_mod) {
            return;
        }
    }

    if ctx.original.slice(original).iter().all(|line| line.is_blank()) {
        return;
    }

    let similarity = block_similarity(run.iter().copied());
    if similarity < ctx.config.similarity_threshold {
        return;
    }

    out.push(MoveCandidate {
        original,
        modified,
        similarity,
        source,
        target,
    });
}

// ============================================================================
// Carving
// ============================================================================

/// Remove the moved lines from the diffs they came from.
///
/// What is left of a diff is re-paired in order: the k-th remaining
/// original piece with the k-th remaining modified piece, surplus pieces
/// as pure deletions or insertions anchored after the last paired piece.
fn carve(diffs: &[SequenceDiff], moves: &[MoveCandidate]) -> Vec<SequenceDiff> {
    let mut result = Vec::with_capacity(diffs.len());

    for (index, diff) in diffs.iter().enumerate() {
        let taken_orig: Vec<OffsetRange> = moves
            .iter()
            .filter(|m| m.source == index)
            .map(|m| OffsetRange::from(m.original))
            .collect();
        let taken_mod: Vec<OffsetRange> = moves
            .iter()
            .filter(|m| m.target == index)
            .map(|m| OffsetRange::from(m.modified))
            .collect();

        if taken_orig.is_empty() && taken_mod.is_empty() {
            result.push(*diff);
            continue;
        }

        let orig_pieces = subtract(diff.seq1_range, taken_orig);
        let mod_pieces = subtract(diff.seq2_range, taken_mod);
        let orig_anchor = orig_pieces
            .last()
            .map_or(diff.seq1_range.start, |r| r.end_exclusive);
        let mod_anchor = mod_pieces
            .last()
            .map_or(diff.seq2_range.start, |r| r.end_exclusive);

        for k in 0..orig_pieces.len().max(mod_pieces.len()) {
            let piece = match (orig_pieces.get(k), mod_pieces.get(k)) {
                (Some(o), Some(m)) => SequenceDiff::new(*o, *m),
                (Some(o), None) => SequenceDiff::new(*o, OffsetRange::empty_at(mod_anchor)),
                (None, Some(m)) => SequenceDiff::new(OffsetRange::empty_at(orig_anchor), *m),
                (None, None) => continue,
            };
            result.push(piece);
        }
    }

    result
}

/// `range` minus the (pairwise disjoint) `taken` ranges, in order, without
/// empty pieces.
fn subtract(range: OffsetRange, mut taken: Vec<OffsetRange>) -> Vec<OffsetRange> {
    taken.sort_by_key(|r| r.start);
    let mut pieces = Vec::new();
    let mut cursor = range.start;
    for cut in taken {
        if cut.start > cursor {
            pieces.push(OffsetRange::new(cursor, cut.start));
        }
        cursor = cursor.max(cut.end_exclusive);
    }
    if cursor < range.end_exclusive {
        pieces.push(OffsetRange::new(cursor, range.end_exclusive));
    }
    pieces
}
