//! Quadratic LCS alignment for small inputs.

use super::{AlignmentResult, DiffSequence, SequenceDiff, SequenceDiffAlgorithm};
use crate::diff::timeout::Deadline;
use crate::model::OffsetRange;

/// Full LCS table, then a forward trace.
///
/// The trace takes a match whenever the elements are equal (always on some
/// optimal path) and, at a mismatch where both moves are optimal, deletes
/// from the first sequence before inserting from the second.
#[derive(Debug, Clone, Copy, Default)]
pub struct DynamicProgrammingDiffing;

impl SequenceDiffAlgorithm for DynamicProgrammingDiffing {
    fn compute<S: DiffSequence + ?Sized>(
        &self,
        seq1: &S,
        seq2: &S,
        deadline: &Deadline,
    ) -> AlignmentResult {
        let (n, m) = (seq1.len(), seq2.len());
        if n == 0 || m == 0 {
            return AlignmentResult::trivial(n, m, false);
        }

        // lcs[i * width + j] = LCS length of seq1[i..] and seq2[j..]
        let width = m + 1;
        let mut lcs = vec![0u32; (n + 1) * width];
        for i in (0..n).rev() {
            for j in (0..m).rev() {
                if deadline.tick() {
                    tracing::debug!(n, m, "dp table interrupted by deadline");
                    return AlignmentResult::trivial(n, m, true);
                }
                lcs[i * width + j] = if seq1.is_same(i, seq2, j) {
                    lcs[(i + 1) * width + j + 1] + 1
                } else {
                    lcs[(i + 1) * width + j].max(lcs[i * width + j + 1])
                };
            }
        }

        let mut diffs = Vec::new();
        let mut open: Option<(usize, usize)> = None;
        let (mut i, mut j) = (0, 0);

        while i < n && j < m {
            if seq1.is_same(i, seq2, j) {
                if let Some((start1, start2)) = open.take() {
                    diffs.push(SequenceDiff::new(
                        OffsetRange::new(start1, i),
                        OffsetRange::new(start2, j),
                    ));
                }
                i += 1;
                j += 1;
                continue;
            }
            open.get_or_insert((i, j));
            if lcs[(i + 1) * width + j] >= lcs[i * width + j + 1] {
                i += 1;
            } else {
                j += 1;
            }
        }

        if let Some((start1, start2)) = open.or_else(|| (i < n || j < m).then_some((i, j))) {
            diffs.push(SequenceDiff::new(
                OffsetRange::new(start1, n),
                OffsetRange::new(start2, m),
            ));
        }

        AlignmentResult::new(diffs, false)
    }
}
