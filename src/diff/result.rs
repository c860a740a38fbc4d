//! Diff result structures.

use crate::error::{LineDiffError, Result};
use crate::matching::lines_equal;
use crate::model::{Document, LineRange, LineRangeMapping, MovedText, Side};
use serde::{Deserialize, Serialize};

/// Complete result of one diff computation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[must_use]
pub struct DiffResult {
    /// Hunks in document order; moved lines are not repeated here
    pub changes: Vec<LineRangeMapping>,
    /// Relocated blocks, ordered by original position
    pub moves: Vec<MovedText>,
    /// The time budget ran out and a coarser result was returned
    pub hit_timeout: bool,
}

/// Summary statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffSummary {
    pub total_changes: usize,
    pub insertions: usize,
    pub deletions: usize,
    pub modifications: usize,
    /// Lines only present in the modified document (outside moves)
    pub lines_added: usize,
    /// Lines only present in the original document (outside moves)
    pub lines_removed: usize,
    pub moves: usize,
    pub moved_lines: usize,
    pub inner_changes: usize,
    pub hit_timeout: bool,
}

impl DiffResult {
    /// Create an empty result
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if there are any changes
    #[must_use]
    pub fn has_changes(&self) -> bool {
        !self.changes.is_empty() || !self.moves.is_empty()
    }

    #[must_use]
    pub fn summary(&self) -> DiffSummary {
        let mut summary = DiffSummary {
            total_changes: self.changes.len(),
            moves: self.moves.len(),
            hit_timeout: self.hit_timeout,
            ..DiffSummary::default()
        };
        for change in &self.changes {
            if change.is_insertion() {
                summary.insertions += 1;
            } else if change.is_deletion() {
                summary.deletions += 1;
            } else {
                summary.modifications += 1;
            }
            summary.lines_added += change.modified_range.len();
            summary.lines_removed += change.original_range.len();
            summary.inner_changes += change.inner_changes.len();
        }
        summary.moved_lines = self.moves.iter().map(|m| m.original_range.len()).sum();
        summary
    }

    /// Check the structural invariants against the inputs.
    ///
    /// - changes are sorted and disjoint on both sides, and in bounds
    /// - every inner change lies within its parent's line span
    /// - moved blocks do not overlap each other or any change
    /// - the lines touched by neither a change nor a move are equal, in
    ///   order, on both sides
    ///
    /// # Errors
    ///
    /// Returns an invariant violation describing the first broken rule.
    pub fn validate(
        &self,
        original: &Document,
        modified: &Document,
        ignore_trim_whitespace: bool,
    ) -> Result<()> {
        check_mappings(&self.changes, original.len(), modified.len(), "change")?;

        for (i, moved) in self.moves.iter().enumerate() {
            if moved.original_range.end_exclusive > original.len()
                || moved.modified_range.end_exclusive > modified.len()
            {
                return Err(LineDiffError::invariant(format!(
                    "move {i} is out of bounds: {} -> {}",
                    moved.original_range, moved.modified_range
                )));
            }
            check_mappings(&moved.changes, original.len(), modified.len(), "move change")?;
            for change in &moved.changes {
                if !within(&change.original_range, &moved.original_range)
                    || !within(&change.modified_range, &moved.modified_range)
                {
                    return Err(LineDiffError::invariant(format!(
                        "move {i} has a change outside the block: {change}"
                    )));
                }
            }
        }

        let mut touched_original = vec![false; original.len()];
        let mut touched_modified = vec![false; modified.len()];
        let spans = self
            .changes
            .iter()
            .map(|c| (c.original_range, c.modified_range))
            .chain(self.moves.iter().map(|m| (m.original_range, m.modified_range)));
        for (orig, modi) in spans {
            mark(&mut touched_original, orig, original.side())?;
            mark(&mut touched_modified, modi, modified.side())?;
        }

        let kept_original = original
            .lines()
            .iter()
            .zip(&touched_original)
            .filter_map(|(line, touched)| (!touched).then_some(line));
        let mut kept_modified = modified
            .lines()
            .iter()
            .zip(&touched_modified)
            .filter_map(|(line, touched)| (!touched).then_some(line));

        for a in kept_original {
            match kept_modified.next() {
                Some(b) if lines_equal(a, b, ignore_trim_whitespace) => {}
                Some(b) => {
                    return Err(LineDiffError::invariant(format!(
                        "unchanged original line {} differs from modified line {}",
                        a.index, b.index
                    )));
                }
                None => {
                    return Err(LineDiffError::invariant(format!(
                        "unchanged original line {} has no counterpart",
                        a.index
                    )));
                }
            }
        }
        if let Some(b) = kept_modified.next() {
            return Err(LineDiffError::invariant(format!(
                "unchanged modified line {} has no counterpart",
                b.index
            )));
        }

        Ok(())
    }
}

fn within(inner: &LineRange, outer: &LineRange) -> bool {
    outer.start <= inner.start && inner.end_exclusive <= outer.end_exclusive
}

fn check_mappings(
    mappings: &[LineRangeMapping],
    original_len: usize,
    modified_len: usize,
    what: &str,
) -> Result<()> {
    for (i, mapping) in mappings.iter().enumerate() {
        if mapping.is_empty() {
            return Err(LineDiffError::invariant(format!("{what} {i} is empty")));
        }
        if mapping.original_range.end_exclusive > original_len
            || mapping.modified_range.end_exclusive > modified_len
        {
            return Err(LineDiffError::invariant(format!(
                "{what} {i} is out of bounds: {mapping}"
            )));
        }

        let (orig_lo, orig_hi) = mapping.original_range.position_bounds();
        let (mod_lo, mod_hi) = mapping.modified_range.position_bounds();
        for inner in &mapping.inner_changes {
            if !inner.original_range.is_within(orig_lo, orig_hi)
                || !inner.modified_range.is_within(mod_lo, mod_hi)
            {
                return Err(LineDiffError::invariant(format!(
                    "{what} {i} has an inner change outside its lines: {inner}"
                )));
            }
        }
    }

    for (i, pair) in mappings.windows(2).enumerate() {
        let (a, b) = (&pair[0], &pair[1]);
        if a.original_range.end_exclusive > b.original_range.start
            || a.modified_range.end_exclusive > b.modified_range.start
        {
            return Err(LineDiffError::invariant(format!(
                "{what}s {i} and {} are out of order or overlap: {a} / {b}",
                i + 1
            )));
        }
    }
    Ok(())
}

fn mark(touched: &mut [bool], range: LineRange, side: Side) -> Result<()> {
    for line in range.iter() {
        let slot = touched.get_mut(line).ok_or_else(|| {
            LineDiffError::invariant(format!("{side} line {line} is out of bounds"))
        })?;
        if *slot {
            return Err(LineDiffError::invariant(format!(
                "{side} line {line} is covered twice"
            )));
        }
        *slot = true;
    }
    Ok(())
}
