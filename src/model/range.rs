//! Half-open ranges at line, offset and character-position granularity.

use serde::{Deserialize, Serialize};

/// A half-open range `[start, end_exclusive)` of element offsets.
///
/// This is the unit the sequence aligner works in; it has no notion of
/// lines or columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct OffsetRange {
    pub start: usize,
    pub end_exclusive: usize,
}

impl OffsetRange {
    #[must_use]
    pub fn new(start: usize, end_exclusive: usize) -> Self {
        debug_assert!(start <= end_exclusive, "invalid range [{start}, {end_exclusive})");
        Self {
            start,
            end_exclusive: end_exclusive.max(start),
        }
    }

    /// Empty range positioned at `offset`.
    #[must_use]
    pub const fn empty_at(offset: usize) -> Self {
        Self {
            start: offset,
            end_exclusive: offset,
        }
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.end_exclusive - self.start
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end_exclusive
    }

    /// Shift both ends by `delta`.
    #[must_use]
    pub fn delta(&self, delta: isize) -> Self {
        Self::new(
            self.start.saturating_add_signed(delta),
            self.end_exclusive.saturating_add_signed(delta),
        )
    }

    /// Smallest range covering both.
    #[must_use]
    pub fn join(&self, other: &Self) -> Self {
        Self::new(
            self.start.min(other.start),
            self.end_exclusive.max(other.end_exclusive),
        )
    }

    /// True when the ranges share at least one offset.
    #[must_use]
    pub const fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end_exclusive && other.start < self.end_exclusive
    }
}

/// A half-open range of 0-based line numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineRange {
    pub start: usize,
    pub end_exclusive: usize,
}

impl LineRange {
    #[must_use]
    pub fn new(start: usize, end_exclusive: usize) -> Self {
        debug_assert!(start <= end_exclusive, "invalid line range [{start}, {end_exclusive})");
        Self {
            start,
            end_exclusive: end_exclusive.max(start),
        }
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.end_exclusive - self.start
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end_exclusive
    }

    #[must_use]
    pub const fn contains(&self, line: usize) -> bool {
        self.start <= line && line < self.end_exclusive
    }

    #[must_use]
    pub const fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end_exclusive && other.start < self.end_exclusive
    }

    /// Smallest range covering both.
    #[must_use]
    pub fn join(&self, other: &Self) -> Self {
        Self::new(
            self.start.min(other.start),
            self.end_exclusive.max(other.end_exclusive),
        )
    }

    /// Every line number in the range.
    #[must_use]
    pub const fn iter(&self) -> std::ops::Range<usize> {
        self.start..self.end_exclusive
    }

    /// Position bounds `[(start, 0), (end_exclusive, 0)]` used for
    /// inner-change containment checks.
    #[must_use]
    pub const fn position_bounds(&self) -> (Position, Position) {
        (
            Position::new(self.start, 0),
            Position::new(self.end_exclusive, 0),
        )
    }
}

impl From<OffsetRange> for LineRange {
    fn from(range: OffsetRange) -> Self {
        Self::new(range.start, range.end_exclusive)
    }
}

impl From<LineRange> for OffsetRange {
    fn from(range: LineRange) -> Self {
        Self::new(range.start, range.end_exclusive)
    }
}

impl std::fmt::Display for LineRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.start, self.end_exclusive)
    }
}

/// A 0-based line/column position. Columns count Unicode scalar values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    #[must_use]
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// A half-open character range `[start, end)` that may span lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "TextRangeRepr", into = "TextRangeRepr")]
pub struct TextRange {
    pub start: Position,
    pub end: Position,
}

impl TextRange {
    #[must_use]
    pub fn new(start: Position, end: Position) -> Self {
        debug_assert!(start <= end, "invalid text range {start:?}..{end:?}");
        Self {
            start,
            end: end.max(start),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// True when `self` lies within `[lower, upper]`.
    #[must_use]
    pub fn is_within(&self, lower: Position, upper: Position) -> bool {
        lower <= self.start && self.end <= upper
    }
}

impl std::fmt::Display for TextRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}:{}, {}:{})",
            self.start.line, self.start.column, self.end.line, self.end.column
        )
    }
}

/// Flat wire shape of a [`TextRange`].
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TextRangeRepr {
    start_line: usize,
    start_column: usize,
    end_line: usize,
    end_column: usize,
}

impl From<TextRangeRepr> for TextRange {
    fn from(repr: TextRangeRepr) -> Self {
        let start = Position::new(repr.start_line, repr.start_column);
        let end = Position::new(repr.end_line, repr.end_column);
        Self {
            start,
            end: end.max(start),
        }
    }
}

impl From<TextRange> for TextRangeRepr {
    fn from(range: TextRange) -> Self {
        Self {
            start_line: range.start.line,
            start_column: range.start.column,
            end_line: range.end.line,
            end_column: range.end.column,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_range_basics() {
        let r = OffsetRange::new(2, 5);
        assert_eq!(r.len(), 3);
        assert_eq!(r.delta(-2), OffsetRange::new(0, 3));
        assert!(OffsetRange::empty_at(4).is_empty());
    }

    #[test]
    fn test_offset_range_overlap_and_join() {
        let a = OffsetRange::new(0, 3);
        let b = OffsetRange::new(3, 6);
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&OffsetRange::new(2, 4)));
        assert_eq!(a.join(&b), OffsetRange::new(0, 6));
    }

    #[test]
    fn test_line_range_position_bounds() {
        let (lo, hi) = LineRange::new(3, 5).position_bounds();
        assert_eq!(lo, Position::new(3, 0));
        assert_eq!(hi, Position::new(5, 0));
        let inner = TextRange::new(Position::new(3, 4), Position::new(4, 10));
        assert!(inner.is_within(lo, hi));
        let outside = TextRange::new(Position::new(5, 0), Position::new(5, 1));
        assert!(!outside.is_within(lo, hi));
    }

    #[test]
    fn test_positions_order_by_line_then_column() {
        assert!(Position::new(1, 9) < Position::new(2, 0));
        assert!(Position::new(2, 1) > Position::new(2, 0));
    }

    #[test]
    fn test_text_range_wire_shape() {
        let range = TextRange::new(Position::new(0, 1), Position::new(2, 3));
        let json = serde_json::to_value(range).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({"startLine": 0, "startColumn": 1, "endLine": 2, "endColumn": 3})
        );
        let back: TextRange = serde_json::from_value(json).expect("deserialize");
        assert_eq!(back, range);
    }

    #[test]
    fn test_line_range_wire_shape() {
        let json = serde_json::to_value(LineRange::new(4, 4)).expect("serialize");
        assert_eq!(json, serde_json::json!({"start": 4, "endExclusive": 4}));
    }
}
