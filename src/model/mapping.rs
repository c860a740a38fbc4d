//! Mappings between the original and modified documents.

use super::{LineRange, TextRange};
use serde::{Deserialize, Serialize};

/// A character-granularity change nested inside a [`LineRangeMapping`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeMapping {
    pub original_range: TextRange,
    pub modified_range: TextRange,
}

impl RangeMapping {
    #[must_use]
    pub const fn new(original_range: TextRange, modified_range: TextRange) -> Self {
        Self {
            original_range,
            modified_range,
        }
    }
}

impl std::fmt::Display for RangeMapping {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.original_range, self.modified_range)
    }
}

/// A hunk: a range of original lines replaced by a range of modified lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineRangeMapping {
    pub original_range: LineRange,
    pub modified_range: LineRange,
    #[serde(default)]
    pub inner_changes: Vec<RangeMapping>,
}

impl LineRangeMapping {
    #[must_use]
    pub const fn new(original_range: LineRange, modified_range: LineRange) -> Self {
        Self {
            original_range,
            modified_range,
            inner_changes: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_inner_changes(mut self, inner_changes: Vec<RangeMapping>) -> Self {
        self.inner_changes = inner_changes;
        self
    }

    /// Lines only added.
    #[must_use]
    pub const fn is_insertion(&self) -> bool {
        self.original_range.is_empty() && !self.modified_range.is_empty()
    }

    /// Lines only removed.
    #[must_use]
    pub const fn is_deletion(&self) -> bool {
        !self.original_range.is_empty() && self.modified_range.is_empty()
    }

    /// Both sides non-empty.
    #[must_use]
    pub const fn is_modification(&self) -> bool {
        !self.original_range.is_empty() && !self.modified_range.is_empty()
    }

    /// Neither side covers any line.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.original_range.is_empty() && self.modified_range.is_empty()
    }
}

impl std::fmt::Display for LineRangeMapping {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} -> {} ({} inner)",
            self.original_range,
            self.modified_range,
            self.inner_changes.len()
        )
    }
}

/// A block of lines relocated from one place to another.
///
/// `changes` describes edits inside the moved block, using absolute line
/// numbers of the original and modified documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovedText {
    pub original_range: LineRange,
    pub modified_range: LineRange,
    #[serde(default)]
    pub changes: Vec<LineRangeMapping>,
}

impl MovedText {
    #[must_use]
    pub const fn new(original_range: LineRange, modified_range: LineRange) -> Self {
        Self {
            original_range,
            modified_range,
            changes: Vec::new(),
        }
    }

    /// True when the block moved without any interior edits.
    #[must_use]
    pub fn is_verbatim(&self) -> bool {
        self.changes.is_empty()
    }
}
