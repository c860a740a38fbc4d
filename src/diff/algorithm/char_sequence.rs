//! Characters of a block of lines, for the second alignment pass.

use super::DiffSequence;
use crate::matching::WhitespacePolicy;
use crate::model::{Line, OffsetRange, Position, TextRange};

/// The characters of consecutive lines, joined by `\n`.
///
/// A `\n` element is emitted after every line that had a break, so a
/// missing final newline shows up as a deleted or inserted `\n`. Under
/// [`WhitespacePolicy::IgnoreTrim`] each line contributes only its trimmed
/// content; positions still refer to columns of the untrimmed line.
#[derive(Debug, Clone)]
pub struct CharSequence {
    chars: Vec<char>,
    starts: Vec<Position>,
    ends: Vec<Position>,
    origin: Position,
}

impl CharSequence {
    /// Build from `lines`, the first of which is document line `first_line`.
    #[must_use]
    pub fn new(lines: &[Line], first_line: usize, policy: WhitespacePolicy) -> Self {
        let capacity = lines.iter().map(|l| l.text.len() + 1).sum();
        let mut chars = Vec::with_capacity(capacity);
        let mut starts = Vec::with_capacity(capacity);
        let mut ends = Vec::with_capacity(capacity);
        let mut origin = Position::new(first_line, 0);

        for (i, line) in lines.iter().enumerate() {
            let line_no = first_line + i;
            let (lead, content) = if policy.ignores_trim() {
                (line.indentation(), line.trimmed())
            } else {
                (0, line.text.as_str())
            };
            if i == 0 {
                origin = Position::new(line_no, lead);
            }

            let mut column = lead;
            for c in content.chars() {
                chars.push(c);
                starts.push(Position::new(line_no, column));
                column += 1;
                ends.push(Position::new(line_no, column));
            }
            if line.ends_with_line_break {
                chars.push('\n');
                starts.push(Position::new(line_no, column));
                ends.push(Position::new(line_no + 1, 0));
            }
        }

        Self {
            chars,
            starts,
            ends,
            origin,
        }
    }

    #[must_use]
    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    /// Document positions spanned by an element range.
    ///
    /// An empty range maps to the position right after the preceding
    /// element.
    #[must_use]
    pub fn text_range(&self, range: OffsetRange) -> TextRange {
        if range.is_empty() {
            let at = match range.start {
                0 => self.origin,
                k => self.ends[k - 1],
            };
            return TextRange::new(at, at);
        }
        TextRange::new(self.starts[range.start], self.ends[range.end_exclusive - 1])
    }

    /// The maximal run of word or whitespace characters containing
    /// `offset`.
    #[must_use]
    pub fn word_at(&self, offset: usize) -> OffsetRange {
        let class = is_word_char(self.chars[offset]);
        let mut start = offset;
        while start > 0 && is_word_char(self.chars[start - 1]) == class {
            start -= 1;
        }
        let mut end = offset + 1;
        while end < self.chars.len() && is_word_char(self.chars[end]) == class {
            end += 1;
        }
        OffsetRange::new(start, end)
    }

    /// True when `offset` sits strictly inside a word or whitespace run.
    #[must_use]
    pub fn splits_run_at(&self, offset: usize) -> bool {
        offset > 0
            && offset < self.chars.len()
            && is_word_char(self.chars[offset - 1]) == is_word_char(self.chars[offset])
    }
}

fn is_word_char(c: char) -> bool {
    !c.is_whitespace()
}

impl DiffSequence for CharSequence {
    fn len(&self) -> usize {
        self.chars.len()
    }

    fn is_same(&self, offset: usize, other: &Self, other_offset: usize) -> bool {
        self.chars[offset] == other.chars[other_offset]
    }
}
