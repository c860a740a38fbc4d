//! Documents and the line tokenizer.

use super::LineRange;
use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3::xxh3_64;

/// Which input a document was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Original,
    Modified,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Original => write!(f, "original"),
            Self::Modified => write!(f, "modified"),
        }
    }
}

/// A single line of a [`Document`], without its line break.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Line {
    /// 0-based position in the document
    pub index: usize,
    /// Line content, excluding the break
    pub text: String,
    /// Whether a line break (`\n`, `\r\n` or `\r`) followed this line
    pub ends_with_line_break: bool,
}

impl Line {
    /// Content with leading and trailing whitespace removed.
    #[must_use]
    pub fn trimmed(&self) -> &str {
        self.text.trim()
    }

    /// True when the line has no non-whitespace content.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Number of leading whitespace characters.
    #[must_use]
    pub fn indentation(&self) -> usize {
        self.text.chars().take_while(|c| c.is_whitespace()).count()
    }
}

/// An immutable, tokenized text.
///
/// Empty input yields a document with zero lines. A trailing line break
/// does not create an extra empty line; it is recorded on the last line
/// instead, so `"a\n"` and `"a"` both have one line and differ only in
/// [`Line::ends_with_line_break`].
#[derive(Debug, Clone)]
pub struct Document {
    side: Side,
    lines: Vec<Line>,
    content_hash: u64,
}

impl Document {
    /// Split `text` into lines on `\r\n`, `\n` and lone `\r`.
    #[must_use]
    pub fn tokenize(side: Side, text: &str) -> Self {
        let mut lines = Vec::new();
        let mut rest = text;

        while !rest.is_empty() {
            match rest.find(['\n', '\r']) {
                Some(pos) => {
                    let break_len = if rest[pos..].starts_with("\r\n") { 2 } else { 1 };
                    lines.push(Line {
                        index: lines.len(),
                        text: rest[..pos].to_string(),
                        ends_with_line_break: true,
                    });
                    rest = &rest[pos + break_len..];
                }
                None => {
                    lines.push(Line {
                        index: lines.len(),
                        text: rest.to_string(),
                        ends_with_line_break: false,
                    });
                    rest = "";
                }
            }
        }

        Self {
            side,
            lines,
            content_hash: xxh3_64(text.as_bytes()),
        }
    }

    #[must_use]
    pub const fn side(&self) -> Side {
        self.side
    }

    #[must_use]
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    #[must_use]
    pub fn line(&self, index: usize) -> Option<&Line> {
        self.lines.get(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// xxh3 hash of the raw input text.
    #[must_use]
    pub const fn content_hash(&self) -> u64 {
        self.content_hash
    }

    /// Lines covered by `range`, clamped to the document.
    #[must_use]
    pub fn slice(&self, range: LineRange) -> &[Line] {
        let end = range.end_exclusive.min(self.lines.len());
        let start = range.start.min(end);
        &self.lines[start..end]
    }

    /// Full range `[0, len)`.
    #[must_use]
    pub fn full_range(&self) -> LineRange {
        LineRange::new(0, self.lines.len())
    }

    /// Reassemble the text, using `\n` for every recorded line break.
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(&line.text);
            if line.ends_with_line_break {
                out.push('\n');
            }
        }
        out
    }
}
