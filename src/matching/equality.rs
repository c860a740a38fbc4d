//! Line equality under a whitespace policy, and stable line identifiers.

use crate::model::{Document, Line};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// How leading and trailing whitespace takes part in line equality.
///
/// Internal whitespace runs are always significant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WhitespacePolicy {
    /// Lines must match byte for byte
    #[default]
    Significant,
    /// Leading/trailing whitespace is stripped before comparing
    IgnoreTrim,
}

impl WhitespacePolicy {
    #[must_use]
    pub const fn from_ignore_trim(ignore_trim_whitespace: bool) -> Self {
        if ignore_trim_whitespace {
            Self::IgnoreTrim
        } else {
            Self::Significant
        }
    }

    #[must_use]
    pub const fn ignores_trim(self) -> bool {
        matches!(self, Self::IgnoreTrim)
    }

    /// The part of `text` that takes part in comparisons.
    #[must_use]
    pub fn normalize(self, text: &str) -> &str {
        match self {
            Self::Significant => text,
            Self::IgnoreTrim => text.trim(),
        }
    }
}

/// Compare two lines under the given whitespace setting.
///
/// The trailing-break flag is part of equality so that a missing final
/// newline shows up as a change of the last line.
#[must_use]
pub fn lines_equal(a: &Line, b: &Line, ignore_trim_whitespace: bool) -> bool {
    let policy = WhitespacePolicy::from_ignore_trim(ignore_trim_whitespace);
    a.ends_with_line_break == b.ends_with_line_break
        && policy.normalize(&a.text) == policy.normalize(&b.text)
}

/// Assigns each distinct line (under a policy) a stable `u32` id.
///
/// Two lines get the same id exactly when [`lines_equal`] holds for them.
/// Ids are handed out in first-seen order, original document first.
#[derive(Debug)]
pub struct LineInterner<'a> {
    policy: WhitespacePolicy,
    keys: IndexSet<(&'a str, bool)>,
}

impl<'a> LineInterner<'a> {
    #[must_use]
    pub fn new(policy: WhitespacePolicy) -> Self {
        Self {
            policy,
            keys: IndexSet::new(),
        }
    }

    /// Id of `line`, allocating a new one if needed.
    pub fn intern(&mut self, line: &'a Line) -> u32 {
        let key = (self.policy.normalize(&line.text), line.ends_with_line_break);
        let (index, _) = self.keys.insert_full(key);
        u32::try_from(index).unwrap_or(u32::MAX)
    }

    /// Ids for every line of `document`.
    pub fn intern_document(&mut self, document: &'a Document) -> Vec<u32> {
        document.lines().iter().map(|line| self.intern(line)).collect()
    }

    /// Number of distinct lines seen so far.
    #[must_use]
    pub fn distinct(&self) -> usize {
        self.keys.len()
    }
}
