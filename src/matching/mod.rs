//! Similarity and equality oracle for lines.
//!
//! The aligner never compares text directly: lines are interned into
//! integer ids by a [`LineInterner`] so equality is a `u32` comparison.
//! Similarity scores are only needed by heuristics (move detection).
//!
//! # Example
//!
//! ```
//! use linediff::matching::{LineMatcher, TextLineMatcher, WhitespacePolicy};
//! use linediff::model::{Document, Side};
//!
//! let a = Document::tokenize(Side::Original, "  foo(1);\n");
//! let b = Document::tokenize(Side::Modified, "foo(1);\n");
//!
//! let matcher = TextLineMatcher::new(WhitespacePolicy::IgnoreTrim);
//! assert!(matcher.equal(&a.lines()[0], &b.lines()[0]));
//! ```

mod equality;
pub mod string_similarity;

pub use equality::{LineInterner, WhitespacePolicy, lines_equal};
pub use string_similarity::{block_similarity, line_similarity, lines_similar, text_similarity};

use crate::model::Line;

/// Pluggable line comparison used by the move detector.
pub trait LineMatcher: Send + Sync {
    /// Exact equality under the matcher's whitespace policy.
    fn equal(&self, a: &Line, b: &Line) -> bool;

    /// Similarity in `[0.0, 1.0]`.
    fn similarity(&self, a: &Line, b: &Line) -> f64;

    /// True when `similarity(a, b) >= threshold`. Implementations may
    /// short-circuit.
    fn similar(&self, a: &Line, b: &Line, threshold: f64) -> bool {
        self.similarity(a, b) >= threshold
    }

    /// Name for logging/debugging.
    fn name(&self) -> &str;
}

/// Default matcher: whitespace-policy equality, Levenshtein similarity.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextLineMatcher {
    policy: WhitespacePolicy,
}

impl TextLineMatcher {
    #[must_use]
    pub const fn new(policy: WhitespacePolicy) -> Self {
        Self { policy }
    }

    #[must_use]
    pub const fn policy(&self) -> WhitespacePolicy {
        self.policy
    }
}

impl LineMatcher for TextLineMatcher {
    fn equal(&self, a: &Line, b: &Line) -> bool {
        lines_equal(a, b, self.policy.ignores_trim())
    }

    fn similarity(&self, a: &Line, b: &Line) -> f64 {
        if self.equal(a, b) {
            return 1.0;
        }
        line_similarity(a, b)
    }

    fn similar(&self, a: &Line, b: &Line, threshold: f64) -> bool {
        self.equal(a, b) || lines_similar(a, b, threshold)
    }

    fn name(&self) -> &'static str {
        "text"
    }
}
