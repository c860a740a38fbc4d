//! **Line and character level text diffing with move detection.**
//!
//! `linediff` compares two texts line by line, refines every replaced block
//! down to the characters that changed, and can recognise blocks of lines
//! that were moved rather than deleted and re-inserted. Work is bounded by a
//! wall-clock budget: when it runs out the engine still returns a valid,
//! coarser result and says so.
//!
//! The crate powers a CLI that speaks a small JSON protocol over
//! stdin/stdout, and can be used directly as a library.
//!
//! ## Core Concepts & Modules
//!
//! - **[`model`]**: [`Document`](model::Document)s of [`Line`](model::Line)s,
//!   line and text ranges, and the mappings a diff is made of.
//! - **[`matching`]**: how two lines are compared: whitespace policy, line
//!   interning and similarity scores.
//! - **[`diff`]**: the [`DiffEngine`] and its stages: sequence alignment
//!   (Myers and dynamic programming), hunk optimization, move detection and
//!   the time budget.
//! - **[`config`]**: options, presets and `.linediff.yaml` config files.
//! - **[`pipeline`]**: the JSON request/response protocol and its failure
//!   boundary.
//!
//! ## Getting Started
//!
//! ```
//! use linediff::DiffEngine;
//!
//! let original = "fn main() {\n    println!(\"hi\");\n}\n";
//! let modified = "fn main() {\n    println!(\"hello\");\n}\n";
//!
//! let result = DiffEngine::new().compute(original, modified).unwrap();
//!
//! assert_eq!(result.changes.len(), 1);
//! let change = &result.changes[0];
//! assert_eq!((change.original_range.start, change.original_range.end_exclusive), (1, 2));
//! assert!(!change.inner_changes.is_empty());
//! ```
//!
//! ### Answering a JSON request
//!
//! ```
//! use linediff::config::AppConfig;
//! use linediff::pipeline::respond;
//!
//! let body = br#"{"original": "a\nb\n", "modified": "b\na\n", "options": {"computeMoves": true}}"#;
//! let response = respond(body, &AppConfig::default());
//! assert!(response.is_success());
//! ```

// Lint to discourage unwrap() in production code - prefer explicit error handling
#![warn(clippy::unwrap_used)]
// Pedantic lints: allow categories that are design choices for this codebase
#![allow(
    // Offsets move between usize and isize when diffs are shifted, and
    // similarity scores are computed from lengths
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::too_many_lines,
    // Config structs use several bools for independent flags
    clippy::struct_excessive_bools,
    // Variable names like `seq1`/`seq2` or `orig`/`modi` are clear in context
    clippy::similar_names
)]

pub mod cli;
pub mod config;
pub mod diff;
pub mod error;
pub mod matching;
pub mod model;
pub mod pipeline;

// Re-export main types for convenience
pub use config::{AppConfig, AppConfigBuilder, ConfigPreset, DiffOptions};
pub use config::{BehaviorConfig, OutputConfig};
pub use config::{ConfigError, Validatable};
pub use diff::{DiffEngine, DiffResult, DiffSummary, EngineLimits, MoveDetectionConfig};
pub use error::{ErrorContext, LineDiffError, Result};
pub use matching::{LineMatcher, TextLineMatcher, WhitespacePolicy};
pub use model::{
    Document, Line, LineRange, LineRangeMapping, MovedText, Position, RangeMapping, Side,
    TextRange,
};
pub use pipeline::{DiffRequest, DiffResponse, respond};
