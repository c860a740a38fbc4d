//! Line and character diff engine.
//!
//! # Architecture
//!
//! A computation runs in stages, each in its own module:
//!
//! 1. [`algorithm`]: align the two documents line by line (Myers or DP,
//!    picked by size)
//! 2. [`optimize`]: shift and merge the raw hunks into readable ones
//! 3. [`moves`]: optionally pair deleted and inserted blocks as moves
//! 4. [`algorithm`] again, over characters, for every hunk that replaces
//!    lines with other lines
//!
//! All stages share one [`Deadline`](timeout::Deadline). When it expires
//! the stages fall back to coarser but still valid output.
//!
//! # Example
//!
//! ```
//! use linediff::diff::DiffEngine;
//!
//! let engine = DiffEngine::new().compute_moves(true);
//! let result = engine.compute("a\nb\nc\n", "a\nB\nc\n").unwrap();
//!
//! assert_eq!(result.changes.len(), 1);
//! assert_eq!(result.changes[0].original_range.start, 1);
//! assert!(!result.hit_timeout);
//! ```

pub mod algorithm;
mod engine;
mod engine_config;
pub mod moves;
pub mod optimize;
mod result;
pub mod timeout;

pub use algorithm::{AlignmentResult, SequenceDiff, align_by};
pub use engine::DiffEngine;
pub use engine_config::{EngineLimits, MoveDetectionConfig};
pub use moves::{MoveCandidate, move_candidate_order};
pub use optimize::should_join_line_diffs;
pub use result::{DiffResult, DiffSummary};
pub use timeout::{Deadline, POLL_INTERVAL};
