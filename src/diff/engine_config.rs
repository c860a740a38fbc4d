//! Tuning knobs for the diff engine.

use crate::config::{DEFAULT_MIN_BLOCK_LINES, DEFAULT_MOVE_SIMILARITY_THRESHOLD};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Size limits that pick between the alignment algorithms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct EngineLimits {
    /// Largest `lines1 * lines2` table aligned with the quadratic DP
    /// algorithm; bigger inputs use Myers
    pub line_dp_cell_limit: usize,
    /// Same limit for the character pass inside a changed block
    pub char_dp_cell_limit: usize,
}

impl Default for EngineLimits {
    fn default() -> Self {
        Self {
            line_dp_cell_limit: 1_000_000,
            char_dp_cell_limit: 62_500,
        }
    }
}

impl EngineLimits {
    /// Prefer Myers everywhere except tiny inputs
    #[must_use]
    pub fn fast() -> Self {
        Self {
            line_dp_cell_limit: 10_000,
            char_dp_cell_limit: 2_500,
        }
    }

    /// Larger DP tables, for inputs where stable tie-breaks matter more than
    /// speed
    #[must_use]
    pub fn thorough() -> Self {
        Self {
            line_dp_cell_limit: 4_000_000,
            char_dp_cell_limit: 250_000,
        }
    }
}

/// Parameters of the move detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct MoveDetectionConfig {
    /// Minimum line similarity (0.0-1.0) for two lines to pair up inside a
    /// moved block
    pub similarity_threshold: f64,
    /// Minimum number of lines in a moved block
    pub min_block_lines: usize,
}

impl Default for MoveDetectionConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: DEFAULT_MOVE_SIMILARITY_THRESHOLD,
            min_block_lines: DEFAULT_MIN_BLOCK_LINES,
        }
    }
}

impl MoveDetectionConfig {
    /// Only verbatim moves (after the whitespace policy)
    #[must_use]
    pub fn exact() -> Self {
        Self {
            similarity_threshold: 1.0,
            ..Self::default()
        }
    }
}
