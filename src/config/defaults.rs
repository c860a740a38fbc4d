//! Default configurations and presets for linediff.
//!
//! Provides named presets for common use cases and default values.

use super::types::{AppConfig, BehaviorConfig, DiffOptions, OutputConfig};
use crate::diff::{EngineLimits, MoveDetectionConfig};
use crate::error::{LineDiffError, Result};

// ============================================================================
// Default Values
// ============================================================================

/// Time budget of a request that does not set one.
pub const DEFAULT_MAX_COMPUTATION_TIME_MS: u64 = 5000;

/// Minimum similarity for lines to pair up inside a moved block.
pub const DEFAULT_MOVE_SIMILARITY_THRESHOLD: f64 = 0.9;

/// Minimum size of a moved block.
pub const DEFAULT_MIN_BLOCK_LINES: usize = 3;

// ============================================================================
// Configuration Presets
// ============================================================================

/// Named configuration presets for common use cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigPreset {
    /// Exact comparison, no move detection
    Default,
    /// Indentation and trailing blanks do not count as changes
    WhitespaceInsensitive,
    /// Detect moved blocks, including slightly edited ones
    Moves,
    /// Small time budget and Myers everywhere, for large inputs
    Fast,
}

impl ConfigPreset {
    /// Get the preset name as a string.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::WhitespaceInsensitive => "whitespace-insensitive",
            Self::Moves => "moves",
            Self::Fast => "fast",
        }
    }

    /// Parse a preset from a string name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "default" | "exact" => Some(Self::Default),
            "whitespace-insensitive" | "ignore-whitespace" | "ws" => {
                Some(Self::WhitespaceInsensitive)
            }
            "moves" | "move-detection" => Some(Self::Moves),
            "fast" | "large" => Some(Self::Fast),
            _ => None,
        }
    }

    /// Parse a preset name, listing the known names on failure.
    pub fn parse(name: &str) -> Result<Self> {
        Self::from_name(name).ok_or_else(|| {
            let known: Vec<&str> = Self::all().iter().map(Self::name).collect();
            LineDiffError::config(format!(
                "unknown preset '{name}'; expected one of: {}",
                known.join(", ")
            ))
        })
    }

    /// Get a description of this preset.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Default => "Exact line comparison without move detection",
            Self::WhitespaceInsensitive => {
                "Ignore leading and trailing whitespace, widen inner changes to words"
            }
            Self::Moves => "Report relocated blocks of three or more lines as moves",
            Self::Fast => "One second budget and linear-space alignment for big files",
        }
    }

    /// Get all available presets.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Default,
            Self::WhitespaceInsensitive,
            Self::Moves,
            Self::Fast,
        ]
    }
}

impl std::fmt::Display for ConfigPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ============================================================================
// Preset Implementations
// ============================================================================

impl AppConfig {
    /// Create an `AppConfig` from a named preset.
    #[must_use]
    pub fn from_preset(preset: ConfigPreset) -> Self {
        match preset {
            ConfigPreset::Default => Self::default(),
            ConfigPreset::WhitespaceInsensitive => Self::whitespace_insensitive_preset(),
            ConfigPreset::Moves => Self::moves_preset(),
            ConfigPreset::Fast => Self::fast_preset(),
        }
    }

    #[must_use]
    pub fn whitespace_insensitive_preset() -> Self {
        Self {
            diff: DiffOptions {
                ignore_trim_whitespace: true,
                ..DiffOptions::default()
            },
            ..Self::default()
        }
    }

    /// Move detection preset.
    ///
    /// - Moves on, default similarity threshold
    /// - Whitespace-insensitive, since moved code is often re-indented
    #[must_use]
    pub fn moves_preset() -> Self {
        Self {
            diff: DiffOptions {
                ignore_trim_whitespace: true,
                compute_moves: true,
                max_computation_time_ms: DEFAULT_MAX_COMPUTATION_TIME_MS,
            },
            moves: MoveDetectionConfig::default(),
            ..Self::default()
        }
    }

    /// Large input preset.
    #[must_use]
    pub fn fast_preset() -> Self {
        Self {
            diff: DiffOptions {
                ignore_trim_whitespace: false,
                compute_moves: false,
                max_computation_time_ms: 1000,
            },
            moves: MoveDetectionConfig::exact(),
            limits: EngineLimits::fast(),
            output: OutputConfig::default(),
            behavior: BehaviorConfig {
                validate_results: false,
                ..BehaviorConfig::default()
            },
        }
    }
}
