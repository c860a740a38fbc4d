//! Configuration types for linediff operations.

use super::defaults::DEFAULT_MAX_COMPUTATION_TIME_MS;
use crate::diff::{DiffEngine, EngineLimits, MoveDetectionConfig};
use crate::pipeline::ReportFormat;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ============================================================================
// Unified Application Configuration
// ============================================================================

/// Unified application configuration that can be loaded from CLI args or
/// config files.
///
/// CLI arguments override file settings; per-request options override both.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppConfig {
    /// Default options for every diff request
    pub diff: DiffOptions,
    /// Move detection parameters
    pub moves: MoveDetectionConfig,
    /// Algorithm size limits
    pub limits: EngineLimits,
    /// Output configuration
    pub output: OutputConfig,
    /// Behavior flags
    pub behavior: BehaviorConfig,
}

impl AppConfig {
    /// Create an `AppConfig` builder.
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// An engine configured with these settings and `options` for the call.
    #[must_use]
    pub fn engine_with(&self, options: DiffOptions) -> DiffEngine {
        DiffEngine::new()
            .with_options(options)
            .with_limits(self.limits.clone())
            .with_move_config(self.moves.clone())
    }

    /// An engine using the configured default options.
    #[must_use]
    pub fn engine(&self) -> DiffEngine {
        self.engine_with(self.diff)
    }
}

// ============================================================================
// Builder for AppConfig
// ============================================================================

/// Builder for constructing `AppConfig` with fluent API.
#[derive(Debug, Default)]
#[must_use]
pub struct AppConfigBuilder {
    config: AppConfig,
}

impl AppConfigBuilder {
    pub const fn ignore_trim_whitespace(mut self, ignore: bool) -> Self {
        self.config.diff.ignore_trim_whitespace = ignore;
        self
    }

    pub const fn compute_moves(mut self, compute: bool) -> Self {
        self.config.diff.compute_moves = compute;
        self
    }

    pub const fn max_computation_time_ms(mut self, millis: u64) -> Self {
        self.config.diff.max_computation_time_ms = millis;
        self
    }

    /// Set the move similarity threshold.
    pub const fn move_similarity_threshold(mut self, threshold: f64) -> Self {
        self.config.moves.similarity_threshold = threshold;
        self
    }

    /// Set the minimum moved block size.
    pub const fn min_block_lines(mut self, lines: usize) -> Self {
        self.config.moves.min_block_lines = lines;
        self
    }

    pub fn limits(mut self, limits: EngineLimits) -> Self {
        self.config.limits = limits;
        self
    }

    /// Set the output format.
    pub const fn output_format(mut self, format: ReportFormat) -> Self {
        self.config.output.format = format;
        self
    }

    /// Set the output file.
    pub fn output_file(mut self, file: Option<PathBuf>) -> Self {
        self.config.output.file = file;
        self
    }

    pub const fn pretty(mut self, pretty: bool) -> Self {
        self.config.output.pretty = pretty;
        self
    }

    /// Exit with code 2 when changes are found.
    pub const fn fail_on_change(mut self, fail: bool) -> Self {
        self.config.behavior.fail_on_change = fail;
        self
    }

    /// Enable quiet mode.
    pub const fn quiet(mut self, quiet: bool) -> Self {
        self.config.behavior.quiet = quiet;
        self
    }

    /// Build the `AppConfig`.
    #[must_use]
    pub fn build(self) -> AppConfig {
        self.config
    }
}

// ============================================================================
// Request Options
// ============================================================================

/// Options of a single diff request.
///
/// Serialized in camelCase for the wire protocol; config files may use
/// snake_case keys as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct DiffOptions {
    /// Ignore leading/trailing whitespace when comparing lines
    #[serde(alias = "ignore_trim_whitespace")]
    pub ignore_trim_whitespace: bool,
    /// Detect blocks of lines that moved
    #[serde(alias = "compute_moves")]
    pub compute_moves: bool,
    /// Time budget per diff in milliseconds; 0 expires immediately
    #[serde(alias = "max_computation_time_ms")]
    pub max_computation_time_ms: u64,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            ignore_trim_whitespace: false,
            compute_moves: false,
            max_computation_time_ms: DEFAULT_MAX_COMPUTATION_TIME_MS,
        }
    }
}

// ============================================================================
// Output Configuration
// ============================================================================

/// Output-related configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format for the `diff` command
    pub format: ReportFormat,
    /// Output file path (None for stdout)
    pub file: Option<PathBuf>,
    /// Pretty-print JSON output
    pub pretty: bool,
}

// ============================================================================
// Behavior Configuration
// ============================================================================

/// Behavior flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Exit with code 2 if any changes are detected
    pub fail_on_change: bool,
    /// Suppress non-essential log output
    pub quiet: bool,
    /// Check every result against the inputs before answering
    pub validate_results: bool,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            fail_on_change: false,
            quiet: false,
            validate_results: true,
        }
    }
}
