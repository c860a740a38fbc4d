//! Configuration module for linediff.
//!
//! This module provides a unified configuration system with:
//! - Type-safe configuration structures
//! - Validation for all configuration values
//! - Named presets for common use cases
//! - YAML config file loading and discovery
//! - CLI argument merging
//!
//! # Quick Start
//!
//! ```
//! use linediff::config::{AppConfig, ConfigPreset, Validatable};
//!
//! let config = AppConfig::from_preset(ConfigPreset::Moves);
//! assert!(config.diff.compute_moves);
//!
//! let config = AppConfig::builder()
//!     .ignore_trim_whitespace(true)
//!     .max_computation_time_ms(500)
//!     .fail_on_change(true)
//!     .build();
//! assert!(config.is_valid());
//! ```
//!
//! # Configuration File
//!
//! Place a `.linediff.yaml` file in your project root or `~/.config/linediff/`:
//!
//! ```yaml
//! diff:
//!   ignore_trim_whitespace: true
//!   compute_moves: true
//! moves:
//!   similarity_threshold: 0.85
//! ```

mod defaults;
pub mod file;
mod types;
mod validation;

pub use defaults::{
    ConfigPreset, DEFAULT_MAX_COMPUTATION_TIME_MS, DEFAULT_MIN_BLOCK_LINES,
    DEFAULT_MOVE_SIMILARITY_THRESHOLD,
};
pub use types::{AppConfig, AppConfigBuilder, BehaviorConfig, DiffOptions, OutputConfig};
pub use validation::{ConfigError, Validatable};

pub use file::{
    ConfigFileError, ConfigOverrides, discover_config_file, generate_full_example_config,
    load_config_file, load_or_default,
};

/// Generate a JSON Schema for the `AppConfig` configuration format.
///
/// The schema documents every option of `.linediff.yaml` files and can be
/// used by editors for validation and autocompletion.
///
/// # Errors
///
/// Returns an error if the schema cannot be serialized.
pub fn generate_json_schema() -> serde_json::Result<String> {
    let schema = schemars::schema_for!(AppConfig);
    serde_json::to_string_pretty(&schema)
}
