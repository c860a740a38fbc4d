//! Configuration validation for linediff.
//!
//! Provides validation traits and implementations for all configuration types.

use super::types::{AppConfig, BehaviorConfig, DiffOptions, OutputConfig};
use crate::diff::{EngineLimits, MoveDetectionConfig};

// ============================================================================
// Configuration Error
// ============================================================================

/// Error type for configuration validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    /// The field that failed validation
    pub field: String,
    /// Description of the validation error
    pub message: String,
}

impl ConfigError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Validation Trait
// ============================================================================

/// Trait for validatable configuration types.
pub trait Validatable {
    /// Validate the configuration, returning any errors found.
    fn validate(&self) -> Vec<ConfigError>;

    /// Check if the configuration is valid.
    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

// ============================================================================
// Validation Implementations
// ============================================================================

impl Validatable for AppConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        errors.extend(self.diff.validate());
        errors.extend(self.moves.validate());
        errors.extend(self.limits.validate());
        errors.extend(self.output.validate());
        errors.extend(self.behavior.validate());
        errors
    }
}

/// Upper bound on a configured time budget: one hour.
const MAX_COMPUTATION_TIME_MS: u64 = 3_600_000;

impl Validatable for DiffOptions {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if self.max_computation_time_ms > MAX_COMPUTATION_TIME_MS {
            errors.push(ConfigError::new(
                "diff.max_computation_time_ms",
                format!(
                    "{} exceeds the maximum of {MAX_COMPUTATION_TIME_MS}",
                    self.max_computation_time_ms
                ),
            ));
        }
        errors
    }
}

impl Validatable for MoveDetectionConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if !(self.similarity_threshold > 0.0 && self.similarity_threshold <= 1.0) {
            errors.push(ConfigError::new(
                "moves.similarity_threshold",
                format!(
                    "Threshold must be in (0.0, 1.0], got {}",
                    self.similarity_threshold
                ),
            ));
        }
        if self.min_block_lines == 0 {
            errors.push(ConfigError::new(
                "moves.min_block_lines",
                "Must be at least 1",
            ));
        }
        errors
    }
}

impl Validatable for EngineLimits {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if self.line_dp_cell_limit == 0 {
            errors.push(ConfigError::new(
                "limits.line_dp_cell_limit",
                "Must be greater than 0",
            ));
        }
        if self.char_dp_cell_limit == 0 {
            errors.push(ConfigError::new(
                "limits.char_dp_cell_limit",
                "Must be greater than 0",
            ));
        }
        errors
    }
}

impl Validatable for OutputConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if let Some(file) = &self.file
            && let Some(parent) = file.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            errors.push(ConfigError::new(
                "output.file",
                format!("Parent directory does not exist: {}", parent.display()),
            ));
        }
        errors
    }
}

impl Validatable for BehaviorConfig {
    fn validate(&self) -> Vec<ConfigError> {
        Vec::new()
    }
}
