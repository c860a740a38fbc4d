//! Configuration file loading and discovery.
//!
//! Supports loading configuration from YAML files with automatic discovery.

use super::defaults::ConfigPreset;
use super::types::AppConfig;
use super::validation::Validatable;
use crate::diff::{EngineLimits, MoveDetectionConfig};
use crate::error::LineDiffError;
use crate::pipeline::ReportFormat;
use std::path::{Path, PathBuf};

// ============================================================================
// Configuration File Discovery
// ============================================================================

/// Standard config file names to search for.
const CONFIG_FILE_NAMES: &[&str] = &[
    ".linediff.yaml",
    ".linediff.yml",
    "linediff.yaml",
    "linediff.yml",
];

/// Discover a config file by searching standard locations.
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Current directory
/// 3. Git repository root (if in a repo)
/// 4. User config directory (~/.config/linediff/)
/// 5. Home directory
#[must_use]
pub fn discover_config_file(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        // An explicit path is used even if missing so loading reports it
        return Some(path.to_path_buf());
    }

    if let Ok(cwd) = std::env::current_dir()
        && let Some(path) = find_config_in_dir(&cwd)
    {
        return Some(path);
    }

    if let Some(git_root) = find_git_root()
        && let Some(path) = find_config_in_dir(&git_root)
    {
        return Some(path);
    }

    if let Some(config_dir) = dirs::config_dir()
        && let Some(path) = find_config_in_dir(&config_dir.join("linediff"))
    {
        return Some(path);
    }

    dirs::home_dir().and_then(|home| find_config_in_dir(&home))
}

fn find_config_in_dir(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.exists())
}

/// Find the git repository root by walking up the directory tree.
fn find_git_root() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    let mut current = cwd.as_path();

    loop {
        if current.join(".git").exists() {
            return Some(current.to_path_buf());
        }
        current = current.parent()?;
    }
}

// ============================================================================
// Configuration File Loading
// ============================================================================

/// Error type for config file operations.
#[derive(Debug)]
pub enum ConfigFileError {
    /// File not found
    NotFound(PathBuf),
    /// IO error reading file
    Io { path: PathBuf, source: std::io::Error },
    /// YAML parsing error
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
}

impl std::fmt::Display for ConfigFileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(path) => {
                write!(f, "Config file not found: {}", path.display())
            }
            Self::Io { path, source } => {
                write!(f, "Failed to read config file {}: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "Failed to parse config file {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigFileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::NotFound(_) => None,
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
        }
    }
}

impl From<ConfigFileError> for LineDiffError {
    fn from(err: ConfigFileError) -> Self {
        match err {
            ConfigFileError::Io { path, source } => Self::io(path, source),
            other => Self::config(other.to_string()),
        }
    }
}

/// Load an `AppConfig` from a YAML file.
pub fn load_config_file(path: &Path) -> Result<AppConfig, ConfigFileError> {
    if !path.exists() {
        return Err(ConfigFileError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path).map_err(|source| ConfigFileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    // An empty file deserializes to `null`
    if content.trim().is_empty() {
        return Ok(AppConfig::default());
    }
    serde_yaml::from_str(&content).map_err(|source| ConfigFileError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load config from the discovered file, or return the default.
///
/// A file named explicitly must load; a discovered file that fails to load
/// is skipped with a warning.
pub fn load_or_default(
    explicit_path: Option<&Path>,
) -> Result<(AppConfig, Option<PathBuf>), ConfigFileError> {
    let Some(path) = discover_config_file(explicit_path) else {
        return Ok((AppConfig::default(), None));
    };
    match load_config_file(&path) {
        Ok(config) => {
            tracing::debug!(path = %path.display(), "loaded config file");
            Ok((config, Some(path)))
        }
        Err(e) if explicit_path.is_some() => Err(e),
        Err(e) => {
            tracing::warn!("Failed to load config from {}: {}", path.display(), e);
            Ok((AppConfig::default(), None))
        }
    }
}

// ============================================================================
// Configuration Merging
// ============================================================================

/// Settings given explicitly on the command line.
///
/// `None` leaves the layer below untouched. `Some` always wins, even when
/// it holds the default value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    /// Preset layered between the config file and the flags
    pub preset: Option<ConfigPreset>,
    pub ignore_trim_whitespace: Option<bool>,
    pub compute_moves: Option<bool>,
    pub max_computation_time_ms: Option<u64>,
    pub output_format: Option<ReportFormat>,
    pub output_file: Option<PathBuf>,
    pub pretty: Option<bool>,
    pub fail_on_change: Option<bool>,
    pub quiet: Option<bool>,
    pub validate_results: Option<bool>,
}

impl ConfigOverrides {
    /// Apply the preset, then every flag that was given.
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(preset) = self.preset {
            config.merge(&AppConfig::from_preset(preset));
        }

        if let Some(ignore) = self.ignore_trim_whitespace {
            config.diff.ignore_trim_whitespace = ignore;
        }
        if let Some(compute) = self.compute_moves {
            config.diff.compute_moves = compute;
        }
        if let Some(millis) = self.max_computation_time_ms {
            config.diff.max_computation_time_ms = millis;
        }

        if let Some(format) = self.output_format {
            config.output.format = format;
        }
        if let Some(file) = &self.output_file {
            config.output.file = Some(file.clone());
        }
        if let Some(pretty) = self.pretty {
            config.output.pretty = pretty;
        }

        if let Some(fail) = self.fail_on_change {
            config.behavior.fail_on_change = fail;
        }
        if let Some(quiet) = self.quiet {
            config.behavior.quiet = quiet;
        }
        if let Some(validate) = self.validate_results {
            config.behavior.validate_results = validate;
        }
    }
}

impl AppConfig {
    /// Merge another config into this one, with `other` taking precedence.
    ///
    /// Fields of `other` left at their defaults do not override. This is
    /// used for layering a preset over file config.
    pub fn merge(&mut self, other: &Self) {
        let defaults = Self::default();

        // Diff options
        if other.diff.ignore_trim_whitespace {
            self.diff.ignore_trim_whitespace = true;
        }
        if other.diff.compute_moves {
            self.diff.compute_moves = true;
        }
        if other.diff.max_computation_time_ms != defaults.diff.max_computation_time_ms {
            self.diff.max_computation_time_ms = other.diff.max_computation_time_ms;
        }

        if other.moves != MoveDetectionConfig::default() {
            self.moves = other.moves.clone();
        }
        if other.limits != EngineLimits::default() {
            self.limits = other.limits.clone();
        }

        // Output config - only override if explicitly set
        if other.output.format != ReportFormat::default() {
            self.output.format = other.output.format;
        }
        if other.output.file.is_some() {
            self.output.file.clone_from(&other.output.file);
        }
        if other.output.pretty {
            self.output.pretty = true;
        }

        // Behavior config (booleans - if set, override)
        if other.behavior.fail_on_change {
            self.behavior.fail_on_change = true;
        }
        if other.behavior.quiet {
            self.behavior.quiet = true;
        }
        if !other.behavior.validate_results {
            self.behavior.validate_results = false;
        }
    }

    /// Load from file, apply CLI overrides and validate the result.
    ///
    /// # Errors
    ///
    /// Fails when an explicit config file cannot be loaded or the merged
    /// configuration is invalid.
    pub fn from_file_with_overrides(
        config_path: Option<&Path>,
        overrides: &ConfigOverrides,
    ) -> crate::Result<(Self, Option<PathBuf>)> {
        let (mut config, loaded_from) = load_or_default(config_path)?;
        overrides.apply(&mut config);

        let errors = config.validate();
        if !errors.is_empty() {
            let listed: Vec<String> = errors.iter().map(ToString::to_string).collect();
            return Err(LineDiffError::validation(listed.join("; ")));
        }
        Ok((config, loaded_from))
    }
}

// ============================================================================
// Example Config Generation
// ============================================================================

/// Generate a commented example config with all options.
#[must_use]
pub fn generate_full_example_config() -> String {
    r"# linediff configuration file
# ============================
#
# Place it at:
#   - .linediff.yaml in your project root
#   - ~/.config/linediff/linediff.yaml for global config
#
# CLI arguments override file settings. Options sent with a request
# override both.

# Defaults for every diff
diff:
  # Ignore leading and trailing whitespace when comparing lines
  ignore_trim_whitespace: false
  # Report relocated blocks as moves
  compute_moves: false
  # Time budget per diff in milliseconds (0 expires immediately)
  max_computation_time_ms: 5000

# Move detection
moves:
  # Minimum similarity (0.0-1.0) for two lines to pair up in a moved block
  similarity_threshold: 0.9
  # Minimum number of lines in a moved block
  min_block_lines: 3

# Alignment limits; larger inputs switch from DP to Myers
limits:
  line_dp_cell_limit: 1000000
  char_dp_cell_limit: 62500

# Output configuration
output:
  # Format for the diff command: json, summary
  format: json
  # Output file path (omit for stdout)
  # file: changes.json
  pretty: false

# Behavior flags
behavior:
  # Exit with code 2 if any changes are detected
  fail_on_change: false
  # Suppress non-essential output
  quiet: false
  # Check each result against its inputs before answering
  validate_results: true
"
    .to_string()
}

// ============================================================================
// Tests
// ============================================================================
