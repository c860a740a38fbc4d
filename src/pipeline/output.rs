//! Output handling for diff results.
//!
//! Renders a [`DiffResult`] in the selected format and writes it to stdout
//! or a file.

use crate::diff::DiffResult;
use anyhow::{Context, Result};
use clap::ValueEnum;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::path::PathBuf;

/// Output format of the `diff` command
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// The success response of the wire protocol
    #[default]
    Json,
    /// Counts and one header per hunk
    Summary,
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Summary => write!(f, "summary"),
        }
    }
}

/// Target for output - either stdout or a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// Write to stdout
    Stdout,
    /// Write to a file
    File(PathBuf),
}

impl OutputTarget {
    /// Create output target from optional path
    #[must_use]
    pub fn from_option(path: Option<PathBuf>) -> Self {
        path.map_or(Self::Stdout, Self::File)
    }
}

/// Render a result in the given format.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn render_result(result: &DiffResult, format: ReportFormat, pretty: bool) -> Result<String> {
    match format {
        ReportFormat::Json => {
            let response = super::DiffResponse::success(result.clone());
            let rendered = if pretty {
                serde_json::to_string_pretty(&response)
            } else {
                serde_json::to_string(&response)
            };
            rendered.context("Failed to serialize diff result")
        }
        ReportFormat::Summary => Ok(render_summary(result)),
    }
}

fn render_summary(result: &DiffResult) -> String {
    let summary = result.summary();
    let mut out = String::new();

    // Writing to a String cannot fail
    let _ = writeln!(
        out,
        "{} change(s): {} insertion(s), {} deletion(s), {} modification(s), +{} -{} lines",
        summary.total_changes,
        summary.insertions,
        summary.deletions,
        summary.modifications,
        summary.lines_added,
        summary.lines_removed,
    );
    if summary.moves > 0 {
        let _ = writeln!(
            out,
            "{} move(s) covering {} line(s)",
            summary.moves, summary.moved_lines
        );
    }
    if summary.hit_timeout {
        let _ = writeln!(out, "time budget exceeded, result is approximate");
    }

    for change in &result.changes {
        let _ = writeln!(
            out,
            "@@ -{} +{} @@ {} inner change(s)",
            change.original_range,
            change.modified_range,
            change.inner_changes.len()
        );
    }
    for moved in &result.moves {
        let _ = writeln!(
            out,
            "moved {} -> {}{}",
            moved.original_range,
            moved.modified_range,
            if moved.is_verbatim() { "" } else { " (edited)" }
        );
    }
    out
}

/// Write output to the target (stdout or file)
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_output(content: &str, target: &OutputTarget, quiet: bool) -> Result<()> {
    match target {
        OutputTarget::Stdout => {
            println!("{content}");
            Ok(())
        }
        OutputTarget::File(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write output to {}", path.display()))?;
            if !quiet {
                tracing::info!("Result written to {}", path.display());
            }
            Ok(())
        }
    }
}
