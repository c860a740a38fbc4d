//! Diff command handler.
//!
//! Implements the `diff` subcommand for comparing two files.

use crate::config::AppConfig;
use crate::diff::DiffResult;
use crate::error::{LineDiffError, RequestErrorKind};
use crate::pipeline::{
    DiffRequest, OutputTarget, PipelineError, exit_codes, render_result, run_request, write_output,
};
use anyhow::Result;
use std::path::{Path, PathBuf};

/// Paths of the two files to compare.
#[derive(Debug, Clone)]
pub struct DiffPaths {
    pub original: PathBuf,
    pub modified: PathBuf,
}

/// Run the diff command, returning the desired exit code.
///
/// The caller is responsible for calling `std::process::exit()` with the
/// returned code when it is non-zero.
pub fn run_diff(paths: &DiffPaths, config: &AppConfig) -> Result<i32> {
    let quiet = config.behavior.quiet;
    let original = read_text(&paths.original)?;
    let modified = read_text(&paths.modified)?;

    let request = DiffRequest::new(original, modified);
    let result = run_request(&request, config).map_err(|e| PipelineError::DiffFailed {
        source: e.into(),
    })?;

    if !quiet {
        let summary = result.summary();
        tracing::info!(
            "{} change(s), {} move(s) between {} and {}",
            summary.total_changes,
            summary.moves,
            paths.original.display(),
            paths.modified.display()
        );
    }

    let rendered = render_result(&result, config.output.format, config.output.pretty)
        .map_err(|source| PipelineError::OutputFailed { source })?;
    let target = OutputTarget::from_option(config.output.file.clone());
    write_output(&rendered, &target, quiet)
        .map_err(|source| PipelineError::OutputFailed { source })?;

    Ok(determine_exit_code(config, &result))
}

fn read_text(path: &Path) -> Result<String> {
    let read = || -> Result<String, LineDiffError> {
        let bytes = std::fs::read(path).map_err(|e| LineDiffError::io(path, e))?;
        String::from_utf8(bytes).map_err(|_| {
            LineDiffError::request(path.display().to_string(), RequestErrorKind::InvalidEncoding)
        })
    };
    read().map_err(|source| {
        PipelineError::ReadFailed {
            path: path.display().to_string(),
            source: source.into(),
        }
        .into()
    })
}

/// Determine the appropriate exit code based on the result and config flags.
fn determine_exit_code(config: &AppConfig, result: &DiffResult) -> i32 {
    if config.behavior.fail_on_change && result.has_changes() {
        return exit_codes::CHANGES_DETECTED;
    }
    exit_codes::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_pair(tmp: &TempDir, a: &str, b: &str) -> DiffPaths {
        let original = tmp.path().join("a.txt");
        let modified = tmp.path().join("b.txt");
        std::fs::write(&original, a).unwrap();
        std::fs::write(&modified, b).unwrap();
        DiffPaths { original, modified }
    }

    #[test]
    fn test_diff_writes_json_file() {
        let tmp = TempDir::new().unwrap();
        let paths = write_pair(&tmp, "one\ntwo\n", "one\n2\n");
        let out = tmp.path().join("out.json");
        let config = AppConfig::builder()
            .output_file(Some(out.clone()))
            .quiet(true)
            .build();

        assert_eq!(run_diff(&paths, &config).unwrap(), exit_codes::SUCCESS);
        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(out).unwrap()).unwrap();
        assert_eq!(value["success"], true);
        assert_eq!(value["changes"].as_array().map(Vec::len), Some(1));
    }

    #[test]
    fn test_fail_on_change_exit_code() {
        let tmp = TempDir::new().unwrap();
        let config = AppConfig::builder()
            .fail_on_change(true)
            .output_file(Some(tmp.path().join("out.json")))
            .quiet(true)
            .build();

        let changed = write_pair(&tmp, "x\n", "y\n");
        assert_eq!(run_diff(&changed, &config).unwrap(), exit_codes::CHANGES_DETECTED);

        let same = write_pair(&tmp, "x\n", "x\n");
        assert_eq!(run_diff(&same, &config).unwrap(), exit_codes::SUCCESS);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let paths = DiffPaths {
            original: tmp.path().join("missing.txt"),
            modified: tmp.path().join("missing.txt"),
        };
        let err = run_diff(&paths, &AppConfig::default()).unwrap_err();
        assert!(err.to_string().starts_with("Read failed for"));
        let io = err
            .chain()
            .find_map(|e| e.downcast_ref::<LineDiffError>())
            .unwrap();
        assert!(matches!(io, LineDiffError::Io { path: Some(_), .. }));
    }

    #[test]
    fn test_binary_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let original = tmp.path().join("bin");
        std::fs::write(&original, [0xff, 0xfe, 0x00]).unwrap();
        let paths = DiffPaths {
            modified: original.clone(),
            original,
        };
        let err = run_diff(&paths, &AppConfig::default()).unwrap_err();
        assert!(format!("{err:#}").contains("Input is not valid UTF-8"));
    }
}
