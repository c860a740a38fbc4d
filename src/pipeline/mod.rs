//! Request handling around the diff engine.
//!
//! This module owns the JSON protocol: parse a request, run the engine,
//! check the result and turn any failure (including a panic) into a
//! failure response. CLI handlers build on [`respond`] and the output
//! helpers.

mod batch;
mod output;
mod request;
mod response;

pub use batch::{render_ndjson, respond_batch};
pub use output::{OutputTarget, ReportFormat, render_result, write_output};
pub use request::{DiffRequest, RequestOptions, parse_request, parse_request_bytes};
pub use response::{DiffResponse, FailureResponse, SuccessResponse};

use crate::config::AppConfig;
use crate::diff::DiffResult;
use crate::error::{ErrorContext, LineDiffError, Result};
use crate::model::{Document, Side};
use std::panic::{AssertUnwindSafe, catch_unwind};

/// Structured pipeline error types for better diagnostics.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Failed to read an input file
    #[error("Read failed for {path}: {source}")]
    ReadFailed {
        path: String,
        source: anyhow::Error,
    },

    /// Diff computation failed
    #[error("Diff failed: {source}")]
    DiffFailed {
        #[source]
        source: anyhow::Error,
    },

    /// Output rendering or writing failed
    #[error("Output failed: {source}")]
    OutputFailed {
        #[source]
        source: anyhow::Error,
    },
}

/// Exit codes for CI/CD integration
pub mod exit_codes {
    /// Success (changes may have been found without --fail-on-change)
    pub const SUCCESS: i32 = 0;
    /// An error occurred; a failure response was emitted
    pub const ERROR: i32 = 1;
    /// Changes were detected and --fail-on-change was set
    pub const CHANGES_DETECTED: i32 = 2;
}

/// Run one parsed request.
///
/// Per-request options override the configured defaults. When
/// `validate_results` is enabled the result is checked against its inputs
/// before it is returned.
///
/// # Errors
///
/// Returns invalid settings or a failed result check. A panic inside the
/// engine is reported as an internal error.
pub fn run_request(request: &DiffRequest, config: &AppConfig) -> Result<DiffResult> {
    let options = request.options.resolve(config.diff);
    let engine = config.engine_with(options);
    let validate = config.behavior.validate_results;

    let outcome = catch_unwind(AssertUnwindSafe(|| -> Result<DiffResult> {
        let original = Document::tokenize(Side::Original, &request.original);
        let modified = Document::tokenize(Side::Modified, &request.modified);
        let result = engine.compute_documents(&original, &modified)?;
        if validate {
            result.validate(&original, &modified, options.ignore_trim_whitespace)?;
        }
        Ok(result)
    }));

    outcome
        .unwrap_or_else(|panic| Err(LineDiffError::internal(panic_message(panic.as_ref()))))
        .context("computing diff")
}

/// Answer one raw request with a response; never fails.
#[must_use]
pub fn respond(body: &[u8], config: &AppConfig) -> DiffResponse {
    match parse_request_bytes(body).and_then(|request| run_request(&request, config)) {
        Ok(result) => DiffResponse::success(result),
        Err(err) => {
            tracing::debug!(error = %err, "request failed");
            DiffResponse::failure(error_chain(&err))
        }
    }
}

/// The error followed by its sources, joined with ": ".
#[must_use]
pub fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    panic
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .map_or_else(
            || "panic during diff computation".to_string(),
            |msg| format!("panic during diff computation: {msg}"),
        )
}
