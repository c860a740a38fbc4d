//! Request side of the JSON protocol.

use crate::config::DiffOptions;
use crate::error::{LineDiffError, RequestErrorKind, Result};
use serde::{Deserialize, Serialize};

/// One diff request: two texts and optional per-request options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffRequest {
    pub original: String,
    pub modified: String,
    pub options: RequestOptions,
}

/// Options as sent on the wire; absent fields fall back to the configured
/// defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignore_trim_whitespace: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compute_moves: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_computation_time_ms: Option<u64>,
}

impl RequestOptions {
    /// Fill the unset fields from `defaults`.
    #[must_use]
    pub fn resolve(&self, defaults: DiffOptions) -> DiffOptions {
        DiffOptions {
            ignore_trim_whitespace: self
                .ignore_trim_whitespace
                .unwrap_or(defaults.ignore_trim_whitespace),
            compute_moves: self.compute_moves.unwrap_or(defaults.compute_moves),
            max_computation_time_ms: self
                .max_computation_time_ms
                .unwrap_or(defaults.max_computation_time_ms),
        }
    }
}

impl DiffRequest {
    #[must_use]
    pub fn new(original: impl Into<String>, modified: impl Into<String>) -> Self {
        Self {
            original: original.into(),
            modified: modified.into(),
            options: RequestOptions::default(),
        }
    }

    #[must_use]
    pub const fn with_options(mut self, options: RequestOptions) -> Self {
        self.options = options;
        self
    }
}

/// Wire shape before the required fields are checked.
#[derive(Deserialize)]
struct RawRequest {
    original: Option<String>,
    modified: Option<String>,
    #[serde(default)]
    options: Option<RequestOptions>,
}

/// Parse a request from raw bytes.
///
/// # Errors
///
/// Fails when the bytes are not UTF-8, not a JSON object of the expected
/// shape, or lack `original` or `modified`.
pub fn parse_request_bytes(body: &[u8]) -> Result<DiffRequest> {
    let text = std::str::from_utf8(body)
        .map_err(|_| LineDiffError::request("request body", RequestErrorKind::InvalidEncoding))?;
    parse_request(text)
}

/// Parse a request from a JSON string.
///
/// # Errors
///
/// See [`parse_request_bytes`].
pub fn parse_request(body: &str) -> Result<DiffRequest> {
    let raw: RawRequest = serde_json::from_str(body)?;
    let original = raw
        .original
        .ok_or_else(|| LineDiffError::missing_field("original"))?;
    let modified = raw
        .modified
        .ok_or_else(|| LineDiffError::missing_field("modified"))?;
    Ok(DiffRequest {
        original,
        modified,
        options: raw.options.unwrap_or_default(),
    })
}
