//! Newline-delimited batch mode.
//!
//! Every non-blank input line is one request. Requests run in parallel and
//! are isolated from each other; responses come back in input order.

use super::{DiffResponse, respond};
use crate::config::AppConfig;
use rayon::prelude::*;

/// Answer every request line of `input`.
#[must_use]
pub fn respond_batch(input: &str, config: &AppConfig) -> Vec<DiffResponse> {
    let requests: Vec<&str> = input.lines().filter(|l| !l.trim().is_empty()).collect();
    tracing::debug!(requests = requests.len(), "processing batch");

    requests
        .par_iter()
        .map(|line| respond(line.as_bytes(), config))
        .collect()
}

/// Render responses as NDJSON, one line each.
///
/// # Errors
///
/// Returns an error if a response cannot be serialized.
pub fn render_ndjson(responses: &[DiffResponse]) -> serde_json::Result<String> {
    let mut out = String::new();
    for response in responses {
        out.push_str(&response.to_json()?);
        out.push('\n');
    }
    Ok(out)
}
