//! Batch command handler.

use super::stdio::{exit_code, write_failure};
use crate::config::AppConfig;
use crate::pipeline::{exit_codes, render_ndjson, respond_batch};
use anyhow::{Context, Result};
use std::io::{Read, Write};

/// Answer NDJSON requests from `input` with NDJSON responses.
///
/// The exit code is the most severe one over all responses: any failure
/// gives 1, otherwise changes with `fail_on_change` give 2.
pub fn run_batch<R: Read, W: Write>(mut input: R, mut output: W, config: &AppConfig) -> Result<i32> {
    let mut body = String::new();
    let read = crate::error::ErrorContext::context(
        input.read_to_string(&mut body),
        "reading batch from stdin",
    );
    if let Err(err) = read {
        return write_failure(output, &err);
    }

    let responses = respond_batch(&body, config);
    let failed = responses.iter().filter(|r| !r.is_success()).count();
    if failed > 0 && !config.behavior.quiet {
        tracing::warn!("{failed} of {} request(s) failed", responses.len());
    }

    let rendered = render_ndjson(&responses).context("Failed to serialize responses")?;
    output
        .write_all(rendered.as_bytes())
        .and_then(|()| output.flush())
        .context("Failed to write responses")?;

    let codes = responses.iter().map(|r| exit_code(r, config));
    Ok(if failed > 0 {
        exit_codes::ERROR
    } else {
        codes.max().unwrap_or(exit_codes::SUCCESS)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_round_trip() {
        let input = concat!(
            r#"{"original": "a\n", "modified": "b\n"}"#,
            "\n",
            r#"{"original": "a\n", "modified": "a\n"}"#,
            "\n",
        );
        let mut out = Vec::new();
        let code = run_batch(input.as_bytes(), &mut out, &AppConfig::default()).unwrap();
        assert_eq!(code, exit_codes::SUCCESS);

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<serde_json::Value> = text
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["changes"].as_array().map(Vec::len), Some(1));
        assert_eq!(lines[1]["changes"].as_array().map(Vec::len), Some(0));
    }

    #[test]
    fn test_batch_failure_sets_error_code() {
        let config = AppConfig::builder().fail_on_change(true).build();
        let input = "{\"original\": \"a\", \"modified\": \"b\"}\nnope\n";
        let mut out = Vec::new();
        assert_eq!(
            run_batch(input.as_bytes(), &mut out, &config).unwrap(),
            exit_codes::ERROR
        );
    }

    #[test]
    fn test_batch_changes_with_fail_on_change() {
        let config = AppConfig::builder().fail_on_change(true).build();
        let input = "{\"original\": \"a\", \"modified\": \"b\"}\n";
        let mut out = Vec::new();
        assert_eq!(
            run_batch(input.as_bytes(), &mut out, &config).unwrap(),
            exit_codes::CHANGES_DETECTED
        );
    }

    #[test]
    fn test_undecodable_batch_still_answers() {
        let input: &[u8] = b"{\"original\": \"\xff\"}\n";
        let mut out = Vec::new();
        let code = run_batch(input, &mut out, &AppConfig::default()).unwrap();
        assert_eq!(code, exit_codes::ERROR);

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 1);
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["success"], false);
        assert!(value["error"].as_str().unwrap().contains("reading batch from stdin"));
    }
}
