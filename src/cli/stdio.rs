//! Stdio command handler.
//!
//! Reads one JSON request, writes one JSON response. Every outcome,
//! including malformed input, produces a response object.

use crate::config::AppConfig;
use crate::error::LineDiffError;
use crate::pipeline::{DiffResponse, error_chain, exit_codes, respond};
use anyhow::{Context, Result};
use std::io::{Read, Write};

/// Answer the request read from `input`, returning the exit code.
pub fn run_stdio<R: Read, W: Write>(mut input: R, mut output: W, config: &AppConfig) -> Result<i32> {
    let mut body = Vec::new();
    let read = crate::error::ErrorContext::context(
        input.read_to_end(&mut body),
        "reading request from stdin",
    );
    if let Err(err) = read {
        return write_failure(output, &err);
    }

    let response = respond(&body, config);
    let json = response
        .to_json()
        .context("Failed to serialize response")?;
    writeln!(output, "{json}").context("Failed to write response")?;
    output.flush().context("Failed to write response")?;

    Ok(exit_code(&response, config))
}

/// Answer with a failure response when no request can be diffed at all.
///
/// Returns the error exit code.
pub fn write_failure<W: Write>(mut output: W, err: &LineDiffError) -> Result<i32> {
    let json = DiffResponse::failure(error_chain(err))
        .to_json()
        .context("Failed to serialize response")?;
    writeln!(output, "{json}").context("Failed to write response")?;
    output.flush().context("Failed to write response")?;
    Ok(exit_codes::ERROR)
}

pub(crate) fn exit_code(response: &DiffResponse, config: &AppConfig) -> i32 {
    if !response.is_success() {
        exit_codes::ERROR
    } else if config.behavior.fail_on_change && response.has_changes() {
        exit_codes::CHANGES_DETECTED
    } else {
        exit_codes::SUCCESS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(input: &str, config: &AppConfig) -> (i32, serde_json::Value) {
        let mut out = Vec::new();
        let code = run_stdio(input.as_bytes(), &mut out, config).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.ends_with('\n'));
        (code, serde_json::from_str(&text).unwrap())
    }

    #[test]
    fn test_success_response() {
        let (code, value) = run(
            r#"{"original": "a\n", "modified": "b\n"}"#,
            &AppConfig::default(),
        );
        assert_eq!(code, exit_codes::SUCCESS);
        assert_eq!(value["success"], true);
        assert_eq!(value["changes"][0]["originalRange"]["endExclusive"], 1);
    }

    #[test]
    fn test_malformed_request() {
        let (code, value) = run("{]", &AppConfig::default());
        assert_eq!(code, exit_codes::ERROR);
        assert_eq!(value["success"], false);
        assert!(value["error"].as_str().unwrap().contains("Invalid JSON"));
        assert!(value.get("changes").is_none());
    }

    struct BrokenPipe;

    impl Read for BrokenPipe {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed"))
        }
    }

    #[test]
    fn test_unreadable_input_still_answers() {
        let mut out = Vec::new();
        let code = run_stdio(BrokenPipe, &mut out, &AppConfig::default()).unwrap();
        assert_eq!(code, exit_codes::ERROR);

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["success"], false);
        let error = value["error"].as_str().unwrap();
        assert!(error.starts_with("IO error: reading request from stdin"));
        assert!(error.contains("pipe closed"));
    }

    #[test]
    fn test_write_failure_response() {
        let mut out = Vec::new();
        let err = LineDiffError::config("unknown preset 'bogus'");
        assert_eq!(write_failure(&mut out, &err).unwrap(), exit_codes::ERROR);

        let text = String::from_utf8(out).unwrap();
        assert!(text.ends_with('\n'));
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["success"], false);
        assert_eq!(value["error"], "Invalid configuration: unknown preset 'bogus'");
        assert!(value.get("changes").is_none());
    }

    #[test]
    fn test_fail_on_change() {
        let config = AppConfig::builder().fail_on_change(true).build();
        let (code, _) = run(r#"{"original": "a", "modified": "b"}"#, &config);
        assert_eq!(code, exit_codes::CHANGES_DETECTED);
        let (code, _) = run(r#"{"original": "a", "modified": "a"}"#, &config);
        assert_eq!(code, exit_codes::SUCCESS);
    }
}
