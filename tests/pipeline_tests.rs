//! Pipeline and CLI integration tests.
//!
//! These tests exercise the request → diff → response pipeline, error
//! handling paths, and CLI command handlers with real fixture files.

use linediff::cli::{DiffPaths, run_batch, run_diff, run_stdio, write_failure};
use linediff::config::{AppConfig, ConfigOverrides, ConfigPreset, load_config_file};
use linediff::pipeline::{
    DiffResponse, OutputTarget, ReportFormat, exit_codes, render_result, respond, respond_batch,
    write_output,
};
use std::path::{Path, PathBuf};

// ============================================================================
// Test Fixtures
// ============================================================================

const FIXTURES_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");

fn fixture_path(name: &str) -> PathBuf {
    Path::new(FIXTURES_DIR).join(name)
}

fn request_json(original: &str, modified: &str, options: serde_json::Value) -> Vec<u8> {
    serde_json::to_vec(&serde_json::json!({
        "original": original,
        "modified": modified,
        "options": options,
    }))
    .expect("serialize request")
}

// ============================================================================
// Protocol
// ============================================================================

mod protocol {
    use super::*;

    #[test]
    fn success_response_shape() {
        let body = request_json("let x = 1;\nkeep\n", "let x = 2;\nkeep\n", serde_json::json!({}));
        let response = respond(&body, &AppConfig::default());
        insta::assert_snapshot!(
            response.to_json().expect("json"),
            @r#"{"success":true,"changes":[{"originalRange":{"start":0,"endExclusive":1},"modifiedRange":{"start":0,"endExclusive":1},"innerChanges":[{"originalRange":{"startLine":0,"startColumn":8,"endLine":0,"endColumn":9},"modifiedRange":{"startLine":0,"startColumn":8,"endLine":0,"endColumn":9}}]}],"moves":[],"hitTimeout":false}"#
        );
    }

    #[test]
    fn move_response_shape() {
        let body = request_json(
            "A\nB\nC\nX\nY\nZ\n",
            "X\nY\nZ\nA\nB\nC\n",
            serde_json::json!({"computeMoves": true}),
        );
        let response = respond(&body, &AppConfig::default());
        insta::assert_snapshot!(
            response.to_json().expect("json"),
            @r#"{"success":true,"changes":[],"moves":[{"originalRange":{"start":0,"endExclusive":3},"modifiedRange":{"start":3,"endExclusive":6},"changes":[]}],"hitTimeout":false}"#
        );
    }

    #[test]
    fn failure_responses_never_carry_changes() {
        let bodies: [&[u8]; 6] = [
            b"",
            b"null",
            b"{\"original\": \"a\"}",
            b"{\"modified\": \"a\"}",
            b"{\"original\": 3, \"modified\": \"a\"}",
            b"\xff\xfe",
        ];
        for body in bodies {
            let value: serde_json::Value = serde_json::from_str(
                &respond(body, &AppConfig::default()).to_json().expect("json"),
            )
            .expect("valid json");
            assert_eq!(value["success"], false, "{body:?}");
            assert!(value["error"].is_string());
            assert!(value.get("changes").is_none());
        }
    }

    #[test]
    fn zero_budget_is_success_with_timeout_flag() {
        let original: String = (0..500).map(|i| format!("{}\n", i % 11)).collect();
        let modified: String = (0..500).map(|i| format!("{}\n", i % 13)).collect();
        let body = request_json(
            &original,
            &modified,
            serde_json::json!({"maxComputationTimeMs": 0, "computeMoves": true}),
        );
        match respond(&body, &AppConfig::default()) {
            DiffResponse::Success(success) => {
                assert!(success.hit_timeout);
                assert!(!success.changes.is_empty());
            }
            DiffResponse::Failure(failure) => panic!("unexpected failure: {}", failure.error),
        }
    }

    #[test]
    fn preset_defaults_apply_to_requests() {
        let config = AppConfig::from_preset(ConfigPreset::WhitespaceInsensitive);
        let body = request_json("  a\n", "a\n", serde_json::json!({}));
        let result = respond(&body, &config).into_result().expect("success");
        assert!(result.changes.is_empty());
    }
}

// ============================================================================
// Batch
// ============================================================================

mod batch {
    use super::*;

    #[test]
    fn fixture_batch_keeps_order() {
        let input = std::fs::read_to_string(fixture_path("requests.ndjson")).expect("fixture");
        let responses = respond_batch(&input, &AppConfig::default());

        assert_eq!(responses.len(), 4);
        assert!(responses[0].has_changes());
        assert!(responses[1].is_success() && !responses[1].has_changes());
        assert!(!responses[2].is_success());
        let moved = responses[3].clone().into_result().expect("success");
        assert_eq!(moved.moves.len(), 1);
    }

    #[test]
    fn batch_handler_reports_error_exit_code() {
        let input = std::fs::read(fixture_path("requests.ndjson")).expect("fixture");
        let mut out = Vec::new();
        let code = run_batch(input.as_slice(), &mut out, &AppConfig::default()).expect("batch");
        assert_eq!(code, exit_codes::ERROR);
        assert_eq!(String::from_utf8(out).expect("utf8").lines().count(), 4);
    }
}

// ============================================================================
// CLI Handlers
// ============================================================================

mod handlers {
    use super::*;

    fn failure_response(err: &linediff::LineDiffError) -> serde_json::Value {
        let mut out = Vec::new();
        let code = write_failure(&mut out, err).expect("write failure");
        assert_eq!(code, exit_codes::ERROR);
        let value: serde_json::Value = serde_json::from_slice(&out).expect("json");
        assert_eq!(value["success"], false);
        assert!(value.get("changes").is_none());
        value
    }

    #[test]
    fn invalid_config_file_answers_with_failure() {
        let tmp = tempfile::TempDir::new().expect("tempdir");
        let path = tmp.path().join(".linediff.yaml");
        std::fs::write(&path, "moves:\n  similarity_threshold: 2.0\n").expect("write config");

        let err = AppConfig::from_file_with_overrides(Some(&path), &ConfigOverrides::default())
            .expect_err("threshold out of range");
        let value = failure_response(&err);
        let message = value["error"].as_str().expect("error message");
        assert!(message.starts_with("Validation failed"));
        assert!(message.contains("moves.similarity_threshold"));
    }

    #[test]
    fn unknown_preset_answers_with_failure() {
        let err = ConfigPreset::parse("bogus").expect_err("unknown preset");
        let value = failure_response(&err);
        assert!(value["error"]
            .as_str()
            .expect("error message")
            .contains("unknown preset 'bogus'"));
    }

    #[test]
    fn missing_explicit_config_answers_with_failure() {
        let tmp = tempfile::TempDir::new().expect("tempdir");
        let path = tmp.path().join("absent.yaml");

        let err = AppConfig::from_file_with_overrides(Some(&path), &ConfigOverrides::default())
            .expect_err("explicit path must exist");
        let value = failure_response(&err);
        assert!(value["error"]
            .as_str()
            .expect("error message")
            .contains("Config file not found"));
    }

    #[test]
    fn stdio_round_trip() {
        let body = request_json("a\n", "b\n", serde_json::json!(null));
        let mut out = Vec::new();
        let code = run_stdio(body.as_slice(), &mut out, &AppConfig::default()).expect("stdio");
        assert_eq!(code, exit_codes::SUCCESS);

        let value: serde_json::Value = serde_json::from_slice(&out).expect("json");
        assert_eq!(value["success"], true);
    }

    #[test]
    fn stdio_with_config_file_defaults() {
        let tmp = tempfile::TempDir::new().expect("tempdir");
        let path = tmp.path().join(".linediff.yaml");
        std::fs::write(&path, "diff:\n  ignore_trim_whitespace: true\nbehavior:\n  fail_on_change: true\n")
            .expect("write config");
        let config = load_config_file(&path).expect("load");

        let mut out = Vec::new();
        let same = request_json("x  \n", "x\n", serde_json::json!({}));
        assert_eq!(
            run_stdio(same.as_slice(), &mut out, &config).expect("stdio"),
            exit_codes::SUCCESS
        );

        let mut out = Vec::new();
        let changed = request_json("x\n", "y\n", serde_json::json!({}));
        assert_eq!(
            run_stdio(changed.as_slice(), &mut out, &config).expect("stdio"),
            exit_codes::CHANGES_DETECTED
        );
    }

    #[test]
    fn diff_fixture_summary() {
        let tmp = tempfile::TempDir::new().expect("tempdir");
        let out = tmp.path().join("summary.txt");
        let config = AppConfig::builder()
            .output_format(ReportFormat::Summary)
            .output_file(Some(out.clone()))
            .quiet(true)
            .build();
        let paths = DiffPaths {
            original: fixture_path("hello_original.rs.txt"),
            modified: fixture_path("hello_modified.rs.txt"),
        };

        assert_eq!(run_diff(&paths, &config).expect("diff"), exit_codes::SUCCESS);
        let summary = std::fs::read_to_string(out).expect("output");
        insta::assert_snapshot!(summary.trim_end(), @r"
        2 change(s): 1 insertion(s), 0 deletion(s), 1 modification(s), +2 -1 lines
        @@ -[3, 4) +[3, 4) @@ 1 inner change(s)
        @@ -[5, 5) +[5, 6) @@ 0 inner change(s)
        ");
    }
}

// ============================================================================
// Output
// ============================================================================

#[test]
fn pretty_json_output_to_file() {
    let tmp = tempfile::TempDir::new().expect("tempdir");
    let path = tmp.path().join("out.json");
    let result = linediff::DiffEngine::new().compute("a\n", "b\n").expect("diff");

    let rendered = render_result(&result, ReportFormat::Json, true).expect("render");
    assert!(rendered.contains("\n  \"changes\""));
    write_output(&rendered, &OutputTarget::File(path.clone()), true).expect("write");

    let back: DiffResponse =
        serde_json::from_str(&std::fs::read_to_string(path).expect("read")).expect("parse");
    assert_eq!(back.into_result(), Some(result));
}
