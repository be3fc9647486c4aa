use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::tempdir;

const DEFAULT_EXPRESSION: &str =
    "entity.name CONTAINS 'foo' AND entity.type EQUALS 'mysql' OR entity.type@src EQUALS 'elasticsearch'";
const DEFAULT_NORMALIZED_EXPRESSION: &str = "entity.name@dest CONTAINS 'foo' AND entity.type@dest EQUALS 'mysql' OR entity.type@src EQUALS 'elasticsearch'";

fn bin() -> &'static str {
    env!("CARGO_BIN_EXE_tag-filter")
}

fn write_file(path: &Path, content: &str) {
    fs::write(path, content).expect("failed to write test file");
}

fn run(args: &[&str]) -> Output {
    Command::new(bin())
        .env_remove("TAG_FILTER_CONFIG")
        .args(["--color", "never"])
        .args(args)
        .output()
        .expect("command should run")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_normalize_prints_canonical_expression() {
    let output = run(&["normalize", DEFAULT_EXPRESSION]);

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(stdout(&output).trim_end(), DEFAULT_NORMALIZED_EXPRESSION);
}

#[test]
fn test_normalize_invalid_expression_fails() {
    let output = run(&["normalize", "entity.type bla bla bla"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error:"), "stderr: {stderr}");
}

#[test]
fn test_validate_reports_field_and_exit_status() {
    let valid = run(&["validate", "entity.type EQUALS 'foo'"]);
    assert!(valid.status.success());
    assert_eq!(stdout(&valid).trim_end(), "valid");

    let invalid = run(&["validate", "entity.type bla bla bla"]);
    assert!(!invalid.status.success());
    assert!(
        stdout(&invalid).contains("Invalid value for 'tag_filter'"),
        "stdout: {}",
        stdout(&invalid)
    );
}

#[test]
fn test_compare_equivalent_expressions() {
    let output = run(&["compare", DEFAULT_EXPRESSION, DEFAULT_NORMALIZED_EXPRESSION]);

    assert!(output.status.success());
    assert_eq!(stdout(&output).trim_end(), "equivalent");
}

#[test]
fn test_compare_different_expressions_prints_diff() {
    let output = run(&[
        "compare",
        "entity.type EQUALS 'foo'",
        "entity.type@src EQUALS 'foo'",
    ]);

    assert!(!output.status.success());
    let text = stdout(&output);
    assert!(text.contains("different"), "stdout: {text}");
    assert!(text.contains("-entity.type@dest EQUALS 'foo'"), "stdout: {text}");
    assert!(text.contains("+entity.type@src EQUALS 'foo'"), "stdout: {text}");
}

#[test]
fn test_json_prints_wire_model() {
    let output = run(&["json", "--compact", "entity.type EQUALS 'foo'"]);

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_str(stdout(&output).trim()).unwrap();
    assert_eq!(value["type"], "TAG_FILTER");
    assert_eq!(value["stringValue"], "foo");
    assert_eq!(value["entity"], "DESTINATION");
}

#[test]
fn test_field_flag_selects_match_specification() {
    let output = run(&[
        "--field",
        "match_specification",
        "json",
        "a EQUALS '1' AND b EQUALS '2'",
    ]);

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(value["type"], "BINARY_OP");
    assert_eq!(value["conjunction"], "AND");
}

#[test]
fn test_config_file_selects_field_and_json_layout() {
    let dir = tempdir().expect("temp dir");
    let config = dir.path().join("tag-filter.json5");
    write_file(
        &config,
        r#"{
            // legacy attribute
            field: "match_specification",
            output: { pretty_json: false },
        }"#,
    );

    let output = run(&[
        "--config",
        config.to_str().expect("utf8 path"),
        "json",
        "a EQUALS 1",
    ]);

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let text = stdout(&output);
    assert_eq!(text.trim_end().lines().count(), 1, "stdout: {text}");
    assert!(text.contains("\"value\":\"1\""), "stdout: {text}");
}

#[test]
fn test_missing_config_file_fails() {
    let dir = tempdir().expect("temp dir");
    let missing = dir.path().join("missing.json5");

    let output = run(&[
        "--config",
        missing.to_str().expect("utf8 path"),
        "normalize",
        "a EQUALS '1'",
    ]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to load config"), "stderr: {stderr}");
}

#[test]
fn test_render_reads_wire_model_from_file() {
    let dir = tempdir().expect("temp dir");
    let file = dir.path().join("filter.json");
    write_file(
        &file,
        r#"{
            "type": "EXPRESSION",
            "logicalOperator": "AND",
            "elements": [
                { "type": "TAG_FILTER", "name": "a", "entity": "SOURCE", "operator": "IS_EMPTY" },
                { "type": "TAG_FILTER", "name": "b", "entity": "DESTINATION", "operator": "LESS_THAN", "numberValue": 5, "value": "5" }
            ]
        }"#,
    );

    let output = run(&["render", file.to_str().expect("utf8 path")]);

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(
        stdout(&output).trim_end(),
        "a@src IS_EMPTY AND b@dest LESS_THAN 5"
    );
}

#[test]
fn test_tokens_lists_every_token() {
    let output = run(&["tokens", "agent.tag:stage@src EQUALS 'prod'"]);

    assert!(output.status.success());
    let text = stdout(&output);
    for expected in ["agent.tag", "stage", "Source", "EQUALS", "prod"] {
        assert!(text.contains(expected), "missing {expected} in: {text}");
    }
}
