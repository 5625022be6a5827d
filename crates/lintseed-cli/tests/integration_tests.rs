//! Integration tests for the lintseed CLI
//!
//! These tests run the binary end-to-end in temporary projects

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const GREETER: &str = "const greeting = \"hello\";\nfunction greet(name) {\n  if (name === greeting) {\n    return name;\n  }\n  return greeting;\n}\ngreet(\"world\");\n";

/// Helper function to create a test CLI command
#[allow(deprecated)]
fn cli() -> Command {
    Command::cargo_bin("lintseed").unwrap()
}

/// Helper function to create a temporary project with one source file
fn create_test_project() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    fs::create_dir_all(temp_dir.path().join("src")).unwrap();
    fs::write(temp_dir.path().join("src/greeter.js"), GREETER).unwrap();
    temp_dir
}

#[test]
fn test_help_command() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("init"));
}

#[test]
fn test_version_command() {
    cli()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(VERSION));
}

#[test]
fn test_version_detailed() {
    cli()
        .args(["version", "--detailed"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Built-in rules: 13"));
}

#[test]
fn test_init_writes_config_file() {
    let temp = create_test_project();

    cli()
        .current_dir(temp.path())
        .args(["init", "src", "--no-progress"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Enabled 13 out of 13 rules based on 1 file."))
        .stdout(predicate::str::contains("Created configuration file"));

    let written = fs::read_to_string(temp.path().join(".lintseedrc.json")).unwrap();
    let config: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert_eq!(config["rules"]["semi"], serde_json::json!(["error", "always"]));
    assert_eq!(config["rules"]["indent"], serde_json::json!(["error", 2]));
}

#[test]
fn test_init_to_stdout() {
    let temp = create_test_project();

    cli()
        .current_dir(temp.path())
        .args(["init", "src", "--no-progress", "--output", "-"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"rules\""))
        .stderr(predicate::str::contains("Enabled 13 out of 13 rules"));

    assert!(!temp.path().join(".lintseedrc.json").exists());
}

#[test]
fn test_init_yaml_format() {
    let temp = create_test_project();

    cli()
        .current_dir(temp.path())
        .args(["init", "src", "--no-progress", "--format", "yaml"])
        .assert()
        .success();

    let written = fs::read_to_string(temp.path().join(".lintseedrc.yaml")).unwrap();
    assert!(written.contains("rules:"));
}

#[test]
fn test_init_refuses_to_overwrite() {
    let temp = create_test_project();
    fs::write(temp.path().join(".lintseedrc.json"), "{}").unwrap();

    cli()
        .current_dir(temp.path())
        .args(["init", "src", "--no-progress"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    cli()
        .current_dir(temp.path())
        .args(["init", "src", "--no-progress", "--force"])
        .assert()
        .success();
}

#[test]
fn test_init_explain() {
    let temp = create_test_project();

    cli()
        .current_dir(temp.path())
        .args(["init", "src", "--no-progress", "--explain"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Decisions:"))
        .stdout(predicate::str::contains("no-console"));
}

#[test]
fn test_init_extend_recommended() {
    let temp = create_test_project();

    cli()
        .current_dir(temp.path())
        .args(["init", "src", "--no-progress", "--extend-recommended"])
        .assert()
        .success();

    let written = fs::read_to_string(temp.path().join(".lintseedrc.json")).unwrap();
    let config: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert_eq!(config["extends"], "lintseed:recommended");
    assert!(config["rules"].get("no-debugger").is_none());
    assert!(config["rules"].get("no-unused-vars").is_none());
    assert_eq!(config["rules"]["semi"], serde_json::json!(["error", "always"]));
}

#[test]
fn test_init_timeout_cancels_discovery() {
    let temp = create_test_project();

    cli()
        .current_dir(temp.path())
        .args(["init", "src", "--no-progress", "--timeout", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cancelled"));

    assert!(!temp.path().join(".lintseedrc.json").exists());
}

#[test]
fn test_init_empty_corpus_fails() {
    let temp = TempDir::new().unwrap();

    cli()
        .current_dir(temp.path())
        .args(["init", "missing/*.js", "--no-progress"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No files matched"));
}

#[test]
fn test_init_unparsable_corpus_fails() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("broken.js"), "const s = \"open;\n").unwrap();

    cli()
        .current_dir(temp.path())
        .args(["init", "--no-progress"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Automatic configuration failed"));
}

#[test]
fn test_lint_clean_project() {
    let temp = create_test_project();
    fs::write(
        temp.path().join(".lintseedrc.json"),
        r#"{ "rules": { "semi": ["error", "always"], "quotes": ["error", "double"] } }"#,
    )
    .unwrap();

    cli()
        .current_dir(temp.path())
        .args(["lint", "src"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No issues found"));
}

#[test]
fn test_lint_reports_findings() {
    let temp = create_test_project();
    fs::write(
        temp.path().join(".lintseedrc.json"),
        r#"{ "rules": { "quotes": ["error", "single"] } }"#,
    )
    .unwrap();

    cli()
        .current_dir(temp.path())
        .args(["lint", "src", "--format", "json"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Strings must use singlequote."));
}

#[test]
fn test_lint_warnings_do_not_fail() {
    let temp = create_test_project();
    fs::write(
        temp.path().join(".lintseedrc.json"),
        r#"{ "rules": { "semi": ["warn", "never"] } }"#,
    )
    .unwrap();

    cli()
        .current_dir(temp.path())
        .args(["lint", "src", "--format", "compact"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0 errors"));
}

#[test]
fn test_lint_with_discovered_config() {
    let temp = create_test_project();

    cli()
        .current_dir(temp.path())
        .args(["init", "src", "--no-progress"])
        .assert()
        .success();

    cli()
        .current_dir(temp.path())
        .args(["lint", "src"])
        .assert()
        .success();
}

#[test]
fn test_rules_list() {
    cli()
        .args(["rules", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("semi"))
        .stdout(predicate::str::contains("Total: 13 rules"));
}

#[test]
fn test_rules_list_by_category() {
    cli()
        .args(["rules", "--category", "layout", "--detailed"])
        .assert()
        .success()
        .stdout(predicate::str::contains("eol-last"))
        .stdout(predicate::str::contains("no-debugger").not());
}

#[test]
fn test_rules_explain() {
    cli()
        .args(["rules", "explain", "semi"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Candidate configurations (3):"));
}

#[test]
fn test_rules_explain_nonexistent() {
    cli()
        .args(["rules", "explain", "no-such-rule"])
        .assert()
        .success()
        .stdout(predicate::str::contains("not found"));
}

#[test]
fn test_config_schema() {
    cli()
        .args(["config", "schema"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"rules\""));
}

#[test]
fn test_config_show_resolves_recommended() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join(".lintseedrc.json"),
        r#"{ "extends": "lintseed:recommended" }"#,
    )
    .unwrap();

    cli()
        .current_dir(temp.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("no-unused-vars"));
}

#[test]
fn test_shell_completion_bash() {
    cli()
        .args(["--generate-completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("lintseed"));
}

#[test]
fn test_invalid_command() {
    cli()
        .arg("invalid-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}
