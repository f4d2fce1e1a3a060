//! Integration tests for the `wikiqa` binary
//!
//! None of these reach the network: they cover configuration output,
//! argument validation and inputs rejected before any request is made.

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output};

fn wikiqa_bin() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // Remove test binary name
    path.pop(); // Remove 'deps' directory
    path.push("wikiqa");
    path
}

/// Run the binary in an empty directory with a clean WikiQA environment
fn run(args: &[&str]) -> Output {
    let dir = tempfile::tempdir().unwrap();
    let mut command = Command::new(wikiqa_bin());
    command.args(args).current_dir(dir.path());
    for (key, _) in std::env::vars() {
        if key.starts_with("WIKIQA_") || key == "HF_TOKEN" || key == "RUST_LOG" {
            command.env_remove(key);
        }
    }
    command.output().expect("Failed to execute command")
}

#[test]
fn test_config_json_output_is_valid() {
    let output = run(&["config", "--json"]);
    assert!(output.status.success(), "Command should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    let parsed: serde_json::Value =
        serde_json::from_str(&stdout).expect("Output should be valid JSON");

    assert_eq!(parsed["status"], "success");
    let entries = parsed["data"].as_array().expect("data should be a list");
    let model = entries
        .iter()
        .find(|e| e["key"] == "model")
        .expect("model entry");
    assert_eq!(model["value"], "huggingface:deepset/tinyroberta-squad2");
    assert_eq!(model["source"], "Default");

    let token = entries.iter().find(|e| e["key"] == "api_token").expect("token entry");
    assert_eq!(token["value"], "(unset)");
}

#[test]
fn test_cli_flags_take_precedence_in_config_output() {
    let output = run(&["config", "--json", "--language", "de", "--timeout-secs", "7"]);
    assert!(output.status.success());

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let entries = parsed["data"].as_array().unwrap();
    let language = entries.iter().find(|e| e["key"] == "language").unwrap();
    assert_eq!(language["value"], "de");
    assert_eq!(language["source"], "Cli");
    let content = entries.iter().find(|e| e["key"] == "content_endpoint").unwrap();
    assert_eq!(content["value"], "https://de.wikipedia.org/w/api.php");
    let timeout = entries.iter().find(|e| e["key"] == "timeout").unwrap();
    assert_eq!(timeout["value"], "7s");
}

#[test]
fn test_config_file_is_loaded() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "language = \"fr\"").unwrap();
    let path = file.path().to_str().unwrap().to_string();

    let output = run(&["config", "--json", "--config", &path]);
    assert!(output.status.success());

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let entries = parsed["data"].as_array().unwrap();
    let language = entries.iter().find(|e| e["key"] == "language").unwrap();
    assert_eq!(language["value"], "fr");
    assert_eq!(language["source"], "File");
}

#[test]
fn test_unknown_config_key_fails() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "modle = \"huggingface:x\"").unwrap();
    let path = file.path().to_str().unwrap().to_string();

    let output = run(&["config", "--config", &path]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_blank_question_is_rejected_before_any_request() {
    let output = run(&["ask", "   "]);
    assert_eq!(output.status.code(), Some(1));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Query must not be empty"));
}

#[test]
fn test_json_errors_use_the_envelope() {
    let output = run(&["ask", "--json", " "]);
    assert!(!output.status.success());

    let parsed: serde_json::Value =
        serde_json::from_slice(&output.stderr).expect("stderr should be valid JSON");
    assert_eq!(parsed["status"], "error");
    assert!(output.stdout.is_empty());
}

#[test]
fn test_unknown_model_provider_is_rejected() {
    let output = run(&["ask", "--model", "openai:gpt-4", "Who wrote Hamlet?"]);
    assert_eq!(output.status.code(), Some(1));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid configuration: model"));
}

#[cfg(not(feature = "local"))]
#[test]
fn test_local_model_needs_local_build() {
    let output = run(&["ask", "--model", "local:deepset/bert-base-cased-squad2", "Who?"]);
    assert_eq!(output.status.code(), Some(1));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Answer model unavailable"));
    assert!(stderr.contains("--features local"));
}

#[test]
fn test_help_lists_subcommands() {
    let output = run(&["--help"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    for command in ["ask", "search", "fetch", "config"] {
        assert!(stdout.contains(command), "help should mention {}", command);
    }
}
