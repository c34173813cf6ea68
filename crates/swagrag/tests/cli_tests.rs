//! End-to-end tests running the `swagrag` binary.

use serde_json::{Value, json};
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

fn swagrag(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_swagrag"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn file_list(paths: &[&PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Parse stdout of a `--output-format json` run.
fn json_stdout(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).unwrap()
}

const DOC_A: &str = r#"
openapi: 3.0.0
info:
  title: Service A
  version: 1.0.0
servers:
  - url: https://a
paths:
  /x:
    get:
      summary: R1
components:
  schemas:
    Shared:
      type: string
"#;

const DOC_B: &str = r#"
openapi: 3.0.0
servers:
  - url: https://b
paths:
  /x:
    get:
      summary: R2
components:
  schemas:
    Shared:
      type: integer
  responses:
    Shared:
      description: only in b
"#;

#[test]
fn test_two_hosts_prefix_paths() {
    let dir = TempDir::new().unwrap();
    let a = write(&dir, "a.yaml", DOC_A);
    let b = write(&dir, "b.yaml", DOC_B);

    let output = swagrag(&["--file", &file_list(&[&a, &b]), "--output-format", "json"]);

    assert!(output.status.success());
    let doc = json_stdout(&output);
    assert_eq!(
        doc["paths"],
        json!({
            "https://a/x": {"get": {"summary": "R1"}},
            "https://b/x": {"get": {"summary": "R2"}}
        })
    );
    assert_eq!(doc["servers"], json!([{"url": ""}]));
    assert_eq!(doc["openapi"], "3.0.0");
}

#[test]
fn test_component_collision_first_wins() {
    let dir = TempDir::new().unwrap();
    let a = write(&dir, "a.yaml", DOC_A);
    let b = write(&dir, "b.yaml", DOC_B);

    let output = swagrag(&[
        "-f",
        a.to_str().unwrap(),
        "-f",
        b.to_str().unwrap(),
        "--output-format",
        "json",
    ]);

    assert!(output.status.success());
    let doc = json_stdout(&output);
    assert_eq!(doc["components"]["schemas"]["Shared"], json!({"type": "string"}));
    assert_eq!(
        doc["components"]["responses"]["Shared"],
        json!({"description": "only in b"})
    );
    assert!(!output.stderr.is_empty());
}

#[test]
fn test_bad_file_skipped() {
    let dir = TempDir::new().unwrap();
    let a = write(&dir, "a.yaml", DOC_A);
    let broken = write(&dir, "broken.yaml", "paths: {/x: [unclosed\n");
    let b = write(&dir, "b.yaml", DOC_B);

    let output = swagrag(&["--file", &file_list(&[&a, &broken, &b]), "--output-format", "json"]);

    assert!(output.status.success());
    let doc = json_stdout(&output);
    let paths = doc["paths"].as_object().unwrap();
    assert_eq!(paths.len(), 2);
    assert!(paths.contains_key("https://a/x"));
    assert!(paths.contains_key("https://b/x"));
}

#[test]
fn test_single_file_fails_without_output() {
    let dir = TempDir::new().unwrap();
    let a = write(&dir, "a.yaml", DOC_A);

    let output = swagrag(&["--file", a.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
    assert!(!output.stderr.is_empty());
}

#[test]
fn test_duplicate_file_is_usage_error() {
    let dir = TempDir::new().unwrap();
    let a = write(&dir, "a.yaml", DOC_A);

    let output = swagrag(&["--file", &file_list(&[&a, &a])]);

    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_no_file_flag_fails() {
    let output = swagrag(&[]);

    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_all_sources_missing_fails() {
    let dir = TempDir::new().unwrap();
    let a = dir.path().join("a.yaml");
    let b = dir.path().join("b.yaml");

    let output = swagrag(&["--file", &file_list(&[&a, &b])]);

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_title_and_version_flags() {
    let dir = TempDir::new().unwrap();
    let a = write(&dir, "a.yaml", DOC_A);
    let b = write(&dir, "b.yaml", DOC_B);

    let output = swagrag(&[
        "--file",
        &file_list(&[&a, &b]),
        "--api-version",
        "7.0.0",
        "--openapi-version",
        "3.0.3",
        "--output-format",
        "json",
    ]);

    assert!(output.status.success());
    let doc = json_stdout(&output);
    assert_eq!(doc["openapi"], "3.0.3");
    assert_eq!(doc["info"]["version"], "7.0.0");
    let title = doc["info"]["title"].as_str().unwrap();
    assert!(title.starts_with("Combined API from "));
    assert!(title.contains("a.yaml") && title.contains("b.yaml"));
}

#[test]
fn test_yaml_output_is_default() {
    let dir = TempDir::new().unwrap();
    let a = write(&dir, "a.yaml", DOC_A);
    let b = write(&dir, "b.yaml", DOC_B);

    let output = swagrag(&["--file", &file_list(&[&a, &b]), "--api-title", "Gateway"]);

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with("openapi:"));
    assert!(stdout.contains("title: Gateway"));
    assert!(stdout.contains("https://a/x"));
}
