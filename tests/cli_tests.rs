//! CLI integration tests
//!
//! These tests verify the CLI commands work correctly by running the binary.

#![cfg(feature = "cli")]

use std::io::Write;
use std::process::{Command, Stdio};

fn jsonxml_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_jsonxml"))
}

fn write_temp(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(contents.as_bytes())
        .expect("Failed to write temp file");
    file
}

// ============================================================================
// Convert Command Tests
// ============================================================================

#[test]
fn test_cli_convert_file() {
    let input = write_temp(r#"{"title": "Hello", "tags": ["a", "b"]}"#);

    let output = jsonxml_bin()
        .args(["convert", input.path().to_str().unwrap()])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "convert should succeed");
    assert!(stdout.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>"));
    assert!(stdout.contains("<title handle=\"title\" value=\"title\">Hello</title>"));
    assert!(stdout.contains("<item>b</item>"));
}

#[test]
fn test_cli_convert_stdin_fragment() {
    let mut child = jsonxml_bin()
        .args(["convert", "--fragment", "--indent", "0"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("Failed to spawn command");

    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"callback([1, 2]);")
        .unwrap();

    let output = child.wait_with_output().expect("Failed to wait on command");
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert_eq!(stdout, "<data><item>1</item><item>2</item></data>\n");
}

#[test]
fn test_cli_convert_ascii_names() {
    let input = write_temp(r#"{"größe": 1}"#);

    let output = jsonxml_bin()
        .args([
            "convert",
            "--fragment",
            "--ascii-names",
            input.path().to_str().unwrap(),
        ])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("<key handle=\"groesse\""), "{}", stdout);
}

#[test]
fn test_cli_convert_with_config_and_output() {
    let config = write_temp(r#"{"root_tag": "feed", "item_tag": "entry"}"#);
    let input = write_temp("[true]");
    let dir = tempfile::tempdir().unwrap();
    let out_path = dir.path().join("out.xml");

    let output = jsonxml_bin()
        .args([
            "convert",
            "--config",
            config.path().to_str().unwrap(),
            "--output",
            out_path.to_str().unwrap(),
            input.path().to_str().unwrap(),
        ])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    assert!(output.stdout.is_empty());

    let written = std::fs::read_to_string(&out_path).unwrap();
    assert!(written.contains("<feed>"));
    assert!(written.contains("<entry>true</entry>"));
}

#[test]
fn test_cli_convert_malformed_input() {
    let input = write_temp("not json at all");

    let output = jsonxml_bin()
        .args(["convert", input.path().to_str().unwrap()])
        .output()
        .expect("Failed to execute command");

    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success(), "malformed input should fail");
    assert!(output.stdout.is_empty(), "no partial output");
    assert!(stderr.contains("JSON not formatted correctly"));
}

#[test]
fn test_cli_convert_missing_file() {
    let output = jsonxml_bin()
        .args(["convert", "/nonexistent/input.json"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
}

// ============================================================================
// Name Command Tests
// ============================================================================

#[test]
fn test_cli_name() {
    let output = jsonxml_bin()
        .args(["name", "Title", "two words"])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();

    assert!(output.status.success());
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("<title>") && lines[0].ends_with("direct"));
    assert!(lines[1].contains("<key>") && lines[1].ends_with("fallback"));
}
