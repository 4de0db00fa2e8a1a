use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::Value;

fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../..")
}

fn fixture_path(name: &str) -> String {
    workspace_root()
        .join("tests/fixtures")
        .join(name)
        .to_string_lossy()
        .to_string()
}

fn fixture_text(name: &str) -> String {
    fs::read_to_string(fixture_path(name))
        .expect("fixture should be readable")
        .trim_end()
        .to_string()
}

fn run_cli(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_cc2-save"))
        .args(args)
        .output()
        .expect("failed to run cc2-save CLI")
}

fn temp_output_path(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before unix epoch")
        .as_nanos();
    std::env::temp_dir().join(format!("{prefix}_{}_{}.save", std::process::id(), nanos))
}

#[test]
fn decode_prints_verbatim_json() {
    let output = run_cli(&["decode", &fixture_path("sample_save.txt")]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim_end(), fixture_text("sample_save.json"));
}

#[test]
fn decode_pretty_writes_indented_json() {
    let out_path = temp_output_path("cc2_decode_pretty");
    let out_str = out_path.to_string_lossy().to_string();

    let output = run_cli(&[
        "decode",
        "--pretty",
        "--output",
        &out_str,
        &fixture_path("sample_save.txt"),
    ]);
    assert!(output.status.success());

    let written = fs::read_to_string(&out_path).expect("output file should exist");
    assert!(written.starts_with("{\n  \"money\""));
    let json: Value = serde_json::from_str(&written).expect("output should be JSON");
    assert_eq!(json["tickets"], 42);

    let _ = fs::remove_file(out_path);
}

#[test]
fn encode_matches_fixture() {
    let output = run_cli(&["encode", &fixture_path("sample_save.json")]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim_end(), fixture_text("sample_save.txt"));
}

#[test]
fn encode_reads_stdin() {
    let mut child = Command::new(env!("CARGO_BIN_EXE_cc2-save"))
        .args(["encode", "-"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("failed to spawn cc2-save CLI");
    child
        .stdin
        .take()
        .expect("stdin should be piped")
        .write_all(b"{\"money\":1}")
        .expect("write stdin");
    let output = child.wait_with_output().expect("wait for CLI");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let decoded = cc2_decode(stdout.trim_end());
    assert_eq!(decoded, "{\"money\":1}");
}

#[test]
fn encode_rejects_invalid_json() {
    let output = run_cli(&["encode", &fixture_path("sample_save.txt")]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error parsing save data"));
}

#[test]
fn show_json_reports_snapshot() {
    let output = run_cli(&["show", "--json", &fixture_path("sample_save.txt")]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let json: Value = serde_json::from_str(&stdout).expect("stdout should be valid JSON");
    assert_eq!(json["format"], "encoded");
    assert_eq!(json["money"], 125075);
    assert_eq!(json["inventory_count"], 3);
    assert_eq!(json["inventory"][0], "AK-47 | Redline (Field-Tested)");
}

#[test]
fn show_text_lists_inventory() {
    let output = run_cli(&["show", &fixture_path("sample_save.json")]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Format:     json"));
    assert!(stdout.contains("Money:      $1250.75"));
    assert!(stdout.contains("[2] Glock-18 | Water Elemental (Minimal Wear)"));
}

#[test]
fn edit_writes_encoded_save_by_default() {
    let out_path = temp_output_path("cc2_edit_encoded");
    let out_str = out_path.to_string_lossy().to_string();

    let output = run_cli(&[
        "edit",
        &fixture_path("sample_save.txt"),
        "--output",
        &out_str,
        "--set",
        "money=500000",
        "--set",
        "stats.clicks=1",
        "--remove-item",
        "0",
        "--add-item",
        "M4A4 | Howl (Factory New)",
    ]);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let written = fs::read_to_string(&out_path).expect("output file should exist");
    let json: Value = serde_json::from_str(&cc2_decode(&written)).expect("decoded output is JSON");
    assert_eq!(json["money"], 500000);
    assert_eq!(json["stats"]["clicks"], 1);
    assert_eq!(json["inventory"][0], "AWP | Asiimov (Battle-Scarred)");
    assert_eq!(json["inventory"][2], "M4A4 | Howl (Factory New)");
    assert_eq!(json["discoveredItems"][3], "Howl (Factory New)");

    let _ = fs::remove_file(out_path);
}

#[test]
fn edit_max_stats_can_emit_json() {
    let out_path = temp_output_path("cc2_edit_json");
    let out_str = out_path.to_string_lossy().to_string();

    let output = run_cli(&[
        "edit",
        &fixture_path("sample_save.txt"),
        "--output",
        &out_str,
        "--max-stats",
        "--emit",
        "json",
    ]);
    assert!(output.status.success());

    let written = fs::read_to_string(&out_path).expect("output file should exist");
    let json: Value = serde_json::from_str(&written).expect("output should be JSON");
    assert_eq!(json["money"], 2147483647);
    assert_eq!(json["upgrades"]["unlockStickers"], 1);
    assert_eq!(json["stats"]["achievements_completed"], 4);

    let _ = fs::remove_file(out_path);
}

#[test]
fn edit_without_changes_is_a_usage_error() {
    let out_path = temp_output_path("cc2_edit_noop");
    let out_str = out_path.to_string_lossy().to_string();

    let output = run_cli(&[
        "edit",
        &fixture_path("sample_save.json"),
        "--output",
        &out_str,
    ]);
    assert_eq!(output.status.code(), Some(2));
    assert!(!out_path.exists());
}

#[test]
fn edit_reports_unknown_fields() {
    let out_path = temp_output_path("cc2_edit_unknown");
    let out_str = out_path.to_string_lossy().to_string();

    let output = run_cli(&[
        "edit",
        &fixture_path("sample_save.json"),
        "--output",
        &out_str,
        "--set",
        "gems=5",
    ]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--set gems"));
    assert!(!out_path.exists());
}

fn cc2_decode(encoded: &str) -> String {
    let mut child = Command::new(env!("CARGO_BIN_EXE_cc2-save"))
        .args(["decode", "-"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("failed to spawn cc2-save CLI");
    child
        .stdin
        .take()
        .expect("stdin should be piped")
        .write_all(encoded.as_bytes())
        .expect("write stdin");
    let output = child.wait_with_output().expect("wait for CLI");
    assert!(output.status.success());
    String::from_utf8_lossy(&output.stdout).trim_end().to_string()
}
