//! End-to-end tests for `foliosearch keyboard` commands.
//!
//! Each test runs against its own isolated config directory via the
//! `FOLIOSEARCH_CONFIG_DIR` environment variable, so tests never touch a
//! real installation and can run in parallel.

use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

/// Path to the foliosearch binary
fn foliosearch_bin() -> String {
    std::env::var("CARGO_BIN_EXE_foliosearch")
        .unwrap_or_else(|_| "target/debug/foliosearch".to_string())
}

/// Creates a Command with an isolated config directory.
fn isolated_command(args: &[&str], config_dir: &Path) -> Command {
    let mut cmd = Command::new(foliosearch_bin());
    cmd.env("FOLIOSEARCH_CONFIG_DIR", config_dir);
    cmd.args(args);
    cmd
}

fn show_json(config_dir: &Path) -> serde_json::Value {
    let output = isolated_command(&["keyboard", "show", "--json"], config_dir)
        .output()
        .expect("Failed to execute command");
    assert_eq!(
        output.status.code(),
        Some(0),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("Should parse JSON output")
}

// ============================================================================
// Show Command Tests
// ============================================================================

#[test]
fn test_show_fresh_state_is_empty_and_disabled() {
    let config_dir = TempDir::new().expect("Failed to create temp dir");

    let state = show_json(config_dir.path());
    assert_eq!(state["enabled"], serde_json::Value::Bool(false));
    assert!(state["mapping"].as_object().unwrap().is_empty());
}

#[test]
fn test_show_human_readable() {
    let config_dir = TempDir::new().expect("Failed to create temp dir");

    let output = isolated_command(&["keyboard", "show"], config_dir.path())
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Transliteration: disabled"));
}

// ============================================================================
// Set / Remove / Enable Tests
// ============================================================================

#[test]
fn test_set_then_show_round_trip() {
    let config_dir = TempDir::new().expect("Failed to create temp dir");

    let status = isolated_command(
        &["keyboard", "set", "--from", "a", "--to", "א"],
        config_dir.path(),
    )
    .status()
    .expect("Failed to execute command");
    assert!(status.success());

    let state = show_json(config_dir.path());
    assert_eq!(state["mapping"]["a"], "א");
}

#[test]
fn test_set_rejects_multi_char_source() {
    let config_dir = TempDir::new().expect("Failed to create temp dir");

    let output = isolated_command(
        &["keyboard", "set", "--from", "ab", "--to", "x"],
        config_dir.path(),
    )
    .output()
    .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("exactly one character"));
}

#[test]
fn test_set_rejects_empty_replacement() {
    let config_dir = TempDir::new().expect("Failed to create temp dir");

    let output = isolated_command(
        &["keyboard", "set", "--from", "a", "--to", ""],
        config_dir.path(),
    )
    .output()
    .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_remove_entry() {
    let config_dir = TempDir::new().expect("Failed to create temp dir");

    isolated_command(
        &["keyboard", "set", "--from", "a", "--to", "א"],
        config_dir.path(),
    )
    .status()
    .expect("Failed to execute command");

    let status = isolated_command(&["keyboard", "remove", "--from", "a"], config_dir.path())
        .status()
        .expect("Failed to execute command");
    assert!(status.success());

    let state = show_json(config_dir.path());
    assert!(state["mapping"].as_object().unwrap().is_empty());
}

#[test]
fn test_remove_missing_entry_fails() {
    let config_dir = TempDir::new().expect("Failed to create temp dir");

    let output = isolated_command(&["keyboard", "remove", "--from", "z"], config_dir.path())
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("No mapping entry"));
}

#[test]
fn test_enable_disable_round_trip() {
    let config_dir = TempDir::new().expect("Failed to create temp dir");

    isolated_command(&["keyboard", "enable"], config_dir.path())
        .status()
        .expect("Failed to execute command");
    assert_eq!(
        show_json(config_dir.path())["enabled"],
        serde_json::Value::Bool(true)
    );

    isolated_command(&["keyboard", "disable"], config_dir.path())
        .status()
        .expect("Failed to execute command");
    assert_eq!(
        show_json(config_dir.path())["enabled"],
        serde_json::Value::Bool(false)
    );
}

#[test]
fn test_reset_discards_saved_mapping() {
    let config_dir = TempDir::new().expect("Failed to create temp dir");

    isolated_command(
        &["keyboard", "set", "--from", "a", "--to", "א"],
        config_dir.path(),
    )
    .status()
    .expect("Failed to execute command");

    let status = isolated_command(&["keyboard", "reset"], config_dir.path())
        .status()
        .expect("Failed to execute command");
    assert!(status.success());

    let state = show_json(config_dir.path());
    assert!(state["mapping"].as_object().unwrap().is_empty());
}

// ============================================================================
// Transliterate Through the Saved Mapping
// ============================================================================

#[test]
fn test_saved_mapping_drives_transliteration() {
    let config_dir = TempDir::new().expect("Failed to create temp dir");

    isolated_command(
        &["keyboard", "set", "--from", "s", "--to", "ש"],
        config_dir.path(),
    )
    .status()
    .expect("Failed to execute command");
    isolated_command(&["keyboard", "enable"], config_dir.path())
        .status()
        .expect("Failed to execute command");

    let output = isolated_command(&["transliterate", "sos"], config_dir.path())
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim_end(), "שoש");
}
