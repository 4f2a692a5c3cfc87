//! Shared fixtures and helpers for integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

/// A full mapping state file: Hebrew letters over a Latin keyboard.
pub const HEBREW_STATE_JSON: &str =
    r#"{"mapping": {"a": "א", "b": "בּ", "s": "ש", "t": "ט"}, "enabled": true}"#;

/// A bare mapping object (no enabled flag; treated as enabled).
pub const HEBREW_BARE_JSON: &str = r#"{"a": "א", "s": "ש"}"#;

/// Writes a mapping fixture file and returns its path.
pub fn write_mapping_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("Failed to write mapping fixture");
    path
}
