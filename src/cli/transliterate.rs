//! Headless transliteration command.
//!
//! Applies the keyboard mapping to text as if it were typed, which makes the
//! transliterator scriptable and end-to-end testable without a terminal.

use std::fs;
use std::io::{self, BufRead};
use std::path::PathBuf;

use clap::Args;

use crate::cli::common::{CliError, CliResult};
use crate::config::Config;
use crate::models::{KeyboardMapping, MappingState};
use crate::services::MappingStore;
use crate::translit::transliterate_text;

/// Apply the keyboard mapping to text
#[derive(Args, Debug)]
pub struct TransliterateArgs {
    /// Text to transliterate; reads lines from stdin when omitted
    #[arg(value_name = "TEXT")]
    text: Vec<String>,

    /// Use a mapping from a JSON file instead of the saved mapping.
    /// Accepts either `{"mapping": {...}, "enabled": bool}` or a bare
    /// mapping object (treated as enabled).
    #[arg(long, value_name = "FILE")]
    mapping: Option<PathBuf>,

    /// Force transliteration off (text passes through unchanged)
    #[arg(long)]
    disabled: bool,
}

impl TransliterateArgs {
    /// Execute transliterate command
    pub fn execute(&self) -> CliResult<()> {
        let mut state = self.resolve_state()?;
        if self.disabled {
            state.enabled = false;
        }

        if self.text.is_empty() {
            let stdin = io::stdin();
            for line in stdin.lock().lines() {
                let line =
                    line.map_err(|e| CliError::io(format!("Failed to read stdin: {}", e)))?;
                println!("{}", transliterate_text(&line, &state));
            }
        } else {
            for text in &self.text {
                println!("{}", transliterate_text(text, &state));
            }
        }

        Ok(())
    }

    fn resolve_state(&self) -> CliResult<MappingState> {
        if let Some(path) = &self.mapping {
            let content = fs::read_to_string(path).map_err(|e| {
                CliError::io(format!("Failed to read mapping file {}: {}", path.display(), e))
            })?;
            return parse_mapping_file(&content).map_err(|e| {
                CliError::validation(format!(
                    "Failed to parse mapping file {}: {}",
                    path.display(),
                    e
                ))
            });
        }

        let config = Config::load()
            .map_err(|e| CliError::validation(format!("Failed to load configuration: {}", e)))?;
        let store = MappingStore::at_default_location()
            .map_err(|e| CliError::io(format!("Failed to locate mapping store: {}", e)))?;
        store
            .effective(&config.keyboard)
            .map_err(|e| CliError::io(format!("Failed to load mapping: {}", e)))
    }
}

/// Parses a mapping file: a full state object, or a bare mapping table
/// treated as enabled.
fn parse_mapping_file(content: &str) -> Result<MappingState, serde_json::Error> {
    if let Ok(state) = serde_json::from_str::<MappingState>(content) {
        return Ok(state);
    }
    serde_json::from_str::<KeyboardMapping>(content).map(MappingState::enabled)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_state() {
        let state = parse_mapping_file(r#"{"mapping": {"a": "א"}, "enabled": false}"#).unwrap();
        assert!(!state.enabled);
        assert_eq!(state.mapping.get('a'), Some("א"));
    }

    #[test]
    fn test_parse_bare_mapping_is_enabled() {
        let state = parse_mapping_file(r#"{"a": "א"}"#).unwrap();
        assert!(state.enabled);
        assert_eq!(state.mapping.get('a'), Some("א"));
    }

    #[test]
    fn test_parse_invalid_json() {
        assert!(parse_mapping_file("not json").is_err());
    }
}
