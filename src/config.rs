//! Configuration management for the application.
//!
//! This module handles loading, validating, and saving application
//! configuration in TOML format with platform-specific directory resolution.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::models::{KeyboardMapping, MappingState};

/// Theme display mode preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ThemeMode {
    /// Automatically detect OS theme (dark/light)
    #[default]
    Auto,
    /// Always use dark theme
    Dark,
    /// Always use light theme
    Light,
}

/// Backend connection configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the web application serving `/keyboard` and `/updateKeyboard`.
    pub site_url: String,
    /// URL of the search service taking `command=` queries.
    pub search_url: String,
    /// Username sent with correction submissions.
    pub username: String,
    /// Client IP sent with correction submissions, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Default request timeout (seconds).
fn default_timeout_secs() -> u64 {
    10
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            site_url: "http://127.0.0.1:8080".to_string(),
            search_url: "http://127.0.0.1:8080/search".to_string(),
            username: "anonymous".to_string(),
            ip: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Default keyboard mapping served when the user has not saved their own.
///
/// Keys must be single characters; longer keys are dropped when the table is
/// turned into a [`MappingState`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct KeyboardConfig {
    /// Default source-character to replacement-string table.
    #[serde(default)]
    pub mapping: BTreeMap<String, String>,
    /// Whether transliteration is enabled by default.
    #[serde(default)]
    pub enabled: bool,
}

impl KeyboardConfig {
    /// Builds the default transliteration state from the configured table.
    #[must_use]
    pub fn to_state(&self) -> MappingState {
        MappingState {
            mapping: KeyboardMapping::from_string_entries(
                self.mapping.iter().map(|(k, v)| (k.clone(), v.clone())),
            ),
            enabled: self.enabled,
        }
    }
}

/// Correction dialog configuration: the font and language codes offered when
/// submitting a correction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrectionConfig {
    /// Font codes selectable in the correction dialog.
    pub fonts: Vec<String>,
    /// Language codes selectable in the correction dialog.
    pub languages: Vec<String>,
}

impl Default for CorrectionConfig {
    fn default() -> Self {
        Self {
            fonts: vec!["serif".to_string(), "serifItalic".to_string()],
            languages: vec!["yi".to_string()],
        }
    }
}

/// UI preferences configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiConfig {
    /// Display help on startup
    pub show_help_on_startup: bool,
    /// Theme mode preference (Auto, Dark, Light)
    #[serde(default)]
    pub theme_mode: ThemeMode,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            show_help_on_startup: true,
            theme_mode: ThemeMode::default(),
        }
    }
}

/// Application configuration.
///
/// # File Location
///
/// - Linux: `~/.config/Foliosearch/config.toml`
/// - macOS: `~/Library/Application Support/Foliosearch/config.toml`
/// - Windows: `%APPDATA%\Foliosearch\config.toml`
///
/// The `FOLIOSEARCH_CONFIG_DIR` environment variable overrides the directory,
/// which is how tests isolate themselves from a real installation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Backend connection settings
    #[serde(default)]
    pub backend: BackendConfig,
    /// Default keyboard mapping
    #[serde(default)]
    pub keyboard: KeyboardConfig,
    /// Correction dialog settings
    #[serde(default)]
    pub correction: CorrectionConfig,
    /// UI preferences
    #[serde(default)]
    pub ui: UiConfig,
}

impl Config {
    /// Creates a new Config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks if the config file exists on disk.
    #[must_use]
    pub fn exists() -> bool {
        Self::config_file_path()
            .map(|path| path.exists())
            .unwrap_or(false)
    }

    /// Gets the platform-specific config directory path.
    ///
    /// Honors the `FOLIOSEARCH_CONFIG_DIR` environment variable override.
    pub fn config_dir() -> Result<PathBuf> {
        if let Ok(dir) = std::env::var("FOLIOSEARCH_CONFIG_DIR") {
            return Ok(PathBuf::from(dir));
        }

        let config_dir = dirs::config_dir()
            .context("Failed to determine config directory")?
            .join("Foliosearch");

        Ok(config_dir)
    }

    /// Gets the full path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Loads configuration from the config file.
    ///
    /// If the file doesn't exist, returns default configuration.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_file_path()?;

        if !config_path.exists() {
            return Ok(Self::new());
        }

        let content = fs::read_to_string(&config_path).context(format!(
            "Failed to read config file: {}",
            config_path.display()
        ))?;

        let config: Self = toml::from_str(&content).context(format!(
            "Failed to parse config file: {}",
            config_path.display()
        ))?;

        config.validate()?;

        Ok(config)
    }

    /// Saves configuration to the config file using atomic write.
    ///
    /// Uses temp file + rename pattern for atomic writes.
    pub fn save(&self) -> Result<()> {
        self.validate()?;

        // Ensure config directory exists
        let config_dir = Self::config_dir()?;
        fs::create_dir_all(&config_dir).context(format!(
            "Failed to create config directory: {}",
            config_dir.display()
        ))?;

        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        let config_path = Self::config_file_path()?;
        let temp_path = config_path.with_extension("toml.tmp");

        fs::write(&temp_path, content).context(format!(
            "Failed to write temp config file: {}",
            temp_path.display()
        ))?;

        fs::rename(&temp_path, &config_path).context(format!(
            "Failed to rename temp config file to: {}",
            config_path.display()
        ))?;

        Ok(())
    }

    /// Validates configuration values.
    ///
    /// Checks:
    /// - backend URLs are non-empty and use an http(s) scheme
    /// - the request timeout is non-zero
    /// - correction font/language lists are non-empty
    pub fn validate(&self) -> Result<()> {
        for (name, url) in [
            ("site_url", &self.backend.site_url),
            ("search_url", &self.backend.search_url),
        ] {
            if url.is_empty() {
                anyhow::bail!("Backend {name} must not be empty");
            }
            if !url.starts_with("http://") && !url.starts_with("https://") {
                anyhow::bail!("Backend {name} must start with http:// or https://: {url}");
            }
        }

        if self.backend.timeout_secs == 0 {
            anyhow::bail!("Backend timeout_secs must be greater than zero");
        }

        if self.correction.fonts.is_empty() {
            anyhow::bail!("Correction font list must not be empty");
        }
        if self.correction.languages.is_empty() {
            anyhow::bail!("Correction language list must not be empty");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_new() {
        let config = Config::new();
        assert_eq!(config.backend.timeout_secs, 10);
        assert!(config.ui.show_help_on_startup);
        assert_eq!(config.ui.theme_mode, ThemeMode::Auto);
        assert!(!config.keyboard.enabled);
        assert!(config.keyboard.mapping.is_empty());
    }

    #[test]
    fn test_config_validate_default() {
        assert!(Config::new().validate().is_ok());
    }

    #[test]
    fn test_config_validate_rejects_bad_urls() {
        let mut config = Config::new();
        config.backend.site_url = String::new();
        assert!(config.validate().is_err());

        config.backend.site_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validate_rejects_zero_timeout() {
        let mut config = Config::new();
        config.backend.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_toml_round_trip() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");

        let mut config = Config::new();
        config
            .keyboard
            .mapping
            .insert("a".to_string(), "א".to_string());
        config.keyboard.enabled = true;

        let content = toml::to_string_pretty(&config).unwrap();
        fs::write(&config_file, content).unwrap();

        let content = fs::read_to_string(&config_file).unwrap();
        let loaded: Config = toml::from_str(&content).unwrap();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_keyboard_config_to_state_drops_long_keys() {
        let mut keyboard = KeyboardConfig::default();
        keyboard.mapping.insert("a".to_string(), "א".to_string());
        keyboard.mapping.insert("sh".to_string(), "ש".to_string());
        keyboard.enabled = true;

        let state = keyboard.to_state();
        assert!(state.enabled);
        assert_eq!(state.mapping.len(), 1);
        assert_eq!(state.mapping.get('a'), Some("א"));
    }

    #[test]
    fn test_partial_config_file_fills_defaults() {
        let content = r#"
            [backend]
            site_url = "http://example.com"
            search_url = "http://example.com/search"
            username = "tester"
        "#;
        let config: Config = toml::from_str(content).unwrap();
        assert_eq!(config.backend.username, "tester");
        assert_eq!(config.backend.timeout_secs, 10);
        assert!(config.ui.show_help_on_startup);
    }
}
