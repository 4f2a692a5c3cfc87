//! File-backed keyboard mapping store.
//!
//! The store holds the user's saved mapping override as a single JSON file
//! under the config directory. An absent file means "no override": readers
//! fall back to the default mapping from [`KeyboardConfig`]. Saving writes
//! the whole file atomically, so readers never observe a partial mapping.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::{Config, KeyboardConfig};
use crate::models::{KeyboardMapping, KeyboardUpdate, MappingState, UpdateAction};

/// The persisted mapping override.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredMapping {
    /// Saved transliteration table.
    pub mapping: KeyboardMapping,
    /// Saved enabled flag.
    pub enabled: bool,
    /// When the override was last saved.
    pub modified: DateTime<Utc>,
}

/// Store for the user's saved keyboard mapping.
#[derive(Debug, Clone)]
pub struct MappingStore {
    path: PathBuf,
}

impl MappingStore {
    /// Creates a store over the given file path.
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Creates a store at the default location (`keyboard.json` in the
    /// config directory).
    pub fn at_default_location() -> Result<Self> {
        Ok(Self::new(Config::config_dir()?.join("keyboard.json")))
    }

    /// Returns the path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the saved override, if one exists.
    pub fn load(&self) -> Result<Option<StoredMapping>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path).context(format!(
            "Failed to read keyboard mapping file: {}",
            self.path.display()
        ))?;

        let stored: StoredMapping = serde_json::from_str(&content).context(format!(
            "Failed to parse keyboard mapping file: {}",
            self.path.display()
        ))?;

        Ok(Some(stored))
    }

    /// Saves a mapping override, replacing any previous one.
    ///
    /// Uses temp file + rename pattern for atomic writes.
    pub fn save(&self, mapping: KeyboardMapping, enabled: bool) -> Result<()> {
        let stored = StoredMapping {
            mapping,
            enabled,
            modified: Utc::now(),
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).context(format!(
                "Failed to create mapping store directory: {}",
                parent.display()
            ))?;
        }

        let content =
            serde_json::to_string_pretty(&stored).context("Failed to serialize keyboard mapping")?;

        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, content).context(format!(
            "Failed to write temp mapping file: {}",
            temp_path.display()
        ))?;
        fs::rename(&temp_path, &self.path).context(format!(
            "Failed to rename temp mapping file to: {}",
            self.path.display()
        ))?;

        Ok(())
    }

    /// Deletes the saved override, falling back to the configured default.
    pub fn reset(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path).context(format!(
                "Failed to remove keyboard mapping file: {}",
                self.path.display()
            ))?;
        }
        Ok(())
    }

    /// Returns the effective transliteration state: the saved override when
    /// present, else the configured default.
    pub fn effective(&self, defaults: &KeyboardConfig) -> Result<MappingState> {
        match self.load()? {
            Some(stored) => Ok(MappingState {
                mapping: stored.mapping,
                enabled: stored.enabled,
            }),
            None => Ok(defaults.to_state()),
        }
    }

    /// Applies an update request: `save` persists the submitted entries,
    /// `default` deletes the override.
    pub fn apply_update(&self, update: &KeyboardUpdate) -> Result<()> {
        match update.action {
            UpdateAction::Save => self.save(update.to_mapping(), update.enabled),
            UpdateAction::Default => self.reset(),
        }
    }
}
