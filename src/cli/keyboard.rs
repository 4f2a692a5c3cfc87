//! Saved keyboard mapping CLI commands.
//!
//! These commands operate on the same store the keyboard endpoint server
//! serves, so edits made here are what the client sees on its next reload.

use clap::{Args, Subcommand};

use crate::cli::common::{CliError, CliResult};
use crate::config::Config;
use crate::models::MappingState;
use crate::services::MappingStore;

/// Keyboard mapping commands
#[derive(Args, Debug)]
pub struct KeyboardArgs {
    #[command(subcommand)]
    command: KeyboardCommand,
}

#[derive(Subcommand, Debug)]
enum KeyboardCommand {
    /// Display the effective mapping and enabled flag
    Show(KeyboardShowArgs),
    /// Add or replace a single mapping entry
    Set(KeyboardSetArgs),
    /// Remove a single mapping entry
    Remove(KeyboardRemoveArgs),
    /// Turn transliteration on
    Enable,
    /// Turn transliteration off
    Disable,
    /// Discard the saved mapping and fall back to the configured default
    Reset,
}

/// Display the effective mapping
#[derive(Args, Debug)]
pub struct KeyboardShowArgs {
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

/// Add or replace a mapping entry
#[derive(Args, Debug)]
pub struct KeyboardSetArgs {
    /// Source character (exactly one character)
    #[arg(long, value_name = "CHAR")]
    from: String,

    /// Replacement string
    #[arg(long, value_name = "TEXT")]
    to: String,
}

/// Remove a mapping entry
#[derive(Args, Debug)]
pub struct KeyboardRemoveArgs {
    /// Source character (exactly one character)
    #[arg(long, value_name = "CHAR")]
    from: String,
}

impl KeyboardArgs {
    /// Execute keyboard subcommand
    pub fn execute(&self) -> CliResult<()> {
        let config = Config::load()
            .map_err(|e| CliError::validation(format!("Failed to load configuration: {}", e)))?;
        let store = MappingStore::at_default_location()
            .map_err(|e| CliError::io(format!("Failed to locate mapping store: {}", e)))?;

        match &self.command {
            KeyboardCommand::Show(args) => args.execute(&store, &config),
            KeyboardCommand::Set(args) => args.execute(&store, &config),
            KeyboardCommand::Remove(args) => args.execute(&store, &config),
            KeyboardCommand::Enable => set_enabled(&store, &config, true),
            KeyboardCommand::Disable => set_enabled(&store, &config, false),
            KeyboardCommand::Reset => store
                .reset()
                .map_err(|e| CliError::io(format!("Failed to reset mapping: {}", e))),
        }
    }
}

impl KeyboardShowArgs {
    fn execute(&self, store: &MappingStore, config: &Config) -> CliResult<()> {
        let state = effective_state(store, config)?;

        if self.json {
            let json = serde_json::to_string_pretty(&state)
                .map_err(|e| CliError::io(format!("Failed to serialize mapping: {}", e)))?;
            println!("{json}");
        } else {
            let status = if state.enabled { "enabled" } else { "disabled" };
            println!("Transliteration: {status}");
            if state.mapping.is_empty() {
                println!("(no mapping entries)");
            }
            for (from, to) in state.mapping.iter() {
                println!("  {from} -> {to}");
            }
        }

        Ok(())
    }
}

impl KeyboardSetArgs {
    fn execute(&self, store: &MappingStore, config: &Config) -> CliResult<()> {
        let from = single_char(&self.from)?;
        if self.to.is_empty() {
            return Err(CliError::validation(
                "Replacement must not be empty; use `keyboard remove` to delete an entry",
            ));
        }

        let mut state = effective_state(store, config)?;
        state.mapping.insert(from, self.to.clone());

        store
            .save(state.mapping, state.enabled)
            .map_err(|e| CliError::io(format!("Failed to save mapping: {}", e)))
    }
}

impl KeyboardRemoveArgs {
    fn execute(&self, store: &MappingStore, config: &Config) -> CliResult<()> {
        let from = single_char(&self.from)?;

        let mut state = effective_state(store, config)?;
        if state.mapping.remove(from).is_none() {
            return Err(CliError::validation(format!(
                "No mapping entry for '{from}'"
            )));
        }

        store
            .save(state.mapping, state.enabled)
            .map_err(|e| CliError::io(format!("Failed to save mapping: {}", e)))
    }
}

fn set_enabled(store: &MappingStore, config: &Config, enabled: bool) -> CliResult<()> {
    let state = effective_state(store, config)?;
    store
        .save(state.mapping, enabled)
        .map_err(|e| CliError::io(format!("Failed to save mapping: {}", e)))
}

fn effective_state(store: &MappingStore, config: &Config) -> CliResult<MappingState> {
    store
        .effective(&config.keyboard)
        .map_err(|e| CliError::io(format!("Failed to load mapping: {}", e)))
}

fn single_char(value: &str) -> CliResult<char> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(CliError::validation(format!(
            "Source must be exactly one character, got: {value:?}"
        ))),
    }
}
