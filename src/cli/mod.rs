//! CLI command handlers for Foliosearch.
//!
//! This module provides headless, scriptable access to the transliteration
//! core and the saved keyboard mapping for automation, testing, and shell
//! pipelines.

pub mod common;
pub mod keyboard;
pub mod transliterate;

// Re-export types used by main.rs and tests
pub use common::{CliError, CliResult, ExitCode};
pub use keyboard::KeyboardArgs;
pub use transliterate::TransliterateArgs;
