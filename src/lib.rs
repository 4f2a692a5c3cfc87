//! Foliosearch Library
//!
//! This library provides the core functionality for the Foliosearch terminal
//! client: keystroke transliteration, keyboard mapping state, the backend
//! search-service client, and the keyboard mapping store shared by the TUI,
//! the CLI, and the optional keyboard endpoint server.

// Module declarations
pub mod cli;
pub mod client;
pub mod config;
pub mod constants;
pub mod models;
pub mod services;
pub mod translit;

#[cfg(feature = "ratatui")]
pub mod tui;

#[cfg(feature = "web")]
pub mod web;
