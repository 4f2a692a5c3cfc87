//! Foliosearch - Terminal search client for OCR document archives
//!
//! Running with no subcommand starts the interactive TUI. The headless
//! subcommands expose the transliteration core and the saved keyboard
//! mapping for scripting.

use clap::{Parser, Subcommand};

use foliosearch::cli::{self, CliError, CliResult};

/// Foliosearch - Terminal search client for OCR document archives
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Apply the keyboard mapping to text without starting the TUI
    Transliterate(cli::TransliterateArgs),
    /// Inspect and edit the saved keyboard mapping
    Keyboard(cli::KeyboardArgs),
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Transliterate(args)) => args.execute(),
        Some(Commands::Keyboard(args)) => args.execute(),
        None => run_tui(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(e.exit_code());
    }
}

#[cfg(feature = "ratatui")]
fn run_tui() -> CliResult<()> {
    foliosearch::tui::launch().map_err(|e| CliError::io(format!("{e:#}")))
}

#[cfg(not(feature = "ratatui"))]
fn run_tui() -> CliResult<()> {
    Err(CliError::validation(
        "This build has no interactive interface (compiled without the `ratatui` feature). \
         Use the `transliterate` or `keyboard` subcommands instead.",
    ))
}
