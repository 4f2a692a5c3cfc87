//! Foliosearch Keyboard Endpoint Server Binary
//!
//! Serves the `/keyboard` and `/updateKeyboard` JSON endpoints over the
//! local mapping store, for deployments where no full web application is
//! providing them.
//!
//! # Usage
//!
//! ```bash
//! # Start with default settings (port 8080, store in the config directory)
//! foliosearch-web
//!
//! # Specify port and store file
//! foliosearch-web --port 3001 --store ~/mappings/keyboard.json
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use foliosearch::config::Config;
use foliosearch::services::MappingStore;
use foliosearch::web;

/// Foliosearch keyboard endpoint server
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "8080")]
    port: u16,

    /// Host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Mapping store file. Defaults to keyboard.json in the config directory.
    #[arg(short, long)]
    store: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing
    let filter = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().unwrap_or_default();

    let store = match args.store {
        Some(path) => MappingStore::new(path),
        None => MappingStore::at_default_location()?,
    };

    info!("Mapping store: {}", store.path().display());

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;

    web::run_server(config, store, addr).await
}
