//! Kho CLI application
//!
//! Inspects and maintains the durable state of the Kho dashboard: the open
//! tab list and the tab-scoped page data cache.
//!
//! # Installation
//!
//! ```bash
//! cargo install --path crates/kho-cli
//! ```
//!
//! # Commands
//!
//! - `kho tabs list|add|close|close-all|close-others` manages the tab strip
//! - `kho cache stats|get|clear|prune` inspects cached page data
//! - `kho config show` prints the effective configuration
//!
//! Set `RUST_LOG=debug` for verbose logging.

mod args;
mod commands;
mod console;
mod logging;
mod router;

use args::Cli;
use clap::Parser;
use kho_core::config::load_config;
use kho_core::error::KhoResult;

#[tokio::main]
async fn main() -> KhoResult<()> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(dir) = &cli.data_dir {
        config.storage.data_dir = dir.clone();
    }

    logging::init(&config.logging);
    router::route(cli, config).await
}
