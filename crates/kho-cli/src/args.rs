//! CLI argument definitions using clap
//!
//! - kho tabs list              # Show open tabs
//! - kho tabs add /kho "Kho"    # Open or activate a tab
//! - kho cache stats            # Summarize cached page data
//! - kho config show            # Print the effective configuration

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "kho")]
#[command(about = "Kho - inspect and maintain dashboard tabs and cached page data")]
#[command(version)]
pub struct Cli {
    /// Path to configuration file (JSON, TOML or YAML)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Data directory, overriding the configuration
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage the open tab list
    Tabs {
        #[command(subcommand)]
        action: TabsAction,
    },

    /// Inspect and clear cached page data
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Clone)]
pub enum TabsAction {
    /// List open tabs, oldest first
    List,

    /// Open a tab for a route, or activate the one already showing it
    Add {
        /// Route path, e.g. /kho
        path: String,

        /// Display title
        title: String,

        /// Icon name
        #[arg(long)]
        icon: Option<String>,

        /// Keep the tab open through close-all and eviction
        #[arg(long)]
        pinned: bool,
    },

    /// Close one tab
    Close {
        /// Tab identifier
        id: Uuid,
    },

    /// Close every closable tab
    CloseAll,

    /// Close every closable tab except one
    CloseOthers {
        /// Tab to keep
        id: Uuid,
    },
}

#[derive(Subcommand, Clone)]
pub enum CacheAction {
    /// Summarize cached page data
    Stats,

    /// Print the cached value for a composite key
    Get {
        /// Composite key, e.g. /kho-products
        key: String,
    },

    /// Remove one entry, or every entry when no key is given
    Clear {
        /// Composite key
        key: Option<String>,
    },

    /// Remove entries older than the staleness threshold
    Prune,
}

#[derive(Subcommand, Clone)]
pub enum ConfigAction {
    /// Display the effective configuration
    Show,
}
