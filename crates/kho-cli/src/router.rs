//! Command routing logic for CLI

use crate::args::{CacheAction, Cli, Commands, ConfigAction, TabsAction};
use crate::commands;
use crate::console::CliConsole;
use kho_core::config::KhoConfig;
use kho_core::error::KhoResult;
use kho_core::runtime::KhoRuntime;

/// Route CLI commands to their respective handlers
pub async fn route(cli: Cli, config: KhoConfig) -> KhoResult<()> {
    let console = CliConsole::new(cli.verbose);
    tracing::debug!("Data directory: {}", config.storage.data_dir.display());

    match cli.command {
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::show(&console, &config),
        },
        Commands::Tabs { action } => {
            let runtime = KhoRuntime::open(config).await?;
            route_tabs(&console, &runtime, action).await
        }
        Commands::Cache { action } => {
            let runtime = KhoRuntime::open(config).await?;
            let result = route_cache(&console, &runtime, action).await;
            // Debounced writes must land before the process exits
            runtime.shutdown().await?;
            result
        }
    }
}

async fn route_tabs(
    console: &CliConsole,
    runtime: &KhoRuntime,
    action: TabsAction,
) -> KhoResult<()> {
    let tabs = runtime.tabs();
    match action {
        TabsAction::List => commands::tabs::list(console, tabs).await,
        TabsAction::Add {
            path,
            title,
            icon,
            pinned,
        } => commands::tabs::add(console, tabs, path, title, icon, pinned).await,
        TabsAction::Close { id } => commands::tabs::close(console, tabs, id).await,
        TabsAction::CloseAll => commands::tabs::close_all(console, tabs).await,
        TabsAction::CloseOthers { id } => commands::tabs::close_others(console, tabs, id).await,
    }
}

async fn route_cache(
    console: &CliConsole,
    runtime: &KhoRuntime,
    action: CacheAction,
) -> KhoResult<()> {
    let cache = runtime.tab_data();
    match action {
        CacheAction::Stats => commands::cache::stats(console, cache).await,
        CacheAction::Get { key } => commands::cache::get(console, cache, &key).await,
        CacheAction::Clear { key } => commands::cache::clear(console, cache, key.as_deref()).await,
        CacheAction::Prune => commands::cache::prune(console, cache).await,
    }
}
