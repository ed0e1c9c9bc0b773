//! Configuration commands

use crate::console::CliConsole;
use colored::*;
use humantime_serde::re::humantime;
use kho_core::config::KhoConfig;
use kho_core::error::KhoResult;

/// Show the effective configuration
pub fn show(console: &CliConsole, config: &KhoConfig) -> KhoResult<()> {
    console.print_header("Configuration");
    print_config(console, config);
    console.info("Environment variables KHO_* override file settings");
    Ok(())
}

fn print_config(console: &CliConsole, config: &KhoConfig) {
    println!("{}", "Storage".bold());
    console.print_field("Data directory", config.storage.data_dir.display());

    println!("{}", "Memory cache".bold());
    console.print_field("Max size", format!("{} bytes", config.memory.max_size_bytes));
    console.print_field("Max entry size", format!("{} bytes", config.memory.max_value_bytes()));
    console.print_field("Max entries", config.memory.max_entries);
    console.print_field("TTL", humantime::format_duration(config.memory.ttl));
    console.print_field(
        "Cleanup interval",
        humantime::format_duration(config.memory.cleanup_interval),
    );

    println!("{}", "Page data cache".bold());
    console.print_field("Stale after", humantime::format_duration(config.tab_data.stale_after));
    console.print_field("Write debounce", humantime::format_duration(config.tab_data.debounce));

    println!("{}", "Tabs".bold());
    console.print_field("Max tabs", config.tabs.max_tabs);
    console.print_field("Default route", &config.tabs.default_route);

    println!("{}", "Logging".bold());
    console.print_field("Level", &config.logging.level);
    console.print_field("Format", format!("{:?}", config.logging.format).to_lowercase());
}
