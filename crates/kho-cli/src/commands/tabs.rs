//! Tab list commands

use crate::console::CliConsole;
use colored::*;
use kho_core::error::KhoResult;
use kho_core::tabs::{AddTabOutcome, NewTab, TabChange, TabId, TabRegistry};

/// Print open tabs, marking the active one
pub async fn list(console: &CliConsole, tabs: &TabRegistry) -> KhoResult<()> {
    console.print_header("Open tabs");

    let open = tabs.tabs().await;
    if open.is_empty() {
        console.warn("No open tabs");
        return Ok(());
    }

    let active = tabs.active().await.map(|tab| tab.id);
    for tab in &open {
        let marker = if Some(tab.id) == active {
            "*".green().bold()
        } else {
            " ".normal()
        };
        let pinned = if tab.closable { "" } else { " (pinned)" };
        println!(
            "{} {}  {}  {}{}",
            marker,
            tab.id.to_string().dimmed(),
            tab.path.cyan(),
            tab.title,
            pinned.yellow()
        );
    }
    console.info(&format!("{} of {} tabs", open.len(), tabs.config().max_tabs));
    Ok(())
}

pub async fn add(
    console: &CliConsole,
    tabs: &TabRegistry,
    path: String,
    title: String,
    icon: Option<String>,
    pinned: bool,
) -> KhoResult<()> {
    let mut new_tab = NewTab::new(path, title);
    if let Some(icon) = icon {
        new_tab = new_tab.with_icon(icon);
    }
    if pinned {
        new_tab = new_tab.pinned();
    }

    match tabs.add_tab(new_tab).await? {
        AddTabOutcome::Activated(id) => console.success(&format!("Activated existing tab {id}")),
        AddTabOutcome::Opened { id, evicted } => {
            console.success(&format!("Opened tab {id}"));
            if let Some(tab) = evicted {
                console.warn(&format!(
                    "Closed {} ({}) to stay within the tab limit",
                    tab.title, tab.path
                ));
            }
        }
    }
    Ok(())
}

pub async fn close(console: &CliConsole, tabs: &TabRegistry, id: TabId) -> KhoResult<()> {
    let change = tabs.remove_tab(id).await?;
    console.success(&format!("Closed tab {id}"));
    report_change(console, change);
    Ok(())
}

pub async fn close_all(console: &CliConsole, tabs: &TabRegistry) -> KhoResult<()> {
    let before = tabs.len().await;
    let change = tabs.close_all_tabs().await;
    console.success(&format!("Closed {} tabs", before - tabs.len().await));
    report_change(console, change);
    Ok(())
}

pub async fn close_others(console: &CliConsole, tabs: &TabRegistry, keep: TabId) -> KhoResult<()> {
    let before = tabs.len().await;
    let change = tabs.close_other_tabs(keep).await?;
    console.success(&format!("Closed {} tabs", before - tabs.len().await));
    report_change(console, change);
    Ok(())
}

fn report_change(console: &CliConsole, change: TabChange) {
    match change {
        TabChange::Unchanged => {}
        TabChange::Activated(id) => console.info(&format!("Active tab is now {id}")),
        TabChange::NavigateTo(route) => console.info(&format!("No tabs left, navigate to {route}")),
    }
}
