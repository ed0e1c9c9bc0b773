//! TabRegistry implementation

use super::types::{AddTabOutcome, NewTab, Tab, TabChange, TabId, TabUpdate};
use crate::config::TabsConfig;
use crate::error::{KhoError, KhoResult};
use crate::storage::{BROWSER_TABS_KEY, SharedStore};
use tokio::sync::Mutex;
use tracing::{debug, warn};

#[derive(Debug, Default)]
struct TabState {
    /// Open tabs, least recently added first
    tabs: Vec<Tab>,
    active: Option<TabId>,
}

impl TabState {
    fn position(&self, id: TabId) -> Option<usize> {
        self.tabs.iter().position(|tab| tab.id == id)
    }

    /// After the active tab went away, fall back to the newest tab
    fn reactivate(&mut self, default_route: &str) -> TabChange {
        match self.tabs.last() {
            Some(tab) => {
                self.active = Some(tab.id);
                TabChange::Activated(tab.id)
            }
            None => {
                self.active = None;
                TabChange::NavigateTo(default_route.to_string())
            }
        }
    }
}

/// Bounded, persisted list of open tabs
pub struct TabRegistry {
    store: SharedStore,
    config: TabsConfig,
    state: Mutex<TabState>,
}

impl std::fmt::Debug for TabRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TabRegistry")
            .field("config", &self.config)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl TabRegistry {
    /// Restore the persisted tab list
    ///
    /// An unreadable or corrupt list yields an empty registry. The newest
    /// restored tab becomes active.
    pub async fn load(store: SharedStore, config: TabsConfig) -> Self {
        let mut tabs = match store.read(BROWSER_TABS_KEY).await {
            Ok(Some(content)) => match serde_json::from_str::<Vec<Tab>>(&content) {
                Ok(tabs) => tabs,
                Err(e) => {
                    warn!("Failed to parse {}: {}", BROWSER_TABS_KEY, e);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("Failed to read {}: {}", BROWSER_TABS_KEY, e);
                Vec::new()
            }
        };

        if tabs.len() > config.max_tabs {
            let excess = tabs.len() - config.max_tabs;
            tabs.drain(..excess);
        }
        debug!("Restored {} tabs", tabs.len());

        let active = tabs.last().map(|tab| tab.id);
        Self {
            store,
            config,
            state: Mutex::new(TabState { tabs, active }),
        }
    }

    /// Open a tab for a route, or activate the tab already showing it
    ///
    /// At the tab limit, the least recently added closable tab other than the
    /// active one is evicted first.
    pub async fn add_tab(&self, new_tab: NewTab) -> KhoResult<AddTabOutcome> {
        let mut state = self.state.lock().await;

        if let Some(existing) = state.tabs.iter().find(|tab| tab.path == new_tab.path) {
            let id = existing.id;
            state.active = Some(id);
            debug!("Activated existing tab {} for {}", id, new_tab.path);
            return Ok(AddTabOutcome::Activated(id));
        }

        let mut evicted = None;
        if state.tabs.len() >= self.config.max_tabs {
            let active = state.active;
            let victim = state
                .tabs
                .iter()
                .position(|tab| tab.closable && Some(tab.id) != active)
                .ok_or_else(|| {
                    KhoError::invalid_input(format!(
                        "Tab limit of {} reached and no tab can be closed",
                        self.config.max_tabs
                    ))
                })?;
            let tab = state.tabs.remove(victim);
            debug!("Evicted tab {} ({})", tab.id, tab.path);
            evicted = Some(tab);
        }

        let tab = Tab::new(new_tab);
        let id = tab.id;
        debug!("Opened tab {} for {}", id, tab.path);
        state.tabs.push(tab);
        state.active = Some(id);

        self.persist(&state.tabs).await;
        Ok(AddTabOutcome::Opened { id, evicted })
    }

    /// Close one tab
    pub async fn remove_tab(&self, id: TabId) -> KhoResult<TabChange> {
        let mut state = self.state.lock().await;

        let index = state
            .position(id)
            .ok_or_else(|| KhoError::not_found_resource(format!("No tab {}", id), "tab"))?;
        if !state.tabs[index].closable {
            return Err(KhoError::invalid_input(format!(
                "Tab {} ({}) cannot be closed",
                id, state.tabs[index].path
            )));
        }

        state.tabs.remove(index);
        let change = if state.active == Some(id) {
            state.reactivate(&self.config.default_route)
        } else {
            TabChange::Unchanged
        };

        self.persist(&state.tabs).await;
        Ok(change)
    }

    /// Close every closable tab
    pub async fn close_all_tabs(&self) -> TabChange {
        let mut state = self.state.lock().await;

        state.tabs.retain(|tab| !tab.closable);
        let still_open = state.active.is_some_and(|id| state.position(id).is_some());
        let change = if still_open {
            TabChange::Unchanged
        } else {
            state.reactivate(&self.config.default_route)
        };

        self.persist(&state.tabs).await;
        change
    }

    /// Close every closable tab except `keep`, which becomes active
    pub async fn close_other_tabs(&self, keep: TabId) -> KhoResult<TabChange> {
        let mut state = self.state.lock().await;

        if state.position(keep).is_none() {
            return Err(KhoError::not_found_resource(format!("No tab {}", keep), "tab"));
        }

        state.tabs.retain(|tab| tab.id == keep || !tab.closable);
        let change = if state.active == Some(keep) {
            TabChange::Unchanged
        } else {
            state.active = Some(keep);
            TabChange::Activated(keep)
        };

        self.persist(&state.tabs).await;
        Ok(change)
    }

    /// Apply a partial update; returns the updated tab
    pub async fn update_tab(&self, id: TabId, update: TabUpdate) -> KhoResult<Tab> {
        let mut state = self.state.lock().await;

        if let Some(path) = &update.path {
            if state.tabs.iter().any(|tab| tab.id != id && &tab.path == path) {
                return Err(KhoError::invalid_field(
                    format!("Another tab already shows {}", path),
                    "path",
                ));
            }
        }

        let index = state
            .position(id)
            .ok_or_else(|| KhoError::not_found_resource(format!("No tab {}", id), "tab"))?;
        update.apply(&mut state.tabs[index]);
        let updated = state.tabs[index].clone();

        self.persist(&state.tabs).await;
        Ok(updated)
    }

    /// Make an open tab active
    pub async fn activate(&self, id: TabId) -> KhoResult<()> {
        let mut state = self.state.lock().await;
        if state.position(id).is_none() {
            return Err(KhoError::not_found_resource(format!("No tab {}", id), "tab"));
        }
        state.active = Some(id);
        Ok(())
    }

    /// Open tabs, least recently added first
    pub async fn tabs(&self) -> Vec<Tab> {
        self.state.lock().await.tabs.clone()
    }

    /// Currently active tab
    pub async fn active(&self) -> Option<Tab> {
        let state = self.state.lock().await;
        let id = state.active?;
        state.tabs.iter().find(|tab| tab.id == id).cloned()
    }

    /// Look up a tab by identifier
    pub async fn get(&self, id: TabId) -> Option<Tab> {
        let state = self.state.lock().await;
        state.tabs.iter().find(|tab| tab.id == id).cloned()
    }

    /// Look up the tab showing a route
    pub async fn find_by_path(&self, path: &str) -> Option<Tab> {
        let state = self.state.lock().await;
        state.tabs.iter().find(|tab| tab.path == path).cloned()
    }

    /// Number of open tabs
    pub async fn len(&self) -> usize {
        self.state.lock().await.tabs.len()
    }

    /// Whether no tab is open
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Configured limits
    pub fn config(&self) -> &TabsConfig {
        &self.config
    }

    /// Write the whole list; failures are logged, not returned
    async fn persist(&self, tabs: &[Tab]) {
        let content = match serde_json::to_string(tabs) {
            Ok(content) => content,
            Err(e) => {
                warn!("Failed to serialize tabs: {}", e);
                return;
            }
        };

        if let Err(e) = self.store.write(BROWSER_TABS_KEY, &content).await {
            warn!("Failed to persist tabs: {}", e);
        }
    }
}
