//! Tab types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable tab identifier
pub type TabId = Uuid;

fn default_closable() -> bool {
    true
}

/// An open tab: a route plus its display metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tab {
    pub id: TabId,
    pub title: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default = "default_closable")]
    pub closable: bool,
}

impl Tab {
    /// Create a tab with a fresh identifier
    pub fn new(new_tab: NewTab) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: new_tab.title,
            path: new_tab.path,
            icon: new_tab.icon,
            closable: new_tab.closable,
        }
    }
}

/// Request to open a tab
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTab {
    pub title: String,
    pub path: String,
    pub icon: Option<String>,
    pub closable: bool,
}

impl NewTab {
    /// A closable tab without an icon
    pub fn new(path: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            path: path.into(),
            icon: None,
            closable: true,
        }
    }

    /// Set the icon reference
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Pin the tab so it cannot be closed or evicted
    pub fn pinned(mut self) -> Self {
        self.closable = false;
        self
    }
}

/// Partial update applied by `TabRegistry::update_tab`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TabUpdate {
    pub title: Option<String>,
    pub path: Option<String>,
    /// `Some(None)` removes the icon
    pub icon: Option<Option<String>>,
    pub closable: Option<bool>,
}

impl TabUpdate {
    /// Update only the title
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    pub(super) fn apply(self, tab: &mut Tab) {
        if let Some(title) = self.title {
            tab.title = title;
        }
        if let Some(path) = self.path {
            tab.path = path;
        }
        if let Some(icon) = self.icon {
            tab.icon = icon;
        }
        if let Some(closable) = self.closable {
            tab.closable = closable;
        }
    }
}

/// Result of `TabRegistry::add_tab`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddTabOutcome {
    /// A tab for the route already existed and is now active
    Activated(TabId),
    /// A new tab was appended and activated
    Opened {
        id: TabId,
        /// Tab dropped to stay within the limit
        evicted: Option<Tab>,
    },
}

impl AddTabOutcome {
    /// Identifier of the tab that is now active
    pub fn id(&self) -> TabId {
        match self {
            Self::Activated(id) => *id,
            Self::Opened { id, .. } => *id,
        }
    }
}

/// What the shell should show after tabs were closed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TabChange {
    /// The active tab did not change
    Unchanged,
    /// This tab became active
    Activated(TabId),
    /// No tab remains; navigate to this route
    NavigateTo(String),
}
