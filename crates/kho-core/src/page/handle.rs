//! Per-page data handle

use super::loader::PageDataLoader;
use super::types::{DataSource, PageDataState};
use crate::error::{KhoError, KhoResult};
use futures::FutureExt;
use futures::future::BoxFuture;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{Mutex, watch};
use tracing::{debug, warn};

type Fetcher = Arc<dyn Fn() -> BoxFuture<'static, KhoResult<Value>> + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Route {
    path: String,
    composite: String,
}

/// Cached data for one logical key on whichever route is current
///
/// State changes are published on a watch channel; see [`PageData::subscribe`].
pub struct PageData<T> {
    loader: Arc<PageDataLoader>,
    key: String,
    fetcher: Option<Fetcher>,
    route: Mutex<Option<Route>>,
    state: watch::Sender<PageDataState<T>>,
}

impl<T> std::fmt::Debug for PageData<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageData")
            .field("key", &self.key)
            .field("has_fetcher", &self.fetcher.is_some())
            .finish_non_exhaustive()
    }
}

impl<T> PageData<T>
where
    T: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
{
    /// Handle without a fetcher; only cached values are served
    pub fn new(loader: Arc<PageDataLoader>, key: impl Into<String>) -> Self {
        let (state, _) = watch::channel(PageDataState::default());
        Self {
            loader,
            key: key.into(),
            fetcher: None,
            route: Mutex::new(None),
            state,
        }
    }

    /// Set the function called when neither cache tier has the data
    pub fn with_fetcher<F, Fut, E>(mut self, fetch: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        E: Display + Send + 'static,
    {
        let key = self.key.clone();
        let fetcher: Fetcher = Arc::new(move || {
            let request = fetch();
            let key = key.clone();
            async move {
                let data = request
                    .await
                    .map_err(|e| KhoError::fetch_for_key(e.to_string(), key))?;
                Ok(serde_json::to_value(data)?)
            }
            .boxed()
        });
        self.fetcher = Some(fetcher);
        self
    }

    /// Logical key, without the route prefix
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Composite key for the current route, once a route is set
    pub async fn composite_key(&self) -> Option<String> {
        self.route
            .lock()
            .await
            .as_ref()
            .map(|route| route.composite.clone())
    }

    /// Receiver notified on every state change
    pub fn subscribe(&self) -> watch::Receiver<PageDataState<T>> {
        self.state.subscribe()
    }

    /// Snapshot of the current state
    pub fn state(&self) -> PageDataState<T> {
        self.state.borrow().clone()
    }

    pub fn data(&self) -> Option<T> {
        self.state.borrow().data.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    pub fn error(&self) -> Option<KhoError> {
        self.state.borrow().error.clone()
    }

    /// Serve the data for `path` from the caches, fetching on a miss
    ///
    /// Moving to a different route clears the previous route's data first.
    pub async fn on_route_change(&self, path: &str) -> PageDataState<T> {
        let route = Route {
            path: path.to_string(),
            composite: PageDataLoader::composite_key(path, &self.key),
        };

        let changed = {
            let mut current = self.route.lock().await;
            let changed = current.as_ref() != Some(&route);
            *current = Some(route.clone());
            changed
        };
        if changed {
            self.state.send_replace(PageDataState::default());
        }

        if let Some((value, source)) = self.loader.lookup(&route.composite).await {
            match serde_json::from_value::<T>(value) {
                Ok(data) => {
                    self.state.send_modify(|state| {
                        state.data = Some(data);
                        state.loading = false;
                        state.error = None;
                        state.source = Some(source);
                        state.last_write = None;
                    });
                    return self.state();
                }
                Err(e) => {
                    debug!(
                        "Cached value for {} does not match the page type: {}",
                        route.composite, e
                    );
                }
            }
        }

        self.fetch(&route).await;
        self.state()
    }

    /// Fetch the current route's data, skipping both cache tiers
    ///
    /// Does nothing before the first route change or without a fetcher.
    pub async fn refresh_data(&self) -> PageDataState<T> {
        let route = self.route.lock().await.clone();
        if let Some(route) = route {
            self.fetch(&route).await;
        }
        self.state()
    }

    /// Reset local state and drop the current route's entry from both tiers
    pub async fn clear_cache(&self) {
        self.state.send_replace(PageDataState::default());
        let route = self.route.lock().await.clone();
        if let Some(route) = route {
            self.loader.invalidate(&route.composite).await;
        }
    }

    async fn fetch(&self, route: &Route) {
        let Some(fetcher) = self.fetcher.clone() else {
            return;
        };

        self.state.send_modify(|state| {
            state.loading = true;
            state.error = None;
        });

        let result = self
            .loader
            .fetch_shared(&route.composite, &route.path, move || fetcher())
            .await
            .and_then(|outcome| {
                let data = serde_json::from_value::<T>(outcome.value).map_err(|e| {
                    KhoError::cache(format!(
                        "Fetched value for {} does not match the page type: {}",
                        route.composite, e
                    ))
                })?;
                Ok((data, outcome.report))
            });

        // A route change while the fetch ran makes the result stale for
        // this handle; the caches were still written.
        if self.route.lock().await.as_ref() != Some(route) {
            debug!("Discarding fetch result for {}", route.composite);
            return;
        }

        self.state.send_modify(|state| {
            state.loading = false;
            match result {
                Ok((data, report)) => {
                    state.data = Some(data);
                    state.error = None;
                    state.source = Some(DataSource::Fetched);
                    state.last_write = Some(report);
                }
                Err(e) => {
                    warn!("Fetch for {} failed: {}", route.composite, e);
                    state.error = Some(e);
                }
            }
        });
    }
}
