use futures::future::{BoxFuture, FutureExt, Shared};
use futures::StreamExt;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};
use url::Url;

use super::state::{CatalogState, RefreshGuard, RefreshOutcome};
use crate::cache::{CacheKey, ResourceCache};
use crate::catalog::{Recipe, RecipeResponse};
use crate::codec::ResourceCodec;
use crate::network::ByteFetcher;
use crate::utils::RecipeError;

type InFlightLoad<R> = Shared<BoxFuture<'static, Option<Arc<R>>>>;
type InFlightMap<R> = Arc<parking_lot::Mutex<HashMap<CacheKey, InFlightLoad<R>>>>;

/// Decides cache vs. network for resource loads and single-flights catalog refreshes
pub struct FetchCoordinator<C: ResourceCodec> {
    fetcher: Arc<dyn ByteFetcher>,
    cache: Arc<ResourceCache<C>>,
    catalog_url: Url,
    state: watch::Sender<CatalogState>,
    in_flight: InFlightMap<C::Resource>,
}

impl<C: ResourceCodec> FetchCoordinator<C> {
    /// Create a coordinator over an injected fetcher and shared cache
    pub fn new(
        fetcher: Arc<dyn ByteFetcher>,
        cache: Arc<ResourceCache<C>>,
        catalog_url: Url,
    ) -> Self {
        let (state, _) = watch::channel(CatalogState::default());
        Self {
            fetcher,
            cache,
            catalog_url,
            state,
            in_flight: Arc::new(parking_lot::Mutex::new(HashMap::new())),
        }
    }

    pub fn cache(&self) -> &Arc<ResourceCache<C>> {
        &self.cache
    }

    pub fn catalog_url(&self) -> &Url {
        &self.catalog_url
    }

    /// Snapshot of the observable state
    pub fn state(&self) -> CatalogState {
        self.state.borrow().clone()
    }

    /// Receiver that sees every state change
    pub fn subscribe(&self) -> watch::Receiver<CatalogState> {
        self.state.subscribe()
    }

    pub fn recipes(&self) -> Vec<Recipe> {
        self.state.borrow().recipes.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading
    }

    pub fn last_error(&self) -> Option<Arc<RecipeError>> {
        self.state.borrow().error.clone()
    }

    /// Load a resource from cache, falling back to a single network fetch.
    ///
    /// Concurrent loads of the same URL share one fetch. The fetch runs as its
    /// own task, so a caller that gives up early doesn't abandon it for the
    /// others, and it drops its in-flight entry itself once it settles.
    /// Failures are logged and come back as `None`; nothing is cached for
    /// them, so the next call goes to the network again.
    pub async fn load_resource(&self, url: &Url) -> Option<Arc<C::Resource>> {
        if let Some(cached) = self.cache.retrieve(url).await {
            return Some(cached);
        }

        let key = CacheKey::from_url(url);
        let load = {
            let mut in_flight = self.in_flight.lock();
            in_flight
                .entry(key.clone())
                .or_insert_with(|| {
                    // Spawned under the map lock, so its removal can't run before this insert
                    tokio::spawn(fetch_and_store(
                        Arc::clone(&self.fetcher),
                        Arc::clone(&self.cache),
                        url.clone(),
                        Arc::clone(&self.in_flight),
                        key,
                    ))
                    .map(|joined| joined.ok().flatten())
                    .boxed()
                    .shared()
                })
                .clone()
        };

        load.await
    }

    /// Number of resource fetches currently running
    pub fn in_flight_loads(&self) -> usize {
        self.in_flight.lock().len()
    }

    /// Refresh the catalog unless a refresh is already running.
    ///
    /// On success the catalog is replaced and the error cleared; on failure
    /// the previous catalog stays and the error is recorded.
    pub async fn refresh_catalog(&self) -> RefreshOutcome {
        let Some(_guard) = RefreshGuard::acquire(&self.state) else {
            debug!("Catalog refresh already in flight, skipping");
            return RefreshOutcome::Skipped;
        };

        info!("Refreshing catalog from {}", self.catalog_url);
        let result = match self.fetcher.fetch(&self.catalog_url).await {
            Ok(body) => RecipeResponse::from_slice(&body),
            Err(e) => Err(e),
        };

        match result {
            Ok(response) => {
                let count = response.recipes.len();
                self.state.send_modify(|s| {
                    s.recipes = response.recipes;
                    s.error = None;
                });
                info!("Catalog refreshed with {} recipes", count);
                RefreshOutcome::Completed(count)
            }
            Err(e) => {
                warn!("Catalog refresh failed: {}", e);
                self.state.send_modify(|s| s.error = Some(Arc::new(e)));
                RefreshOutcome::Failed
            }
        }
    }

    /// Load every recipe thumbnail, at most `concurrency` at a time.
    ///
    /// Returns how many thumbnails ended up available.
    pub async fn warm_thumbnails(&self, concurrency: usize) -> usize {
        let urls: Vec<Url> = self
            .state
            .borrow()
            .recipes
            .iter()
            .filter_map(|r| r.photo_url_small.clone())
            .collect();

        futures::stream::iter(urls)
            .map(|url| async move { self.load_resource(&url).await.is_some() })
            .buffer_unordered(concurrency.max(1))
            .filter(|loaded| futures::future::ready(*loaded))
            .count()
            .await
    }

    /// Clear both cache tiers
    pub async fn clear_resource_cache(&self) {
        self.cache.clear_cache().await;
    }
}

async fn fetch_and_store<C: ResourceCodec>(
    fetcher: Arc<dyn ByteFetcher>,
    cache: Arc<ResourceCache<C>>,
    url: Url,
    in_flight: InFlightMap<C::Resource>,
    key: CacheKey,
) -> Option<Arc<C::Resource>> {
    let result = match fetcher.fetch(&url).await {
        Ok(body) => match cache.codec().decode(&body) {
            Ok(resource) => {
                let resource = Arc::new(resource);
                cache.store(Arc::clone(&resource), &url).await;
                Some(resource)
            }
            Err(e) => {
                warn!("Resource at {} could not be decoded: {}", url, e);
                None
            }
        },
        Err(e) => {
            warn!("Error loading resource {}: {}", url, e);
            None
        }
    };

    // Only this task ever removes its own entry; a success is already in the
    // cache by now, a failure leaves nothing behind for the next caller
    in_flight.lock().remove(&key);
    result
}
