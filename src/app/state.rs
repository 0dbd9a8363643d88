use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use crate::app::Config;
use crate::cache::{default_cache_root, ResourceCache};
use crate::codec::ImageCodec;
use crate::coordinator::FetchCoordinator;
use crate::network::{ByteFetcher, HttpFetcher};

/// Process-wide application state.
///
/// Built once at startup; the photo cache is shared by every component
/// through the coordinator instead of a global.
pub struct AppState {
    /// Configuration
    pub config: Config,
    /// Shared photo cache
    pub cache: Arc<ResourceCache<ImageCodec>>,
    /// Catalog and photo loading
    pub coordinator: FetchCoordinator<ImageCodec>,
}

impl AppState {
    /// Create app state with the HTTP fetcher from the config
    pub fn new(config: Config) -> Result<Self> {
        let fetcher = HttpFetcher::with_options(
            Duration::from_secs(config.network.timeout_secs),
            &config.network.user_agent,
        )?;
        Self::with_fetcher(config, Arc::new(fetcher))
    }

    /// Create app state over any fetcher
    pub fn with_fetcher(config: Config, fetcher: Arc<dyn ByteFetcher>) -> Result<Self> {
        let catalog_url = Url::parse(&config.catalog.url)
            .with_context(|| format!("Invalid catalog URL '{}'", config.catalog.url))?;

        let root = config
            .cache
            .directory
            .clone()
            .unwrap_or_else(default_cache_root);
        let cache = Arc::new(ResourceCache::new(
            root,
            &config.cache.subdirectory,
            ImageCodec::new(config.cache.jpeg_quality),
        ));

        let coordinator = FetchCoordinator::new(fetcher, Arc::clone(&cache), catalog_url);

        Ok(Self {
            config,
            cache,
            coordinator,
        })
    }

    /// Wait for background cache writes before the process exits
    pub async fn shutdown(&self) {
        self.cache.flush().await;
    }
}
