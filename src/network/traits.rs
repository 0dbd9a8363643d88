use async_trait::async_trait;
use bytes::Bytes;
use url::Url;

use crate::utils::Result;

/// The "fetch bytes for URL" capability the cache and catalog sit on top of
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ByteFetcher: Send + Sync {
    /// Fetch the body at `url` in a single attempt.
    ///
    /// Transport failures and non-2xx statuses are both errors.
    async fn fetch(&self, url: &Url) -> Result<Bytes>;
}
