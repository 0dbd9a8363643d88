pub mod app;
pub mod cache;
pub mod catalog;
pub mod cli;
pub mod codec;
pub mod constants;
pub mod coordinator;
pub mod network;
pub mod utils;

pub use app::{load_config, AppState, Config};
pub use cache::{CacheKey, CacheStats, ResourceCache};
pub use catalog::{Recipe, RecipeResponse};
pub use codec::{BytesCodec, ImageCodec, ResourceCodec};
pub use coordinator::{CatalogState, FetchCoordinator, RefreshOutcome};
pub use network::{ByteFetcher, HttpFetcher};
pub use utils::{RecipeError, Result};
