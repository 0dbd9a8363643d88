// Gateway module for cache - follows the Train Station Pattern
// All external access must go through this gateway

mod disk_cache;
mod resource_cache;
mod types;

pub use disk_cache::{DiskCache, DiskStats};
pub use resource_cache::ResourceCache;
pub use types::{CacheKey, CacheStats};

use directories::ProjectDirs;
use std::path::PathBuf;

use crate::constants::APP_NAME;

/// Platform cache root (~/.cache/recipes on Linux, ~/Library/Caches/recipes on macOS)
pub fn default_cache_root() -> PathBuf {
    if let Some(proj_dirs) = ProjectDirs::from("", "", APP_NAME) {
        proj_dirs.cache_dir().to_path_buf()
    } else {
        // Fallback to ~/.cache/recipes, then the system temp dir
        std::env::var("HOME")
            .map(|home| PathBuf::from(home).join(".cache").join(APP_NAME))
            .unwrap_or_else(|_| std::env::temp_dir().join(APP_NAME))
    }
}
