use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::warn;

use super::types::CacheKey;

/// Disk tier: one file per cached resource under a dedicated directory
#[derive(Debug)]
pub struct DiskCache {
    cache_dir: PathBuf,
}

impl DiskCache {
    /// Create a new disk tier rooted at `cache_dir`.
    ///
    /// A directory that can't be created is not fatal; every operation
    /// below recreates it or reports a miss.
    pub fn new(cache_dir: PathBuf) -> Self {
        if let Err(e) = std::fs::create_dir_all(&cache_dir) {
            warn!(
                "Could not create cache directory {}: {}",
                cache_dir.display(),
                e
            );
        }
        Self { cache_dir }
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Generate cache file path for a key
    pub fn cache_path(&self, key: &CacheKey) -> PathBuf {
        self.cache_dir.join(key.file_name())
    }

    /// Load the persisted bytes for a key, `None` if there is no file
    pub async fn load(&self, key: &CacheKey) -> io::Result<Option<Vec<u8>>> {
        match fs::read(self.cache_path(key)).await {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Persist bytes for a key, overwriting any previous file
    pub async fn save(&self, key: &CacheKey, data: &[u8]) -> io::Result<()> {
        // The directory may have been removed by a clear or externally
        fs::create_dir_all(&self.cache_dir).await?;
        fs::write(self.cache_path(key), data).await
    }

    /// Remove cache entry
    pub async fn remove(&self, key: &CacheKey) -> io::Result<()> {
        match fs::remove_file(self.cache_path(key)).await {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }

    /// Delete the whole directory and recreate it empty
    pub async fn clear(&self) -> io::Result<()> {
        match fs::remove_dir_all(&self.cache_dir).await {
            Err(e) if e.kind() != io::ErrorKind::NotFound => return Err(e),
            _ => {}
        }
        fs::create_dir_all(&self.cache_dir).await
    }

    /// Count cached files and their total size
    pub async fn get_stats(&self) -> io::Result<DiskStats> {
        let mut stats = DiskStats::default();

        let mut entries = match fs::read_dir(&self.cache_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(stats),
            Err(e) => return Err(e),
        };

        while let Some(entry) = entries.next_entry().await? {
            let metadata = entry.metadata().await?;
            if metadata.is_file() {
                stats.total_entries += 1;
                stats.total_bytes += metadata.len();
            }
        }

        Ok(stats)
    }
}

/// Disk tier statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiskStats {
    pub total_entries: usize,
    pub total_bytes: u64,
}
