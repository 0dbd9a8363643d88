use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::debug;
use url::Url;

use super::disk_cache::DiskCache;
use super::types::{CacheKey, CacheStats};
use crate::codec::ResourceCodec;

/// Two-tier cache for URL-addressed resources.
///
/// Every access to the memory map and to the disk directory goes through one
/// async mutex, so at most one operation touches shared state at a time.
/// Disk writes from [`ResourceCache::store`] run in the background and take
/// the same gate before touching the directory.
pub struct ResourceCache<C: ResourceCodec> {
    codec: Arc<C>,
    disk: Arc<DiskCache>,
    memory: Arc<Mutex<MemoryCache<C::Resource>>>,
    pending_writes: parking_lot::Mutex<Vec<JoinHandle<()>>>,
}

/// In-memory tier for hot resources
struct MemoryCache<R> {
    entries: HashMap<CacheKey, Arc<R>>,
    /// Version of the latest `store` per key whose disk write is still owed
    pending_versions: HashMap<CacheKey, u64>,
    next_version: u64,
    /// Bumped by every clear or invalidate so in-flight disk promotions can tell
    removals: u64,
    hits: usize,
    disk_hits: usize,
    misses: usize,
}

impl<R> MemoryCache<R> {
    fn new() -> Self {
        Self {
            entries: HashMap::new(),
            pending_versions: HashMap::new(),
            next_version: 0,
            removals: 0,
            hits: 0,
            disk_hits: 0,
            misses: 0,
        }
    }

    /// Register a store for `key` and return its version
    fn bump_version(&mut self, key: &CacheKey) -> u64 {
        self.next_version += 1;
        self.pending_versions.insert(key.clone(), self.next_version);
        self.next_version
    }

    /// True (and the claim consumed) if `version` is still the newest store for `key`
    fn claim_write(&mut self, key: &CacheKey, version: u64) -> bool {
        if self.pending_versions.get(key) == Some(&version) {
            self.pending_versions.remove(key);
            true
        } else {
            false
        }
    }

    fn reset(&mut self) {
        self.entries.clear();
        self.pending_versions.clear();
        self.removals += 1;
        self.hits = 0;
        self.disk_hits = 0;
        self.misses = 0;
    }
}

impl<C: ResourceCodec> ResourceCache<C> {
    /// Create a cache that owns `<root>/<subdirectory>` on disk
    pub fn new(root: impl AsRef<Path>, subdirectory: &str, codec: C) -> Self {
        let cache_dir = root.as_ref().join(subdirectory);
        debug!("Resource cache directory: {}", cache_dir.display());

        Self {
            codec: Arc::new(codec),
            disk: Arc::new(DiskCache::new(cache_dir)),
            memory: Arc::new(Mutex::new(MemoryCache::new())),
            pending_writes: parking_lot::Mutex::new(Vec::new()),
        }
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    pub fn cache_dir(&self) -> &Path {
        self.disk.cache_dir()
    }

    /// Store a resource in memory now and on disk in the background.
    ///
    /// The memory entry is visible to every caller once this returns. The
    /// disk write is best-effort: encode or I/O failures are logged and dropped.
    /// A write only lands if no later `store`, `invalidate` or `clear_cache`
    /// touched the key first, so disk never ends up older than memory.
    pub async fn store(&self, resource: impl Into<Arc<C::Resource>>, url: &Url) {
        let key = CacheKey::from_url(url);
        let resource = resource.into();

        let version = {
            let mut mem_cache = self.memory.lock().await;
            mem_cache.entries.insert(key.clone(), Arc::clone(&resource));
            mem_cache.bump_version(&key)
        };

        let codec = Arc::clone(&self.codec);
        let disk = Arc::clone(&self.disk);
        let gate = Arc::clone(&self.memory);

        let handle = tokio::spawn(async move {
            let encoded = match tokio::task::spawn_blocking(move || codec.encode(&resource)).await {
                Ok(Ok(encoded)) => encoded,
                Ok(Err(e)) => {
                    debug!("Skipping disk write for {}: {}", key, e);
                    return;
                }
                Err(e) => {
                    debug!("Encoder task for {} failed: {}", key, e);
                    return;
                }
            };

            let mut mem_cache = gate.lock().await;
            if !mem_cache.claim_write(&key, version) {
                debug!("Superseded disk write for {} dropped", key);
                return;
            }
            if let Err(e) = disk.save(&key, &encoded).await {
                debug!("Disk write for {} failed: {}", key, e);
            }
        });

        let mut pending = self.pending_writes.lock();
        pending.retain(|h| !h.is_finished());
        pending.push(handle);
    }

    /// Look a resource up in memory, then on disk.
    ///
    /// A disk hit is decoded off the gate on the blocking pool and promoted
    /// into memory. Missing files, unreadable files and undecodable bytes are
    /// all just a miss.
    pub async fn retrieve(&self, url: &Url) -> Option<Arc<C::Resource>> {
        let key = CacheKey::from_url(url);

        let (data, removals) = {
            let mut mem_cache = self.memory.lock().await;

            if let Some(cached) = mem_cache.entries.get(&key).cloned() {
                mem_cache.hits += 1;
                debug!("Memory hit: {}", key);
                return Some(cached);
            }

            match self.disk.load(&key).await {
                Ok(Some(data)) => (data, mem_cache.removals),
                Ok(None) => {
                    mem_cache.misses += 1;
                    debug!("Cache miss: {}", key);
                    return None;
                }
                Err(e) => {
                    mem_cache.misses += 1;
                    debug!("Disk read for {} failed: {}", key, e);
                    return None;
                }
            }
        };

        let codec = Arc::clone(&self.codec);
        let decoded = match tokio::task::spawn_blocking(move || codec.decode(&data)).await {
            Ok(decoded) => decoded,
            Err(e) => {
                debug!("Decoder task for {} failed: {}", key, e);
                self.memory.lock().await.misses += 1;
                return None;
            }
        };

        let mut mem_cache = self.memory.lock().await;
        match decoded {
            Ok(resource) => {
                mem_cache.disk_hits += 1;
                debug!("Disk hit: {}", key);

                // A store that landed while we decoded is newer than the file
                if let Some(current) = mem_cache.entries.get(&key) {
                    return Some(Arc::clone(current));
                }

                let resource = Arc::new(resource);
                // Don't resurrect an entry a concurrent clear or invalidate just dropped
                if mem_cache.removals == removals {
                    mem_cache.entries.insert(key, Arc::clone(&resource));
                }
                Some(resource)
            }
            Err(e) => {
                mem_cache.misses += 1;
                debug!("Cached file for {} is unreadable: {}", key, e);
                None
            }
        }
    }

    /// Remove a single URL from both tiers
    pub async fn invalidate(&self, url: &Url) {
        let key = CacheKey::from_url(url);
        let mut mem_cache = self.memory.lock().await;
        mem_cache.entries.remove(&key);
        mem_cache.pending_versions.remove(&key);
        mem_cache.removals += 1;
        if let Err(e) = self.disk.remove(&key).await {
            debug!("Could not remove cached file for {}: {}", key, e);
        }
    }

    /// Empty both tiers and leave an empty cache directory behind
    pub async fn clear_cache(&self) {
        let mut mem_cache = self.memory.lock().await;
        mem_cache.reset();

        if let Err(e) = self.disk.clear().await {
            debug!(
                "Could not clear cache directory {}: {}",
                self.disk.cache_dir().display(),
                e
            );
        }
    }

    /// Drop the memory tier only, as memory pressure or a restart would
    pub async fn evict_memory(&self) {
        let mut mem_cache = self.memory.lock().await;
        mem_cache.entries.clear();
    }

    /// Wait for every background disk write started so far
    pub async fn flush(&self) {
        let pending = std::mem::take(&mut *self.pending_writes.lock());
        for handle in pending {
            // A panicked writer only means that file is missing
            let _ = handle.await;
        }
    }

    /// Get cache statistics
    pub async fn stats(&self) -> CacheStats {
        let mem_cache = self.memory.lock().await;
        let disk_stats = self.disk.get_stats().await.unwrap_or_default();

        let hits = mem_cache.hits + mem_cache.disk_hits;
        let total_requests = hits + mem_cache.misses;
        let hit_rate = if total_requests > 0 {
            (hits as f32 / total_requests as f32) * 100.0
        } else {
            0.0
        };

        CacheStats {
            memory_entries: mem_cache.entries.len(),
            disk_entries: disk_stats.total_entries,
            disk_bytes: disk_stats.total_bytes,
            memory_hits: mem_cache.hits,
            disk_hits: mem_cache.disk_hits,
            misses: mem_cache.misses,
            hit_rate,
            cache_directory: PathBuf::from(self.disk.cache_dir()),
        }
    }
}
