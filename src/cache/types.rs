use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use sha2::{Digest, Sha256};
use std::fmt;
use std::path::PathBuf;
use url::Url;

use crate::constants::{HASHED_FILE_NAME_SUFFIX, MAX_FILE_NAME_LEN};

/// Key for cache entries: the canonical string form of a resource URL
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn from_url(url: &Url) -> Self {
        Self(url.as_str().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Filesystem-safe file name for the disk tier.
    ///
    /// URL-safe base64 of the whole URL, so distinct URLs never share a file.
    /// Names that would not fit in a single path component fall back to the
    /// SHA-256 of the URL; the `.` in the suffix never appears in base64
    /// output, so the two schemes cannot collide with each other.
    pub fn file_name(&self) -> String {
        let encoded = URL_SAFE_NO_PAD.encode(self.0.as_bytes());
        if encoded.len() <= MAX_FILE_NAME_LEN {
            return encoded;
        }

        let mut hasher = Sha256::new();
        hasher.update(self.0.as_bytes());
        format!("{:x}{}", hasher.finalize(), HASHED_FILE_NAME_SUFFIX)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&Url> for CacheKey {
    fn from(url: &Url) -> Self {
        Self::from_url(url)
    }
}

/// Cache statistics
#[derive(Debug, Clone, PartialEq)]
pub struct CacheStats {
    pub memory_entries: usize,
    pub disk_entries: usize,
    pub disk_bytes: u64,
    pub memory_hits: usize,
    pub disk_hits: usize,
    pub misses: usize,
    pub hit_rate: f32,
    pub cache_directory: PathBuf,
}

impl CacheStats {
    /// Format cache stats for display
    pub fn format(&self) -> String {
        format!(
            "Cache Statistics:\n\
            Directory:    {}\n\
            Memory Tier:  {} entries\n\
            Disk Tier:    {} entries ({:.2} MB)\n\
            Hit Rate:     {:.1}% ({} memory hits, {} disk hits, {} misses)",
            self.cache_directory.display(),
            self.memory_entries,
            self.disk_entries,
            self.disk_bytes as f64 / 1_048_576.0,
            self.hit_rate,
            self.memory_hits,
            self.disk_hits,
            self.misses
        )
    }
}
