use anyhow::{Context, Result};
use directories::ProjectDirs;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::constants::{
    APP_NAME, CACHE_SUBDIRECTORY, DEFAULT_CATALOG_URL, DEFAULT_JPEG_QUALITY,
    DEFAULT_THUMBNAIL_CONCURRENCY, DEFAULT_USER_AGENT, ENV_PREFIX, HTTP_REQUEST_TIMEOUT_SECS,
};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Catalog endpoint
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Resource cache settings
    #[serde(default)]
    pub cache: CacheConfig,

    /// HTTP client settings
    #[serde(default)]
    pub network: NetworkConfig,

    /// Thumbnail warm-up settings
    #[serde(default)]
    pub thumbnails: ThumbnailConfig,
}

/// Catalog configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// URL returning `{"recipes": [...]}`
    pub url: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_CATALOG_URL.to_string(),
        }
    }
}

/// Cache configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Root directory; the platform cache dir when unset
    pub directory: Option<PathBuf>,
    /// Subdirectory the cache owns inside the root
    pub subdirectory: String,
    /// JPEG quality used when persisting photos (1-100)
    pub jpeg_quality: u8,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            directory: None,
            subdirectory: CACHE_SUBDIRECTORY.to_string(),
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

/// Network configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            timeout_secs: HTTP_REQUEST_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Thumbnail configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThumbnailConfig {
    /// Maximum concurrent thumbnail loads
    pub concurrency: usize,
}

impl Default for ThumbnailConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_THUMBNAIL_CONCURRENCY,
        }
    }
}

/// Load configuration from multiple sources
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let global_config = get_config_dir()?.join("config.toml");
    let local_config = PathBuf::from(".recipes/config.toml");
    build_figment(&[global_config.as_path(), local_config.as_path()], explicit)
        .extract()
        .context("Failed to load configuration")
}

/// Layer defaults, TOML files (in order) and `RECIPES_` environment variables
fn build_figment(files: &[&Path], explicit: Option<&Path>) -> Figment {
    let mut figment = Figment::from(Serialized::defaults(Config::default()));

    for file in files {
        if file.exists() {
            figment = figment.merge(Toml::file(file));
        }
    }

    if let Some(path) = explicit {
        figment = figment.merge(Toml::file(path));
    }

    // RECIPES_CATALOG__URL -> catalog.url
    figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
}

/// Get the configuration directory
pub fn get_config_dir() -> Result<PathBuf> {
    if let Some(proj_dirs) = ProjectDirs::from("", "", APP_NAME) {
        let config_dir = proj_dirs.config_dir();
        std::fs::create_dir_all(config_dir)?;
        Ok(config_dir.to_path_buf())
    } else {
        // Fallback to home directory
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .context("Could not determine home directory")?;
        let config_dir = PathBuf::from(home).join(".config").join(APP_NAME);
        std::fs::create_dir_all(&config_dir)?;
        Ok(config_dir)
    }
}

/// Save configuration to file
pub fn save_config(config: &Config, path: Option<PathBuf>) -> Result<PathBuf> {
    let path = if let Some(p) = path {
        p
    } else {
        get_config_dir()?.join("config.toml")
    };

    let toml_string = toml::to_string_pretty(config)?;
    std::fs::write(&path, toml_string)
        .with_context(|| format!("Failed to write config to {}", path.display()))?;

    Ok(path)
}

/// Create a default configuration file if it doesn't exist
pub fn init_config() -> Result<Option<PathBuf>> {
    let config_file = get_config_dir()?.join("config.toml");
    if config_file.exists() {
        return Ok(None);
    }
    save_config(&Config::default(), Some(config_file)).map(Some)
}
