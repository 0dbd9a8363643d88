/// Constants module to avoid magic numbers in the codebase

// Catalog
pub const DEFAULT_CATALOG_URL: &str = "https://d3jbb8n5wk0qxi.cloudfront.net/recipes.json";

// Network Configuration
pub const HTTP_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_USER_AGENT: &str = concat!("recipes/", env!("CARGO_PKG_VERSION"));

// Cache Configuration
pub const CACHE_SUBDIRECTORY: &str = "ImageCache";
pub const DEFAULT_JPEG_QUALITY: u8 = 80; // 0.8 on a 0-1 scale
pub const MAX_FILE_NAME_LEN: usize = 255;
pub const HASHED_FILE_NAME_SUFFIX: &str = ".sha256";

// Thumbnails
pub const DEFAULT_THUMBNAIL_CONCURRENCY: usize = 8;

// Application identity (used for platform directories and env prefix)
pub const APP_NAME: &str = "recipes";
pub const ENV_PREFIX: &str = "RECIPES_";
