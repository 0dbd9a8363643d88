use reqwest::StatusCode;
use thiserror::Error;

/// Main error type for recipes
#[derive(Error, Debug)]
pub enum RecipeError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP {status} for {url}")]
    HttpStatus { status: StatusCode, url: String },

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Encode error: {0}")]
    Encode(String),

    #[error("Malformed catalog: {0}")]
    Catalog(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RecipeError {
    /// Whether the failure happened at the network boundary (transport or status)
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_) | Self::HttpStatus { .. })
    }
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, RecipeError>;
