// Error types for repofetch.
// Covers GitHub API failures, cache failures, and configuration errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RepofetchError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error(
        "GitHub API request failed. Status code: {status}. Error: {message}. Endpoint: {endpoint}"
    )]
    Api {
        status: u16,
        message: String,
        endpoint: String,
    },

    #[error("Cache file does not exist or is empty")]
    CacheMissing,

    #[error("Failed to read from cache file: {0}")]
    CacheRead(#[source] std::io::Error),

    #[error("Failed to write to cache file: {0}")]
    CacheWrite(#[source] std::io::Error),

    #[error("Failed to encode data to JSON: {0}")]
    CacheSerialize(#[source] serde_json::Error),

    #[error("Failed to decode JSON data from cache: {0}")]
    CacheCorrupt(#[source] serde_json::Error),

    #[error("Missing GitHub token: set github.token or the GITHUB_TOKEN environment variable")]
    MissingToken,

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for RepofetchError {
    fn from(err: reqwest::Error) -> Self {
        RepofetchError::Transport(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RepofetchError>;
