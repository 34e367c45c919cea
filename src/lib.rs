// repofetch: GitHub repository metadata with a local snapshot cache.

pub mod cache;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod github;
pub mod logging;
pub mod snapshot;

pub use config::Config;
pub use error::{RepofetchError, Result};
pub use fetcher::{RepoData, RepoDataFetcher};
pub use snapshot::RepositorySnapshot;
