// Repository data fetcher.
// Decides between refreshing from GitHub and serving the cached snapshot,
// and collapses every failure into one error message.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::cache::CacheStore;
use crate::config::Config;
use crate::error::Result;
use crate::github::{Api, GitHubClient};
use crate::snapshot::{RepositorySnapshot, SnapshotBuilder};

/// Result of [`RepoDataFetcher::get_data`]: the snapshot, or `{"error": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RepoData {
    Snapshot(Box<RepositorySnapshot>),
    Error { error: String },
}

impl RepoData {
    pub fn snapshot(&self) -> Option<&RepositorySnapshot> {
        match self {
            RepoData::Snapshot(snapshot) => Some(&**snapshot),
            RepoData::Error { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            RepoData::Snapshot(_) => None,
            RepoData::Error { error } => Some(error.as_str()),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, RepoData::Error { .. })
    }
}

/// Fetches one repository's snapshot, refreshing the cache when it is stale.
pub struct RepoDataFetcher<A> {
    api: A,
    cache: CacheStore,
    owner: String,
    repo: String,
    manifest_file: String,
    max_age: Duration,
    // Held for a whole get_data call so concurrent callers in this process
    // do not refresh twice.
    refresh_lock: Mutex<()>,
}

impl RepoDataFetcher<GitHubClient> {
    /// Build a fetcher backed by the real GitHub API.
    pub fn from_config(config: &Config) -> Result<Self> {
        let api = GitHubClient::new(&config.github)?;
        Self::with_api(api, config)
    }
}

impl<A: Api> RepoDataFetcher<A> {
    pub fn with_api(api: A, config: &Config) -> Result<Self> {
        let cache = CacheStore::new(config.cache.resolved_path()?);
        info!(
            owner = %config.repository.owner,
            repo = %config.repository.repo,
            cache = %cache.path().display(),
            "Repository fetcher initialized"
        );

        Ok(Self {
            api,
            cache,
            owner: config.repository.owner.clone(),
            repo: config.repository.repo.clone(),
            manifest_file: config.repository.manifest_file.clone(),
            max_age: config.cache.max_age(),
            refresh_lock: Mutex::new(()),
        })
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    /// Return the repository snapshot, or an error result.
    ///
    /// Never fails: every failure becomes [`RepoData::Error`].
    pub async fn get_data(&self) -> RepoData {
        info!("get_data called");

        match self.try_get_data().await {
            Ok(snapshot) => RepoData::Snapshot(Box::new(snapshot)),
            Err(e) => {
                error!(error = %e, "Error in get_data");
                RepoData::Error {
                    error: format!(
                        "Unable to fetch data from GitHub and no valid cached data available. Error: {}",
                        e
                    ),
                }
            }
        }
    }

    async fn try_get_data(&self) -> Result<RepositorySnapshot> {
        let _guard = self.refresh_lock.lock().await;

        if self.cache.is_stale(self.max_age) {
            info!("Attempting to fetch new data from GitHub");
            let snapshot =
                SnapshotBuilder::new(&self.api, &self.owner, &self.repo, &self.manifest_file)
                    .build()
                    .await?;

            if let Err(e) = self.cache.save(&snapshot) {
                warn!(error = %e, "Failed to save data to cache, serving fresh data anyway");
            }
            Ok(snapshot)
        } else {
            info!("Loading data from cache");
            self.cache.load()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::fake::{FakeApi, encoded};
    use crate::snapshot::model::sample_snapshot;
    use serde_json::json;
    use std::fs;
    use std::time::SystemTime;
    use tempfile::TempDir;

    const REPO: &str = "/repos/acme/micromesh";
    const README: &str = "/repos/acme/micromesh/readme";

    fn config(dir: &TempDir) -> Config {
        let mut config = Config::default();
        config.repository.owner = "acme".to_string();
        config.repository.repo = "micromesh".to_string();
        config.cache.path = Some(dir.path().join("data.json"));
        config
    }

    fn age_cache(fetcher: &RepoDataFetcher<FakeApi>, secs: u64) {
        let file = fs::File::options()
            .write(true)
            .open(fetcher.cache().path())
            .unwrap();
        file.set_modified(SystemTime::now() - Duration::from_secs(secs))
            .unwrap();
    }

    fn minimal_api() -> FakeApi {
        FakeApi::new()
            .with_json(REPO, json!({"stargazers_count": 42, "name": "micromesh"}))
            .with_json(README, encoded("# micromesh\n"))
    }

    #[tokio::test]
    async fn test_empty_cache_fetches_with_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let fetcher = RepoDataFetcher::with_api(minimal_api(), &config(&temp_dir)).unwrap();
        fs::write(fetcher.cache().path(), "").unwrap();

        let data = fetcher.get_data().await;
        let snapshot = data.snapshot().expect("snapshot");

        assert_eq!(snapshot.stars, 42);
        assert_eq!(snapshot.name, "micromesh");
        assert_eq!(snapshot.latest_version, "No releases");
        assert_eq!(snapshot.license, "N/A");
        assert!(snapshot.latest_builds.is_empty());

        // Written back to the cache.
        assert_eq!(&fetcher.cache().load().unwrap(), snapshot);
        assert_eq!(fetcher.api().call_count(), 5);
    }

    #[tokio::test]
    async fn test_fresh_cache_served_without_network() {
        let temp_dir = TempDir::new().unwrap();
        let fetcher = RepoDataFetcher::with_api(FakeApi::new(), &config(&temp_dir)).unwrap();
        fetcher.cache().save(&sample_snapshot()).unwrap();

        let data = fetcher.get_data().await;
        assert_eq!(data.snapshot().unwrap().stars, 10);
        assert_eq!(data.snapshot().unwrap(), &sample_snapshot());
        assert_eq!(fetcher.api().call_count(), 0);
    }

    #[tokio::test]
    async fn test_stale_cache_required_failure_leaves_cache_untouched() {
        let temp_dir = TempDir::new().unwrap();
        let api = minimal_api().with_status(REPO, 404, "Not Found");
        let fetcher = RepoDataFetcher::with_api(api, &config(&temp_dir)).unwrap();
        fetcher.cache().save(&sample_snapshot()).unwrap();
        age_cache(&fetcher, 13 * 3600);
        let before = fs::read(fetcher.cache().path()).unwrap();

        let data = fetcher.get_data().await;
        let message = data.error().expect("error result");

        assert!(message.contains("404"));
        assert!(message.starts_with("Unable to fetch data from GitHub"));
        assert_eq!(fs::read(fetcher.cache().path()).unwrap(), before);
        assert_eq!(fetcher.api().calls(), vec![REPO]);
    }

    #[tokio::test]
    async fn test_stale_cache_is_refreshed() {
        let temp_dir = TempDir::new().unwrap();
        let fetcher = RepoDataFetcher::with_api(minimal_api(), &config(&temp_dir)).unwrap();
        fetcher.cache().save(&sample_snapshot()).unwrap();
        age_cache(&fetcher, 13 * 3600);

        let data = fetcher.get_data().await;
        assert_eq!(data.snapshot().unwrap().stars, 42);
        assert_eq!(fetcher.cache().load().unwrap().stars, 42);
        assert!(!fetcher.cache().is_stale(Duration::from_secs(43_200)));
    }

    #[tokio::test]
    async fn test_second_call_is_served_from_cache() {
        let temp_dir = TempDir::new().unwrap();
        let fetcher = RepoDataFetcher::with_api(minimal_api(), &config(&temp_dir)).unwrap();

        let first = fetcher.get_data().await;
        let calls = fetcher.api().call_count();
        let second = fetcher.get_data().await;
        let third = fetcher.get_data().await;

        assert_eq!(fetcher.api().call_count(), calls);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
        assert_eq!(
            serde_json::to_string(&second).unwrap(),
            serde_json::to_string(&third).unwrap()
        );
    }

    #[tokio::test]
    async fn test_corrupt_fresh_cache_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let fetcher = RepoDataFetcher::with_api(minimal_api(), &config(&temp_dir)).unwrap();
        fs::write(fetcher.cache().path(), "{ truncated").unwrap();

        let data = fetcher.get_data().await;
        assert!(data.is_error());
        assert!(data.error().unwrap().contains("decode JSON data from cache"));
        assert_eq!(fetcher.api().call_count(), 0);
    }

    #[tokio::test]
    async fn test_save_failure_still_returns_snapshot() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        fs::write(&blocker, "x").unwrap();
        let mut config = config(&temp_dir);
        config.cache.path = Some(blocker.join("data.json"));

        let fetcher = RepoDataFetcher::with_api(minimal_api(), &config).unwrap();
        let data = fetcher.get_data().await;

        assert_eq!(data.snapshot().unwrap().stars, 42);
    }

    #[tokio::test]
    async fn test_concurrent_calls_refresh_once() {
        let temp_dir = TempDir::new().unwrap();
        let fetcher = RepoDataFetcher::with_api(minimal_api(), &config(&temp_dir)).unwrap();

        let (a, b) = tokio::join!(fetcher.get_data(), fetcher.get_data());

        assert_eq!(a, b);
        assert_eq!(fetcher.api().call_count(), 5);
    }

    #[test]
    fn test_error_result_shape() {
        let data = RepoData::Error {
            error: "Unable to fetch data".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&data).unwrap(),
            json!({"error": "Unable to fetch data"})
        );

        let data = RepoData::Snapshot(Box::new(sample_snapshot()));
        assert_eq!(serde_json::to_value(&data).unwrap()["stars"], 10);
    }
}
