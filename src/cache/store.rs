// Cache store for the snapshot file.
// Handles JSON serialization, staleness checks, and atomic overwrites.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use chrono::{DateTime, Local};
use tracing::{debug, info, warn};

use crate::error::{RepofetchError, Result};
use crate::snapshot::RepositorySnapshot;

/// Default freshness window: 12 hours.
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(12 * 3600);

/// Single-file store for the last good snapshot.
#[derive(Debug, Clone)]
pub struct CacheStore {
    path: PathBuf,
}

impl CacheStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check whether the cache should be refreshed.
    ///
    /// True when the file is absent, empty, or last modified more than
    /// `max_age` ago.
    pub fn is_stale(&self, max_age: Duration) -> bool {
        self.is_stale_at(SystemTime::now(), max_age)
    }

    /// Staleness relative to an explicit clock reading.
    pub fn is_stale_at(&self, now: SystemTime, max_age: Duration) -> bool {
        debug!(path = %self.path.display(), "Checking if cache should be updated");

        let modified = match fs::metadata(&self.path) {
            Ok(meta) if meta.len() > 0 => meta.modified(),
            _ => {
                info!("Cache file does not exist or is empty, will fetch new data");
                return true;
            }
        };

        let modified = match modified {
            Ok(time) => time,
            Err(e) => {
                warn!(error = %e, "Cache modification time unavailable, treating as stale");
                return true;
            }
        };

        // A timestamp in the future counts as just written.
        let age = now.duration_since(modified).unwrap_or(Duration::ZERO);
        let stale = age > max_age;

        let last_updated: DateTime<Local> = modified.into();
        info!(
            last_updated = %last_updated.format("%Y-%m-%d %H:%M:%S"),
            "Cache is {}",
            if stale { "outdated" } else { "current" }
        );
        stale
    }

    /// Load the cached snapshot.
    pub fn load(&self) -> Result<RepositorySnapshot> {
        debug!("Attempting to load data from cache");

        match fs::metadata(&self.path) {
            Ok(meta) if meta.len() > 0 => {}
            Ok(_) => return Err(RepofetchError::CacheMissing),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(RepofetchError::CacheMissing);
            }
            Err(e) => return Err(RepofetchError::CacheRead(e)),
        }

        let contents = fs::read_to_string(&self.path).map_err(RepofetchError::CacheRead)?;
        let snapshot =
            serde_json::from_str(&contents).map_err(RepofetchError::CacheCorrupt)?;

        info!("Successfully loaded data from cache");
        Ok(snapshot)
    }

    /// Replace the cached snapshot.
    ///
    /// Written to a sibling temp file and renamed over the target, so readers
    /// see either the old record or the new one.
    pub fn save(&self, snapshot: &RepositorySnapshot) -> Result<()> {
        debug!("Attempting to save data to cache");

        let json = serde_json::to_string_pretty(snapshot).map_err(RepofetchError::CacheSerialize)?;
        self.write_atomic(json.as_bytes())
            .map_err(RepofetchError::CacheWrite)?;

        info!(path = %self.path.display(), "Successfully saved data to cache");
        Ok(())
    }

    fn write_atomic(&self, bytes: &[u8]) -> io::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let temp_path = self.temp_path();
        let result = write_then_rename(&temp_path, &self.path, bytes);
        if result.is_err() {
            let _ = fs::remove_file(&temp_path);
        }
        result
    }

    /// Sibling temp file: the cache file name with `.tmp` appended.
    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

fn write_then_rename(temp_path: &Path, path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = fs::File::create(temp_path)?;
    file.write_all(bytes)?;
    file.sync_all()?;
    fs::rename(temp_path, path)
}
