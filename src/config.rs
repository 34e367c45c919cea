// Configuration for repofetch.
// Loaded from a TOML file, with the token optionally taken from GITHUB_TOKEN.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::cache::{DEFAULT_MAX_AGE, default_cache_path};
use crate::error::{RepofetchError, Result};

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub github: GitHubConfig,
    pub repository: RepositoryConfig,
    pub cache: CacheConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// Personal access token sent as `Authorization: token <token>`.
    pub token: Option<String>,
    /// API base URL (change for GitHub Enterprise).
    pub api_url: String,
    pub user_agent: String,
    pub accept: String,
    /// Per-request timeout.
    pub timeout_secs: u64,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            token: None,
            api_url: "https://api.github.com".to_string(),
            user_agent: "repofetch".to_string(),
            accept: "application/vnd.github.v3+json".to_string(),
            timeout_secs: 20,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositoryConfig {
    pub owner: String,
    pub repo: String,
    /// Manifest read for package type, license, and requirements.
    pub manifest_file: String,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            owner: String::new(),
            repo: String::new(),
            manifest_file: "composer.json".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Snapshot file; defaults to the platform cache directory.
    pub path: Option<PathBuf>,
    pub max_age_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            path: None,
            max_age_secs: DEFAULT_MAX_AGE.as_secs(),
        }
    }
}

impl CacheConfig {
    pub fn max_age(&self) -> Duration {
        Duration::from_secs(self.max_age_secs)
    }

    /// Configured path, or the platform default.
    pub fn resolved_path(&self) -> Result<PathBuf> {
        self.path
            .clone()
            .or_else(default_cache_path)
            .ok_or_else(|| RepofetchError::Config("could not determine cache directory".into()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub enabled: bool,
    /// Default filter directive; `RUST_LOG` takes precedence.
    pub level: String,
    /// Append-only log file in addition to stderr.
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: "info".to_string(),
            file: None,
        }
    }
}

impl Config {
    /// Load config from `path`, or from the default location if present.
    ///
    /// An explicit path must exist. Without one, a missing default file
    /// means built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::config_path() {
                Some(default) if default.exists() => Self::from_file(&default)?,
                _ => Self::default(),
            },
        };

        if config.github.token.is_none() {
            config.github.token = std::env::var("GITHUB_TOKEN").ok().filter(|t| !t.is_empty());
        }

        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            RepofetchError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents)
            .map_err(|e| RepofetchError::Config(format!("failed to parse config: {}", e)))
    }

    /// Reject configurations that cannot name a repository.
    pub fn validate(&self) -> Result<()> {
        if self.repository.owner.trim().is_empty() || self.repository.repo.trim().is_empty() {
            return Err(RepofetchError::Config(
                "repository.owner and repository.repo must be set".into(),
            ));
        }
        if self.repository.manifest_file.trim().is_empty() {
            return Err(RepofetchError::Config(
                "repository.manifest_file must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Default config file (~/.config/repofetch/config.toml on Linux).
    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "repofetch").map(|dirs| dirs.config_dir().join("config.toml"))
    }
}
