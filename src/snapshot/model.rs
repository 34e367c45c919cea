// Repository snapshot data model.
// Field names are the serialized contract consumed by the rendering layer.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// `latestVersion` when the repository has no releases.
pub const NO_RELEASES: &str = "No releases";

/// Manifest-derived fields when the manifest is unavailable.
pub const NOT_AVAILABLE: &str = "N/A";

/// Complete normalized metadata for one repository.
///
/// Every field is required on deserialization, so a cached record missing a
/// field is rejected rather than loaded half-populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositorySnapshot {
    pub name: String,
    pub description: String,
    pub github_url: String,
    pub stars: u64,
    pub watchers: u64,
    pub forks: u64,
    pub open_issues: u64,
    pub latest_version: String,
    pub readme: String,
    pub package_type: String,
    pub license: String,
    pub requirements: IndexMap<String, String>,
    pub dev_requirements: IndexMap<String, String>,
    pub latest_builds: Vec<Build>,
}

/// A recent release shown in the builds list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Build {
    pub tag: String,
    pub url: String,
}

/// Fields taken from the package manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestInfo {
    pub package_type: String,
    pub license: String,
    pub requirements: IndexMap<String, String>,
    pub dev_requirements: IndexMap<String, String>,
}

impl ManifestInfo {
    /// Defaults for a repository without a readable manifest.
    pub fn unavailable() -> Self {
        Self {
            package_type: NOT_AVAILABLE.to_string(),
            license: NOT_AVAILABLE.to_string(),
            requirements: IndexMap::new(),
            dev_requirements: IndexMap::new(),
        }
    }
}

/// Fully populated snapshot for tests.
#[cfg(test)]
pub(crate) fn sample_snapshot() -> RepositorySnapshot {
    let mut requirements = IndexMap::new();
    requirements.insert("php".to_string(), ">=8.1".to_string());
    requirements.insert("psr/log".to_string(), "^3.0".to_string());

    RepositorySnapshot {
        name: "widget".to_string(),
        description: "A small library".to_string(),
        github_url: "https://github.com/acme/widget".to_string(),
        stars: 10,
        watchers: 3,
        forks: 2,
        open_issues: 1,
        latest_version: "v1.2.0".to_string(),
        readme: "# Widget\n".to_string(),
        package_type: "library".to_string(),
        license: "MIT".to_string(),
        requirements,
        dev_requirements: IndexMap::new(),
        latest_builds: vec![Build {
            tag: "v1.2.0".to_string(),
            url: "https://github.com/acme/widget/releases/tag/v1.2.0".to_string(),
        }],
    }
}
