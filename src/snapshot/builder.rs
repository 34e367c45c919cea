// Snapshot assembly from GitHub API calls.
// Repository info and README are required; release, manifest, and builds
// calls fall back to fixed defaults when they fail.

use indexmap::IndexMap;
use serde_json::Value;
use tracing::{info, warn};

use crate::error::Result;
use crate::github::endpoints::RepoEndpoints;
use crate::github::{Api, ContentFile, Manifest, Release, RepoInfo, decode_lenient, value_to_text};

use super::model::{Build, ManifestInfo, NO_RELEASES, RepositorySnapshot};

/// Number of releases listed as latest builds.
pub const LATEST_BUILDS_LIMIT: usize = 4;

/// Builds a [`RepositorySnapshot`] for one repository.
pub struct SnapshotBuilder<'a, A> {
    api: &'a A,
    endpoints: RepoEndpoints,
    manifest_file: &'a str,
}

impl<'a, A: Api> SnapshotBuilder<'a, A> {
    pub fn new(api: &'a A, owner: &str, repo: &str, manifest_file: &'a str) -> Self {
        Self {
            api,
            endpoints: RepoEndpoints::new(owner, repo),
            manifest_file,
        }
    }

    /// Run every API call in order and assemble the snapshot.
    ///
    /// Fails only when a required call fails; the error is returned unchanged.
    pub async fn build(&self) -> Result<RepositorySnapshot> {
        info!("Fetching data from GitHub");

        let endpoint = self.endpoints.repo();
        let repo: RepoInfo = decode_lenient(self.api.request(&endpoint).await?, &endpoint);

        let latest_version = self.latest_version().await;
        let readme = self.readme().await?;
        let manifest = self.manifest().await;
        let latest_builds = self.latest_builds().await;

        info!("Data fetched successfully from GitHub");
        Ok(RepositorySnapshot {
            name: repo.name.unwrap_or_default(),
            description: repo.description.unwrap_or_default(),
            github_url: repo.html_url.unwrap_or_default(),
            stars: repo.stargazers_count.unwrap_or(0),
            watchers: repo.subscribers_count.unwrap_or(0),
            forks: repo.forks_count.unwrap_or(0),
            open_issues: repo.open_issues_count.unwrap_or(0),
            latest_version,
            readme,
            package_type: manifest.package_type,
            license: manifest.license,
            requirements: manifest.requirements,
            dev_requirements: manifest.dev_requirements,
            latest_builds,
        })
    }

    /// Tag of the latest release, or [`NO_RELEASES`].
    async fn latest_version(&self) -> String {
        let endpoint = self.endpoints.latest_release();
        match self.api.request(&endpoint).await {
            Ok(value) => {
                let release: Release = decode_lenient(value, &endpoint);
                release.tag_name.unwrap_or_default()
            }
            Err(e) => {
                info!(error = %e, "No releases found");
                NO_RELEASES.to_string()
            }
        }
    }

    async fn readme(&self) -> Result<String> {
        let endpoint = self.endpoints.readme();
        let value = self.api.request(&endpoint).await?;
        let file: ContentFile = decode_lenient(value, &endpoint);
        Ok(file.decode())
    }

    /// Manifest fields, or [`ManifestInfo::unavailable`] when the file is
    /// missing or not valid JSON. Mistyped keys fall back one by one.
    async fn manifest(&self) -> ManifestInfo {
        let endpoint = self.endpoints.contents(self.manifest_file);
        let value = match self.api.request(&endpoint).await {
            Ok(value) => value,
            Err(e) => {
                info!(file = self.manifest_file, error = %e, "No manifest found");
                return ManifestInfo::unavailable();
            }
        };

        let file: ContentFile = decode_lenient(value, &endpoint);
        let parsed: Value = match serde_json::from_str(&file.decode()) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(file = self.manifest_file, error = %e, "Manifest is not valid JSON");
                return ManifestInfo::unavailable();
            }
        };
        let manifest: Manifest = decode_lenient(parsed, &endpoint);

        let to_text = |deps: Option<IndexMap<String, Value>>| -> IndexMap<String, String> {
            deps.unwrap_or_default()
                .into_iter()
                .map(|(name, constraint)| (name, value_to_text(&constraint)))
                .collect()
        };

        ManifestInfo {
            package_type: manifest.package_type.unwrap_or_default(),
            license: manifest.license.as_ref().map(value_to_text).unwrap_or_default(),
            requirements: to_text(manifest.require),
            dev_requirements: to_text(manifest.require_dev),
        }
    }

    async fn latest_builds(&self) -> Vec<Build> {
        let endpoint = self.endpoints.releases(LATEST_BUILDS_LIMIT);
        let releases = match self.api.request(&endpoint).await {
            Ok(Value::Array(releases)) => releases,
            Ok(_) => {
                warn!(endpoint = %endpoint, "Releases response is not a list");
                return Vec::new();
            }
            Err(e) => {
                info!(error = %e, "No releases found for builds");
                return Vec::new();
            }
        };

        releases
            .into_iter()
            .take(LATEST_BUILDS_LIMIT)
            .map(|value| {
                let release: Release = decode_lenient(value, &endpoint);
                Build {
                    tag: release.tag_name.unwrap_or_default(),
                    url: release.html_url.unwrap_or_default(),
                }
            })
            .collect()
    }
}
