// GitHub API endpoint paths.
// Builds the request paths for a single owner/repo pair.

/// Endpoint paths for one repository, relative to the API base.
#[derive(Debug, Clone)]
pub struct RepoEndpoints {
    base: String,
}

impl RepoEndpoints {
    pub fn new(owner: &str, repo: &str) -> Self {
        Self {
            base: format!("/repos/{}/{}", owner, repo),
        }
    }

    /// Core repository information.
    pub fn repo(&self) -> String {
        self.base.clone()
    }

    pub fn latest_release(&self) -> String {
        format!("{}/releases/latest", self.base)
    }

    pub fn readme(&self) -> String {
        format!("{}/readme", self.base)
    }

    /// A file from the default branch, e.g. `composer.json`.
    pub fn contents(&self, file: &str) -> String {
        format!("{}/contents/{}", self.base, file.trim_start_matches('/'))
    }

    /// The most recent releases, newest first.
    pub fn releases(&self, per_page: usize) -> String {
        format!("{}/releases?per_page={}", self.base, per_page)
    }
}
