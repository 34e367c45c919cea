// Cache path utilities.

use std::path::PathBuf;

use directories::ProjectDirs;

/// File name of the cached snapshot.
pub const CACHE_FILE_NAME: &str = "data.json";

/// Get the base cache directory (~/.cache/repofetch on Linux).
pub fn cache_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "repofetch").map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Default location of the snapshot file.
pub fn default_cache_path() -> Option<PathBuf> {
    cache_dir().map(|dir| dir.join(CACHE_FILE_NAME))
}
