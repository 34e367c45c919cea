// Repository snapshot module.
// Defines the cached data model and assembles it from GitHub API calls.

pub mod builder;
pub mod model;

pub use builder::{SnapshotBuilder, LATEST_BUILDS_LIMIT};
pub use model::{Build, ManifestInfo, RepositorySnapshot, NOT_AVAILABLE, NO_RELEASES};
