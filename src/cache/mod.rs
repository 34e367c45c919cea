// Cache module for the local snapshot file.
// Stores the last good snapshot; the file's modification time drives freshness.

pub mod paths;
pub mod store;

pub use paths::default_cache_path;
pub use store::{CacheStore, DEFAULT_MAX_AGE};
