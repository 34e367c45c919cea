// GitHub API module.
// Provides the request seam, the reqwest-backed client, and response types.

pub mod client;
pub mod endpoints;
pub mod types;

#[cfg(test)]
pub(crate) mod fake;

pub use client::{Api, GitHubClient};
pub use types::*;
