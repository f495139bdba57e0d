//! GitHub provider implementation for cistat.
//!
//! [`GitHubStatusReporter`] publishes commit statuses through the GitHub REST
//! API (`POST /repos/{owner}/{repo}/statuses/{sha}`).

pub mod status;

pub use status::GitHubStatusReporter;
