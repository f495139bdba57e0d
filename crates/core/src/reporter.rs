//! Commit status reporting.

use async_trait::async_trait;
use tracing::info;

use crate::Result;
use crate::config::RepoTarget;
use crate::status::CommitStatus;

/// Something that can publish a commit status
#[async_trait]
pub trait StatusReporter: Send + Sync {
    /// Post `status` for the commit identified by `target`.
    ///
    /// Any error is fatal to the run.
    async fn post(&self, target: &RepoTarget, status: &CommitStatus) -> Result<()>;
}

/// Reporter that only logs what it would have sent
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedReporter;

#[async_trait]
impl StatusReporter for SimulatedReporter {
    async fn post(&self, target: &RepoTarget, status: &CommitStatus) -> Result<()> {
        info!(
            target_commit = %target,
            url = status.target_url().unwrap_or_default(),
            "[simulated] Updating status for '{}' to {}",
            status.context(),
            status.state()
        );
        Ok(())
    }
}
