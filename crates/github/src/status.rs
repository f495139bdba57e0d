//! Commit status reporter backed by `octocrab`.

use async_trait::async_trait;
use cistat_core::{CommitStatus, Error, RepoTarget, Result, StatusReporter, StatusState};
use octocrab::Octocrab;
use octocrab::models;
use octocrab::service::middleware::retry::RetryConfig;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info};

/// Posts commit statuses to GitHub.
pub struct GitHubStatusReporter {
    client: Octocrab,
    verbose: bool,
}

impl GitHubStatusReporter {
    /// Create a reporter for api.github.com
    pub fn new(token: &SecretString, verbose: bool) -> Result<Self> {
        Self::with_base_uri(token, None, verbose)
    }

    /// Create a reporter for a custom API root (GitHub Enterprise, tests)
    pub fn with_base_uri(token: &SecretString, base_uri: Option<&str>, verbose: bool) -> Result<Self> {
        let token = token.expose_secret();
        if token.is_empty() {
            return Err(Error::configuration_with_help(
                "GitHub API token is empty",
                "Pass --token or set GITHUB_API_TOKEN",
            ));
        }

        // A failed post is fatal on the first attempt
        let mut builder = Octocrab::builder()
            .personal_token(token.to_string())
            .add_retry_config(RetryConfig::None);
        if let Some(uri) = base_uri {
            builder = builder.base_uri(uri).map_err(|e| {
                Error::configuration(format!("Invalid GitHub API URL '{uri}': {e}"))
            })?;
        }
        let client = builder
            .build()
            .map_err(|e| Error::configuration(format!("Failed to create GitHub client: {e}")))?;

        Ok(Self { client, verbose })
    }
}

fn api_state(state: StatusState) -> models::StatusState {
    match state {
        StatusState::Pending => models::StatusState::Pending,
        StatusState::Success => models::StatusState::Success,
        StatusState::Failure => models::StatusState::Failure,
    }
}

#[async_trait]
impl StatusReporter for GitHubStatusReporter {
    async fn post(&self, target: &RepoTarget, status: &CommitStatus) -> Result<()> {
        debug!(commit = %target, state = %status.state(), "Posting commit status");

        let repos = self.client.repos(&target.owner, &target.repo);
        let mut request = repos
            .create_status(target.revision.clone(), api_state(status.state()))
            .context(status.context().to_string())
            .description(status.description().to_string());
        if let Some(url) = status.target_url() {
            request = request.target(url.to_string());
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::report(format!("{target}: {e}")))?;

        if self.verbose {
            info!("{response:?}");
        }
        info!(
            "Updated status for '{}' to '{}'",
            status.context(),
            status.state()
        );
        Ok(())
    }
}
