use super::{CIProvider, default_to_env, fill_from_slug, require};
use crate::Result;
use crate::config::Config;
use crate::env::EnvSnapshot;

const DEFAULT_SERVER_URL: &str = "https://github.com";

/// GitHub Actions
#[derive(Debug, Clone, Copy)]
pub struct GitHubActionsProvider;

impl GitHubActionsProvider {
    /// Page of a workflow run
    pub fn run_url(server_url: &str, owner: &str, repo: &str, run_id: &str) -> String {
        format!(
            "{}/{owner}/{repo}/actions/runs/{run_id}",
            server_url.trim_end_matches('/')
        )
    }
}

impl CIProvider for GitHubActionsProvider {
    fn name(&self) -> &'static str {
        "github"
    }

    fn detect(env: &EnvSnapshot) -> Option<Self> {
        env.is_true("GITHUB_ACTIONS").then_some(Self)
    }

    fn apply(&self, config: &mut Config, env: &EnvSnapshot) -> Result<()> {
        fill_from_slug(config, env, "GITHUB_REPOSITORY")?;
        default_to_env(&mut config.revision, env, "GITHUB_SHA")?;

        if !config.has_target_url() {
            let server = env.get("GITHUB_SERVER_URL").unwrap_or(DEFAULT_SERVER_URL);
            let run_id = require(env, "GITHUB_RUN_ID")?;
            config.target_url = Some(Self::run_url(server, &config.owner, &config.repo, run_id));
        }
        Ok(())
    }
}
