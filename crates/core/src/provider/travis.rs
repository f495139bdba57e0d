use super::{CIProvider, default_to_env, fill_from_slug, require};
use crate::Result;
use crate::config::Config;
use crate::env::EnvSnapshot;

/// Travis CI
#[derive(Debug, Clone, Copy)]
pub struct TravisProvider;

impl TravisProvider {
    /// Build page for a Travis build id
    pub fn build_url(owner: &str, repo: &str, build_id: &str) -> String {
        format!("https://travis-ci.org/{owner}/{repo}/builds/{build_id}")
    }
}

impl CIProvider for TravisProvider {
    fn name(&self) -> &'static str {
        "travis"
    }

    fn detect(env: &EnvSnapshot) -> Option<Self> {
        env.is_true("TRAVIS").then_some(Self)
    }

    fn apply(&self, config: &mut Config, env: &EnvSnapshot) -> Result<()> {
        fill_from_slug(config, env, "TRAVIS_REPO_SLUG")?;
        default_to_env(&mut config.revision, env, "TRAVIS_COMMIT")?;

        if !config.has_target_url() {
            let build_id = require(env, "TRAVIS_BUILD_ID")?;
            config.target_url = Some(Self::build_url(&config.owner, &config.repo, build_id));
        }
        Ok(())
    }
}
