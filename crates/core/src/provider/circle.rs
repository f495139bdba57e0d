use std::path::PathBuf;

use super::{CIProvider, default_to_env, require};
use crate::Result;
use crate::config::Config;
use crate::env::EnvSnapshot;

/// CircleCI
#[derive(Debug, Clone, Copy)]
pub struct CircleProvider;

impl CircleProvider {
    /// Artifact URL served by the CircleCI v1.1 API.
    ///
    /// `artifacts_dir` is appended directly after the node index, so an
    /// absolute directory yields `.../artifacts/0/out/status.txt`.
    pub fn artifact_url(
        owner: &str,
        repo: &str,
        build_num: &str,
        node_index: &str,
        artifacts_dir: &str,
        artifact_name: &str,
    ) -> String {
        format!(
            "https://circleci.com/api/v1.1/project/github/{owner}/{repo}/{build_num}/artifacts/{node_index}{artifacts_dir}/{artifact_name}"
        )
    }
}

impl CIProvider for CircleProvider {
    fn name(&self) -> &'static str {
        "circleci"
    }

    fn detect(env: &EnvSnapshot) -> Option<Self> {
        env.is_true("CIRCLECI").then_some(Self)
    }

    fn apply(&self, config: &mut Config, env: &EnvSnapshot) -> Result<()> {
        default_to_env(&mut config.owner, env, "CIRCLE_PROJECT_USERNAME")?;
        default_to_env(&mut config.repo, env, "CIRCLE_PROJECT_REPONAME")?;
        default_to_env(&mut config.revision, env, "CIRCLE_SHA1")?;

        let artifacts_dir = match config.artifacts_dir.take() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => PathBuf::from(require(env, "CIRCLE_ARTIFACTS")?),
        };

        if !config.has_target_url() {
            let url = Self::artifact_url(
                &config.owner,
                &config.repo,
                require(env, "CIRCLE_BUILD_NUM")?,
                require(env, "CIRCLE_NODE_INDEX")?,
                &artifacts_dir.to_string_lossy(),
                &config.log_file_name(),
            );
            config.target_url = Some(url);
        }
        config.artifacts_dir = Some(artifacts_dir);
        Ok(())
    }
}
