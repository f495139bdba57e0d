//! Drives one run: resolve, report pending, run, report final.

use std::sync::Arc;

use tracing::{info, instrument};

use crate::config::Config;
use crate::env::EnvSnapshot;
use crate::provider;
use crate::reporter::StatusReporter;
use crate::runner::{CommandResult, ShellTask};
use crate::status::{CommitStatus, StatusState};
use crate::{Error, Result};

/// Process exit code when the task command succeeded
pub const EXIT_SUCCESS: i32 = 0;
/// Process exit code when the task command failed
pub const EXIT_FAILURE: i32 = 1;

/// Final result of a run that got as far as reporting a terminal status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    /// Terminal status that was reported
    pub state: StatusState,
    /// What the task command did
    pub result: CommandResult,
}

impl RunOutcome {
    /// Exit code for the wrapper process
    pub fn exit_code(&self) -> i32 {
        match self.state {
            StatusState::Success => EXIT_SUCCESS,
            StatusState::Pending | StatusState::Failure => EXIT_FAILURE,
        }
    }
}

/// Sequences provider resolution, status reporting and the task command
pub struct Orchestrator {
    config: Config,
    reporter: Arc<dyn StatusReporter>,
}

impl Orchestrator {
    /// Create an orchestrator for `config` that reports through `reporter`
    pub fn new(config: Config, reporter: Arc<dyn StatusReporter>) -> Self {
        Self { config, reporter }
    }

    /// Run to completion.
    ///
    /// Configuration, reporting and log artifact errors abort the run. A
    /// failing command does not: it is reported as `failure` and surfaces in
    /// the returned outcome.
    #[instrument(name = "cistat_run", skip_all, fields(context = %self.config.context))]
    pub async fn run(self, env: &EnvSnapshot) -> Result<RunOutcome> {
        let Self { config, reporter } = self;

        config.validate_invocation()?;
        let config = provider::resolve(config, env)?;
        config.validate_target()?;

        let target = config.target();
        let mut status = CommitStatus::pending(
            config.context.clone(),
            config.description.clone(),
            config.target_url.clone(),
        );
        reporter.post(&target, &status).await?;

        let task = ShellTask::from_config(&config);
        let result = tokio::task::spawn_blocking(move || task.run())
            .await
            .map_err(|e| Error::io(std::io::Error::other(e.to_string()), None, "run task"))??;

        let state = status.complete(&result)?;
        reporter.post(&target, &status).await?;

        info!(state = %state, "Task finished");
        Ok(RunOutcome { state, result })
    }
}
