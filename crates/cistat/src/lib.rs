//! cistat command-line front end.
//!
//! Parses flags into a [`cistat_core::Config`], picks a status reporter and
//! hands off to [`cistat_core::Orchestrator`].

pub mod cli;
pub mod tracing;

use std::sync::Arc;

use cistat_core::{EnvSnapshot, Orchestrator, RunOutcome, SimulatedReporter, StatusReporter};

use crate::cli::{Cli, CliError};

/// Run the task described by `cli` against the current process environment
pub async fn execute(cli: &Cli) -> Result<RunOutcome, CliError> {
    execute_with_env(cli, &EnvSnapshot::capture()).await
}

/// Run the task described by `cli` against an explicit environment
pub async fn execute_with_env(cli: &Cli, env: &EnvSnapshot) -> Result<RunOutcome, CliError> {
    let config = cli.to_config();
    // Reject a bad invocation before a client is built
    config.validate_invocation()?;

    let reporter = build_reporter(cli, &config)?;
    let outcome = Orchestrator::new(config, reporter).run(env).await?;
    Ok(outcome)
}

fn build_reporter(
    cli: &Cli,
    config: &cistat_core::Config,
) -> Result<Arc<dyn StatusReporter>, CliError> {
    if config.simulate {
        return Ok(Arc::new(SimulatedReporter));
    }
    github_reporter(cli, config)
}

#[cfg(feature = "github")]
fn github_reporter(
    cli: &Cli,
    config: &cistat_core::Config,
) -> Result<Arc<dyn StatusReporter>, CliError> {
    let token = config.token.as_ref().ok_or_else(|| {
        CliError::config_with_help(
            "Please provide a GitHub API token",
            "Pass --token or set GITHUB_API_TOKEN",
        )
    })?;
    let reporter = cistat_github::GitHubStatusReporter::with_base_uri(
        token,
        cli.api_url.as_deref().filter(|u| !u.is_empty()),
        config.verbose,
    )?;
    Ok(Arc::new(reporter))
}

#[cfg(not(feature = "github"))]
fn github_reporter(
    _cli: &Cli,
    _config: &cistat_core::Config,
) -> Result<Arc<dyn StatusReporter>, CliError> {
    Err(CliError::config_with_help(
        "GitHub support is not compiled in",
        "Rebuild with the 'github' feature or pass --fake-github",
    ))
}
