//! CI provider detection and config auto-fill.
//!
//! When `CI=true`, the first provider whose marker variable is set fills the
//! empty fields of a [`Config`] from its convention variables. Explicit values
//! always win. A variable that is needed but absent is fatal.

mod circle;
mod github;
mod travis;

pub use circle::CircleProvider;
pub use github::GitHubActionsProvider;
pub use travis::TravisProvider;

use tracing::{info, warn};

use crate::config::Config;
use crate::env::EnvSnapshot;
use crate::{Error, Result};

/// Generic "running under CI" marker
pub const CI_MARKER: &str = "CI";

/// A CI platform that can fill in missing configuration
pub trait CIProvider {
    /// Short provider name for diagnostics
    fn name(&self) -> &'static str;

    /// Whether the environment belongs to this provider
    fn detect(env: &EnvSnapshot) -> Option<Self>
    where
        Self: Sized;

    /// Fill empty config fields from the provider's environment variables
    fn apply(&self, config: &mut Config, env: &EnvSnapshot) -> Result<()>;
}

/// Fill `config` from the detected CI provider, if any.
pub fn resolve(mut config: Config, env: &EnvSnapshot) -> Result<Config> {
    if !env.is_true(CI_MARKER) {
        info!("No CI detected, continuing anyways.");
        return Ok(config);
    }

    let Some(provider) = detect(env) else {
        warn!("CI not recognized, continuing anyways.");
        return Ok(config);
    };

    info!(provider = provider.name(), "Detected CI provider");
    provider.apply(&mut config, env)?;
    Ok(config)
}

fn detect(env: &EnvSnapshot) -> Option<Box<dyn CIProvider>> {
    if let Some(p) = CircleProvider::detect(env) {
        return Some(Box::new(p));
    }
    if let Some(p) = TravisProvider::detect(env) {
        return Some(Box::new(p));
    }
    GitHubActionsProvider::detect(env).map(|p| Box::new(p) as Box<dyn CIProvider>)
}

/// Set `field` from `var` unless it already has a value.
fn default_to_env(field: &mut String, env: &EnvSnapshot, var: &str) -> Result<()> {
    if field.is_empty() {
        *field = require(env, var)?.to_string();
    }
    Ok(())
}

fn require<'a>(env: &'a EnvSnapshot, var: &str) -> Result<&'a str> {
    env.get(var).ok_or_else(|| Error::missing_env(var))
}

/// Split an `owner/name` slug on its first `/` and fill owner/repo if empty.
fn fill_from_slug(config: &mut Config, env: &EnvSnapshot, var: &str) -> Result<()> {
    if !config.owner.is_empty() && !config.repo.is_empty() {
        return Ok(());
    }
    let slug = require(env, var)?;
    let (owner, repo) = slug
        .split_once('/')
        .filter(|(owner, repo)| !owner.is_empty() && !repo.is_empty())
        .ok_or_else(|| {
            Error::configuration(format!("{var} must look like owner/repo, got '{slug}'"))
        })?;
    if config.owner.is_empty() {
        config.owner = owner.to_string();
    }
    if config.repo.is_empty() {
        config.repo = repo.to_string();
    }
    Ok(())
}
