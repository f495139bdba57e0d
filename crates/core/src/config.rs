//! Run configuration.
//!
//! [`Config`] is built once (by the CLI or by a test), filled in by provider
//! resolution and then only read.

use secrecy::SecretString;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Default status context when none is given
pub const DEFAULT_CONTEXT: &str = "status";

/// Everything needed to run one task and report on it
#[derive(Debug)]
pub struct Config {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Commit the status is attached to
    pub revision: String,
    /// API credential, absent only when simulating
    pub token: Option<SecretString>,
    /// Status category label
    pub context: String,
    /// Status description
    pub description: String,
    /// Link shown next to the status
    pub target_url: Option<String>,
    /// Directory that receives the log artifact
    pub artifacts_dir: Option<PathBuf>,
    /// Log instead of talking to the remote service
    pub simulate: bool,
    /// Log full response details after each post
    pub verbose: bool,
    /// Hide the command text from diagnostics
    pub suppress_command_echo: bool,
    /// Mirror command output to the console
    pub show_output: bool,
    /// Shell command to run
    pub command: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            owner: String::new(),
            repo: String::new(),
            revision: String::new(),
            token: None,
            context: DEFAULT_CONTEXT.to_string(),
            description: String::new(),
            target_url: None,
            artifacts_dir: None,
            simulate: false,
            verbose: false,
            suppress_command_echo: false,
            show_output: true,
            command: String::new(),
        }
    }
}

impl Config {
    /// File name of the log artifact, `<context>.txt`
    pub fn log_file_name(&self) -> String {
        format!("{}.txt", self.context)
    }

    /// Full path of the log artifact
    pub fn log_path(&self) -> PathBuf {
        self.artifacts_dir
            .as_deref()
            .unwrap_or_else(|| Path::new(""))
            .join(self.log_file_name())
    }

    /// Whether an explicit target URL was supplied
    pub fn has_target_url(&self) -> bool {
        self.target_url.as_ref().is_some_and(|url| !url.is_empty())
    }

    /// Checks that do not depend on the CI environment.
    ///
    /// Runs before provider resolution so that a bad invocation fails before
    /// anything else happens.
    pub fn validate_invocation(&self) -> Result<()> {
        if self.command.trim().is_empty() {
            return Err(Error::configuration("No command provided"));
        }
        if self.description.is_empty() {
            return Err(Error::configuration_with_help(
                "Please provide a description",
                "Pass --description \"...\"",
            ));
        }
        if self.context.is_empty() {
            return Err(Error::configuration("Status context must not be empty"));
        }
        if !self.simulate && self.token.is_none() {
            return Err(Error::configuration_with_help(
                "No GitHub API token provided",
                "Pass --token, set GITHUB_API_TOKEN, or use --fake-github",
            ));
        }
        Ok(())
    }

    /// Checks that the status target is fully known. Runs after resolution.
    pub fn validate_target(&self) -> Result<()> {
        let missing: Vec<&str> = [
            ("username", &self.owner),
            ("repo", &self.repo),
            ("rev", &self.revision),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(name, _)| name)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::configuration_with_help(
                format!("Missing required value(s): {}", missing.join(", ")),
                "Pass them explicitly or run under a supported CI provider",
            ))
        }
    }

    /// Identity of the commit the status is posted to
    pub fn target(&self) -> RepoTarget {
        RepoTarget {
            owner: self.owner.clone(),
            repo: self.repo.clone(),
            revision: self.revision.clone(),
        }
    }
}

/// The (owner, repo, revision) triple a commit status is addressed to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoTarget {
    /// Repository owner
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Commit SHA or other revision specifier
    pub revision: String,
}

impl fmt::Display for RepoTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}@{}",
            self.owner,
            self.repo,
            self.revision.get(..7).unwrap_or(&self.revision)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> Config {
        Config {
            owner: "acme".to_string(),
            repo: "widget".to_string(),
            revision: "0123456789abcdef".to_string(),
            description: "Unit tests".to_string(),
            command: "make test".to_string(),
            simulate: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.context, "status");
        assert!(config.show_output);
        assert!(!config.simulate);
        assert!(config.token.is_none());
    }

    #[test]
    fn test_log_path_without_artifacts_dir() {
        let config = valid();
        assert_eq!(config.log_path(), PathBuf::from("status.txt"));
    }

    #[test]
    fn test_log_path_uses_context() {
        let config = Config {
            context: "compile".to_string(),
            artifacts_dir: Some(PathBuf::from("/out")),
            ..valid()
        };
        assert_eq!(config.log_path(), PathBuf::from("/out/compile.txt"));
    }

    #[test]
    fn test_validate_invocation_ok() {
        assert!(valid().validate_invocation().is_ok());
    }

    #[test]
    fn test_missing_description() {
        let config = Config {
            description: String::new(),
            ..valid()
        };
        let err = config.validate_invocation().unwrap_err();
        assert!(err.to_string().contains("description"));
    }

    #[test]
    fn test_missing_command() {
        let config = Config {
            command: "  ".to_string(),
            ..valid()
        };
        assert!(config.validate_invocation().is_err());
    }

    #[test]
    fn test_token_required_unless_simulating() {
        let config = Config {
            simulate: false,
            ..valid()
        };
        assert!(config.validate_invocation().is_err());

        let config = Config {
            simulate: false,
            token: Some(SecretString::from("ghp_secret".to_string())),
            ..valid()
        };
        assert!(config.validate_invocation().is_ok());
    }

    #[test]
    fn test_validate_target_lists_missing_fields() {
        let config = Config {
            owner: String::new(),
            revision: String::new(),
            ..valid()
        };
        let err = config.validate_target().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("username"));
        assert!(message.contains("rev"));
        assert!(!message.contains("repo,"));
    }

    #[test]
    fn test_token_is_not_debug_printed() {
        let config = Config {
            token: Some(SecretString::from("ghp_very_secret".to_string())),
            ..valid()
        };
        assert!(!format!("{config:?}").contains("ghp_very_secret"));
    }

    #[test]
    fn test_target_display_shortens_revision() {
        assert_eq!(valid().target().to_string(), "acme/widget@0123456");
    }
}
