use crate::tracing::{LogLevel, TracingFormat};
use cistat_core::Config;
use cistat_core::config::DEFAULT_CONTEXT;
use clap::{ArgAction, Parser};
use miette::{Diagnostic, Report};
use secrecy::SecretString;
use std::io::{self, Write};
use std::path::PathBuf;
use thiserror::Error;

/// CLI or configuration error exit code
pub const EXIT_CLI: i32 = 2;
/// Commit status could not be posted
pub const EXIT_REPORT: i32 = 3;
/// Log artifact or other I/O error
pub const EXIT_IO: i32 = 4;

/// CLI-specific error types with proper exit code mapping
#[derive(Error, Debug, Clone, Diagnostic)]
pub enum CliError {
    /// CLI or configuration error (exit code 2)
    #[error("CLI/configuration error: {message}")]
    #[diagnostic(code(cistat::cli::config))]
    Config {
        /// The error message
        message: String,
        /// Optional help text
        #[help]
        help: Option<String>,
    },
    /// Status reporting error (exit code 3)
    #[error("Status reporting error: {message}")]
    #[diagnostic(code(cistat::cli::report))]
    Report {
        /// The error message
        message: String,
    },
    /// Other unexpected error (exit code 4)
    #[error("Unexpected error: {message}")]
    #[diagnostic(code(cistat::cli::other))]
    Other {
        /// The error message
        message: String,
        /// Optional help text
        #[help]
        help: Option<String>,
    },
}

impl CliError {
    /// Create a new configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            help: None,
        }
    }

    /// Create a new configuration error with help text
    #[must_use]
    pub fn config_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            help: Some(help.into()),
        }
    }

    /// Create a new other error
    #[must_use]
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
            help: None,
        }
    }
}

/// Convert `cistat_core::Error` to the matching `CliError` variant.
impl From<cistat_core::Error> for CliError {
    fn from(err: cistat_core::Error) -> Self {
        match err {
            // Extract just the message to avoid "Configuration error: Configuration error:"
            cistat_core::Error::Configuration { message, help } => Self::Config { message, help },
            cistat_core::Error::MissingEnv { .. } => Self::config_with_help(
                err.to_string(),
                "Export the variable or pass the corresponding flag explicitly",
            ),
            cistat_core::Error::Report { message } => Self::Report { message },
            cistat_core::Error::Io {
                source,
                path,
                operation,
            } => {
                let path_str = path
                    .as_ref()
                    .map_or(String::new(), |p| format!(" on {}", p.display()));
                Self::Other {
                    message: format!("I/O {operation} failed{path_str}: {source}"),
                    help: Some("Check that the artifacts directory is writable".to_string()),
                }
            }
            cistat_core::Error::InvalidTransition { .. } => Self::other(err.to_string()),
        }
    }
}

/// Map CLI error to appropriate exit code
#[must_use]
pub const fn exit_code_for(err: &CliError) -> i32 {
    match err {
        CliError::Config { .. } => EXIT_CLI,
        CliError::Report { .. } => EXIT_REPORT,
        CliError::Other { .. } => EXIT_IO,
    }
}

/// Print an error with miette's human-friendly rendering
#[allow(clippy::print_stderr)]
pub fn render_error(err: &CliError) {
    let report = Report::new(err.clone());
    eprintln!("{report:?}");
    // Ensure output is flushed before process exit
    let _ = io::stderr().flush();
}

/// Run a shell command for a CI job and report its commit status.
///
/// The status goes to `pending` before the command starts and to `success` or
/// `failure` once it exits. Combined output is written to
/// `<artifacts-dir>/<context>.txt`.
#[derive(Parser, Debug)]
#[command(name = "cistat")]
#[command(about = "Run a CI task and report its commit status to GitHub")]
#[command(version)]
pub struct Cli {
    /// GitHub API token. Should be restricted to repo:status scope.
    #[arg(long, env = "GITHUB_API_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Repository owner
    #[arg(long)]
    pub username: Option<String>,

    /// Repository name
    #[arg(long)]
    pub repo: Option<String>,

    /// Git commit/revision specifier
    #[arg(long)]
    pub rev: Option<String>,

    /// Log full API responses
    #[arg(long)]
    pub verbose: bool,

    /// Don't talk to GitHub, just log actions
    #[arg(long = "fake-github", alias = "fake_github", visible_alias = "simulate")]
    pub fake_github: bool,

    /// Mirror command output to stderr in addition to the log file
    #[arg(
        long = "show-output",
        alias = "show_output",
        default_value_t = true,
        num_args = 0..=1,
        default_missing_value = "true",
        action = ArgAction::Set,
        value_name = "BOOL"
    )]
    pub show_output: bool,

    /// Don't print the command in diagnostics. Use this if it contains secret tokens.
    #[arg(long)]
    pub suppress_command_echo: bool,

    /// URL the status should link to
    #[arg(long = "target-url", alias = "target_url")]
    pub target_url: Option<String>,

    /// Unique identifier for this status, e.g. 'compile', 'test' or 'deploy'
    #[arg(long, default_value = DEFAULT_CONTEXT)]
    pub context: String,

    /// Description of the task
    #[arg(long)]
    pub description: Option<String>,

    /// Directory that receives the `<context>.txt` log
    #[arg(long = "artifacts-dir", alias = "artifacts_dir")]
    pub artifacts_dir: Option<PathBuf>,

    /// GitHub API root, for GitHub Enterprise
    #[arg(long = "api-url", env = "CISTAT_GITHUB_API_URL")]
    pub api_url: Option<String>,

    /// Logging verbosity level.
    #[arg(short = 'L', long, value_enum, default_value_t = LogLevel::Info)]
    pub level: LogLevel,

    /// Log output format
    #[arg(long = "log-format", value_enum, default_value_t = TracingFormat::Compact)]
    pub log_format: TracingFormat,

    /// Shell command to run
    pub command: String,
}

impl Cli {
    /// Convert parsed flags into the core run configuration
    pub fn to_config(&self) -> Config {
        Config {
            owner: self.username.clone().unwrap_or_default(),
            repo: self.repo.clone().unwrap_or_default(),
            revision: self.rev.clone().unwrap_or_default(),
            token: self
                .token
                .clone()
                .filter(|t| !t.is_empty())
                .map(SecretString::from),
            context: self.context.clone(),
            description: self.description.clone().unwrap_or_default(),
            target_url: self.target_url.clone().filter(|u| !u.is_empty()),
            artifacts_dir: self
                .artifacts_dir
                .clone()
                .filter(|d| !d.as_os_str().is_empty()),
            simulate: self.fake_github,
            verbose: self.verbose,
            suppress_command_echo: self.suppress_command_echo,
            show_output: self.show_output,
            command: self.command.clone(),
        }
    }
}

/// Parse command line arguments
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}
