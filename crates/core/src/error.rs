//! Error types for the cistat-core crate

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

use crate::status::StatusState;

/// Main error type for cistat operations
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {message}")]
    #[diagnostic(code(cistat::config::invalid))]
    Configuration {
        /// The error message describing the configuration issue
        message: String,
        /// Optional hint on how to fix it
        #[help]
        help: Option<String>,
    },

    /// A CI provider was detected but one of its convention variables is unset
    #[error("No value for {var}, aborting")]
    #[diagnostic(
        code(cistat::config::missing_env),
        help("Export the variable or pass the corresponding value on the command line")
    )]
    MissingEnv {
        /// Name of the environment variable that was needed
        var: String,
    },

    /// Posting a commit status to the remote service failed
    #[error("Failed to post commit status: {message}")]
    #[diagnostic(code(cistat::report::failed))]
    Report {
        /// The error message from the transport or API
        message: String,
    },

    /// I/O error with path context
    #[error("I/O error during {operation}: {source}")]
    #[diagnostic(code(cistat::io::error))]
    Io {
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
        /// The path where the I/O error occurred, if applicable
        path: Option<Box<std::path::Path>>,
        /// Description of the operation that failed
        operation: String,
    },

    /// A commit status was moved along an edge the state machine does not allow
    #[error("Invalid status transition from {from} to {to}")]
    #[diagnostic(code(cistat::status::invalid_transition))]
    InvalidTransition {
        /// State the status was in
        from: StatusState,
        /// State that was requested
        to: StatusState,
    },
}

impl Error {
    /// Create a configuration error with a message
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
            help: None,
        }
    }

    /// Create a configuration error with a message and help text
    pub fn configuration_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
            help: Some(help.into()),
        }
    }

    /// Create a missing environment variable error
    pub fn missing_env(var: impl Into<String>) -> Self {
        Self::MissingEnv { var: var.into() }
    }

    /// Create a status reporting error
    pub fn report(message: impl Into<String>) -> Self {
        Self::Report {
            message: message.into(),
        }
    }

    /// Create an I/O error with context
    pub fn io(source: std::io::Error, path: Option<PathBuf>, operation: impl Into<String>) -> Self {
        Self::Io {
            source,
            path: path.map(|p| p.into_boxed_path()),
            operation: operation.into(),
        }
    }
}

/// Result type for cistat operations
pub type Result<T> = std::result::Result<T, Error>;
