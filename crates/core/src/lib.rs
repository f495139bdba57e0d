//! Core of cistat, a CI task wrapper.
//!
//! cistat runs one shell command on behalf of a CI job, captures its combined
//! output to `<artifacts-dir>/<context>.txt` and reports a commit status that
//! moves from `pending` to `success` or `failure`.
//!
//! - [`config`]: the run configuration
//! - [`provider`]: CI provider detection and config auto-fill
//! - [`status`]: the commit status state machine
//! - [`reporter`]: the [`StatusReporter`] seam and a simulated implementation
//! - [`runner`]: command execution with tee'd log capture
//! - [`orchestrator`]: sequences the above into one run

pub mod config;
pub mod env;
pub mod error;
pub mod orchestrator;
pub mod provider;
pub mod reporter;
pub mod runner;
pub mod status;

pub use config::{Config, RepoTarget};
pub use env::EnvSnapshot;
pub use error::{Error, Result};
pub use orchestrator::{Orchestrator, RunOutcome};
pub use reporter::{SimulatedReporter, StatusReporter};
pub use runner::{CommandResult, ShellTask};
pub use status::{CommitStatus, StatusState};
