//! Commit status state machine.
//!
//! A [`CommitStatus`] starts out [`StatusState::Pending`] and is completed
//! exactly once, to either [`StatusState::Success`] or [`StatusState::Failure`].
//! Both terminal states are final: there is no way back to pending and no way
//! to flip between success and failure.

use std::fmt;

use crate::runner::CommandResult;
use crate::{Error, Result};

/// State carried by a commit status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusState {
    /// The task has started but not finished
    Pending,
    /// The task command exited successfully
    Success,
    /// The task command failed to start, exited non-zero or was killed
    Failure,
}

impl StatusState {
    /// Wire name used by the commit-status API
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Success => "success",
            Self::Failure => "failure",
        }
    }

    /// Whether this state ends the lifecycle
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl fmt::Display for StatusState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A commit status as it is sent to the remote service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitStatus {
    state: StatusState,
    context: String,
    description: String,
    target_url: Option<String>,
}

impl CommitStatus {
    /// Create a status in the initial pending state
    pub fn pending(
        context: impl Into<String>,
        description: impl Into<String>,
        target_url: Option<String>,
    ) -> Self {
        Self {
            state: StatusState::Pending,
            context: context.into(),
            description: description.into(),
            target_url: target_url.filter(|url| !url.is_empty()),
        }
    }

    /// Current state
    pub fn state(&self) -> StatusState {
        self.state
    }

    /// Status category label, e.g. "test" or "deploy"
    pub fn context(&self) -> &str {
        &self.context
    }

    /// Human readable description
    pub fn description(&self) -> &str {
        &self.description
    }

    /// URL the status links to, if any
    pub fn target_url(&self) -> Option<&str> {
        self.target_url.as_deref()
    }

    /// Move from pending to the terminal state implied by `result`.
    pub fn complete(&mut self, result: &CommandResult) -> Result<StatusState> {
        let next = if result.success() {
            StatusState::Success
        } else {
            StatusState::Failure
        };
        self.transition(next)?;
        Ok(next)
    }

    fn transition(&mut self, to: StatusState) -> Result<()> {
        if self.state.is_terminal() || !to.is_terminal() {
            return Err(Error::InvalidTransition {
                from: self.state,
                to,
            });
        }
        self.state = to;
        Ok(())
    }
}
