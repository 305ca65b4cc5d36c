//! Failure taxonomy for the action.
//!
//! Every error is raised at the point of detection and propagates unchanged to
//! the entry point, which is the only place that turns it into a failure
//! report and an exit code. Nothing here is retried.

use std::fmt;
use thiserror::Error;

/// Whether a `key:value` entry came from the plain or masked variable input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableKind {
    Plain,
    Masked,
}

impl fmt::Display for VariableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariableKind::Plain => f.write_str("variable"),
            VariableKind::Masked => f.write_str("masked variable"),
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("{name} is not set. Please use the buddy/login@v1 action before running pipelines.")]
    MissingCredential { name: &'static str },

    #[error("Invalid priority: \"{value}\". Must be one of: LOW, NORMAL, HIGH")]
    InvalidPriority { value: String },

    #[error("Invalid region: \"{value}\". Must be one of: EU, US, AP")]
    InvalidRegion { value: String },

    #[error("Invalid wait value: \"{value}\". Must be a number.")]
    InvalidWaitTime { value: String },

    #[error("Wait time cannot be negative")]
    NegativeWaitTime,

    #[error("Invalid {kind} format: \"{entry}\". Must be in key:value format.")]
    InvalidVariableFormat { kind: VariableKind, entry: String },

    /// External tool exited non-zero. The message is the tool's stderr, or a
    /// synthesized `Command failed with exit code ...` line when stderr was
    /// empty.
    #[error("{message}")]
    CommandFailed {
        exit_code: Option<i32>,
        message: String,
    },

    #[error("Failed to install bdy CLI: {reason}")]
    InstallFailed { reason: String },
}
