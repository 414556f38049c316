//! Error types for the care plan client.

use std::fmt;
use thiserror::Error;

/// Gateway-level failures: the request could not produce a tagged outcome.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Unexpected response status: {0}")]
    UnexpectedStatus(u16),

    /// Export was refused by the server. Carries the `error` field of the body, if any.
    #[error("Export rejected: {}", .0.as_deref().unwrap_or("no reason given"))]
    Rejected(Option<String>),
}

impl GatewayError {
    /// Server-supplied message suitable for showing to the user, if there is one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            GatewayError::Rejected(Some(message)) if !message.is_empty() => Some(message),
            _ => None,
        }
    }
}

/// Client-level errors surfaced by configuration, the session host and the CLI.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid order file {path}: {message}")]
    OrderFile { path: String, message: String },

    #[error("Input error: {0}")]
    InputError(String),

    #[error("Gateway error: {0}")]
    GatewayError(#[from] GatewayError),

    /// The action ran but did not succeed; the reason was already shown to the user.
    #[error("{0} did not complete")]
    ActionFailed(String),

    #[error("A submit workflow is already in progress")]
    WorkflowBusy,
}

impl From<config::ConfigError> for ClientError {
    fn from(err: config::ConfigError) -> Self {
        ClientError::ConfigError(err.to_string())
    }
}

/// Category of a failure shown on the notification surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Server-reported field errors from validation.
    Validation,
    /// Server-reported errors from generate, submit or export.
    Operation,
    /// No structured payload: network, status or decoding failure.
    Transport,
    /// Client-detected missing prerequisite.
    Precondition,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FailureKind::Validation => "validation",
            FailureKind::Operation => "operation",
            FailureKind::Transport => "transport",
            FailureKind::Precondition => "precondition",
        };
        f.write_str(name)
    }
}
