//! Error types for the Digiflazz client.
//!
//! # Design
//! Errors are classified by where they originate: construction
//! (`InvalidConfiguration`), argument checks before sending
//! (`InvalidArgument`), request setup (`RequestSetupFailed`), the network
//! (`NoResponse`) and the remote service (`RemoteRejected`). Every failure of a
//! call surfaces as exactly one of these; none are retried or swallowed.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors returned by `Credentials`, `DigiflazzClient` and `Digiflazz`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// A required credential field was missing or empty.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The request was refused locally before being sent.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The remote answered with an error status, or with a body that does not
    /// match the operation's result shape.
    #[error("remote rejected request (HTTP {status}): {message}")]
    RemoteRejected { status: u16, message: String },

    /// The request went out but no response came back.
    #[error("no response from remote: {0}")]
    NoResponse(String),

    /// The request could not be built or handed to the transport.
    #[error("request setup failed: {0}")]
    RequestSetupFailed(String),
}

impl ApiError {
    pub fn remote_rejected(status: u16, message: impl Into<String>) -> Self {
        Self::RemoteRejected {
            status,
            message: message.into(),
        }
    }

    /// HTTP status of a remote rejection, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::RemoteRejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}
