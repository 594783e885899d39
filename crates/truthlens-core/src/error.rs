// SPDX-FileCopyrightText: 2026 Truthlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Truthlens client.
//!
//! [`TruthlensError`] is what every operation returns. Its `Display` output is
//! the text shown to the user in a notification, so variants carrying a
//! server- or validation-supplied message render it verbatim.
//!
//! [`ApiError`] is narrower: it records what the HTTP adapter observed. The
//! session store and orchestrator translate it into a [`TruthlensError`]
//! depending on which call failed.

use thiserror::Error;

use crate::types::Severity;

/// The primary error type used across the Truthlens workspace.
#[derive(Debug, Error)]
pub enum TruthlensError {
    /// Local input validation failed. Never reaches the network.
    #[error("{0}")]
    Validation(String),

    /// Login or registration was rejected by the service.
    #[error("{message}")]
    Auth { message: String },

    /// A protected operation was attempted without a signed-in user.
    #[error("Please sign in to use the detector")]
    LoginRequired,

    /// The bearer token was rejected or evicted; the session has been cleared.
    #[error("{message}")]
    SessionExpired { message: String },

    /// The classifier answered with a non-success status other than 401.
    #[error("server error: {status} {message}")]
    Server { status: u16, message: String },

    /// The classifier answered 2xx but embedded an error in the body.
    #[error("{0}")]
    Application(String),

    /// The request never produced an HTTP response (DNS, connect, TLS, body read).
    #[error("network error: {message}")]
    Transport {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Durable local storage failed.
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Configuration errors (invalid values, unusable endpoints).
    #[error("configuration error: {0}")]
    Config(String),

    /// Security policy violations (plain HTTP to a remote host, client build failures).
    #[error("security error: {0}")]
    Security(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl TruthlensError {
    /// Severity of the notification this error is surfaced as.
    pub fn severity(&self) -> Severity {
        match self {
            TruthlensError::LoginRequired => Severity::Info,
            _ => Severity::Error,
        }
    }

    /// Shorthand for a storage error from any displayable cause.
    pub fn storage(message: impl Into<String>) -> Self {
        TruthlensError::Storage {
            source: message.into().into(),
        }
    }
}

/// What the HTTP adapter observed when a call to the detection service failed.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The service answered 401.
    #[error("unauthorized")]
    Unauthorized { detail: Option<String> },

    /// The service answered with any other non-success status.
    #[error("HTTP {status}")]
    Status {
        status: u16,
        reason: Option<String>,
        detail: Option<String>,
    },

    /// No HTTP response was received.
    #[error("request failed: {0}")]
    Transport(String),

    /// A success response carried a body that could not be decoded.
    #[error("unexpected response body: {0}")]
    Decode(String),
}

impl ApiError {
    /// The server-supplied `detail` message, if the response carried one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiError::Unauthorized { detail } | ApiError::Status { detail, .. } => {
                detail.as_deref()
            }
            _ => None,
        }
    }
}
