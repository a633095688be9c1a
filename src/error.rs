//! Error types of the request pipeline.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::http::response::TransportResponse;

/// A classified transport failure.
///
/// Decided once, by the transport, and never re-inspected downstream.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ErrorInfo {
    /// The server answered with a status outside 2xx.
    Server(TransportResponse),
    /// The call never completed: network failure, timeout, cancellation,
    /// setup or interceptor error.
    Transport(String),
}

impl ErrorInfo {
    /// Status code when the server responded.
    pub fn status(&self) -> Option<u16> {
        match self {
            ErrorInfo::Server(response) => Some(response.status),
            ErrorInfo::Transport(_) => None,
        }
    }
}

/// Errors surfaced by a request.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RequestError {
    /// No options were given.
    #[error("options is required.")]
    OptionsRequired,

    /// The `url` field is missing or blank.
    #[error("url is required.")]
    UrlRequired,

    /// The server responded with an error status.
    #[error("server responded with status {}", .0.status)]
    Server(TransportResponse),

    /// The call failed before a response was received.
    #[error("{0}")]
    Transport(String),

    /// A hook rejected the call with its own value.
    #[error("request rejected: {0}")]
    Rejected(Value),
}

impl RequestError {
    /// True for the mandatory-field checks run before any network activity.
    pub fn is_validation(&self) -> bool {
        matches!(self, RequestError::OptionsRequired | RequestError::UrlRequired)
    }
}

impl From<ErrorInfo> for RequestError {
    fn from(info: ErrorInfo) -> Self {
        match info {
            ErrorInfo::Server(response) => RequestError::Server(response),
            ErrorInfo::Transport(description) => RequestError::Transport(description),
        }
    }
}

/// Result type of a request.
pub type RequestResult<T> = Result<T, RequestError>;
