//! Backend-specific error types.

use std::io;
use thiserror::Error;

/// Result type for backend operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors that can occur while talking to the backend service.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Failed to connect to the backend endpoint.
    #[error("failed to connect to backend: {0}")]
    ConnectFailed(#[source] io::Error),

    /// Failed to write a request.
    #[error("failed to write to backend: {0}")]
    WriteFailed(#[source] io::Error),

    /// Failed to read a response.
    #[error("failed to read from backend: {0}")]
    ReadFailed(#[source] io::Error),

    /// Failed to serialize a request to JSON.
    #[error("failed to serialize request: {0}")]
    SerializeFailed(#[source] serde_json::Error),

    /// Failed to deserialize a response from JSON.
    #[error("failed to deserialize response: {0}")]
    DeserializeFailed(#[source] serde_json::Error),

    /// Request timed out waiting for a response.
    #[error("request timed out after {0} seconds")]
    Timeout(u64),

    /// The backend connection was closed.
    #[error("backend connection closed unexpectedly")]
    ConnectionClosed,

    /// Response channel was closed (internal error).
    #[error("response channel closed unexpectedly")]
    ChannelClosed,

    /// The backend rejected the session token or credentials.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Invalid request parameters.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Method not found.
    #[error("method not found: {0}")]
    MethodNotFound(String),

    /// The backend returned an error response.
    #[error("backend error: {message} (code: {code})")]
    Remote {
        /// Error code from the backend.
        code: String,
        /// Error message from the backend.
        message: String,
    },
}

impl ApiError {
    /// Create a remote error from an error response.
    pub fn remote(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Remote {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Check if this error indicates the connection is gone.
    pub fn is_disconnected(&self) -> bool {
        matches!(self, Self::ConnectionClosed | Self::ChannelClosed)
    }

    /// Check if this error is retriable on a fresh connection.
    pub fn is_retriable(&self) -> bool {
        matches!(
            self,
            Self::Timeout(_) | Self::ConnectionClosed | Self::ChannelClosed
        )
    }

    /// Check if this error calls for a new login.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }
}

impl From<io::Error> for ApiError {
    fn from(err: io::Error) -> Self {
        Self::WriteFailed(err)
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::DeserializeFailed(err)
    }
}

impl From<tokio::sync::oneshot::error::RecvError> for ApiError {
    fn from(_: tokio::sync::oneshot::error::RecvError) -> Self {
        Self::ChannelClosed
    }
}
