//! Fetch error types

use std::time::Duration;

/// Errors that can occur while fetching a page of products.
///
/// Transport failures (no response was obtained) and response failures (a
/// response indicated an error) are kept apart so callers can tell them
/// apart later, even though the pagination controller only surfaces the
/// display message.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Network error before a response was obtained.
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Request timed out.
    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    /// The server answered with a non-success status.
    #[error("Failed to fetch products: {status} {reason}")]
    Response {
        /// HTTP status code.
        status: u16,
        /// Status text, e.g. `Internal Server Error`.
        reason: String,
    },

    /// Failed to decode a successful response body.
    #[error("Response parse error: {message}")]
    Parse {
        /// Description of the parse error.
        message: String,
        /// Raw response body, if available.
        body: Option<String>,
    },

    /// Invalid base URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl FetchError {
    /// Creates a new response error.
    pub fn response(status: u16, reason: impl Into<String>) -> Self {
        Self::Response {
            status,
            reason: reason.into(),
        }
    }

    /// Creates a new parse error with the raw response body.
    pub fn parse_with_body(message: impl Into<String>, body: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            body: Some(body.into()),
        }
    }

    /// Returns the HTTP status code if the server answered with an error.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Response { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` if no response was obtained.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Timeout(_))
    }
}
