//! Gateway error types
//!
//! One variant per failure class of a REST round trip.

use thiserror::Error;

/// Errors that can occur when talking to the hospital REST API
#[derive(Error, Debug)]
pub enum GatewayError {
    /// The request never produced a response (connection refused, timeout, ...)
    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-2xx status
    #[error("Fetch failed with status {status} for {url}: {message}")]
    Status {
        status: u16,
        url: String,
        message: String,
    },

    /// The response body was not the expected JSON shape
    #[error("Malformed response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// The HTTP client could not be built
    #[error("HTTP client error: {0}")]
    Client(String),
}

impl GatewayError {
    /// HTTP status of a non-2xx response
    pub fn status(&self) -> Option<u16> {
        match self {
            GatewayError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

/// Result type alias for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;
