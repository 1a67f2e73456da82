//! Error types for shop backend calls.

use thiserror::Error;

/// Errors that can occur when talking to the shop backend
#[derive(Error, Debug)]
pub enum ApiError {
    /// Transport-level failure (connection, timeout, invalid URL)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status
    #[error("shop API returned {status} for {path}")]
    Status { path: String, status: u16 },

    /// The response body was not the JSON we expected
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ApiError>;
