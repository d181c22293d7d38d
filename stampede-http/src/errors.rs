//! HTTP error types

use crate::types::{HttpMethod, HttpMethodError};

/// Error type for HTTP operations
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Invalid HTTP method: {0}")]
    InvalidMethod(#[from] HttpMethodError),

    #[error("Invalid request URL: {0}")]
    InvalidUrl(String),

    #[error("No mock response for {method} {path} in offline mode")]
    NoMock { method: HttpMethod, path: String },

    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}
