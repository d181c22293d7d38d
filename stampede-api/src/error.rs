//! Error types for the typed store clients

use stampede_http::HttpError;
use thiserror::Error;

/// Errors surfaced by the resource clients.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    #[error("Failed to decode {what}: {source}")]
    Decode {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Authentication token required, call login first")]
    NotAuthenticated,
}

impl ApiError {
    pub fn decode(what: &'static str, source: serde_json::Error) -> Self {
        Self::Decode { what, source }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
