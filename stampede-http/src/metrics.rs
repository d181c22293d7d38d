//! Request outcome recording seam
//!
//! Every call through [`crate::StoreClient`] produces one
//! [`RequestOutcome`], including calls that never reached the network.
//! Consumers implement [`MetricsSink`] to aggregate them; the client itself
//! keeps no counters.

use crate::types::HttpMethod;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Why a response failed validation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ValidationFailure {
    /// Response status did not match the expected one
    StatusMismatch { expected: u16, actual: u16 },

    /// Response took longer than the configured latency budget
    OverBudget { latency_ms: u64, budget_ms: u64 },

    /// Response body was empty
    EmptyBody,

    /// Response body was not valid JSON
    InvalidJson,

    /// The request never produced a response
    Transport { message: String },
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StatusMismatch { expected, actual } => {
                write!(f, "expected status {}, got {}", expected, actual)
            }
            Self::OverBudget { latency_ms, budget_ms } => {
                write!(f, "response took {}ms, budget is {}ms", latency_ms, budget_ms)
            }
            Self::EmptyBody => write!(f, "empty response body"),
            Self::InvalidJson => write!(f, "response body is not valid JSON"),
            Self::Transport { message } => write!(f, "transport failure: {}", message),
        }
    }
}

/// One observed request, successful or not
#[derive(Debug, Clone, Serialize)]
pub struct RequestOutcome {
    /// Operation label supplied by the caller, e.g. `list_products`
    pub operation: &'static str,

    /// HTTP method used
    pub method: HttpMethod,

    /// Request path relative to the base URL
    pub path: String,

    /// Response status, or 0 when the request never completed
    pub status: u16,

    /// Wall-clock latency in milliseconds
    pub latency_ms: u64,

    /// Response body size in bytes
    pub bytes: u64,

    /// Validation verdict for this response
    pub failure: Option<ValidationFailure>,
}

impl RequestOutcome {
    pub fn passed(&self) -> bool {
        self.failure.is_none()
    }
}

/// Destination for request outcomes
#[async_trait::async_trait]
pub trait MetricsSink: Send + Sync {
    async fn record(&self, outcome: RequestOutcome);
}

/// Sink that discards everything
#[derive(Debug, Default)]
pub struct NullMetrics;

#[async_trait::async_trait]
impl MetricsSink for NullMetrics {
    async fn record(&self, _outcome: RequestOutcome) {}
}

/// Shared sink handle used by the client
pub type SharedMetrics = Arc<dyn MetricsSink>;
