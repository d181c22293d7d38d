//! HTTP client functionality for stampede
//!
//! This crate provides the HTTP layer the resource clients sit on: a
//! reqwest-backed client with response validation, per-request outcome
//! recording, and an offline mock mode used throughout the test suites.

pub mod client;
pub mod errors;
pub mod metrics;
pub mod types;

// Re-export main types for convenience
pub use client::{ApiResponse, BatchRequest, StoreClient};
pub use errors::HttpError;
pub use metrics::{MetricsSink, NullMetrics, RequestOutcome, SharedMetrics, ValidationFailure};
pub use types::{HttpMethod, HttpMethodError};
