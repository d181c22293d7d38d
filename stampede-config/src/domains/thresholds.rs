//! Pass/fail criteria evaluated against a finished run

use crate::error::ConfigResult;
use crate::validation::{validate_positive, validate_ratio, Validatable};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single pass/fail rule for a run.
///
/// Rendered in the familiar stage-table shorthand (`p(95)<500`,
/// `rate<0.10`, `count>100`) in reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum Threshold {
    /// The given latency percentile must stay under a millisecond budget
    LatencyPercentileUnder { percentile: u8, limit_ms: f64 },

    /// The request error rate must stay below the given ratio
    ErrorRateBelow { limit: f64 },

    /// The run must issue at least this many requests in total
    MinTotalRequests { count: u64 },

    /// The run must pull at least this many response body bytes
    MinDataReceived { bytes: u64 },
}

impl Threshold {
    pub fn p95_under_ms(limit_ms: f64) -> Self {
        Self::LatencyPercentileUnder {
            percentile: 95,
            limit_ms,
        }
    }

    pub fn error_rate_below(limit: f64) -> Self {
        Self::ErrorRateBelow { limit }
    }

    pub fn min_total_requests(count: u64) -> Self {
        Self::MinTotalRequests { count }
    }

    pub fn min_data_received(bytes: u64) -> Self {
        Self::MinDataReceived { bytes }
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LatencyPercentileUnder { percentile, limit_ms } => {
                write!(f, "p({})<{}", percentile, limit_ms)
            }
            Self::ErrorRateBelow { limit } => write!(f, "rate<{:.2}", limit),
            Self::MinTotalRequests { count } => write!(f, "count>{}", count),
            Self::MinDataReceived { bytes } => write!(f, "data_received>{}", bytes),
        }
    }
}

impl Validatable for Threshold {
    fn validate(&self) -> ConfigResult<()> {
        match self {
            Self::LatencyPercentileUnder { percentile, limit_ms } => {
                if !(1..=100).contains(percentile) {
                    return Err(self.validation_error(format!(
                        "percentile must be in 1..=100, got {}",
                        percentile
                    )));
                }
                validate_positive(*limit_ms, "limit_ms", self.domain_name())
            }
            Self::ErrorRateBelow { limit } => validate_ratio(*limit, "limit", self.domain_name()),
            Self::MinTotalRequests { count } => {
                validate_positive(*count, "count", self.domain_name())
            }
            Self::MinDataReceived { bytes } => {
                validate_positive(*bytes, "bytes", self.domain_name())
            }
        }
    }

    fn domain_name(&self) -> &'static str {
        "thresholds"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_display_shorthand() {
        assert_eq!(Threshold::p95_under_ms(500.0).to_string(), "p(95)<500");
        assert_eq!(Threshold::error_rate_below(0.1).to_string(), "rate<0.10");
        assert_eq!(Threshold::min_total_requests(100).to_string(), "count>100");
        assert_eq!(
            Threshold::min_data_received(1_000_000).to_string(),
            "data_received>1000000"
        );
    }

    #[test]
    fn test_threshold_validation() {
        assert!(Threshold::p95_under_ms(500.0).validate().is_ok());
        assert!(Threshold::error_rate_below(0.3).validate().is_ok());
        assert!(Threshold::min_total_requests(1).validate().is_ok());

        let bad_percentile = Threshold::LatencyPercentileUnder {
            percentile: 0,
            limit_ms: 500.0,
        };
        assert!(bad_percentile.validate().is_err());
        assert!(Threshold::error_rate_below(1.5).validate().is_err());
        assert!(Threshold::min_total_requests(0).validate().is_err());
    }
}
