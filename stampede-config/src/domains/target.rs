//! Target service configuration for the HTTP client

use crate::error::ConfigResult;
use crate::validation::{validate_positive, validate_required_string, validate_url, Validatable};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the store API under test
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    /// Base URL of the API, e.g. `https://api.escuelajs.co/api/v1`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout
    #[serde(
        with = "crate::domains::utils::serde_duration",
        default = "default_timeout"
    )]
    pub timeout: Duration,

    /// Maximum number of redirects to follow
    #[serde(default = "default_max_redirects")]
    pub max_redirects: u32,

    /// User agent string sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Whether to verify SSL certificates
    #[serde(default = "crate::domains::utils::default_true")]
    pub verify_ssl: bool,

    /// Latency budget a response must meet to count as healthy, in ms
    #[serde(default = "default_response_budget_ms")]
    pub response_time_budget_ms: u64,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout: default_timeout(),
            max_redirects: default_max_redirects(),
            user_agent: default_user_agent(),
            verify_ssl: true,
            response_time_budget_ms: default_response_budget_ms(),
        }
    }
}

impl Validatable for TargetConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_url(&self.base_url, "base_url", self.domain_name())?;
        validate_positive(self.timeout.as_secs(), "timeout", self.domain_name())?;
        validate_required_string(&self.user_agent, "user_agent", self.domain_name())?;
        validate_positive(
            self.response_time_budget_ms,
            "response_time_budget_ms",
            self.domain_name(),
        )?;
        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "target"
    }
}

// Default value functions
fn default_base_url() -> String {
    "https://api.escuelajs.co/api/v1".to_string()
}

fn default_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_max_redirects() -> u32 {
    10
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36".to_string()
}

fn default_response_budget_ms() -> u64 {
    500
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_config_defaults() {
        let config = TargetConfig::default();
        assert_eq!(config.base_url, "https://api.escuelajs.co/api/v1");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.response_time_budget_ms, 500);
        assert!(config.verify_ssl);
    }

    #[test]
    fn test_target_config_validation() {
        let mut config = TargetConfig::default();
        assert!(config.validate().is_ok());

        config.base_url = "definitely not a url".to_string();
        assert!(config.validate().is_err());

        config = TargetConfig::default();
        config.timeout = Duration::from_secs(0);
        assert!(config.validate().is_err());

        config = TargetConfig::default();
        config.user_agent = String::new();
        assert!(config.validate().is_err());
    }
}
