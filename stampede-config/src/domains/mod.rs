//! Domain-specific configuration modules

pub mod data;
pub mod logging;
pub mod target;
pub mod thresholds;
pub mod utils;
pub mod workload;

use crate::error::ConfigResult;
use crate::validation::Validatable;
use serde::{Deserialize, Serialize};

/// Main suite configuration combining all domains
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SuiteConfig {
    /// Target API configuration
    #[serde(default)]
    pub target: target::TargetConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: logging::LoggingConfig,

    /// Seed data for scenario behaviors
    #[serde(default)]
    pub data: data::TestDataConfig,
}

impl SuiteConfig {
    /// Validate all domain configurations
    pub fn validate_all(&self) -> ConfigResult<()> {
        self.target.validate()?;
        self.logging.validate()?;
        self.data.validate()?;
        Ok(())
    }

    /// Generate a sample configuration file
    pub fn generate_sample() -> String {
        let config = SuiteConfig::default();
        serde_yaml::to_string(&config).unwrap_or_else(|_| "# Failed to generate sample config".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_suite_config_is_valid() {
        assert!(SuiteConfig::default().validate_all().is_ok());
    }

    #[test]
    fn test_generate_sample_round_trips() {
        let sample = SuiteConfig::generate_sample();
        let parsed: SuiteConfig = serde_yaml::from_str(&sample).unwrap();
        assert!(parsed.validate_all().is_ok());
    }
}
