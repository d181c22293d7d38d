//! Configuration loading and environment variable handling

use crate::domains::SuiteConfig;
use crate::error::{ConfigError, ConfigResult};
use std::path::Path;
use std::str::FromStr;

/// Configuration loader with environment variable support
pub struct ConfigLoader {
    /// Environment variable prefix
    prefix: String,
}

impl ConfigLoader {
    /// Create a new config loader with the default `STAMPEDE` prefix
    pub fn new() -> Self {
        Self {
            prefix: "STAMPEDE".to_string(),
        }
    }

    /// Create a new config loader with a custom prefix
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Load configuration from a YAML file with environment overrides
    pub fn from_file(&self, path: impl AsRef<Path>) -> ConfigResult<SuiteConfig> {
        let content = std::fs::read_to_string(path)?;
        let mut config: SuiteConfig = serde_yaml::from_str(&content)?;

        self.apply_env_overrides(&mut config)?;
        config.validate_all()?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env(&self) -> ConfigResult<SuiteConfig> {
        let mut config = SuiteConfig::default();
        self.apply_env_overrides(&mut config)?;
        config.validate_all()?;
        Ok(config)
    }

    /// Load configuration with fallback chain
    pub fn load(&self, config_path: Option<impl AsRef<Path>>) -> ConfigResult<SuiteConfig> {
        match config_path {
            Some(path) => self.from_file(path),
            None => self.from_env(),
        }
    }

    /// Apply environment variable overrides to configuration
    fn apply_env_overrides(&self, config: &mut SuiteConfig) -> ConfigResult<()> {
        self.apply_target_overrides(config)?;
        self.apply_logging_overrides(config)?;
        self.apply_data_overrides(config)?;
        Ok(())
    }

    fn apply_target_overrides(&self, config: &mut SuiteConfig) -> ConfigResult<()> {
        if let Ok(base_url) = self.get_env_var("BASE_URL") {
            config.target.base_url = base_url;
        }

        if let Ok(timeout) = self.get_env_var("HTTP_TIMEOUT") {
            let seconds: u64 = timeout
                .parse()
                .map_err(|e| ConfigError::EnvError(format!("Invalid HTTP_TIMEOUT: {}", e)))?;
            config.target.timeout = std::time::Duration::from_secs(seconds);
        }

        if let Ok(user_agent) = self.get_env_var("USER_AGENT") {
            config.target.user_agent = user_agent;
        }

        if let Ok(verify_ssl) = self.get_env_var("VERIFY_SSL") {
            config.target.verify_ssl = verify_ssl
                .parse()
                .map_err(|e| ConfigError::EnvError(format!("Invalid VERIFY_SSL: {}", e)))?;
        }

        if let Ok(budget) = self.get_env_var("RESPONSE_BUDGET_MS") {
            config.target.response_time_budget_ms = budget
                .parse()
                .map_err(|e| ConfigError::EnvError(format!("Invalid RESPONSE_BUDGET_MS: {}", e)))?;
        }

        Ok(())
    }

    fn apply_logging_overrides(&self, config: &mut SuiteConfig) -> ConfigResult<()> {
        if let Ok(log_level) = self.get_env_var("LOG_LEVEL") {
            config.logging.level = crate::domains::logging::LogLevel::from_str(&log_level)
                .map_err(|_| ConfigError::EnvError(format!("Invalid LOG_LEVEL: {}", log_level)))?;
        }

        if let Ok(format) = self.get_env_var("LOG_FORMAT") {
            config.logging.format = crate::domains::logging::LogFormat::from_str(&format)
                .map_err(|_| ConfigError::EnvError(format!("Invalid LOG_FORMAT: {}", format)))?;
        }

        if let Ok(interval) = self.get_env_var("ITERATION_INTERVAL") {
            let parsed: u64 = interval
                .parse()
                .map_err(|e| ConfigError::EnvError(format!("Invalid ITERATION_INTERVAL: {}", e)))?;
            config.logging.iteration_interval = Some(parsed);
        }

        Ok(())
    }

    fn apply_data_overrides(&self, config: &mut SuiteConfig) -> ConfigResult<()> {
        if let Ok(email) = self.get_env_var("LOGIN_EMAIL") {
            config.data.login.email = email;
        }

        if let Ok(password) = self.get_env_var("LOGIN_PASSWORD") {
            config.data.login.password = password;
        }

        Ok(())
    }

    /// Get environment variable with prefix
    fn get_env_var(&self, name: &str) -> Result<String, std::env::VarError> {
        std::env::var(format!("{}_{}", self.prefix, name))
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_without_file_uses_defaults() {
        let loader = ConfigLoader::with_prefix("STAMPEDE_TEST_NONE");
        let config = loader.load(None::<&str>).unwrap();
        assert_eq!(config.target.base_url, "https://api.escuelajs.co/api/v1");
    }

    #[test]
    fn test_from_file_reads_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "target:\n  base_url: http://localhost:8080/api/v1\nlogging:\n  level: debug\n  iteration_interval: 25"
        )
        .unwrap();

        let loader = ConfigLoader::with_prefix("STAMPEDE_TEST_FILE");
        let config = loader.from_file(file.path()).unwrap();
        assert_eq!(config.target.base_url, "http://localhost:8080/api/v1");
        assert_eq!(config.logging.iteration_interval, Some(25));
    }

    #[test]
    fn test_env_override_wins_over_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "target:\n  base_url: http://file.example.com").unwrap();

        // Prefix is unique to this test so parallel tests cannot interfere
        std::env::set_var("STAMPEDE_TEST_ENV_BASE_URL", "http://env.example.com");
        let loader = ConfigLoader::with_prefix("STAMPEDE_TEST_ENV");
        let config = loader.from_file(file.path()).unwrap();
        std::env::remove_var("STAMPEDE_TEST_ENV_BASE_URL");

        assert_eq!(config.target.base_url, "http://env.example.com");
    }

    #[test]
    fn test_invalid_file_config_fails_validation() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "logging:\n  iteration_interval: 0").unwrap();

        let loader = ConfigLoader::with_prefix("STAMPEDE_TEST_INVALID");
        assert!(loader.from_file(file.path()).is_err());
    }
}
