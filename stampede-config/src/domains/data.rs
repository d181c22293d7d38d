//! Seed data used by scenario behaviors
//!
//! Mirrors the well-known fixture rows of the public fake-store API so
//! read-heavy scenarios hit records that actually exist.

use crate::error::ConfigResult;
use crate::validation::{validate_required_string, Validatable};
use serde::{Deserialize, Serialize};

/// Known-good resource IDs and credentials for the target API
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TestDataConfig {
    /// Product IDs safe to read in detail scenarios
    #[serde(default = "default_product_ids")]
    pub product_sample_ids: Vec<u32>,

    /// Category IDs safe to browse
    #[serde(default = "default_category_ids")]
    pub category_sample_ids: Vec<u32>,

    /// User IDs safe to read
    #[serde(default = "default_user_ids")]
    pub user_sample_ids: Vec<u32>,

    /// Price windows used by filtered product searches
    #[serde(default = "default_price_ranges")]
    pub price_ranges: Vec<PriceRange>,

    /// Credentials for the authentication scenarios
    #[serde(default)]
    pub login: LoginConfig,
}

/// One price filter window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: u32,
    pub max: u32,
}

/// Login credentials for auth flows
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginConfig {
    pub email: String,
    pub password: String,
}

impl Default for TestDataConfig {
    fn default() -> Self {
        Self {
            product_sample_ids: default_product_ids(),
            category_sample_ids: default_category_ids(),
            user_sample_ids: default_user_ids(),
            price_ranges: default_price_ranges(),
            login: LoginConfig::default(),
        }
    }
}

impl Default for LoginConfig {
    fn default() -> Self {
        Self {
            email: "john@mail.com".to_string(),
            password: "changeme".to_string(),
        }
    }
}

impl Validatable for TestDataConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.product_sample_ids.is_empty() {
            return Err(self.validation_error("product_sample_ids cannot be empty"));
        }
        if self.category_sample_ids.is_empty() {
            return Err(self.validation_error("category_sample_ids cannot be empty"));
        }
        if self.user_sample_ids.is_empty() {
            return Err(self.validation_error("user_sample_ids cannot be empty"));
        }
        if self.price_ranges.is_empty() {
            return Err(self.validation_error("price_ranges cannot be empty"));
        }
        for range in &self.price_ranges {
            if range.max < range.min {
                return Err(self.validation_error(format!(
                    "price range is inverted: min {} > max {}",
                    range.min, range.max
                )));
            }
        }
        validate_required_string(&self.login.email, "login.email", self.domain_name())?;
        validate_required_string(&self.login.password, "login.password", self.domain_name())?;
        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "data"
    }
}

// Default value functions
fn default_product_ids() -> Vec<u32> {
    vec![1, 2, 3, 4, 5, 10, 15, 20, 25, 30]
}

fn default_category_ids() -> Vec<u32> {
    vec![1, 2, 3, 4, 5]
}

fn default_user_ids() -> Vec<u32> {
    (1..=10).collect()
}

fn default_price_ranges() -> Vec<PriceRange> {
    vec![
        PriceRange { min: 0, max: 50 },
        PriceRange { min: 50, max: 100 },
        PriceRange { min: 100, max: 500 },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_defaults_are_valid() {
        let config = TestDataConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.product_sample_ids.len(), 10);
        assert_eq!(config.user_sample_ids, (1..=10).collect::<Vec<_>>());
        assert_eq!(config.login.email, "john@mail.com");
    }

    #[test]
    fn test_data_validation_rejects_empty_pools() {
        let mut config = TestDataConfig::default();
        config.product_sample_ids.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_data_validation_rejects_inverted_price_range() {
        let mut config = TestDataConfig::default();
        config.price_ranges[0] = PriceRange { min: 100, max: 50 };
        assert!(config.validate().is_err());
    }
}
