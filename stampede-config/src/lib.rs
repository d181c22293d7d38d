//! Domain-driven configuration for the stampede load-testing suite
//!
//! This crate provides modular configuration split by functional domains,
//! with validation, defaults, and environment variable support. It also owns
//! the workload vocabulary shared by every profile: ramp [`Stage`] tables
//! with tolerant duration parsing, [`ThinkTime`] pacing and [`Threshold`]
//! pass/fail rules.

pub mod error;
pub mod loader;
pub mod validation;

// Domain-specific configuration modules
pub mod domains;

// Re-export main types
pub use error::{ConfigError, ConfigResult};
pub use loader::ConfigLoader;

// Re-export domain configurations
pub use domains::{
    data::{LoginConfig, PriceRange, TestDataConfig},
    logging::{LogFormat, LogLevel, LoggingConfig},
    target::TargetConfig,
    thresholds::Threshold,
    workload::{peak_minutes, stage_minutes, total_minutes, Stage, SurgeThinkTime, ThinkRange, ThinkTime},
    SuiteConfig,
};

// Re-export utilities
pub use domains::utils::serde_duration;
pub use validation::Validatable;
