//! Engine error types

use thiserror::Error;

/// Errors raised while assembling or validating a scenario catalog.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("scenario '{name}' is declared twice")]
    DuplicateScenario { name: &'static str },

    #[error("behavior for scenario '{name}' is registered twice")]
    DuplicateBehavior { name: &'static str },

    #[error("scenario '{name}' has no registered behavior")]
    MissingBehavior { name: &'static str },

    #[error("behavior registered for undeclared scenario '{name}'")]
    UndeclaredScenario { name: &'static str },

    #[error("catalog has no enabled scenarios")]
    EmptyCatalog,
}

pub type CoreResult<T> = Result<T, CoreError>;
