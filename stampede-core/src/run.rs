//! Run identity

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

/// Unique id minted for every run, printed in banners and embedded in
/// exported summaries so results from repeated runs can be told apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunId(Uuid);

impl RunId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity and start time of one run.
#[derive(Debug, Clone, Serialize)]
pub struct RunContext {
    pub run_id: RunId,
    pub profile: String,
    pub started_at: DateTime<Utc>,
}

impl RunContext {
    pub fn new(profile: impl Into<String>) -> Self {
        Self {
            run_id: RunId::new(),
            profile: profile.into(),
            started_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_ids_are_unique() {
        assert_ne!(RunId::new(), RunId::new());
    }

    #[test]
    fn test_context_carries_profile_name() {
        let context = RunContext::new("spike");
        assert_eq!(context.profile, "spike");
        assert!(context.started_at <= Utc::now());
    }
}
