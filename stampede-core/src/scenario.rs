//! Scenario identity, weighting and behavior signatures

use std::fmt;
use std::hash::Hash;

use futures::future::BoxFuture;
use rand::rngs::StdRng;
use stampede_api::{ApiResult, FakeStoreApi};

/// Identity of one scenario within a profile.
///
/// Profiles declare their scenarios as a small enum implementing this
/// trait; the catalog builder checks at startup that every declared key
/// has a behavior and every behavior a declared key, so a misspelled
/// registration fails before any traffic is generated.
pub trait ScenarioKey: Copy + Eq + Hash + fmt::Debug + Send + Sync + 'static {
    /// Stable name used in logs and run summaries.
    fn name(&self) -> &'static str;

    /// Every key of the profile, in declaration order.
    fn all() -> &'static [Self];
}

/// Weight of a scenario as a function of elapsed run minutes, replacing
/// the static base weight while active.
pub type DynamicWeight = fn(u64) -> u32;

/// One iteration's worth of scenario traffic.
///
/// Behaviors borrow the virtual user's store session and RNG for the
/// duration of the iteration; a plain `fn` keeps registration free of
/// boxing at the call sites.
pub type BehaviorFn =
    for<'a> fn(&'a mut FakeStoreApi, &'a mut StdRng, IterationInfo) -> BoxFuture<'a, ApiResult<()>>;

/// Declared weighting of one scenario.
#[derive(Debug, Clone, Copy)]
pub struct ScenarioSpec<K: ScenarioKey> {
    pub key: K,
    pub base_weight: u32,
    pub enabled: bool,
    /// One-line note on what the behavior simulates. Documentation only,
    /// never consulted during selection.
    pub description: &'static str,
    pub dynamic_weight: Option<DynamicWeight>,
}

impl<K: ScenarioKey> ScenarioSpec<K> {
    pub fn new(key: K, base_weight: u32) -> Self {
        Self {
            key,
            base_weight,
            enabled: true,
            description: "",
            dynamic_weight: None,
        }
    }

    pub fn with_description(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    /// Keep the declaration but exclude it from selection.
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Let `weight_at` supply the weight instead of `base_weight`.
    pub fn with_dynamic_weight(mut self, weight_at: DynamicWeight) -> Self {
        self.dynamic_weight = Some(weight_at);
        self
    }

    /// Weight before any phase adjustment, at the given elapsed time.
    pub fn weight_at(&self, elapsed_minutes: u64) -> u32 {
        match self.dynamic_weight {
            Some(weight_at) => weight_at(elapsed_minutes),
            None => self.base_weight,
        }
    }
}

/// Context handed to a behavior for one iteration.
#[derive(Debug, Clone, Copy)]
pub struct IterationInfo {
    pub vu_id: u32,
    pub iteration: u64,
    pub elapsed_minutes: u64,
}

impl IterationInfo {
    pub fn new(vu_id: u32, iteration: u64, elapsed_minutes: u64) -> Self {
        Self {
            vu_id,
            iteration,
            elapsed_minutes,
        }
    }

    /// True on every `n`-th iteration, counting from zero.
    pub fn every(&self, n: u64) -> bool {
        n != 0 && self.iteration % n == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Key {
        Browse,
    }

    impl ScenarioKey for Key {
        fn name(&self) -> &'static str {
            "browse"
        }

        fn all() -> &'static [Self] {
            &[Key::Browse]
        }
    }

    #[test]
    fn test_dynamic_weight_replaces_base() {
        let fixed = ScenarioSpec::new(Key::Browse, 30);
        assert_eq!(fixed.weight_at(0), 30);
        assert_eq!(fixed.weight_at(100), 30);

        let ramped = ScenarioSpec::new(Key::Browse, 0)
            .with_dynamic_weight(|minutes| if minutes >= 10 { 10 } else { 0 });
        assert_eq!(ramped.weight_at(9), 0);
        assert_eq!(ramped.weight_at(10), 10);
    }

    #[test]
    fn test_every_counts_from_zero() {
        let info = IterationInfo::new(1, 0, 0);
        assert!(info.every(20));

        let info = IterationInfo::new(1, 19, 0);
        assert!(!info.every(20));

        let info = IterationInfo::new(1, 40, 0);
        assert!(info.every(20));
        assert!(!info.every(0));
    }
}
