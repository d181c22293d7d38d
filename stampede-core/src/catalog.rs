//! Validated scenario catalog and weighted selection

use std::collections::HashSet;

use rand::Rng;
use tracing::debug;

use crate::error::{CoreError, CoreResult};
use crate::phase::PhaseWindow;
use crate::scenario::{BehaviorFn, ScenarioKey, ScenarioSpec};

/// A scenario bound to its behavior.
pub struct CatalogEntry<K: ScenarioKey> {
    pub spec: ScenarioSpec<K>,
    pub behavior: BehaviorFn,
}

impl<K: ScenarioKey> CatalogEntry<K> {
    /// Selection weight at the given elapsed time, after the optional
    /// phase adjustment. Never negative; a deficit clamps to zero so one
    /// scenario can never push the cumulative walk off the rails.
    pub fn effective_weight(&self, phase: Option<&PhaseWindow>, elapsed_minutes: u64) -> u32 {
        let weight = self.spec.weight_at(elapsed_minutes) as i64;
        let delta = phase
            .map(|window| window.delta(self.spec.base_weight, elapsed_minutes))
            .unwrap_or(0);
        (weight + delta).max(0) as u32
    }
}

impl<K: ScenarioKey> std::fmt::Debug for CatalogEntry<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogEntry")
            .field("key", &self.spec.key)
            .field("base_weight", &self.spec.base_weight)
            .finish()
    }
}

/// The enabled scenarios of one profile, in declaration order, each with
/// a behavior. Built through [`CatalogBuilder`], which rejects mismatched
/// declarations instead of skipping them silently at pick time.
#[derive(Debug)]
pub struct ScenarioCatalog<K: ScenarioKey> {
    entries: Vec<CatalogEntry<K>>,
}

impl<K: ScenarioKey> ScenarioCatalog<K> {
    pub fn builder() -> CatalogBuilder<K> {
        CatalogBuilder::new()
    }

    pub fn entries(&self) -> &[CatalogEntry<K>] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Draw one scenario according to the effective weights at the given
    /// elapsed time. When every weight is zero the first declared
    /// scenario is returned, deterministically.
    pub fn select<R: Rng>(
        &self,
        elapsed_minutes: u64,
        phase: Option<&PhaseWindow>,
        rng: &mut R,
    ) -> &CatalogEntry<K> {
        let weights: Vec<u64> = self
            .entries
            .iter()
            .map(|entry| entry.effective_weight(phase, elapsed_minutes) as u64)
            .collect();

        &self.entries[pick_index(&weights, rng)]
    }
}

/// Cumulative-sum draw over the given weights.
///
/// Draws uniformly from `[0, total)` and returns the first index whose
/// running sum exceeds the draw. An all-zero table returns index 0.
fn pick_index<R: Rng>(weights: &[u64], rng: &mut R) -> usize {
    let total: u64 = weights.iter().sum();
    if total == 0 {
        return 0;
    }

    let draw = rng.random_range(0..total);
    let mut cumulative = 0u64;
    for (index, weight) in weights.iter().enumerate() {
        cumulative += weight;
        if draw < cumulative {
            return index;
        }
    }
    weights.len() - 1
}

/// Two-sided registration of scenario declarations and behaviors.
pub struct CatalogBuilder<K: ScenarioKey> {
    specs: Vec<ScenarioSpec<K>>,
    behaviors: Vec<(K, BehaviorFn)>,
}

impl<K: ScenarioKey> Default for CatalogBuilder<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: ScenarioKey> CatalogBuilder<K> {
    pub fn new() -> Self {
        Self {
            specs: Vec::new(),
            behaviors: Vec::new(),
        }
    }

    /// Declare a scenario and its weighting.
    pub fn scenario(mut self, spec: ScenarioSpec<K>) -> Self {
        self.specs.push(spec);
        self
    }

    /// Register the behavior driven when `key` is selected.
    pub fn behavior(mut self, key: K, behavior: BehaviorFn) -> Self {
        self.behaviors.push((key, behavior));
        self
    }

    /// Check both registries against each other and assemble the catalog.
    ///
    /// Disabled scenarios are dropped here; their behaviors may stay
    /// registered. At least one enabled scenario must survive.
    pub fn build(self) -> CoreResult<ScenarioCatalog<K>> {
        let mut declared = HashSet::new();
        for spec in &self.specs {
            if !declared.insert(spec.key) {
                return Err(CoreError::DuplicateScenario {
                    name: spec.key.name(),
                });
            }
        }

        let mut bound = HashSet::new();
        for (key, _) in &self.behaviors {
            if !bound.insert(*key) {
                return Err(CoreError::DuplicateBehavior { name: key.name() });
            }
            if !declared.contains(key) {
                return Err(CoreError::UndeclaredScenario { name: key.name() });
            }
        }

        let mut entries = Vec::new();
        for spec in self.specs {
            if !spec.enabled {
                debug!(scenario = spec.key.name(), "scenario disabled, dropped from catalog");
                continue;
            }
            let behavior = self
                .behaviors
                .iter()
                .find(|(key, _)| *key == spec.key)
                .map(|(_, behavior)| *behavior)
                .ok_or(CoreError::MissingBehavior {
                    name: spec.key.name(),
                })?;
            entries.push(CatalogEntry { spec, behavior });
        }

        if entries.is_empty() {
            return Err(CoreError::EmptyCatalog);
        }

        debug!(scenarios = entries.len(), "scenario catalog validated");
        Ok(ScenarioCatalog { entries })
    }
}
