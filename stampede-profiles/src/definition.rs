//! Everything the runner needs to execute one profile

use std::sync::Arc;

use stampede_config::{peak_minutes, total_minutes, ConfigResult, Stage, ThinkTime, Threshold};
use stampede_core::{PhaseWindow, ScenarioCatalog, ScenarioKey};

/// A fully assembled profile: the validated scenario catalog plus the
/// ramp plan, pass/fail rules and pacing the runner schedules it with.
pub struct ProfileDefinition<K: ScenarioKey> {
    pub name: &'static str,
    /// One-line description shown by the profile listing.
    pub description: &'static str,
    /// Headline printed when the run starts.
    pub banner: &'static str,
    /// Focus line printed under the banner.
    pub focus: &'static str,
    /// Headline printed when the run finishes.
    pub completion: &'static str,
    /// Pointers printed after the run for reading the results.
    pub notes: &'static [&'static str],
    pub catalog: Arc<ScenarioCatalog<K>>,
    pub stages: Vec<Stage>,
    pub thresholds: Vec<Threshold>,
    pub pacing: ThinkTime,
    /// High-load window shifting scenario weights, when the profile has one.
    pub surge: Option<PhaseWindow>,
    /// Progress log cadence, in iterations per virtual user.
    pub iteration_interval: u64,
}

impl<K: ScenarioKey> ProfileDefinition<K> {
    /// Planned wall-clock length of the ramp plan, in minutes.
    pub fn total_minutes(&self) -> f64 {
        total_minutes(&self.stages)
    }

    /// Length of the longest stage, in minutes.
    pub fn peak_minutes(&self) -> ConfigResult<f64> {
        peak_minutes(&self.stages)
    }

    /// Highest virtual-user target across the ramp plan.
    pub fn peak_vus(&self) -> u32 {
        self.stages.iter().map(|stage| stage.target).max().unwrap_or(0)
    }

    /// The user-count progression, e.g. `2 → 50 → 50 → 2 → 2`.
    pub fn vu_progression(&self) -> String {
        self.stages
            .iter()
            .map(|stage| stage.target.to_string())
            .collect::<Vec<_>>()
            .join(" → ")
    }
}

impl<K: ScenarioKey> std::fmt::Debug for ProfileDefinition<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfileDefinition")
            .field("name", &self.name)
            .field("scenarios", &self.catalog.len())
            .field("stages", &self.stages.len())
            .field("peak_vus", &self.peak_vus())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ramp_plan_helpers() {
        let definition = crate::load::definition().unwrap();
        assert_eq!(definition.total_minutes(), 9.0);
        assert_eq!(definition.peak_minutes().unwrap(), 5.0);
        assert_eq!(definition.peak_vus(), 10);
        assert_eq!(definition.vu_progression(), "10 → 10 → 0");
    }
}
