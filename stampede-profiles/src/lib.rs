//! The five built-in load profiles
//!
//! Each profile module assembles a [`ProfileDefinition`]: a validated
//! scenario catalog, the ramp plan, pass/fail thresholds and pacing.
//! [`ProfileKind`] is the non-generic handle the command line dispatches
//! on; the definitions themselves stay generic over their scenario keys.

pub mod definition;
mod support;

pub mod endurance;
pub mod load;
pub mod spike;
pub mod stress;
pub mod volume;

pub use definition::ProfileDefinition;
pub use endurance::EnduranceScenario;
pub use load::LoadScenario;
pub use spike::SpikeScenario;
pub use stress::StressScenario;
pub use volume::VolumeScenario;

use std::fmt;
use std::str::FromStr;

use stampede_core::{CoreResult, ScenarioKey};

/// Which built-in profile to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileKind {
    Load,
    Stress,
    Spike,
    Volume,
    Endurance,
}

/// Parse failure for [`ProfileKind`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unknown profile '{0}'. Available profiles are: load, stress, spike, volume, endurance")]
pub struct UnknownProfile(String);

impl ProfileKind {
    pub fn all() -> &'static [ProfileKind] {
        &[
            ProfileKind::Load,
            ProfileKind::Stress,
            ProfileKind::Spike,
            ProfileKind::Volume,
            ProfileKind::Endurance,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            ProfileKind::Load => "load",
            ProfileKind::Stress => "stress",
            ProfileKind::Spike => "spike",
            ProfileKind::Volume => "volume",
            ProfileKind::Endurance => "endurance",
        }
    }

    /// Build the listing card for this profile.
    pub fn card(&self) -> CoreResult<ProfileCard> {
        Ok(match self {
            ProfileKind::Load => ProfileCard::describe(&load::definition()?),
            ProfileKind::Stress => ProfileCard::describe(&stress::definition()?),
            ProfileKind::Spike => ProfileCard::describe(&spike::definition()?),
            ProfileKind::Volume => ProfileCard::describe(&volume::definition()?),
            ProfileKind::Endurance => ProfileCard::describe(&endurance::definition()?),
        })
    }
}

impl fmt::Display for ProfileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ProfileKind {
    type Err = UnknownProfile;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "load" => Ok(ProfileKind::Load),
            "stress" => Ok(ProfileKind::Stress),
            "spike" => Ok(ProfileKind::Spike),
            "volume" => Ok(ProfileKind::Volume),
            "endurance" => Ok(ProfileKind::Endurance),
            other => Err(UnknownProfile(other.to_string())),
        }
    }
}

/// Non-generic summary of one profile, for listings.
#[derive(Debug, Clone)]
pub struct ProfileCard {
    pub name: &'static str,
    pub description: &'static str,
    pub scenarios: usize,
    pub total_minutes: f64,
    pub peak_vus: u32,
    pub vu_progression: String,
}

impl ProfileCard {
    fn describe<K: ScenarioKey>(definition: &ProfileDefinition<K>) -> Self {
        Self {
            name: definition.name,
            description: definition.description,
            scenarios: definition.catalog.len(),
            total_minutes: definition.total_minutes(),
            peak_vus: definition.peak_vus(),
            vu_progression: definition.vu_progression(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_kind_round_trips_through_its_name() {
        for kind in ProfileKind::all() {
            assert_eq!(kind.name().parse::<ProfileKind>().unwrap(), *kind);
        }
        assert_eq!("SPIKE".parse::<ProfileKind>().unwrap(), ProfileKind::Spike);
        assert!("soak".parse::<ProfileKind>().is_err());
    }

    #[test]
    fn test_every_profile_builds_a_card() {
        for kind in ProfileKind::all() {
            let card = kind.card().unwrap();
            assert_eq!(card.name, kind.name());
            assert!(card.scenarios >= 6, "{} has {} scenarios", card.name, card.scenarios);
            assert!(card.total_minutes > 0.0);
            assert!(card.peak_vus > 0);
        }
    }
}
