//! Workload shape configuration: ramp stages and think-time pacing
//!
//! Stage durations use the compact `"30s"` / `"2m"` / `"1h"` form familiar
//! from load-testing stage tables. Parsing is tolerant: a stage whose
//! duration cannot be understood is logged and counted as zero minutes so a
//! single typo does not abort a long run.

use crate::error::{ConfigError, ConfigResult};
use crate::validation::Validatable;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// One step of a ramp plan: hold or move toward `target` virtual users over
/// `duration`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stage {
    /// Duration with unit suffix, e.g. "30s", "2m", "1h"
    pub duration: String,

    /// Virtual users to reach by the end of this stage
    pub target: u32,
}

impl Stage {
    pub fn new(duration: impl Into<String>, target: u32) -> Self {
        Self {
            duration: duration.into(),
            target,
        }
    }

    /// Parsed length of this stage in minutes, if the duration is valid.
    pub fn minutes(&self) -> Option<f64> {
        stage_minutes(&self.duration)
    }
}

/// Parse a stage duration into fractional minutes.
///
/// Accepts a numeric prefix followed by a single unit letter: `s` (seconds),
/// `m` (minutes) or `h` (hours), case-insensitive. Returns `None` for
/// anything else, after logging a warning.
pub fn stage_minutes(duration: &str) -> Option<f64> {
    let trimmed = duration.trim();
    let Some((unit_idx, unit)) = trimmed.char_indices().next_back() else {
        warn!(duration = %duration, "skipping stage with empty duration");
        return None;
    };

    let value: f64 = match trimmed[..unit_idx].parse() {
        Ok(v) => v,
        Err(_) => {
            warn!(duration = %duration, "skipping stage with non-numeric duration");
            return None;
        }
    };

    match unit.to_ascii_lowercase() {
        's' => Some(value / 60.0),
        'm' => Some(value),
        'h' => Some(value * 60.0),
        other => {
            warn!(duration = %duration, unit = %other, "skipping stage with unsupported duration unit");
            None
        }
    }
}

/// Total planned run length in minutes across all stages.
///
/// Unparseable stages contribute zero, matching [`stage_minutes`] tolerance.
pub fn total_minutes(stages: &[Stage]) -> f64 {
    stages.iter().map(|s| s.minutes().unwrap_or(0.0)).sum()
}

/// Longest single stage in minutes.
///
/// Used to size phase windows against the slowest ramp. An empty stage table
/// is a configuration error: a profile without stages cannot run at all.
pub fn peak_minutes(stages: &[Stage]) -> ConfigResult<f64> {
    if stages.is_empty() {
        return Err(ConfigError::ValidationError(
            "cannot compute peak stage length of an empty stage table".to_string(),
        ));
    }

    Ok(stages
        .iter()
        .map(|s| s.minutes().unwrap_or(0.0))
        .fold(0.0, f64::max))
}

/// Inclusive min/max bounds for a randomized pause, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThinkRange {
    pub min_secs: f64,
    pub max_secs: f64,
}

impl ThinkRange {
    pub fn new(min_secs: f64, max_secs: f64) -> Self {
        Self { min_secs, max_secs }
    }
}

/// Pause taken between iterations, with an optional tighter range during a
/// surge window (spike traffic thinks faster than a browsing user).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThinkTime {
    /// Range used outside any surge window
    pub baseline: ThinkRange,

    /// Range used while elapsed minutes fall inside the surge window
    #[serde(skip_serializing_if = "Option::is_none")]
    pub surge: Option<SurgeThinkTime>,
}

/// Surge-window override for [`ThinkTime`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurgeThinkTime {
    pub range: ThinkRange,

    /// First minute (inclusive) the surge range applies
    pub from_minute: u64,

    /// First minute (exclusive) after which the baseline range resumes
    pub until_minute: u64,
}

impl ThinkTime {
    /// Think time with a single range for the whole run.
    pub fn fixed(min_secs: f64, max_secs: f64) -> Self {
        Self {
            baseline: ThinkRange::new(min_secs, max_secs),
            surge: None,
        }
    }

    /// Attach a surge range active in `[from_minute, until_minute)`.
    pub fn with_surge(mut self, min_secs: f64, max_secs: f64, from_minute: u64, until_minute: u64) -> Self {
        self.surge = Some(SurgeThinkTime {
            range: ThinkRange::new(min_secs, max_secs),
            from_minute,
            until_minute,
        });
        self
    }

    /// Range in effect at the given elapsed run time.
    pub fn range_at(&self, elapsed_minutes: u64) -> ThinkRange {
        match &self.surge {
            Some(s) if elapsed_minutes >= s.from_minute && elapsed_minutes < s.until_minute => s.range,
            _ => self.baseline,
        }
    }
}

impl Default for ThinkTime {
    fn default() -> Self {
        Self::fixed(1.0, 3.0)
    }
}

impl Validatable for ThinkTime {
    fn validate(&self) -> ConfigResult<()> {
        validate_range(&self.baseline, "baseline", self)?;
        if let Some(surge) = &self.surge {
            validate_range(&surge.range, "surge", self)?;
            if surge.until_minute <= surge.from_minute {
                return Err(self.validation_error(format!(
                    "surge window is empty: [{}, {})",
                    surge.from_minute, surge.until_minute
                )));
            }
        }
        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "think_time"
    }
}

fn validate_range(range: &ThinkRange, label: &str, owner: &ThinkTime) -> ConfigResult<()> {
    if range.min_secs < 0.0 {
        return Err(owner.validation_error(format!("{} min_secs cannot be negative", label)));
    }
    if range.max_secs < range.min_secs {
        return Err(owner.validation_error(format!(
            "{} range is inverted: min {} > max {}",
            label, range.min_secs, range.max_secs
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_minutes_units() {
        assert_eq!(stage_minutes("30s"), Some(0.5));
        assert_eq!(stage_minutes("2m"), Some(2.0));
        assert_eq!(stage_minutes("1h"), Some(60.0));
        assert_eq!(stage_minutes("90s"), Some(1.5));
        assert_eq!(stage_minutes("2.5m"), Some(2.5));
        assert_eq!(stage_minutes("10S"), Some(10.0 / 60.0));
    }

    #[test]
    fn test_stage_minutes_rejects_malformed() {
        assert_eq!(stage_minutes("2d"), None);
        assert_eq!(stage_minutes("fast"), None);
        assert_eq!(stage_minutes(""), None);
        assert_eq!(stage_minutes("m"), None);
        assert_eq!(stage_minutes("5"), None);
        assert_eq!(stage_minutes("1h30m"), None);
    }

    #[test]
    fn test_total_minutes_sums_mixed_units() {
        let stages = vec![Stage::new("2m", 10), Stage::new("30s", 10), Stage::new("1h", 0)];
        assert_eq!(total_minutes(&stages), 62.5);
    }

    #[test]
    fn test_total_minutes_skips_unknown_units() {
        let stages = vec![Stage::new("2m", 10), Stage::new("3x", 20)];
        assert_eq!(total_minutes(&stages), 2.0);
    }

    #[test]
    fn test_total_minutes_empty_is_zero() {
        assert_eq!(total_minutes(&[]), 0.0);
    }

    #[test]
    fn test_peak_minutes_takes_longest_stage() {
        let stages = vec![Stage::new("2m", 10), Stage::new("30s", 10), Stage::new("1h", 0)];
        assert_eq!(peak_minutes(&stages).unwrap(), 60.0);
    }

    #[test]
    fn test_peak_minutes_empty_table_is_an_error() {
        assert!(peak_minutes(&[]).is_err());
    }

    #[test]
    fn test_peak_minutes_all_unknown_units_is_zero() {
        let stages = vec![Stage::new("2d", 10), Stage::new("oops", 5)];
        assert_eq!(peak_minutes(&stages).unwrap(), 0.0);
    }

    #[test]
    fn test_think_time_without_surge_is_constant() {
        let think = ThinkTime::fixed(1.0, 3.0);
        assert_eq!(think.range_at(0), ThinkRange::new(1.0, 3.0));
        assert_eq!(think.range_at(120), ThinkRange::new(1.0, 3.0));
    }

    #[test]
    fn test_think_time_surge_window_is_half_open() {
        let think = ThinkTime::fixed(1.0, 3.0).with_surge(0.1, 0.4, 1, 5);
        assert_eq!(think.range_at(0), ThinkRange::new(1.0, 3.0));
        assert_eq!(think.range_at(1), ThinkRange::new(0.1, 0.4));
        assert_eq!(think.range_at(4), ThinkRange::new(0.1, 0.4));
        assert_eq!(think.range_at(5), ThinkRange::new(1.0, 3.0));
    }

    #[test]
    fn test_think_time_validation() {
        assert!(ThinkTime::fixed(1.0, 3.0).validate().is_ok());
        assert!(ThinkTime::fixed(3.0, 1.0).validate().is_err());
        assert!(ThinkTime::fixed(-1.0, 3.0).validate().is_err());
        assert!(ThinkTime::fixed(1.0, 3.0).with_surge(0.1, 0.4, 5, 5).validate().is_err());
    }
}
