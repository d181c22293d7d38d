//! Phase-scoped weight shifting
//!
//! A profile can declare one high-load window. While the run clock is
//! inside it, scenarios with a positive base weight are muted and the
//! window's weight budget is split evenly across the zero-base surge
//! scenarios. Outside the window every weight is left untouched.

/// One high-load window over the run timeline.
///
/// Minutes are measured from run start; the window is half-open, so a
/// run clock equal to `end_minute` is already outside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseWindow {
    /// First minute inside the window
    pub start_minute: u64,
    /// First minute after the window
    pub end_minute: u64,
    /// Total weight granted to surge scenarios while inside
    pub surge_budget: u32,
    /// Number of surge scenarios sharing the budget
    pub surge_count: u32,
}

impl PhaseWindow {
    pub fn new(start_minute: u64, end_minute: u64, surge_budget: u32, surge_count: u32) -> Self {
        Self {
            start_minute,
            end_minute,
            surge_budget,
            surge_count,
        }
    }

    pub fn contains(&self, elapsed_minutes: u64) -> bool {
        (self.start_minute..self.end_minute).contains(&elapsed_minutes)
    }

    /// Weight adjustment for a scenario with the given declared base
    /// weight at the given elapsed time.
    ///
    /// Inside the window, a positive base weight is cancelled outright
    /// and a zero base weight earns an even share of the budget,
    /// truncated; leftover budget from the truncation is simply not
    /// handed out. A window with no surge scenarios adjusts nothing.
    pub fn delta(&self, base_weight: u32, elapsed_minutes: u64) -> i64 {
        if !self.contains(elapsed_minutes) {
            return 0;
        }
        if base_weight > 0 {
            -(base_weight as i64)
        } else if self.surge_count == 0 {
            0
        } else {
            (self.surge_budget / self.surge_count) as i64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_is_half_open() {
        let window = PhaseWindow::new(1, 5, 70, 1);
        assert!(!window.contains(0));
        assert!(window.contains(1));
        assert!(window.contains(4));
        assert!(!window.contains(5));
    }

    #[test]
    fn test_deltas_across_the_window() {
        let window = PhaseWindow::new(1, 5, 70, 1);

        // before the window nothing shifts
        assert_eq!(window.delta(30, 0), 0);
        assert_eq!(window.delta(0, 0), 0);

        // inside, baseline weight is cancelled and the surge scenario
        // receives the whole budget
        assert_eq!(window.delta(30, 3), -30);
        assert_eq!(window.delta(0, 3), 70);

        // at the end minute the window no longer applies
        assert_eq!(window.delta(30, 5), 0);
        assert_eq!(window.delta(0, 5), 0);
    }

    #[test]
    fn test_budget_split_truncates() {
        let window = PhaseWindow::new(0, 10, 70, 3);
        assert_eq!(window.delta(0, 2), 23);

        let window = PhaseWindow::new(0, 10, 69, 3);
        assert_eq!(window.delta(0, 2), 23);
    }

    #[test]
    fn test_empty_surge_set_shifts_nothing() {
        let window = PhaseWindow::new(0, 10, 70, 0);
        assert_eq!(window.delta(0, 2), 0);
        assert_eq!(window.delta(30, 2), -30);
    }
}
