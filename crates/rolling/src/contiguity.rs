//! Exact-cadence contiguity tracking for rolling windows.

use chrono::Duration;
use std::collections::VecDeque;
use tsflow_core::{is_exact_step, Timestamp};

/// Tracks whether the rolling window ending at each row is temporally
/// contiguous: every adjacent pair inside the window spaced by exactly the
/// configured step.
///
/// A window of size `w` needs `w - 1` exact gaps. The first row of a group
/// has no predecessor, so its gap indicator is false; a null timestamp makes
/// both of its adjacent indicators false.
pub struct ContiguityTracker {
    /// Number of gap indicators a full window requires.
    needed: usize,
    /// Required spacing between consecutive rows.
    step: Duration,
    /// Timestamp of the previous row, once one has been seen.
    prev: Option<Option<Timestamp>>,
    /// Latest gap indicators, newest at the back.
    gaps: VecDeque<bool>,
    /// Count of `true` indicators currently held.
    exact: usize,
}

impl ContiguityTracker {
    /// Create a tracker for a window of `window` rows at the given step.
    pub fn new(window: usize, step: Duration) -> Self {
        let needed = window.saturating_sub(1);
        Self {
            needed,
            step,
            prev: None,
            gaps: VecDeque::with_capacity(needed),
            exact: 0,
        }
    }

    /// Record the next row's timestamp and return whether the window ending
    /// at this row is contiguous.
    pub fn push(&mut self, snap_time: Option<Timestamp>) -> bool {
        let exact_gap = match (self.prev, snap_time) {
            (Some(Some(prev)), Some(cur)) => is_exact_step(prev, cur, self.step),
            _ => false,
        };
        self.prev = Some(snap_time);

        if self.needed == 0 {
            return true;
        }

        if self.gaps.len() == self.needed {
            if let Some(old) = self.gaps.pop_front() {
                if old {
                    self.exact -= 1;
                }
            }
        }
        self.gaps.push_back(exact_gap);
        if exact_gap {
            self.exact += 1;
        }

        self.gaps.len() == self.needed && self.exact == self.needed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tsflow_core::ts_serde;

    fn hourly(n: usize) -> Vec<Option<Timestamp>> {
        let start = ts_serde::parse("2021-11-20 00:00:00").unwrap();
        (0..n)
            .map(|i| Some(start + Duration::hours(i as i64)))
            .collect()
    }

    #[test]
    fn test_contiguous_sequence() {
        let mut tracker = ContiguityTracker::new(20, Duration::hours(1));
        let times = hourly(25);

        for (i, t) in times.into_iter().enumerate() {
            let contiguous = tracker.push(t);
            // The window first fills at the 20th row (index 19).
            assert_eq!(contiguous, i >= 19, "row {i}");
        }
    }

    #[test]
    fn test_broken_spacing() {
        let mut tracker = ContiguityTracker::new(3, Duration::hours(1));
        let start = ts_serde::parse("2021-11-20 00:00:00").unwrap();

        assert!(!tracker.push(Some(start)));
        assert!(!tracker.push(Some(start + Duration::hours(1))));
        // 90 minutes instead of 60: window ending here is not contiguous.
        assert!(!tracker.push(Some(start + Duration::minutes(150))));
        // Two fresh exact steps restore contiguity.
        assert!(!tracker.push(Some(start + Duration::minutes(210))));
        assert!(tracker.push(Some(start + Duration::minutes(270))));
    }

    #[test]
    fn test_null_time_breaks_both_sides() {
        let mut tracker = ContiguityTracker::new(2, Duration::hours(1));
        let start = ts_serde::parse("2021-11-20 00:00:00").unwrap();

        tracker.push(Some(start));
        assert!(tracker.push(Some(start + Duration::hours(1))));
        // Null row: not contiguous itself...
        assert!(!tracker.push(None));
        // ...and the following row has no usable predecessor either.
        assert!(!tracker.push(Some(start + Duration::hours(3))));
        assert!(tracker.push(Some(start + Duration::hours(4))));
    }
}
