//! Inclusive time-window filtering.

use tsflow_core::{ts_serde, Error, Result, Timestamp};

/// Inclusive [start, end] window; either bound may be absent.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeWindow {
    start: Option<Timestamp>,
    end: Option<Timestamp>,
}

impl TimeWindow {
    /// Create a window from optional bounds.
    pub fn new(start: Option<Timestamp>, end: Option<Timestamp>) -> Self {
        Self { start, end }
    }

    /// Parse optional bound strings. A present-but-unparseable bound is a
    /// configuration error (the run fails up front), unlike data timestamps
    /// which coerce to null.
    pub fn parse(start: Option<&str>, end: Option<&str>) -> Result<Self> {
        let parse_bound = |raw: Option<&str>, which: &str| -> Result<Option<Timestamp>> {
            match raw {
                None => Ok(None),
                Some(s) => ts_serde::parse(s)
                    .map(Some)
                    .ok_or_else(|| Error::config(format!("invalid {which} bound: {s:?}"))),
            }
        };
        Ok(Self {
            start: parse_bound(start, "start")?,
            end: parse_bound(end, "end")?,
        })
    }

    /// Whether neither bound is set.
    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Whether a row at `ts` satisfies both present bounds (inclusive).
    ///
    /// A null timestamp fails any present bound and passes only an
    /// unbounded window.
    pub fn contains(&self, ts: Option<Timestamp>) -> bool {
        match ts {
            Some(t) => {
                self.start.map_or(true, |s| t >= s) && self.end.map_or(true, |e| t <= e)
            }
            None => self.is_unbounded(),
        }
    }

    /// Retain rows whose timestamp satisfies the window, preserving order.
    pub fn filter<T>(&self, rows: Vec<T>, time_of: impl Fn(&T) -> Option<Timestamp>) -> Vec<T> {
        if self.is_unbounded() {
            return rows;
        }
        rows.into_iter()
            .filter(|row| self.contains(time_of(row)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(raw: &str) -> Option<Timestamp> {
        ts_serde::parse(raw)
    }

    #[test]
    fn test_bounds_inclusive() {
        let window = TimeWindow::parse(
            Some("2021-11-20 00:00:00"),
            Some("2021-11-23 09:00:00"),
        )
        .unwrap();

        assert!(window.contains(ts("2021-11-20 00:00:00")));
        assert!(window.contains(ts("2021-11-23 09:00:00")));
        assert!(window.contains(ts("2021-11-21 12:00:00")));
        assert!(!window.contains(ts("2021-11-19 23:59:59")));
        assert!(!window.contains(ts("2021-11-23 09:00:01")));
    }

    #[test]
    fn test_half_open_sides() {
        let from = TimeWindow::parse(Some("2021-11-20 00:00:00"), None).unwrap();
        assert!(from.contains(ts("2099-01-01 00:00:00")));
        assert!(!from.contains(ts("2021-11-19 00:00:00")));

        let until = TimeWindow::parse(None, Some("2021-11-20 00:00:00")).unwrap();
        assert!(until.contains(ts("1999-01-01 00:00:00")));
        assert!(!until.contains(ts("2021-11-20 00:00:01")));
    }

    #[test]
    fn test_null_timestamp_fails_present_bounds() {
        let window = TimeWindow::parse(Some("2021-11-20 00:00:00"), None).unwrap();
        assert!(!window.contains(None));

        let unbounded = TimeWindow::default();
        assert!(unbounded.contains(None));
    }

    #[test]
    fn test_invalid_bound_is_config_error() {
        let result = TimeWindow::parse(Some("not-a-date"), None);
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_filter_preserves_order() {
        let window = TimeWindow::parse(
            Some("2021-11-20 01:00:00"),
            Some("2021-11-20 03:00:00"),
        )
        .unwrap();
        let rows = vec![
            ts("2021-11-20 00:00:00"),
            ts("2021-11-20 02:00:00"),
            ts("2021-11-20 01:00:00"),
            ts("2021-11-20 04:00:00"),
        ];

        let kept = window.filter(rows, |r| *r);
        assert_eq!(
            kept,
            vec![ts("2021-11-20 02:00:00"), ts("2021-11-20 01:00:00")]
        );
    }
}
