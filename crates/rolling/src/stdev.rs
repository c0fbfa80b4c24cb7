//! Incremental rolling sample standard deviation.

use std::collections::VecDeque;

/// Rolling sample standard deviation over a fixed-size window.
///
/// Emits a value only when the window holds exactly `window` observations;
/// a null observation clears the window, so the next result needs `window`
/// fresh values.
pub struct RollingStdev {
    /// Window size in observations.
    window: usize,
    /// Recent observations.
    values: VecDeque<f64>,
    /// Running sum of observations.
    sum: f64,
    /// Running sum of squared observations.
    sum_sq: f64,
}

impl RollingStdev {
    /// Create a new calculator.
    pub fn new(window: usize) -> Self {
        Self {
            window,
            values: VecDeque::with_capacity(window),
            sum: 0.0,
            sum_sq: 0.0,
        }
    }

    /// Push the next observation and return the stdev of the current window.
    ///
    /// `None` observations reset the window.
    pub fn push(&mut self, value: Option<f64>) -> Option<f64> {
        match value {
            Some(v) => {
                self.add(v);
                self.stdev()
            }
            None => {
                self.clear();
                None
            }
        }
    }

    fn add(&mut self, value: f64) {
        // If window is full, remove oldest
        if self.values.len() >= self.window {
            if let Some(old) = self.values.pop_front() {
                self.sum -= old;
                self.sum_sq -= old * old;
            }
        }

        self.values.push_back(value);
        self.sum += value;
        self.sum_sq += value * value;
    }

    /// Sample standard deviation (n-1 denominator) of the current window,
    /// or `None` while the window is not full.
    pub fn stdev(&self) -> Option<f64> {
        let n = self.values.len();
        if n < self.window || n < 2 {
            return None;
        }

        let n_f = n as f64;
        let variance = (self.sum_sq - self.sum * self.sum / n_f) / (n_f - 1.0);

        // Guard against small negative values from float cancellation
        if variance <= 0.0 {
            Some(0.0)
        } else {
            Some(variance.sqrt())
        }
    }

    /// Check if the window is full.
    pub fn is_full(&self) -> bool {
        self.values.len() >= self.window
    }

    /// Get the number of observations currently held.
    pub fn count(&self) -> usize {
        self.values.len()
    }

    /// Clear all data.
    pub fn clear(&mut self) {
        self.values.clear();
        self.sum = 0.0;
        self.sum_sq = 0.0;
    }
}
