//! Bounded-window incremental statistics.

use std::collections::VecDeque;

/// Rolling mean/standard-deviation tracker over a fixed-capacity window.
///
/// Pushing past capacity evicts the oldest value, so memory stays bounded
/// no matter how long the stream runs.
#[derive(Debug, Clone)]
pub struct RollingStats {
    window: VecDeque<f64>,
    capacity: usize,
}

impl RollingStats {
    /// Create a tracker holding at most `capacity` values.
    pub fn new(capacity: usize) -> Self {
        Self {
            window: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a value, evicting the oldest if the window is full.
    pub fn push(&mut self, value: f64) {
        if self.window.len() == self.capacity {
            self.window.pop_front();
        }
        self.window.push_back(value);
    }

    /// Mean of the buffered values, 0.0 when empty.
    pub fn mean(&self) -> f64 {
        if self.window.is_empty() {
            return 0.0;
        }
        self.window.iter().sum::<f64>() / self.window.len() as f64
    }

    /// Standard deviation of the buffered values.
    ///
    /// `ddof` = 0 gives population semantics, 1 gives sample semantics.
    /// Fewer than 2 samples yields 0.0 ("not yet confident").
    pub fn std(&self, ddof: usize) -> f64 {
        let n = self.window.len();
        if n < 2 || n <= ddof {
            return 0.0;
        }
        let mean = self.mean();
        let sum_sq: f64 = self.window.iter().map(|x| (x - mean).powi(2)).sum();
        (sum_sq / (n - ddof) as f64).sqrt()
    }

    /// Number of values currently buffered.
    pub fn len(&self) -> usize {
        self.window.len()
    }

    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    /// Configured capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Buffered values in insertion (temporal) order.
    pub fn iter(&self) -> impl Iterator<Item = &f64> {
        self.window.iter()
    }

    /// Discard all buffered values.
    pub fn clear(&mut self) {
        self.window.clear();
    }
}
