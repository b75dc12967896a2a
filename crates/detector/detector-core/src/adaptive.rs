//! Adaptive (EWMA-controlled) three-sigma detector.

use std::collections::VecDeque;

use detector_api::AdaptiveThreeSigmaConfig;
use detector_spi::{AdaptiveParams, Observation, StreamingDetector};

use crate::tuning;

/// Burn-in samples collected before the one-shot grid optimization fires.
const BURN_IN_SAMPLES: usize = 100;

/// Self-tuning z-score detector.
///
/// Statistics are exponentially smoothed: once the total observation count
/// reaches the warm-up threshold, every new value refreshes
/// `mean <- (1-alpha)*mean + alpha*batch_mean` (and likewise for std),
/// where the batch statistics are recomputed over the live buffer.
///
/// With `auto_optimize` enabled the first [`BURN_IN_SAMPLES`] values are
/// treated as anomaly-free traffic and replayed through a parameter grid
/// exactly once; the winning combination becomes the live parameter set.
#[derive(Debug, Clone)]
pub struct AdaptiveThreeSigmaDetector {
    sigma_multiplier: f64,
    window_size: usize,
    alpha: f64,
    warmup_samples: usize,
    auto_optimize: bool,

    mean: f64,
    std_dev: f64,
    count: usize,
    buffer: VecDeque<f64>,

    burn_in: Vec<f64>,
    optimized: bool,
}

impl AdaptiveThreeSigmaDetector {
    /// Create a detector from configuration.
    pub fn new(config: AdaptiveThreeSigmaConfig) -> Self {
        Self {
            sigma_multiplier: config.sigma_multiplier,
            window_size: config.window_size,
            alpha: config.alpha,
            warmup_samples: config.warmup_samples,
            auto_optimize: config.auto_optimize,
            mean: 0.0,
            std_dev: 1.0,
            count: 0,
            buffer: VecDeque::with_capacity(config.window_size),
            burn_in: Vec::new(),
            optimized: false,
        }
    }

    /// Whether the burn-in optimization has already run.
    pub fn is_optimized(&self) -> bool {
        self.optimized
    }

    /// Snapshot of the live parameter set.
    pub fn params(&self) -> AdaptiveParams {
        AdaptiveParams {
            sigma_multiplier: self.sigma_multiplier,
            window_size: self.window_size,
            alpha: self.alpha,
            warmup_samples: self.warmup_samples,
            optimized: self.optimized,
            current_mean: self.mean,
            current_std: self.std_dev,
        }
    }

    fn update_statistics(&mut self, value: f64) {
        self.buffer.push_back(value);
        if self.buffer.len() > self.window_size {
            self.buffer.pop_front();
        }

        if self.count >= self.warmup_samples {
            let n = self.buffer.len() as f64;
            let batch_mean = self.buffer.iter().sum::<f64>() / n;
            let batch_var =
                self.buffer.iter().map(|x| (x - batch_mean).powi(2)).sum::<f64>() / n;
            let batch_std = batch_var.sqrt();

            self.mean = (1.0 - self.alpha) * self.mean + self.alpha * batch_mean;
            self.std_dev = (1.0 - self.alpha) * self.std_dev + self.alpha * batch_std;
        }
        self.count += 1;
    }

    fn adopt(&mut self, choice: tuning::GridChoice) {
        let old_window_size = self.window_size;
        self.sigma_multiplier = choice.sigma_multiplier;
        self.window_size = choice.window_size;
        self.alpha = choice.alpha;
        self.optimized = true;

        // Keep only the most recent entries when the window shrinks
        if self.window_size != old_window_size {
            while self.buffer.len() > self.window_size {
                self.buffer.pop_front();
            }
        }
    }
}

impl Default for AdaptiveThreeSigmaDetector {
    fn default() -> Self {
        Self::new(AdaptiveThreeSigmaConfig::default())
    }
}

impl StreamingDetector for AdaptiveThreeSigmaDetector {
    fn fit(&mut self, obs: &Observation) {
        if self.auto_optimize && !self.optimized {
            self.burn_in.push(obs.value);
            if self.burn_in.len() >= BURN_IN_SAMPLES {
                let choice = tuning::optimize_parameters(&self.burn_in, self.warmup_samples);
                self.adopt(choice);
            }
        }

        self.update_statistics(obs.value);
    }

    fn score(&mut self, obs: &Observation) -> f64 {
        if self.count < self.warmup_samples || self.std_dev == 0.0 {
            return 0.0;
        }
        (obs.value - self.mean).abs() / self.std_dev
    }

    fn predict(&self, score: f64) -> bool {
        score != 0.0 && score > self.sigma_multiplier
    }

    fn reset(&mut self) {
        self.mean = 0.0;
        self.std_dev = 1.0;
        self.count = 0;
        self.buffer.clear();
        self.burn_in.clear();
        self.optimized = false;
    }
}
