//! Univariate KNN-CAD detector with Mahalanobis distance.

use std::collections::VecDeque;

use detector_api::KnnCadConfig;
use detector_spi::{DetectorError, Observation, Result, StreamingDetector};

use crate::matrix;

/// Raw scores collected before min-max normalization activates.
const NORMALIZE_SEED_COUNT: usize = 10;
/// Neutral score returned while normalization is still seeding.
const NEUTRAL_SCORE: f64 = 0.5;

/// Distance-based detector over a buffer of historical window snapshots.
///
/// A short "current" window of length floor(sqrt(L)) slides over the
/// stream; each time it fills, a copy is appended to a historical buffer
/// of capacity L - floor(sqrt(L)). Scoring measures the Mahalanobis
/// distance from a candidate window (current window with its last element
/// replaced by the new value) to every snapshot, summing the 2nd through
/// (k+1)-th smallest distances. The nearest snapshot is discarded as a
/// self-like match, since snapshots overlap the candidate heavily.
#[derive(Debug, Clone)]
pub struct KnnCadDetector {
    window: VecDeque<f64>,
    window_cap: usize,
    buffer: VecDeque<Vec<f64>>,
    buffer_cap: usize,
    k: usize,
    normalize: bool,
    raw_scores: Vec<f64>,
    score_min: Option<f64>,
    score_max: Option<f64>,
}

impl KnnCadDetector {
    /// Create a detector from configuration.
    ///
    /// Fails when `k_neighbor` is not strictly less than the historical
    /// buffer capacity `window_len - floor(sqrt(window_len))`.
    pub fn new(config: KnnCadConfig) -> Result<Self> {
        let window_cap = (config.window_len as f64).sqrt().floor() as usize;
        let buffer_cap = config.window_len.saturating_sub(window_cap);

        if config.k_neighbor >= buffer_cap {
            return Err(DetectorError::InvalidParameter {
                name: "k_neighbor".to_string(),
                reason: format!(
                    "must be less than the buffer capacity {} (window_len {})",
                    buffer_cap, config.window_len
                ),
            });
        }

        Ok(Self {
            window: VecDeque::with_capacity(window_cap),
            window_cap,
            buffer: VecDeque::with_capacity(buffer_cap),
            buffer_cap,
            k: config.k_neighbor,
            normalize: config.normalize_score,
            raw_scores: Vec::new(),
            score_min: None,
            score_max: None,
        })
    }

    fn raw_score(&self, value: f64) -> f64 {
        // Candidate window: current contents with the last element replaced
        let mut candidate: Vec<f64> = self.window.iter().copied().collect();
        if let Some(last) = candidate.last_mut() {
            *last = value;
        }

        let snapshots: Vec<Vec<f64>> = self.buffer.iter().cloned().collect();
        let cov = matrix::sample_covariance(&snapshots);
        let vi = match matrix::inverse(&cov) {
            Some(inv) => inv,
            None => matrix::pseudo_inverse(&cov),
        };

        let mut distances: Vec<f64> = snapshots
            .iter()
            .map(|snapshot| matrix::mahalanobis(&candidate, snapshot, &vi))
            .collect();
        distances.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        // 2nd through (k+1)-th smallest: the closest match is self-like
        distances[1..=self.k].iter().sum()
    }

    fn normalized(&mut self, raw: f64) -> f64 {
        if self.raw_scores.len() < NORMALIZE_SEED_COUNT {
            return NEUTRAL_SCORE;
        }

        match (self.score_min, self.score_max) {
            (Some(min), Some(max)) => {
                // Running extrema after seeding
                self.score_min = Some(min.min(raw));
                self.score_max = Some(max.max(raw));
            }
            _ => {
                // Seed from everything collected so far
                let min = self.raw_scores.iter().cloned().fold(f64::INFINITY, f64::min);
                let max = self
                    .raw_scores
                    .iter()
                    .cloned()
                    .fold(f64::NEG_INFINITY, f64::max);
                self.score_min = Some(min);
                self.score_max = Some(max);
            }
        }

        let min = self.score_min.unwrap_or(0.0);
        let max = self.score_max.unwrap_or(0.0);
        if max == min {
            return NEUTRAL_SCORE;
        }
        ((raw - min) / (max - min)).clamp(0.0, 1.0)
    }
}

impl StreamingDetector for KnnCadDetector {
    fn fit(&mut self, obs: &Observation) {
        if self.window.len() == self.window_cap {
            self.window.pop_front();
        }
        self.window.push_back(obs.value);

        // A full current window contributes one historical snapshot
        if self.window.len() == self.window_cap {
            if self.buffer.len() == self.buffer_cap {
                self.buffer.pop_front();
            }
            self.buffer.push_back(self.window.iter().copied().collect());
        }
    }

    fn score(&mut self, obs: &Observation) -> f64 {
        // Need a full candidate window and enough snapshots for the
        // partial selection to be meaningful
        if self.window.len() < self.window_cap || self.buffer.len() < self.k + 2 {
            return 0.0;
        }

        let raw = self.raw_score(obs.value);
        self.raw_scores.push(raw);

        if self.normalize {
            self.normalized(raw)
        } else {
            raw
        }
    }

    fn predict(&self, score: f64) -> bool {
        score != 0.0 && score > 0.5
    }

    fn reset(&mut self) {
        self.window.clear();
        self.buffer.clear();
        self.raw_scores.clear();
        self.score_min = None;
        self.score_max = None;
    }
}
