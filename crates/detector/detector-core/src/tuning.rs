//! Burn-in grid search for the adaptive detector.
//!
//! The replay is a pure function over a snapshot of the burn-in buffer, so
//! it can be tested without touching live detector state. The live
//! detector adopts the winning combination exactly once.

/// Sigma multiplier candidates.
pub const SIGMA_CANDIDATES: [f64; 3] = [2.5, 3.0, 3.5];
/// Window size candidates.
pub const WINDOW_CANDIDATES: [usize; 3] = [30, 50, 80];
/// Smoothing weight candidates.
pub const ALPHA_CANDIDATES: [f64; 3] = [0.05, 0.1, 0.2];

/// Winning parameter combination from a grid replay.
#[derive(Debug, Clone, PartialEq)]
pub struct GridChoice {
    pub sigma_multiplier: f64,
    pub window_size: usize,
    pub alpha: f64,
    /// False-positive fraction the combination scored on the replay.
    pub false_positive_rate: f64,
}

/// Replay `data` through every candidate combination and pick the one with
/// the lowest false-positive rate. Ties keep the earliest candidate, so
/// the result is deterministic for a given input.
pub fn optimize_parameters(data: &[f64], warmup_samples: usize) -> GridChoice {
    let mut best: Option<GridChoice> = None;

    for &sigma in &SIGMA_CANDIDATES {
        for &window in &WINDOW_CANDIDATES {
            for &alpha in &ALPHA_CANDIDATES {
                let rate = replay_false_positive_rate(data, sigma, window, alpha, warmup_samples);
                let improves = match &best {
                    None => true,
                    Some(choice) => rate < choice.false_positive_rate,
                };
                if improves {
                    best = Some(GridChoice {
                        sigma_multiplier: sigma,
                        window_size: window,
                        alpha,
                        false_positive_rate: rate,
                    });
                }
            }
        }
    }

    // The candidate set is non-empty, so best is always populated.
    best.unwrap_or(GridChoice {
        sigma_multiplier: SIGMA_CANDIDATES[0],
        window_size: WINDOW_CANDIDATES[0],
        alpha: ALPHA_CANDIDATES[0],
        false_positive_rate: 1.0,
    })
}

/// Run a disposable copy of the adaptive update logic over `data` and
/// report the fraction of points whose z-score exceeds `sigma_multiplier`.
///
/// Burn-in traffic is assumed anomaly-free, so every exceedance counts as
/// a false positive.
pub fn replay_false_positive_rate(
    data: &[f64],
    sigma_multiplier: f64,
    window_size: usize,
    alpha: f64,
    warmup_samples: usize,
) -> f64 {
    if data.is_empty() {
        return 1.0;
    }

    let mut mean = 0.0_f64;
    let mut std_dev = 1.0_f64;
    let mut buffer: Vec<f64> = Vec::with_capacity(window_size);
    let mut count = 0_usize;
    let mut false_positives = 0_usize;

    for &value in data {
        buffer.push(value);
        if buffer.len() > window_size {
            buffer.remove(0);
        }

        if count >= warmup_samples {
            let batch_mean = buffer.iter().sum::<f64>() / buffer.len() as f64;
            let batch_var =
                buffer.iter().map(|x| (x - batch_mean).powi(2)).sum::<f64>() / buffer.len() as f64;
            let batch_std = batch_var.sqrt();

            mean = (1.0 - alpha) * mean + alpha * batch_mean;
            std_dev = (1.0 - alpha) * std_dev + alpha * batch_std;

            if std_dev > 0.0 {
                let z = (value - mean).abs() / std_dev;
                if z > sigma_multiplier {
                    false_positives += 1;
                }
            }
        }
        count += 1;
    }

    false_positives as f64 / data.len() as f64
}
