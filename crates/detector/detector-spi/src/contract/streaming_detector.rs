//! Streaming detector trait definition.

use crate::model::{Observation, Verdict};

/// Streaming anomaly detector trait.
///
/// Implementations consume one observation at a time, in strict temporal
/// order, and keep whatever bounded state they need to score the next one.
pub trait StreamingDetector: Send {
    /// Update internal state with one new observation.
    fn fit(&mut self, obs: &Observation);

    /// Score how anomalous `obs` is given the state left by the most
    /// recent `fit`. A score of 0.0 means "insufficient data".
    ///
    /// Scoring may record the raw score internally (e.g. for running
    /// min-max normalization) but must not otherwise advance state.
    fn score(&mut self, obs: &Observation) -> f64;

    /// Threshold a score into a binary verdict. A zero score always
    /// predicts false.
    fn predict(&self, score: f64) -> bool;

    /// Fit then score, the per-row hot path.
    fn fit_score(&mut self, obs: &Observation) -> f64 {
        self.fit(obs);
        self.score(obs)
    }

    /// Fit, score, and threshold one observation.
    fn evaluate(&mut self, obs: &Observation) -> Verdict {
        let score = self.fit_score(obs);
        Verdict::new(score, self.predict(score))
    }

    /// Return the detector to its just-constructed state, keeping the
    /// configured parameters.
    fn reset(&mut self);
}
