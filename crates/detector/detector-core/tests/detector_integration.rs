//! Integration tests for detector-core

use detector_api::{
    AdaptiveThreeSigmaConfig, AlgorithmKind, KnnCadConfig, ThreeSigmaConfig,
};
use detector_core::{
    build_detector, AdaptiveThreeSigmaDetector, Detector, KnnCadDetector, ThreeSigmaDetector,
};
use detector_spi::{Observation, StreamingDetector};

fn obs(value: f64) -> Observation {
    Observation::from_value(value)
}

fn steady_stream(len: usize) -> Vec<f64> {
    (0..len).map(|i| 10.0 + ((i % 7) as f64) * 0.2).collect()
}

#[test]
fn test_three_sigma_flat_stream_stays_quiet() {
    let mut detector = ThreeSigmaDetector::new(ThreeSigmaConfig::default());
    for _ in 0..500 {
        let score = detector.fit_score(&obs(3.14));
        assert_eq!(score, 0.0);
        assert!(!detector.predict(score));
    }
}

#[test]
fn test_three_sigma_spike_detected_once() {
    let mut detector = ThreeSigmaDetector::new(ThreeSigmaConfig::new(50, 3.0));
    let mut anomalies = 0;
    for (i, v) in steady_stream(200).iter().enumerate() {
        let value = if i == 150 { 10_000.0 } else { *v };
        let score = detector.fit_score(&obs(value));
        if detector.predict(score) {
            anomalies += 1;
            assert_eq!(i, 150);
        }
    }
    assert_eq!(anomalies, 1);
}

#[test]
fn test_adaptive_optimizes_then_keeps_detecting() {
    let mut detector = AdaptiveThreeSigmaDetector::new(AdaptiveThreeSigmaConfig {
        warmup_samples: 100,
        ..AdaptiveThreeSigmaConfig::default()
    });

    for v in steady_stream(100) {
        detector.fit_score(&obs(v));
    }
    assert!(detector.is_optimized());

    // Let the smoothed statistics settle, then inject a spike
    for v in steady_stream(300) {
        detector.fit_score(&obs(v));
    }
    let score = detector.fit_score(&obs(10_000.0));
    assert!(detector.predict(score));
}

#[test]
fn test_knn_construction_invariant_checked_before_any_fit() {
    // window_len 9: current window 3, buffer capacity 6
    let result = KnnCadDetector::new(KnnCadConfig {
        window_len: 9,
        k_neighbor: 6,
        normalize_score: true,
    });
    assert!(result.is_err());
}

#[test]
fn test_knn_processes_long_stream_within_unit_scores() {
    let mut detector = KnnCadDetector::new(KnnCadConfig::default()).unwrap();
    for i in 0..1000 {
        let v = (i as f64 * 0.11).sin() * 3.0 + (i as f64 * 0.013).cos();
        let score = detector.fit_score(&obs(v));
        assert!((0.0..=1.0).contains(&score));
    }
}

#[test]
fn test_factory_round_trip_from_mapping_names() {
    for name in ["three-sigma", "adaptive-three-sigma", "knn-cad"] {
        let kind = AlgorithmKind::parse(name).unwrap();
        let mut detector = build_detector(kind).unwrap();
        // A fresh detector scores 0 on its first observation
        assert_eq!(detector.fit_score(&obs(1.0)), 0.0);
    }
}

#[test]
fn test_reset_is_equivalent_to_fresh_instance() {
    let mut seasoned = build_detector(AlgorithmKind::ThreeSigma).unwrap();
    for v in steady_stream(80) {
        seasoned.fit_score(&obs(v));
    }
    seasoned.reset();

    let mut fresh = build_detector(AlgorithmKind::ThreeSigma).unwrap();
    for v in steady_stream(60) {
        let a = seasoned.fit_score(&obs(v));
        let b = fresh.fit_score(&obs(v));
        assert_eq!(a, b);
    }
    match (&seasoned, &fresh) {
        (Detector::ThreeSigma(a), Detector::ThreeSigma(b)) => {
            assert_eq!(a.statistics().window_size, b.statistics().window_size);
        }
        _ => unreachable!(),
    }
}
