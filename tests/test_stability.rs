//! End-to-end stability checks: time-split drift reports and segment profiles

use driftlens::{
    drift_report, ks_2samp, population_stability_index, segment_report, DriftFlag,
    StabilityConfig,
};
use ndarray::Array1;
use polars::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Standard-normal draws via Box-Muller, deterministic per seed
fn normal_draws(rng: &mut StdRng, mean: f64, sd: f64, n: usize) -> Vec<f64> {
    (0..n)
        .map(|_| {
            let u1: f64 = 1.0 - rng.gen::<f64>();
            let u2: f64 = rng.gen();
            let z = (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos();
            mean + sd * z
        })
        .collect()
}

fn time_split_frame(reference: Vec<f64>, current: Vec<f64>) -> DataFrame {
    let mut ts: Vec<String> = vec!["2024-01-15 08:00:00".to_string(); reference.len()];
    ts.extend(vec!["2024-06-15 08:00:00".to_string(); current.len()]);
    let mut values = reference;
    values.extend(current);
    df!("ts" => ts, "value" => values).unwrap()
}

// ============================================================================
// Drift report end-to-end
// ============================================================================

#[test]
fn test_two_sigma_mean_shift_raises_alert() {
    let mut rng = StdRng::seed_from_u64(42);
    let reference = normal_draws(&mut rng, 0.0, 1.0, 1000);
    let current = normal_draws(&mut rng, 2.0, 1.0, 1000);
    let df = time_split_frame(reference, current);

    let report =
        drift_report(&df, "ts", "2024-03-01", None, &StabilityConfig::default()).unwrap();

    assert_eq!(report.features.len(), 1);
    let record = &report.features[0];
    assert_eq!(record.feature, "value");
    assert_eq!(record.flag, DriftFlag::Alert);
    assert!(record.psi.unwrap() > 0.25, "psi = {:?}", record.psi);
    assert!(record.ks_pvalue.unwrap() < 0.05);
    assert_eq!(record.reference_n, 1000);
    assert_eq!(record.current_n, 1000);
    assert_eq!(report.unparsed_rows, 0);
}

#[test]
fn test_identical_distribution_stays_ok() {
    let mut rng = StdRng::seed_from_u64(7);
    let draws = normal_draws(&mut rng, 0.0, 1.0, 2000);
    let (reference, current) = draws.split_at(1000);
    let df = time_split_frame(reference.to_vec(), current.to_vec());

    let report =
        drift_report(&df, "ts", "2024-03-01", None, &StabilityConfig::default()).unwrap();

    let record = &report.features[0];
    assert_eq!(record.flag, DriftFlag::Ok);
    assert!(record.psi.unwrap().abs() < 0.1, "psi = {:?}", record.psi);
    let p = record.ks_pvalue.unwrap();
    assert!(p > 0.001, "p = {p}");
}

#[test]
fn test_report_round_trips_through_json() {
    let mut rng = StdRng::seed_from_u64(3);
    let reference = normal_draws(&mut rng, 0.0, 1.0, 100);
    let current = normal_draws(&mut rng, 5.0, 1.0, 100);
    let df = time_split_frame(reference, current);

    let report =
        drift_report(&df, "ts", "2024-03-01", None, &StabilityConfig::default()).unwrap();
    let json = report.to_json().unwrap();
    assert!(json.contains("\"flag\": \"alert\""));
    assert!(report.summary().contains("Features flagged: 1"));
}

#[test]
fn test_custom_thresholds_change_classification() {
    let mut rng = StdRng::seed_from_u64(11);
    let reference = normal_draws(&mut rng, 0.0, 1.0, 500);
    let current = normal_draws(&mut rng, 0.4, 1.0, 500);
    let df = time_split_frame(reference, current);

    // A 0.4 sigma shift lands between lenient and strict thresholds
    let strict = StabilityConfig::default().with_thresholds(0.01, 0.02);
    let report = drift_report(&df, "ts", "2024-03-01", None, &strict).unwrap();
    assert_eq!(report.features[0].flag, DriftFlag::Alert);

    let lenient = StabilityConfig::default().with_thresholds(5.0, 10.0);
    let report = drift_report(&df, "ts", "2024-03-01", None, &lenient).unwrap();
    assert_eq!(report.features[0].flag, DriftFlag::Ok);
}

// ============================================================================
// Direct PSI / KS properties on synthetic samples
// ============================================================================

#[test]
fn test_psi_monotone_in_mean_shift() {
    let mut rng = StdRng::seed_from_u64(19);
    let reference = Array1::from_vec(normal_draws(&mut rng, 0.0, 1.0, 2000));

    let mut previous = f64::NEG_INFINITY;
    for shift in [0.0, 0.5, 1.0, 2.0, 4.0] {
        let mut rng_shift = StdRng::seed_from_u64(23);
        let shifted = Array1::from_vec(normal_draws(&mut rng_shift, shift, 1.0, 2000));
        let psi = population_stability_index(&reference, &shifted, 10, 1e-6).unwrap();
        assert!(
            psi > previous - 0.01,
            "psi {psi} broke monotonicity at shift {shift} (previous {previous})"
        );
        previous = psi;
    }
    assert!(previous > 0.25);
}

#[test]
fn test_ks_separates_shifted_normals() {
    let mut rng = StdRng::seed_from_u64(31);
    let a = normal_draws(&mut rng, 0.0, 1.0, 500);
    let b = normal_draws(&mut rng, 2.0, 1.0, 500);
    let result = ks_2samp(&a, &b).unwrap();
    assert!(result.statistic > 0.5);
    assert!(result.p_value < 1e-6);
}

// ============================================================================
// Segment report end-to-end
// ============================================================================

#[test]
fn test_segment_profile_with_binary_target() {
    let df = df!(
        "region" => &["north", "north", "north", "south", "south", "east", "west"],
        "converted" => &["1", "0", "1", "0", "0", "1", "0"]
    )
    .unwrap();

    let records = segment_report(&df, "region", Some("converted"), 3);
    assert_eq!(records.len(), 3);
    assert_eq!(records[0].segment, "north");
    assert_eq!(records[0].count, 3);

    let north = &records[0];
    assert!((north.target_rate.unwrap() - 2.0 / 3.0).abs() < 1e-12);

    let share_total: f64 = records.iter().map(|r| r.share).sum();
    assert!((share_total - 1.0).abs() < 1e-9);
}

#[test]
fn test_segment_profile_serializes_without_rates_for_real_valued_target() {
    let df = df!(
        "plan" => &["basic", "basic", "pro"],
        "spend" => &[12.5, 8.0, 99.0]
    )
    .unwrap();

    let records = segment_report(&df, "plan", Some("spend"), 15);
    assert!(records.iter().all(|r| r.target_rate.is_none()));

    let json = serde_json::to_string(&records).unwrap();
    assert!(!json.contains("target_rate"));
}
