//! Population Stability Index

use ndarray::Array1;

use crate::stats::{histogram, quantile_bin_edges};

/// Population Stability Index between a reference and a current sample
///
/// Bin edges come from the reference sample's quantiles and are shared by
/// both histograms, so the index reads as "how far has the current sample
/// moved relative to where the reference mass sat". Larger values mean more
/// shift. The epsilon clamp keeps the log-ratio finite on empty bins; it can
/// leave tiny negative artifacts near zero, so the result is a signed real.
///
/// Returns `None` when either sample is empty after dropping non-finite
/// values, or when the reference sample is too concentrated to produce at
/// least two distinct bins.
pub fn population_stability_index(
    expected: &Array1<f64>,
    actual: &Array1<f64>,
    bins: usize,
    epsilon: f64,
) -> Option<f64> {
    let expected: Vec<f64> = expected.iter().copied().filter(|v| v.is_finite()).collect();
    let actual: Vec<f64> = actual.iter().copied().filter(|v| v.is_finite()).collect();
    if expected.is_empty() || actual.is_empty() {
        return None;
    }

    let edges = quantile_bin_edges(&expected, bins)?;

    let e_counts = histogram(&expected, &edges);
    let a_counts = histogram(&actual, &edges);

    let e_total = e_counts.iter().sum::<usize>().max(1) as f64;
    let a_total = a_counts.iter().sum::<usize>().max(1) as f64;

    let psi = e_counts
        .iter()
        .zip(a_counts.iter())
        .map(|(&e, &a)| {
            let e_p = (e as f64 / e_total).clamp(epsilon, 1.0);
            let a_p = (a as f64 / a_total).clamp(epsilon, 1.0);
            (a_p - e_p) * (a_p / e_p).ln()
        })
        .sum();

    Some(psi)
}
