//! Quantile computation and quantile-based binning

use std::cmp::Ordering;

/// Linear-interpolation quantile of a sorted, non-empty slice
///
/// `q` is clamped into [0, 1]. Matches the default (linear) interpolation of
/// most numeric libraries: the quantile sits at fractional rank `q * (n - 1)`.
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    debug_assert!(!sorted.is_empty());
    let q = q.clamp(0.0, 1.0);
    let rank = q * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        let frac = rank - lo as f64;
        sorted[lo] + frac * (sorted[hi] - sorted[lo])
    }
}

/// Bin edges at `bins + 1` evenly spaced quantiles of `values`
///
/// Duplicate edges are removed; a heavily concentrated sample produces ties.
/// Returns `None` when fewer than 3 unique edges remain (fewer than 2 bins),
/// i.e. the sample has too little spread to bin meaningfully. Callers must
/// treat that as "no result", not as a failure.
pub fn quantile_bin_edges(values: &[f64], bins: usize) -> Option<Vec<f64>> {
    if values.is_empty() || bins == 0 {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    let mut edges = Vec::with_capacity(bins + 1);
    for i in 0..=bins {
        edges.push(quantile(&sorted, i as f64 / bins as f64));
    }

    edges.dedup();
    if edges.len() < 3 {
        return None;
    }
    Some(edges)
}

/// Histogram of `values` over fixed, strictly increasing `edges`
///
/// Bins are half-open `[e_i, e_{i+1})` with the last bin closed on the right.
/// Values outside `[edges[0], edges[last]]` are not counted; NaN never falls
/// into any bin.
pub fn histogram(values: &[f64], edges: &[f64]) -> Vec<usize> {
    debug_assert!(edges.len() >= 2);
    let n_bins = edges.len() - 1;
    let mut counts = vec![0usize; n_bins];
    let lo = edges[0];
    let hi = edges[n_bins];

    for &v in values {
        if !(v >= lo && v <= hi) {
            continue;
        }
        let bin = edges[1..n_bins].partition_point(|&e| e <= v);
        counts[bin] += 1;
    }
    counts
}
