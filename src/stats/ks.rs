//! Two-sample Kolmogorov-Smirnov test

use std::cmp::Ordering;

/// Outcome of a two-sample KS test
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KsTest {
    /// Maximum absolute difference between the two empirical CDFs
    pub statistic: f64,
    /// Asymptotic two-sided p-value in [0, 1]
    pub p_value: f64,
}

/// Two-sample Kolmogorov-Smirnov test
///
/// Computes the exact D statistic over both empirical CDFs and the asymptotic
/// two-sided p-value from the Kolmogorov distribution, with the usual
/// small-sample correction on the effective sample size. The asymptotic
/// approximation is coarse below a few dozen observations per side; callers
/// gate on sample size before trusting the p-value.
///
/// Returns `None` when either sample is empty.
pub fn ks_2samp(reference: &[f64], current: &[f64]) -> Option<KsTest> {
    if reference.is_empty() || current.is_empty() {
        return None;
    }

    let mut a = reference.to_vec();
    let mut b = current.to_vec();
    a.sort_by(|x, y| x.partial_cmp(y).unwrap_or(Ordering::Equal));
    b.sort_by(|x, y| x.partial_cmp(y).unwrap_or(Ordering::Equal));

    let n1 = a.len();
    let n2 = b.len();
    let mut i = 0;
    let mut j = 0;
    let mut d: f64 = 0.0;

    // Walk the merged value sequence, consuming whole tie runs so the CDFs
    // are only compared at positions where both step functions are settled.
    while i < n1 && j < n2 {
        let x = a[i].min(b[j]);
        while i < n1 && a[i] == x {
            i += 1;
        }
        while j < n2 && b[j] == x {
            j += 1;
        }
        let f1 = i as f64 / n1 as f64;
        let f2 = j as f64 / n2 as f64;
        d = d.max((f1 - f2).abs());
    }

    let en = ((n1 * n2) as f64 / (n1 + n2) as f64).sqrt();
    let lambda = (en + 0.12 + 0.11 / en) * d;

    Some(KsTest {
        statistic: d,
        p_value: kolmogorov_sf(lambda).clamp(0.0, 1.0),
    })
}

/// Survival function of the Kolmogorov distribution
///
/// Q(lambda) = 2 * sum_{k>=1} (-1)^{k-1} exp(-2 k^2 lambda^2), truncated once
/// the alternating terms become negligible. A series that does not converge
/// within the iteration cap corresponds to lambda near zero, where Q = 1.
fn kolmogorov_sf(lambda: f64) -> f64 {
    let a2 = -2.0 * lambda * lambda;
    let mut fac = 2.0;
    let mut sum = 0.0;
    let mut term_prev: f64 = 0.0;

    for k in 1..=100 {
        let term = fac * (a2 * (k * k) as f64).exp();
        sum += term;
        if term.abs() <= 0.001 * term_prev || term.abs() <= 1e-8 * sum.abs() {
            return sum;
        }
        fac = -fac;
        term_prev = term.abs();
    }
    1.0
}
