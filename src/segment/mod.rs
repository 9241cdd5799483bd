//! Segment-level stability checks
//!
//! Profiles a categorical column: how large each segment is, what share of
//! the reported total it holds, and - when a target column looks binary -
//! the outcome rate inside each segment.

use std::collections::{HashMap, HashSet};

use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Accepted target vocabulary and its binarization
///
/// Matching is case-insensitive over trimmed values. A target column whose
/// distinct non-null values stray outside this table is not binary-like and
/// produces no rates.
pub const BINARY_TARGET_VOCAB: [(&str, f64); 6] = [
    ("1", 1.0),
    ("0", 0.0),
    ("yes", 1.0),
    ("no", 0.0),
    ("true", 1.0),
    ("false", 0.0),
];

/// Size and stability profile of one categorical segment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentRecord {
    /// Stringified segment value
    pub segment: String,
    /// Rows carrying this segment value
    pub count: usize,
    /// Share of the reported (top-K) total
    pub share: f64,
    /// Mean binarized target inside the segment, when the target is binary-like
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_rate: Option<f64>,
}

/// Profile the `top_k` most frequent segments of a categorical column
///
/// Null segment values are skipped; everything else is stringified. Shares
/// are computed against the top-K total, not the dataset total, so they sum
/// to 1 whenever `top_k` covers every distinct value. Count ties break on the
/// segment label so repeated runs report identically.
///
/// When `target_col` names an existing binary-like column (see
/// [`BINARY_TARGET_VOCAB`]), each record carries the segment's mean outcome,
/// computed over all of the segment's rows. A non-binary target leaves every
/// `target_rate` unset, without signalling.
///
/// A missing segment column yields an empty result rather than an error.
pub fn segment_report(
    df: &DataFrame,
    segment_col: &str,
    target_col: Option<&str>,
    top_k: usize,
) -> Vec<SegmentRecord> {
    let Ok(column) = df.column(segment_col) else {
        tracing::debug!(segment_col, "segment column missing, returning empty result");
        return Vec::new();
    };
    let segments = stringify_series(column.as_materialized_series());

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for seg in segments.iter().flatten() {
        *counts.entry(seg.as_str()).or_insert(0) += 1;
    }

    let mut ordered: Vec<(&str, usize)> = counts.into_iter().collect();
    ordered.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ordered.truncate(top_k);

    let total = ordered.iter().map(|(_, c)| c).sum::<usize>().max(1) as f64;

    let rates = target_col
        .and_then(|name| df.column(name).ok())
        .and_then(|col| target_rates(&segments, col.as_materialized_series()));

    ordered
        .into_iter()
        .map(|(segment, count)| SegmentRecord {
            segment: segment.to_string(),
            count,
            share: count as f64 / total,
            target_rate: rates.as_ref().and_then(|m| m.get(segment).copied()),
        })
        .collect()
}

/// Mean binarized target per segment, or `None` when the target is not
/// binary-like
fn target_rates(
    segments: &[Option<String>],
    target: &Series,
) -> Option<HashMap<String, f64>> {
    let normalized: Vec<Option<String>> = stringify_series(target)
        .into_iter()
        .map(|opt| opt.map(|s| s.trim().to_lowercase()))
        .collect();

    let distinct: HashSet<&str> = normalized
        .iter()
        .flatten()
        .map(|s| s.as_str())
        .collect();
    if !distinct.iter().all(|v| binarize(v).is_some()) {
        return None;
    }

    let mut sums: HashMap<String, (f64, usize)> = HashMap::new();
    for (seg, value) in segments.iter().zip(normalized.iter()) {
        let (Some(seg), Some(value)) = (seg, value) else {
            continue;
        };
        // Vocabulary already verified over the distinct set
        let Some(y) = binarize(value) else { continue };
        let entry = sums.entry(seg.clone()).or_insert((0.0, 0));
        entry.0 += y;
        entry.1 += 1;
    }

    Some(
        sums.into_iter()
            .map(|(seg, (sum, n))| (seg, sum / n as f64))
            .collect(),
    )
}

fn binarize(value: &str) -> Option<f64> {
    BINARY_TARGET_VOCAB
        .iter()
        .find(|(label, _)| *label == value)
        .map(|(_, y)| *y)
}

/// Stringified values of a series, `None` for nulls
fn stringify_series(series: &Series) -> Vec<Option<String>> {
    series
        .iter()
        .map(|av| match av {
            AnyValue::Null => None,
            AnyValue::String(s) => Some(s.to_string()),
            AnyValue::StringOwned(s) => Some(s.to_string()),
            other => Some(other.to_string()),
        })
        .collect()
}
