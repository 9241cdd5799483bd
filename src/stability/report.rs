//! Time-partitioned drift reporting over DataFrames

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use ndarray::Array1;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{DriftLensError, Result};
use crate::stability::{population_stability_index, DriftFlag, StabilityConfig};
use crate::stats::ks_2samp;

/// Minimum per-window sample size (exclusive) before the KS p-value is trusted
const KS_MIN_SAMPLE: usize = 20;

/// Drift measurements for a single numeric feature
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureDriftRecord {
    /// Column name
    pub feature: String,
    /// Population Stability Index; `None` when it could not be computed
    pub psi: Option<f64>,
    /// Two-sample KS p-value; `None` below the sample-size gate
    pub ks_pvalue: Option<f64>,
    /// Severity classification of the PSI value
    pub flag: DriftFlag,
    /// Non-missing observations in the reference window
    pub reference_n: usize,
    /// Non-missing observations in the current window
    pub current_n: usize,
}

/// Drift report across all numeric features of a dataset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriftReport {
    /// Per-feature records, most severe first (alert, warn, ok; PSI
    /// descending within a severity, undefined PSI last)
    pub features: Vec<FeatureDriftRecord>,
    /// Rows whose timestamp fell before the cutoff
    pub reference_rows: usize,
    /// Rows whose timestamp fell at or after the cutoff
    pub current_rows: usize,
    /// Rows whose timestamp failed to parse and joined neither window
    pub unparsed_rows: usize,
}

impl DriftReport {
    fn empty() -> Self {
        Self {
            features: Vec::new(),
            reference_rows: 0,
            current_rows: 0,
            unparsed_rows: 0,
        }
    }

    /// True when no features were examined
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Names of features flagged warn or alert
    pub fn flagged_features(&self) -> Vec<&str> {
        self.features
            .iter()
            .filter(|f| f.flag > DriftFlag::Ok)
            .map(|f| f.feature.as_str())
            .collect()
    }

    /// Names of features flagged alert
    pub fn alert_features(&self) -> Vec<&str> {
        self.features
            .iter()
            .filter(|f| f.flag == DriftFlag::Alert)
            .map(|f| f.feature.as_str())
            .collect()
    }

    /// Human-readable digest
    pub fn summary(&self) -> String {
        let mut s = String::new();
        s.push_str("Drift Report\n");
        s.push_str("============\n");
        s.push_str(&format!("Reference rows: {}\n", self.reference_rows));
        s.push_str(&format!("Current rows: {}\n", self.current_rows));
        s.push_str(&format!("Unparsed timestamps: {}\n", self.unparsed_rows));
        s.push_str(&format!("Features examined: {}\n", self.features.len()));
        s.push_str(&format!("Features flagged: {}\n", self.flagged_features().len()));

        for f in self.features.iter().filter(|f| f.flag > DriftFlag::Ok) {
            match f.psi {
                Some(psi) => {
                    s.push_str(&format!("  - {} [{}] psi {:.4}\n", f.feature, f.flag, psi))
                }
                None => s.push_str(&format!("  - {} [{}]\n", f.feature, f.flag)),
            }
        }
        s
    }

    /// Serialize the report to a JSON string
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Lenient timestamp parsing
///
/// Accepts RFC 3339 plus the common date and datetime layouts below; anything
/// else parses to `None`. Date-only values land at midnight.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    const DATETIME_FORMATS: &[&str] = &[
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
    ];
    const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt);
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(raw, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }
    None
}

/// Row timestamps for a series, `None` where a value is null or unparsable
///
/// String columns go through [`parse_timestamp`]; temporal dtypes convert
/// natively. Any other dtype yields no timestamps at all, which leaves every
/// row outside both windows.
fn timestamp_values(series: &Series) -> Vec<Option<NaiveDateTime>> {
    match series.dtype() {
        DataType::String => match series.str() {
            Ok(ca) => ca
                .into_iter()
                .map(|opt| opt.and_then(parse_timestamp))
                .collect(),
            Err(_) => vec![None; series.len()],
        },
        DataType::Datetime(unit, _) => match series.datetime() {
            Ok(ca) => {
                let unit = *unit;
                ca.into_iter()
                    .map(|opt| opt.and_then(|v| datetime_from_unit(v, unit)))
                    .collect()
            }
            Err(_) => vec![None; series.len()],
        },
        DataType::Date => match series.date() {
            Ok(ca) => ca
                .into_iter()
                .map(|opt| {
                    opt.and_then(|days| {
                        DateTime::from_timestamp(i64::from(days) * 86_400, 0)
                            .map(|dt| dt.naive_utc())
                    })
                })
                .collect(),
            Err(_) => vec![None; series.len()],
        },
        _ => vec![None; series.len()],
    }
}

fn datetime_from_unit(value: i64, unit: TimeUnit) -> Option<NaiveDateTime> {
    match unit {
        TimeUnit::Nanoseconds => Some(DateTime::from_timestamp_nanos(value).naive_utc()),
        TimeUnit::Microseconds => {
            DateTime::from_timestamp_micros(value).map(|dt| dt.naive_utc())
        }
        TimeUnit::Milliseconds => {
            DateTime::from_timestamp_millis(value).map(|dt| dt.naive_utc())
        }
    }
}

fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Compute PSI, KS p-value, and a severity flag for every numeric feature,
/// comparing rows before `cutoff` against rows at or after it
///
/// The timestamp column is parsed leniently; rows with unparsable values join
/// neither window and are surfaced via [`DriftReport::unparsed_rows`]. A
/// missing timestamp column yields an empty report rather than an error. The
/// optional `features` slice restricts which numeric columns are examined.
///
/// Records are ordered by severity descending (alert, warn, ok), then PSI
/// descending, undefined PSI last, feature name as the final tie-break, so
/// repeated runs over the same inputs produce identical reports.
pub fn drift_report(
    df: &DataFrame,
    time_col: &str,
    cutoff: &str,
    features: Option<&[&str]>,
    config: &StabilityConfig,
) -> Result<DriftReport> {
    config.validate()?;
    let cutoff_ts = parse_timestamp(cutoff)
        .ok_or_else(|| DriftLensError::CutoffParse(cutoff.to_string()))?;

    let time_column = match df.column(time_col) {
        Ok(col) => col,
        Err(_) => {
            tracing::debug!(time_col, "timestamp column missing, returning empty report");
            return Ok(DriftReport::empty());
        }
    };

    let timestamps = timestamp_values(time_column.as_materialized_series());
    let unparsed_rows = timestamps.iter().filter(|t| t.is_none()).count();
    let reference_rows = timestamps
        .iter()
        .filter(|t| matches!(t, Some(ts) if *ts < cutoff_ts))
        .count();
    let current_rows = timestamps
        .iter()
        .filter(|t| matches!(t, Some(ts) if *ts >= cutoff_ts))
        .count();

    if unparsed_rows > 0 {
        tracing::warn!(unparsed_rows, time_col, "rows excluded from both windows");
    }

    let mut records = Vec::new();
    for col in df.get_columns() {
        if !is_numeric_dtype(col.dtype()) {
            continue;
        }
        let name = col.name().as_str();
        if let Some(keep) = features {
            if !keep.contains(&name) {
                continue;
            }
        }

        let casted = col.as_materialized_series().cast(&DataType::Float64)?;
        let ca = casted.f64()?;

        let mut reference = Vec::new();
        let mut current = Vec::new();
        for (ts, value) in timestamps.iter().zip(ca.into_iter()) {
            let (Some(ts), Some(v)) = (ts, value) else {
                continue;
            };
            if !v.is_finite() {
                continue;
            }
            if *ts < cutoff_ts {
                reference.push(v);
            } else {
                current.push(v);
            }
        }

        let reference = Array1::from_vec(reference);
        let current = Array1::from_vec(current);

        let psi =
            population_stability_index(&reference, &current, config.bins, config.epsilon);
        let ks_pvalue = if reference.len() > KS_MIN_SAMPLE && current.len() > KS_MIN_SAMPLE {
            ks_2samp(
                reference.as_slice().unwrap_or(&[]),
                current.as_slice().unwrap_or(&[]),
            )
            .map(|t| t.p_value)
        } else {
            None
        };

        records.push(FeatureDriftRecord {
            feature: name.to_string(),
            psi,
            ks_pvalue,
            flag: DriftFlag::classify(psi, config),
            reference_n: reference.len(),
            current_n: current.len(),
        });
    }

    records.sort_by(|a, b| {
        b.flag
            .cmp(&a.flag)
            .then_with(|| {
                let pa = a.psi.unwrap_or(f64::NEG_INFINITY);
                let pb = b.psi.unwrap_or(f64::NEG_INFINITY);
                pb.partial_cmp(&pa).unwrap_or(Ordering::Equal)
            })
            .then_with(|| a.feature.cmp(&b.feature))
    });

    tracing::debug!(
        features = records.len(),
        reference_rows,
        current_rows,
        "drift report complete"
    );

    Ok(DriftReport {
        features: records,
        reference_rows,
        current_rows,
        unparsed_rows,
    })
}
