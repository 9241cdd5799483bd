//! driftlens - stability and drift checks for tabular features
//!
//! Quantifies how far the distribution of each numeric feature has moved
//! between two time windows of the same dataset, and profiles categorical
//! segments. Designed to sit behind a profiling or reporting layer: it only
//! reads `polars` DataFrames and returns plain, serializable records.
//!
//! # Modules
//!
//! - [`stability`] - Population Stability Index across a time split, KS
//!   significance checks, and threshold-based drift flags
//! - [`segment`] - segment sizes, shares, and binary-target outcome rates
//! - [`stats`] - quantile binning, histograms, and the two-sample KS test
//! - [`error`] - error types
//!
//! # Example
//!
//! ```
//! use driftlens::{drift_report, StabilityConfig};
//! use polars::prelude::*;
//!
//! let df = df!(
//!     "ts" => &["2024-01-01", "2024-01-02", "2024-06-01", "2024-06-02"],
//!     "amount" => &[10.0, 12.0, 11.0, 9.0]
//! ).unwrap();
//!
//! let report = drift_report(&df, "ts", "2024-03-01", None, &StabilityConfig::default())
//!     .unwrap();
//! assert_eq!(report.features.len(), 1);
//! ```
//!
//! Expected data-quality problems never raise: a missing column produces an
//! empty report, a degenerate sample produces `psi: None`, and an undersized
//! window produces `ks_pvalue: None`. Hard errors are reserved for malformed
//! configuration and unparsable cutoff strings.

pub mod error;
pub mod segment;
pub mod stability;
pub mod stats;

pub use error::{DriftLensError, Result};
pub use segment::{segment_report, SegmentRecord, BINARY_TARGET_VOCAB};
pub use stability::{
    drift_report, parse_timestamp, population_stability_index, DriftFlag, DriftReport,
    FeatureDriftRecord, StabilityConfig,
};
pub use stats::{ks_2samp, KsTest};
