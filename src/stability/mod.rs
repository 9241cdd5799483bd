//! Stability and drift detection across time windows
//!
//! The engine splits a DataFrame into a reference window (before a cutoff)
//! and a current window (at or after it), then measures each numeric
//! feature's distributional shift with PSI and a KS significance check, and
//! classifies the shift against configurable thresholds.

mod psi;
mod report;

pub use psi::population_stability_index;
pub use report::{drift_report, parse_timestamp, DriftReport, FeatureDriftRecord};

use serde::{Deserialize, Serialize};

use crate::error::{DriftLensError, Result};

/// Severity of a feature's distributional shift
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriftFlag {
    /// No meaningful shift, or PSI could not be computed (fail-open)
    Ok,
    /// Shift at or above the warning threshold
    Warn,
    /// Shift at or above the alert threshold
    Alert,
}

impl DriftFlag {
    /// Classify a PSI value against the configured thresholds
    ///
    /// An undefined PSI deliberately maps to `Ok`; the record still carries
    /// `psi: None`, so callers can tell "stable" from "not computed".
    pub fn classify(psi: Option<f64>, config: &StabilityConfig) -> Self {
        match psi {
            Some(v) if v >= config.alert_threshold => DriftFlag::Alert,
            Some(v) if v >= config.warn_threshold => DriftFlag::Warn,
            _ => DriftFlag::Ok,
        }
    }

    /// Lowercase label, matching the serialized form
    pub fn as_str(&self) -> &'static str {
        match self {
            DriftFlag::Ok => "ok",
            DriftFlag::Warn => "warn",
            DriftFlag::Alert => "alert",
        }
    }
}

impl std::fmt::Display for DriftFlag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration for stability checks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StabilityConfig {
    /// Number of quantile bins for PSI
    pub bins: usize,
    /// Probability floor applied before the PSI log-ratio
    pub epsilon: f64,
    /// PSI at or above this flags `Warn`
    pub warn_threshold: f64,
    /// PSI at or above this flags `Alert`
    pub alert_threshold: f64,
}

impl Default for StabilityConfig {
    fn default() -> Self {
        Self {
            bins: 10,
            epsilon: 1e-6,
            warn_threshold: 0.1,
            alert_threshold: 0.25,
        }
    }
}

impl StabilityConfig {
    /// Create a configuration with default thresholds
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of quantile bins
    pub fn with_bins(mut self, bins: usize) -> Self {
        self.bins = bins;
        self
    }

    /// Set the probability floor
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Set the warn/alert PSI thresholds
    pub fn with_thresholds(mut self, warn: f64, alert: f64) -> Self {
        self.warn_threshold = warn;
        self.alert_threshold = alert;
        self
    }

    /// Validate the configuration
    ///
    /// Run by every entry point; a malformed configuration is a programming
    /// error and fails hard, unlike data-quality problems.
    pub fn validate(&self) -> Result<()> {
        if self.bins < 2 {
            return Err(DriftLensError::ConfigError(format!(
                "bins must be at least 2, got {}",
                self.bins
            )));
        }
        if !(self.epsilon > 0.0) {
            return Err(DriftLensError::ConfigError(format!(
                "epsilon must be positive, got {}",
                self.epsilon
            )));
        }
        if self.warn_threshold > self.alert_threshold {
            return Err(DriftLensError::ConfigError(format!(
                "warn_threshold ({}) must not exceed alert_threshold ({})",
                self.warn_threshold, self.alert_threshold
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_boundaries_are_inclusive() {
        let config = StabilityConfig::default();
        assert_eq!(DriftFlag::classify(Some(0.25), &config), DriftFlag::Alert);
        assert_eq!(DriftFlag::classify(Some(0.1), &config), DriftFlag::Warn);
        assert_eq!(DriftFlag::classify(Some(0.0999), &config), DriftFlag::Ok);
        assert_eq!(DriftFlag::classify(Some(0.3), &config), DriftFlag::Alert);
    }

    #[test]
    fn test_undefined_psi_fails_open() {
        let config = StabilityConfig::default();
        assert_eq!(DriftFlag::classify(None, &config), DriftFlag::Ok);
    }

    #[test]
    fn test_flag_severity_order() {
        assert!(DriftFlag::Alert > DriftFlag::Warn);
        assert!(DriftFlag::Warn > DriftFlag::Ok);
    }

    #[test]
    fn test_config_defaults() {
        let config = StabilityConfig::default();
        assert_eq!(config.bins, 10);
        assert_eq!(config.warn_threshold, 0.1);
        assert_eq!(config.alert_threshold, 0.25);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_rejects_inverted_thresholds() {
        let config = StabilityConfig::default().with_thresholds(0.5, 0.2);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_rejects_degenerate_bins() {
        assert!(StabilityConfig::default().with_bins(1).validate().is_err());
        assert!(StabilityConfig::default().with_bins(2).validate().is_ok());
    }

    #[test]
    fn test_config_rejects_nonpositive_epsilon() {
        assert!(StabilityConfig::default().with_epsilon(0.0).validate().is_err());
    }
}
