//! Statistical primitives
//!
//! Small, dependency-free building blocks shared by the stability module:
//! - Linear-interpolation quantiles and quantile-derived bin edges
//! - Fixed-edge histograms
//! - Two-sample Kolmogorov-Smirnov test with asymptotic p-value

mod quantile;
mod ks;

pub use quantile::{histogram, quantile, quantile_bin_edges};
pub use ks::{ks_2samp, KsTest};
