//! Runtime diagnostics.

pub mod regression;

pub use regression::{RegressionDetector, RegressionEvent};
