//! Performance regression detection over rolling metric windows.
//!
//! Each named metric keeps a bounded window of recent samples. The baseline
//! is a trimmed mean of the window (outliers at both tails dropped), and a
//! new sample is flagged when it exceeds the baseline by more than a
//! configurable percentage. Detection runs against the window as it stood
//! before the new sample so that a slow creep cannot drag the baseline up
//! with it.

use std::collections::{HashMap, VecDeque};

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Samples needed before a baseline is considered meaningful.
const MIN_SAMPLES: usize = 5;

/// Settings for [`RegressionDetector`].
#[derive(Debug, Clone)]
pub struct RegressionConfig {
    /// Window size per metric. Older samples fall off the back.
    pub max_samples: usize,
    /// How far above baseline (in percent) a sample must land to be flagged.
    pub threshold_pct: f64,
    /// Per-metric threshold overrides; metrics not listed use `threshold_pct`.
    pub thresholds: HashMap<String, f64>,
}

impl Default for RegressionConfig {
    fn default() -> Self {
        Self {
            max_samples: 30,
            threshold_pct: 20.0,
            thresholds: HashMap::new(),
        }
    }
}

/// A flagged regression: one sample that exceeded its metric's baseline.
#[derive(Debug, Clone, Serialize)]
pub struct RegressionEvent {
    pub metric: String,
    pub current: f64,
    pub baseline: f64,
    pub regression_pct: f64,
    pub threshold_pct: f64,
    pub timestamp: DateTime<Utc>,
}

/// Tracks per-metric sample windows and flags samples that regress past the
/// configured threshold.
pub struct RegressionDetector {
    config: RegressionConfig,
    windows: HashMap<String, VecDeque<f64>>,
    events: Vec<RegressionEvent>,
}

impl RegressionDetector {
    pub fn new(config: RegressionConfig) -> Self {
        Self {
            config,
            windows: HashMap::new(),
            events: Vec::new(),
        }
    }

    /// The threshold applying to one metric: its override, or the global
    /// default.
    fn threshold_for(&self, metric: &str) -> f64 {
        self.config
            .thresholds
            .get(metric)
            .copied()
            .unwrap_or(self.config.threshold_pct)
    }

    /// Append a sample to a metric's window, evicting the oldest when full.
    pub fn add_sample(&mut self, metric: &str, value: f64) {
        let window = self.windows.entry(metric.to_string()).or_default();
        if window.len() >= self.config.max_samples {
            window.pop_front();
        }
        window.push_back(value);
    }

    /// Trimmed mean of the metric's current window.
    ///
    /// One tenth of the samples are dropped from each tail. Returns 0.0 when
    /// fewer than [`MIN_SAMPLES`] remain after trimming, which callers treat
    /// as "no baseline yet".
    pub fn calculate_baseline(&self, metric: &str) -> f64 {
        let Some(window) = self.windows.get(metric) else {
            return 0.0;
        };

        let mut sorted: Vec<f64> = window.iter().copied().collect();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let trim = sorted.len() / 10;
        let kept = &sorted[trim..sorted.len() - trim];
        if kept.len() < MIN_SAMPLES {
            return 0.0;
        }

        kept.iter().sum::<f64>() / kept.len() as f64
    }

    /// Check `value` against the metric's baseline without recording it.
    ///
    /// Returns `true` when the window already holds enough history, the
    /// baseline is positive, and the sample overshoots it by more than the
    /// threshold.
    pub fn detect_regression(&self, metric: &str, value: f64) -> bool {
        let history = self.windows.get(metric).map_or(0, VecDeque::len);
        if history < MIN_SAMPLES {
            return false;
        }

        let baseline = self.calculate_baseline(metric);
        if baseline <= 0.0 {
            return false;
        }

        let regression_pct = (value - baseline) / baseline * 100.0;
        regression_pct > self.threshold_for(metric)
    }

    /// Record a sample: detect against prior history first, then add it to
    /// the window. A flagged sample is logged and retained as an event.
    pub fn record(&mut self, metric: &str, value: f64) -> bool {
        let regressed = self.detect_regression(metric, value);
        if regressed {
            let baseline = self.calculate_baseline(metric);
            let regression_pct = (value - baseline) / baseline * 100.0;
            tracing::warn!(
                metric,
                current = value,
                baseline,
                regression_pct = format!("{regression_pct:.1}").as_str(),
                "Performance regression detected"
            );
            self.events.push(RegressionEvent {
                metric: metric.to_string(),
                current: value,
                baseline,
                regression_pct,
                threshold_pct: self.threshold_for(metric),
                timestamp: Utc::now(),
            });
        }
        self.add_sample(metric, value);
        regressed
    }

    /// All regressions flagged so far, in the order they occurred.
    pub fn events(&self) -> &[RegressionEvent] {
        &self.events
    }
}

impl Default for RegressionDetector {
    fn default() -> Self {
        Self::new(RegressionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detector_with(samples: &[f64]) -> RegressionDetector {
        let mut d = RegressionDetector::default();
        for &v in samples {
            d.add_sample("op", v);
        }
        d
    }

    #[test]
    fn test_baseline_is_trimmed_mean() {
        // 10..=100 step 10: one sample trimmed from each tail leaves 20..=90.
        let samples: Vec<f64> = (1..=10).map(|i| (i * 10) as f64).collect();
        let d = detector_with(&samples);

        assert_eq!(d.calculate_baseline("op"), 55.0);
    }

    #[test]
    fn test_baseline_zero_when_too_few_samples() {
        let d = detector_with(&[100.0, 100.0, 100.0, 100.0]);
        assert_eq!(d.calculate_baseline("op"), 0.0);
    }

    #[test]
    fn test_baseline_zero_for_unknown_metric() {
        let d = RegressionDetector::default();
        assert_eq!(d.calculate_baseline("never_seen"), 0.0);
    }

    #[test]
    fn test_regression_above_threshold_is_flagged() {
        let d = detector_with(&[100.0; 10]);
        assert!(d.detect_regression("op", 130.0));
    }

    #[test]
    fn test_regression_below_threshold_is_not_flagged() {
        let d = detector_with(&[100.0; 10]);
        assert!(!d.detect_regression("op", 115.0));
    }

    #[test]
    fn test_no_detection_with_sparse_history() {
        let d = detector_with(&[100.0; 4]);
        assert!(!d.detect_regression("op", 1000.0));
    }

    #[test]
    fn test_zero_baseline_never_flags() {
        let d = detector_with(&[0.0; 10]);
        assert!(!d.detect_regression("op", 50.0));
    }

    #[test]
    fn test_record_detects_before_adding() {
        let mut d = detector_with(&[100.0; 10]);

        // The spike is flagged against the clean history...
        assert!(d.record("op", 200.0));
        // ...and an identical follow-up is still judged against a window that
        // only just absorbed the first spike.
        assert!(d.record("op", 200.0));

        assert_eq!(d.events().len(), 2);
        let event = &d.events()[0];
        assert_eq!(event.metric, "op");
        assert_eq!(event.current, 200.0);
        assert_eq!(event.baseline, 100.0);
        assert_eq!(event.threshold_pct, 20.0);
    }

    #[test]
    fn test_window_evicts_oldest_sample() {
        let mut d = RegressionDetector::new(RegressionConfig {
            max_samples: 5,
            ..RegressionConfig::default()
        });
        for v in [10.0, 10.0, 10.0, 10.0, 10.0, 50.0] {
            d.add_sample("op", v);
        }

        let window = d.windows.get("op").unwrap();
        assert_eq!(window.len(), 5);
        assert_eq!(window.back(), Some(&50.0));
    }

    #[test]
    fn test_per_metric_threshold_override() {
        let mut config = RegressionConfig::default();
        config.thresholds.insert("slow_op".to_string(), 50.0);
        let mut d = RegressionDetector::new(config);
        for _ in 0..10 {
            d.add_sample("slow_op", 100.0);
            d.add_sample("fast_op", 100.0);
        }

        // The override loosens slow_op only; fast_op keeps the default 20%.
        assert!(!d.detect_regression("slow_op", 130.0));
        assert!(d.detect_regression("slow_op", 160.0));
        assert!(d.detect_regression("fast_op", 130.0));
    }

    #[test]
    fn test_event_carries_the_metric_threshold() {
        let mut config = RegressionConfig::default();
        config.thresholds.insert("slow_op".to_string(), 50.0);
        let mut d = RegressionDetector::new(config);
        for _ in 0..10 {
            d.add_sample("slow_op", 100.0);
        }

        assert!(d.record("slow_op", 200.0));
        assert_eq!(d.events()[0].threshold_pct, 50.0);
    }

    #[test]
    fn test_metrics_are_isolated() {
        let mut d = RegressionDetector::default();
        for _ in 0..10 {
            d.add_sample("fast_op", 10.0);
            d.add_sample("slow_op", 1000.0);
        }

        assert!(d.detect_regression("fast_op", 20.0));
        assert!(!d.detect_regression("slow_op", 1100.0));
    }
}
