//! Provider listing, config inspection, and performance-sample replay.

use std::collections::BTreeMap;
use std::path::Path;

use crate::config::Config;
use crate::diagnostics::regression::{RegressionConfig, RegressionDetector};
use crate::discovery::provider::{ALL_PROVIDERS, Provider};

/// List all known providers and how each one gets resolved.
pub fn cmd_providers() -> anyhow::Result<()> {
    println!("{:<14} {:<20} {}", "key", "name", "lookup");
    for provider in ALL_PROVIDERS {
        let lookup = match provider {
            Provider::AppleMusic => "apple music api / itunes",
            Provider::Deezer => "deezer api",
            Provider::Spotify => "(not discovered)",
            _ => "aggregator / search",
        };
        println!(
            "{:<14} {:<20} {}",
            provider.key(),
            provider.display_name(),
            lookup
        );
    }
    Ok(())
}

/// Print the effective configuration, optionally writing it to disk first.
///
/// `--init` persists the current effective config so there is a file to edit.
pub fn cmd_config(config: &Config, init: bool) -> anyhow::Result<()> {
    if init {
        crate::config::save(config)?;
    }

    match crate::config::config_path() {
        Some(path) => println!("# {}", path.display()),
        None => println!("# no config directory available"),
    }
    print!("{}", toml::to_string_pretty(config)?);

    Ok(())
}

/// Replay timing samples through the regression detector and report flags.
///
/// Input: a JSON object mapping metric names to arrays of samples, e.g.
/// `{"resolve_ms": [120.0, 118.5, 260.0]}`. Samples are replayed in order,
/// so regressions are judged against the history preceding each sample.
pub fn cmd_perf(config: &Config, path: &Path, threshold: Option<f64>) -> anyhow::Result<()> {
    let contents = std::fs::read_to_string(path)?;
    let samples: BTreeMap<String, Vec<f64>> = serde_json::from_str(&contents)?;

    let mut detector = RegressionDetector::new(RegressionConfig {
        max_samples: config.regression.max_samples,
        threshold_pct: threshold.unwrap_or(config.regression.threshold_pct),
        thresholds: config.regression.thresholds.clone().into_iter().collect(),
    });

    for (metric, values) in &samples {
        for &value in values {
            detector.record(metric, value);
        }
    }

    if detector.events().is_empty() {
        println!("No regressions detected.");
        return Ok(());
    }

    println!(
        "{:<20} {:>10} {:>10} {:>8}",
        "metric", "current", "baseline", "over%"
    );
    for event in detector.events() {
        println!(
            "{:<20} {:>10.2} {:>10.2} {:>7.1}%",
            event.metric, event.current, event.baseline, event.regression_pct
        );
    }

    Ok(())
}
