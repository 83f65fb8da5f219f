//! Configuration system using TOML files.
//!
//! Config is stored in the OS-standard config directory:
//! - Windows: %APPDATA%\linkscout\config.toml
//! - macOS: ~/Library/Application Support/linkscout/config.toml
//! - Linux: ~/.config/linkscout/config.toml
//!
//! The config file is human-readable and editable. Settings are loaded at
//! startup; credentials can also come from environment variables via CLI
//! flags, which take precedence over the file.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// API credentials (keep separate for potential future encryption)
    pub credentials: Credentials,

    /// Link discovery settings
    pub discovery: DiscoveryConfig,

    /// Performance regression detector settings
    pub regression: RegressionConfig,
}

/// API credentials
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Credentials {
    /// Apple Music developer token (MusicKit JWT) for catalog lookups
    pub apple_developer_token: Option<String>,

    /// MusicFetch API token for aggregator lookups
    pub musicfetch_token: Option<String>,
}

/// Link discovery settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Storefront / region code for Apple Music and search URLs
    pub storefront: String,

    /// Per-request timeout in milliseconds
    pub timeout_ms: u64,

    /// Retry attempts after the first try for retryable failures
    pub max_retries: u32,

    /// Skip providers a release already has links for
    pub skip_existing: bool,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            storefront: "us".to_string(),
            timeout_ms: 10_000,
            max_retries: 2,
            skip_existing: true,
        }
    }
}

/// Performance regression detector settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegressionConfig {
    /// Rolling window size per metric
    pub max_samples: usize,

    /// Percent above baseline at which a sample is flagged
    pub threshold_pct: f64,

    /// Per-metric overrides of `threshold_pct`, keyed by metric name
    pub thresholds: BTreeMap<String, f64>,
}

impl Default for RegressionConfig {
    fn default() -> Self {
        Self {
            max_samples: 30,
            threshold_pct: 20.0,
            thresholds: BTreeMap::new(),
        }
    }
}

// ============================================================================
// Config File Operations
// ============================================================================

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("linkscout"))
}

/// Get the full path to the config file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load configuration from disk
///
/// Returns default config if file doesn't exist or can't be parsed.
/// Logs warnings but doesn't fail - we always return a usable config.
pub fn load() -> Config {
    let Some(path) = config_path() else {
        tracing::warn!("Could not determine config directory, using defaults");
        return Config::default();
    };

    if !path.exists() {
        tracing::info!("No config file found at {:?}, using defaults", path);
        return Config::default();
    }

    match std::fs::read_to_string(&path) {
        Ok(contents) => match toml::from_str(&contents) {
            Ok(config) => {
                tracing::info!("Loaded config from {:?}", path);
                config
            }
            Err(e) => {
                tracing::error!("Failed to parse config file {:?}: {}", path, e);
                tracing::warn!("Using default configuration");
                Config::default()
            }
        },
        Err(e) => {
            tracing::error!("Failed to read config file {:?}: {}", path, e);
            Config::default()
        }
    }
}

/// Save configuration to disk
///
/// Creates the config directory if it doesn't exist.
pub fn save(config: &Config) -> Result<(), ConfigError> {
    let dir = config_dir().ok_or(ConfigError::NoConfigDir)?;
    save_to(config, &dir)
}

/// Save configuration into a specific directory.
fn save_to(config: &Config, dir: &Path) -> Result<(), ConfigError> {
    let path = dir.join("config.toml");

    std::fs::create_dir_all(dir).map_err(|e| ConfigError::CreateDir(dir.to_path_buf(), e))?;

    let contents = toml::to_string_pretty(config).map_err(ConfigError::Serialize)?;

    // Write atomically (write to temp, then rename)
    let temp_path = path.with_extension("toml.tmp");
    std::fs::write(&temp_path, &contents).map_err(|e| ConfigError::Write(temp_path.clone(), e))?;
    std::fs::rename(&temp_path, &path)
        .map_err(|e| ConfigError::Rename(temp_path, path.clone(), e))?;

    tracing::info!("Saved config to {:?}", path);
    Ok(())
}

// ============================================================================
// Error Types
// ============================================================================

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to create config directory {0}: {1}")]
    CreateDir(PathBuf, std::io::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(toml::ser::Error),

    #[error("Failed to write config to {0}: {1}")]
    Write(PathBuf, std::io::Error),

    #[error("Failed to rename temp file {0} to {1}: {2}")]
    Rename(PathBuf, PathBuf, std::io::Error),
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let toml = toml::to_string_pretty(&config).unwrap();
        assert!(toml.contains("[credentials]"));
        assert!(toml.contains("[discovery]"));
        assert!(toml.contains("[regression]"));
    }

    #[test]
    fn test_config_roundtrip() {
        let mut config = Config::default();
        config.credentials.musicfetch_token = Some("mf-token-123".to_string());
        config.discovery.storefront = "gb".to_string();
        config.regression.threshold_pct = 35.0;
        config
            .regression
            .thresholds
            .insert("resolve_ms".to_string(), 50.0);

        let toml = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&toml).unwrap();

        assert_eq!(
            parsed.credentials.musicfetch_token,
            Some("mf-token-123".to_string())
        );
        assert_eq!(parsed.discovery.storefront, "gb");
        assert_eq!(parsed.regression.threshold_pct, 35.0);
        assert_eq!(parsed.regression.thresholds.get("resolve_ms"), Some(&50.0));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        // Config with only some fields
        let toml = r#"
[credentials]
apple_developer_token = "eyJhbGciOi"
"#;
        let config: Config = toml::from_str(toml).unwrap();

        assert_eq!(
            config.credentials.apple_developer_token,
            Some("eyJhbGciOi".to_string())
        );

        // Other fields use defaults
        assert_eq!(config.discovery.storefront, "us");
        assert_eq!(config.discovery.timeout_ms, 10_000);
        assert!(config.discovery.skip_existing);
        assert_eq!(config.regression.max_samples, 30);
    }

    #[test]
    fn test_save_writes_parseable_config_atomically() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.discovery.storefront = "de".to_string();

        save_to(&config, dir.path()).unwrap();

        let path = dir.path().join("config.toml");
        let contents = std::fs::read_to_string(&path).unwrap();
        let parsed: Config = toml::from_str(&contents).unwrap();
        assert_eq!(parsed.discovery.storefront, "de");

        // No leftover temp file from the atomic rename.
        assert!(!dir.path().join("config.toml.tmp").exists());
    }
}
