//! CLI command definitions and dispatch.
//!
//! Each subcommand is implemented in its own submodule for maintainability:
//! - `resolve`: Ad-hoc link resolution for a single track, no database
//! - `discover`: Run discovery for stored releases and persist the links
//! - `import`: Ingest releases and tracks from a JSON file
//! - `info`: Provider listing, config inspection, and performance-sample replay

mod discover;
mod import;
mod info;
mod resolve;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tokio::runtime::Runtime;

pub use discover::cmd_discover;
pub use import::cmd_import;
pub use info::{cmd_config, cmd_perf, cmd_providers};
pub use resolve::cmd_resolve;

/// Linkscout CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Resolve provider links for a single track without touching the database
    Resolve {
        /// Track title
        title: String,
        /// Artist name
        #[arg(short, long, default_value = "")]
        artist: String,
        /// ISRC for canonical lookups (search fallbacks only without it)
        #[arg(short, long)]
        isrc: Option<String>,
        /// Storefront / region code (overrides config)
        #[arg(short, long)]
        storefront: Option<String>,
        /// Apple Music developer token (or set APPLE_DEVELOPER_TOKEN env var)
        #[arg(long, env = "APPLE_DEVELOPER_TOKEN")]
        apple_token: Option<String>,
        /// MusicFetch API token (or set MUSICFETCH_TOKEN env var)
        #[arg(long, env = "MUSICFETCH_TOKEN")]
        musicfetch_token: Option<String>,
        /// Only resolve these providers (repeatable, e.g. -p tidal -p deezer)
        #[arg(short, long = "provider")]
        providers: Vec<String>,
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Discover and persist links for releases in the database
    Discover {
        /// Release ID to process (all releases when omitted)
        release_id: Option<i64>,
        /// Database path
        #[arg(long, default_value = "linkscout.db")]
        db: PathBuf,
        /// Re-resolve providers that already have stored links
        #[arg(long)]
        include_existing: bool,
        /// Storefront / region code (overrides config)
        #[arg(short, long)]
        storefront: Option<String>,
        /// Apple Music developer token (or set APPLE_DEVELOPER_TOKEN env var)
        #[arg(long, env = "APPLE_DEVELOPER_TOKEN")]
        apple_token: Option<String>,
        /// MusicFetch API token (or set MUSICFETCH_TOKEN env var)
        #[arg(long, env = "MUSICFETCH_TOKEN")]
        musicfetch_token: Option<String>,
    },
    /// Import releases and tracks from a JSON file
    Import {
        /// Path to the JSON file
        path: PathBuf,
        /// Database path
        #[arg(long, default_value = "linkscout.db")]
        db: PathBuf,
    },
    /// List known providers and which get canonical lookups
    Providers,
    /// Show the effective configuration
    Config {
        /// Write the effective configuration to the config file
        #[arg(long)]
        init: bool,
    },
    /// Replay timing samples through the regression detector
    Perf {
        /// Path to a JSON file mapping metric names to sample arrays
        path: PathBuf,
        /// Percent above baseline at which a sample is flagged (overrides config)
        #[arg(long)]
        threshold: Option<f64>,
    },
}

/// Run the specified CLI command.
pub fn run_command(cli: &Cli) -> anyhow::Result<()> {
    let rt = Runtime::new()?;
    let config = crate::config::load();

    match &cli.command {
        Commands::Resolve {
            title,
            artist,
            isrc,
            storefront,
            apple_token,
            musicfetch_token,
            providers,
            json,
        } => cmd_resolve(
            &rt,
            &config,
            title,
            artist,
            isrc.as_deref(),
            storefront.as_deref(),
            apple_token.as_deref(),
            musicfetch_token.as_deref(),
            providers,
            *json,
        ),
        Commands::Discover {
            release_id,
            db,
            include_existing,
            storefront,
            apple_token,
            musicfetch_token,
        } => cmd_discover(
            &rt,
            &config,
            *release_id,
            db,
            *include_existing,
            storefront.as_deref(),
            apple_token.as_deref(),
            musicfetch_token.as_deref(),
        ),
        Commands::Import { path, db } => cmd_import(&rt, path, db),
        Commands::Providers => cmd_providers(),
        Commands::Config { init } => cmd_config(&config, *init),
        Commands::Perf { path, threshold } => cmd_perf(&config, path, *threshold),
    }
}

// ============================================================================
// Shared helper functions
// ============================================================================

use crate::config::Config;
use crate::discovery::apple::AppleMusicClient;
use crate::discovery::client::FetchClient;
use crate::discovery::deezer::DeezerClient;
use crate::discovery::musicfetch::MusicfetchClient;

/// The lookup clients a discovery run needs, built once per invocation.
pub(crate) struct LookupClients {
    pub apple: AppleMusicClient,
    pub deezer: DeezerClient,
    pub musicfetch: MusicfetchClient,
}

/// Build the lookup clients from config, with CLI/env tokens taking
/// precedence over the config file.
pub(crate) fn build_clients(
    config: &Config,
    storefront: Option<&str>,
    apple_token: Option<&str>,
    musicfetch_token: Option<&str>,
) -> LookupClients {
    let timeout = std::time::Duration::from_millis(config.discovery.timeout_ms);
    let retries = config.discovery.max_retries;
    let storefront = storefront
        .unwrap_or(&config.discovery.storefront)
        .to_string();

    let apple_token = apple_token
        .map(String::from)
        .or_else(|| config.credentials.apple_developer_token.clone());
    let musicfetch_token = musicfetch_token
        .map(String::from)
        .or_else(|| config.credentials.musicfetch_token.clone());

    LookupClients {
        apple: AppleMusicClient::new(
            FetchClient::new(timeout, retries),
            apple_token,
            storefront,
        ),
        deezer: DeezerClient::new(FetchClient::new(timeout, retries)),
        musicfetch: MusicfetchClient::new(FetchClient::new(timeout, retries), musicfetch_token),
    }
}

/// Effective storefront for a run: CLI flag beats config.
pub(crate) fn effective_storefront(config: &Config, flag: Option<&str>) -> String {
    flag.unwrap_or(&config.discovery.storefront).to_string()
}
