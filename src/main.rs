//! Linkscout - streaming-platform link discovery for music releases.
//!
//! Resolves ISRC-based canonical links (Apple Music, Deezer, and a
//! multi-platform aggregator) and deterministic search fallbacks for every
//! other platform, then persists one link per provider per release.

pub mod cli;
pub mod config;
pub mod db;
pub mod diagnostics;
pub mod discovery;
pub mod error;
pub mod model;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(EnvFilter::from_default_env().add_directive("linkscout=info".parse().unwrap()))
        .init();

    cli::run_command(&args)
}
