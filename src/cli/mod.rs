//! Command-line interface for linkscout.
//!
//! This module provides CLI commands for importing releases, resolving and
//! discovering provider links, and replaying performance samples.

mod commands;

pub use commands::{Cli, Commands, run_command};
