//! Provider link discovery.
//!
//! Finds streaming-platform links for releases by ISRC. Three lookup sources
//! feed a single resolver:
//! - `apple` - Apple Music catalog (MusicKit) with an iTunes Search fallback
//! - `deezer` - the public Deezer track-by-ISRC endpoint
//! - `musicfetch` - a paid aggregator returning links for many platforms at once
//!
//! The resolver reconciles the sources into exactly one link per requested
//! provider, backfilling with deterministic search URLs where no canonical
//! link was found. The service ties resolution to the release catalog and
//! persists the outcome.
//!
//! Module layout follows a strict separation:
//! - `dto.rs` files mirror each API's wire format exactly
//! - `adapter.rs` files are the only place DTOs become domain types
//! - `client.rs` files own transport, auth and endpoint URLs
//! - `traits.rs` defines the seams the resolver and tests plug into

pub mod apple;
pub mod client;
pub mod deezer;
pub mod domain;
pub mod musicfetch;
pub mod provider;
pub mod resolver;
pub mod search;
pub mod service;
pub mod traits;

pub use client::FetchClient;
pub use domain::{ProviderLink, ReleaseDiscoveryResult, TrackDescriptor};
pub use provider::Provider;
pub use resolver::LinkResolver;
pub use service::{DiscoveryJob, DiscoveryOptions, DiscoveryService};
