//! Trait definitions for the lookup sources.
//!
//! These traits enable dependency injection and mocking for tests.
//! Production code uses the real client implementations, while tests
//! substitute mock implementations into the resolver.

use async_trait::async_trait;

use super::apple::AppleMusicClient;
use super::deezer::DeezerClient;
use super::domain::{CanonicalHit, LookupError};
use super::musicfetch::MusicfetchClient;

/// A dedicated per-provider catalog lookup (Apple Music, Deezer).
#[async_trait]
pub trait CatalogLookup: Send + Sync {
    /// Source name used as the prefix on accumulated error strings.
    fn name(&self) -> &'static str;

    /// Look up a track by ISRC. `Ok(None)` means not found - never an error.
    async fn lookup_isrc(&self, isrc: &str) -> Result<Option<CanonicalHit>, LookupError>;
}

/// A multi-provider aggregator lookup (MusicFetch).
#[async_trait]
pub trait AggregatorLookup: Send + Sync {
    /// Source name used as the prefix on accumulated error strings.
    fn name(&self) -> &'static str;

    /// Whether the aggregator can be consulted at all (credential gate).
    fn is_available(&self) -> bool;

    /// Look up all platform links for an ISRC. Empty means not found.
    async fn lookup_isrc(&self, isrc: &str) -> Result<Vec<CanonicalHit>, LookupError>;
}

// Implement traits for real clients

#[async_trait]
impl CatalogLookup for AppleMusicClient {
    fn name(&self) -> &'static str {
        "Apple Music"
    }

    async fn lookup_isrc(&self, isrc: &str) -> Result<Option<CanonicalHit>, LookupError> {
        self.lookup_isrc(isrc).await
    }
}

#[async_trait]
impl CatalogLookup for DeezerClient {
    fn name(&self) -> &'static str {
        "Deezer"
    }

    async fn lookup_isrc(&self, isrc: &str) -> Result<Option<CanonicalHit>, LookupError> {
        self.lookup_isrc(isrc).await
    }
}

#[async_trait]
impl AggregatorLookup for MusicfetchClient {
    fn name(&self) -> &'static str {
        "Musicfetch"
    }

    fn is_available(&self) -> bool {
        self.is_available()
    }

    async fn lookup_isrc(&self, isrc: &str) -> Result<Vec<CanonicalHit>, LookupError> {
        self.lookup_isrc(isrc).await
    }
}
