//! Internal domain models for link discovery.
//!
//! These types are OUR types - they don't change when external APIs change.
//! All external API responses get converted into these types via adapters.

use std::time::Duration;

use serde::Serialize;

use super::client::FetchError;
use super::provider::Provider;

/// The track identity used to query external catalogs. Immutable input to all
/// lookups.
#[derive(Debug, Clone)]
pub struct TrackDescriptor {
    /// Track title
    pub title: String,
    /// Artist name (used in search fallback URLs; may be empty)
    pub artist_name: String,
    /// International Standard Recording Code, when known
    pub isrc: Option<String>,
    /// Track duration, when known
    pub duration: Option<Duration>,
}

/// How trustworthy a discovered link is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkQuality {
    /// Returned by an authoritative catalog lookup.
    Canonical,
    /// Synthesized "search on this platform" URL.
    SearchFallback,
}

impl LinkQuality {
    pub fn as_str(self) -> &'static str {
        match self {
            LinkQuality::Canonical => "canonical",
            LinkQuality::SearchFallback => "search_fallback",
        }
    }
}

/// Which lookup produced a link. Persisted as the provenance tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoverySource {
    /// MusicKit catalog API (developer-token path)
    AppleMusicApi,
    /// Public iTunes lookup API
    ItunesSearch,
    /// Deezer ISRC endpoint
    DeezerApi,
    /// MusicFetch aggregator
    Musicfetch,
    /// Search-URL fallback builder
    Search,
}

impl DiscoverySource {
    pub fn as_str(self) -> &'static str {
        match self {
            DiscoverySource::AppleMusicApi => "apple_music_api",
            DiscoverySource::ItunesSearch => "itunes_search",
            DiscoverySource::DeezerApi => "deezer_api",
            DiscoverySource::Musicfetch => "musicfetch",
            DiscoverySource::Search => "search",
        }
    }
}

/// One resolved link for one provider. At most one per provider per
/// resolution call.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderLink {
    pub provider: Provider,
    pub url: String,
    /// The provider's own identifier for the linked resource, when known
    pub provider_id: Option<String>,
    pub quality: LinkQuality,
    /// Provenance tag (a [`DiscoverySource`] wire value)
    pub discovered_from: String,
}

/// A canonical match returned by one lookup source, before merge.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalHit {
    pub provider: Provider,
    pub url: String,
    pub provider_id: Option<String>,
    pub source: DiscoverySource,
}

impl CanonicalHit {
    /// Promote this hit into a canonical [`ProviderLink`].
    pub fn into_link(self) -> ProviderLink {
        ProviderLink {
            provider: self.provider,
            url: self.url,
            provider_id: self.provider_id,
            quality: LinkQuality::Canonical,
            discovered_from: self.source.as_str().to_string(),
        }
    }
}

/// Outcome of one discovery invocation for one release.
///
/// `errors` accumulates non-fatal lookup and persistence failures without
/// discarding successful discoveries - partial success is the normal case.
#[derive(Debug, Clone)]
pub struct ReleaseDiscoveryResult {
    pub release_id: i64,
    pub discovered: Vec<ProviderLink>,
    pub errors: Vec<String>,
}

/// Errors from a single provider lookup.
///
/// "Not found" is never an error - lookups return `None`/empty for misses.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LookupError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("missing credentials: {0}")]
    MissingCredentials(&'static str),

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}
