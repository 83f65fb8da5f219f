//! Core data models for the release catalog.
//!
//! Defines the rows link discovery operates on: [`Release`], [`ReleaseTrack`],
//! and [`ProviderLinkRecord`]. These are derived from SQLx for database
//! mapping.
//!
//! # Database Schema
//!
//! The models map to the following tables:
//! - `releases` - A release (album/single) with artist context
//! - `tracks` - Recordings belonging to a release, ordered by position
//! - `provider_links` - One link per (release, provider), upserted

use sqlx::FromRow;

use crate::discovery::domain::ProviderLink;

/// A release in the catalog.
#[derive(Debug, Clone, FromRow)]
pub struct Release {
    /// Database ID (auto-generated)
    pub id: i64,
    /// Release title
    pub title: String,
    /// Artist name, used for search-fallback context (may be absent)
    pub artist_name: Option<String>,
}

/// A track belonging to a release.
#[derive(Debug, Clone, FromRow)]
pub struct ReleaseTrack {
    /// Database ID (auto-generated)
    pub id: i64,
    /// Foreign key to releases table
    pub release_id: i64,
    /// Track order within the release (1-based)
    pub position: i64,
    /// Track title
    pub title: String,
    /// International Standard Recording Code, when ingested
    pub isrc: Option<String>,
    /// Duration in seconds
    pub duration_secs: Option<i64>,
}

/// A persisted provider link for a release.
///
/// `provider` and `quality` are stored as their wire keys so the table stays
/// readable without the enum definitions.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct ProviderLinkRecord {
    /// Foreign key to releases table
    pub release_id: i64,
    /// Provider wire key (e.g. `apple_music`)
    pub provider: String,
    /// The link URL
    pub url: String,
    /// The provider's own id for the linked resource
    pub provider_id: Option<String>,
    /// `canonical` or `search_fallback`
    pub quality: String,
    /// Provenance tag (which lookup produced this link)
    pub discovered_from: String,
}

impl ProviderLinkRecord {
    /// Build a record from a resolved link.
    pub fn from_link(release_id: i64, link: &ProviderLink) -> Self {
        Self {
            release_id,
            provider: link.provider.key().to_string(),
            url: link.url.clone(),
            provider_id: link.provider_id.clone(),
            quality: link.quality.as_str().to_string(),
            discovered_from: link.discovered_from.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::domain::LinkQuality;
    use crate::discovery::provider::Provider;

    #[test]
    fn test_record_from_link_uses_wire_keys() {
        let link = ProviderLink {
            provider: Provider::YoutubeMusic,
            url: "https://music.youtube.com/watch?v=abc".to_string(),
            provider_id: Some("abc".to_string()),
            quality: LinkQuality::Canonical,
            discovered_from: "musicfetch".to_string(),
        };

        let record = ProviderLinkRecord::from_link(7, &link);

        assert_eq!(record.release_id, 7);
        assert_eq!(record.provider, "youtube_music");
        assert_eq!(record.quality, "canonical");
        assert_eq!(record.discovered_from, "musicfetch");
    }
}
