//! Apple Music API Data Transfer Objects
//!
//! Two distinct response families live here:
//! - MusicKit catalog responses (`SongsResponse`, `AlbumsResponse`) from
//!   `api.music.apple.com`, used when a developer token is configured.
//! - iTunes lookup responses (`ItunesLookupResponse`) from the public
//!   `itunes.apple.com` API, the tokenless fallback path.
//!
//! These types match EXACTLY what the APIs return. DO NOT use them outside
//! the apple module - convert to domain types via the adapter.

use serde::{Deserialize, Serialize};

// ============================================================================
// MusicKit catalog
// ============================================================================

/// Response from `GET /v1/catalog/{storefront}/songs?filter[isrc]=...`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SongsResponse {
    #[serde(default)]
    pub data: Vec<Song>,
}

/// One catalog song resource.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Song {
    pub id: String,
    pub attributes: Option<SongAttributes>,
    pub relationships: Option<SongRelationships>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SongAttributes {
    pub name: Option<String>,
    /// Canonical song URL; carries the album path plus an `?i=` song selector
    pub url: Option<String>,
    pub album_name: Option<String>,
    pub isrc: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SongRelationships {
    pub albums: Option<RelationshipData>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RelationshipData {
    #[serde(default)]
    pub data: Vec<ResourceRef>,
}

/// A bare resource reference inside a relationship.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResourceRef {
    pub id: String,
}

/// Response from `GET /v1/catalog/{storefront}/songs/{id}/albums`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AlbumsResponse {
    #[serde(default)]
    pub data: Vec<Album>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Album {
    pub id: String,
    pub attributes: Option<AlbumAttributes>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AlbumAttributes {
    pub url: Option<String>,
}

// ============================================================================
// iTunes public lookup
// ============================================================================

/// Response from `GET https://itunes.apple.com/lookup?isrc=...`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItunesLookupResponse {
    #[serde(default)]
    pub result_count: u32,
    #[serde(default)]
    pub results: Vec<ItunesResult>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItunesResult {
    pub track_id: Option<u64>,
    pub track_view_url: Option<String>,
    pub collection_id: Option<u64>,
    pub collection_view_url: Option<String>,
}

// ============================================================================
// CONTRACT TESTS
// These verify our DTOs match what the real APIs return.
// ============================================================================
