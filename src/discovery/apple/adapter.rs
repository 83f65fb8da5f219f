//! Adapter layer: Convert Apple Music DTOs to domain models
//!
//! The interesting rule lives here: discovered links should point at albums,
//! and Apple song URLs embed the album URL (`.../album/{slug}/{albumId}?i={songId}`),
//! so the album URL is derived by truncating the song URL at the query string.

use super::dto;
use crate::discovery::domain::{CanonicalHit, DiscoverySource};
use crate::discovery::provider::Provider;

/// Derive the album URL from a catalog song URL.
///
/// Returns `None` when the URL doesn't follow the `/album/{slug}/{id}` shape
/// we know how to truncate.
pub fn album_url_from_song_url(url: &str) -> Option<String> {
    if !url.contains("/album/") {
        return None;
    }
    // Dropping `?i={songId}` leaves the canonical album page.
    let base = url.split('?').next().unwrap_or(url);
    Some(base.to_string())
}

/// Convert a catalog song to a hit, when its attributes carry a usable URL.
///
/// The album id from the `albums` relationship is preferred as the provider
/// id; the song id is the fallback.
pub fn hit_from_catalog_song(song: &dto::Song) -> Option<CanonicalHit> {
    let url = song.attributes.as_ref()?.url.as_deref()?;
    let album_url = album_url_from_song_url(url)?;

    let album_id = song
        .relationships
        .as_ref()
        .and_then(|r| r.albums.as_ref())
        .and_then(|a| a.data.first())
        .map(|r| r.id.clone());

    Some(CanonicalHit {
        provider: Provider::AppleMusic,
        url: album_url,
        provider_id: Some(album_id.unwrap_or_else(|| song.id.clone())),
        source: DiscoverySource::AppleMusicApi,
    })
}

/// Convert an albums-relationship response (the secondary lookup) to a hit.
pub fn hit_from_albums(response: &dto::AlbumsResponse) -> Option<CanonicalHit> {
    let album = response.data.first()?;
    let url = album.attributes.as_ref()?.url.as_deref()?;

    Some(CanonicalHit {
        provider: Provider::AppleMusic,
        url: url.to_string(),
        provider_id: Some(album.id.clone()),
        source: DiscoverySource::AppleMusicApi,
    })
}

/// Convert an iTunes lookup response to a hit.
///
/// Prefers the collection (album) view URL and id over the track's.
pub fn hit_from_itunes(response: &dto::ItunesLookupResponse) -> Option<CanonicalHit> {
    let result = response.results.first()?;

    let (url, id) = match result.collection_view_url.as_deref() {
        Some(url) => (url, result.collection_id),
        None => (result.track_view_url.as_deref()?, result.track_id),
    };

    Some(CanonicalHit {
        provider: Provider::AppleMusic,
        url: url.to_string(),
        provider_id: id.map(|id| id.to_string()),
        source: DiscoverySource::ItunesSearch,
    })
}
