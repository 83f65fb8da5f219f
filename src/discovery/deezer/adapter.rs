//! Adapter layer: Convert Deezer DTOs to domain models
//!
//! This is the ONLY place where Deezer DTO types become domain types.
//! Not-found semantics live here: an `error` object, or a response missing
//! either the track id or the track link, yields `None` rather than an error.

use super::dto;
use crate::discovery::domain::{CanonicalHit, DiscoverySource};
use crate::discovery::provider::Provider;

/// Convert a track response to a canonical hit, or `None` for a miss.
///
/// When the response carries album data, the album URL and album id take
/// precedence over the track URL and id - release links point at albums.
pub fn to_hit(response: &dto::TrackResponse) -> Option<CanonicalHit> {
    if response.error.is_some() {
        return None;
    }

    // Both must be present for a usable hit; Deezer has returned partial
    // objects in the wild.
    let track_id = response.id?;
    let track_link = response.link.as_deref()?;

    let album = response.album.as_ref();
    let album_link = album.and_then(|a| a.link.as_deref());
    let album_id = album.and_then(|a| a.id);

    let (url, provider_id) = match album_link {
        Some(link) => (link.to_string(), album_id.unwrap_or(track_id)),
        None => (track_link.to_string(), track_id),
    };

    Some(CanonicalHit {
        provider: Provider::Deezer,
        url,
        provider_id: Some(provider_id.to_string()),
        source: DiscoverySource::DeezerApi,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit_response() -> dto::TrackResponse {
        dto::TrackResponse {
            id: Some(3135556),
            link: Some("https://www.deezer.com/track/3135556".to_string()),
            album: Some(dto::AlbumRef {
                id: Some(302127),
                link: Some("https://www.deezer.com/album/302127".to_string()),
            }),
            error: None,
        }
    }

    #[test]
    fn test_album_preferred_over_track() {
        let hit = to_hit(&hit_response()).unwrap();

        assert_eq!(hit.url, "https://www.deezer.com/album/302127");
        assert_eq!(hit.provider_id.as_deref(), Some("302127"));
        assert_eq!(hit.provider, Provider::Deezer);
        assert_eq!(hit.source, DiscoverySource::DeezerApi);
    }

    #[test]
    fn test_error_object_is_a_miss() {
        let mut response = hit_response();
        response.error = Some(dto::ApiError {
            error_type: Some("DataException".to_string()),
            message: Some("no data".to_string()),
            code: Some(800),
        });

        assert!(to_hit(&response).is_none());
    }

    #[test]
    fn test_id_without_link_is_a_miss() {
        let mut response = hit_response();
        response.link = None;

        assert!(to_hit(&response).is_none());
    }

    #[test]
    fn test_link_without_id_is_a_miss() {
        let mut response = hit_response();
        response.id = None;

        assert!(to_hit(&response).is_none());
    }

    #[test]
    fn test_missing_album_falls_back_to_track() {
        let mut response = hit_response();
        response.album = None;

        let hit = to_hit(&response).unwrap();

        assert_eq!(hit.url, "https://www.deezer.com/track/3135556");
        assert_eq!(hit.provider_id.as_deref(), Some("3135556"));
    }

    #[test]
    fn test_album_without_id_still_uses_album_link() {
        let mut response = hit_response();
        response.album = Some(dto::AlbumRef {
            id: None,
            link: Some("https://www.deezer.com/album/302127".to_string()),
        });

        let hit = to_hit(&response).unwrap();

        // Album URL wins; the id gracefully falls back to the track id.
        assert_eq!(hit.url, "https://www.deezer.com/album/302127");
        assert_eq!(hit.provider_id.as_deref(), Some("3135556"));
    }
}
