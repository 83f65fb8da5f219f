//! Deezer API Data Transfer Objects
//!
//! These types match EXACTLY what the Deezer API returns.
//! DO NOT use these types outside the deezer module - convert to domain types.
//!
//! API Reference: https://developers.deezer.com/api/track
//!
//! The `/track/isrc:{ISRC}` endpoint answers HTTP 200 for misses too, with an
//! `error` object in the body instead of track data.

use serde::{Deserialize, Serialize};

/// Response from `GET /track/isrc:{ISRC}`.
///
/// All fields are optional: a miss carries only `error`, and even hits have
/// been observed without an `album` object.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TrackResponse {
    /// Deezer track id
    pub id: Option<u64>,
    /// Canonical track page URL
    pub link: Option<String>,
    /// Album containing this track
    pub album: Option<AlbumRef>,
    /// Present when the lookup missed or failed
    pub error: Option<ApiError>,
}

/// Embedded album reference.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AlbumRef {
    /// Deezer album id
    pub id: Option<u64>,
    /// Canonical album page URL
    pub link: Option<String>,
}

/// Error object returned in the body of a 200 response.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiError {
    #[serde(rename = "type")]
    pub error_type: Option<String>,
    pub message: Option<String>,
    pub code: Option<u32>,
}

// ============================================================================
// CONTRACT TESTS
// These verify our DTOs match what the real API returns.
// ============================================================================

#[cfg(test)]
mod contract_tests {
    use super::*;

    #[test]
    fn test_parse_track_hit() {
        let json = r#"{
            "id": 3135556,
            "link": "https://www.deezer.com/track/3135556",
            "album": {
                "id": 302127,
                "link": "https://www.deezer.com/album/302127"
            }
        }"#;

        let response: TrackResponse = serde_json::from_str(json).expect("Should parse track hit");

        assert_eq!(response.id, Some(3135556));
        assert_eq!(
            response.link.as_deref(),
            Some("https://www.deezer.com/track/3135556")
        );
        let album = response.album.unwrap();
        assert_eq!(album.id, Some(302127));
        assert!(response.error.is_none());
    }

    #[test]
    fn test_parse_miss_with_error_object() {
        let json = r#"{
            "error": {
                "type": "DataException",
                "message": "no data",
                "code": 800
            }
        }"#;

        let response: TrackResponse = serde_json::from_str(json).expect("Should parse miss");

        assert!(response.id.is_none());
        let error = response.error.unwrap();
        assert_eq!(error.error_type.as_deref(), Some("DataException"));
        assert_eq!(error.code, Some(800));
    }

    #[test]
    fn test_parse_hit_without_album() {
        let json = r#"{
            "id": 42,
            "link": "https://www.deezer.com/track/42"
        }"#;

        let response: TrackResponse = serde_json::from_str(json).expect("Should parse");

        assert_eq!(response.id, Some(42));
        assert!(response.album.is_none());
    }
}
