//! MusicFetch API Data Transfer Objects
//!
//! One ISRC lookup returns links for many platforms at once, keyed by the
//! provider's snake_case id. These types match EXACTLY what the API returns;
//! convert to domain types in the client.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Response from the ISRC lookup endpoint.
///
/// A miss omits the `links` object entirely; the API never returns a partial
/// response with `links` absent but other data present.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct IsrcResponse {
    /// Map of provider key to canonical URL
    pub links: Option<HashMap<String, String>>,
}

#[cfg(test)]
mod contract_tests {
    use super::*;

    #[test]
    fn test_parse_links_map() {
        let json = r#"{
            "links": {
                "tidal": "https://tidal.com/browse/track/77646168",
                "youtube": "https://www.youtube.com/watch?v=fJ9rUzIMcZQ",
                "amazon_music": "https://music.amazon.com/albums/B001235"
            }
        }"#;

        let response: IsrcResponse = serde_json::from_str(json).expect("Should parse links");

        let links = response.links.unwrap();
        assert_eq!(links.len(), 3);
        assert_eq!(
            links.get("youtube").map(String::as_str),
            Some("https://www.youtube.com/watch?v=fJ9rUzIMcZQ")
        );
    }

    #[test]
    fn test_parse_miss_without_links() {
        let response: IsrcResponse = serde_json::from_str("{}").expect("Should parse miss");
        assert!(response.links.is_none());
    }
}
