//! Deezer HTTP client
//!
//! Looks up tracks by ISRC via the public Deezer API. No credentials needed.
//! See: https://developers.deezer.com/api

use super::{adapter, dto};
use crate::discovery::client::FetchClient;
use crate::discovery::domain::{CanonicalHit, LookupError};

/// Deezer API client
pub struct DeezerClient {
    fetch: FetchClient,
    base_url: String,
}

impl DeezerClient {
    pub fn new(fetch: FetchClient) -> Self {
        Self {
            fetch,
            base_url: "https://api.deezer.com".to_string(),
        }
    }

    /// Create a client for testing with custom base URL
    #[cfg(test)]
    pub fn with_base_url(fetch: FetchClient, base_url: impl Into<String>) -> Self {
        Self {
            fetch,
            base_url: base_url.into(),
        }
    }

    /// Look up a track by ISRC. `None` means Deezer has no match.
    pub async fn lookup_isrc(&self, isrc: &str) -> Result<Option<CanonicalHit>, LookupError> {
        let url = format!("{}/track/isrc:{}", self.base_url, urlencoding::encode(isrc));

        let response: dto::TrackResponse = self.fetch.get_json_as(&url, &[]).await?;

        Ok(adapter::to_hit(&response))
    }
}
