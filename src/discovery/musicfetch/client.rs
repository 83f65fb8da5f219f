//! MusicFetch aggregator HTTP client
//!
//! A commercial aggregator that resolves one ISRC to canonical links on many
//! platforms in a single call. Only consulted when a token is configured;
//! unknown provider keys in the response are logged and dropped (the provider
//! vocabulary is closed).

use super::dto;
use crate::discovery::client::FetchClient;
use crate::discovery::domain::{CanonicalHit, DiscoverySource, LookupError};
use crate::discovery::provider::Provider;

/// MusicFetch API client
pub struct MusicfetchClient {
    fetch: FetchClient,
    base_url: String,
    token: Option<String>,
}

impl MusicfetchClient {
    pub fn new(fetch: FetchClient, token: Option<String>) -> Self {
        Self {
            fetch,
            base_url: "https://api.musicfetch.io".to_string(),
            token,
        }
    }

    /// Create a client for testing with custom base URL
    #[cfg(test)]
    pub fn with_base_url(
        fetch: FetchClient,
        base_url: impl Into<String>,
        token: Option<String>,
    ) -> Self {
        Self {
            fetch,
            base_url: base_url.into(),
            token,
        }
    }

    /// The aggregator is only usable with a token.
    pub fn is_available(&self) -> bool {
        self.token.is_some()
    }

    /// Look up all known platform links for an ISRC.
    ///
    /// An empty vec means the aggregator has no match.
    pub async fn lookup_isrc(&self, isrc: &str) -> Result<Vec<CanonicalHit>, LookupError> {
        let token = self
            .token
            .as_deref()
            .ok_or(LookupError::MissingCredentials("MusicFetch token"))?;

        let url = format!("{}/isrc?isrc={}", self.base_url, urlencoding::encode(isrc));
        let headers = [("x-token", token.to_string())];

        let response: dto::IsrcResponse = self.fetch.get_json_as(&url, &headers).await?;

        let Some(links) = response.links else {
            return Ok(Vec::new());
        };

        let mut hits = Vec::with_capacity(links.len());
        for (key, url) in links {
            match Provider::from_key(&key) {
                Some(provider) => hits.push(CanonicalHit {
                    provider,
                    url,
                    provider_id: None,
                    source: DiscoverySource::Musicfetch,
                }),
                None => {
                    tracing::debug!(key = %key, "Dropping unknown provider key from MusicFetch");
                }
            }
        }

        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn fetch() -> FetchClient {
        FetchClient::new(Duration::from_secs(10), 1)
    }

    #[test]
    fn test_availability_follows_token() {
        assert!(!MusicfetchClient::new(fetch(), None).is_available());
        assert!(MusicfetchClient::new(fetch(), Some("tok".to_string())).is_available());
    }

    #[tokio::test]
    async fn test_lookup_without_token_is_a_credential_error() {
        let client = MusicfetchClient::new(fetch(), None);
        let result = client.lookup_isrc("USUM71703861").await;
        assert!(matches!(result, Err(LookupError::MissingCredentials(_))));
    }
}
