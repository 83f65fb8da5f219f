//! Apple Music HTTP client
//!
//! Two lookup paths, tried in order:
//! 1. MusicKit catalog API (requires a developer token): ISRC filter on the
//!    songs endpoint, with a secondary relationship lookup when the song
//!    resource carries no resolvable album URL.
//! 2. Public iTunes lookup API (no credentials): used when no token is
//!    configured, when the catalog has no match, or when the native path
//!    fails (logged as a breadcrumb, never fatal).

use super::{adapter, dto};
use crate::discovery::client::FetchClient;
use crate::discovery::domain::{CanonicalHit, LookupError};

/// Apple Music client covering both the MusicKit catalog and iTunes lookup.
pub struct AppleMusicClient {
    fetch: FetchClient,
    catalog_base: String,
    lookup_base: String,
    developer_token: Option<String>,
    storefront: String,
}

impl AppleMusicClient {
    pub fn new(fetch: FetchClient, developer_token: Option<String>, storefront: impl Into<String>) -> Self {
        Self {
            fetch,
            catalog_base: "https://api.music.apple.com/v1".to_string(),
            lookup_base: "https://itunes.apple.com".to_string(),
            developer_token,
            storefront: storefront.into(),
        }
    }

    /// Create a client for testing with custom base URLs
    #[cfg(test)]
    pub fn with_base_urls(
        fetch: FetchClient,
        catalog_base: impl Into<String>,
        lookup_base: impl Into<String>,
        developer_token: Option<String>,
    ) -> Self {
        Self {
            fetch,
            catalog_base: catalog_base.into(),
            lookup_base: lookup_base.into(),
            developer_token,
            storefront: "us".to_string(),
        }
    }

    /// Look up a track by ISRC. `None` means no Apple Music match anywhere.
    pub async fn lookup_isrc(&self, isrc: &str) -> Result<Option<CanonicalHit>, LookupError> {
        if self.developer_token.is_some() {
            match self.lookup_catalog(isrc).await {
                Ok(Some(hit)) => return Ok(Some(hit)),
                Ok(None) => {}
                Err(e) => {
                    tracing::debug!(
                        isrc = %isrc,
                        error = %e,
                        "MusicKit catalog lookup failed, falling back to iTunes lookup"
                    );
                }
            }
        }

        self.lookup_itunes(isrc).await
    }

    /// MusicKit catalog path. Requires the developer token.
    async fn lookup_catalog(&self, isrc: &str) -> Result<Option<CanonicalHit>, LookupError> {
        let token = self
            .developer_token
            .as_deref()
            .ok_or(LookupError::MissingCredentials("Apple Music developer token"))?;
        let auth = [("authorization", format!("Bearer {token}"))];

        let url = format!(
            "{}/catalog/{}/songs?filter[isrc]={}",
            self.catalog_base,
            self.storefront,
            urlencoding::encode(isrc)
        );

        let response: dto::SongsResponse = self.fetch.get_json_as(&url, &auth).await?;

        let Some(song) = response.data.first() else {
            return Ok(None);
        };

        if let Some(hit) = adapter::hit_from_catalog_song(song) {
            return Ok(Some(hit));
        }

        // Song without a resolvable album URL: fetch the album relationship.
        let rel_url = format!(
            "{}/catalog/{}/songs/{}/albums",
            self.catalog_base, self.storefront, song.id
        );
        let albums: dto::AlbumsResponse = self.fetch.get_json_as(&rel_url, &auth).await?;

        Ok(adapter::hit_from_albums(&albums))
    }

    /// Public iTunes lookup path.
    async fn lookup_itunes(&self, isrc: &str) -> Result<Option<CanonicalHit>, LookupError> {
        let url = format!(
            "{}/lookup?isrc={}&entity=song",
            self.lookup_base,
            urlencoding::encode(isrc)
        );

        let response: dto::ItunesLookupResponse = self.fetch.get_json_as(&url, &[]).await?;

        Ok(adapter::hit_from_itunes(&response))
    }
}
