//! Link resolver - fans out to the lookup sources and reconciles one link
//! per requested provider.
//!
//! Precedence is explicit and evaluated after all lookups settle: a dedicated
//! catalog lookup (Apple Music, Deezer) overrides the aggregator for the same
//! provider. Providers with no canonical result after the merge receive a
//! deterministic search-fallback URL, so every requested provider always
//! resolves to exactly one link.

use std::collections::BTreeMap;

use super::domain::{DiscoverySource, LinkQuality, ProviderLink, TrackDescriptor};
use super::provider::Provider;
use super::search::build_search_url;
use super::traits::{AggregatorLookup, CatalogLookup};

/// Outcome of one resolution call.
#[derive(Debug, Clone, Default)]
pub struct ResolvedLinks {
    /// Exactly one link per requested provider.
    pub links: Vec<ProviderLink>,
    /// Non-fatal lookup failures, prefixed with the source name.
    pub errors: Vec<String>,
}

/// Resolves provider links for a single track.
///
/// All sources are optional so callers (and tests) can wire up any subset.
pub struct LinkResolver<'a> {
    pub apple: Option<&'a dyn CatalogLookup>,
    pub deezer: Option<&'a dyn CatalogLookup>,
    pub aggregator: Option<&'a dyn AggregatorLookup>,
}

impl LinkResolver<'_> {
    /// Resolve one link for each provider in `providers`.
    ///
    /// Without an ISRC no lookup runs at all - every requested provider gets
    /// a search fallback. With one, the Apple Music, Deezer and aggregator
    /// lookups run concurrently; an individual failure is recorded and that
    /// provider falls through to the fallback.
    pub async fn resolve(
        &self,
        track: &TrackDescriptor,
        providers: &[Provider],
        storefront: &str,
    ) -> ResolvedLinks {
        let mut canonical: BTreeMap<Provider, ProviderLink> = BTreeMap::new();
        let mut errors = Vec::new();

        if let Some(isrc) = track.isrc.as_deref() {
            let want_apple = providers.contains(&Provider::AppleMusic);
            let want_deezer = providers.contains(&Provider::Deezer);

            let apple_fut = async {
                match self.apple {
                    Some(client) if want_apple => {
                        Some((client.name(), client.lookup_isrc(isrc).await))
                    }
                    _ => None,
                }
            };
            let deezer_fut = async {
                match self.deezer {
                    Some(client) if want_deezer => {
                        Some((client.name(), client.lookup_isrc(isrc).await))
                    }
                    _ => None,
                }
            };
            let aggregator_fut = async {
                match self.aggregator {
                    Some(agg) if agg.is_available() => {
                        Some((agg.name(), agg.lookup_isrc(isrc).await))
                    }
                    _ => None,
                }
            };

            let (apple_res, deezer_res, aggregator_res) =
                tokio::join!(apple_fut, deezer_fut, aggregator_fut);

            // Aggregator first, so dedicated lookups override it below.
            if let Some((name, result)) = aggregator_res {
                match result {
                    Ok(hits) => {
                        for hit in hits {
                            if providers.contains(&hit.provider) {
                                canonical.insert(hit.provider, hit.into_link());
                            }
                        }
                    }
                    Err(e) => errors.push(format!("{name}: {e}")),
                }
            }

            for dedicated in [apple_res, deezer_res] {
                if let Some((name, result)) = dedicated {
                    match result {
                        Ok(Some(hit)) => {
                            canonical.insert(hit.provider, hit.into_link());
                        }
                        Ok(None) => {}
                        Err(e) => errors.push(format!("{name}: {e}")),
                    }
                }
            }
        }

        let mut links: Vec<ProviderLink> = Vec::with_capacity(providers.len());
        for &provider in providers {
            match canonical.remove(&provider) {
                Some(link) => links.push(link),
                None => links.push(ProviderLink {
                    provider,
                    url: build_search_url(provider, track, storefront),
                    provider_id: None,
                    quality: LinkQuality::SearchFallback,
                    discovered_from: DiscoverySource::Search.as_str().to_string(),
                }),
            }
        }

        ResolvedLinks { links, errors }
    }
}
