//! Release discovery orchestrator.
//!
//! The high-level flow for a release:
//! 1. Load its tracks and pick the first one (by position) carrying an ISRC
//! 2. Load the release row for artist-name context (tolerating its absence)
//! 3. Resolve links for every candidate provider via [`LinkResolver`]
//! 4. Persist each link through the injected repository, accumulating
//!    per-link failures without blocking siblings
//!
//! Batch runs are strictly sequential across releases: release N+1's lookups
//! do not start until release N's persistence has completed. One release
//! failing never aborts the batch.

use std::collections::BTreeSet;
use std::time::Duration;

use async_trait::async_trait;

use super::domain::{ReleaseDiscoveryResult, TrackDescriptor};
use super::provider::Provider;
use super::resolver::LinkResolver;
use crate::model::{ProviderLinkRecord, Release, ReleaseTrack};

/// Error message when a release has no tracks at all.
pub const NO_TRACKS_ERROR: &str = "No tracks found for release";
/// Error message when no track on the release carries an ISRC.
pub const NO_ISRC_ERROR: &str = "No ISRC found on any track";

/// A persistence-layer failure. Opaque on purpose: the discovery core makes
/// no assumption about the underlying storage technology.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{0}")]
pub struct RepositoryError(pub String);

/// The storage boundary the orchestrator talks to.
#[async_trait]
pub trait ReleaseRepository: Send + Sync {
    /// All tracks for a release, ordered by position.
    async fn tracks_for_release(&self, release_id: i64)
    -> Result<Vec<ReleaseTrack>, RepositoryError>;

    /// The release row, if it exists.
    async fn release_by_id(&self, release_id: i64) -> Result<Option<Release>, RepositoryError>;

    /// Insert or update one provider link.
    async fn upsert_provider_link(&self, link: &ProviderLinkRecord) -> Result<(), RepositoryError>;
}

/// Per-run discovery options.
#[derive(Debug, Clone)]
pub struct DiscoveryOptions {
    /// Exclude providers the release already has links for.
    pub skip_existing: bool,
    /// Storefront for region-scoped catalogs and search URLs.
    pub storefront: String,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self {
            skip_existing: true,
            storefront: "us".to_string(),
        }
    }
}

/// One release in a batch run, with the providers it already has links for.
#[derive(Debug, Clone)]
pub struct DiscoveryJob {
    pub release_id: i64,
    pub existing: BTreeSet<Provider>,
}

/// Orchestrates link discovery for releases.
pub struct DiscoveryService<'a> {
    repo: &'a dyn ReleaseRepository,
    resolver: LinkResolver<'a>,
}

impl<'a> DiscoveryService<'a> {
    pub fn new(repo: &'a dyn ReleaseRepository, resolver: LinkResolver<'a>) -> Self {
        Self { repo, resolver }
    }

    /// Discover and persist links for one release.
    ///
    /// Never fails as a whole: structural problems (no tracks, no ISRC) and
    /// per-link failures are reported through the result's `errors`.
    pub async fn discover_release(
        &self,
        release_id: i64,
        existing: &BTreeSet<Provider>,
        opts: &DiscoveryOptions,
    ) -> ReleaseDiscoveryResult {
        let mut result = ReleaseDiscoveryResult {
            release_id,
            discovered: Vec::new(),
            errors: Vec::new(),
        };

        let tracks = match self.repo.tracks_for_release(release_id).await {
            Ok(tracks) => tracks,
            Err(e) => {
                result.errors.push(format!("Failed to load tracks: {e}"));
                return result;
            }
        };

        if tracks.is_empty() {
            result.errors.push(NO_TRACKS_ERROR.to_string());
            return result;
        }

        // First track in release order with a usable ISRC; empty strings from
        // sloppy ingestion count as missing.
        let Some(track) = tracks
            .iter()
            .find(|t| t.isrc.as_deref().is_some_and(|i| !i.is_empty()))
        else {
            result.errors.push(NO_ISRC_ERROR.to_string());
            return result;
        };

        // Artist context is best-effort: a missing release row or missing
        // metadata degrades the search fallbacks, it never fails the run.
        let artist_name = match self.repo.release_by_id(release_id).await {
            Ok(release) => release.and_then(|r| r.artist_name).unwrap_or_default(),
            Err(e) => {
                tracing::warn!(release_id, error = %e, "Failed to load release, continuing without artist context");
                String::new()
            }
        };

        let candidates: Vec<Provider> = if opts.skip_existing {
            Provider::default_discovery()
                .into_iter()
                .filter(|p| !existing.contains(p))
                .collect()
        } else {
            Provider::default_discovery()
        };

        let descriptor = TrackDescriptor {
            title: track.title.clone(),
            artist_name,
            isrc: track.isrc.clone(),
            duration: track
                .duration_secs
                .and_then(|s| u64::try_from(s).ok())
                .map(Duration::from_secs),
        };

        let resolved = self
            .resolver
            .resolve(&descriptor, &candidates, &opts.storefront)
            .await;
        result.errors.extend(resolved.errors);

        for link in resolved.links {
            let record = ProviderLinkRecord::from_link(release_id, &link);
            match self.repo.upsert_provider_link(&record).await {
                Ok(()) => result.discovered.push(link),
                Err(e) => {
                    result
                        .errors
                        .push(format!("{}: {e}", link.provider.display_name()));
                }
            }
        }

        tracing::info!(
            release_id,
            discovered = result.discovered.len(),
            errors = result.errors.len(),
            "Release discovery complete"
        );

        result
    }

    /// Discover links for several releases, strictly one after another.
    ///
    /// Returns one result per job, in input order. A failed release never
    /// blocks its siblings.
    pub async fn discover_releases(
        &self,
        jobs: &[DiscoveryJob],
        opts: &DiscoveryOptions,
    ) -> Vec<ReleaseDiscoveryResult> {
        let mut results = Vec::with_capacity(jobs.len());

        for job in jobs {
            let result = self
                .discover_release(job.release_id, &job.existing, opts)
                .await;
            results.push(result);
        }

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::domain::{CanonicalHit, DiscoverySource, LinkQuality};
    use crate::discovery::traits::mocks::{MockAggregator, MockCatalog};
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory repository with configurable failures.
    struct MockRepo {
        tracks: HashMap<i64, Vec<ReleaseTrack>>,
        releases: HashMap<i64, Release>,
        fail_upsert_for: Vec<&'static str>,
        saved: Mutex<Vec<ProviderLinkRecord>>,
    }

    impl MockRepo {
        fn new() -> Self {
            Self {
                tracks: HashMap::new(),
                releases: HashMap::new(),
                fail_upsert_for: Vec::new(),
                saved: Mutex::new(Vec::new()),
            }
        }

        fn with_release(mut self, id: i64, artist: Option<&str>, tracks: Vec<ReleaseTrack>) -> Self {
            self.releases.insert(
                id,
                Release {
                    id,
                    title: format!("Release {id}"),
                    artist_name: artist.map(String::from),
                },
            );
            self.tracks.insert(id, tracks);
            self
        }

        fn saved(&self) -> Vec<ProviderLinkRecord> {
            self.saved.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ReleaseRepository for MockRepo {
        async fn tracks_for_release(
            &self,
            release_id: i64,
        ) -> Result<Vec<ReleaseTrack>, RepositoryError> {
            Ok(self.tracks.get(&release_id).cloned().unwrap_or_default())
        }

        async fn release_by_id(&self, release_id: i64) -> Result<Option<Release>, RepositoryError> {
            Ok(self.releases.get(&release_id).cloned())
        }

        async fn upsert_provider_link(
            &self,
            link: &ProviderLinkRecord,
        ) -> Result<(), RepositoryError> {
            if self.fail_upsert_for.iter().any(|p| *p == link.provider) {
                return Err(RepositoryError("disk full".to_string()));
            }
            self.saved.lock().unwrap().push(link.clone());
            Ok(())
        }
    }

    fn track(release_id: i64, position: i64, isrc: Option<&str>) -> ReleaseTrack {
        ReleaseTrack {
            id: position,
            release_id,
            position,
            title: format!("Track {position}"),
            isrc: isrc.map(String::from),
            duration_secs: Some(200),
        }
    }

    fn empty_resolver() -> LinkResolver<'static> {
        LinkResolver {
            apple: None,
            deezer: None,
            aggregator: None,
        }
    }

    #[tokio::test]
    async fn test_no_tracks_is_terminal() {
        let repo = MockRepo::new().with_release(1, Some("Queen"), vec![]);
        let service = DiscoveryService::new(&repo, empty_resolver());

        let result = service
            .discover_release(1, &BTreeSet::new(), &DiscoveryOptions::default())
            .await;

        assert!(result.discovered.is_empty());
        assert_eq!(result.errors, vec![NO_TRACKS_ERROR.to_string()]);
        assert!(repo.saved().is_empty());
    }

    #[tokio::test]
    async fn test_no_isrc_on_any_track_is_terminal() {
        let repo = MockRepo::new().with_release(
            1,
            Some("Queen"),
            vec![track(1, 1, None), track(1, 2, Some(""))],
        );
        let service = DiscoveryService::new(&repo, empty_resolver());

        let result = service
            .discover_release(1, &BTreeSet::new(), &DiscoveryOptions::default())
            .await;

        assert!(result.discovered.is_empty());
        assert_eq!(result.errors, vec![NO_ISRC_ERROR.to_string()]);
    }

    #[tokio::test]
    async fn test_first_track_with_isrc_is_selected_by_order() {
        let repo = MockRepo::new().with_release(
            1,
            None,
            vec![
                track(1, 1, None),
                track(1, 2, Some("GBUM71029604")),
                track(1, 3, Some("GBUM71029605")),
            ],
        );
        // No lookup sources wired: everything falls back to search, and the
        // fallback URL carries the selected track's title.
        let service = DiscoveryService::new(&repo, empty_resolver());

        let result = service
            .discover_release(1, &BTreeSet::new(), &DiscoveryOptions::default())
            .await;

        assert!(result.errors.is_empty());
        assert!(result.discovered.iter().all(|l| l.url.contains("Track%202")));
    }

    #[tokio::test]
    async fn test_skip_existing_excludes_providers_even_with_hits() {
        let apple_hit = CanonicalHit {
            provider: Provider::AppleMusic,
            url: "https://music.apple.com/us/album/x/1".to_string(),
            provider_id: Some("1".to_string()),
            source: DiscoverySource::AppleMusicApi,
        };
        let apple = MockCatalog::hit("Apple Music", apple_hit);
        let deezer = MockCatalog::hit(
            "Deezer",
            CanonicalHit {
                provider: Provider::Deezer,
                url: "https://www.deezer.com/album/2".to_string(),
                provider_id: Some("2".to_string()),
                source: DiscoverySource::DeezerApi,
            },
        );
        let resolver = LinkResolver {
            apple: Some(&apple),
            deezer: Some(&deezer),
            aggregator: None,
        };

        let repo =
            MockRepo::new().with_release(1, Some("Queen"), vec![track(1, 1, Some("GBUM71029604"))]);
        let service = DiscoveryService::new(&repo, resolver);

        let existing: BTreeSet<Provider> =
            [Provider::AppleMusic, Provider::Deezer].into_iter().collect();
        let result = service
            .discover_release(1, &existing, &DiscoveryOptions::default())
            .await;

        assert!(
            !result
                .discovered
                .iter()
                .any(|l| l.provider == Provider::AppleMusic || l.provider == Provider::Deezer)
        );
        assert_eq!(result.discovered.len(), 13); // 15 defaults minus the 2 existing
    }

    #[tokio::test]
    async fn test_skip_existing_disabled_keeps_all_candidates() {
        let repo =
            MockRepo::new().with_release(1, Some("Queen"), vec![track(1, 1, Some("GBUM71029604"))]);
        let service = DiscoveryService::new(&repo, empty_resolver());

        let existing: BTreeSet<Provider> = [Provider::AppleMusic].into_iter().collect();
        let opts = DiscoveryOptions {
            skip_existing: false,
            ..DiscoveryOptions::default()
        };
        let result = service.discover_release(1, &existing, &opts).await;

        assert_eq!(result.discovered.len(), 15);
    }

    #[tokio::test]
    async fn test_persistence_failure_does_not_block_other_links() {
        let repo = MockRepo {
            fail_upsert_for: vec!["deezer"],
            ..MockRepo::new().with_release(1, Some("Queen"), vec![track(1, 1, Some("GB1"))])
        };
        let service = DiscoveryService::new(&repo, empty_resolver());

        let result = service
            .discover_release(1, &BTreeSet::new(), &DiscoveryOptions::default())
            .await;

        assert_eq!(result.discovered.len(), 14);
        assert_eq!(result.errors, vec!["Deezer: disk full".to_string()]);
        assert_eq!(repo.saved().len(), 14);
    }

    #[tokio::test]
    async fn test_missing_release_defaults_artist_to_empty() {
        let mut repo = MockRepo::new();
        repo.tracks.insert(1, vec![track(1, 1, Some("GB1"))]);
        // No release row at all.
        let service = DiscoveryService::new(&repo, empty_resolver());

        let result = service
            .discover_release(1, &BTreeSet::new(), &DiscoveryOptions::default())
            .await;

        assert!(result.errors.is_empty());
        // Search fallback built from title only.
        assert!(result.discovered.iter().all(|l| l.url.contains("Track%201")));
    }

    #[tokio::test]
    async fn test_batch_continues_past_failed_release() {
        let repo = MockRepo::new()
            .with_release(1, Some("A"), vec![track(1, 1, Some("ISRC1"))])
            .with_release(2, Some("B"), vec![])
            .with_release(3, Some("C"), vec![track(3, 1, Some("ISRC3"))]);
        let service = DiscoveryService::new(&repo, empty_resolver());

        let jobs: Vec<DiscoveryJob> = [1, 2, 3]
            .into_iter()
            .map(|release_id| DiscoveryJob {
                release_id,
                existing: BTreeSet::new(),
            })
            .collect();

        let results = service
            .discover_releases(&jobs, &DiscoveryOptions::default())
            .await;

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].release_id, 1);
        assert_eq!(results[1].release_id, 2);
        assert_eq!(results[2].release_id, 3);

        assert!(!results[0].discovered.is_empty());
        assert_eq!(results[1].errors, vec![NO_TRACKS_ERROR.to_string()]);
        assert!(results[1].discovered.is_empty());
        assert!(!results[2].discovered.is_empty());
    }

    #[tokio::test]
    async fn test_resolver_errors_surface_in_result() {
        use crate::discovery::client::FetchError;
        use crate::discovery::domain::LookupError;

        let deezer = MockCatalog::failing("Deezer", LookupError::Fetch(FetchError::RateLimited));
        let aggregator = MockAggregator::unavailable();
        let resolver = LinkResolver {
            apple: None,
            deezer: Some(&deezer),
            aggregator: Some(&aggregator),
        };

        let repo = MockRepo::new().with_release(1, Some("Queen"), vec![track(1, 1, Some("GB1"))]);
        let service = DiscoveryService::new(&repo, resolver);

        let result = service
            .discover_release(1, &BTreeSet::new(), &DiscoveryOptions::default())
            .await;

        assert!(result.errors.iter().any(|e| e.starts_with("Deezer: ")));
        // Deezer still got a search fallback link.
        let deezer_link = result
            .discovered
            .iter()
            .find(|l| l.provider == Provider::Deezer)
            .unwrap();
        assert_eq!(deezer_link.quality, LinkQuality::SearchFallback);
    }
}
