//! Release discovery command: resolve and persist links for stored releases.

use std::collections::BTreeSet;
use std::path::Path;

use tokio::runtime::Runtime;
use tracing::info;

use crate::config::Config;
use crate::db;
use crate::discovery::resolver::LinkResolver;
use crate::discovery::service::{DiscoveryJob, DiscoveryOptions, DiscoveryService};
use crate::discovery::traits::{AggregatorLookup, CatalogLookup};

use super::{build_clients, effective_storefront};

/// Run discovery for one release, or every release when no ID is given.
#[allow(clippy::too_many_arguments)]
pub fn cmd_discover(
    rt: &Runtime,
    config: &Config,
    release_id: Option<i64>,
    db_path: &Path,
    include_existing: bool,
    storefront: Option<&str>,
    apple_token: Option<&str>,
    musicfetch_token: Option<&str>,
) -> anyhow::Result<()> {
    let clients = build_clients(config, storefront, apple_token, musicfetch_token);
    let opts = DiscoveryOptions {
        skip_existing: config.discovery.skip_existing && !include_existing,
        storefront: effective_storefront(config, storefront),
    };

    rt.block_on(async {
        let pool = db::init_db(&db::db_url(Some(db_path))).await?;

        let release_ids: Vec<i64> = match release_id {
            Some(id) => vec![id],
            None => db::get_all_releases(&pool)
                .await?
                .into_iter()
                .map(|r| r.id)
                .collect(),
        };

        if release_ids.is_empty() {
            println!("No releases in the database. Run `import` first.");
            return Ok(());
        }

        let mut jobs = Vec::with_capacity(release_ids.len());
        for id in release_ids {
            let existing = if opts.skip_existing {
                db::existing_providers(&pool, id).await?
            } else {
                BTreeSet::new()
            };
            jobs.push(DiscoveryJob {
                release_id: id,
                existing,
            });
        }

        let repo = db::SqliteRepository::new(pool);
        let resolver = LinkResolver {
            apple: Some(&clients.apple as &dyn CatalogLookup),
            deezer: Some(&clients.deezer as &dyn CatalogLookup),
            aggregator: Some(&clients.musicfetch as &dyn AggregatorLookup),
        };
        let service = DiscoveryService::new(&repo, resolver);

        info!(releases = jobs.len(), "Starting link discovery");
        let results = service.discover_releases(&jobs, &opts).await;

        let mut total_links = 0;
        let mut total_errors = 0;
        for result in &results {
            total_links += result.discovered.len();
            total_errors += result.errors.len();

            println!(
                "Release {}: {} links discovered",
                result.release_id,
                result.discovered.len()
            );
            for link in &result.discovered {
                println!("  {:<14} {}", link.provider.key(), link.url);
            }
            for error in &result.errors {
                eprintln!("  warning: {error}");
            }
        }

        println!(
            "\nDone: {} releases, {} links, {} warnings",
            results.len(),
            total_links,
            total_errors
        );
        Ok(())
    })
}
