//! Ad-hoc link resolution for a single track.

use tokio::runtime::Runtime;

use crate::config::Config;
use crate::discovery::domain::TrackDescriptor;
use crate::discovery::provider::Provider;
use crate::discovery::resolver::LinkResolver;
use crate::discovery::traits::{AggregatorLookup, CatalogLookup};

use super::{build_clients, effective_storefront};

/// Resolve provider links for one track and print them.
#[allow(clippy::too_many_arguments)]
pub fn cmd_resolve(
    rt: &Runtime,
    config: &Config,
    title: &str,
    artist: &str,
    isrc: Option<&str>,
    storefront: Option<&str>,
    apple_token: Option<&str>,
    musicfetch_token: Option<&str>,
    provider_keys: &[String],
    json: bool,
) -> anyhow::Result<()> {
    let providers: Vec<Provider> = if provider_keys.is_empty() {
        Provider::default_discovery()
    } else {
        provider_keys
            .iter()
            .map(|key| {
                Provider::from_key(key)
                    .ok_or_else(|| anyhow::anyhow!("unknown provider '{key}'"))
            })
            .collect::<anyhow::Result<_>>()?
    };

    let clients = build_clients(config, storefront, apple_token, musicfetch_token);
    let storefront = effective_storefront(config, storefront);

    let track = TrackDescriptor {
        title: title.to_string(),
        artist_name: artist.to_string(),
        isrc: isrc.map(String::from),
        duration: None,
    };

    let resolved = rt.block_on(async {
        let resolver = LinkResolver {
            apple: Some(&clients.apple as &dyn CatalogLookup),
            deezer: Some(&clients.deezer as &dyn CatalogLookup),
            aggregator: Some(&clients.musicfetch as &dyn AggregatorLookup),
        };
        resolver.resolve(&track, &providers, &storefront).await
    });

    if json {
        let links: Vec<serde_json::Value> = resolved
            .links
            .iter()
            .map(|l| {
                serde_json::json!({
                    "provider": l.provider.key(),
                    "url": l.url,
                    "provider_id": l.provider_id,
                    "quality": l.quality.as_str(),
                    "discovered_from": l.discovered_from,
                })
            })
            .collect();
        let out = serde_json::json!({ "links": links, "errors": resolved.errors });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    for link in &resolved.links {
        println!(
            "{:<14} {:<16} {}",
            link.provider.key(),
            link.quality.as_str(),
            link.url
        );
    }

    for error in &resolved.errors {
        eprintln!("warning: {error}");
    }

    Ok(())
}
