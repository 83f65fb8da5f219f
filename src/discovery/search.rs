//! Search-URL builder: the last-resort fallback link.
//!
//! Pure string templating, no network. Every provider gets a deterministic
//! "search on this platform" URL from the track's artist and title, so a
//! resolution call can always produce *some* link for every requested
//! provider.

use super::domain::TrackDescriptor;
use super::provider::Provider;

/// Build a deterministic search URL for `provider`.
///
/// `storefront` only affects providers with region-scoped catalogs
/// (Apple Music). Always succeeds.
pub fn build_search_url(provider: Provider, track: &TrackDescriptor, storefront: &str) -> String {
    let query = search_query(track);
    let q = urlencoding::encode(&query);

    match provider {
        Provider::AppleMusic => {
            format!("https://music.apple.com/{storefront}/search?term={q}")
        }
        Provider::Spotify => format!("https://open.spotify.com/search/{q}"),
        Provider::Youtube => format!("https://www.youtube.com/results?search_query={q}"),
        Provider::YoutubeMusic => format!("https://music.youtube.com/search?q={q}"),
        Provider::Soundcloud => format!("https://soundcloud.com/search?q={q}"),
        Provider::Deezer => format!("https://www.deezer.com/search/{q}"),
        Provider::Tidal => format!("https://listen.tidal.com/search?q={q}"),
        Provider::AmazonMusic => format!("https://music.amazon.com/search/{q}"),
        Provider::Pandora => format!("https://www.pandora.com/search/{q}/all"),
        Provider::Napster => format!("https://web.napster.com/search?query={q}"),
        Provider::Audiomack => format!("https://audiomack.com/search?q={q}"),
        Provider::Qobuz => format!("https://www.qobuz.com/search?q={q}"),
        Provider::Anghami => format!("https://play.anghami.com/search/{q}"),
        Provider::Boomplay => format!("https://www.boomplay.com/search/default/{q}"),
        Provider::Iheartradio => format!("https://www.iheart.com/search/?q={q}"),
        Provider::Tiktok => format!("https://www.tiktok.com/search?q={q}"),
    }
}

/// `"artist title"`, collapsing to just the title when the artist is unknown.
fn search_query(track: &TrackDescriptor) -> String {
    let artist = track.artist_name.trim();
    let title = track.title.trim();

    if artist.is_empty() {
        title.to_string()
    } else {
        format!("{artist} {title}")
    }
}
