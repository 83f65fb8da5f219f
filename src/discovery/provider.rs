//! The closed vocabulary of streaming providers.
//!
//! Every provider linkscout knows about is a variant here. Using a closed enum
//! (rather than string keys) gives us exhaustiveness checking in the search-URL
//! builder and the resolver merge, and makes unknown keys from external
//! aggregators an explicit, logged case instead of a silent passthrough.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A streaming platform we can link to.
///
/// The serialized form is the snake_case wire key used in the database and in
/// aggregator responses (e.g. `apple_music`, `youtube_music`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provider {
    AppleMusic,
    Spotify,
    Youtube,
    YoutubeMusic,
    Soundcloud,
    Deezer,
    Tidal,
    AmazonMusic,
    Pandora,
    Napster,
    Audiomack,
    Qobuz,
    Anghami,
    Boomplay,
    Iheartradio,
    Tiktok,
}

/// All known providers, in precedence-neutral declaration order.
pub const ALL_PROVIDERS: [Provider; 16] = [
    Provider::AppleMusic,
    Provider::Spotify,
    Provider::Youtube,
    Provider::YoutubeMusic,
    Provider::Soundcloud,
    Provider::Deezer,
    Provider::Tidal,
    Provider::AmazonMusic,
    Provider::Pandora,
    Provider::Napster,
    Provider::Audiomack,
    Provider::Qobuz,
    Provider::Anghami,
    Provider::Boomplay,
    Provider::Iheartradio,
    Provider::Tiktok,
];

impl Provider {
    /// The snake_case wire key (database column value, aggregator map key).
    pub fn key(self) -> &'static str {
        match self {
            Provider::AppleMusic => "apple_music",
            Provider::Spotify => "spotify",
            Provider::Youtube => "youtube",
            Provider::YoutubeMusic => "youtube_music",
            Provider::Soundcloud => "soundcloud",
            Provider::Deezer => "deezer",
            Provider::Tidal => "tidal",
            Provider::AmazonMusic => "amazon_music",
            Provider::Pandora => "pandora",
            Provider::Napster => "napster",
            Provider::Audiomack => "audiomack",
            Provider::Qobuz => "qobuz",
            Provider::Anghami => "anghami",
            Provider::Boomplay => "boomplay",
            Provider::Iheartradio => "iheartradio",
            Provider::Tiktok => "tiktok",
        }
    }

    /// Human-readable name, used in CLI output and error prefixes.
    pub fn display_name(self) -> &'static str {
        match self {
            Provider::AppleMusic => "Apple Music",
            Provider::Spotify => "Spotify",
            Provider::Youtube => "YouTube",
            Provider::YoutubeMusic => "YouTube Music",
            Provider::Soundcloud => "SoundCloud",
            Provider::Deezer => "Deezer",
            Provider::Tidal => "Tidal",
            Provider::AmazonMusic => "Amazon Music",
            Provider::Pandora => "Pandora",
            Provider::Napster => "Napster",
            Provider::Audiomack => "Audiomack",
            Provider::Qobuz => "Qobuz",
            Provider::Anghami => "Anghami",
            Provider::Boomplay => "Boomplay",
            Provider::Iheartradio => "iHeartRadio",
            Provider::Tiktok => "TikTok",
        }
    }

    /// Parse a wire key back into a provider.
    pub fn from_key(key: &str) -> Option<Provider> {
        ALL_PROVIDERS.iter().copied().find(|p| p.key() == key)
    }

    /// The providers targeted by link discovery.
    ///
    /// Spotify is excluded: its links arrive through the upstream ingestion
    /// path and are never discovered here.
    pub fn default_discovery() -> Vec<Provider> {
        ALL_PROVIDERS
            .iter()
            .copied()
            .filter(|p| *p != Provider::Spotify)
            .collect()
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Provider::from_key(s).ok_or_else(|| format!("unknown provider key: {s}"))
    }
}
