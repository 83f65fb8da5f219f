//! Apple Music ISRC lookup: MusicKit catalog with iTunes public fallback.

pub mod adapter;
pub mod client;
pub mod dto;

pub use client::AppleMusicClient;
