//! MusicFetch aggregator lookup: one ISRC call, many platform links.

pub mod client;
pub mod dto;

pub use client::MusicfetchClient;
