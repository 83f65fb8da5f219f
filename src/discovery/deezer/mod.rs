//! Deezer ISRC lookup: DTOs, adapter, and HTTP client.

pub mod adapter;
pub mod client;
pub mod dto;

pub use client::DeezerClient;
