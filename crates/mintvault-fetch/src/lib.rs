//! Mintvault off-chain fetching
//!
//! Retrieval side of the backup pipeline:
//!
//! - [`MetadataFetcher`]: bounded-timeout retrieval of off-chain JSON,
//!   strict schema first, tolerant per-key fallback second
//! - [`MediaDownloader`]: size-bounded streaming downloads with a
//!   checksum computed from the persisted byte stream
//! - [`NftBundle`]: the aggregate the store persists

#![warn(unreachable_pub)]

mod bundle;
mod error;
mod fetcher;
mod media;
mod model;

pub use bundle::NftBundle;
pub use error::FetchError;
pub use fetcher::{resolve_gateway_url, MetadataFetcher};
pub use media::{
    collect_media_urls, MediaAsset, MediaCategory, MediaDownloader, DEFAULT_MAX_MEDIA_BYTES,
};
pub use model::{Attribute, Collection, Creator, FileRef, OffChainMetadata, Properties};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
