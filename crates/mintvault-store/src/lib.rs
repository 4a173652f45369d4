//! Mintvault backup store
//!
//! Content-checksummed persistence for fetched records:
//!
//! - [`StorageBackend`]: capability interface {save, get, list, delete,
//!   close} the pipeline programs against
//! - [`FileStorage`]: the filesystem backend with the
//!   `wallets/{owner}/nfts/{mint}` layout
//! - [`StoredNft`]: the canonical persisted aggregate

#![warn(unreachable_pub)]

mod backend;
mod error;
mod filesystem;
mod record;

pub use backend::StorageBackend;
pub use error::StorageError;
pub use filesystem::{
    FileStorage, MANIFEST_FILE, MEDIA_DIR, METADATA_FILE, RECORD_FILE,
};
pub use record::{bundle_checksum, BackupStats, StoredNft, RECORD_VERSION};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
