//! Storage capability interface

use crate::error::StorageError;
use crate::record::StoredNft;
use mintvault_chain::Pubkey;
use mintvault_fetch::NftBundle;
use std::path::PathBuf;

/// Capability interface for backup persistence
///
/// The pipeline only ever talks to this trait, so alternative backends
/// (a database, an object store) can be substituted without touching it.
/// The backend exclusively owns on-disk layout and lifecycle: create on
/// save, update on verify, delete on explicit delete — no implicit
/// eviction.
#[async_trait::async_trait]
pub trait StorageBackend: Send + Sync {
    /// Where media for a record belongs, decided by the backend since
    /// it owns the layout
    fn media_dir(&self, owner: &Pubkey, mint: &Pubkey) -> PathBuf;

    /// Persist a fetched bundle, replacing any prior record for the
    /// same (owner, mint) pair entirely
    async fn save_nft(&self, bundle: &NftBundle) -> Result<StoredNft, StorageError>;

    /// Load one record; missing and malformed are distinct failures
    async fn get_nft(&self, owner: &Pubkey, mint: &Pubkey) -> Result<StoredNft, StorageError>;

    /// List all records under an owner, skipping unreadable ones
    async fn list_nfts(&self, owner: &Pubkey) -> Result<Vec<StoredNft>, StorageError>;

    /// Remove a record subtree; a missing record is an error, not a no-op
    async fn delete_nft(&self, owner: &Pubkey, mint: &Pubkey) -> Result<(), StorageError>;

    /// Rewrite an existing record's storage metadata (verify path)
    async fn update_stored(&self, record: &StoredNft) -> Result<(), StorageError>;

    /// Release backend resources
    async fn close(&self) -> Result<(), StorageError>;
}
