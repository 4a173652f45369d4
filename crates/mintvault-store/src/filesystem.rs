//! Filesystem storage backend
//!
//! Directory structure:
//!
//! ```text
//! root/
//! └── wallets/
//!     └── {owner}/
//!         └── nfts/
//!             └── {mint}/
//!                 ├── nft_data.json       (StoredNft)
//!                 ├── metadata.json       (off-chain document, if any)
//!                 ├── media/              (downloaded assets)
//!                 └── media_manifest.json (asset list, if any)
//! ```
//!
//! Writes are full overwrites; there is no field-level merge and no
//! multi-file atomicity. Callers wanting incremental updates re-supply
//! the whole bundle.

use crate::backend::StorageBackend;
use crate::error::StorageError;
use crate::record::{BackupStats, StoredNft};
use chrono::Utc;
use mintvault_chain::Pubkey;
use mintvault_fetch::NftBundle;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// File names within a record directory
pub const RECORD_FILE: &str = "nft_data.json";
pub const METADATA_FILE: &str = "metadata.json";
pub const MANIFEST_FILE: &str = "media_manifest.json";
pub const MEDIA_DIR: &str = "media";

/// Local filesystem backend rooted at one backup directory
#[derive(Debug, Clone)]
pub struct FileStorage {
    base_dir: PathBuf,
}

impl FileStorage {
    /// Open (and create if needed) a storage root
    ///
    /// # Errors
    /// Fails if the root directory cannot be created.
    pub async fn open(base_dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let base_dir = base_dir.into();
        tokio::fs::create_dir_all(&base_dir).await?;
        Ok(Self { base_dir })
    }

    /// The storage root
    #[inline]
    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Directory for one (owner, mint) record
    ///
    /// The pair uniquely determines the path; no two records share one.
    #[must_use]
    pub fn record_dir(&self, owner: &Pubkey, mint: &Pubkey) -> PathBuf {
        self.base_dir
            .join("wallets")
            .join(owner.to_string())
            .join("nfts")
            .join(mint.to_string())
    }

    /// Aggregate statistics over one owner's records
    pub async fn backup_stats(&self, owner: &Pubkey) -> Result<BackupStats, StorageError> {
        let records = self.list_nfts(owner).await?;
        let mut stats = BackupStats {
            total_nfts: records.len(),
            ..Default::default()
        };
        for record in &records {
            if record.verified {
                stats.verified_count += 1;
            }
            stats.total_media_bytes += record
                .nft_info
                .media_files
                .iter()
                .map(|asset| asset.size)
                .sum::<u64>();
            stats.last_backup = match stats.last_backup {
                Some(existing) => Some(existing.max(record.updated_at)),
                None => Some(record.updated_at),
            };
        }
        Ok(stats)
    }

    async fn write_json<T: Serialize>(&self, path: &Path, value: &T) -> Result<(), StorageError> {
        let text = serde_json::to_vec_pretty(value)?;
        tokio::fs::write(path, text).await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl StorageBackend for FileStorage {
    fn media_dir(&self, owner: &Pubkey, mint: &Pubkey) -> PathBuf {
        self.record_dir(owner, mint).join(MEDIA_DIR)
    }

    async fn save_nft(&self, bundle: &NftBundle) -> Result<StoredNft, StorageError> {
        let record_dir = self.record_dir(&bundle.owner, &bundle.mint_address);
        tokio::fs::create_dir_all(&record_dir).await?;

        let record = StoredNft::new(bundle.clone(), record_dir.clone())?;
        self.write_json(&record_dir.join(RECORD_FILE), &record).await?;

        if let Some(metadata) = &bundle.metadata {
            self.write_json(&record_dir.join(METADATA_FILE), metadata).await?;
        }

        if !bundle.media_files.is_empty() {
            tokio::fs::create_dir_all(record_dir.join(MEDIA_DIR)).await?;
            self.write_json(&record_dir.join(MANIFEST_FILE), &bundle.media_files)
                .await?;
        }

        tracing::info!(
            "saved record for mint {} under {}",
            bundle.mint_address,
            record_dir.display()
        );
        Ok(record)
    }

    async fn get_nft(&self, owner: &Pubkey, mint: &Pubkey) -> Result<StoredNft, StorageError> {
        let path = self.record_dir(owner, mint).join(RECORD_FILE);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::NotFound(*mint));
            }
            Err(error) => return Err(error.into()),
        };
        serde_json::from_slice(&bytes).map_err(|source| StorageError::Decode { path, source })
    }

    async fn list_nfts(&self, owner: &Pubkey) -> Result<Vec<StoredNft>, StorageError> {
        let nfts_dir = self
            .base_dir
            .join("wallets")
            .join(owner.to_string())
            .join("nfts");

        let mut entries = match tokio::fs::read_dir(&nfts_dir).await {
            Ok(entries) => entries,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Vec::new());
            }
            Err(error) => return Err(error.into()),
        };

        let mut records = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path().join(RECORD_FILE);
            let bytes = match tokio::fs::read(&path).await {
                Ok(bytes) => bytes,
                Err(error) => {
                    tracing::warn!("skipping {}: {error}", path.display());
                    continue;
                }
            };
            match serde_json::from_slice::<StoredNft>(&bytes) {
                Ok(record) => records.push(record),
                Err(error) => {
                    // One bad record must not hide the rest
                    tracing::warn!("skipping malformed record {}: {error}", path.display());
                }
            }
        }
        Ok(records)
    }

    async fn delete_nft(&self, owner: &Pubkey, mint: &Pubkey) -> Result<(), StorageError> {
        let record_dir = self.record_dir(owner, mint);
        if !record_dir.exists() {
            // Distinguish "already gone" from "successfully removed"
            return Err(StorageError::NotFound(*mint));
        }
        tokio::fs::remove_dir_all(&record_dir).await?;
        tracing::info!("deleted record for mint {mint}");
        Ok(())
    }

    async fn update_stored(&self, record: &StoredNft) -> Result<(), StorageError> {
        let record_dir = self.record_dir(&record.nft_info.owner, &record.nft_info.mint_address);
        if !record_dir.exists() {
            return Err(StorageError::NotFound(record.nft_info.mint_address));
        }
        let mut updated = record.clone();
        updated.updated_at = Utc::now();
        self.write_json(&record_dir.join(RECORD_FILE), &updated).await
    }

    async fn close(&self) -> Result<(), StorageError> {
        // Nothing to release for plain files
        Ok(())
    }
}
