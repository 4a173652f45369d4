//! Persisted record types

use chrono::{DateTime, Utc};
use mintvault_fetch::NftBundle;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::PathBuf;

/// Current record schema version
pub const RECORD_VERSION: u32 = 1;

/// A backup record as stored on disk (`nft_data.json`)
///
/// Wraps the fetched bundle with storage metadata. The checksum is the
/// digest computed at the most recent save over the embedded bundle
/// only; it is never hand-edited.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredNft {
    /// The fetched aggregate
    pub nft_info: NftBundle,
    /// When this record was first saved
    pub stored_at: DateTime<Utc>,
    /// Last write time
    pub updated_at: DateTime<Utc>,
    /// Schema version, starts at 1
    pub version: u32,
    /// Hex SHA-256 over the canonically serialized bundle
    pub checksum: String,
    /// Directory this record lives in
    pub backup_path: PathBuf,
    /// Whether the media baseline has been verified
    pub verified: bool,
    /// Last verification time, `None` if never checked
    #[serde(default)]
    pub last_check: Option<DateTime<Utc>>,
}

impl StoredNft {
    /// Wrap a bundle for storage, computing its checksum
    ///
    /// # Errors
    /// Fails only if the bundle cannot be serialized.
    pub fn new(nft_info: NftBundle, backup_path: PathBuf) -> Result<Self, serde_json::Error> {
        let checksum = bundle_checksum(&nft_info)?;
        let now = Utc::now();
        Ok(Self {
            nft_info,
            stored_at: now,
            updated_at: now,
            version: RECORD_VERSION,
            checksum,
            backup_path,
            verified: false,
            last_check: None,
        })
    }
}

/// Digest over the canonical serialization of a bundle
///
/// Struct fields serialize in declaration order, so the byte stream is
/// stable for identical bundles.
pub fn bundle_checksum(bundle: &NftBundle) -> Result<String, serde_json::Error> {
    let bytes = serde_json::to_vec(bundle)?;
    Ok(hex::encode(Sha256::digest(&bytes)))
}

/// Statistics over one owner's stored subtree
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BackupStats {
    /// Number of stored records
    pub total_nfts: usize,
    /// Records whose baseline has been verified
    pub verified_count: usize,
    /// Sum of stored media sizes in bytes
    pub total_media_bytes: u64,
    /// Most recent record write, if any
    pub last_backup: Option<DateTime<Utc>>,
}
