//! Verification proof documents
//!
//! A proof records what was verified, by whom, when, and with which
//! digests, for optional external publication. The publication transport
//! itself is out of scope.

use crate::engine::{VerificationResult, VerificationStatus};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Method tag recorded in every proof
pub const VERIFICATION_METHOD: &str = "local_sha256";

/// Proof of one verification pass (`proof.json`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProofDocument {
    /// Record directory name (usually the mint address)
    pub nft_name: String,
    /// Mint address when known
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub mint_address: String,
    /// Verifier identity
    pub verified_by: String,
    /// RFC 3339 timestamp of the pass
    pub verified_at: String,
    /// Media digest in `sha256:<hex>` form
    pub image_hash: String,
    /// Metadata digest in `sha256:<hex>` form
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub metadata_hash: String,
    /// Derived status
    pub status: VerificationStatus,
    /// Whether the media digest matched the baseline
    pub hash_match: bool,
    /// How the digests were computed
    pub verification_method: String,
    /// Non-fatal errors from the pass
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl ProofDocument {
    /// Build a proof from a verification result
    #[must_use]
    pub fn from_result(result: &VerificationResult, mint_address: Option<&str>) -> Self {
        Self {
            nft_name: result.nft_name.clone(),
            mint_address: mint_address.unwrap_or_default().to_string(),
            verified_by: concat!("mintvault ", env!("CARGO_PKG_VERSION")).to_string(),
            verified_at: result.verified_at.to_rfc3339(),
            image_hash: result.media_hash.clone(),
            metadata_hash: result.metadata_hash.clone(),
            status: result.status,
            hash_match: result.hash_match,
            verification_method: VERIFICATION_METHOD.to_string(),
            errors: result.errors.clone(),
        }
    }

    /// Write the proof as pretty JSON into the record directory
    pub async fn write(&self, nft_dir: &Path) -> Result<(), std::io::Error> {
        let path = nft_dir.join("proof.json");
        let text = serde_json::to_vec_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        tokio::fs::write(&path, text).await?;
        tracing::debug!("proof written to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::path::PathBuf;

    fn result() -> VerificationResult {
        VerificationResult {
            nft_name: "MintAddr".to_string(),
            nft_path: PathBuf::from("/tmp/MintAddr"),
            status: VerificationStatus::Authentic,
            media_hash: format!("sha256:{}", "a".repeat(64)),
            stored_hash: format!("sha256:{}", "a".repeat(64)),
            metadata_hash: String::new(),
            hash_match: true,
            has_media: true,
            has_metadata: false,
            verified_at: Utc::now(),
            errors: Vec::new(),
        }
    }

    #[test]
    fn proof_carries_method_and_verifier() {
        let proof = ProofDocument::from_result(&result(), Some("MintAddr"));
        assert_eq!(proof.verification_method, "local_sha256");
        assert!(proof.verified_by.starts_with("mintvault "));
        assert_eq!(proof.mint_address, "MintAddr");
    }

    #[test]
    fn empty_fields_are_omitted_from_json() {
        let proof = ProofDocument::from_result(&result(), None);
        let json = serde_json::to_value(&proof).unwrap();
        assert!(json.get("metadata_hash").is_none());
        assert!(json.get("errors").is_none());
        assert_eq!(json["status"], "authentic");
    }
}
