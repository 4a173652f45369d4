//! The fetched aggregate for one mint

use crate::media::MediaAsset;
use crate::model::OffChainMetadata;
use chrono::{DateTime, Utc};
use mintvault_chain::{MintIdentity, Pubkey};
use serde::{Deserialize, Serialize};

/// Everything the pipeline resolved for one mint
///
/// This is the unit the backup store persists and checksums. Identity is
/// the (owner, mint) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NftBundle {
    /// The mint address
    pub mint_address: Pubkey,
    /// Token account holding the unit
    pub token_account: Pubkey,
    /// Owning wallet
    pub owner: Pubkey,
    /// Units issued (1 for an NFT)
    pub supply: u64,
    /// Decimal places (0 for an NFT)
    pub decimals: u8,
    /// Off-chain document, when one could be fetched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<OffChainMetadata>,
    /// URI decoded from the on-chain metadata account
    #[serde(default)]
    pub metadata_uri: String,
    /// Media downloaded for this record
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub media_files: Vec<MediaAsset>,
    /// When this bundle was resolved
    pub fetched_at: DateTime<Utc>,
}

impl NftBundle {
    /// Start a bundle from a validated mint identity
    #[must_use]
    pub fn new(identity: MintIdentity) -> Self {
        Self {
            mint_address: identity.mint,
            token_account: identity.token_account,
            owner: identity.owner,
            supply: identity.supply,
            decimals: identity.decimals,
            metadata: None,
            metadata_uri: String::new(),
            media_files: Vec::new(),
            fetched_at: Utc::now(),
        }
    }

    /// Display name: metadata name when present, otherwise the mint
    #[must_use]
    pub fn display_name(&self) -> String {
        self.metadata
            .as_ref()
            .filter(|m| !m.name.is_empty())
            .map(|m| m.name.clone())
            .unwrap_or_else(|| self.mint_address.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::OffChainMetadata;

    fn identity() -> MintIdentity {
        MintIdentity {
            mint: Pubkey::new([1; 32]),
            token_account: Pubkey::new([2; 32]),
            owner: Pubkey::new([3; 32]),
            supply: 1,
            decimals: 0,
        }
    }

    #[test]
    fn display_name_prefers_metadata() {
        let mut bundle = NftBundle::new(identity());
        assert_eq!(bundle.display_name(), bundle.mint_address.to_string());

        bundle.metadata = Some(OffChainMetadata {
            name: "Named".to_string(),
            ..Default::default()
        });
        assert_eq!(bundle.display_name(), "Named");
    }

    #[test]
    fn bundle_serializes_addresses_as_base58() {
        let bundle = NftBundle::new(identity());
        let json = serde_json::to_value(&bundle).unwrap();
        assert_eq!(
            json["mint_address"].as_str().unwrap(),
            bundle.mint_address.to_string()
        );
        assert!(json.get("metadata").is_none());
    }
}
