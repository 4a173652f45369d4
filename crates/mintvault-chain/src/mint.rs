//! Mint account parsing and non-fungible validation

use crate::error::ChainError;
use crate::pubkey::Pubkey;
use serde::{Deserialize, Serialize};

/// Byte offsets in the SPL mint account layout
const SUPPLY_OFFSET: usize = 36;
const DECIMALS_OFFSET: usize = 44;

/// Identity of a mint together with its holding token account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MintIdentity {
    /// The mint address (one mint = one NFT)
    pub mint: Pubkey,
    /// Token account holding the single unit
    pub token_account: Pubkey,
    /// Wallet that owns the token account
    pub owner: Pubkey,
    /// Total units issued
    pub supply: u64,
    /// Decimal places; 0 for NFTs
    pub decimals: u8,
}

impl MintIdentity {
    /// Validate that this mint describes a non-fungible token
    ///
    /// Decimals must be 0 and supply 1; anything else is a validation
    /// error, never a silent default.
    pub fn validate_non_fungible(&self) -> Result<(), ChainError> {
        if self.decimals != 0 || self.supply != 1 {
            return Err(ChainError::NotNonFungible {
                supply: self.supply,
                decimals: self.decimals,
            });
        }
        Ok(())
    }
}

/// Parse supply and decimals out of a raw mint account
///
/// The SPL mint layout places the supply as a little-endian u64 at byte
/// 36 and the decimals byte at 44.
///
/// # Errors
/// Fails if the buffer is shorter than the fixed header.
pub fn decode_mint_account(data: &[u8]) -> Result<(u64, u8), ChainError> {
    if data.len() <= DECIMALS_OFFSET {
        return Err(ChainError::MalformedResponse(format!(
            "mint account too short: {} bytes",
            data.len()
        )));
    }
    let supply_bytes: [u8; 8] = data[SUPPLY_OFFSET..SUPPLY_OFFSET + 8]
        .try_into()
        .expect("slice is 8 bytes");
    let supply = u64::from_le_bytes(supply_bytes);
    let decimals = data[DECIMALS_OFFSET];
    Ok((supply, decimals))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mint_account(supply: u64, decimals: u8) -> Vec<u8> {
        let mut data = vec![0u8; 82];
        data[SUPPLY_OFFSET..SUPPLY_OFFSET + 8].copy_from_slice(&supply.to_le_bytes());
        data[DECIMALS_OFFSET] = decimals;
        data
    }

    #[test]
    fn decodes_supply_and_decimals() {
        let data = mint_account(1, 0);
        assert_eq!(decode_mint_account(&data).unwrap(), (1, 0));

        let data = mint_account(1_000_000, 6);
        assert_eq!(decode_mint_account(&data).unwrap(), (1_000_000, 6));
    }

    #[test]
    fn short_buffer_is_an_error() {
        assert!(decode_mint_account(&[0u8; 44]).is_err());
        assert!(decode_mint_account(&[]).is_err());
    }

    #[test]
    fn nft_validation() {
        let identity = MintIdentity {
            mint: Pubkey::new([1; 32]),
            token_account: Pubkey::new([2; 32]),
            owner: Pubkey::new([3; 32]),
            supply: 1,
            decimals: 0,
        };
        assert!(identity.validate_non_fungible().is_ok());

        let fungible = MintIdentity {
            supply: 1_000_000,
            decimals: 6,
            ..identity.clone()
        };
        let err = fungible.validate_non_fungible().unwrap_err();
        assert!(err.to_string().contains("6 decimals"));
    }
}
