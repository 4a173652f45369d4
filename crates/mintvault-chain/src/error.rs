//! Error types for on-chain access and decoding

use crate::metadata::MetadataField;
use crate::pubkey::{Pubkey, PubkeyError};

/// Malformed on-chain data
///
/// Recoverable per-mint: callers log and skip the mint, they never abort
/// a whole run over one bad account.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// Account does not start with the metadata tag
    #[error("bad discriminant: expected {expected}, found {found}")]
    BadDiscriminant { expected: u8, found: u8 },

    /// A length prefix exceeded the field's cap
    #[error("{field} length {length} exceeds cap {cap}")]
    LengthOverflow {
        field: MetadataField,
        length: usize,
        cap: usize,
    },

    /// Buffer ended inside a field
    #[error("truncated buffer reading {field}: needed {needed} bytes, {remaining} remaining")]
    TruncatedBuffer {
        field: MetadataField,
        needed: usize,
        remaining: usize,
    },

    /// Field bytes were not valid UTF-8
    #[error("{field} is not valid utf-8")]
    InvalidUtf8 { field: MetadataField },

    /// URI scheme outside the allow-list
    #[error("unrecognized uri scheme: {uri:?}")]
    InvalidUriScheme { uri: String },
}

/// Errors from RPC access and account resolution
#[derive(Debug, thiserror::Error)]
pub enum ChainError {
    /// On-chain account absent; recoverable, caller may skip the mint
    #[error("account not found: {0}")]
    AccountNotFound(Pubkey),

    /// No token account holds the mint for the given owner
    #[error("token account not found for mint {0}")]
    TokenAccountNotFound(Pubkey),

    /// Malformed on-chain data
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Malformed address input
    #[error("invalid address: {0}")]
    InvalidPubkey(#[from] PubkeyError),

    /// Mint is not a non-fungible token
    #[error("token has {decimals} decimals and supply {supply}; an NFT needs 0 decimals and supply 1")]
    NotNonFungible { supply: u64, decimals: u8 },

    /// RPC transport failure
    #[error("rpc transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// RPC endpoint returned an error object
    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// RPC response did not match the expected shape
    #[error("malformed rpc response: {0}")]
    MalformedResponse(String),

    /// Account payload was not valid base64
    #[error("account data is not base64: {0}")]
    Base64(#[from] base64::DecodeError),
}

impl ChainError {
    /// Whether a retry could plausibly succeed
    ///
    /// Transport failures and timeouts are transient; decode and
    /// validation failures are not.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Rpc { .. })
    }
}
