//! Top-level error rollup

use crate::config::ConfigError;
use mintvault_chain::ChainError;
use mintvault_fetch::FetchError;
use mintvault_store::StorageError;

/// Any failure the pipeline can surface
#[derive(Debug, thiserror::Error)]
pub enum VaultError {
    /// Configuration failure, fatal before any I/O
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// On-chain access or decode failure
    #[error("chain error: {0}")]
    Chain(#[from] ChainError),

    /// Off-chain fetch or media failure
    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Backup store failure
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl VaultError {
    /// Whether the run as a whole can continue past this failure
    ///
    /// Configuration and storage I/O failures abort the operation;
    /// per-mint and per-asset failures are skipped and reported.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Config(_) => false,
            Self::Storage(StorageError::Io(_)) | Self::Storage(StorageError::Serialize(_)) => false,
            Self::Storage(_) => true,
            Self::Chain(_) | Self::Fetch(_) => true,
        }
    }

    /// Whether a retry could plausibly succeed
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Chain(error) => error.is_retryable(),
            Self::Fetch(error) => error.is_retryable(),
            Self::Config(_) | Self::Storage(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mintvault_chain::Pubkey;

    #[test]
    fn config_errors_are_fatal() {
        let err = VaultError::Config(ConfigError::MissingWallet);
        assert!(!err.is_recoverable());
        assert!(!err.is_retryable());
    }

    #[test]
    fn missing_account_is_recoverable_but_not_retryable() {
        let err = VaultError::Chain(ChainError::AccountNotFound(Pubkey::default()));
        assert!(err.is_recoverable());
        assert!(!err.is_retryable());
    }

    #[test]
    fn timeouts_are_retryable() {
        let err = VaultError::Fetch(FetchError::Timeout);
        assert!(err.is_recoverable());
        assert!(err.is_retryable());
    }

    #[test]
    fn storage_not_found_is_recoverable() {
        let err = VaultError::Storage(StorageError::NotFound(Pubkey::default()));
        assert!(err.is_recoverable());
    }
}
