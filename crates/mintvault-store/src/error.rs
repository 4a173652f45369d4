//! Error types for the backup store

use mintvault_chain::Pubkey;
use std::path::PathBuf;

/// Storage failures
///
/// `NotFound` is recoverable; `Io` is fatal for the operation that hit
/// it. A checksum mismatch is a verification outcome, never an error
/// raised here.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// No record exists for the mint
    #[error("record not found for mint {0}")]
    NotFound(Pubkey),

    /// A record file exists but cannot be decoded
    #[error("malformed record at {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Record could not be serialized
    #[error("serialize error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Disk failure
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_names_the_mint() {
        let mint = Pubkey::new([5; 32]);
        let err = StorageError::NotFound(mint);
        assert!(err.to_string().contains(&mint.to_string()));
    }
}
