//! Pipeline configuration
//!
//! One explicit struct passed by reference into the pipeline entry
//! points; there is no package-level mutable flag state anywhere.

use mintvault_chain::Pubkey;
use mintvault_fetch::DEFAULT_MAX_MEDIA_BYTES;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Configuration for one pipeline instance
#[derive(Debug, Clone)]
pub struct VaultConfig {
    /// JSON-RPC endpoint
    pub rpc_url: Url,
    /// Wallet whose tokens are backed up
    pub wallet: Pubkey,
    /// Storage root
    pub backup_dir: PathBuf,
    /// Per-request network timeout
    pub timeout: Duration,
    /// Per-asset media size cap
    pub max_media_bytes: u64,
}

impl VaultConfig {
    /// Create a configuration with default timeout and media cap
    #[must_use]
    pub fn new(rpc_url: Url, wallet: Pubkey, backup_dir: impl Into<PathBuf>) -> Self {
        Self {
            rpc_url,
            wallet,
            backup_dir: backup_dir.into(),
            timeout: DEFAULT_TIMEOUT,
            max_media_bytes: DEFAULT_MAX_MEDIA_BYTES,
        }
    }

    /// With a custom network timeout
    #[inline]
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// With a custom media size cap
    #[inline]
    #[must_use]
    pub fn with_max_media_bytes(mut self, max: u64) -> Self {
        self.max_media_bytes = max;
        self
    }

    /// Validate the configuration before any I/O happens
    ///
    /// # Errors
    /// A [`ConfigError`]; configuration failures are fatal and abort the
    /// run before anything touches the network or the disk.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.rpc_url.scheme() {
            "http" | "https" => {}
            other => {
                return Err(ConfigError::InvalidEndpoint(format!(
                    "unsupported scheme {other:?}"
                )))
            }
        }
        if self.wallet.is_zero() {
            return Err(ConfigError::MissingWallet);
        }
        if self.backup_dir.as_os_str().is_empty() {
            return Err(ConfigError::MissingBackupDir);
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout);
        }
        if self.max_media_bytes == 0 {
            return Err(ConfigError::InvalidMediaCap);
        }
        Ok(())
    }
}

/// Configuration failures; fatal, aborted before any I/O
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// RPC endpoint is unusable
    #[error("invalid rpc endpoint: {0}")]
    InvalidEndpoint(String),

    /// Wallet address is absent or all zeros
    #[error("wallet address is required")]
    MissingWallet,

    /// Backup directory is empty
    #[error("backup directory is required")]
    MissingBackupDir,

    /// Timeout must be positive
    #[error("timeout must be positive")]
    InvalidTimeout,

    /// Media cap must be positive
    #[error("media size cap must be positive")]
    InvalidMediaCap,
}
