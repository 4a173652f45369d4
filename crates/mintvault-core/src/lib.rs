//! Mintvault core
//!
//! Orchestrates the backup pipeline end to end:
//!
//! 1. **Write path**: locate/decode the on-chain metadata account,
//!    fetch the off-chain document, stream media to disk, persist the
//!    checksummed aggregate.
//! 2. **Verify path**: recompute digests over the stored record,
//!    classify against the baseline, emit a proof document.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use mintvault_core::{BackupPipeline, VaultConfig};
//!
//! let config = VaultConfig::new(rpc_url, wallet, "/backups");
//! let pipeline = BackupPipeline::from_config(&config).await?;
//!
//! let report = pipeline.backup_mint(&mint).await?;
//! println!("{}/{} assets backed up", report.media_backed_up, report.media_found);
//!
//! let (_, result) = pipeline.verify_mint(&mint, false).await?;
//! println!("status: {}", result.status);
//! ```

#![warn(unreachable_pub)]

mod config;
mod error;
mod pipeline;

pub use config::{ConfigError, VaultConfig, DEFAULT_TIMEOUT};
pub use error::VaultError;
pub use pipeline::{BackupPipeline, BackupReport};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
