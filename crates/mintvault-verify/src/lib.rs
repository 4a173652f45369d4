//! Mintvault verification
//!
//! Tamper detection for stored backups:
//!
//! - [`verify_backup`]: recompute digests, compare to the baseline,
//!   classify as authentic / tampered / incomplete / error
//! - [`ProofDocument`]: the emitted proof for external publication
//!
//! The trust model is trust-on-first-use: a record's first verification
//! establishes the baseline, and only later drift is detectable.

#![warn(unreachable_pub)]

mod engine;
mod proof;

pub use engine::{
    compute_file_digest, find_media_file, verify_backup, VerificationResult, VerificationStatus,
    BASELINE_FILE,
};
pub use proof::{ProofDocument, VERIFICATION_METHOD};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
