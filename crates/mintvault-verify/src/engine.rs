//! Verification engine
//!
//! Recomputes digests for a stored record's media and metadata,
//! compares against the recorded baseline, and classifies the outcome.
//! Trust-on-first-use: the first observed digest becomes the baseline,
//! so tampering that happened before the first check is undetectable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;

/// Sidecar file holding the media digest baseline
pub const BASELINE_FILE: &str = "hash.txt";

/// Canonical primary-media names, tried in order before scanning
const CANONICAL_NAMES: [&str; 6] = [
    "image.png",
    "image.jpg",
    "image.jpeg",
    "image.gif",
    "image.svg",
    "image.webp",
];

/// Extensions recognized by the fallback scan
const MEDIA_EXTENSIONS: [&str; 9] = [
    "png", "jpg", "jpeg", "gif", "svg", "webp", "mp4", "webm", "mp3",
];

/// Outcome classification, in precedence order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    /// Digests match the baseline, or no baseline existed yet
    Authentic,
    /// A baseline existed and the digests differ
    Tampered,
    /// No media file was found
    Incomplete,
    /// A digest computation failed
    Error,
}

impl std::fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Authentic => "authentic",
            Self::Tampered => "tampered",
            Self::Incomplete => "incomplete",
            Self::Error => "error",
        };
        f.write_str(name)
    }
}

/// Result of one verification pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationResult {
    /// Directory name of the verified record
    pub nft_name: String,
    /// Record directory
    pub nft_path: PathBuf,
    /// Derived status
    pub status: VerificationStatus,
    /// Recomputed media digest (`sha256:<hex>`), empty if none computed
    pub media_hash: String,
    /// Baseline digest previously on record, empty if none
    pub stored_hash: String,
    /// Recomputed metadata digest, empty when no metadata file exists
    pub metadata_hash: String,
    /// Whether the recomputed media digest equals the baseline
    pub hash_match: bool,
    /// Whether a media file was found
    pub has_media: bool,
    /// Whether a metadata file was found
    pub has_metadata: bool,
    /// When the verification ran
    pub verified_at: DateTime<Utc>,
    /// Non-fatal errors encountered along the way
    pub errors: Vec<String>,
}

/// Verify one stored record directory
///
/// Status precedence is exact: `incomplete` when no media file is found,
/// `error` when a digest computation fails, otherwise `authentic` when
/// the digest matches the baseline or no baseline existed, `tampered`
/// when a baseline existed and the digests differ.
///
/// When no baseline exists, or when `force_recompute` is set, the fresh
/// digest is written as the new baseline.
pub async fn verify_backup(nft_dir: &Path, force_recompute: bool) -> VerificationResult {
    let mut result = VerificationResult {
        nft_name: nft_dir
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default(),
        nft_path: nft_dir.to_path_buf(),
        status: VerificationStatus::Incomplete,
        media_hash: String::new(),
        stored_hash: String::new(),
        metadata_hash: String::new(),
        hash_match: false,
        has_media: false,
        has_metadata: nft_dir.join("metadata.json").exists(),
        verified_at: Utc::now(),
        errors: Vec::new(),
    };

    let Some(media_file) = find_media_file(nft_dir).await else {
        result.errors.push("no media file found".to_string());
        result.status = VerificationStatus::Incomplete;
        return result;
    };
    result.has_media = true;

    match compute_file_digest(&media_file).await {
        Ok(digest) => result.media_hash = digest,
        Err(error) => result
            .errors
            .push(format!("failed to compute media digest: {error}")),
    }

    if result.has_metadata {
        match compute_file_digest(&nft_dir.join("metadata.json")).await {
            Ok(digest) => result.metadata_hash = digest,
            Err(error) => result
                .errors
                .push(format!("failed to compute metadata digest: {error}")),
        }
    }

    let baseline_path = nft_dir.join(BASELINE_FILE);
    if let Ok(baseline) = tokio::fs::read_to_string(&baseline_path).await {
        result.stored_hash = baseline.trim().to_string();
        result.hash_match = !result.media_hash.is_empty() && result.media_hash == result.stored_hash;
    }

    result.status = if !result.errors.is_empty() {
        VerificationStatus::Error
    } else if result.hash_match || result.stored_hash.is_empty() {
        VerificationStatus::Authentic
    } else {
        VerificationStatus::Tampered
    };

    // Record the fresh digest as baseline on first use or forced refresh
    if (result.stored_hash.is_empty() || force_recompute) && !result.media_hash.is_empty() {
        match tokio::fs::write(&baseline_path, &result.media_hash).await {
            Ok(()) => {
                result.stored_hash = result.media_hash.clone();
                result.hash_match = true;
            }
            Err(error) => {
                result.errors.push(format!("failed to save baseline: {error}"));
            }
        }
    }

    tracing::info!(
        "verified {}: {} (media {})",
        result.nft_name,
        result.status,
        if result.media_hash.is_empty() { "<none>" } else { result.media_hash.as_str() }
    );
    result
}

/// Locate the primary media file
///
/// Canonical names in the record directory first, then a scan of the
/// record directory and its `media/` subdirectory for any file with a
/// recognized media extension.
pub async fn find_media_file(nft_dir: &Path) -> Option<PathBuf> {
    for name in CANONICAL_NAMES {
        let candidate = nft_dir.join(name);
        if candidate.is_file() {
            return Some(candidate);
        }
    }

    for dir in [nft_dir.to_path_buf(), nft_dir.join("media")] {
        let Ok(mut entries) = tokio::fs::read_dir(&dir).await else {
            continue;
        };
        while let Ok(Some(entry)) = entries.next_entry().await {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let ext = path
                .extension()
                .and_then(|ext| ext.to_str())
                .map(str::to_ascii_lowercase)
                .unwrap_or_default();
            if MEDIA_EXTENSIONS.contains(&ext.as_str()) {
                return Some(path);
            }
        }
    }
    None
}

/// Streaming SHA-256 of a file, in `sha256:<hex>` form
pub async fn compute_file_digest(path: &Path) -> Result<String, std::io::Error> {
    let mut file = tokio::fs::File::open(path).await?;
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; 64 * 1024];
    loop {
        let read = file.read(&mut buf).await?;
        if read == 0 {
            break;
        }
        hasher.update(&buf[..read]);
    }
    Ok(format!("sha256:{}", hex::encode(hasher.finalize())))
}
