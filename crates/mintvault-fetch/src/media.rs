//! Size-bounded streaming media acquisition
//!
//! Streams each referenced asset to disk while feeding a SHA-256
//! accumulator from the same byte stream, so the recorded checksum covers
//! exactly the bytes persisted. The size cap is enforced twice: against
//! the declared length before any disk write, and against the running
//! transfer count mid-stream when no length was declared.

use crate::error::FetchError;
use crate::fetcher::resolve_gateway_url;
use crate::model::OffChainMetadata;
use chrono::{DateTime, Utc};
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use url::Url;

/// Default cap on a single asset: 100 MiB
pub const DEFAULT_MAX_MEDIA_BYTES: u64 = 100 * 1024 * 1024;

/// Inferred media category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaCategory {
    Image,
    Video,
    Audio,
    Animation,
    Unknown,
}

impl std::fmt::Display for MediaCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Image => "image",
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Animation => "animation",
            Self::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// A downloaded media asset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaAsset {
    /// Source URL the bytes came from
    pub url: String,
    /// Where the bytes were written
    pub local_path: PathBuf,
    /// Final filename within the media directory
    pub filename: String,
    /// Inferred category
    pub media_type: MediaCategory,
    /// Declared content type, empty if the server sent none
    pub content_type: String,
    /// Bytes written to disk
    pub size: u64,
    /// Hex SHA-256 over exactly the persisted bytes
    pub checksum: String,
    /// When the download completed
    pub downloaded_at: DateTime<Utc>,
}

/// Streaming downloader with a per-asset size cap
#[derive(Debug, Clone)]
pub struct MediaDownloader {
    http: reqwest::Client,
    max_bytes: u64,
}

impl MediaDownloader {
    /// Create a downloader
    ///
    /// # Errors
    /// Fails if the HTTP client cannot be constructed.
    pub fn new(timeout: Duration, max_bytes: u64) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("mintvault/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(FetchError::from)?;
        Ok(Self { http, max_bytes })
    }

    /// The configured per-asset cap
    #[inline]
    #[must_use]
    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    /// Download one asset into `dest_dir`
    ///
    /// On any failure after the file was created, the partial file is
    /// removed; a failed download never leaves truncated bytes behind.
    ///
    /// # Errors
    /// [`FetchError::SizeLimitExceeded`] when the declared length or the
    /// actual transfer exceeds the cap; [`FetchError::HttpStatus`] for
    /// non-2xx responses.
    pub async fn download(
        &self,
        media_url: &str,
        dest_dir: &Path,
    ) -> Result<MediaAsset, FetchError> {
        let resolved = resolve_gateway_url(media_url);
        let parsed = Url::parse(&resolved)?;

        tokio::fs::create_dir_all(dest_dir).await?;

        let response = self.http.get(parsed.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
            });
        }

        // Reject on the declared length before touching the disk
        if let Some(declared) = response.content_length() {
            if declared > self.max_bytes {
                return Err(FetchError::SizeLimitExceeded {
                    limit: self.max_bytes,
                });
            }
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        let mut filename = extract_filename(&parsed);
        if filename.is_empty() {
            filename = format!("media_{}", Utc::now().timestamp());
        }
        let media_type = infer_category(&content_type, &filename);
        if !filename.contains('.') {
            if let Some(ext) = extension_for_content_type(&content_type) {
                filename.push_str(ext);
            }
        }

        let local_path = dest_dir.join(&filename);
        let mut file = tokio::fs::File::create(&local_path).await?;
        let mut hasher = Sha256::new();
        let mut written: u64 = 0;

        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(error) => {
                    remove_partial(&local_path).await;
                    return Err(error.into());
                }
            };
            written += chunk.len() as u64;
            if written > self.max_bytes {
                drop(file);
                remove_partial(&local_path).await;
                return Err(FetchError::SizeLimitExceeded {
                    limit: self.max_bytes,
                });
            }
            hasher.update(&chunk);
            if let Err(error) = file.write_all(&chunk).await {
                drop(file);
                remove_partial(&local_path).await;
                return Err(error.into());
            }
        }
        file.flush().await?;

        let checksum = hex::encode(hasher.finalize());
        tracing::info!("downloaded {filename} ({written} bytes, sha256 {checksum})");

        Ok(MediaAsset {
            url: media_url.to_string(),
            local_path,
            filename,
            media_type,
            content_type,
            size: written,
            checksum,
            downloaded_at: Utc::now(),
        })
    }
}

/// Remove a partial file, best effort
async fn remove_partial(path: &Path) {
    if let Err(error) = tokio::fs::remove_file(path).await {
        tracing::warn!("failed to remove partial file {}: {error}", path.display());
    }
}

/// Collect downloadable URLs from a metadata document
///
/// Order is image, animation, then the properties file list;
/// duplicates keep their first occurrence.
#[must_use]
pub fn collect_media_urls(metadata: &OffChainMetadata) -> Vec<String> {
    let mut urls = Vec::new();
    let mut push = |url: &str| {
        if !url.is_empty() && !urls.iter().any(|existing| existing == url) {
            urls.push(url.to_string());
        }
    };

    push(&metadata.image);
    push(&metadata.animation_url);
    for file in &metadata.properties.files {
        push(&file.uri);
    }
    urls
}

/// Take the last path segment as the filename, query stripped
fn extract_filename(url: &Url) -> String {
    let name = url
        .path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).next_back())
        .unwrap_or_default();
    name.split('?').next().unwrap_or_default().to_string()
}

/// Infer the category, content type first, extension second
fn infer_category(content_type: &str, filename: &str) -> MediaCategory {
    let content_type = content_type.to_ascii_lowercase();
    let filename = filename.to_ascii_lowercase();

    if content_type.starts_with("image/") {
        return MediaCategory::Image;
    }
    if content_type.starts_with("video/") {
        return MediaCategory::Video;
    }
    if content_type.starts_with("audio/") {
        return MediaCategory::Audio;
    }
    if content_type == "application/octet-stream" && filename.ends_with(".gif") {
        return MediaCategory::Animation;
    }

    const IMAGE_EXTS: [&str; 6] = [".jpg", ".jpeg", ".png", ".gif", ".webp", ".svg"];
    const VIDEO_EXTS: [&str; 4] = [".mp4", ".webm", ".mov", ".avi"];
    const AUDIO_EXTS: [&str; 3] = [".mp3", ".wav", ".ogg"];

    if IMAGE_EXTS.iter().any(|ext| filename.ends_with(ext)) {
        MediaCategory::Image
    } else if VIDEO_EXTS.iter().any(|ext| filename.ends_with(ext)) {
        MediaCategory::Video
    } else if AUDIO_EXTS.iter().any(|ext| filename.ends_with(ext)) {
        MediaCategory::Audio
    } else {
        MediaCategory::Unknown
    }
}

/// Map a declared content type to a filename extension
fn extension_for_content_type(content_type: &str) -> Option<&'static str> {
    match content_type.to_ascii_lowercase().as_str() {
        "image/jpeg" => Some(".jpg"),
        "image/png" => Some(".png"),
        "image/gif" => Some(".gif"),
        "image/webp" => Some(".webp"),
        "image/svg+xml" => Some(".svg"),
        "video/mp4" => Some(".mp4"),
        "video/webm" => Some(".webm"),
        "audio/mpeg" => Some(".mp3"),
        "audio/wav" => Some(".wav"),
        "audio/ogg" => Some(".ogg"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FileRef;

    #[test]
    fn category_inference_table() {
        let cases = [
            ("image/jpeg", "test.jpg", MediaCategory::Image),
            ("video/mp4", "test.mp4", MediaCategory::Video),
            ("audio/mpeg", "test.mp3", MediaCategory::Audio),
            ("application/octet-stream", "test.gif", MediaCategory::Animation),
            ("application/octet-stream", "test.png", MediaCategory::Image),
            ("", "clip.webm", MediaCategory::Video),
            ("text/plain", "test.txt", MediaCategory::Unknown),
        ];
        for (content_type, filename, expected) in cases {
            assert_eq!(
                infer_category(content_type, filename),
                expected,
                "content type {content_type:?}, filename {filename:?}"
            );
        }
    }

    #[test]
    fn filename_extraction() {
        let url = Url::parse("https://cdn.example.com/assets/art.png?width=600").unwrap();
        assert_eq!(extract_filename(&url), "art.png");

        let bare = Url::parse("https://cdn.example.com/").unwrap();
        assert_eq!(extract_filename(&bare), "");
    }

    #[test]
    fn extension_synthesis() {
        assert_eq!(extension_for_content_type("image/png"), Some(".png"));
        assert_eq!(extension_for_content_type("IMAGE/JPEG"), Some(".jpg"));
        assert_eq!(extension_for_content_type("application/pdf"), None);
    }

    #[test]
    fn media_url_collection_order_and_dedup() {
        let metadata = OffChainMetadata {
            image: "https://x/a.png".to_string(),
            animation_url: "https://x/b.mp4".to_string(),
            properties: crate::model::Properties {
                files: vec![
                    FileRef {
                        uri: "https://x/a.png".to_string(),
                        file_type: "image/png".to_string(),
                    },
                    FileRef {
                        uri: "https://x/c.gif".to_string(),
                        file_type: "image/gif".to_string(),
                    },
                ],
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(
            collect_media_urls(&metadata),
            vec!["https://x/a.png", "https://x/b.mp4", "https://x/c.gif"]
        );
    }

    #[test]
    fn empty_metadata_yields_no_urls() {
        assert!(collect_media_urls(&OffChainMetadata::default()).is_empty());
    }
}
