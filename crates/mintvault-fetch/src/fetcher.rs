//! Off-chain metadata retrieval
//!
//! Fetches the JSON document behind a metadata uri with a bounded
//! timeout, trying the strict schema first and falling back to tolerant
//! per-key extraction for documents that predate the nominal schema.

use crate::error::FetchError;
use crate::model::OffChainMetadata;
use serde_json::Value;
use std::time::Duration;

/// Public gateways for non-HTTP uri schemes
const ARWEAVE_GATEWAY: &str = "https://arweave.net/";
const IPFS_GATEWAY: &str = "https://ipfs.io/ipfs/";

/// Fetcher for off-chain metadata documents
#[derive(Debug, Clone)]
pub struct MetadataFetcher {
    http: reqwest::Client,
}

impl MetadataFetcher {
    /// Create a fetcher with the given per-request timeout
    ///
    /// # Errors
    /// Fails if the HTTP client cannot be constructed.
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("mintvault/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(FetchError::from)?;
        Ok(Self { http })
    }

    /// Fetch and parse the metadata document at `uri`
    ///
    /// # Errors
    /// [`FetchError::HttpStatus`] for non-2xx responses,
    /// [`FetchError::Json`] when the body is not JSON at all. A document
    /// that fails the strict schema but is still a JSON object goes
    /// through the tolerant fallback and succeeds.
    pub async fn fetch(&self, uri: &str) -> Result<OffChainMetadata, FetchError> {
        let resolved = resolve_gateway_url(uri);
        tracing::debug!("fetching metadata from {resolved}");

        let response = self
            .http
            .get(&resolved)
            .header("Accept", "application/json, text/plain, */*")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        parse_metadata(&body)
    }
}

/// Parse a metadata body, strict first, tolerant second
fn parse_metadata(body: &[u8]) -> Result<OffChainMetadata, FetchError> {
    match serde_json::from_slice::<OffChainMetadata>(body) {
        Ok(metadata) => Ok(metadata),
        Err(strict_err) => {
            tracing::debug!("strict metadata parse failed ({strict_err}), trying tolerant parse");
            let root: Value = serde_json::from_slice(body)?;
            OffChainMetadata::from_value(&root).ok_or(FetchError::Json(strict_err))
        }
    }
}

/// Rewrite ar:// and ipfs:// uris to fetchable gateway URLs
///
/// http(s) uris pass through untouched.
#[must_use]
pub fn resolve_gateway_url(uri: &str) -> String {
    if let Some(id) = uri.strip_prefix("ar://") {
        format!("{ARWEAVE_GATEWAY}{id}")
    } else if let Some(cid) = uri.strip_prefix("ipfs://") {
        let cid = cid.strip_prefix("ipfs/").unwrap_or(cid);
        format!("{IPFS_GATEWAY}{cid}")
    } else {
        uri.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gateway_resolution() {
        assert_eq!(
            resolve_gateway_url("ar://abc123"),
            "https://arweave.net/abc123"
        );
        assert_eq!(
            resolve_gateway_url("ipfs://QmZz"),
            "https://ipfs.io/ipfs/QmZz"
        );
        assert_eq!(
            resolve_gateway_url("ipfs://ipfs/QmZz"),
            "https://ipfs.io/ipfs/QmZz"
        );
        assert_eq!(
            resolve_gateway_url("https://example.com/m.json"),
            "https://example.com/m.json"
        );
    }

    #[test]
    fn parse_prefers_strict() {
        let body = br#"{"name":"Strict","image":"https://x/y.png"}"#;
        let metadata = parse_metadata(body).unwrap();
        assert_eq!(metadata.name, "Strict");
    }

    #[test]
    fn parse_falls_back_on_schema_variance() {
        let body = br#"{
            "name": "Loose",
            "properties": { "creators": [{"address": "a", "share": 100, "verified": 1}] }
        }"#;
        let metadata = parse_metadata(body).unwrap();
        assert_eq!(metadata.name, "Loose");
        assert!(metadata.properties.creators[0].verified);
    }

    #[test]
    fn parse_fails_only_on_non_json() {
        assert!(matches!(
            parse_metadata(b"<html>not json</html>"),
            Err(FetchError::Json(_))
        ));
    }

    #[test]
    fn parse_rejects_json_non_object() {
        // Valid JSON that is not an object cannot become metadata
        assert!(parse_metadata(b"[1,2,3]").is_err());
    }
}
