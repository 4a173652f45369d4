//! Backup pipeline orchestration
//!
//! Write path: resolve the mint identity, locate and decode the on-chain
//! metadata account, fetch the off-chain document, stream the referenced
//! media, persist the aggregate. Verify path: recompute digests over the
//! stored record and update its verification state.
//!
//! Per-asset and per-mint failures are collected and reported; only
//! configuration and storage I/O failures abort a run.

use crate::config::VaultConfig;
use crate::error::VaultError;
use mintvault_chain::{
    decode_metadata_account, decode_mint_account, derive_metadata_address, ChainError,
    MetadataAccount, MintIdentity, Pubkey, RpcClient,
};
use mintvault_fetch::{
    collect_media_urls, MediaDownloader, MetadataFetcher, NftBundle,
};
use mintvault_store::{FileStorage, StorageBackend, StoredNft};
use mintvault_verify::{verify_backup, ProofDocument, VerificationResult, VerificationStatus};
use serde::{Deserialize, Serialize};

/// Outcome of one backup run for one mint
///
/// Partial success is first-class: the record may be saved while some
/// assets failed, and the caller sees exactly which.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupReport {
    /// The mint that was processed
    pub mint: Pubkey,
    /// Display name, once known
    pub name: String,
    /// Media URLs referenced by the metadata
    pub media_found: usize,
    /// Media assets actually persisted
    pub media_backed_up: usize,
    /// Whether the aggregate record was saved
    pub saved: bool,
    /// Per-step error messages for everything that was skipped
    pub errors: Vec<String>,
}

impl BackupReport {
    fn new(mint: Pubkey) -> Self {
        Self {
            mint,
            name: String::new(),
            media_found: 0,
            media_backed_up: 0,
            saved: false,
            errors: Vec::new(),
        }
    }
}

/// The backup pipeline bound to one wallet and one storage backend
pub struct BackupPipeline<S> {
    rpc: RpcClient,
    fetcher: MetadataFetcher,
    downloader: MediaDownloader,
    store: S,
    wallet: Pubkey,
}

impl BackupPipeline<FileStorage> {
    /// Build a pipeline with the filesystem backend from a validated
    /// configuration
    ///
    /// # Errors
    /// Configuration failures abort here, before any network I/O.
    pub async fn from_config(config: &VaultConfig) -> Result<Self, VaultError> {
        config.validate()?;
        let rpc = RpcClient::new(config.rpc_url.clone(), config.timeout)?;
        let fetcher = MetadataFetcher::new(config.timeout)?;
        let downloader = MediaDownloader::new(config.timeout, config.max_media_bytes)?;
        let store = FileStorage::open(&config.backup_dir).await?;
        Ok(Self::new(rpc, fetcher, downloader, store, config.wallet))
    }
}

impl<S: StorageBackend> BackupPipeline<S> {
    /// Assemble a pipeline from its collaborators
    #[must_use]
    pub fn new(
        rpc: RpcClient,
        fetcher: MetadataFetcher,
        downloader: MediaDownloader,
        store: S,
        wallet: Pubkey,
    ) -> Self {
        Self {
            rpc,
            fetcher,
            downloader,
            store,
            wallet,
        }
    }

    /// The storage backend, for listing and deletion
    #[inline]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The wallet this pipeline backs up
    #[inline]
    #[must_use]
    pub fn wallet(&self) -> Pubkey {
        self.wallet
    }

    /// Probe the RPC endpoint
    pub async fn check_connection(&self) -> Result<String, VaultError> {
        Ok(self.rpc.get_version().await?)
    }

    /// Resolve and validate the mint identity for this wallet
    ///
    /// # Errors
    /// [`ChainError::NotNonFungible`] when the mint is not an NFT,
    /// [`ChainError::TokenAccountNotFound`] when the wallet does not
    /// hold it.
    pub async fn resolve_identity(&self, mint: &Pubkey) -> Result<MintIdentity, VaultError> {
        let account = self.rpc.get_account_info(mint).await?;
        let (supply, decimals) = decode_mint_account(&account.data)?;
        let token_account = self.rpc.find_token_account(&self.wallet, mint).await?;
        let identity = MintIdentity {
            mint: *mint,
            token_account,
            owner: self.wallet,
            supply,
            decimals,
        };
        identity.validate_non_fungible()?;
        Ok(identity)
    }

    /// Locate and decode the on-chain metadata account for a mint
    pub async fn fetch_onchain_metadata(
        &self,
        mint: &Pubkey,
    ) -> Result<MetadataAccount, VaultError> {
        let metadata_address = derive_metadata_address(mint)
            .map_err(|e| ChainError::MalformedResponse(e.to_string()))?;
        let account = self.rpc.get_account_info(&metadata_address).await?;
        Ok(decode_metadata_account(&account.data).map_err(ChainError::from)?)
    }

    /// Back up one mint end to end
    ///
    /// Metadata and media failures are collected into the report; the
    /// record is still saved with whatever was acquired. Only identity
    /// resolution and the final store write can fail the whole call.
    pub async fn backup_mint(&self, mint: &Pubkey) -> Result<BackupReport, VaultError> {
        let mut report = BackupReport::new(*mint);
        tracing::info!("backing up mint {mint}");

        let identity = self.resolve_identity(mint).await?;
        let mut bundle = NftBundle::new(identity);

        match self.fetch_onchain_metadata(mint).await {
            Ok(onchain) => {
                bundle.metadata_uri = onchain.uri.clone();
                match self.fetcher.fetch(&onchain.uri).await {
                    Ok(document) => bundle.metadata = Some(document),
                    Err(error) => {
                        tracing::warn!("could not fetch off-chain metadata: {error}");
                        report.errors.push(format!("off-chain metadata: {error}"));
                    }
                }
            }
            Err(error) => {
                // Some mints simply have no standard metadata account
                tracing::warn!("could not resolve metadata for {mint}: {error}");
                report.errors.push(format!("on-chain metadata: {error}"));
            }
        }

        if let Some(metadata) = bundle.metadata.clone() {
            let urls = collect_media_urls(&metadata);
            report.media_found = urls.len();
            let media_dir = self.store.media_dir(&self.wallet, mint);

            for url in urls {
                match self.downloader.download(&url, &media_dir).await {
                    Ok(asset) => {
                        tracing::info!("backed up {} ({})", asset.filename, asset.media_type);
                        bundle.media_files.push(asset);
                        report.media_backed_up += 1;
                    }
                    Err(error) => {
                        // One failed asset never aborts its siblings
                        tracing::warn!("failed to download {url}: {error}");
                        report.errors.push(format!("{url}: {error}"));
                    }
                }
            }
        }

        report.name = bundle.display_name();
        self.store.save_nft(&bundle).await?;
        report.saved = true;
        Ok(report)
    }

    /// Verify one stored record and update its verification state
    ///
    /// Runs the digest engine over the record directory, writes the
    /// proof document, and persists `verified` / `last_check` through
    /// the store.
    pub async fn verify_mint(
        &self,
        mint: &Pubkey,
        force_recompute: bool,
    ) -> Result<(StoredNft, VerificationResult), VaultError> {
        let mut record = self.store.get_nft(&self.wallet, mint).await?;

        let result = verify_backup(&record.backup_path, force_recompute).await;

        let proof = ProofDocument::from_result(&result, Some(&mint.to_string()));
        if let Err(error) = proof.write(&record.backup_path).await {
            tracing::warn!("failed to write proof: {error}");
        }

        record.verified = result.status == VerificationStatus::Authentic;
        record.last_check = Some(result.verified_at);
        self.store.update_stored(&record).await?;

        Ok((record, result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_starts_empty() {
        let report = BackupReport::new(Pubkey::new([1; 32]));
        assert_eq!(report.media_found, 0);
        assert_eq!(report.media_backed_up, 0);
        assert!(!report.saved);
        assert!(report.errors.is_empty());
    }

    #[test]
    fn report_serializes_for_display_consumers() {
        let mut report = BackupReport::new(Pubkey::new([1; 32]));
        report.name = "Test NFT".to_string();
        report.media_found = 2;
        report.media_backed_up = 1;
        report.errors.push("https://x/y.png: http status 404".to_string());

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["media_found"], 2);
        assert_eq!(json["media_backed_up"], 1);
        assert_eq!(json["errors"].as_array().unwrap().len(), 1);
    }
}
