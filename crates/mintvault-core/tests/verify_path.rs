//! Verify path against a real filesystem store, no network involved

use chrono::Utc;
use mintvault_chain::{MintIdentity, Pubkey, RpcClient};
use mintvault_core::BackupPipeline;
use mintvault_fetch::{
    MediaAsset, MediaCategory, MediaDownloader, MetadataFetcher, NftBundle, OffChainMetadata,
};
use mintvault_store::{FileStorage, StorageBackend};
use mintvault_verify::VerificationStatus;
use std::time::Duration;
use url::Url;

fn wallet() -> Pubkey {
    Pubkey::new([1; 32])
}

fn mint() -> Pubkey {
    Pubkey::new([2; 32])
}

async fn pipeline_over(dir: &std::path::Path) -> BackupPipeline<FileStorage> {
    let timeout = Duration::from_secs(1);
    // The endpoint is never contacted on the verify path
    let rpc = RpcClient::new(Url::parse("http://127.0.0.1:1").unwrap(), timeout).unwrap();
    let fetcher = MetadataFetcher::new(timeout).unwrap();
    let downloader = MediaDownloader::new(timeout, 1024).unwrap();
    let store = FileStorage::open(dir).await.unwrap();
    BackupPipeline::new(rpc, fetcher, downloader, store, wallet())
}

async fn seed_record(pipeline: &BackupPipeline<FileStorage>, image_bytes: &[u8]) {
    let media_dir = pipeline.store().media_dir(&wallet(), &mint());
    tokio::fs::create_dir_all(&media_dir).await.unwrap();
    let image_path = media_dir.join("art.png");
    tokio::fs::write(&image_path, image_bytes).await.unwrap();

    let mut bundle = NftBundle::new(MintIdentity {
        mint: mint(),
        token_account: Pubkey::new([9; 32]),
        owner: wallet(),
        supply: 1,
        decimals: 0,
    });
    bundle.metadata = Some(OffChainMetadata {
        name: "Test NFT".to_string(),
        image: "https://x/art.png".to_string(),
        ..Default::default()
    });
    bundle.media_files.push(MediaAsset {
        url: "https://x/art.png".to_string(),
        local_path: image_path,
        filename: "art.png".to_string(),
        media_type: MediaCategory::Image,
        content_type: "image/png".to_string(),
        size: image_bytes.len() as u64,
        checksum: "deadbeef".to_string(),
        downloaded_at: Utc::now(),
    });
    pipeline.store().save_nft(&bundle).await.unwrap();
}

#[tokio::test]
async fn verify_updates_the_stored_record() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = pipeline_over(dir.path()).await;
    seed_record(&pipeline, b"image bytes").await;

    let (record, result) = pipeline.verify_mint(&mint(), false).await.unwrap();

    assert_eq!(result.status, VerificationStatus::Authentic);
    assert!(record.verified);
    assert!(record.last_check.is_some());

    // The update went through the store, not just the in-memory copy
    let reloaded = pipeline.store().get_nft(&wallet(), &mint()).await.unwrap();
    assert!(reloaded.verified);

    // And the proof document landed next to the record
    assert!(reloaded.backup_path.join("proof.json").exists());
}

#[tokio::test]
async fn tampering_flips_the_verified_flag() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = pipeline_over(dir.path()).await;
    seed_record(&pipeline, b"image bytes").await;

    // First pass records the baseline
    let (record, _) = pipeline.verify_mint(&mint(), false).await.unwrap();
    assert!(record.verified);

    // Alter the media on disk
    let media = pipeline.store().media_dir(&wallet(), &mint()).join("art.png");
    tokio::fs::write(&media, b"altered bytes").await.unwrap();

    let (record, result) = pipeline.verify_mint(&mint(), false).await.unwrap();
    assert_eq!(result.status, VerificationStatus::Tampered);
    assert!(!record.verified);
    assert_ne!(result.media_hash, result.stored_hash);
}

#[tokio::test]
async fn verify_of_unknown_mint_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = pipeline_over(dir.path()).await;

    let err = pipeline.verify_mint(&mint(), false).await.unwrap_err();
    assert!(err.is_recoverable());
    assert!(err.to_string().contains("not found"));
}
