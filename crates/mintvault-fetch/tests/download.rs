//! Media download behavior against a local canned-response server

use mintvault_fetch::{FetchError, MediaCategory, MediaDownloader};
use sha2::{Digest, Sha256};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

// 1x1 transparent PNG
const PNG_BYTES: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
    0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00,
    0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49,
    0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

/// Serve one connection with the given raw response bytes
async fn serve_once(response: Vec<u8>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        // Drain the request head before answering
        let mut buf = [0u8; 4096];
        let _ = socket.read(&mut buf).await;
        socket.write_all(&response).await.unwrap();
        socket.shutdown().await.ok();
    });
    format!("http://{addr}")
}

fn response_with_body(content_type: &str, body: &[u8]) -> Vec<u8> {
    let mut response = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        body.len()
    )
    .into_bytes();
    response.extend_from_slice(body);
    response
}

fn downloader(max_bytes: u64) -> MediaDownloader {
    MediaDownloader::new(Duration::from_secs(5), max_bytes).unwrap()
}

#[tokio::test]
async fn downloads_and_checksums_an_image() {
    let base = serve_once(response_with_body("image/png", PNG_BYTES)).await;
    let dir = tempfile::tempdir().unwrap();

    let asset = downloader(1024 * 1024)
        .download(&format!("{base}/test.png"), dir.path())
        .await
        .unwrap();

    assert_eq!(asset.media_type, MediaCategory::Image);
    assert_eq!(asset.content_type, "image/png");
    assert_eq!(asset.filename, "test.png");
    assert_eq!(asset.size, PNG_BYTES.len() as u64);
    assert_eq!(asset.local_path, dir.path().join("test.png"));

    // Checksum covers exactly the bytes on disk
    let on_disk = std::fs::read(&asset.local_path).unwrap();
    assert_eq!(on_disk, PNG_BYTES);
    assert_eq!(asset.checksum, hex::encode(Sha256::digest(&on_disk)));
}

#[tokio::test]
async fn declared_oversize_is_rejected_before_any_write() {
    let response =
        b"HTTP/1.1 200 OK\r\nContent-Type: image/jpeg\r\nContent-Length: 200000000\r\nConnection: close\r\n\r\n"
            .to_vec();
    let base = serve_once(response).await;
    let dir = tempfile::tempdir().unwrap();

    let result = downloader(1024)
        .download(&format!("{base}/large.jpg"), dir.path())
        .await;

    assert!(matches!(
        result,
        Err(FetchError::SizeLimitExceeded { limit: 1024 })
    ));
    // Nothing was written
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn undeclared_oversize_aborts_and_removes_partial_file() {
    // No Content-Length: the body is close-delimited and larger than the cap
    let mut response =
        b"HTTP/1.1 200 OK\r\nContent-Type: application/octet-stream\r\nConnection: close\r\n\r\n"
            .to_vec();
    response.extend_from_slice(&vec![0xAB; 64 * 1024]);
    let base = serve_once(response).await;
    let dir = tempfile::tempdir().unwrap();

    let result = downloader(4096)
        .download(&format!("{base}/blob.bin"), dir.path())
        .await;

    assert!(matches!(result, Err(FetchError::SizeLimitExceeded { .. })));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn non_success_status_is_reported() {
    let base = serve_once(b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n".to_vec()).await;
    let dir = tempfile::tempdir().unwrap();

    let result = downloader(1024)
        .download(&format!("{base}/missing.png"), dir.path())
        .await;

    assert!(matches!(result, Err(FetchError::HttpStatus { status: 404 })));
}

#[tokio::test]
async fn synthesizes_filename_for_bare_path() {
    let base = serve_once(response_with_body("image/png", PNG_BYTES)).await;
    let dir = tempfile::tempdir().unwrap();

    let asset = downloader(1024 * 1024)
        .download(&base, dir.path())
        .await
        .unwrap();

    assert!(asset.filename.starts_with("media_"));
    assert!(asset.filename.ends_with(".png"));
    assert!(asset.local_path.exists());
}
