use crate::helpers::{bearer, client_for};

use client_core::error::ErrorKind;
use client_core::fizzy_client::FizzyClient;
use common::RedactedToken;

use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// **VALUE**: Verifies an authenticated download lands on disk byte for byte.
///
/// **BUG THIS CATCHES**: Would catch a missing bearer token or text decoding
/// corrupting binary content.
#[tokio::test]
async fn given_attachment_url_when_downloaded_then_file_matches_body() {
    // GIVEN
    let server = MockServer::start().await;
    let content: &[u8] = &[0, 159, 146, 150, 255];
    Mock::given(method("GET"))
        .and(path("/acct/blobs/xyz/report.bin"))
        .and(header("Authorization", bearer().as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(content))
        .expect(1)
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();
    let destination = dir.path().join("report.bin");
    let url = format!("{}/acct/blobs/xyz/report.bin", server.uri());

    // WHEN
    client_for(&server)
        .download_file(&url, &destination)
        .await
        .expect("download should succeed");

    // THEN
    assert_eq!(std::fs::read(&destination).unwrap(), content);
}

/// **VALUE**: Verifies a failed download leaves no file behind.
///
/// **WHY THIS MATTERS**: A zero-byte or HTML "file" at the destination looks
/// like a successful download to anything that checks existence.
///
/// **BUG THIS CATCHES**: Would catch the destination being created before the
/// status is checked.
#[tokio::test]
async fn given_missing_blob_when_downloaded_then_general_error_and_no_file() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/acct/blobs/gone"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();
    let destination = dir.path().join("gone.bin");

    let error = client_for(&server)
        .download_file("/blobs/gone", &destination)
        .await
        .expect_err("404 should fail");

    assert_eq!(error.kind, ErrorKind::General);
    assert_eq!(error.message, "Download failed: 404 Not Found");
    assert!(!destination.exists());
}

/// **VALUE**: Verifies transport and filesystem failures are told apart.
///
/// **BUG THIS CATCHES**: Would catch a write failure being reported as a
/// network problem (exit 7) or vice versa.
#[tokio::test]
async fn given_bad_network_or_destination_when_downloaded_then_kinds_differ() {
    let dir = TempDir::new().unwrap();
    let offline = FizzyClient::new("http://127.0.0.1:1", RedactedToken::new("t"), "acct")
        .expect("client should build");

    let network = offline
        .download_file("/blobs/x", &dir.path().join("x"))
        .await
        .expect_err("connect should fail");
    assert_eq!(network.kind, ErrorKind::Network);

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/acct/blobs/x"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"data".to_vec()))
        .mount(&server)
        .await;

    let unwritable = client_for(&server)
        .download_file("/blobs/x", &dir.path().join("missing-dir").join("x"))
        .await
        .expect_err("write should fail");
    assert_eq!(unwritable.kind, ErrorKind::General);
    assert!(unwritable.message.starts_with("Failed to write file"));
}
