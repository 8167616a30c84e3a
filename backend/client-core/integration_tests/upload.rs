use crate::helpers::{bearer, client_for};

use client_core::error::ErrorKind;
use client_core::fizzy_client::{DIRECT_UPLOADS_PATH, compute_checksum};

use std::io::Write;

use serde_json::json;
use tempfile::{NamedTempFile, TempDir};
use wiremock::matchers::{body_bytes, body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FILE_CONTENT: &[u8] = b"\x89PNG fake image bytes";

fn png_file(dir: &TempDir) -> std::path::PathBuf {
    let file_path = dir.path().join("shot.png");
    std::fs::write(&file_path, FILE_CONTENT).expect("write test file");
    file_path
}

fn blob_path() -> String {
    format!("/acct{DIRECT_UPLOADS_PATH}")
}

/// **VALUE**: Verifies the two-phase upload end to end.
///
/// **WHY THIS MATTERS**: The storage service authenticates via the signed URL
/// and headers it issued; sending our bearer token there leaks it to a third
/// party, and missing headers fail the integrity check.
///
/// **BUG THIS CATCHES**: Would catch a missing checksum, headers not copied to
/// the PUT, the API token sent to storage, or a rewritten signed id.
#[tokio::test]
async fn given_file_when_uploaded_then_blob_registered_and_bytes_put_to_storage() {
    // GIVEN
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let file_path = png_file(&dir);
    let upload_url = format!("{}/storage/abc", server.uri());

    Mock::given(method("POST"))
        .and(path(blob_path()))
        .and(header("Authorization", bearer().as_str()))
        .and(body_partial_json(json!({
            "blob": {
                "filename": "shot.png",
                "byte_size": FILE_CONTENT.len(),
                "content_type": "image/png",
                "checksum": compute_checksum(FILE_CONTENT),
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "signed_id": "eyJfcmFpbHMi--abc",
            "direct_upload": {
                "url": upload_url,
                "headers": {"Content-Type": "image/png", "Content-MD5": compute_checksum(FILE_CONTENT)},
            }
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/storage/abc"))
        .and(header("Content-Type", "image/png"))
        .and(body_bytes(FILE_CONTENT))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    // WHEN
    let response = client_for(&server)
        .upload_file(&file_path)
        .await
        .expect("upload should succeed");

    // THEN
    assert_eq!(response.data, Some(json!({"signed_id": "eyJfcmFpbHMi--abc"})));

    let requests = server.received_requests().await.expect("recording enabled");
    let put = requests
        .iter()
        .find(|r| r.method.as_str() == "PUT")
        .expect("storage PUT was sent");
    assert!(put.headers.get("authorization").is_none(), "token must not reach storage");
}

/// **VALUE**: Verifies a malformed registration response stops before the PUT.
///
/// **BUG THIS CATCHES**: Would catch a PUT to an empty URL or a panic on missing fields.
#[tokio::test]
async fn given_incomplete_blob_responses_when_uploaded_then_specific_errors() {
    let cases = [
        (json!([]), "Invalid blob creation response"),
        (json!({"signed_id": "s"}), "Missing direct_upload in response"),
        (json!({"signed_id": "s", "direct_upload": {}}), "Missing upload URL in response"),
        (json!({"direct_upload": {"url": "http://x/y"}}), "Missing signed_id in response"),
    ];

    for (body, expected) in cases {
        let server = MockServer::start().await;
        let dir = TempDir::new().unwrap();
        Mock::given(method("POST"))
            .and(path(blob_path()))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let error = client_for(&server)
            .upload_file(&png_file(&dir))
            .await
            .expect_err("upload should fail");

        assert_eq!(error.kind, ErrorKind::General);
        assert_eq!(error.message, expected);
        assert_eq!(server.received_requests().await.map(|r| r.len()), Some(1));
    }
}

/// **VALUE**: Verifies storage rejection surfaces status and body.
///
/// **BUG THIS CATCHES**: Would catch a failed PUT being reported as success.
#[tokio::test]
async fn given_storage_rejects_put_when_uploaded_then_upload_failed_error() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    Mock::given(method("POST"))
        .and(path(blob_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "signed_id": "s",
            "direct_upload": {"url": format!("{}/storage/abc", server.uri()), "headers": {}},
        })))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/storage/abc"))
        .respond_with(ResponseTemplate::new(403).set_body_string("SignatureDoesNotMatch"))
        .mount(&server)
        .await;

    let error = client_for(&server)
        .upload_file(&png_file(&dir))
        .await
        .expect_err("upload should fail");

    assert_eq!(error.kind, ErrorKind::General);
    assert_eq!(error.message, "Upload failed: 403 SignatureDoesNotMatch");
}

/// **VALUE**: Verifies the storage PUT body is never parsed.
///
/// **WHY THIS MATTERS**: Storage services answer with XML or nothing at all;
/// only the status decides whether the upload worked.
///
/// **BUG THIS CATCHES**: Would catch the PUT response being fed to the JSON
/// parser and failing an upload that succeeded.
#[tokio::test]
async fn given_storage_answers_non_json_when_uploaded_then_signed_id_returned() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    Mock::given(method("POST"))
        .and(path(blob_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "signed_id": "sid",
            "direct_upload": {"url": format!("{}/storage/xml", server.uri())},
        })))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/storage/xml"))
        .respond_with(ResponseTemplate::new(204).set_body_string("<xml>not json</xml>"))
        .expect(1)
        .mount(&server)
        .await;

    let response = client_for(&server)
        .upload_file(&png_file(&dir))
        .await
        .expect("upload should succeed");

    assert_eq!(response.data, Some(json!({"signed_id": "sid"})));
}

/// **VALUE**: Verifies a missing local file fails before any request.
///
/// **BUG THIS CATCHES**: Would catch a blob registered for a file that cannot be read.
#[tokio::test]
async fn given_missing_file_when_uploaded_then_no_request_is_sent() {
    let server = MockServer::start().await;

    let error = client_for(&server)
        .upload_file(std::path::Path::new("/definitely/not/here.png"))
        .await
        .expect_err("read should fail");

    assert_eq!(error.kind, ErrorKind::General);
    assert_eq!(server.received_requests().await.map(|r| r.len()), Some(0));
}

/// **VALUE**: Verifies multipart uploads carry the file part and extra fields.
///
/// **BUG THIS CATCHES**: Would catch a JSON content type on multipart requests
/// or extra fields being dropped.
#[tokio::test]
async fn given_file_when_multipart_uploaded_then_form_has_file_and_fields() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/acct/users/u1/avatar"))
        .and(header("Authorization", bearer().as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let mut file = NamedTempFile::with_suffix(".txt").unwrap();
    file.write_all(b"hello multipart").unwrap();

    let response = client_for(&server)
        .upload_file_multipart(
            "/users/u1/avatar",
            "user[avatar]",
            file.path(),
            &[("user[name]".to_string(), "Ada".to_string())],
        )
        .await
        .expect("multipart should succeed");

    assert_eq!(response.data, Some(json!({"ok": true})));

    let requests = server.received_requests().await.expect("recording enabled");
    let request = &requests[0];
    let content_type = request
        .headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(content_type.starts_with("multipart/form-data"));
    let body = String::from_utf8_lossy(&request.body);
    assert!(body.contains(r#"name="user[avatar]""#));
    assert!(body.contains("hello multipart"));
    assert!(body.contains(r#"name="user[name]""#));
    assert!(body.contains("Ada"));
}
