use crate::helpers::{bearer, client_for};

use client_core::error::ErrorKind;
use client_core::fizzy_client::FizzyClient;
use common::RedactedToken;

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// **VALUE**: Verifies every API request carries auth, accept and user agent.
///
/// **WHY THIS MATTERS**: The server rejects requests without the bearer token
/// and negotiates JSON from `Accept`.
///
/// **BUG THIS CATCHES**: Would catch a request path that bypasses
/// `prepare_request()`.
#[tokio::test]
async fn given_get_when_sent_then_standard_headers_are_attached() {
    // GIVEN
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/acct/boards.json"))
        .and(header("Authorization", bearer().as_str()))
        .and(header("Accept", "application/json"))
        .and(header("User-Agent", "fizzy-cli/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": "1"}])))
        .expect(1)
        .mount(&server)
        .await;

    // WHEN
    let response = client_for(&server).get("/boards.json").await.expect("request should succeed");

    // THEN
    assert_eq!(response.status, 200);
    assert_eq!(response.data, Some(json!([{"id": "1"}])));
}

/// **VALUE**: Verifies JSON bodies are sent with a JSON content type.
///
/// **BUG THIS CATCHES**: Would catch bodies sent as form data or without a type.
#[tokio::test]
async fn given_body_when_posted_then_json_is_sent_and_location_captured() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/acct/boards.json"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(json!({"board": {"name": "Roadmap"}})))
        .respond_with(ResponseTemplate::new(201).insert_header("Location", "/acct/boards/42.json"))
        .expect(1)
        .mount(&server)
        .await;

    let response = client_for(&server)
        .post("/boards.json", Some(&json!({"board": {"name": "Roadmap"}})))
        .await
        .expect("create should succeed");

    assert_eq!(response.status, 201);
    assert_eq!(response.location.as_deref(), Some("/acct/boards/42.json"));
    assert_eq!(response.data, None);
    assert_eq!(response.data_or_null(), json!(null));
}

/// **VALUE**: Verifies status classification with the server's message.
///
/// **WHY THIS MATTERS**: The exit code is decided here; an auth failure that
/// exits 1 instead of 3 breaks scripted re-login flows.
///
/// **BUG THIS CATCHES**: Would catch the `{"error": ...}` message being ignored
/// or the status being dropped from the error.
#[tokio::test]
async fn given_error_statuses_when_requested_then_kind_message_and_status_match() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/acct/unauthorized"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"error": "Invalid token"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/acct/forbidden"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({"error": "Nope"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/acct/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/acct/invalid"))
        .respond_with(
            ResponseTemplate::new(422)
                .set_body_json(json!({"error": "Invalid", "title": ["can't be blank"]})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/acct/broken"))
        .respond_with(ResponseTemplate::new(500).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = client_for(&server);

    let unauthorized = client.get("/unauthorized").await.expect_err("401 should fail");
    assert_eq!(unauthorized.kind, ErrorKind::Authentication);
    assert_eq!(unauthorized.message, "Invalid token");
    assert_eq!(unauthorized.status, Some(401));
    assert_eq!(unauthorized.details, None);
    assert_eq!(unauthorized.exit_code(), 3);

    let forbidden = client.get("/forbidden").await.expect_err("403 should fail");
    assert_eq!(forbidden.kind, ErrorKind::Forbidden);

    let missing = client.get("/missing").await.expect_err("404 should fail");
    assert_eq!(missing.kind, ErrorKind::NotFound);
    assert_eq!(missing.message, "Not Found");

    let invalid = client.get("/invalid").await.expect_err("422 should fail");
    assert_eq!(invalid.kind, ErrorKind::Validation);
    assert_eq!(invalid.details.as_ref().map(|d| d["title"].clone()), Some(json!(["can't be blank"])));

    // Non-JSON error bodies are still classified by status.
    let broken = client.get("/broken").await.expect_err("500 should fail");
    assert_eq!(broken.kind, ErrorKind::General);
    assert_eq!(broken.message, "Request failed: 500 Internal Server Error");
    assert_eq!(broken.status, Some(500));
    let partial = broken.response().expect("partial response kept");
    assert_eq!(partial.body, b"<html>oops</html>".to_vec());
}

/// **VALUE**: Verifies an unparseable success body is a general error that
/// still exposes the raw response.
///
/// **WHY THIS MATTERS**: Proxies sometimes answer 200 with HTML; the command
/// must fail loudly but the caller can still see what came back.
///
/// **BUG THIS CATCHES**: Would catch the parse failure being swallowed as
/// `data: null` success.
#[tokio::test]
async fn given_invalid_json_when_requested_then_general_error_keeps_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/acct/cards.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let error = client_for(&server).get("/cards.json").await.expect_err("parse should fail");

    assert_eq!(error.kind, ErrorKind::General);
    assert!(error.message.starts_with("Failed to parse JSON response"));
    let response = error.response().expect("response kept");
    assert_eq!(response.status, 200);
    assert_eq!(response.body, b"not json".to_vec());
}

/// **VALUE**: Verifies connection failures become network errors.
///
/// **BUG THIS CATCHES**: Would catch transport errors exiting 1 instead of 7.
#[tokio::test]
async fn given_unreachable_server_when_requested_then_network_error() {
    let client = FizzyClient::new("http://127.0.0.1:1", RedactedToken::new("t"), "acct")
        .expect("client should build");

    let error = client.get("/boards.json").await.expect_err("connect should fail");

    assert_eq!(error.kind, ErrorKind::Network);
    assert_eq!(error.exit_code(), 7);
    assert!(error.message.starts_with("Request failed:"));
    assert_eq!(error.status, None);
}

/// **VALUE**: Verifies `follow_location` fetches the created resource and
/// treats an empty location as nothing to fetch.
///
/// **BUG THIS CATCHES**: Would catch a double account prefix on the Location
/// path or an empty location hitting the API root.
#[tokio::test]
async fn given_location_when_followed_then_resource_is_fetched_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/acct/boards/42.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "42"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);

    let followed = client
        .follow_location("/acct/boards/42.json")
        .await
        .expect("follow should succeed")
        .expect("location is not empty");
    assert_eq!(followed.data, Some(json!({"id": "42"})));

    let nothing = client.follow_location("").await.expect("empty is fine");
    assert!(nothing.is_none());
}

/// **VALUE**: Verifies PATCH, PUT and DELETE use their own methods.
///
/// **BUG THIS CATCHES**: Would catch every mutation being sent as POST.
#[tokio::test]
async fn given_mutations_when_sent_then_methods_are_preserved() {
    let server = MockServer::start().await;
    for verb in ["PATCH", "PUT", "DELETE"] {
        Mock::given(method(verb))
            .and(path("/acct/cards/7"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;
    }

    let client = client_for(&server);
    let body = json!({"card": {"title": "x"}});

    assert_eq!(client.patch("/cards/7", Some(&body)).await.map(|r| r.status).ok(), Some(204));
    assert_eq!(client.put("/cards/7", None).await.map(|r| r.status).ok(), Some(204));
    assert_eq!(client.delete("/cards/7").await.map(|r| r.status).ok(), Some(204));
}
