// Unit tests for URL resolution and Link header parsing
// Request/response behavior against a live server is in integration_tests/fizzy_client.rs

use crate::fizzy_client::{ApiResponse, FizzyClient, parse_link_next};

use common::RedactedToken;

use serde_json::json;

fn client(account: &str) -> FizzyClient {
    FizzyClient::new("https://app.fizzy.do/", RedactedToken::new("tok"), account)
        .expect("client should build")
}

/// **VALUE**: Verifies relative paths gain the account prefix exactly once.
///
/// **WHY THIS MATTERS**: Commands pass both bare paths and paths that already
/// contain the account (e.g. Location headers). Both must resolve the same way.
///
/// **BUG THIS CATCHES**: Would catch `/acct/acct/boards.json` double prefixes.
#[test]
fn given_account_when_build_url_then_prefix_is_applied_once() {
    let client = client("acct");

    assert_eq!(client.build_url("/boards.json"), "https://app.fizzy.do/acct/boards.json");
    assert_eq!(client.build_url("boards.json"), "https://app.fizzy.do/acct/boards.json");
    assert_eq!(
        client.build_url("/acct/boards.json"),
        "https://app.fizzy.do/acct/boards.json"
    );
    assert_eq!(client.build_url("/acct"), "https://app.fizzy.do/acct");
}

/// **VALUE**: Verifies the prefix check is segment-based, not substring-based.
///
/// **WHY THIS MATTERS**: An account named `acct` must not swallow a path that
/// merely starts with the same letters.
///
/// **BUG THIS CATCHES**: Would catch a plain `starts_with("/acct")` check.
#[test]
fn given_path_sharing_account_letters_when_build_url_then_prefix_is_still_added() {
    let client = client("acct");

    assert_eq!(
        client.build_url("/acctx/boards.json"),
        "https://app.fizzy.do/acct/acctx/boards.json"
    );
}

/// **VALUE**: Verifies absolute URLs and empty accounts are left alone.
///
/// **WHY THIS MATTERS**: Pagination links and identity calls use full URLs or
/// no account scope at all.
///
/// **BUG THIS CATCHES**: Would catch the base URL being prepended to a full URL.
#[test]
fn given_absolute_url_or_no_account_when_build_url_then_no_prefix() {
    let scoped = client("acct");
    let unscoped = client("");

    assert_eq!(
        scoped.build_url("https://other.example/acct/cards?page=2"),
        "https://other.example/acct/cards?page=2"
    );
    assert_eq!(scoped.build_url("http://x/y"), "http://x/y");
    assert_eq!(unscoped.build_url("/my/identity.json"), "https://app.fizzy.do/my/identity.json");
    assert_eq!(unscoped.base_url(), "https://app.fizzy.do");
}

/// **VALUE**: Verifies `rel="next"` extraction from Link headers.
///
/// **WHY THIS MATTERS**: Pagination stops when this returns `None`; a parse miss
/// silently truncates listings.
///
/// **BUG THIS CATCHES**: Would catch picking up `rel="prev"` or failing on
/// multi-link headers.
#[test]
fn given_link_headers_when_parse_link_next_then_only_next_target_is_returned() {
    assert_eq!(
        parse_link_next(r#"<https://x/cards?page=2>; rel="next""#),
        Some("https://x/cards?page=2".to_string())
    );
    assert_eq!(
        parse_link_next(r#"<https://x/cards?page=1>; rel="prev", <https://x/cards?page=3>; rel="next""#),
        Some("https://x/cards?page=3".to_string())
    );
    assert_eq!(parse_link_next(r#"<https://x/cards?page=1>; rel="prev""#), None);
    assert_eq!(parse_link_next(""), None);
}

/// **VALUE**: Verifies the `data_or_null` helper.
///
/// **WHY THIS MATTERS**: Empty bodies (204) must still produce `data: null` in
/// the success envelope.
///
/// **BUG THIS CATCHES**: Would catch a panic on a missing payload.
#[test]
fn given_response_without_body_when_data_or_null_then_returns_null() {
    let empty = ApiResponse::default();
    let full = ApiResponse {
        data: Some(json!({"id": "1"})),
        link_next: Some("https://x/?page=2".to_string()),
        ..ApiResponse::default()
    };

    assert_eq!(empty.data_or_null(), json!(null));
    assert!(!empty.has_next());
    assert_eq!(full.data_or_null(), json!({"id": "1"}));
    assert!(full.has_next());
}
