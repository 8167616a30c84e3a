use crate::helpers::client_for;

use client_core::error::ErrorKind;
use client_core::fizzy_client::MAX_FOLLOW_PAGES;

use serde_json::json;
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn next_link(server: &MockServer, page: u32) -> String {
    format!(r#"<{}/acct/cards.json?page={page}>; rel="next""#, server.uri())
}

async fn mount_three_pages(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/acct/cards.json"))
        .and(query_param_is_missing("page"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!(["a1", "a2"]))
                .insert_header("Link", next_link(server, 2).as_str()),
        )
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/acct/cards.json"))
        .and(query_param("page", "2"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!(["a3"]))
                .insert_header("Link", next_link(server, 3).as_str()),
        )
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/acct/cards.json"))
        .and(query_param("page", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(["a4", "a5"])))
        .mount(server)
        .await;
}

/// **VALUE**: Verifies `fetch_all` concatenates every page in order.
///
/// **WHY THIS MATTERS**: `--all` listings are consumed by scripts that expect
/// the complete set in server order.
///
/// **BUG THIS CATCHES**: Would catch stopping after the first page, reordering,
/// or leaving a stale next link on the merged result.
#[tokio::test]
async fn given_three_pages_when_fetch_all_then_items_are_concatenated_in_order() {
    // GIVEN
    let server = MockServer::start().await;
    mount_three_pages(&server).await;

    // WHEN
    let response = client_for(&server)
        .get_with_pagination("/cards.json", true)
        .await
        .expect("pagination should succeed");

    // THEN
    assert_eq!(response.data, Some(json!(["a1", "a2", "a3", "a4", "a5"])));
    assert!(!response.has_next());
    assert_eq!(server.received_requests().await.map(|r| r.len()), Some(3));
}

/// **VALUE**: Verifies a single-page fetch leaves the next link for the caller.
///
/// **BUG THIS CATCHES**: Would catch pages being followed without `--all`.
#[tokio::test]
async fn given_three_pages_when_not_fetch_all_then_first_page_and_next_link() {
    let server = MockServer::start().await;
    mount_three_pages(&server).await;

    let response = client_for(&server)
        .get_with_pagination("/cards.json", false)
        .await
        .expect("first page should succeed");

    assert_eq!(response.data, Some(json!(["a1", "a2"])));
    assert_eq!(
        response.link_next.as_deref(),
        Some(format!("{}/acct/cards.json?page=2", server.uri()).as_str())
    );
    assert_eq!(server.received_requests().await.map(|r| r.len()), Some(1));
}

/// **VALUE**: Verifies a failing later page fails the whole listing.
///
/// **WHY THIS MATTERS**: A partial list presented as complete is worse than an error.
///
/// **BUG THIS CATCHES**: Would catch errors on page 2+ being ignored.
#[tokio::test]
async fn given_failing_second_page_when_fetch_all_then_listing_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/acct/cards.json"))
        .and(query_param_is_missing("page"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!(["a1"]))
                .insert_header("Link", next_link(&server, 2).as_str()),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/acct/cards.json"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let error = client_for(&server)
        .get_with_pagination("/cards.json", true)
        .await
        .expect_err("second page should fail the listing");

    assert_eq!(error.kind, ErrorKind::NotFound);
}

/// **VALUE**: Verifies a non-array first page is returned untouched.
///
/// **BUG THIS CATCHES**: Would catch object payloads being wrapped or dropped.
#[tokio::test]
async fn given_object_payload_when_fetch_all_then_returned_as_is() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/acct/boards/1.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "1"})))
        .mount(&server)
        .await;

    let response = client_for(&server)
        .get_with_pagination("/boards/1.json", true)
        .await
        .expect("request should succeed");

    assert_eq!(response.data, Some(json!({"id": "1"})));
}

/// **VALUE**: Verifies a `next` link cycle stops at the page ceiling.
///
/// **WHY THIS MATTERS**: A server that links a page to itself would otherwise
/// keep `--all` fetching forever.
///
/// **BUG THIS CATCHES**: Would catch the ceiling guard being removed or the
/// count being off by one.
#[tokio::test]
async fn given_cyclic_next_link_when_fetch_all_then_general_error_after_ceiling() {
    // GIVEN: a page whose next link points back at itself
    let server = MockServer::start().await;
    let self_link = format!(r#"<{}/acct/cards.json>; rel="next""#, server.uri());
    Mock::given(method("GET"))
        .and(path("/acct/cards.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!(["loop"]))
                .insert_header("Link", self_link.as_str()),
        )
        .mount(&server)
        .await;

    // WHEN
    let error = client_for(&server)
        .get_with_pagination("/cards.json", true)
        .await
        .expect_err("cycle should be cut off");

    // THEN: first page plus MAX_FOLLOW_PAGES follow-ups
    assert_eq!(error.kind, ErrorKind::General);
    assert_eq!(error.message, "Pagination exceeded 1000 pages");
    assert_eq!(
        server.received_requests().await.map(|r| r.len()),
        Some(MAX_FOLLOW_PAGES + 1)
    );
}
