// Unit tests for the response envelope

use crate::error::FizzyError;
use crate::response::{Envelope, ErrorDetail};

use serde_json::{Value, json};

fn parse(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes).expect("envelope should be valid JSON")
}

/// **VALUE**: Verifies a success envelope has data, no error and a timestamp.
///
/// **WHY THIS MATTERS**: Consumers test `success` then read `data`; an `error`
/// key on success would confuse every script.
///
/// **BUG THIS CATCHES**: Would catch `None` fields leaking out as `null`.
#[test]
fn given_success_when_rendered_then_data_present_and_error_absent() {
    // GIVEN
    let envelope = Envelope::success(json!({"id": "1"}));

    // WHEN
    let (bytes, exit_code) = envelope.render();
    let value = parse(&bytes);

    // THEN
    assert_eq!(exit_code, 0);
    assert_eq!(value["success"], json!(true));
    assert_eq!(value["data"], json!({"id": "1"}));
    assert!(value.get("error").is_none());
    assert!(value.get("pagination").is_none());
    assert!(value.get("location").is_none());
    assert!(value["meta"]["timestamp"].as_str().is_some_and(|ts| ts.ends_with('Z')));
    assert_eq!(bytes.last(), Some(&b'\n'));
}

/// **VALUE**: Verifies a success envelope with no payload still has `data: null`.
///
/// **WHY THIS MATTERS**: Consumers distinguish "no data" from "malformed output".
///
/// **BUG THIS CATCHES**: Would catch `data` being skipped when it is JSON null.
#[test]
fn given_null_payload_when_rendered_then_data_key_is_present() {
    let (bytes, _) = Envelope::success(Value::Null).render();

    let value = parse(&bytes);

    assert!(value.as_object().is_some_and(|o| o.contains_key("data")));
    assert_eq!(value["data"], Value::Null);
}

/// **VALUE**: Verifies an error envelope carries code, message, status and details.
///
/// **WHY THIS MATTERS**: The error object is the only diagnostic channel;
/// `data` must be absent so consumers cannot mistake it for success.
///
/// **BUG THIS CATCHES**: Would catch a missing status or both keys being set.
#[test]
fn given_http_error_when_rendered_then_error_object_and_exit_code_match() {
    let error = FizzyError::from_http_status(422, "Title can't be blank")
        .with_details(json!({"error": "Title can't be blank", "field": "title"}));

    let envelope = Envelope::error(&error);
    let (bytes, exit_code) = envelope.render();
    let value = parse(&bytes);

    assert_eq!(exit_code, 6);
    assert_eq!(value["success"], json!(false));
    assert!(value.get("data").is_none());
    assert_eq!(value["error"]["code"], json!("VALIDATION_ERROR"));
    assert_eq!(value["error"]["message"], json!("Title can't be blank"));
    assert_eq!(value["error"]["status"], json!(422));
    assert_eq!(value["error"]["details"]["field"], json!("title"));
}

/// **VALUE**: Verifies locally detected errors omit `status`.
///
/// **WHY THIS MATTERS**: A status key implies the server answered.
///
/// **BUG THIS CATCHES**: Would catch `status: 0` or `status: null` output.
#[test]
fn given_local_error_when_rendered_then_status_is_omitted() {
    let (bytes, exit_code) = Envelope::error(&FizzyError::required_flag("board")).render();
    let value = parse(&bytes);

    assert_eq!(exit_code, 2);
    assert!(value["error"].get("status").is_none());
    assert!(value["error"].get("details").is_none());
}

/// **VALUE**: Verifies HTML-looking text is written literally.
///
/// **WHY THIS MATTERS**: Card descriptions contain markup; escaping `<` as
/// `\u003c` makes the output unreadable for humans and jq alike.
///
/// **BUG THIS CATCHES**: Would catch a serializer configured to escape HTML.
#[test]
fn given_html_in_data_when_rendered_then_markup_is_not_escaped() {
    let (bytes, _) = Envelope::success(json!({"description": "<strong>hi</strong> & bye"})).render();
    let text = String::from_utf8(bytes).expect("utf8");

    assert!(text.contains("<strong>hi</strong> & bye"));
    assert!(!text.contains("\\u003c"));
}

/// **VALUE**: Verifies pagination is included only when there is something to say.
///
/// **WHY THIS MATTERS**: A `pagination` block on a complete listing suggests
/// there is more to fetch.
///
/// **BUG THIS CATCHES**: Would catch pagination always being attached.
#[test]
fn given_list_results_when_paginated_then_block_only_when_next_exists() {
    let last_page = Envelope::success_with_pagination(json!([]), false, None);
    let more = Envelope::success_with_pagination(
        json!([1]),
        true,
        Some("https://x/acct/cards?page=2".to_string()),
    );

    assert!(last_page.pagination.is_none());
    let pagination = more.pagination.expect("pagination");
    assert!(pagination.has_next);
    assert_eq!(pagination.next_url.as_deref(), Some("https://x/acct/cards?page=2"));
}

/// **VALUE**: Verifies the create envelope when the follow-up fetch failed.
///
/// **WHY THIS MATTERS**: The resource was created; the command must still
/// report success with the location so the caller can find it.
///
/// **BUG THIS CATCHES**: Would catch a missing `data` key or a dropped location.
#[test]
fn given_created_without_payload_when_enveloped_then_location_kept_and_data_null() {
    let envelope = Envelope::success_with_location(None, "/acct/boards/42");

    let value = parse(&envelope.render().0);

    assert_eq!(value["success"], json!(true));
    assert_eq!(value["data"], Value::Null);
    assert_eq!(value["location"], json!("/acct/boards/42"));
}

/// **VALUE**: Verifies unknown error codes fall back to the general exit code.
///
/// **WHY THIS MATTERS**: The exit code is derived from the envelope alone; a
/// foreign code must not yield exit 0.
///
/// **BUG THIS CATCHES**: Would catch a lookup miss mapping to success.
#[test]
fn given_unknown_error_code_when_exit_code_then_general_failure() {
    let mut envelope = Envelope::error(&FizzyError::general("x"));
    envelope.error = Some(ErrorDetail {
        code: "SOMETHING_NEW".to_string(),
        message: "x".to_string(),
        status: None,
        details: None,
    });

    assert_eq!(envelope.exit_code(), 1);
}

/// **VALUE**: Verifies `from_result` folds both arms.
///
/// **BUG THIS CATCHES**: Would catch an error result rendering as success.
#[test]
fn given_command_results_when_folded_then_envelope_matches_outcome() {
    let ok = Envelope::from_result(Ok(Envelope::success(json!(1))));
    let err = Envelope::from_result(Err(FizzyError::network("down")));

    assert_eq!(ok.exit_code(), 0);
    assert_eq!(err.exit_code(), 7);
    assert_eq!(err.error.map(|e| e.code), Some("NETWORK_ERROR".to_string()));
}
