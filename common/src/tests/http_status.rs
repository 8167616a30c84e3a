use crate::{HttpStatusCode, StatusClass};

/// **VALUE**: Verifies the 400 boundary used to decide whether a response is an API error.
///
/// **WHY THIS MATTERS**: The transport converts every status at or above 400 into a
/// structured error. An off-by-one here turns redirects or errors into the wrong outcome.
///
/// **BUG THIS CATCHES**: Would catch if `is_error` used `>` instead of `>=`.
#[test]
fn given_boundary_statuses_when_classified_then_400_is_first_error() {
    assert!(!HttpStatusCode(399).is_error());
    assert!(HttpStatusCode(400).is_error());
    assert_eq!(HttpStatusCode(399).class(), StatusClass::Ok);
    assert_eq!(HttpStatusCode(400).class(), StatusClass::Failure);
}

/// **VALUE**: Verifies the four statuses with a dedicated class and the catch-all.
///
/// **WHY THIS MATTERS**: Each class becomes a distinct exit code that scripts branch on.
///
/// **BUG THIS CATCHES**: Would catch 5xx or 429 being given a dedicated class, or 422
/// falling through to the generic failure.
#[test]
fn given_api_statuses_when_classified_then_dedicated_classes_only_for_known_codes() {
    let cases = [
        (401, StatusClass::Unauthorized),
        (403, StatusClass::Forbidden),
        (404, StatusClass::NotFound),
        (422, StatusClass::Unprocessable),
        (409, StatusClass::Failure),
        (429, StatusClass::Failure),
        (500, StatusClass::Failure),
        (502, StatusClass::Failure),
        (201, StatusClass::Ok),
        (302, StatusClass::Ok),
    ];

    for (code, expected) in cases {
        assert_eq!(HttpStatusCode::from(code).class(), expected, "status {code}");
    }
}

#[test]
fn given_2xx_statuses_when_classified_then_success() {
    for code in [200, 201, 204, 299] {
        assert!(HttpStatusCode(code).is_success(), "{code} should be success");
    }
    assert!(!HttpStatusCode(302).is_success());
}
