//! Test helpers shared by the client integration tests.

use client_core::fizzy_client::FizzyClient;
use common::RedactedToken;

use wiremock::MockServer;

pub const TEST_TOKEN: &str = "test-token-12345";
pub const TEST_ACCOUNT: &str = "acct";

/// Client pointed at the mock server, scoped to [`TEST_ACCOUNT`].
pub fn client_for(server: &MockServer) -> FizzyClient {
    FizzyClient::new(&server.uri(), RedactedToken::new(TEST_TOKEN), TEST_ACCOUNT)
        .expect("client should build")
}

pub fn bearer() -> String {
    format!("Bearer {TEST_TOKEN}")
}
