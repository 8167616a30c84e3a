// Unit tests for token management against a temporary config directory

use super::mock_api::{MockApi, test_config};
use crate::cli::{AuthCmd, Command};
use crate::commands::auth::status;
use crate::commands::{self, CommandContext};

use client_core::config::{ConfigPaths, FizzyConfig};

use serde_json::json;
use tempfile::TempDir;

fn context_in(dir: &TempDir, config: FizzyConfig) -> CommandContext<MockApi> {
    let paths = ConfigPaths {
        global_dir_override: Some(dir.path().join("fizzy")),
        working_dir: Some(dir.path().to_path_buf()),
    };
    CommandContext::new(MockApi::new(), config, paths)
}

/// **VALUE**: Verifies login stores the token without discarding other
/// global settings, and logout removes the file.
///
/// **WHY THIS MATTERS**: Users set account and board once; re-running login
/// with a fresh token must not wipe them.
///
/// **BUG THIS CATCHES**: Would catch login overwriting the whole file or
/// logout leaving the token on disk.
#[tokio::test]
async fn given_existing_global_config_when_login_then_logout_then_token_saved_then_removed() {
    // GIVEN
    let dir = TempDir::new().expect("temp dir");
    let ctx = context_in(&dir, FizzyConfig::default());
    let seeded = FizzyConfig {
        account: "acct".to_string(),
        board: "b1".to_string(),
        ..FizzyConfig::default()
    };
    seeded.save_global(&ctx.paths).expect("seed config");

    // WHEN
    let login = commands::run(
        &ctx,
        Command::Auth {
            action: AuthCmd::Login {
                token: "new-token".to_string(),
            },
        },
    )
    .await
    .expect("login");

    // THEN
    assert_eq!(
        login.data,
        Some(json!({"authenticated": true, "message": "Token saved to config file"}))
    );
    let saved = FizzyConfig::load_global(&ctx.paths);
    assert_eq!(saved.token, "new-token");
    assert_eq!(saved.account, "acct");
    assert_eq!(saved.board, "b1");

    let logout = commands::run(
        &ctx,
        Command::Auth {
            action: AuthCmd::Logout,
        },
    )
    .await
    .expect("logout");
    assert_eq!(logout.data.expect("data")["authenticated"], false);
    assert!(!ctx.paths.global_exists());
    assert!(ctx.api.calls().is_empty());
}

/// **VALUE**: Verifies logout succeeds when there is nothing to remove.
#[tokio::test]
async fn given_no_config_when_logout_then_success() {
    let dir = TempDir::new().expect("temp dir");
    let ctx = context_in(&dir, FizzyConfig::default());

    let envelope = commands::run(
        &ctx,
        Command::Auth {
            action: AuthCmd::Logout,
        },
    )
    .await
    .expect("logout");

    assert!(envelope.success);
}

/// **VALUE**: Verifies status reports what is configured and hides defaults.
///
/// **BUG THIS CATCHES**: Would catch the token value itself appearing in the
/// output or the default API URL being echoed back.
#[test]
fn given_configs_when_status_then_only_relevant_fields_reported() {
    assert_eq!(status(&FizzyConfig::default()), json!({"authenticated": false}));

    assert_eq!(
        status(&test_config()),
        json!({"authenticated": true, "token_configured": true, "account": "acct"})
    );

    let custom = FizzyConfig {
        api_url: "http://localhost:3000".to_string(),
        account: String::new(),
        ..test_config()
    };
    assert_eq!(
        status(&custom),
        json!({"authenticated": true, "token_configured": true, "api_url": "http://localhost:3000"})
    );
}
