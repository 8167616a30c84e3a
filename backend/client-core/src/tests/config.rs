// Unit tests for layered configuration

use crate::DEFAULT_API_URL;
use crate::config::{ConfigOverrides, ConfigPaths, FizzyConfig, LOCAL_CONFIG_FILE, read_config_file};
use crate::error::ConfigError;

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tempfile::TempDir;

fn paths(global: &Path, working: &Path) -> ConfigPaths {
    ConfigPaths {
        global_dir_override: Some(global.to_path_buf()),
        working_dir: Some(working.to_path_buf()),
    }
}

fn no_env(_: &str) -> Option<String> {
    None
}

/// **VALUE**: Verifies defaults apply when no file or variable exists.
///
/// **BUG THIS CATCHES**: Would catch an empty API URL on a fresh machine.
#[test]
fn given_nothing_configured_when_load_layered_then_defaults_apply() {
    let global = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();

    let config = FizzyConfig::load_layered(&paths(global.path(), work.path()), no_env);

    assert_eq!(config.api_url, DEFAULT_API_URL);
    assert!(config.token.is_empty());
    assert!(config.account.is_empty());
}

/// **VALUE**: Verifies each layer overrides only the keys it sets.
///
/// **WHY THIS MATTERS**: A project `.fizzy.yaml` typically pins the board only;
/// it must not wipe the token from the global file.
///
/// **BUG THIS CATCHES**: Would catch whole-struct replacement instead of a merge,
/// or the layers being applied in the wrong order.
#[test]
fn given_all_layers_when_load_layered_then_precedence_is_env_local_global() {
    // GIVEN: global, local two directories up, and env
    let global = TempDir::new().unwrap();
    fs::write(
        global.path().join("config.yaml"),
        "token: global-token\naccount: global-acct\nboard: global-board\n",
    )
    .unwrap();

    let project = TempDir::new().unwrap();
    fs::write(
        project.path().join(LOCAL_CONFIG_FILE),
        "account: local-acct\nboard: local-board\n",
    )
    .unwrap();
    let nested = project.path().join("src").join("deep");
    fs::create_dir_all(&nested).unwrap();

    let env: HashMap<&str, &str> = HashMap::from([("FIZZY_BOARD", "env-board")]);

    // WHEN
    let config = FizzyConfig::load_layered(&paths(global.path(), &nested), |key| {
        env.get(key).map(|v| v.to_string())
    });

    // THEN
    assert_eq!(config.token, "global-token");
    assert_eq!(config.account, "local-acct");
    assert_eq!(config.board, "env-board");
    assert_eq!(config.api_url, DEFAULT_API_URL);
}

/// **VALUE**: Verifies command-line flags beat every file and variable.
///
/// **BUG THIS CATCHES**: Would catch empty flags clobbering configured values.
#[test]
fn given_overrides_when_applied_then_only_given_flags_win() {
    let mut config = FizzyConfig {
        token: "file-token".to_string(),
        account: "file-acct".to_string(),
        api_url: DEFAULT_API_URL.to_string(),
        board: "b".to_string(),
    };

    config.apply_overrides(&ConfigOverrides {
        token: Some("flag-token".to_string()),
        account: Some(String::new()),
        api_url: None,
    });

    assert_eq!(config.token, "flag-token");
    assert_eq!(config.account, "file-acct");
    assert_eq!(config.api_url, DEFAULT_API_URL);
}

/// **VALUE**: Verifies a malformed file is skipped rather than fatal.
///
/// **WHY THIS MATTERS**: A broken project file must not lock the user out of
/// commands like `auth status`.
///
/// **BUG THIS CATCHES**: Would catch a parse error aborting the whole load.
#[test]
fn given_malformed_local_file_when_load_layered_then_it_is_ignored() {
    let global = TempDir::new().unwrap();
    fs::write(global.path().join("config.yaml"), "token: t\n").unwrap();
    let work = TempDir::new().unwrap();
    fs::write(work.path().join(LOCAL_CONFIG_FILE), "token: [unterminated\n").unwrap();

    let config = FizzyConfig::load_layered(&paths(global.path(), work.path()), no_env);

    assert_eq!(config.token, "t");
}

/// **VALUE**: Verifies save, reload and delete of the global file.
///
/// **WHY THIS MATTERS**: `auth login` and `auth logout` are built on these.
///
/// **BUG THIS CATCHES**: Would catch world-readable token files or a delete
/// that leaves the file behind.
#[test]
fn given_config_when_saved_then_reloads_and_deletes() {
    let root = TempDir::new().unwrap();
    let global_dir = root.path().join("fizzy");
    let paths = paths(&global_dir, root.path());
    assert!(!paths.global_exists());

    let config = FizzyConfig {
        token: "secret".to_string(),
        account: "acct".to_string(),
        ..FizzyConfig::default()
    };

    // WHEN: saved
    let written = config.save_global(&paths).expect("save should succeed");

    // THEN: file exists, is private, and round-trips
    assert!(paths.global_exists());
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = fs::metadata(&written).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600);
    }
    let reloaded = FizzyConfig::load_global(&paths);
    assert_eq!(reloaded.token, "secret");
    assert_eq!(reloaded.account, "acct");

    // WHEN: deleted
    let removed = FizzyConfig::delete_global(&paths).expect("delete should succeed");

    // THEN
    assert_eq!(removed, vec![written]);
    assert!(!paths.global_exists());
}

/// **VALUE**: Verifies `Debug` never prints the token.
///
/// **BUG THIS CATCHES**: Would catch a derived `Debug` leaking credentials into logs.
#[test]
fn given_config_with_token_when_debug_formatted_then_token_is_redacted() {
    let config = FizzyConfig {
        token: "super-secret".to_string(),
        ..FizzyConfig::default()
    };

    let rendered = format!("{config:?}");

    assert!(!rendered.contains("super-secret"));
    assert!(rendered.contains("[REDACTED]"));
}

/// **VALUE**: Verifies unreadable and malformed files are reported as distinct errors.
///
/// **WHY THIS MATTERS**: The loader logs these and moves on; the warning is the only hint
/// a user gets that their `.fizzy.yaml` is being ignored.
///
/// **BUG THIS CATCHES**: Would catch a YAML error being reported as a missing file, or
/// the path dropping out of the message.
#[test]
fn given_bad_files_when_read_then_read_and_parse_errors_name_the_path() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing.yaml");
    let malformed = dir.path().join("bad.yaml");
    fs::write(&malformed, "token: [unclosed").unwrap();

    let read_error = read_config_file(&missing).unwrap_err();
    let parse_error = read_config_file(&malformed).unwrap_err();

    assert!(matches!(read_error, ConfigError::ReadError { .. }));
    assert!(read_error.reason().contains("missing.yaml"));
    assert!(matches!(parse_error, ConfigError::ParseError { .. }));
    assert!(parse_error.reason().starts_with("Failed to parse config"));
    assert!(parse_error.to_string().contains("not valid YAML"));
}

#[test]
fn given_empty_file_when_read_then_empty_config() {
    let dir = TempDir::new().unwrap();
    let empty = dir.path().join("empty.yaml");
    fs::write(&empty, "").unwrap();

    assert_eq!(read_config_file(&empty).unwrap(), FizzyConfig::default());
}
