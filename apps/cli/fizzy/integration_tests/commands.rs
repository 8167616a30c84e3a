use fizzy::cli::{Cli, Command};
use fizzy::commands::{self, CommandContext};

use client_core::config::{ConfigPaths, FizzyConfig};
use client_core::fizzy_client::FizzyClient;
use client_core::response::Envelope;

use common::RedactedToken;

use clap::Parser;
use serde_json::{Value, json};
use tempfile::TempDir;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TEST_TOKEN: &str = "cli-token";
const TEST_ACCOUNT: &str = "acct";

fn config_for(server: &MockServer) -> FizzyConfig {
    FizzyConfig {
        token: TEST_TOKEN.to_string(),
        account: TEST_ACCOUNT.to_string(),
        api_url: server.uri(),
        board: String::new(),
    }
}

/// Parse `args` as the binary would and run the resulting command.
async fn run_cli(server: &MockServer, dir: &TempDir, args: &[&str]) -> Envelope {
    let cli = Cli::try_parse_from(std::iter::once("fizzy").chain(args.iter().copied()))
        .expect("arguments should parse");
    let config = config_for(server);
    let client = FizzyClient::new(
        &config.api_url,
        RedactedToken::new(config.token.clone()),
        &config.account,
    )
    .expect("client should build");
    let paths = ConfigPaths {
        global_dir_override: Some(dir.path().join("global")),
        working_dir: Some(dir.path().to_path_buf()),
    };
    let ctx = CommandContext::new(client, config, paths);

    Envelope::from_result(commands::run(&ctx, cli.command).await)
}

fn rendered(envelope: &Envelope) -> (Value, i32) {
    let (bytes, code) = envelope.render();
    let json = serde_json::from_slice(&bytes).expect("envelope should be JSON");
    (json, code)
}

/// **VALUE**: Verifies a create command end to end: flags become the request
/// body, the Location is followed, and the created resource is printed.
///
/// **WHY THIS MATTERS**: This is the most common write path and touches
/// every layer between argument parsing and stdout.
///
/// **BUG THIS CATCHES**: Would catch a lost account prefix, missing auth
/// header, unfollowed Location, or a success envelope without `location`.
#[tokio::test]
async fn given_board_create_when_run_then_created_board_is_printed() {
    // GIVEN
    let server = MockServer::start().await;
    let dir = TempDir::new().expect("temp dir");

    Mock::given(method("POST"))
        .and(path("/acct/boards.json"))
        .and(header("Authorization", format!("Bearer {TEST_TOKEN}").as_str()))
        .and(body_json(json!({"name": "Roadmap", "all_access": false})))
        .respond_with(
            ResponseTemplate::new(201).insert_header("Location", "/acct/boards/42.json"),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/acct/boards/42.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "42", "name": "Roadmap"})))
        .expect(1)
        .mount(&server)
        .await;

    // WHEN
    let envelope = run_cli(
        &server,
        &dir,
        &["board", "create", "--name", "Roadmap", "--all-access", "no"],
    )
    .await;

    // THEN
    let (json, code) = rendered(&envelope);
    assert_eq!(code, 0);
    assert_eq!(json["success"], true);
    assert_eq!(json["data"], json!({"id": "42", "name": "Roadmap"}));
    assert_eq!(json["location"], "/acct/boards/42.json");
    assert!(json["meta"]["timestamp"].is_string());
    assert!(json.get("error").is_none());
}

/// **VALUE**: Verifies a server error becomes an error envelope and exit code.
///
/// **BUG THIS CATCHES**: Would catch 404s exiting 0 or the server's message
/// being replaced by a generic one.
#[tokio::test]
async fn given_missing_card_when_show_then_not_found_envelope() {
    let server = MockServer::start().await;
    let dir = TempDir::new().expect("temp dir");

    Mock::given(method("GET"))
        .and(path("/acct/cards/999.json"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "Card not found"})))
        .mount(&server)
        .await;

    let envelope = run_cli(&server, &dir, &["card", "show", "999"]).await;

    let (json, code) = rendered(&envelope);
    assert_eq!(code, 5);
    assert_eq!(json["success"], false);
    assert_eq!(
        json["error"],
        json!({"code": "NOT_FOUND", "message": "Card not found", "status": 404})
    );
    assert!(json.get("data").is_none());
}

/// **VALUE**: Verifies `--all` combined with a client-side column filter walks
/// every page before filtering.
///
/// **BUG THIS CATCHES**: Would catch filtering only the first page or
/// dropping the lane query parameter.
#[tokio::test]
async fn given_column_filter_with_all_when_card_list_then_every_page_is_filtered() {
    let server = MockServer::start().await;
    let dir = TempDir::new().expect("temp dir");
    let second_page = format!("{}/acct/cards.json?board_ids[]=b1&page=2", server.uri());

    Mock::given(method("GET"))
        .and(path("/acct/cards.json"))
        .and(query_param("page", "2"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{"id": "3", "column": {"id": "c1"}}, {"id": "4"}])),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/acct/cards.json"))
        .and(query_param("board_ids[]", "b1"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Link", format!("<{second_page}>; rel=\"next\"").as_str())
                .set_body_json(json!([{"id": "1", "column_id": "c1"}, {"id": "2", "column_id": "c2"}])),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;

    let envelope = run_cli(
        &server,
        &dir,
        &["card", "list", "--board", "b1", "--column", "c1", "--all"],
    )
    .await;

    let (json, code) = rendered(&envelope);
    assert_eq!(code, 0, "{json}");
    assert_eq!(
        json["data"],
        json!([{"id": "1", "column_id": "c1"}, {"id": "3", "column": {"id": "c1"}}])
    );
    assert!(json.get("pagination").is_none());
}

/// **VALUE**: Verifies login writes a config file that a fresh load picks up.
///
/// **BUG THIS CATCHES**: Would catch login writing somewhere the loader
/// never reads.
#[tokio::test]
async fn given_login_when_status_loaded_from_disk_then_authenticated() {
    let server = MockServer::start().await;
    let dir = TempDir::new().expect("temp dir");

    let envelope = run_cli(&server, &dir, &["auth", "login", "saved-token"]).await;
    assert!(envelope.success);

    let paths = ConfigPaths {
        global_dir_override: Some(dir.path().join("global")),
        working_dir: Some(dir.path().to_path_buf()),
    };
    let loaded = FizzyConfig::load_layered(&paths, |_| None);
    assert_eq!(loaded.token, "saved-token");
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

#[test]
fn given_unknown_flag_when_parsed_then_clap_reports_usage_error() {
    let error = Cli::try_parse_from(["fizzy", "board", "list", "--bogus"]).expect_err("bad flag");
    assert_eq!(error.kind(), clap::error::ErrorKind::UnknownArgument);
}

#[test]
fn given_global_flags_after_subcommand_when_parsed_then_accepted() {
    let cli = Cli::try_parse_from([
        "fizzy", "card", "list", "--account", "other", "--api-url", "http://x", "--verbose",
    ])
    .expect("global flags parse anywhere");

    assert_eq!(cli.account.as_deref(), Some("other"));
    assert_eq!(cli.api_url.as_deref(), Some("http://x"));
    assert!(cli.verbose);
    assert!(matches!(cli.command, Command::Card { .. }));
}
