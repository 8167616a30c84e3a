// Unit tests for shared command behavior: preconditions, create-and-follow,
// pagination passthrough and the fixed result shapes

use super::mock_api::{MockApi, call, context, context_with, created, no_content, ok, ok_with_next, test_config};
use crate::cli::{
    BoardCmd, ColumnCmd, Command, CommentCmd, IdentityCmd, NotificationCmd, PageArgs, ReactionCmd, StepCmd,
};
use crate::commands::{self, version::VERSION};

use client_core::config::FizzyConfig;
use client_core::error::{ErrorKind, FizzyError};
use client_core::response::Envelope;

use std::path::PathBuf;

use serde_json::{Value, json};

async fn run(api: MockApi, command: Command) -> (Envelope, Vec<super::mock_api::Call>) {
    let ctx = context(api);
    let envelope = Envelope::from_result(commands::run(&ctx, command).await);
    (envelope, ctx.api.calls())
}

fn board_create(name: Option<&str>) -> Command {
    Command::Board {
        action: BoardCmd::Create {
            name: name.map(str::to_string),
            all_access: Some("true".to_string()),
            auto_postpone_period: Some(30),
        },
    }
}

/// **VALUE**: Verifies a create follows its Location and echoes the resource.
///
/// **WHY THIS MATTERS**: Create endpoints answer 201 with no body; without
/// the follow-up GET the caller would never see the new id.
///
/// **BUG THIS CATCHES**: Would catch the follow being skipped, the location
/// dropped from the envelope, or the body losing its flag-derived fields.
#[tokio::test]
async fn given_create_with_location_when_run_then_follows_and_returns_resource() {
    // GIVEN
    let api = MockApi::new()
        .respond(created("/acct/boards/42.json"))
        .respond(ok(json!({"id": "42", "name": "Roadmap"})));

    // WHEN
    let (envelope, calls) = run(api, board_create(Some("Roadmap"))).await;

    // THEN
    assert!(envelope.success);
    assert_eq!(envelope.data, Some(json!({"id": "42", "name": "Roadmap"})));
    assert_eq!(envelope.location.as_deref(), Some("/acct/boards/42.json"));
    assert_eq!(
        calls,
        vec![
            call(
                "POST",
                "/boards.json",
                Some(json!({"name": "Roadmap", "all_access": true, "auto_postpone_period": 30}))
            ),
            call("FOLLOW", "/acct/boards/42.json", None),
        ]
    );
}

/// **VALUE**: Verifies a failed follow-up fetch still reports the create.
///
/// **WHY THIS MATTERS**: The resource exists; reporting failure would make
/// scripts retry and create duplicates.
///
/// **BUG THIS CATCHES**: Would catch the follow error being propagated.
#[tokio::test]
async fn given_follow_fails_when_create_then_success_with_location_and_null_data() {
    let api = MockApi::new()
        .respond(created("/acct/boards/42.json"))
        .respond(Err(FizzyError::not_found("gone")));

    let (envelope, _) = run(api, board_create(Some("Roadmap"))).await;

    assert!(envelope.success);
    assert_eq!(envelope.data, Some(Value::Null));
    assert_eq!(envelope.location.as_deref(), Some("/acct/boards/42.json"));
    assert_eq!(envelope.exit_code(), 0);
}

/// **VALUE**: Verifies a create without Location returns the POST body.
///
/// **BUG THIS CATCHES**: Would catch a follow attempted on an empty location.
#[tokio::test]
async fn given_create_without_location_when_run_then_post_body_is_returned() {
    let api = MockApi::new().respond(ok(json!({"id": "7"})));

    let (envelope, calls) = run(api, board_create(Some("Roadmap"))).await;

    assert_eq!(envelope.data, Some(json!({"id": "7"})));
    assert!(envelope.location.is_none());
    assert_eq!(calls.len(), 1);
}

/// **VALUE**: Verifies preconditions fail before any request.
///
/// **WHY THIS MATTERS**: Sending an unauthenticated request wastes a round
/// trip and turns a clear local error into a vague 401.
///
/// **BUG THIS CATCHES**: Would catch checks done after the API call, or the
/// wrong exit code for a missing token (3) or account (2).
#[tokio::test]
async fn given_missing_token_or_account_when_run_then_fails_without_requests() {
    let no_token = FizzyConfig {
        token: String::new(),
        ..test_config()
    };
    let ctx = context_with(MockApi::new(), no_token);
    let error = commands::run(&ctx, board_create(Some("x"))).await.expect_err("no token");
    assert_eq!(error.kind, ErrorKind::Authentication);
    assert!(error.message.contains("fizzy auth login"));
    assert_eq!(Envelope::error(&error).exit_code(), 3);
    assert!(ctx.api.calls().is_empty());

    let no_account = FizzyConfig {
        account: String::new(),
        ..test_config()
    };
    let ctx = context_with(MockApi::new(), no_account);
    let error = commands::run(&ctx, board_create(Some("x"))).await.expect_err("no account");
    assert_eq!(error.kind, ErrorKind::InvalidArgs);
    assert_eq!(error.exit_code(), 2);
    assert!(ctx.api.calls().is_empty());
}

/// **VALUE**: Verifies missing mandatory flags name the flag.
///
/// **BUG THIS CATCHES**: Would catch empty strings slipping through as values.
#[tokio::test]
async fn given_missing_required_flag_when_run_then_invalid_args_names_flag() {
    let (envelope, calls) = run(MockApi::new(), board_create(Some(""))).await;

    let error = envelope.error.expect("error envelope");
    assert_eq!(error.code, "INVALID_ARGS");
    assert_eq!(error.message, "required flag --name not provided");
    assert!(calls.is_empty());

    let (envelope, _) = run(
        MockApi::new(),
        Command::Reaction {
            action: ReactionCmd::Create {
                card: Some("5".to_string()),
                comment: None,
                content: Some("👍".to_string()),
            },
        },
    )
    .await;
    assert_eq!(
        envelope.error.map(|e| e.message),
        Some("required flag --comment not provided".to_string())
    );
}

/// **VALUE**: Verifies the board comes from the flag, then from config.
///
/// **BUG THIS CATCHES**: Would catch the configured board being ignored or
/// a missing board producing a request to `/boards//columns.json`.
#[tokio::test]
async fn given_board_sources_when_column_list_then_flag_then_config_then_error() {
    let list = |board: Option<&str>| Command::Column {
        action: ColumnCmd::List {
            board: board.map(str::to_string),
        },
    };

    let (envelope, _) = run(MockApi::new(), list(None)).await;
    assert_eq!(envelope.exit_code(), 2);

    let configured = FizzyConfig {
        board: "cfg-board".to_string(),
        ..test_config()
    };
    let ctx = context_with(MockApi::new().respond(ok(json!([]))), configured);
    commands::run(&ctx, list(None)).await.expect("configured board");
    assert_eq!(ctx.api.calls()[0].path, "/boards/cfg-board/columns.json");

    let (_, calls) = run(MockApi::new().respond(ok(json!([]))), list(Some("flag-board"))).await;
    assert_eq!(calls[0].path, "/boards/flag-board/columns.json");
}

/// **VALUE**: Verifies deletes answer with the fixed `{"deleted": true}`.
///
/// **BUG THIS CATCHES**: Would catch the empty 204 body leaking out as `null`.
#[tokio::test]
async fn given_delete_when_run_then_deleted_true() {
    let (envelope, calls) = run(
        MockApi::new().respond(no_content()),
        Command::Board {
            action: BoardCmd::Delete {
                board_id: "9".to_string(),
            },
        },
    )
    .await;

    assert_eq!(envelope.data, Some(json!({"deleted": true})));
    assert_eq!(calls, vec![call("DELETE", "/boards/9.json", None)]);
}

/// **VALUE**: Verifies list pages render as decimal and pagination is exposed.
///
/// **WHY THIS MATTERS**: Page numbers above 9 must stay numbers; the next URL
/// is how callers fetch the following page themselves.
///
/// **BUG THIS CATCHES**: Would catch digit-by-digit page rendering or a
/// dropped next link.
#[tokio::test]
async fn given_page_when_list_then_page_param_and_pagination_block() {
    let next = "https://app.fizzy.do/acct/boards.json?page=13";
    let (envelope, calls) = run(
        MockApi::new().respond(ok_with_next(json!([{"id": "1"}]), next)),
        Command::Board {
            action: BoardCmd::List(PageArgs {
                page: Some(12),
                all: false,
            }),
        },
    )
    .await;

    assert_eq!(calls[0].path, "/boards.json?page=12");
    assert_eq!(calls[0].fetch_all, Some(false));
    let pagination = envelope.pagination.expect("pagination block");
    assert!(pagination.has_next);
    assert_eq!(pagination.next_url.as_deref(), Some(next));
}

/// **VALUE**: Verifies `--all` is passed through to the pagination follower.
///
/// **BUG THIS CATCHES**: Would catch `--all` being ignored by a list command.
#[tokio::test]
async fn given_all_when_notification_list_then_fetch_all_requested() {
    let (envelope, calls) = run(
        MockApi::new().respond(ok(json!([]))),
        Command::Notification {
            action: NotificationCmd::List(PageArgs {
                page: None,
                all: true,
            }),
        },
    )
    .await;

    assert_eq!(calls[0].path, "/notifications.json");
    assert_eq!(calls[0].fetch_all, Some(true));
    assert!(envelope.pagination.is_none());
}

/// **VALUE**: Verifies step completion flags map onto a boolean.
///
/// **BUG THIS CATCHES**: Would catch `--not-completed` being ignored.
#[tokio::test]
async fn given_not_completed_when_step_update_then_completed_false_sent() {
    let (_, calls) = run(
        MockApi::new().respond(ok(json!({"id": "s1"}))),
        Command::Step {
            action: StepCmd::Update {
                step_id: "s1".to_string(),
                card: Some("5".to_string()),
                content: None,
                completed: false,
                not_completed: true,
            },
        },
    )
    .await;

    assert_eq!(
        calls,
        vec![call("PATCH", "/cards/5/steps/s1.json", Some(json!({"completed": false})))]
    );
}

/// **VALUE**: Verifies identity uses the absolute API URL and needs no account.
///
/// **BUG THIS CATCHES**: Would catch the account prefix being applied or an
/// account check blocking identity lookups.
#[tokio::test]
async fn given_no_account_when_identity_show_then_absolute_url_is_used() {
    let config = FizzyConfig {
        account: String::new(),
        api_url: "https://fizzy.example/".to_string(),
        ..test_config()
    };
    let ctx = context_with(MockApi::new().respond(ok(json!({"accounts": []}))), config);

    let envelope = commands::run(
        &ctx,
        Command::Identity {
            action: IdentityCmd::Show,
        },
    )
    .await
    .expect("identity should succeed");

    assert_eq!(envelope.data, Some(json!({"accounts": []})));
    assert_eq!(ctx.api.calls()[0].path, "https://fizzy.example/my/identity.json");
}

/// **VALUE**: Verifies API errors pass through with their kind intact.
///
/// **BUG THIS CATCHES**: Would catch handlers re-wrapping errors as general.
#[tokio::test]
async fn given_api_error_when_run_then_envelope_keeps_kind() {
    let (envelope, _) = run(
        MockApi::new().respond(Err(FizzyError::from_http_status(404, "Board not found"))),
        Command::Board {
            action: BoardCmd::Show {
                board_id: "nope".to_string(),
            },
        },
    )
    .await;

    assert_eq!(envelope.exit_code(), 5);
    let error = envelope.error.expect("error");
    assert_eq!(error.message, "Board not found");
    assert_eq!(error.status, Some(404));
}

#[tokio::test]
async fn given_version_when_run_then_reports_package_version() {
    let (envelope, calls) = run(MockApi::new(), Command::Version).await;

    assert_eq!(envelope.data, Some(json!({"version": VERSION})));
    assert!(calls.is_empty());
}

/// **VALUE**: Verifies comment bodies are read from `--body-file` relative to
/// the working directory, and that create without any body is refused.
///
/// **WHY THIS MATTERS**: Long HTML comments are written to files; a body read
/// from the wrong directory would post the wrong text or fail.
///
/// **BUG THIS CATCHES**: Would catch the file read being skipped for updates,
/// relative paths resolved against the process directory, or an empty comment
/// being created.
#[tokio::test]
async fn given_body_file_when_comment_commands_run_then_body_comes_from_file() {
    // GIVEN
    let dir = tempfile::TempDir::new().expect("temp dir");
    std::fs::write(dir.path().join("reply.html"), "<p>Looks good</p>").expect("write body");
    let mut ctx = context(MockApi::new().respond(ok(json!({"id": "c1"}))));
    ctx.paths.working_dir = Some(dir.path().to_path_buf());

    // WHEN
    let envelope = Envelope::from_result(
        commands::run(
            &ctx,
            Command::Comment {
                action: CommentCmd::Update {
                    comment_id: "c1".to_string(),
                    card: Some("7".to_string()),
                    body: None,
                    body_file: Some(PathBuf::from("reply.html")),
                },
            },
        )
        .await,
    );

    // THEN
    assert_eq!(envelope.data, Some(json!({"id": "c1"})));
    assert_eq!(
        ctx.api.calls(),
        vec![call(
            "PATCH",
            "/cards/7/comments/c1.json",
            Some(json!({"comment": {"body": "<p>Looks good</p>"}}))
        )]
    );

    let (envelope, calls) = run(
        MockApi::new(),
        Command::Comment {
            action: CommentCmd::Create {
                card: Some("7".to_string()),
                body: None,
                body_file: None,
                created_at: None,
            },
        },
    )
    .await;
    assert_eq!(
        envelope.error.map(|error| error.message),
        Some("required flag --body or body_file not provided".to_string())
    );
    assert!(calls.is_empty());
}
