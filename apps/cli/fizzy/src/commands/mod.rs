//! Command handlers.
//!
//! Each handler checks its preconditions, performs its API calls in order
//! through an [`Api`], and returns the envelope to print. Handlers never
//! print or exit; `main` renders the returned envelope and exits with its
//! code.

pub mod attachment;
pub mod auth;
pub mod board;
pub mod card;
pub mod column;
pub mod comment;
pub mod identity;
pub mod notification;
pub mod reaction;
pub mod step;
pub mod tag;
pub mod upload;
pub mod user;
pub mod version;

use crate::cli::{Command, PageArgs};

use client_core::config::{ConfigPaths, FizzyConfig};
use client_core::error::FizzyError;
use client_core::fizzy_client::{Api, ApiResponse};
use client_core::response::Envelope;

use std::path::{Path, PathBuf};

use log::warn;
use serde_json::{Map, Value, json};

const NO_TOKEN_MESSAGE: &str =
    "No API token configured. Run 'fizzy auth login TOKEN' or set FIZZY_TOKEN";
const NO_ACCOUNT_MESSAGE: &str = "No account configured. Set --account flag or FIZZY_ACCOUNT";
const NO_BOARD_MESSAGE: &str =
    "No board configured. Set --board, FIZZY_BOARD, or add 'board' to your config file";

/// Everything a handler may use: the API seam, the effective configuration,
/// and where config files live.
pub struct CommandContext<A> {
    pub api: A,
    pub config: FizzyConfig,
    pub paths: ConfigPaths,
}

impl<A: Api> CommandContext<A> {
    pub fn new(api: A, config: FizzyConfig, paths: ConfigPaths) -> Self {
        Self { api, config, paths }
    }

    pub fn require_auth(&self) -> Result<(), FizzyError> {
        if self.config.token.is_empty() {
            return Err(FizzyError::authentication(NO_TOKEN_MESSAGE));
        }
        Ok(())
    }

    pub fn require_account(&self) -> Result<(), FizzyError> {
        if self.config.account.is_empty() {
            return Err(FizzyError::invalid_args(NO_ACCOUNT_MESSAGE));
        }
        Ok(())
    }

    pub fn require_auth_and_account(&self) -> Result<(), FizzyError> {
        self.require_auth()?;
        self.require_account()
    }

    /// The `--board` flag, else the configured board.
    pub fn default_board(&self, flag: Option<&str>) -> Option<String> {
        flag.filter(|board| !board.is_empty())
            .map(str::to_string)
            .or_else(|| Some(self.config.board.clone()).filter(|board| !board.is_empty()))
    }

    pub fn require_board(&self, flag: Option<&str>) -> Result<String, FizzyError> {
        self.default_board(flag)
            .ok_or_else(|| FizzyError::invalid_args(NO_BOARD_MESSAGE))
    }

    /// Relative paths are resolved against the working directory.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        match &self.paths.working_dir {
            Some(dir) if path.is_relative() => dir.join(path),
            _ => path.to_path_buf(),
        }
    }

    /// Text from `--x-file` if given, else from `--x`.
    pub async fn read_text(
        &self,
        value: Option<String>,
        file: Option<&Path>,
    ) -> Result<Option<String>, FizzyError> {
        if let Some(path) = file {
            let path = self.resolve_path(path);
            let text = tokio::fs::read_to_string(&path).await.map_err(|e| {
                FizzyError::general(format!("Failed to read file {}: {e}", path.display()))
            })?;
            return Ok(Some(text));
        }
        Ok(value.filter(|text| !text.is_empty()))
    }

    /// POST a create request and echo the created resource.
    ///
    /// When the server answers with a `Location`, that resource is fetched and
    /// returned alongside the location. If the fetch fails the create still
    /// succeeded, so the envelope reports success with `data: null`.
    pub async fn create_and_follow(&self, path: &str, body: &Value) -> Result<Envelope, FizzyError> {
        let created = self.api.post(path, Some(body)).await?;

        let Some(location) = created.location.clone() else {
            return Ok(Envelope::success(created.data_or_null()));
        };

        match self.api.follow_location(&location).await {
            Ok(followed) => Ok(Envelope::success_with_location(
                followed.and_then(|response| response.data),
                location,
            )),
            Err(e) => {
                warn!("Created resource at {location} could not be fetched: {e}");
                Ok(Envelope::success_with_location(None, location))
            }
        }
    }
}

/// Dispatch a parsed command to its handler.
pub async fn run<A: Api>(ctx: &CommandContext<A>, command: Command) -> Result<Envelope, FizzyError> {
    match command {
        Command::Board { action } => board::handle(ctx, action).await,
        Command::Card { action } => card::handle(ctx, action).await,
        Command::Column { action } => column::handle(ctx, action).await,
        Command::Comment { action } => comment::handle(ctx, action).await,
        Command::Step { action } => step::handle(ctx, action).await,
        Command::Reaction { action } => reaction::handle(ctx, action).await,
        Command::Notification { action } => notification::handle(ctx, action).await,
        Command::Tag { action } => tag::handle(ctx, action).await,
        Command::User { action } => user::handle(ctx, action).await,
        Command::Identity { action } => identity::handle(ctx, action).await,
        Command::Auth { action } => auth::handle(ctx, action),
        Command::Upload { action } => upload::handle(ctx, action).await,
        Command::Version => Ok(version::handle()),
    }
}

/// Missing or empty mandatory flag.
#[track_caller]
pub(crate) fn required<'a>(value: Option<&'a str>, flag: &str) -> Result<&'a str, FizzyError> {
    value
        .filter(|value| !value.is_empty())
        .ok_or_else(|| FizzyError::required_flag(flag))
}

/// `path?page=N` when a positive page was requested.
pub(crate) fn with_page(path: &str, pages: &PageArgs) -> String {
    match pages.page.filter(|page| *page > 0) {
        Some(page) => format!("{path}?page={page}"),
        None => path.to_string(),
    }
}

/// GET a list and wrap it with pagination info.
pub(crate) async fn list_paginated<A: Api>(
    ctx: &CommandContext<A>,
    path: &str,
    pages: &PageArgs,
) -> Result<Envelope, FizzyError> {
    let response = ctx
        .api
        .get_with_pagination(&with_page(path, pages), pages.all)
        .await?;
    Ok(paginated(response))
}

pub(crate) fn paginated(response: ApiResponse) -> Envelope {
    let has_next = response.has_next();
    Envelope::success_with_pagination(response.data_or_null(), has_next, response.link_next)
}

/// Response payload, or `{}` for actions that answer with an empty body.
pub(crate) fn data_or_empty(response: ApiResponse) -> Value {
    response.data.unwrap_or_else(|| Value::Object(Map::new()))
}

pub(crate) fn deleted() -> Envelope {
    Envelope::success(json!({ "deleted": true }))
}

/// Insert `value` under `key` when present.
pub(crate) fn insert_opt(params: &mut Map<String, Value>, key: &str, value: Option<impl Into<Value>>) {
    if let Some(value) = value {
        params.insert(key.to_string(), value.into());
    }
}

pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.is_empty())
}
