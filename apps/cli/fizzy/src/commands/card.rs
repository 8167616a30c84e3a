use super::{
    CommandContext, attachment, data_or_empty, deleted, insert_opt, non_empty, paginated,
    required,
};
use crate::cli::{CardCmd, CardCreateArgs, CardListArgs, CardUpdateArgs};
use crate::pseudo_columns::{PseudoColumn, PseudoKind};

use client_core::error::FizzyError;
use client_core::fizzy_client::{Api, ApiResponse};
use client_core::json_fields::get_nested_id;
use client_core::response::Envelope;

use serde_json::{Map, Value, json};
use url::form_urlencoded::byte_serialize;

const CLIENT_SIDE_FILTER_MESSAGE: &str =
    "Filtering by column requires --all (or --page) because it is applied client-side";

pub async fn handle<A: Api>(ctx: &CommandContext<A>, cmd: CardCmd) -> Result<Envelope, FizzyError> {
    ctx.require_auth_and_account()?;

    match cmd {
        CardCmd::List(args) => list(ctx, args).await,
        CardCmd::Show { card_number } => {
            let response = ctx.api.get(&card_path(&card_number, "")).await?;
            Ok(Envelope::success(response.data_or_null()))
        }
        CardCmd::Create(args) => create(ctx, args).await,
        CardCmd::Update(args) => update(ctx, args).await,
        CardCmd::Delete { card_number } => {
            ctx.api.delete(&card_path(&card_number, "")).await?;
            Ok(deleted())
        }
        CardCmd::Close { card_number } => {
            action(ctx.api.post(&card_path(&card_number, "/closure"), None).await?)
        }
        CardCmd::Reopen { card_number } => {
            action(ctx.api.delete(&card_path(&card_number, "/closure")).await?)
        }
        CardCmd::Postpone { card_number } => {
            action(ctx.api.post(&card_path(&card_number, "/not_now"), None).await?)
        }
        CardCmd::Column {
            card_number,
            column,
        } => move_to_column(ctx, &card_number, column.as_deref()).await,
        CardCmd::Untriage { card_number } => {
            let response = ctx.api.delete(&card_path(&card_number, "/triage")).await?;
            let data = response.data.unwrap_or_else(|| json!({ "untriaged": true }));
            Ok(Envelope::success(data))
        }
        CardCmd::Assign { card_number, user } => {
            let user = required(user.as_deref(), "user")?;
            let body = json!({ "assignee_id": user });
            action(
                ctx.api
                    .post(&card_path(&card_number, "/assignments"), Some(&body))
                    .await?,
            )
        }
        CardCmd::Tag { card_number, tag } => {
            let tag = required(tag.as_deref(), "tag")?;
            let body = json!({ "tag_title": tag });
            action(
                ctx.api
                    .post(&card_path(&card_number, "/taggings"), Some(&body))
                    .await?,
            )
        }
        CardCmd::Watch { card_number } => {
            action(ctx.api.post(&card_path(&card_number, "/watch"), None).await?)
        }
        CardCmd::Unwatch { card_number } => {
            action(ctx.api.delete(&card_path(&card_number, "/watch")).await?)
        }
        CardCmd::Attachments { action } => attachment::handle(ctx, action).await,
    }
}

/// `/cards/N{suffix}.json`
pub(crate) fn card_path(card_number: &str, suffix: &str) -> String {
    format!("/cards/{card_number}{suffix}.json")
}

fn action(response: ApiResponse) -> Result<Envelope, FizzyError> {
    Ok(Envelope::success(data_or_empty(response)))
}

/// Card filtering the API cannot do for us.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientFilter {
    /// Cards without a column.
    Triage,
    /// Cards in this column.
    Column(String),
}

impl ClientFilter {
    fn keeps(&self, card: &Value) -> bool {
        let column_id = get_nested_id(card, "column_id", "column");
        match self {
            ClientFilter::Triage => column_id.is_none(),
            ClientFilter::Column(wanted) => column_id == Some(wanted.as_str()),
        }
    }
}

/// How a `--column` / `--indexed-by` pair is applied.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListFilter {
    pub indexed_by: Option<String>,
    pub client: Option<ClientFilter>,
}

impl ListFilter {
    /// Pseudo columns backed by a server lane become `indexed_by`; the rest
    /// are filtered locally. A lane that contradicts `--indexed-by` is an
    /// argument error.
    pub fn resolve(column: Option<&str>, indexed_by: Option<&str>) -> Result<Self, FizzyError> {
        let column = column.map(str::trim).filter(|c| !c.is_empty());
        let indexed_by = indexed_by.map(str::trim).filter(|i| !i.is_empty());

        let Some(column) = column else {
            return Ok(Self {
                indexed_by: indexed_by.map(str::to_string),
                client: None,
            });
        };

        match PseudoColumn::parse(column) {
            Some(pseudo) => match pseudo.kind {
                PseudoKind::NotNow | PseudoKind::Closed => {
                    let lane = pseudo.kind.as_str();
                    if indexed_by.is_some_and(|given| given != lane) {
                        return Err(conflict(pseudo.id));
                    }
                    Ok(Self {
                        indexed_by: Some(lane.to_string()),
                        client: None,
                    })
                }
                PseudoKind::Triage => {
                    if indexed_by.is_some() {
                        return Err(conflict(pseudo.id));
                    }
                    Ok(Self {
                        indexed_by: None,
                        client: Some(ClientFilter::Triage),
                    })
                }
            },
            None => {
                if indexed_by.is_some() {
                    return Err(FizzyError::invalid_args("cannot combine --indexed-by with --column"));
                }
                Ok(Self {
                    indexed_by: None,
                    client: Some(ClientFilter::Column(column.to_string())),
                })
            }
        }
    }
}

#[track_caller]
fn conflict(column: &str) -> FizzyError {
    FizzyError::invalid_args(format!("cannot combine --indexed-by with --column {column}"))
}

fn encode(value: &str) -> String {
    byte_serialize(value.as_bytes()).collect()
}

/// `/cards.json` with the server-side filters as query parameters.
pub fn card_list_path(
    board: Option<&str>,
    filter: &ListFilter,
    tag: Option<&str>,
    assignee: Option<&str>,
    page: Option<u32>,
) -> String {
    let mut params = Vec::new();
    if let Some(board) = board {
        params.push(format!("board_ids[]={}", encode(board)));
    }
    if let Some(indexed_by) = &filter.indexed_by {
        params.push(format!("indexed_by={}", encode(indexed_by)));
    }
    if let Some(tag) = tag.filter(|t| !t.is_empty()) {
        params.push(format!("tag_ids[]={}", encode(tag)));
    }
    if let Some(assignee) = assignee.filter(|a| !a.is_empty()) {
        params.push(format!("assignee_ids[]={}", encode(assignee)));
    }
    if let Some(page) = page.filter(|p| *p > 0) {
        params.push(format!("page={page}"));
    }

    if params.is_empty() {
        "/cards.json".to_string()
    } else {
        format!("/cards.json?{}", params.join("&"))
    }
}

async fn list<A: Api>(ctx: &CommandContext<A>, args: CardListArgs) -> Result<Envelope, FizzyError> {
    let board = ctx.default_board(args.board.as_deref());
    let filter = ListFilter::resolve(args.column.as_deref(), args.indexed_by.as_deref())?;
    let page = args.pages.page.filter(|p| *p > 0);

    if filter.client.is_some() && !args.pages.all && page.is_none() {
        return Err(FizzyError::invalid_args(CLIENT_SIDE_FILTER_MESSAGE));
    }

    let path = card_list_path(
        board.as_deref(),
        &filter,
        args.tag.as_deref(),
        args.assignee.as_deref(),
        page,
    );
    let mut response = ctx.api.get_with_pagination(&path, args.pages.all).await?;

    if let Some(client_filter) = &filter.client {
        let Some(Value::Array(cards)) = response.data.take() else {
            return Err(FizzyError::general("Unexpected cards list response"));
        };
        let kept: Vec<Value> = cards
            .into_iter()
            .filter(|card| card.is_object() && client_filter.keeps(card))
            .collect();
        response.data = Some(Value::Array(kept));
    }

    Ok(paginated(response))
}

async fn create<A: Api>(ctx: &CommandContext<A>, args: CardCreateArgs) -> Result<Envelope, FizzyError> {
    let board = ctx.require_board(args.board.as_deref())?;
    let title = required(args.title.as_deref(), "title")?;

    let mut card = Map::new();
    card.insert("title".to_string(), Value::from(title));
    let description = ctx
        .read_text(args.description, args.description_file.as_deref())
        .await?;
    insert_opt(&mut card, "description", description);
    insert_opt(&mut card, "tag_ids", non_empty(args.tag_ids));
    insert_opt(&mut card, "image", non_empty(args.image));
    insert_opt(&mut card, "created_at", non_empty(args.created_at));

    let body = json!({ "board_id": board, "card": card });
    ctx.create_and_follow("/cards.json", &body).await
}

async fn update<A: Api>(ctx: &CommandContext<A>, args: CardUpdateArgs) -> Result<Envelope, FizzyError> {
    let mut card = Map::new();
    insert_opt(&mut card, "title", non_empty(args.title));
    let description = ctx
        .read_text(args.description, args.description_file.as_deref())
        .await?;
    insert_opt(&mut card, "description", description);
    insert_opt(&mut card, "created_at", non_empty(args.created_at));

    let body = json!({ "card": card });
    let response = ctx
        .api
        .patch(&card_path(&args.card_number, ""), Some(&body))
        .await?;
    Ok(Envelope::success(response.data_or_null()))
}

/// Pseudo columns map onto their lane endpoints; anything else is a column id.
async fn move_to_column<A: Api>(
    ctx: &CommandContext<A>,
    card_number: &str,
    column: Option<&str>,
) -> Result<Envelope, FizzyError> {
    let column = required(column, "column")?;

    let response = match PseudoColumn::parse(column).map(|pseudo| pseudo.kind) {
        Some(PseudoKind::Triage) => ctx.api.delete(&card_path(card_number, "/triage")).await?,
        Some(PseudoKind::NotNow) => ctx.api.post(&card_path(card_number, "/not_now"), None).await?,
        Some(PseudoKind::Closed) => ctx.api.post(&card_path(card_number, "/closure"), None).await?,
        None => {
            let body = json!({ "column_id": column });
            ctx.api
                .post(&card_path(card_number, "/triage"), Some(&body))
                .await?
        }
    };

    action(response)
}
