use super::{CommandContext, deleted, insert_opt, list_paginated, non_empty, required};
use crate::cli::BoardCmd;

use client_core::error::FizzyError;
use client_core::fizzy_client::Api;
use client_core::response::Envelope;

use serde_json::{Map, Value};

pub async fn handle<A: Api>(ctx: &CommandContext<A>, cmd: BoardCmd) -> Result<Envelope, FizzyError> {
    ctx.require_auth_and_account()?;

    match cmd {
        BoardCmd::List(pages) => list_paginated(ctx, "/boards.json", &pages).await,
        BoardCmd::Show { board_id } => {
            let response = ctx.api.get(&format!("/boards/{board_id}.json")).await?;
            Ok(Envelope::success(response.data_or_null()))
        }
        BoardCmd::Create {
            name,
            all_access,
            auto_postpone_period,
        } => {
            let name = required(name.as_deref(), "name")?;
            let body = board_params(Some(name.to_string()), all_access, auto_postpone_period);
            ctx.create_and_follow("/boards.json", &Value::Object(body)).await
        }
        BoardCmd::Update {
            board_id,
            name,
            all_access,
            auto_postpone_period,
        } => {
            let body = board_params(name, all_access, auto_postpone_period);
            let response = ctx
                .api
                .patch(&format!("/boards/{board_id}.json"), Some(&Value::Object(body)))
                .await?;
            Ok(Envelope::success(response.data_or_null()))
        }
        BoardCmd::Delete { board_id } => {
            ctx.api.delete(&format!("/boards/{board_id}.json")).await?;
            Ok(deleted())
        }
    }
}

/// `all_access` is sent as a boolean: only the literal `true` grants access.
fn board_params(
    name: Option<String>,
    all_access: Option<String>,
    auto_postpone_period: Option<u32>,
) -> Map<String, Value> {
    let mut body = Map::new();
    insert_opt(&mut body, "name", non_empty(name));
    insert_opt(&mut body, "all_access", non_empty(all_access).map(|value| value == "true"));
    insert_opt(
        &mut body,
        "auto_postpone_period",
        auto_postpone_period.filter(|days| *days > 0),
    );
    body
}
