use super::{CommandContext, deleted, insert_opt, non_empty, required};
use crate::cli::ColumnCmd;

use client_core::error::FizzyError;
use client_core::fizzy_client::Api;
use client_core::response::Envelope;

use serde_json::{Map, Value};

pub async fn handle<A: Api>(ctx: &CommandContext<A>, cmd: ColumnCmd) -> Result<Envelope, FizzyError> {
    ctx.require_auth_and_account()?;

    match cmd {
        ColumnCmd::List { board } => {
            let board = ctx.require_board(board.as_deref())?;
            let response = ctx.api.get(&format!("/boards/{board}/columns.json")).await?;
            Ok(Envelope::success(response.data_or_null()))
        }
        ColumnCmd::Show { column_id, board } => {
            let board = ctx.require_board(board.as_deref())?;
            let response = ctx.api.get(&column_path(&board, &column_id)).await?;
            Ok(Envelope::success(response.data_or_null()))
        }
        ColumnCmd::Create { board, name, color } => {
            let board = ctx.require_board(board.as_deref())?;
            let name = required(name.as_deref(), "name")?;

            let mut body = Map::new();
            body.insert("name".to_string(), Value::from(name));
            insert_opt(&mut body, "color", non_empty(color));

            ctx.create_and_follow(&format!("/boards/{board}/columns.json"), &Value::Object(body))
                .await
        }
        ColumnCmd::Update {
            column_id,
            board,
            name,
            color,
        } => {
            let board = ctx.require_board(board.as_deref())?;

            let mut body = Map::new();
            insert_opt(&mut body, "name", non_empty(name));
            insert_opt(&mut body, "color", non_empty(color));

            let response = ctx
                .api
                .patch(&column_path(&board, &column_id), Some(&Value::Object(body)))
                .await?;
            Ok(Envelope::success(response.data_or_null()))
        }
        ColumnCmd::Delete { column_id, board } => {
            let board = ctx.require_board(board.as_deref())?;
            ctx.api.delete(&column_path(&board, &column_id)).await?;
            Ok(deleted())
        }
    }
}

fn column_path(board: &str, column_id: &str) -> String {
    format!("/boards/{board}/columns/{column_id}.json")
}
