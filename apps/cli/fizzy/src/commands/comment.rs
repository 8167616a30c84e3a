use super::{CommandContext, deleted, insert_opt, list_paginated, non_empty, required};
use crate::cli::CommentCmd;

use client_core::error::FizzyError;
use client_core::fizzy_client::Api;
use client_core::response::Envelope;

use serde_json::{Map, Value, json};

pub async fn handle<A: Api>(ctx: &CommandContext<A>, cmd: CommentCmd) -> Result<Envelope, FizzyError> {
    ctx.require_auth_and_account()?;

    match cmd {
        CommentCmd::List { card, pages } => {
            let card = required(card.as_deref(), "card")?;
            list_paginated(ctx, &format!("/cards/{card}/comments.json"), &pages).await
        }
        CommentCmd::Show { comment_id, card } => {
            let card = required(card.as_deref(), "card")?;
            let response = ctx.api.get(&comment_path(card, &comment_id)).await?;
            Ok(Envelope::success(response.data_or_null()))
        }
        CommentCmd::Create {
            card,
            body,
            body_file,
            created_at,
        } => {
            let card = required(card.as_deref(), "card")?;
            let body = ctx
                .read_text(body, body_file.as_deref())
                .await?
                .ok_or_else(|| FizzyError::required_flag("body or body_file"))?;

            let mut comment = Map::new();
            comment.insert("body".to_string(), Value::from(body));
            insert_opt(&mut comment, "created_at", non_empty(created_at));

            ctx.create_and_follow(
                &format!("/cards/{card}/comments.json"),
                &json!({ "comment": comment }),
            )
            .await
        }
        CommentCmd::Update {
            comment_id,
            card,
            body,
            body_file,
        } => {
            let card = required(card.as_deref(), "card")?;

            let mut comment = Map::new();
            let body = ctx.read_text(body, body_file.as_deref()).await?;
            insert_opt(&mut comment, "body", body);

            let response = ctx
                .api
                .patch(&comment_path(card, &comment_id), Some(&json!({ "comment": comment })))
                .await?;
            Ok(Envelope::success(response.data_or_null()))
        }
        CommentCmd::Delete { comment_id, card } => {
            let card = required(card.as_deref(), "card")?;
            ctx.api.delete(&comment_path(card, &comment_id)).await?;
            Ok(deleted())
        }
    }
}

fn comment_path(card: &str, comment_id: &str) -> String {
    format!("/cards/{card}/comments/{comment_id}.json")
}
