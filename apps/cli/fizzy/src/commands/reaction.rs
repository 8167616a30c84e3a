use super::{CommandContext, data_or_empty, deleted, required};
use crate::cli::ReactionCmd;

use client_core::error::FizzyError;
use client_core::fizzy_client::Api;
use client_core::response::Envelope;

use serde_json::json;

pub async fn handle<A: Api>(ctx: &CommandContext<A>, cmd: ReactionCmd) -> Result<Envelope, FizzyError> {
    ctx.require_auth_and_account()?;

    match cmd {
        ReactionCmd::List { card, comment } => {
            let base = reactions_path(card.as_deref(), comment.as_deref())?;
            let response = ctx.api.get(&format!("{base}.json")).await?;
            Ok(Envelope::success(response.data_or_null()))
        }
        ReactionCmd::Create {
            card,
            comment,
            content,
        } => {
            let base = reactions_path(card.as_deref(), comment.as_deref())?;
            let content = required(content.as_deref(), "content")?;
            let response = ctx
                .api
                .post(&format!("{base}.json"), Some(&json!({ "content": content })))
                .await?;
            Ok(Envelope::success(data_or_empty(response)))
        }
        ReactionCmd::Delete {
            reaction_id,
            card,
            comment,
        } => {
            let base = reactions_path(card.as_deref(), comment.as_deref())?;
            ctx.api.delete(&format!("{base}/{reaction_id}.json")).await?;
            Ok(deleted())
        }
    }
}

/// `/cards/N/comments/C/reactions`, without the `.json` suffix.
fn reactions_path(card: Option<&str>, comment: Option<&str>) -> Result<String, FizzyError> {
    let card = required(card, "card")?;
    let comment = required(comment, "comment")?;
    Ok(format!("/cards/{card}/comments/{comment}/reactions"))
}
