use super::{CommandContext, deleted, insert_opt, non_empty, required};
use crate::cli::StepCmd;

use client_core::error::FizzyError;
use client_core::fizzy_client::Api;
use client_core::response::Envelope;

use serde_json::{Map, Value};

pub async fn handle<A: Api>(ctx: &CommandContext<A>, cmd: StepCmd) -> Result<Envelope, FizzyError> {
    ctx.require_auth_and_account()?;

    match cmd {
        StepCmd::Show { step_id, card } => {
            let card = required(card.as_deref(), "card")?;
            let response = ctx.api.get(&step_path(card, &step_id)).await?;
            Ok(Envelope::success(response.data_or_null()))
        }
        StepCmd::Create {
            card,
            content,
            completed,
        } => {
            let card = required(card.as_deref(), "card")?;
            let content = required(content.as_deref(), "content")?;

            let mut body = Map::new();
            body.insert("content".to_string(), Value::from(content));
            if completed {
                body.insert("completed".to_string(), Value::Bool(true));
            }

            ctx.create_and_follow(&format!("/cards/{card}/steps.json"), &Value::Object(body))
                .await
        }
        StepCmd::Update {
            step_id,
            card,
            content,
            completed,
            not_completed,
        } => {
            let card = required(card.as_deref(), "card")?;

            let mut body = Map::new();
            insert_opt(&mut body, "content", non_empty(content));
            let completion = match (completed, not_completed) {
                (true, _) => Some(true),
                (false, true) => Some(false),
                (false, false) => None,
            };
            insert_opt(&mut body, "completed", completion);

            let response = ctx
                .api
                .patch(&step_path(card, &step_id), Some(&Value::Object(body)))
                .await?;
            Ok(Envelope::success(response.data_or_null()))
        }
        StepCmd::Delete { step_id, card } => {
            let card = required(card.as_deref(), "card")?;
            ctx.api.delete(&step_path(card, &step_id)).await?;
            Ok(deleted())
        }
    }
}

fn step_path(card: &str, step_id: &str) -> String {
    format!("/cards/{card}/steps/{step_id}.json")
}
