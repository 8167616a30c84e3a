use super::{CommandContext, list_paginated};
use crate::cli::UserCmd;

use client_core::error::FizzyError;
use client_core::fizzy_client::Api;
use client_core::response::Envelope;

pub async fn handle<A: Api>(ctx: &CommandContext<A>, cmd: UserCmd) -> Result<Envelope, FizzyError> {
    ctx.require_auth_and_account()?;

    match cmd {
        UserCmd::List(pages) => list_paginated(ctx, "/users.json", &pages).await,
        UserCmd::Show { user_id } => {
            let response = ctx.api.get(&format!("/users/{user_id}.json")).await?;
            Ok(Envelope::success(response.data_or_null()))
        }
    }
}
