use super::{CommandContext, list_paginated};
use crate::cli::TagCmd;

use client_core::error::FizzyError;
use client_core::fizzy_client::Api;
use client_core::response::Envelope;

pub async fn handle<A: Api>(ctx: &CommandContext<A>, cmd: TagCmd) -> Result<Envelope, FizzyError> {
    ctx.require_auth_and_account()?;

    match cmd {
        TagCmd::List(pages) => list_paginated(ctx, "/tags.json", &pages).await,
    }
}
