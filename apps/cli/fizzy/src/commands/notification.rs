use super::{CommandContext, list_paginated};
use crate::cli::NotificationCmd;

use client_core::error::FizzyError;
use client_core::fizzy_client::Api;
use client_core::response::Envelope;

pub async fn handle<A: Api>(
    ctx: &CommandContext<A>,
    cmd: NotificationCmd,
) -> Result<Envelope, FizzyError> {
    ctx.require_auth_and_account()?;

    let path = match cmd {
        NotificationCmd::List(pages) => {
            return list_paginated(ctx, "/notifications.json", &pages).await;
        }
        NotificationCmd::Read { notification_id } => {
            format!("/notifications/{notification_id}/read.json")
        }
        NotificationCmd::Unread { notification_id } => {
            format!("/notifications/{notification_id}/unread.json")
        }
        NotificationCmd::ReadAll => "/notifications/bulk_reading.json".to_string(),
    };

    let response = ctx.api.post(&path, None).await?;
    Ok(Envelope::success(response.data_or_null()))
}
