use super::CommandContext;
use crate::cli::IdentityCmd;

use client_core::error::FizzyError;
use client_core::fizzy_client::Api;
use client_core::response::Envelope;

/// Identity lives outside any account, so the URL is absolute and only a
/// token is required.
pub async fn handle<A: Api>(ctx: &CommandContext<A>, cmd: IdentityCmd) -> Result<Envelope, FizzyError> {
    ctx.require_auth()?;

    match cmd {
        IdentityCmd::Show => {
            let url = format!("{}/my/identity.json", ctx.config.api_url.trim_end_matches('/'));
            let response = ctx.api.get(&url).await?;
            Ok(Envelope::success(response.data_or_null()))
        }
    }
}
