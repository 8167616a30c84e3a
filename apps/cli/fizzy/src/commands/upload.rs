use super::CommandContext;
use crate::cli::UploadCmd;

use client_core::error::FizzyError;
use client_core::fizzy_client::Api;
use client_core::response::Envelope;

pub async fn handle<A: Api>(ctx: &CommandContext<A>, cmd: UploadCmd) -> Result<Envelope, FizzyError> {
    ctx.require_auth_and_account()?;

    match cmd {
        UploadCmd::File { path } => {
            let path = ctx.resolve_path(&path);
            if !path.exists() {
                return Err(FizzyError::general(format!("File not found: {}", path.display())));
            }
            let response = ctx.api.upload_file(&path).await?;
            Ok(Envelope::success(response.data_or_null()))
        }
    }
}
