use super::CommandContext;
use super::card::card_path;
use crate::attachments::{Attachment, parse_attachments};
use crate::cli::AttachmentCmd;

use client_core::error::FizzyError;
use client_core::fizzy_client::Api;
use client_core::json_fields::get_str;
use client_core::response::Envelope;

use std::path::{Path, PathBuf};

use log::info;
use serde_json::{Value, json};

pub async fn handle<A: Api>(
    ctx: &CommandContext<A>,
    cmd: AttachmentCmd,
) -> Result<Envelope, FizzyError> {
    match cmd {
        AttachmentCmd::Show { card_number } => {
            let attachments = card_attachments(ctx, &card_number).await?;
            Ok(Envelope::success(serde_json::to_value(attachments)?))
        }
        AttachmentCmd::Download {
            card_number,
            index,
            output,
        } => download(ctx, &card_number, index.as_deref(), output).await,
    }
}

async fn card_attachments<A: Api>(
    ctx: &CommandContext<A>,
    card_number: &str,
) -> Result<Vec<Attachment>, FizzyError> {
    let response = ctx.api.get(&card_path(card_number, "")).await?;
    let card = match response.data {
        Some(card @ Value::Object(_)) => card,
        _ => return Err(FizzyError::general("Invalid card response")),
    };
    Ok(parse_attachments(get_str(&card, "description_html").unwrap_or_default()))
}

/// Pick one attachment by its 1-based index, or all of them.
pub fn select_attachments(
    attachments: Vec<Attachment>,
    index: Option<&str>,
) -> Result<Vec<Attachment>, FizzyError> {
    if attachments.is_empty() {
        return Err(FizzyError::not_found("No attachments found on this card"));
    }

    let Some(index) = index else {
        return Ok(attachments);
    };

    let index: usize = index
        .trim()
        .parse()
        .map_err(|_| FizzyError::invalid_args("attachment index must be a number"))?;
    if index < 1 || index > attachments.len() {
        return Err(FizzyError::invalid_args(format!(
            "attachment index must be between 1 and {}",
            attachments.len()
        )));
    }

    Ok(attachments.into_iter().skip(index - 1).take(1).collect())
}

/// Local name for a downloaded attachment.
///
/// Only the last component of the server-supplied filename is kept, so the
/// file always lands in the working directory.
pub fn local_file_name(attachment: &Attachment) -> PathBuf {
    Path::new(&attachment.filename)
        .file_name()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(format!("attachment-{}", attachment.index)))
}

async fn download<A: Api>(
    ctx: &CommandContext<A>,
    card_number: &str,
    index: Option<&str>,
    output: Option<PathBuf>,
) -> Result<Envelope, FizzyError> {
    let attachments = card_attachments(ctx, card_number).await?;
    let selected = select_attachments(attachments, index)?;
    let single = selected.len() == 1;

    let mut files = Vec::with_capacity(selected.len());
    for attachment in selected {
        if attachment.download_url.is_empty() {
            return Err(FizzyError::general(format!(
                "Attachment {} has no download URL",
                attachment.index
            )));
        }

        let target = match (&output, single) {
            (Some(output), true) => output.clone(),
            _ => local_file_name(&attachment),
        };

        info!("Downloading {} to {}", attachment.filename, target.display());
        ctx.api
            .download_file(&attachment.download_url, &ctx.resolve_path(&target))
            .await?;

        files.push(json!({
            "filename": attachment.filename,
            "saved_to": target.display().to_string(),
            "filesize": attachment.filesize,
        }));
    }

    Ok(Envelope::success(json!({
        "downloaded": files.len(),
        "files": files,
    })))
}
