//! Attachment discovery in rich-text card descriptions.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

const ATTACHMENT_PATTERN: &str =
    r"(?s)<action-text-attachment\s+([^>]+)>(.*?)</action-text-attachment>";
const DOWNLOAD_HREF_PATTERN: &str = r#"href="([^"]+\?disposition=attachment)""#;
const BLOB_REDIRECT_HREF_PATTERN: &str =
    r#"href="(/[^"]+/rails/active_storage/blobs/redirect/[^"]+)""#;
const ATTRIBUTE_PATTERN: &str = r#"([a-zA-Z][a-zA-Z0-9_-]*)="([^"]*)""#;

static ATTACHMENT_REGEX: OnceLock<Regex> = OnceLock::new();
static DOWNLOAD_HREF_REGEX: OnceLock<Regex> = OnceLock::new();
static BLOB_REDIRECT_HREF_REGEX: OnceLock<Regex> = OnceLock::new();
static ATTRIBUTE_REGEX: OnceLock<Regex> = OnceLock::new();

fn regex(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("valid regex pattern"))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attachment {
    /// 1-based position in the description.
    pub index: usize,
    pub filename: String,
    pub content_type: String,
    pub filesize: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    pub download_url: String,
    pub sgid: String,
}

/// Every `<action-text-attachment>` in `html`, in document order.
pub fn parse_attachments(html: &str) -> Vec<Attachment> {
    regex(&ATTACHMENT_REGEX, ATTACHMENT_PATTERN)
        .captures_iter(html)
        .enumerate()
        .map(|(position, captures)| {
            let attrs = captures.get(1).map_or("", |m| m.as_str());
            let content = captures.get(2).map_or("", |m| m.as_str());

            Attachment {
                index: position + 1,
                filename: attribute(attrs, "filename").unwrap_or_default().to_string(),
                content_type: attribute(attrs, "content-type").unwrap_or_default().to_string(),
                filesize: attribute(attrs, "filesize")
                    .and_then(|size| size.parse().ok())
                    .unwrap_or(0),
                width: attribute(attrs, "width").and_then(|w| w.parse().ok()).filter(|w| *w > 0),
                height: attribute(attrs, "height").and_then(|h| h.parse().ok()).filter(|h| *h > 0),
                download_url: download_url(content).unwrap_or_default(),
                sgid: attribute(attrs, "sgid").unwrap_or_default().to_string(),
            }
        })
        .collect()
}

fn attribute<'a>(attrs: &'a str, name: &str) -> Option<&'a str> {
    regex(&ATTRIBUTE_REGEX, ATTRIBUTE_PATTERN)
        .captures_iter(attrs)
        .find(|captures| captures.get(1).is_some_and(|key| key.as_str() == name))
        .and_then(|captures| captures.get(2))
        .map(|value| value.as_str())
}

/// Explicit download link first; otherwise the blob redirect link, forced to
/// download when it carries no query of its own.
fn download_url(content: &str) -> Option<String> {
    if let Some(href) = regex(&DOWNLOAD_HREF_REGEX, DOWNLOAD_HREF_PATTERN)
        .captures(content)
        .and_then(|captures| captures.get(1))
    {
        return Some(href.as_str().to_string());
    }

    regex(&BLOB_REDIRECT_HREF_REGEX, BLOB_REDIRECT_HREF_PATTERN)
        .captures(content)
        .and_then(|captures| captures.get(1))
        .map(|href| {
            let href = href.as_str();
            if href.contains('?') {
                href.to_string()
            } else {
                format!("{href}?disposition=attachment")
            }
        })
}
