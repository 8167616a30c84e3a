use super::{ApiResponse, FizzyClient, status_text};
use crate::error::FizzyError;
use crate::json_fields::{get_object, get_str};

use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use log::{debug, info};
use reqwest::multipart::{Form, Part};
use serde_json::{Value, json};

/// Blob registration endpoint of the direct-upload handshake.
pub const DIRECT_UPLOADS_PATH: &str = "/rails/active_storage/direct_uploads";

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

const CONTENT_TYPES: &[(&str, &str)] = &[
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("svg", "image/svg+xml"),
    ("pdf", "application/pdf"),
    ("txt", "text/plain"),
    ("html", "text/html"),
    ("json", "application/json"),
    ("xml", "application/xml"),
    ("zip", "application/zip"),
];

/// What the blob registration call needs to know about a local file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadDescriptor {
    pub path: PathBuf,
    pub filename: String,
    pub byte_size: u64,
    pub content_type: String,
    pub checksum: String,
}

impl UploadDescriptor {
    pub fn from_bytes(path: &Path, content: &[u8]) -> Self {
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            path: path.to_path_buf(),
            filename,
            byte_size: content.len() as u64,
            content_type: detect_content_type(path).to_string(),
            checksum: compute_checksum(content),
        }
    }

    fn blob_request(&self) -> Value {
        json!({
            "blob": {
                "filename": self.filename,
                "byte_size": self.byte_size,
                "content_type": self.content_type,
                "checksum": self.checksum,
            }
        })
    }
}

/// Base64 of the MD5 digest, the integrity check the blob service expects.
pub fn compute_checksum(content: &[u8]) -> String {
    let digest = md5::compute(content);
    BASE64.encode(digest.0)
}

/// MIME type from the file extension; unknown extensions are generic binary.
pub fn detect_content_type(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    CONTENT_TYPES
        .iter()
        .find(|(known, _)| *known == extension)
        .map(|(_, content_type)| *content_type)
        .unwrap_or(DEFAULT_CONTENT_TYPE)
}

async fn read_local_file(path: &Path) -> Result<Vec<u8>, FizzyError> {
    tokio::fs::read(path)
        .await
        .map_err(|e| FizzyError::general(format!("Failed to read file {}: {e}", path.display())))
}

impl FizzyClient {
    /// Two-phase direct upload. Returns `{"signed_id": ...}` as data.
    ///
    /// Phase one registers the blob with the API and receives a storage URL,
    /// the headers to send there, and the signed id. Phase two PUTs the raw
    /// bytes to that URL with exactly those headers and no credentials.
    pub async fn upload_file(&self, file_path: &Path) -> Result<ApiResponse, FizzyError> {
        let content = read_local_file(file_path).await?;
        let descriptor = UploadDescriptor::from_bytes(file_path, &content);

        debug!(
            "Registering blob {} ({} bytes, {})",
            descriptor.filename, descriptor.byte_size, descriptor.content_type
        );

        let created = self
            .post(DIRECT_UPLOADS_PATH, Some(&descriptor.blob_request()))
            .await?;

        let blob = match created.data.as_ref() {
            Some(data @ Value::Object(_)) => data,
            _ => return Err(FizzyError::general("Invalid blob creation response")),
        };
        let direct_upload = get_object(blob, "direct_upload")
            .ok_or_else(|| FizzyError::general("Missing direct_upload in response"))?;
        let upload_url = direct_upload
            .get("url")
            .and_then(Value::as_str)
            .ok_or_else(|| FizzyError::general("Missing upload URL in response"))?;
        let signed_id = get_str(blob, "signed_id")
            .ok_or_else(|| FizzyError::general("Missing signed_id in response"))?;

        let mut request = self.client.put(upload_url).body(content);
        if let Some(Value::Object(headers)) = direct_upload.get("headers") {
            for (name, value) in headers {
                if let Some(value) = value.as_str() {
                    request = request.header(name.as_str(), value);
                }
            }
        }

        info!("> PUT {upload_url}");

        let response = request
            .send()
            .await
            .map_err(|e| FizzyError::network(format!("Upload failed: {e}")))?;

        let status = response.status();
        info!("< {} {}", status.as_u16(), status_text(status));

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FizzyError::general(format!(
                "Upload failed: {} {body}",
                status.as_u16()
            )));
        }

        Ok(ApiResponse {
            status: 200,
            data: Some(json!({ "signed_id": signed_id })),
            ..ApiResponse::default()
        })
    }

    /// Single multipart POST carrying the file under `field_name` plus any
    /// extra form fields.
    pub async fn upload_file_multipart(
        &self,
        path: &str,
        field_name: &str,
        file_path: &Path,
        extra_fields: &[(String, String)],
    ) -> Result<ApiResponse, FizzyError> {
        let content = read_local_file(file_path).await?;
        let descriptor = UploadDescriptor::from_bytes(file_path, &content);

        let part = Part::bytes(content)
            .file_name(descriptor.filename.clone())
            .mime_str(&descriptor.content_type)
            .map_err(|e| FizzyError::general(format!("Failed to create form file: {e}")))?;

        let mut form = Form::new().part(field_name.to_string(), part);
        for (name, value) in extra_fields {
            form = form.text(name.clone(), value.clone());
        }

        let request_url = self.build_url(path);
        info!("> POST {request_url}");

        let response = self
            .prepare_request(self.client.post(&request_url))
            .multipart(form)
            .send()
            .await
            .map_err(|e| FizzyError::network(format!("Request failed: {e}")))?;

        self.finish(response).await
    }
}
