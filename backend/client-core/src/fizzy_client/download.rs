use super::{FizzyClient, status_text};
use crate::error::FizzyError;

use std::path::Path;

use log::info;

impl FizzyClient {
    /// Authenticated GET of a file, written to `destination`.
    ///
    /// Redirects are followed. The destination is only created once a
    /// successful body has been read in full.
    pub async fn download_file(&self, url: &str, destination: &Path) -> Result<(), FizzyError> {
        let request_url = self.build_url(url);
        info!("> GET {request_url}");

        let response = self
            .prepare_request(self.client.get(&request_url))
            .send()
            .await
            .map_err(|e| FizzyError::network(format!("Download failed: {e}")))?;

        let status = response.status();
        info!("< {} {}", status.as_u16(), status_text(status));

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FizzyError::general(format!(
                "Download failed: {} {body}",
                status.as_u16()
            )));
        }

        let content = response
            .bytes()
            .await
            .map_err(|e| FizzyError::network(format!("Failed to read download: {e}")))?;

        tokio::fs::write(destination, &content).await.map_err(|e| {
            FizzyError::general(format!(
                "Failed to write file {}: {e}",
                destination.display()
            ))
        })
    }
}
