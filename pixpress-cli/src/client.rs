use anyhow::{Context, Result};
use async_trait::async_trait;
use pixpress_controller::{
    CompressApi, CompressParams, CompressReply, CompressResponse, FileMeta, TransportError,
    COMPRESS_PATH, FIELD_IMAGE,
};
use reqwest::multipart;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs as async_fs;

pub fn build_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .context("Failed to create HTTP client")
}

/// `/api/compress` over HTTP with reqwest.
#[derive(Clone)]
pub struct HttpCompressApi {
    client: reqwest::Client,
    server: String,
    timeout: Duration,
}

impl HttpCompressApi {
    pub fn new(client: reqwest::Client, server: &str, timeout: Duration) -> Self {
        Self {
            client,
            server: server.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    pub fn server(&self) -> &str {
        &self.server
    }

    /// Absolute form of a download URL the server may have returned relative.
    pub fn resolve_url(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else if url.starts_with('/') {
            format!("{}{}", self.server, url)
        } else {
            format!("{}/{}", self.server, url)
        }
    }

    fn transport_error(&self, err: reqwest::Error) -> TransportError {
        if err.is_timeout() {
            TransportError::Timeout(self.timeout)
        } else {
            TransportError::Network(err.to_string())
        }
    }

    /// Fetch the compressed file. A directory target keeps the server's file name.
    pub async fn download(&self, url: &str, target: &Path, filename: &str) -> Result<PathBuf> {
        let url = self.resolve_url(url);
        let is_dir = async_fs::metadata(target)
            .await
            .map(|metadata| metadata.is_dir())
            .unwrap_or(false);
        let target = if is_dir {
            // Only the last path component of the server-provided name
            let name = Path::new(filename)
                .file_name()
                .map(|name| name.to_os_string())
                .unwrap_or_else(|| "compressed".into());
            target.join(name)
        } else {
            target.to_path_buf()
        };

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Failed to download {}", url))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(anyhow::anyhow!(
                "Download failed with status {}: {}",
                status,
                error_text
            ));
        }

        let bytes = response
            .bytes()
            .await
            .context("Failed to read download body")?;

        async_fs::write(&target, &bytes)
            .await
            .with_context(|| format!("Failed to write {}", target.display()))?;

        tracing::info!("Saved {} bytes to {}", bytes.len(), target.display());
        Ok(target)
    }
}

#[async_trait(?Send)]
impl CompressApi for HttpCompressApi {
    type Payload = Vec<u8>;

    async fn compress(
        &self,
        file: &FileMeta,
        payload: &Vec<u8>,
        params: &CompressParams,
    ) -> Result<CompressReply, TransportError> {
        let image = multipart::Part::bytes(payload.clone())
            .file_name(file.name.clone())
            .mime_str(&file.mime_type)
            .map_err(|e| TransportError::Request(format!("Invalid MIME type: {}", e)))?;

        let mut form = multipart::Form::new().part(FIELD_IMAGE, image);
        for (name, value) in params.form_fields() {
            form = form.text(name, value);
        }

        let url = format!("{}{}", self.server, COMPRESS_PATH);
        tracing::debug!("POST {} ({} bytes)", url, payload.len());

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status().as_u16();
        let body: CompressResponse = response
            .json()
            .await
            .map_err(|e| TransportError::InvalidBody(e.to_string()))?;

        Ok(CompressReply { status, body })
    }
}
