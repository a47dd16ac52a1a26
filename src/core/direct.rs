use std::path::{Path, PathBuf};

use async_trait::async_trait;
use futures::StreamExt;
use tokio::io::{AsyncWriteExt, BufWriter};

use crate::core::filename::{ensure_extension, unique_in_dir};
use crate::core::progress;
use crate::core::traits::FileFetcher;
use crate::error::LinkError;

const WRITE_BUFFER: usize = 256 * 1024;

/// Streams arbitrary HTTP resources to disk. One attempt per link; a
/// stream that dies mid-transfer leaves the partial file behind and
/// the error surfaces to the pipeline.
pub struct DirectDownloader {
    client: reqwest::Client,
}

impl DirectDownloader {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl FileFetcher for DirectDownloader {
    async fn fetch(&self, url: &str, name: &str, dest_dir: &Path) -> Result<PathBuf, LinkError> {
        tokio::fs::create_dir_all(dest_dir)
            .await
            .map_err(LinkError::download)?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(LinkError::download)?;

        let status = response.status();
        if !status.is_success() {
            return Err(LinkError::Download(format!("HTTP {} fetching {}", status, url)));
        }

        let total = response.content_length();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        let name = if name.trim().is_empty() { "download" } else { name.trim() };
        let filename = ensure_extension(name, &content_type);
        let filename = unique_in_dir(dest_dir, &filename);
        let path = dest_dir.join(&filename);

        let bar = progress::byte_bar(total, &filename);
        let file = tokio::fs::File::create(&path)
            .await
            .map_err(LinkError::download)?;
        let mut file = BufWriter::with_capacity(WRITE_BUFFER, file);
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(LinkError::download)?;
            file.write_all(&chunk).await.map_err(LinkError::download)?;
            bar.inc(chunk.len() as u64);
        }

        file.flush().await.map_err(LinkError::download)?;
        bar.finish();

        tracing::debug!(path = %path.display(), "direct download complete");
        Ok(path)
    }
}
