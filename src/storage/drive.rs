use std::path::Path;

use anyhow::{anyhow, bail};
use async_trait::async_trait;
use futures::StreamExt;
use tokio_util::io::ReaderStream;

use crate::core::progress;
use crate::storage::StorageBackend;

const FILES_URL: &str = "https://www.googleapis.com/drive/v3/files";
const UPLOAD_URL: &str = "https://www.googleapis.com/upload/drive/v3/files?uploadType=resumable";
const FOLDER_MIME: &str = "application/vnd.google-apps.folder";

/// Google Drive destination. Files land in a named folder under the
/// Drive root; uploads use the two-step resumable protocol (initiate
/// for a session URI, then PUT the streamed bytes).
pub struct GoogleDrive {
    client: reqwest::Client,
    folder_name: String,
    access_token: String,
    folder_id: tokio::sync::OnceCell<String>,
}

impl GoogleDrive {
    pub fn new(client: reqwest::Client, folder_name: String, access_token: String) -> Self {
        Self {
            client,
            folder_name,
            access_token,
            folder_id: tokio::sync::OnceCell::new(),
        }
    }

    /// Folder id for the configured destination, resolved once per
    /// backend instance: looked up by name, created when absent.
    async fn folder_id(&self) -> anyhow::Result<&str> {
        let id = self
            .folder_id
            .get_or_try_init(|| async {
                if self.access_token.is_empty() {
                    bail!("no Drive access token configured (set DRIVEGET_DRIVE_TOKEN)");
                }
                match self.find_folder().await? {
                    Some(id) => Ok::<_, anyhow::Error>(id),
                    None => self.create_folder().await,
                }
            })
            .await?;
        Ok(id)
    }

    async fn find_folder(&self) -> anyhow::Result<Option<String>> {
        let response = self
            .client
            .get(FILES_URL)
            .bearer_auth(&self.access_token)
            .query(&[
                ("q", folder_query(&self.folder_name).as_str()),
                ("fields", "files(id)"),
                ("pageSize", "1"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            bail!("Drive folder lookup failed: HTTP {}", response.status());
        }

        let json: serde_json::Value = response.json().await?;
        Ok(json
            .get("files")
            .and_then(|v| v.as_array())
            .and_then(|files| files.first())
            .and_then(|f| f.get("id"))
            .and_then(|v| v.as_str())
            .map(|s| s.to_string()))
    }

    async fn create_folder(&self) -> anyhow::Result<String> {
        let body = serde_json::json!({
            "name": self.folder_name,
            "mimeType": FOLDER_MIME,
        });

        let response = self
            .client
            .post(FILES_URL)
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            bail!("Drive folder creation failed: HTTP {}", response.status());
        }

        let json: serde_json::Value = response.json().await?;
        json.get("id")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
            .ok_or_else(|| anyhow!("Drive folder creation returned no id"))
    }
}

#[async_trait]
impl StorageBackend for GoogleDrive {
    fn name(&self) -> &str {
        "drive"
    }

    async fn ensure_root(&self) -> anyhow::Result<()> {
        self.folder_id().await?;
        Ok(())
    }

    async fn upload(&self, local_path: &Path) -> anyhow::Result<String> {
        let folder_id = self.folder_id().await?.to_string();

        let file_name = local_path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| anyhow!("source path has no file name: {}", local_path.display()))?
            .to_string();
        let size = tokio::fs::metadata(local_path).await?.len();

        let metadata = serde_json::json!({
            "name": file_name,
            "parents": [folder_id],
        });

        let initiate = self
            .client
            .post(UPLOAD_URL)
            .bearer_auth(&self.access_token)
            .header("X-Upload-Content-Length", size)
            .json(&metadata)
            .send()
            .await?;

        if !initiate.status().is_success() {
            bail!("Drive upload initiation failed: HTTP {}", initiate.status());
        }

        let session_uri = initiate
            .headers()
            .get(reqwest::header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string())
            .ok_or_else(|| anyhow!("no Location header in upload-initiation response"))?;

        let file = tokio::fs::File::open(local_path).await?;
        let bar = progress::byte_bar(Some(size), &format!("uploading {}", file_name));
        let progress_bar = bar.clone();
        let stream = ReaderStream::new(file).inspect(move |chunk| {
            if let Ok(chunk) = chunk {
                progress_bar.inc(chunk.len() as u64);
            }
        });

        let response = self
            .client
            .put(&session_uri)
            .bearer_auth(&self.access_token)
            .header(reqwest::header::CONTENT_LENGTH, size)
            .body(reqwest::Body::wrap_stream(stream))
            .send()
            .await?;

        if !response.status().is_success() {
            bar.abandon();
            bail!("Drive upload failed: HTTP {}", response.status());
        }
        bar.finish();

        let json: serde_json::Value = response.json().await?;
        json.get("id")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
            .ok_or_else(|| anyhow!("Drive upload response carried no file id"))
    }
}

/// `files.list` query matching the destination folder by exact name.
fn folder_query(name: &str) -> String {
    format!(
        "name = '{}' and mimeType = '{}' and trashed = false",
        name.replace('\\', "\\\\").replace('\'', "\\'"),
        FOLDER_MIME
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_matches_name_and_mime() {
        let q = folder_query("Backups");
        assert!(q.contains("name = 'Backups'"));
        assert!(q.contains(FOLDER_MIME));
        assert!(q.contains("trashed = false"));
    }

    #[test]
    fn query_escapes_quotes() {
        let q = folder_query("it's");
        assert!(q.contains(r"name = 'it\'s'"));
    }
}
