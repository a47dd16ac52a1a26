use std::path::{Path, PathBuf};

use anyhow::anyhow;
use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use crate::core::progress;
use crate::storage::StorageBackend;

const COPY_CHUNK: usize = 64 * 1024;

/// Local-folder destination: a plain chunked copy under the configured
/// root. No atomic rename; a partially copied file is visible
/// mid-transfer.
pub struct LocalFolder {
    root: PathBuf,
}

impl LocalFolder {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }
}

#[async_trait]
impl StorageBackend for LocalFolder {
    fn name(&self) -> &str {
        "local"
    }

    async fn ensure_root(&self) -> anyhow::Result<()> {
        tokio::fs::create_dir_all(&self.root).await?;
        Ok(())
    }

    async fn upload(&self, local_path: &Path) -> anyhow::Result<String> {
        self.ensure_root().await?;

        let file_name = local_path
            .file_name()
            .ok_or_else(|| anyhow!("source path has no file name: {}", local_path.display()))?;
        let target = self.root.join(file_name);

        let total = tokio::fs::metadata(local_path).await?.len();
        let bar = progress::byte_bar(Some(total), &format!("uploading {}", file_name.to_string_lossy()));

        let mut src = tokio::fs::File::open(local_path).await?;
        let mut dst = tokio::fs::File::create(&target).await?;
        let mut buf = vec![0u8; COPY_CHUNK];

        loop {
            let n = src.read(&mut buf).await?;
            if n == 0 {
                break;
            }
            dst.write_all(&buf[..n]).await?;
            bar.inc(n as u64);
        }

        dst.flush().await?;
        bar.finish();

        Ok(target.display().to_string())
    }
}
