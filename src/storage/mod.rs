pub mod drive;
pub mod local;

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use crate::config::StorageConfig;

/// Destination for finished downloads. One backend instance serves the
/// whole batch.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    fn name(&self) -> &str;

    /// Make sure the destination folder exists.
    async fn ensure_root(&self) -> anyhow::Result<()>;

    /// Copy one local file into the destination under its base name.
    /// Returns the destination path or remote file id. Existing
    /// destination entries are overwritten.
    async fn upload(&self, local_path: &Path) -> anyhow::Result<String>;
}

pub fn from_config(config: &StorageConfig, client: reqwest::Client) -> Arc<dyn StorageBackend> {
    match config {
        StorageConfig::Local { path } => Arc::new(local::LocalFolder::new(path.clone())),
        StorageConfig::Drive {
            folder,
            access_token,
        } => Arc::new(drive::GoogleDrive::new(
            client,
            folder.clone(),
            access_token.clone(),
        )),
    }
}
