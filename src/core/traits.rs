use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::LinkError;
use crate::models::media::FormatInfo;

/// Generic HTTP fetch: stream one URL into `dest_dir` under a
/// collision-avoided variant of `name`. Returns the final local path.
#[async_trait]
pub trait FileFetcher: Send + Sync {
    async fn fetch(&self, url: &str, name: &str, dest_dir: &Path) -> Result<PathBuf, LinkError>;
}

/// YouTube-style fetch through an extraction engine.
#[async_trait]
pub trait VideoFetcher: Send + Sync {
    /// Metadata-only probe listing the video-capable formats of `url`.
    async fn list_formats(&self, url: &str) -> Result<Vec<FormatInfo>, LinkError>;

    /// Download every entry behind `url` (one for a direct video, many
    /// for a playlist) using the given format selector. Entries that
    /// fail are skipped; the ordered recovered paths are returned.
    async fn fetch(
        &self,
        url: &str,
        format: &str,
        playlist: bool,
        dest_dir: &Path,
    ) -> Result<Vec<PathBuf>, LinkError>;
}

/// Human (or test double) picking a format id from the probe table.
/// `None` means "use the default selector".
#[async_trait]
pub trait FormatChooser: Send + Sync {
    async fn choose(&self, formats: &[FormatInfo]) -> anyhow::Result<Option<String>>;
}
