use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::core::filename::{sanitize_component, unique_stem, VIDEO_EXTENSIONS};
use crate::core::traits::VideoFetcher;
use crate::core::ytdlp::{self, PlaylistEntry};
use crate::error::LinkError;
use crate::models::media::FormatInfo;

/// Downloads single videos and playlists through the yt-dlp
/// executable, resolved lazily so generic-only batches never touch it.
/// Playlist entries are best-effort: a failed entry is logged and
/// skipped, never fatal for the link.
pub struct YoutubeDownloader {
    ytdlp: tokio::sync::OnceCell<PathBuf>,
}

impl Default for YoutubeDownloader {
    fn default() -> Self {
        Self::new()
    }
}

impl YoutubeDownloader {
    pub fn new() -> Self {
        Self {
            ytdlp: tokio::sync::OnceCell::new(),
        }
    }

    async fn binary(&self) -> anyhow::Result<&Path> {
        let path = self.ytdlp.get_or_try_init(ytdlp::ensure_ytdlp).await?;
        Ok(path.as_path())
    }

    async fn enumerate(&self, url: &str, playlist: bool) -> Result<Vec<PlaylistEntry>, LinkError> {
        let bin = self.binary().await.map_err(LinkError::metadata)?;

        if playlist {
            return ytdlp::playlist_entries(bin, url)
                .await
                .map_err(LinkError::metadata);
        }

        let json = ytdlp::video_info(bin, url)
            .await
            .map_err(LinkError::metadata)?;
        let title = json
            .get("title")
            .and_then(|v| v.as_str())
            .unwrap_or("unknown")
            .to_string();
        let entry_url = json
            .get("webpage_url")
            .and_then(|v| v.as_str())
            .unwrap_or(url)
            .to_string();

        Ok(vec![PlaylistEntry {
            title,
            url: entry_url,
        }])
    }
}

#[async_trait]
impl VideoFetcher for YoutubeDownloader {
    async fn list_formats(&self, url: &str) -> Result<Vec<FormatInfo>, LinkError> {
        let bin = self.binary().await.map_err(LinkError::metadata)?;
        let json = ytdlp::video_info(bin, url)
            .await
            .map_err(LinkError::metadata)?;
        Ok(ytdlp::parse_formats(&json))
    }

    async fn fetch(
        &self,
        url: &str,
        format: &str,
        playlist: bool,
        dest_dir: &Path,
    ) -> Result<Vec<PathBuf>, LinkError> {
        tokio::fs::create_dir_all(dest_dir)
            .await
            .map_err(LinkError::download)?;

        let bin = self.binary().await.map_err(LinkError::download)?.to_path_buf();
        let entries = self.enumerate(url, playlist).await?;
        let mut paths = Vec::new();

        for (idx, entry) in entries.iter().enumerate() {
            let stem = entry_stem(dest_dir, playlist, idx, &entry.title);
            let template = dest_dir.join(format!("{}.%(ext)s", stem));

            match ytdlp::download_entry(&bin, &entry.url, format, &template, &stem).await {
                Ok(()) => match probe_output(dest_dir, &stem) {
                    Some(path) => paths.push(path),
                    None => {
                        tracing::warn!(stem = %stem, "no output file found for downloaded entry");
                    }
                },
                Err(e) => {
                    tracing::warn!("entry {} ({}) failed: {}", idx + 1, entry.title, e);
                }
            }
        }

        Ok(paths)
    }
}

/// Collision-avoided output stem: playlist entries carry a two-digit
/// ordinal prefix in enumeration order, single videos none.
fn entry_stem(dest_dir: &Path, playlist: bool, index: usize, title: &str) -> String {
    let prefix = ordinal_prefix(playlist, index);
    let title = sanitize_component(title);
    let title = if title.is_empty() {
        format!("video_{}", index + 1)
    } else {
        title
    };
    unique_stem(dest_dir, &format!("{}{}", prefix, title), VIDEO_EXTENSIONS)
}

fn ordinal_prefix(playlist: bool, index: usize) -> String {
    if playlist {
        format!("{:02}_", index + 1)
    } else {
        String::new()
    }
}

/// The engine chose the container, so recover the final path by
/// probing the known extension set in order.
fn probe_output(dir: &Path, stem: &str) -> Option<PathBuf> {
    VIDEO_EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("{}.{}", stem, ext)))
        .find(|candidate| candidate.exists())
}
