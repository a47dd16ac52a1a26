use std::path::PathBuf;
use std::sync::Arc;

use crate::core::classifier;
use crate::core::outcome::OutcomeLog;
use crate::core::resolver;
use crate::core::traits::{FileFetcher, FormatChooser, VideoFetcher};
use crate::core::ytdlp::DEFAULT_FORMAT;
use crate::error::LinkError;
use crate::models::link::{LinkKind, LinkRecord, Outcome};
use crate::storage::StorageBackend;

/// Drives one line at a time through resolve → classify → download →
/// upload → record. Every stage error is absorbed here: one bad link
/// never aborts the batch.
pub struct Pipeline {
    download_dir: PathBuf,
    files: Arc<dyn FileFetcher>,
    videos: Arc<dyn VideoFetcher>,
    chooser: Arc<dyn FormatChooser>,
    storage: Arc<dyn StorageBackend>,
    log: OutcomeLog,
    /// Format id resolved from the first YouTube link of the batch and
    /// reused for every later one; at most one prompt per batch.
    format: Option<String>,
}

impl Pipeline {
    pub fn new(
        download_dir: PathBuf,
        files: Arc<dyn FileFetcher>,
        videos: Arc<dyn VideoFetcher>,
        chooser: Arc<dyn FormatChooser>,
        storage: Arc<dyn StorageBackend>,
    ) -> Self {
        let log = OutcomeLog::open(&download_dir);
        Self {
            download_dir,
            files,
            videos,
            chooser,
            storage,
            log,
            format: None,
        }
    }

    pub async fn run_batch(&mut self, lines: &[String]) {
        for line in lines {
            self.process_line(line).await;
        }
    }

    /// One LinkRecord, terminal state Success or Failure, outcome
    /// appended to the log in input order.
    pub async fn process_line(&mut self, line: &str) {
        let record = resolver::parse_line(line);
        tracing::info!(name = %record.name, url = %record.url, "processing link");

        let outcome = match self.run_stages(&record).await {
            Ok(()) => Outcome::Success,
            Err(e) => {
                tracing::warn!(url = %record.url, "link failed: {}", e);
                Outcome::Failure
            }
        };

        if let Err(e) = self.log.record(outcome, &record.log_line()) {
            tracing::warn!("could not append outcome log entry: {}", e);
        }
    }

    async fn run_stages(&mut self, record: &LinkRecord) -> Result<(), LinkError> {
        let kind = classifier::classify(&record.url);

        let paths = match kind {
            LinkKind::Generic => {
                let path = self
                    .files
                    .fetch(&record.url, &record.name, &self.download_dir)
                    .await?;
                vec![path]
            }
            LinkKind::YouTubeSingle | LinkKind::YouTubePlaylist => {
                let format = self.ensure_format(&record.url).await?;
                self.videos
                    .fetch(&record.url, &format, kind.is_playlist(), &self.download_dir)
                    .await?
            }
        };

        if paths.is_empty() {
            return Err(LinkError::Download("no files were downloaded".into()));
        }

        let mut uploaded = 0usize;
        for path in &paths {
            match self.storage.upload(path).await {
                Ok(dest) => {
                    tracing::info!(dest = %dest, "uploaded {}", path.display());
                    uploaded += 1;
                }
                Err(e) => {
                    tracing::warn!("upload of {} failed: {}", path.display(), e);
                }
            }
        }

        if uploaded == 0 {
            return Err(LinkError::Upload("no file reached the destination".into()));
        }

        Ok(())
    }

    /// Resolve the batch-wide format selection, prompting on the first
    /// YouTube link only. An empty choice selects the default
    /// best-video+audio selector.
    async fn ensure_format(&mut self, url: &str) -> Result<String, LinkError> {
        if let Some(format) = &self.format {
            return Ok(format.clone());
        }

        let formats = self.videos.list_formats(url).await?;
        let choice = self
            .chooser
            .choose(&formats)
            .await
            .map_err(LinkError::metadata)?;

        let selection = choice.unwrap_or_else(|| DEFAULT_FORMAT.to_string());
        self.format = Some(selection.clone());
        Ok(selection)
    }

    pub fn outcome_log_mut(&mut self) -> &mut OutcomeLog {
        &mut self.log
    }
}
