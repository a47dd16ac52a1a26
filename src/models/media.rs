use serde::{Deserialize, Serialize};

/// One row of the yt-dlp format table, as surfaced to the format
/// chooser. Only video-capable formats (`vcodec != "none"`) make it
/// this far.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatInfo {
    pub format_id: String,
    pub ext: String,
    pub format_note: Option<String>,
    pub filesize: Option<u64>,
}

impl FormatInfo {
    /// Rendering used by the interactive chooser table.
    pub fn describe(&self) -> String {
        format!(
            "{} - {} - {} - {} bytes",
            self.format_id,
            self.ext,
            self.format_note.as_deref().unwrap_or("?"),
            self.filesize.unwrap_or(0),
        )
    }
}
