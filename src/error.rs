use thiserror::Error;

/// Per-link failure taxonomy. Every stage error is folded into one of
/// these before it reaches the pipeline boundary; nothing propagates
/// past a single link.
#[derive(Debug, Error)]
pub enum LinkError {
    #[error("download failed: {0}")]
    Download(String),

    #[error("upload failed: {0}")]
    Upload(String),

    #[error("metadata extraction failed: {0}")]
    Metadata(String),
}

impl LinkError {
    pub fn download(err: impl std::fmt::Display) -> Self {
        Self::Download(err.to_string())
    }

    pub fn upload(err: impl std::fmt::Display) -> Self {
        Self::Upload(err.to_string())
    }

    pub fn metadata(err: impl std::fmt::Display) -> Self {
        Self::Metadata(err.to_string())
    }
}
