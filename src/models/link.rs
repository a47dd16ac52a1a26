use serde::{Deserialize, Serialize};

/// A resolved (name, url) pair produced from one input line.
/// Immutable once built; consumed by exactly one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkRecord {
    pub name: String,
    pub url: String,
}

impl LinkRecord {
    /// The `name:url` form used in the outcome logs and the final report.
    pub fn log_line(&self) -> String {
        format!("{}:{}", self.name, self.url)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LinkKind {
    Generic,
    YouTubeSingle,
    YouTubePlaylist,
}

impl LinkKind {
    pub fn is_youtube(self) -> bool {
        matches!(self, Self::YouTubeSingle | Self::YouTubePlaylist)
    }

    pub fn is_playlist(self) -> bool {
        self == Self::YouTubePlaylist
    }
}

/// Terminal state of one link's pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Success,
    Failure,
}
