//! Error types for track merging.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for the crate.
pub type Result<T> = std::result::Result<T, MergeError>;

/// Errors that can occur while loading, merging or replaying tracks.
#[derive(Error, Debug)]
pub enum MergeError {
    #[error("max_gap must be at least 1 frame, got {0}")]
    InvalidMaxGap(i64),

    #[error("max_dist must be a finite non-negative distance, got {0}")]
    InvalidMaxDist(f64),

    #[error("malformed tracking record: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("failed to encode tracking log: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("track {0} does not appear in the tracking log")]
    UnknownTrack(i64),
}

impl MergeError {
    pub fn io<P: Into<PathBuf>>(path: P, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
