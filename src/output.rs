//! Naming conventions for files produced around a capture session.

use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// `<dir>/<stem>_merged.json` next to a tracking log.
pub fn merged_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    input.with_file_name(format!("{stem}_merged.json"))
}

/// Video and tracking log paths for one recording session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionPaths {
    pub video: PathBuf,
    pub tracking_log: PathBuf,
}

impl SessionPaths {
    pub fn new<Tz: TimeZone>(dir: &Path, started: &DateTime<Tz>) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        let video = dir.join(format!(
            "intruders_{}.mp4",
            started.format(TIMESTAMP_FORMAT)
        ));
        let tracking_log = video.with_extension("json");
        Self {
            video,
            tracking_log,
        }
    }

    /// Where the merged tracking log for this session goes.
    pub fn merged_log(&self) -> PathBuf {
        merged_path(&self.tracking_log)
    }
}

/// Output video path for a highlighted track.
pub fn highlight_path<Tz: TimeZone>(dir: &Path, track_id: i64, at: &DateTime<Tz>) -> PathBuf
where
    Tz::Offset: std::fmt::Display,
{
    dir.join(format!(
        "highlighted_{}_{}.mp4",
        track_id,
        at.format(TIMESTAMP_FORMAT)
    ))
}
