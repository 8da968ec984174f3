//! Track fragment merging for multi-object tracking logs.
//!
//! Trackers lose objects behind occlusions and hand out a fresh identifier
//! when they reappear. This crate takes the per-frame observations such a
//! tracker produced and relabels fragments of the same object under one
//! stable identifier.
//!
//! ```rust,ignore
//! use track_merge::{MergeConfig, merge_tracks, tracking_log};
//!
//! let observations = tracking_log::read_observations("recordings/session.json")?;
//! let merged = merge_tracks(observations, MergeConfig::default())?;
//! tracking_log::write_observations("recordings/session_merged.json", &merged)?;
//! ```

pub mod error;
pub mod highlight;
pub mod merge;
pub mod output;
pub mod recording;
pub mod tracking_log;

pub use error::{MergeError, Result};
pub use merge::{
    BBox, Bucket, MergeConfig, MergeOutcome, Observation, Track, TrackMerger, TrackSet,
    group_and_sort, merge_tracks,
};
