//! Per-frame observation records exchanged with the upstream tracker.

use serde::{Deserialize, Serialize};

use crate::merge::bbox::BBox;

/// One detection of one object in one frame.
///
/// Field order is the serialized order: `frame`, `track_id`, `bbox`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    /// Zero-based frame index
    pub frame: u64,
    /// Tracker-assigned identifier, rewritten by the merger
    pub track_id: i64,
    /// Detection box in pixels
    pub bbox: BBox,
}

impl Observation {
    pub fn new(frame: u64, track_id: i64, bbox: BBox) -> Self {
        Self {
            frame,
            track_id,
            bbox,
        }
    }

    /// Copy of this observation relabeled under `track_id`.
    pub fn relabeled(&self, track_id: i64) -> Self {
        Self { track_id, ..*self }
    }
}
