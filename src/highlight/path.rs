//! Per-frame lookup and center-point path geometry.

use std::collections::BTreeMap;

use nalgebra::Point2;
use serde::Serialize;

use crate::merge::Observation;

/// Observations grouped by frame, each group in input order.
#[derive(Debug, Clone, Default)]
pub struct FrameIndex {
    frames: BTreeMap<u64, Vec<Observation>>,
}

impl FrameIndex {
    pub fn build(observations: &[Observation]) -> Self {
        let mut frames = BTreeMap::<u64, Vec<Observation>>::new();
        for obs in observations {
            frames.entry(obs.frame).or_default().push(*obs);
        }
        Self { frames }
    }

    /// Observations recorded at `frame`; empty when nothing was detected.
    pub fn at(&self, frame: u64) -> &[Observation] {
        self.frames.get(&frame).map(Vec::as_slice).unwrap_or(&[])
    }

    /// First observation of `track_id` at `frame`.
    pub fn find(&self, frame: u64, track_id: i64) -> Option<&Observation> {
        self.at(frame).iter().find(|o| o.track_id == track_id)
    }

    pub fn contains_track(&self, track_id: i64) -> bool {
        self.frames
            .values()
            .flatten()
            .any(|o| o.track_id == track_id)
    }

    /// One past the last frame with any observation.
    pub fn frame_span(&self) -> u64 {
        self.frames.keys().next_back().map_or(0, |f| f + 1)
    }

    /// Frames that have observations, ascending.
    pub fn frames(&self) -> impl Iterator<Item = u64> + '_ {
        self.frames.keys().copied()
    }
}

/// A path vertex: the pixel center of a track's box in one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PathPoint {
    pub frame: u64,
    pub x: i32,
    pub y: i32,
}

impl PathPoint {
    pub fn from_observation(obs: &Observation) -> Self {
        let c = obs.bbox.pixel_center();
        Self {
            frame: obs.frame,
            x: c.x,
            y: c.y,
        }
    }

    pub fn point(&self) -> Point2<i32> {
        Point2::new(self.x, self.y)
    }
}

/// Ordered center points of one track, at most one per frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TrackPath {
    pub track_id: i64,
    pub points: Vec<PathPoint>,
}

impl TrackPath {
    pub fn new(track_id: i64) -> Self {
        Self {
            track_id,
            points: Vec::new(),
        }
    }

    /// Collect the path of `track_id`, taking the first record per frame.
    pub fn collect(index: &FrameIndex, track_id: i64) -> Self {
        let points = index
            .frames()
            .filter_map(|frame| index.find(frame, track_id))
            .map(PathPoint::from_observation)
            .collect();
        Self { track_id, points }
    }

    pub fn push(&mut self, point: PathPoint) {
        self.points.push(point);
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Consecutive vertex pairs, the line segments to draw.
    pub fn segments(&self) -> impl Iterator<Item = (Point2<i32>, Point2<i32>)> + '_ {
        self.points.windows(2).map(|w| (w[0].point(), w[1].point()))
    }

    /// Total polyline length in pixels.
    pub fn length(&self) -> f64 {
        self.segments()
            .map(|(a, b)| nalgebra::distance(&a.cast::<f64>(), &b.cast::<f64>()))
            .sum()
    }
}
