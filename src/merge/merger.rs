//! Greedy anchor-based track merging.
//!
//! Tracks are visited in ascending identifier order. Each unvisited track
//! becomes the anchor of a new bucket and absorbs every other unvisited track
//! that starts shortly after the anchor ends and close to where it ended.
//! Candidates are compared against the anchor's endpoint only, never against
//! a track absorbed earlier into the same bucket, so the result depends on
//! identifier order and is not a transitive chaining.

use std::collections::HashSet;

use log::{debug, info};

use crate::error::{MergeError, Result};
use crate::merge::bbox::BBox;
use crate::merge::observation::Observation;
use crate::merge::store::{Track, TrackSet, group_and_sort};

/// Thresholds deciding whether a track continues another.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MergeConfig {
    /// Largest allowed frame gap between anchor end and candidate start (inclusive)
    pub max_gap: u64,
    /// Center distance a candidate must stay strictly below
    pub max_dist: f64,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            max_gap: 10,
            max_dist: 50.0,
        }
    }
}

impl MergeConfig {
    /// Build a validated configuration from caller-supplied values.
    pub fn new(max_gap: i64, max_dist: f64) -> Result<Self> {
        let max_gap = u64::try_from(max_gap).map_err(|_| MergeError::InvalidMaxGap(max_gap))?;
        let config = Self { max_gap, max_dist };
        config.validate()?;
        Ok(config)
    }

    /// A gap of zero can never be met since candidates must start strictly
    /// after the anchor ends.
    pub fn validate(&self) -> Result<()> {
        if self.max_gap == 0 {
            return Err(MergeError::InvalidMaxGap(0));
        }
        if !self.max_dist.is_finite() || self.max_dist < 0.0 {
            return Err(MergeError::InvalidMaxDist(self.max_dist));
        }
        Ok(())
    }
}

/// Original tracks merged under one output identifier.
#[derive(Debug, Clone)]
pub struct Bucket {
    /// Output identifier, sequential from 1
    pub id: i64,
    /// Original identifier of the anchor track
    pub anchor: i64,
    /// Original identifiers in absorption order, anchor first
    pub members: Vec<i64>,
    observations: Vec<Observation>,
}

impl Bucket {
    fn open(id: i64, anchor: &Track) -> Self {
        Self {
            id,
            anchor: anchor.track_id,
            members: vec![anchor.track_id],
            observations: anchor.observations().to_vec(),
        }
    }

    fn absorb(&mut self, track: &Track) {
        self.members.push(track.track_id);
        self.observations.extend_from_slice(track.observations());
    }

    /// Observations with their original identifiers, anchor's first.
    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }
}

/// Buckets in the order they were opened.
#[derive(Debug, Clone, Default)]
pub struct MergeOutcome {
    buckets: Vec<Bucket>,
}

impl MergeOutcome {
    pub fn buckets(&self) -> &[Bucket] {
        &self.buckets
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Output identifier assigned to an original track identifier.
    pub fn merged_id(&self, original: i64) -> Option<i64> {
        self.buckets
            .iter()
            .find(|b| b.members.contains(&original))
            .map(|b| b.id)
    }

    /// Flatten every bucket into one stream, relabeling each observation
    /// with its bucket's identifier.
    pub fn into_observations(self) -> Vec<Observation> {
        self.buckets
            .into_iter()
            .flat_map(|bucket| {
                let id = bucket.id;
                bucket
                    .observations
                    .into_iter()
                    .map(move |obs| obs.relabeled(id))
            })
            .collect()
    }
}

/// Merges fragmented tracks using fixed gap and distance thresholds.
#[derive(Debug, Clone)]
pub struct TrackMerger {
    config: MergeConfig,
}

impl TrackMerger {
    pub fn new(config: MergeConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &MergeConfig {
        &self.config
    }

    pub fn merge(&self, tracks: &TrackSet) -> MergeOutcome {
        let mut used = HashSet::with_capacity(tracks.len());
        let mut buckets = Vec::new();
        let mut next_id = 1;

        for tid in tracks.ids_ascending() {
            if used.contains(&tid) {
                continue;
            }
            let Some(anchor) = tracks.get(tid) else {
                continue;
            };
            used.insert(tid);

            let last_frame = anchor.end_frame();
            let last_bbox = anchor.tail().bbox;
            let mut bucket = Bucket::open(next_id, anchor);

            for candidate in tracks.iter() {
                if used.contains(&candidate.track_id) {
                    continue;
                }
                if !self.continues(last_frame, &last_bbox, candidate) {
                    continue;
                }
                debug!(
                    "Track {} continues track {} (gap {} frames) -> merged id {}",
                    candidate.track_id,
                    tid,
                    candidate.start_frame() - last_frame,
                    next_id
                );
                bucket.absorb(candidate);
                used.insert(candidate.track_id);
            }

            buckets.push(bucket);
            next_id += 1;
        }

        info!(
            "Merged {} tracks into {} (max_gap={}, max_dist={})",
            tracks.len(),
            buckets.len(),
            self.config.max_gap,
            self.config.max_dist
        );

        MergeOutcome { buckets }
    }

    /// Whether `candidate` may continue an anchor ending at `last_frame`
    /// with box `last_bbox`.
    fn continues(&self, last_frame: u64, last_bbox: &BBox, candidate: &Track) -> bool {
        let start = candidate.start_frame();
        if start <= last_frame {
            return false;
        }
        if start - last_frame > self.config.max_gap {
            return false;
        }
        last_bbox.center_distance(&candidate.head().bbox) < self.config.max_dist
    }
}

/// Group, merge and relabel a raw observation stream in one call.
///
/// Configuration is validated before any observation is touched.
pub fn merge_tracks<I>(observations: I, config: MergeConfig) -> Result<Vec<Observation>>
where
    I: IntoIterator<Item = Observation>,
{
    let merger = TrackMerger::new(config)?;
    let tracks = group_and_sort(observations);
    Ok(merger.merge(&tracks).into_observations())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Track of consecutive frames `start..=end`, box 10x10 at `(x, 0)`.
    fn track(id: i64, start: u64, end: u64, x: i32) -> Vec<Observation> {
        (start..=end)
            .map(|f| Observation::new(f, id, BBox::new(x, 0, x + 10, 10).unwrap()))
            .collect()
    }

    fn merger(max_gap: i64, max_dist: f64) -> TrackMerger {
        TrackMerger::new(MergeConfig::new(max_gap, max_dist).unwrap()).unwrap()
    }

    #[test]
    fn test_config_validation() {
        assert!(MergeConfig::new(10, 50.0).is_ok());
        assert!(MergeConfig::new(1, 0.0).is_ok());
        assert!(matches!(
            MergeConfig::new(-1, 50.0),
            Err(MergeError::InvalidMaxGap(-1))
        ));
        assert!(matches!(
            MergeConfig::new(0, 50.0),
            Err(MergeError::InvalidMaxGap(0))
        ));
        assert!(matches!(
            MergeConfig::new(10, -0.5),
            Err(MergeError::InvalidMaxDist(_))
        ));
        assert!(MergeConfig::new(10, f64::NAN).is_err());
        assert!(MergeConfig::new(10, f64::INFINITY).is_err());
    }

    #[test]
    fn test_merger_rejects_invalid_struct_config() {
        let config = MergeConfig {
            max_gap: 0,
            max_dist: 10.0,
        };
        assert!(TrackMerger::new(config).is_err());
    }

    #[test]
    fn test_gap_boundary() {
        let mut obs = track(1, 0, 5, 100);
        obs.extend(track(2, 15, 20, 100)); // gap == 10
        obs.extend(track(3, 26, 30, 100)); // gap == 21 from anchor 1
        let tracks = group_and_sort(obs);

        let outcome = merger(10, 50.0).merge(&tracks);
        assert_eq!(outcome.merged_id(1), Some(1));
        assert_eq!(outcome.merged_id(2), Some(1));
        assert_eq!(outcome.merged_id(3), Some(2));

        let mut obs = track(1, 0, 5, 100);
        obs.extend(track(2, 16, 20, 100)); // gap == 11
        let outcome = merger(10, 50.0).merge(&group_and_sort(obs));
        assert_eq!(outcome.len(), 2);
    }

    #[test]
    fn test_distance_boundary() {
        // Centers 30 apart
        let mut obs = track(1, 0, 5, 0);
        obs.extend(track(2, 6, 9, 30));

        let outcome = merger(10, 30.0).merge(&group_and_sort(obs.clone()));
        assert_eq!(outcome.len(), 2, "distance equal to max_dist is excluded");

        let outcome = merger(10, 30.000_001).merge(&group_and_sort(obs));
        assert_eq!(outcome.len(), 1);
    }

    #[test]
    fn test_overlapping_candidate_rejected() {
        let mut obs = track(1, 0, 5, 100);
        obs.extend(track(2, 5, 8, 100)); // starts on anchor's last frame
        obs.extend(track(3, 2, 3, 100)); // inside anchor's span
        let outcome = merger(10, 50.0).merge(&group_and_sort(obs));
        assert_eq!(outcome.len(), 3);
    }

    #[test]
    fn test_zero_max_dist_disables_merging() {
        let mut obs = track(1, 0, 5, 100);
        obs.extend(track(2, 6, 8, 100)); // identical center
        let outcome = merger(10, 0.0).merge(&group_and_sort(obs));
        assert_eq!(outcome.len(), 2);
    }

    #[test]
    fn test_star_merge_from_anchor_only() {
        // Known boundary: 3 continues 2's tail, but is measured against
        // anchor 1's tail and is too far in time from it.
        let mut obs = track(1, 0, 5, 100);
        obs.extend(track(2, 10, 20, 100));
        obs.extend(track(3, 25, 30, 100));
        let outcome = merger(10, 50.0).merge(&group_and_sort(obs));

        assert_eq!(outcome.len(), 2);
        assert_eq!(outcome.buckets()[0].members, vec![1, 2]);
        assert_eq!(outcome.buckets()[1].members, vec![3]);
    }

    #[test]
    fn test_anchor_absorbs_multiple_candidates() {
        let mut obs = track(1, 0, 5, 100);
        obs.extend(track(3, 8, 9, 110));
        obs.extend(track(2, 7, 9, 90));
        let outcome = merger(10, 50.0).merge(&group_and_sort(obs));

        assert_eq!(outcome.len(), 1);
        // Candidates are absorbed in first-appearance order
        assert_eq!(outcome.buckets()[0].members, vec![1, 3, 2]);
    }

    #[test]
    fn test_anchors_visited_in_ascending_order() {
        // Track 7 appears first in input but 4 anchors first.
        let mut obs = track(7, 12, 15, 100);
        obs.extend(track(4, 0, 10, 100));
        let outcome = merger(10, 50.0).merge(&group_and_sort(obs));

        assert_eq!(outcome.len(), 1);
        assert_eq!(outcome.buckets()[0].anchor, 4);
        assert_eq!(outcome.buckets()[0].members, vec![4, 7]);
    }

    #[test]
    fn test_flatten_relabels_in_bucket_order() {
        let mut obs = track(5, 0, 1, 100);
        obs.extend(track(9, 100, 101, 100));
        obs.extend(track(6, 3, 4, 100));
        let merged = merge_tracks(obs, MergeConfig::default()).unwrap();

        let labels = merged
            .iter()
            .map(|o| (o.frame, o.track_id))
            .collect::<Vec<_>>();
        assert_eq!(
            labels,
            vec![(0, 1), (1, 1), (3, 1), (4, 1), (100, 2), (101, 2)]
        );
    }

    #[test]
    fn test_empty_input() {
        let merged = merge_tracks(Vec::new(), MergeConfig::default()).unwrap();
        assert!(merged.is_empty());
    }

    #[test]
    fn test_invalid_config_checked_before_merging() {
        let config = MergeConfig {
            max_gap: 10,
            max_dist: -1.0,
        };
        assert!(merge_tracks(track(1, 0, 1, 0), config).is_err());
    }
}
