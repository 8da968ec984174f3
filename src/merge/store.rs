//! Observation store: groups raw observations into per-identifier tracks.

use ordered_hash_map::OrderedHashMap;

use crate::merge::observation::Observation;

/// The observations sharing one original identifier, ordered by frame.
#[derive(Debug, Clone)]
pub struct Track {
    /// Original tracker identifier
    pub track_id: i64,
    observations: Vec<Observation>,
}

impl Track {
    fn new(track_id: i64) -> Self {
        Self {
            track_id,
            observations: Vec::new(),
        }
    }

    /// Observations sorted ascending by frame.
    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// Earliest observation. A track always holds at least one.
    pub fn head(&self) -> &Observation {
        &self.observations[0]
    }

    /// Latest observation.
    pub fn tail(&self) -> &Observation {
        &self.observations[self.observations.len() - 1]
    }

    pub fn start_frame(&self) -> u64 {
        self.head().frame
    }

    pub fn end_frame(&self) -> u64 {
        self.tail().frame
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}

/// Tracks keyed by original identifier, iterated in first-appearance order.
#[derive(Debug)]
pub struct TrackSet {
    tracks: OrderedHashMap<i64, Track>,
}

impl TrackSet {
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, track_id: i64) -> Option<&Track> {
        self.tracks.get(&track_id)
    }

    /// Tracks in the order their identifiers first appeared in the input.
    pub fn iter(&self) -> impl Iterator<Item = &Track> {
        self.tracks.keys().filter_map(|id| self.tracks.get(id))
    }

    /// Identifiers in ascending numeric order.
    pub fn ids_ascending(&self) -> Vec<i64> {
        let mut ids = self.tracks.keys().copied().collect::<Vec<_>>();
        ids.sort_unstable();
        ids
    }

    /// Total number of observations across all tracks.
    pub fn observation_count(&self) -> usize {
        self.iter().map(Track::len).sum()
    }
}

/// Group observations by `track_id` and sort each group by frame.
///
/// The sort is stable, so observations sharing a frame keep their input
/// order. Nothing is filtered or deduplicated.
pub fn group_and_sort<I>(observations: I) -> TrackSet
where
    I: IntoIterator<Item = Observation>,
{
    let mut tracks = OrderedHashMap::<i64, Track>::new();
    for obs in observations {
        match tracks.get_mut(&obs.track_id) {
            Some(track) => track.observations.push(obs),
            None => {
                let mut track = Track::new(obs.track_id);
                track.observations.push(obs);
                tracks.insert(obs.track_id, track);
            }
        }
    }

    let ids = tracks.keys().copied().collect::<Vec<_>>();
    for id in ids {
        if let Some(track) = tracks.get_mut(&id) {
            track.observations.sort_by_key(|o| o.frame);
        }
    }

    TrackSet { tracks }
}
