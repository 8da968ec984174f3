//! Highlighter for combining a merged tracking log with a frame renderer.

use log::info;

use crate::error::{MergeError, Result};
use crate::highlight::path::{FrameIndex, PathPoint, TrackPath};
use crate::merge::Observation;

/// Receives one call per source frame during a replay.
///
/// Implement this to draw the highlighted path onto decoded video frames
/// and encode the result.
///
/// # Example
///
/// ```ignore
/// use track_merge::highlight::{OverlaySink, TrackPath};
///
/// struct VideoOverlay { /* decoder, encoder */ }
///
/// impl OverlaySink for VideoOverlay {
///     type Error = std::io::Error;
///
///     fn write_frame(&mut self, frame: u64, path: Option<&TrackPath>) -> Result<(), Self::Error> {
///         // Draw `path.segments()` in red when present, then encode
///         Ok(())
///     }
/// }
/// ```
pub trait OverlaySink {
    /// Error type for rendering failures.
    type Error;

    /// Handle source frame `frame`.
    ///
    /// `path` holds every point accumulated so far when the track is present
    /// in this frame, and is `None` when it is not.
    fn write_frame(
        &mut self,
        frame: u64,
        path: Option<&TrackPath>,
    ) -> std::result::Result<(), Self::Error>;
}

/// Replays one merged track identifier frame by frame into an [`OverlaySink`].
pub struct Highlighter<S: OverlaySink> {
    sink: S,
    index: FrameIndex,
    track_id: i64,
}

impl<S: OverlaySink> Highlighter<S> {
    /// Create a highlighter for `track_id`, which must appear in `observations`.
    pub fn new(sink: S, observations: &[Observation], track_id: i64) -> Result<Self> {
        let index = FrameIndex::build(observations);
        if !index.contains_track(track_id) {
            return Err(MergeError::UnknownTrack(track_id));
        }
        Ok(Self {
            sink,
            index,
            track_id,
        })
    }

    pub fn track_id(&self) -> i64 {
        self.track_id
    }

    /// Replay frames `0..total_frames` and return the full path drawn.
    ///
    /// `total_frames` comes from the source video; frames past the end of the
    /// tracking log are passed through without overlay.
    pub fn run(&mut self, total_frames: u64) -> std::result::Result<TrackPath, S::Error> {
        let mut path = TrackPath::new(self.track_id);
        for frame in 0..total_frames {
            match self.index.find(frame, self.track_id) {
                Some(obs) => {
                    path.push(PathPoint::from_observation(obs));
                    self.sink.write_frame(frame, Some(&path))?;
                }
                None => self.sink.write_frame(frame, None)?,
            }
        }
        info!(
            "Highlighted track {} over {} frames ({} points)",
            self.track_id,
            total_frames,
            path.len()
        );
        Ok(path)
    }

    /// Get a reference to the underlying sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Get a mutable reference to the underlying sink.
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::BBox;

    #[derive(Default)]
    struct RecordingSink {
        frames: Vec<(u64, Option<usize>)>,
    }

    impl OverlaySink for RecordingSink {
        type Error = std::convert::Infallible;

        fn write_frame(
            &mut self,
            frame: u64,
            path: Option<&TrackPath>,
        ) -> std::result::Result<(), Self::Error> {
            self.frames.push((frame, path.map(TrackPath::len)));
            Ok(())
        }
    }

    struct FailingSink;

    impl OverlaySink for FailingSink {
        type Error = String;

        fn write_frame(
            &mut self,
            frame: u64,
            _path: Option<&TrackPath>,
        ) -> std::result::Result<(), Self::Error> {
            Err(format!("encoder closed at frame {frame}"))
        }
    }

    fn obs(frame: u64, track_id: i64, x: i32) -> Observation {
        Observation::new(frame, track_id, BBox::new(x, 0, x + 10, 10).unwrap())
    }

    #[test]
    fn test_replay_accumulates_path() {
        let observations = [obs(0, 1, 0), obs(1, 2, 50), obs(2, 1, 4), obs(3, 1, 8)];
        let mut highlighter =
            Highlighter::new(RecordingSink::default(), &observations, 1).unwrap();
        let path = highlighter.run(5).unwrap();

        assert_eq!(path.len(), 3);
        assert_eq!(
            highlighter.sink().frames,
            vec![(0, Some(1)), (1, None), (2, Some(2)), (3, Some(3)), (4, None)]
        );
    }

    #[test]
    fn test_unknown_track() {
        let observations = [obs(0, 1, 0)];
        assert!(matches!(
            Highlighter::new(RecordingSink::default(), &observations, 7),
            Err(MergeError::UnknownTrack(7))
        ));
    }

    #[test]
    fn test_sink_error_propagates() {
        let observations = [obs(0, 1, 0)];
        let mut highlighter = Highlighter::new(FailingSink, &observations, 1).unwrap();
        assert_eq!(
            highlighter.run(3).unwrap_err(),
            "encoder closed at frame 0".to_string()
        );
    }
}
