//! Capture session lifecycle.
//!
//! A session starts recording on the first frame with a confirmed track and
//! stops for good once no track has been confirmed for longer than the
//! configured silence. Every processed frame's confirmed tracks are logged as
//! observations, ready for merging.

use std::time::{Duration, Instant};

use log::info;

use crate::merge::{BBox, Observation};

/// Session timing configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// How long without a confirmed track before recording stops
    pub silence: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            silence: Duration::from_secs(5),
        }
    }
}

/// Recording state of a capture session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordingState {
    /// Waiting for a detection, or stopped after one
    #[default]
    Idle,
    /// Writing frames
    Recording,
}

/// Transition produced by one observation of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    Unchanged,
    Started,
    Stopped,
}

#[derive(Debug, Clone)]
pub struct RecordingSession {
    config: SessionConfig,
    state: RecordingState,
    last_detected: Option<Instant>,
    finished: bool,
    frame: u64,
    log: Vec<Observation>,
}

impl RecordingSession {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            state: RecordingState::Idle,
            last_detected: None,
            finished: false,
            frame: 0,
            log: Vec::new(),
        }
    }

    pub fn state(&self) -> RecordingState {
        self.state
    }

    pub fn is_recording(&self) -> bool {
        self.state == RecordingState::Recording
    }

    /// Whether recording has stopped. A finished session never restarts.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Index of the next frame to be processed.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Advance the state machine at time `now`.
    pub fn observe(&mut self, now: Instant, detected: bool) -> SessionEvent {
        if self.finished {
            return SessionEvent::Unchanged;
        }

        if detected {
            self.last_detected = Some(now);
            if self.state == RecordingState::Idle {
                self.state = RecordingState::Recording;
                info!("Recording started at frame {}", self.frame);
                return SessionEvent::Started;
            }
        }

        if self.state == RecordingState::Recording
            && let Some(last) = self.last_detected
            && now.saturating_duration_since(last) > self.config.silence
        {
            self.state = RecordingState::Idle;
            self.finished = true;
            info!("Recording stopped at frame {}", self.frame);
            return SessionEvent::Stopped;
        }

        SessionEvent::Unchanged
    }

    /// Process one frame's confirmed tracks.
    ///
    /// Confirmed tracks are logged under the current frame index, which then
    /// advances. The frame that stops the session is not logged, and nothing
    /// is logged once the session has finished.
    pub fn process_frame(&mut self, now: Instant, confirmed: &[(i64, BBox)]) -> SessionEvent {
        if self.finished {
            return SessionEvent::Unchanged;
        }

        let event = self.observe(now, !confirmed.is_empty());
        if event == SessionEvent::Stopped {
            return event;
        }

        let frame = self.frame;
        self.log.extend(
            confirmed
                .iter()
                .map(|&(track_id, bbox)| Observation::new(frame, track_id, bbox)),
        );
        self.frame += 1;
        event
    }

    /// Observations logged so far.
    pub fn observations(&self) -> &[Observation] {
        &self.log
    }

    pub fn into_observations(self) -> Vec<Observation> {
        self.log
    }
}

impl Default for RecordingSession {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}
