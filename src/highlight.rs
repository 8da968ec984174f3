//! Replay of one merged track's center path over the source frames.
//!
//! Decoding the source video and drawing onto frames belong to the caller,
//! which plugs in through [`OverlaySink`].

mod path;
mod replay;

pub use path::{FrameIndex, PathPoint, TrackPath};
pub use replay::{Highlighter, OverlaySink};
