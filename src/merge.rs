mod bbox;
mod merger;
mod observation;
mod store;

pub use bbox::BBox;
pub use merger::{Bucket, MergeConfig, MergeOutcome, TrackMerger, merge_tracks};
pub use observation::Observation;
pub use store::{Track, TrackSet, group_and_sort};
