//! JSON persistence for observation streams.
//!
//! A tracking log is a JSON array of `{"frame", "track_id", "bbox"}` objects.
//! A single malformed record fails the whole load.

use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::error::{MergeError, Result};
use crate::merge::{MergeConfig, Observation, TrackMerger, group_and_sort};
use crate::output::merged_path;

/// Parse a tracking log. Blank input is an empty log.
pub fn parse_observations(text: &str) -> Result<Vec<Observation>> {
    let observations: Vec<Observation> = if text.trim().is_empty() {
        Vec::new()
    } else {
        serde_json::from_str(text)?
    };
    if observations.is_empty() {
        warn!("Tracking log is empty");
    }
    Ok(observations)
}

/// Render observations as indented JSON with a trailing newline.
pub fn to_json(observations: &[Observation]) -> Result<String> {
    let mut json = serde_json::to_string_pretty(observations).map_err(MergeError::Encode)?;
    json.push('\n');
    Ok(json)
}

pub fn read_observations<P: AsRef<Path>>(path: P) -> Result<Vec<Observation>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| MergeError::io(path, e))?;
    parse_observations(&text)
}

pub fn write_observations<P: AsRef<Path>>(path: P, observations: &[Observation]) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, to_json(observations)?).map_err(|e| MergeError::io(path, e))
}

/// Merge the tracking log at `input` and write the result.
///
/// Writes to `output` when given, otherwise to `<stem>_merged.json` next to
/// the input. Returns the path written.
pub fn merge_file(input: &Path, output: Option<&Path>, config: MergeConfig) -> Result<PathBuf> {
    let merger = TrackMerger::new(config)?;
    let observations = read_observations(input)?;
    let count = observations.len();

    let tracks = group_and_sort(observations);
    let merged = merger.merge(&tracks).into_observations();

    let output = output.map_or_else(|| merged_path(input), Path::to_path_buf);
    write_observations(&output, &merged)?;
    info!(
        "Merged tracking data ({} observations) saved to: {}",
        count,
        output.display()
    );
    Ok(output)
}
