//! Merge fragmented tracks in a tracking log, or inspect a merged track's path.
//!
//! Usage:
//!   track-merge merge recordings/intruders_2024-03-09_14-05-07.json
//!   track-merge merge log.json --max-gap 15 --max-dist 80 --output out.json
//!   track-merge path recordings/intruders_2024-03-09_14-05-07_merged.json --track-id 2

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use log::info;

use track_merge::highlight::{FrameIndex, TrackPath};
use track_merge::{MergeConfig, tracking_log};

#[derive(Parser, Debug)]
#[command(name = "track-merge", version, about = "Merge fragmented object tracks")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Merge track fragments and write `<stem>_merged.json`
    Merge {
        /// Tracking log (JSON array of frame/track_id/bbox records)
        input: PathBuf,
        /// Largest frame gap between a track's end and a fragment's start
        #[arg(long, default_value_t = 10, allow_negative_numbers = true)]
        max_gap: i64,
        /// Center distance in pixels a fragment must stay below
        #[arg(long, default_value_t = 50.0, allow_negative_numbers = true)]
        max_dist: f64,
        /// Output path instead of the conventional merged name
        #[arg(long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Print the center-point path of one merged track as JSON
    Path {
        /// Merged tracking log
        input: PathBuf,
        #[arg(long)]
        track_id: i64,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match Args::parse().command {
        Command::Merge {
            input,
            max_gap,
            max_dist,
            output,
        } => {
            let config = MergeConfig::new(max_gap, max_dist).context("Invalid merge thresholds")?;
            let written = tracking_log::merge_file(&input, output.as_deref(), config)
                .with_context(|| format!("Failed to merge {}", input.display()))?;
            info!("Wrote {}", written.display());
        }
        Command::Path { input, track_id } => {
            let observations = tracking_log::read_observations(&input)
                .with_context(|| format!("Failed to read {}", input.display()))?;
            let index = FrameIndex::build(&observations);
            if !index.contains_track(track_id) {
                bail!("Track {} not found in {}", track_id, input.display());
            }
            let path = TrackPath::collect(&index, track_id);
            info!(
                "Track {}: {} points, {:.1} px",
                track_id,
                path.len(),
                path.length()
            );
            println!("{}", serde_json::to_string_pretty(&path)?);
        }
    }

    Ok(())
}
