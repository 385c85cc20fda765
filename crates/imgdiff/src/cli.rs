use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::BatchConfig;

fn parse_threshold(s: &str) -> Result<u8, String> {
    let v: i64 = s.parse().map_err(|e| format!("{e}"))?;
    imgdiff::validate_threshold(v)
}

#[derive(Parser)]
#[command(
    name = "imgdiff",
    about = "Pixel-difference heat maps and statistics for image pairs"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create .imgdiff/config.toml with commented defaults
    Init {
        /// Overwrite an existing config
        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Write a heat map of the differences between two images
    Diff {
        first: PathBuf,
        second: PathBuf,
        /// Output image (format from extension)
        #[arg(long, short = 'o', default_value = "diff.png")]
        output: PathBuf,
        /// Mean channel change (0-255) below which pixels count as unchanged
        #[arg(long, value_parser = parse_threshold)]
        threshold: Option<u8>,
        /// Also print difference statistics
        #[arg(long)]
        stats: bool,
    },

    /// Print how many pixels differ between two images (exit 2 if unavailable)
    Stats {
        first: PathBuf,
        second: PathBuf,
        /// Mean channel change (0-255) below which pixels count as unchanged
        #[arg(long, value_parser = parse_threshold)]
        threshold: Option<u8>,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Compare same-named images in two directories (exit 0/1)
    Batch {
        first_dir: PathBuf,
        second_dir: PathBuf,
        /// Directory for heat maps of differing pairs (none written if omitted)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
        /// Mean channel change (0-255) below which pixels count as unchanged
        #[arg(long, value_parser = parse_threshold)]
        threshold: Option<u8>,
        #[command(flatten)]
        batch: BatchConfig,
    },
}
