use clap::Parser;
use std::path::PathBuf;

use crate::utils::config::PackagePaths;

/// Sweep attached volumes for matching files and copy them into a hidden staging directory.
#[derive(Clone, Parser)]
#[command(name = "volsweep")]
#[command(
    about = "Copy files matching name patterns from every other attached volume into a hidden, timestamped staging directory."
)]
pub struct Cli {
    /// Settings file. Default: `volsweep.toml` in the current directory (optional).
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Only copy files strictly larger than this many bytes.
    #[arg(long, short = 's', value_parser = clap::value_parser!(i64))]
    pub min_size: Option<i64>,

    /// File name patterns separated by ';' (e.g. "*.jpg;*.png").
    #[arg(long, short = 'e')]
    pub extensions: Option<String>,

    /// Host names separated by '|' on which nothing runs.
    #[arg(long)]
    pub ignored_computers: Option<String>,

    /// Sweep these directories instead of every attached volume. Can repeat.
    #[arg(long = "root", short = 'r', value_name = "DIR")]
    pub roots: Vec<PathBuf>,

    /// Create the staging directory here instead of at the root of the current volume.
    #[arg(long)]
    pub staging_parent: Option<PathBuf>,

    /// Wait on an empty queue before re-checking for cancellation (milliseconds).
    #[arg(long, value_parser = clap::value_parser!(u64))]
    pub poll_interval_ms: Option<u64>,

    /// List what would be copied; create nothing.
    #[arg(long)]
    pub dry_run: bool,

    /// Show a counter of copied files.
    #[arg(long, short = 'p', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub progress: Option<bool>,

    /// Verbose output.
    #[arg(long, short = 'v', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub verbose: Option<bool>,
}

impl Cli {
    /// Settings file path and whether it was asked for explicitly.
    pub fn config_path(&self) -> (PathBuf, bool) {
        match &self.config {
            Some(p) => (p.clone(), true),
            None => (PathBuf::from(PackagePaths::get().config_filename()), false),
        }
    }
}
