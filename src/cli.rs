//! Command-line interface
//!
//! The binary always runs headless; the CLI selects which scenario to
//! play and how.

use clap::Parser;
use std::path::PathBuf;

/// Client-simulated spell combat core
#[derive(Parser, Debug)]
#[command(name = "mageduel")]
#[command(about = "Scripted spell combat simulator")]
#[command(version)]
pub struct Args {
    /// Run the specified JSON scenario (runs the built-in demo duel when
    /// omitted)
    #[arg(long, value_name = "SCENARIO_FILE")]
    pub scenario: Option<PathBuf>,

    /// Output path for the combat log
    #[arg(long, value_name = "OUTPUT_PATH")]
    pub output: Option<PathBuf>,

    /// Random seed for a deterministic replay
    #[arg(long)]
    pub seed: Option<u64>,
}

pub fn parse_args() -> Args {
    Args::parse()
}
