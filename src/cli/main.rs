use std::path::PathBuf;

use clap::Parser;

use crate::Commands;

/// Main CLI application arguments and command structure
#[derive(Parser)]
#[clap(
    name = "calnotes",
    version,
    about = "Calendar-centric notes with categories, pins and reminders"
)]
pub struct Cli {
    /// Directory where notes and settings are stored
    #[clap(long, value_parser)]
    pub data_dir: Option<PathBuf>,

    /// Verbose output mode
    #[clap(short, long)]
    pub verbose: bool,

    /// Subcommands for the calnotes application
    #[clap(subcommand)]
    pub command: Commands,
}
