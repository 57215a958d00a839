//! Command-line arguments

use std::path::PathBuf;

use clap::Parser;

/// Practice modal editing keys against a simulated buffer.
#[derive(Debug, Parser)]
#[command(name = "modal-trainer", version)]
pub struct Args {
    /// Starting buffer content
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Engine config (JSON)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Apply these keys, print the result and exit
    #[arg(short, long)]
    pub keys: Option<String>,

    /// Print snapshots as JSON
    #[arg(long)]
    pub json: bool,

    /// Viewport height for text output
    #[arg(long, default_value = "20")]
    pub lines: usize,
}
