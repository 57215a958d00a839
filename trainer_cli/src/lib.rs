//! # Modal Trainer Console
//!
//! A practice console for the modal engine. It is NOT a terminal editor:
//! keys are typed as notation lines and the state is printed after each
//! line.

pub mod args;
pub mod session;

use std::fs;

use anyhow::{Context, Result};
use modal_core::EngineConfig;
use services_trainer::{Sandbox, TextView};

pub use args::Args;
pub use session::{OutputFormat, Reply, Session};

/// Build a session from command-line arguments
///
/// Reads the content file and the JSON config when given.
pub fn bootstrap(args: &Args) -> Result<Session> {
    let config = match &args.config {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            EngineConfig::from_json(&json)
                .with_context(|| format!("Invalid config {}", path.display()))?
        }
        None => EngineConfig::default(),
    };

    let content = match &args.file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => String::new(),
    };

    let format = if args.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };

    Ok(Session::new(
        Sandbox::with_config(content, config),
        TextView::new(args.lines),
        format,
    ))
}
