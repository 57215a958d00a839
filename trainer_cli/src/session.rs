//! Line-driven practice session
//!
//! Each input line is either a session command (leading `\`) or a
//! key-notation script fed to the sandbox.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use services_trainer::{Sandbox, TextView};
use tracing::debug;

/// How snapshots are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Result of one input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Print this and keep going
    Show(String),
    /// End the session
    Exit,
}

/// Sandbox plus rendering settings
#[derive(Debug)]
pub struct Session {
    sandbox: Sandbox,
    view: TextView,
    format: OutputFormat,
}

impl Session {
    pub fn new(sandbox: Sandbox, view: TextView, format: OutputFormat) -> Self {
        Self {
            sandbox,
            view,
            format,
        }
    }

    pub fn sandbox(&self) -> &Sandbox {
        &self.sandbox
    }

    /// Current state in the configured format
    pub fn render(&self) -> Result<String> {
        let snapshot = self.sandbox.snapshot();
        match self.format {
            OutputFormat::Text => Ok(self.view.render(&snapshot)),
            OutputFormat::Json => {
                serde_json::to_string_pretty(&snapshot).context("Failed to serialize snapshot")
            }
        }
    }

    /// Handle one input line
    ///
    /// `now` is the session clock; it expires a stale prefix before the
    /// line's keys are applied.
    pub fn process_line(&mut self, line: &str, now: Duration) -> Result<Reply> {
        self.sandbox.tick(now);

        if let Some(command) = line.strip_prefix('\\') {
            return self.run_command(command.trim());
        }

        let consumed = self
            .sandbox
            .type_keys(line)
            .with_context(|| format!("Cannot read keys {line:?}"))?;
        debug!(consumed, "keys applied");
        Ok(Reply::Show(self.render()?))
    }

    fn run_command(&mut self, command: &str) -> Result<Reply> {
        let mut parts = command.split_whitespace();
        match parts.next() {
            Some("quit") | Some("q") => Ok(Reply::Exit),
            Some("reset") => {
                self.sandbox.reset();
                Ok(Reply::Show(self.render()?))
            }
            Some("load") => {
                let text = command.strip_prefix("load").unwrap_or_default().trim();
                self.sandbox.replace_content(text.replace("\\n", "\n"));
                Ok(Reply::Show(self.render()?))
            }
            Some("json") => {
                self.format = OutputFormat::Json;
                Ok(Reply::Show(self.render()?))
            }
            Some("text") => {
                self.format = OutputFormat::Text;
                Ok(Reply::Show(self.render()?))
            }
            Some("help") => Ok(Reply::Show(HELP.trim().to_string())),
            Some(other) => bail!("Unknown session command: \\{other}"),
            None => Ok(Reply::Show(self.render()?)),
        }
    }
}

const HELP: &str = r"
Type keys in notation, e.g.  3dd  ci'x<Esc>  :s/a/b/g<CR>
Session commands:
  \reset         restore the starting content
  \load <text>   replace the starting content (\n for newlines)
  \json, \text   switch output format
  \quit          leave
";
