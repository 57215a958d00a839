//! Editor snapshot
//!
//! An immutable copy of everything a renderer or a lesson validator may look
//! at. Two engines fed the same key trace produce equal snapshots.

use crate::{EditorMode, Position, Selection};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Complete editor state snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorSnapshot {
    pub mode: EditorMode,
    pub cursor: Position,
    pub lines: Vec<String>,
    /// Present only in visual mode
    pub selection: Option<Selection>,
    /// Pending count/prefix in normal mode, typed line in command mode
    pub command_buffer: String,
    pub registers: BTreeMap<char, String>,
    pub last_search: Option<String>,
    pub message: String,
}

impl EditorSnapshot {
    pub fn line(&self, line: usize) -> Option<&str> {
        self.lines.get(line).map(|s| s.as_str())
    }

    pub fn current_line(&self) -> &str {
        self.line(self.cursor.line).unwrap_or_default()
    }

    pub fn register(&self, name: char) -> Option<&str> {
        self.registers.get(&name).map(|s| s.as_str())
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// Compute a deterministic hash of the snapshot state
    /// This is used for fast comparison in tests
    #[cfg(test)]
    pub fn hash(&self) -> u64 {
        use sha2::{Digest, Sha256};

        let mut hasher = Sha256::new();
        hasher.update(self.mode.as_str().as_bytes());
        hasher.update(self.cursor.line.to_le_bytes());
        hasher.update(self.cursor.col.to_le_bytes());
        for line in &self.lines {
            hasher.update(line.as_bytes());
            hasher.update(b"\n");
        }
        if let Some(selection) = &self.selection {
            for pos in [selection.start, selection.end] {
                hasher.update(pos.line.to_le_bytes());
                hasher.update(pos.col.to_le_bytes());
            }
        }
        hasher.update(self.command_buffer.as_bytes());
        for (name, text) in &self.registers {
            hasher.update(name.to_string().as_bytes());
            hasher.update(text.as_bytes());
        }
        hasher.update(self.message.as_bytes());

        let result = hasher.finalize();
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&result[..8]);
        u64::from_le_bytes(bytes)
    }
}
