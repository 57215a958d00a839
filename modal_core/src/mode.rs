//! Editor modes
//!
//! The engine keeps its mode as a tagged union so that mode-specific data
//! (the pending prefix, the selection, the command line) only exists while
//! its mode is active. [`EditorMode`] is the flat tag exposed to callers.

use crate::buffer::Position;
use crate::pending::PendingCommand;
use serde::{Deserialize, Serialize};

/// Editor mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EditorMode {
    /// Normal mode (navigation and commands)
    Normal,
    /// Insert mode (text entry)
    Insert,
    /// Visual mode (selection)
    Visual,
    /// Command-line mode (`:` commands and `/` searches)
    Command,
}

impl EditorMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            EditorMode::Normal => "NORMAL",
            EditorMode::Insert => "INSERT",
            EditorMode::Visual => "VISUAL",
            EditorMode::Command => "COMMAND",
        }
    }
}

/// Selection granularity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SelectionKind {
    /// `v`: inclusive char range
    Char,
    /// `V`: whole lines
    Line,
}

/// Visual selection
///
/// `start` is the anchor and stays put; `end` follows the cursor. The pair
/// is unordered until [`Selection::normalized`] is called.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub start: Position,
    pub end: Position,
    pub kind: SelectionKind,
}

impl Selection {
    /// Char-wise selection anchored at the cursor
    pub fn char_at(pos: Position) -> Self {
        Self {
            start: pos,
            end: pos,
            kind: SelectionKind::Char,
        }
    }

    /// Line-wise selection spanning one whole line
    pub fn line_at(line: usize, last_col: usize) -> Self {
        Self {
            start: Position::new(line, 0),
            end: Position::new(line, last_col),
            kind: SelectionKind::Line,
        }
    }

    /// The ends ordered by `(line, col)`
    pub fn normalized(&self) -> (Position, Position) {
        if self.start <= self.end {
            (self.start, self.end)
        } else {
            (self.end, self.start)
        }
    }

    /// Swap anchor and moving end
    pub fn swapped(self) -> Self {
        Self {
            start: self.end,
            end: self.start,
            kind: self.kind,
        }
    }
}

/// Pending prefix and repeat count, held in normal and visual mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct PendingKeys {
    pub pending: Option<PendingCommand>,
    pub count: Option<usize>,
}

impl PendingKeys {
    /// Count digits followed by prefix keys
    fn render(&self) -> String {
        let mut out = self.count.map(|n| n.to_string()).unwrap_or_default();
        if let Some(pending) = self.pending {
            out.push_str(pending.prefix.keys());
        }
        out
    }
}

/// Mode plus its payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Mode {
    Normal(PendingKeys),
    Insert,
    Visual {
        selection: Selection,
        keys: PendingKeys,
    },
    /// Typed command line, starting with its `:` or `/` trigger
    Command(String),
}

impl Mode {
    pub fn normal() -> Self {
        Mode::Normal(PendingKeys::default())
    }

    pub fn visual(selection: Selection) -> Self {
        Mode::Visual {
            selection,
            keys: PendingKeys::default(),
        }
    }

    pub fn kind(&self) -> EditorMode {
        match self {
            Mode::Normal(_) => EditorMode::Normal,
            Mode::Insert => EditorMode::Insert,
            Mode::Visual { .. } => EditorMode::Visual,
            Mode::Command(_) => EditorMode::Command,
        }
    }

    pub fn selection(&self) -> Option<Selection> {
        match self {
            Mode::Visual { selection, .. } => Some(*selection),
            _ => None,
        }
    }

    /// Text shown in the command area
    ///
    /// Count digits followed by pending prefix keys in normal and visual
    /// mode, the typed line in command mode, nothing in insert mode.
    pub fn command_buffer(&self) -> String {
        match self {
            Mode::Normal(keys) | Mode::Visual { keys, .. } => keys.render(),
            Mode::Command(line) => line.clone(),
            Mode::Insert => String::new(),
        }
    }

    /// Prefix and count state, when the mode has one
    pub fn pending_keys(&mut self) -> Option<&mut PendingKeys> {
        match self {
            Mode::Normal(keys) | Mode::Visual { keys, .. } => Some(keys),
            Mode::Insert | Mode::Command(_) => None,
        }
    }
}
