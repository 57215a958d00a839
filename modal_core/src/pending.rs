//! Multi-key command prefixes
//!
//! A prefix key (`d`, `c`, `y`, `g`, `r`, `f`, `F`) is held until the next key
//! completes a command or the prefix's deadline passes. Time is whatever the
//! engine's logical clock says; nothing here reads a real clock.

use std::time::Duration;

/// Largest repeat count; further digits are absorbed
pub const MAX_COUNT: usize = 9_999;

/// Append a typed digit to a repeat count, capped at [`MAX_COUNT`]
pub fn push_digit(count: Option<usize>, digit: u32) -> usize {
    count
        .unwrap_or(0)
        .saturating_mul(10)
        .saturating_add(digit as usize)
        .min(MAX_COUNT)
}

/// A prefix waiting for more keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Prefix {
    /// `d`
    Delete,
    /// `c`
    Change,
    /// `y`
    Yank,
    /// `g`
    Go,
    /// `r`, waits for the replacement char
    Replace,
    /// `f`, waits for the char to find
    FindForward,
    /// `F`, waits for the char to find
    FindBackward,
    /// `di`, waits for a quote
    DeleteInner,
    /// `ci`, waits for a quote
    ChangeInner,
}

impl Prefix {
    /// Prefix started by a single key in normal mode
    pub fn from_key(ch: char) -> Option<Self> {
        match ch {
            'd' => Some(Prefix::Delete),
            'c' => Some(Prefix::Change),
            'y' => Some(Prefix::Yank),
            'g' => Some(Prefix::Go),
            'r' => Some(Prefix::Replace),
            'f' => Some(Prefix::FindForward),
            'F' => Some(Prefix::FindBackward),
            _ => None,
        }
    }

    /// Prefix started by a single key in visual mode, motions only
    pub fn from_visual_key(ch: char) -> Option<Self> {
        match ch {
            'g' => Some(Prefix::Go),
            'f' => Some(Prefix::FindForward),
            'F' => Some(Prefix::FindBackward),
            _ => None,
        }
    }

    /// Keys typed so far
    pub fn keys(&self) -> &'static str {
        match self {
            Prefix::Delete => "d",
            Prefix::Change => "c",
            Prefix::Yank => "y",
            Prefix::Go => "g",
            Prefix::Replace => "r",
            Prefix::FindForward => "f",
            Prefix::FindBackward => "F",
            Prefix::DeleteInner => "di",
            Prefix::ChangeInner => "ci",
        }
    }

    /// True when the next key is an argument, whatever char it is
    pub fn takes_argument(&self) -> bool {
        matches!(
            self,
            Prefix::Replace | Prefix::FindForward | Prefix::FindBackward
        )
    }
}

/// A fully resolved multi-key command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MultiKey {
    /// `dd`
    DeleteLines,
    /// `dw`
    DeleteWord,
    /// `cc`
    ChangeLines,
    /// `cw`
    ChangeWord,
    /// `yy`
    YankLines,
    /// `gg`
    GotoFirstLine,
    /// `di"` / `di'`
    DeleteInner(char),
    /// `ci"` / `ci'`
    ChangeInner(char),
    /// `r<c>`
    Replace(char),
    /// `f<c>`
    FindForward(char),
    /// `F<c>`
    FindBackward(char),
}

/// Outcome of feeding one key to a prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Prefix plus key is a complete command
    Command(MultiKey),
    /// Prefix plus key is itself a longer prefix
    Prefix(Prefix),
    /// Not a known sequence
    NoMatch,
}

/// Resolve `prefix + ch` against the known multi-key commands
pub fn resolve(prefix: Prefix, ch: char) -> Resolution {
    use Resolution::{Command, NoMatch};

    match (prefix, ch) {
        (Prefix::Replace, c) => Command(MultiKey::Replace(c)),
        (Prefix::FindForward, c) => Command(MultiKey::FindForward(c)),
        (Prefix::FindBackward, c) => Command(MultiKey::FindBackward(c)),

        (Prefix::Delete, 'd') => Command(MultiKey::DeleteLines),
        (Prefix::Delete, 'w') => Command(MultiKey::DeleteWord),
        (Prefix::Delete, 'i') => Resolution::Prefix(Prefix::DeleteInner),
        (Prefix::Change, 'c') => Command(MultiKey::ChangeLines),
        (Prefix::Change, 'w') => Command(MultiKey::ChangeWord),
        (Prefix::Change, 'i') => Resolution::Prefix(Prefix::ChangeInner),
        (Prefix::Yank, 'y') => Command(MultiKey::YankLines),
        (Prefix::Go, 'g') => Command(MultiKey::GotoFirstLine),

        (Prefix::DeleteInner, q @ ('"' | '\'')) => Command(MultiKey::DeleteInner(q)),
        (Prefix::ChangeInner, q @ ('"' | '\'')) => Command(MultiKey::ChangeInner(q)),

        _ => NoMatch,
    }
}

/// Pending prefix with its expiry deadline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingCommand {
    pub prefix: Prefix,
    pub deadline: Duration,
}

impl PendingCommand {
    pub fn new(prefix: Prefix, now: Duration, window: Duration) -> Self {
        Self {
            prefix,
            deadline: now.saturating_add(window),
        }
    }

    pub fn is_expired(&self, now: Duration) -> bool {
        now >= self.deadline
    }
}
