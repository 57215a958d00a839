//! # Input Types
//!
//! Key event types consumed by the modal editing engine.
//!
//! ## Philosophy
//!
//! - **Events, not bytes**: Input is structured events, not raw scan codes or byte streams
//! - **Host-neutral**: Key identifiers follow the logical key names hosts already report
//!   (`"Escape"`, `"ArrowLeft"`, `"a"`), never physical layouts
//! - **Testable**: Events are serializable and can be scripted with a compact notation
//!
//! ## Non-Goals
//!
//! This is NOT:
//! - Raw hardware scan codes (PS/2, USB HID)
//! - Key release / auto-repeat tracking
//! - A keymap or binding layer

pub mod notation;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use notation::{format_keys, parse_keys, KeyNotationError};

/// Keyboard event
///
/// A single key press as delivered by a host. Besides the key and its
/// modifiers it carries the "default action" flag of the raw host event:
/// a consumer that handles the key calls [`KeyEvent::prevent_default`]
/// so the host can suppress its own handling (scrolling, typing into a
/// text field, and so on).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    /// The logical key that was pressed
    pub key: Key,
    /// Modifier keys that were active
    pub modifiers: Modifiers,
    #[serde(skip)]
    default_prevented: bool,
}

impl KeyEvent {
    /// Creates a new key event
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self {
            key,
            modifiers,
            default_prevented: false,
        }
    }

    /// Creates an event with no modifiers
    pub fn plain(key: Key) -> Self {
        Self::new(key, Modifiers::none())
    }

    /// Creates a printable character event
    ///
    /// Uppercase letters carry the shift modifier, matching what a
    /// keyboard host reports for them.
    pub fn char(ch: char) -> Self {
        let modifiers = if ch.is_uppercase() {
            Modifiers::SHIFT
        } else {
            Modifiers::none()
        };
        Self::new(Key::Char(ch), modifiers)
    }

    /// Creates a Ctrl+<ch> event
    pub fn ctrl(ch: char) -> Self {
        Self::new(Key::Char(ch), Modifiers::CTRL)
    }

    /// Creates an event from a host key identifier
    pub fn from_name(name: &str, modifiers: Modifiers) -> Self {
        Self::new(Key::from_name(name), modifiers)
    }

    /// Returns the printable character, if any
    pub fn as_char(&self) -> Option<char> {
        match self.key {
            Key::Char(ch) => Some(ch),
            _ => None,
        }
    }

    /// Marks the host's default action as suppressed
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    /// Returns true if a consumer suppressed the default action
    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// Logical key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// Printable character (already shifted: `'A'`, `'$'`, `':'`)
    Char(char),

    Escape,
    Enter,
    Backspace,
    Delete,
    Tab,

    // Navigation
    Left,
    Right,
    Up,
    Down,
    Home,
    End,

    /// Modifier-only presses and keys this crate has no name for
    Unidentified,
}

impl Key {
    /// Maps a host key identifier to a key
    ///
    /// Single-character identifiers become [`Key::Char`]; names without a
    /// mapping (including bare modifier presses such as `"Shift"`) become
    /// [`Key::Unidentified`].
    pub fn from_name(name: &str) -> Self {
        let mut chars = name.chars();
        if let (Some(ch), None) = (chars.next(), chars.next()) {
            return Key::Char(ch);
        }

        match name {
            "Escape" | "Esc" => Key::Escape,
            "Enter" | "Return" => Key::Enter,
            "Backspace" => Key::Backspace,
            "Delete" | "Del" => Key::Delete,
            "Tab" => Key::Tab,
            "ArrowLeft" | "Left" => Key::Left,
            "ArrowRight" | "Right" => Key::Right,
            "ArrowUp" | "Up" => Key::Up,
            "ArrowDown" | "Down" => Key::Down,
            "Home" => Key::Home,
            "End" => Key::End,
            "Space" | "Spacebar" => Key::Char(' '),
            _ => Key::Unidentified,
        }
    }

    /// Host identifier for this key
    pub fn name(&self) -> String {
        match self {
            Key::Char(ch) => ch.to_string(),
            Key::Escape => "Escape".into(),
            Key::Enter => "Enter".into(),
            Key::Backspace => "Backspace".into(),
            Key::Delete => "Delete".into(),
            Key::Tab => "Tab".into(),
            Key::Left => "ArrowLeft".into(),
            Key::Right => "ArrowRight".into(),
            Key::Up => "ArrowUp".into(),
            Key::Down => "ArrowDown".into(),
            Key::Home => "Home".into(),
            Key::End => "End".into(),
            Key::Unidentified => "Unidentified".into(),
        }
    }

    /// Returns true for a printable character key
    pub fn is_char(&self) -> bool {
        matches!(self, Key::Char(_))
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Modifier keys
///
/// Bitflags representing modifier key states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Modifiers {
    bits: u8,
}

impl Modifiers {
    /// No modifiers
    pub const NONE: Self = Self { bits: 0 };
    /// Control key
    pub const CTRL: Self = Self { bits: 1 << 0 };
    /// Alt key
    pub const ALT: Self = Self { bits: 1 << 1 };
    /// Shift key
    pub const SHIFT: Self = Self { bits: 1 << 2 };
    /// Meta/Super/Command key
    pub const META: Self = Self { bits: 1 << 3 };

    /// Creates a new modifier set with no modifiers
    pub fn none() -> Self {
        Self::NONE
    }

    /// Creates a modifier set from host flags
    pub fn from_flags(shift: bool, ctrl: bool) -> Self {
        let mut mods = Self::NONE;
        if shift {
            mods = mods.with(Self::SHIFT);
        }
        if ctrl {
            mods = mods.with(Self::CTRL);
        }
        mods
    }

    /// Adds a modifier
    pub fn with(mut self, other: Modifiers) -> Self {
        self.bits |= other.bits;
        self
    }

    /// Checks if a modifier is present
    pub fn contains(&self, other: Modifiers) -> bool {
        (self.bits & other.bits) == other.bits
    }

    pub fn is_ctrl(&self) -> bool {
        self.contains(Self::CTRL)
    }

    pub fn is_alt(&self) -> bool {
        self.contains(Self::ALT)
    }

    pub fn is_shift(&self) -> bool {
        self.contains(Self::SHIFT)
    }

    pub fn is_meta(&self) -> bool {
        self.contains(Self::META)
    }

    /// Returns true if Ctrl, Alt or Meta is held
    ///
    /// Shift is not a command modifier: it is already folded into the
    /// character a key produces.
    pub fn has_command_modifier(&self) -> bool {
        self.is_ctrl() || self.is_alt() || self.is_meta()
    }

    /// Returns true if no modifiers are pressed
    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }
}

impl fmt::Display for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "none");
        }

        let mut parts = Vec::new();
        if self.is_ctrl() {
            parts.push("Ctrl");
        }
        if self.is_alt() {
            parts.push("Alt");
        }
        if self.is_shift() {
            parts.push("Shift");
        }
        if self.is_meta() {
            parts.push("Meta");
        }
        write!(f, "{}", parts.join("+"))
    }
}
