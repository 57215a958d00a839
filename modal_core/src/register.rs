//! Registers
//!
//! Named clipboard slots. Only the unnamed register `"` is written today:
//! every delete and yank overwrites it. A trailing `\n` marks the content as
//! whole lines rather than characters.

use std::collections::BTreeMap;

/// The unnamed register
pub const UNNAMED: char = '"';

/// Decoded register content
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegisterContent<'a> {
    /// Whole lines, without line terminators
    Lines(Vec<&'a str>),
    /// A char range, possibly spanning lines
    Chars(&'a str),
}

impl<'a> RegisterContent<'a> {
    /// Decode stored text; empty text decodes to nothing
    pub fn decode(text: &'a str) -> Option<Self> {
        if text.is_empty() {
            return None;
        }
        match text.strip_suffix('\n') {
            Some(body) => Some(RegisterContent::Lines(body.split('\n').collect())),
            None => Some(RegisterContent::Chars(text)),
        }
    }
}

/// Encode whole lines for storage
pub fn encode_lines<S: AsRef<str>>(lines: &[S]) -> String {
    let mut text = lines
        .iter()
        .map(|line| line.as_ref())
        .collect::<Vec<_>>()
        .join("\n");
    text.push('\n');
    text
}

/// Register file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registers {
    slots: BTreeMap<char, String>,
}

impl Registers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite a register
    pub fn store(&mut self, name: char, text: String) {
        self.slots.insert(name, text);
    }

    pub fn store_lines<S: AsRef<str>>(&mut self, name: char, lines: &[S]) {
        self.store(name, encode_lines(lines));
    }

    pub fn get(&self, name: char) -> Option<&str> {
        self.slots.get(&name).map(|s| s.as_str())
    }

    pub fn content(&self, name: char) -> Option<RegisterContent<'_>> {
        self.get(name).and_then(RegisterContent::decode)
    }

    pub fn as_map(&self) -> &BTreeMap<char, String> {
        &self.slots
    }
}
