//! Buffer search
//!
//! Case-insensitive substring search that starts just past the cursor and
//! wraps around the buffer exactly once.

use crate::buffer::{Position, TextBuffer};

/// Search direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    pub fn reversed(self) -> Self {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }
}

fn fold(text: &str) -> Vec<char> {
    text.chars()
        .map(|ch| ch.to_lowercase().next().unwrap_or(ch))
        .collect()
}

fn matches_at(hay: &[char], needle: &[char], at: usize) -> bool {
    hay.get(at..at + needle.len()) == Some(needle)
}

/// First match starting at or after `from`
fn find_from(hay: &[char], needle: &[char], from: usize) -> Option<usize> {
    if needle.len() > hay.len() {
        return None;
    }
    (from..=hay.len() - needle.len()).find(|&i| matches_at(hay, needle, i))
}

/// Last match starting strictly before `before`
fn rfind_before(hay: &[char], needle: &[char], before: usize) -> Option<usize> {
    if needle.len() > hay.len() {
        return None;
    }
    let last = (hay.len() - needle.len()).min(before.checked_sub(1)?);
    (0..=last).rev().find(|&i| matches_at(hay, needle, i))
}

/// Locate `pattern` relative to `from`
///
/// Lines are scanned starting just after (or before) the cursor and the scan
/// wraps around the buffer once, finishing on the cursor's own line. Returns
/// `None` when the pattern occurs nowhere.
pub fn find_match(
    buffer: &TextBuffer,
    from: Position,
    pattern: &str,
    direction: Direction,
) -> Option<Position> {
    let needle = fold(pattern);
    if needle.is_empty() {
        return None;
    }

    let count = buffer.line_count();
    let origin = from.line.min(count - 1);
    let home = fold(buffer.line(origin).unwrap_or_default());

    match direction {
        Direction::Forward => {
            if let Some(col) = find_from(&home, &needle, from.col + 1) {
                return Some(Position::new(origin, col));
            }
            for step in 1..count {
                let line = (origin + step) % count;
                let hay = fold(buffer.line(line).unwrap_or_default());
                if let Some(col) = find_from(&hay, &needle, 0) {
                    return Some(Position::new(line, col));
                }
            }
            find_from(&home, &needle, 0).map(|col| Position::new(origin, col))
        }
        Direction::Backward => {
            if let Some(col) = rfind_before(&home, &needle, from.col) {
                return Some(Position::new(origin, col));
            }
            for step in 1..count {
                let line = (origin + count - step) % count;
                let hay = fold(buffer.line(line).unwrap_or_default());
                if let Some(col) = rfind_before(&hay, &needle, hay.len() + 1) {
                    return Some(Position::new(line, col));
                }
            }
            rfind_before(&home, &needle, home.len() + 1).map(|col| Position::new(origin, col))
        }
    }
}
