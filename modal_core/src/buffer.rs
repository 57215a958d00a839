//! Text buffer and position types
//!
//! Columns are measured in `char`s, never bytes, so every edit goes through
//! [`byte_index`] before touching the underlying `String`.

use serde::{Deserialize, Serialize};

/// Cursor position in the buffer
///
/// Ordering is `(line, col)`, which is the textual order used to normalize
/// selections.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Position {
    pub line: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }

    pub const fn zero() -> Self {
        Self { line: 0, col: 0 }
    }
}

/// Byte offset of the `col`-th char, or the string length past the end
pub(crate) fn byte_index(s: &str, col: usize) -> usize {
    s.char_indices().nth(col).map(|(i, _)| i).unwrap_or(s.len())
}

/// Number of chars in a line
pub(crate) fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Text buffer with line-based storage
///
/// Never empty: removing every line leaves a single empty line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBuffer {
    lines: Vec<String>,
}

impl TextBuffer {
    pub fn new() -> Self {
        Self {
            lines: vec![String::new()],
        }
    }

    pub fn from_string(content: &str) -> Self {
        Self::from_lines(content.lines().map(String::from).collect())
    }

    pub fn from_lines(lines: Vec<String>) -> Self {
        if lines.is_empty() {
            Self::new()
        } else {
            Self { lines }
        }
    }

    pub fn as_string(&self) -> String {
        self.lines.join("\n")
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn last_line(&self) -> usize {
        self.lines.len() - 1
    }

    pub fn line(&self, line: usize) -> Option<&str> {
        self.lines.get(line).map(|s| s.as_str())
    }

    /// Line length in chars (0 for lines past the end)
    pub fn line_length(&self, line: usize) -> usize {
        self.lines.get(line).map(|s| char_len(s)).unwrap_or(0)
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line_chars(&self, line: usize) -> Vec<char> {
        self.line(line)
            .map(|s| s.chars().collect())
            .unwrap_or_default()
    }

    pub fn char_at(&self, pos: Position) -> Option<char> {
        self.line(pos.line)?.chars().nth(pos.col)
    }

    /// Largest valid column on a line
    ///
    /// Insert mode may sit one past the last char; every other mode must sit
    /// on a char (or column 0 of an empty line).
    pub fn max_col(&self, line: usize, allow_past_end: bool) -> usize {
        let len = self.line_length(line);
        if allow_past_end {
            len
        } else {
            len.saturating_sub(1)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.len() == 1 && self.lines[0].is_empty()
    }

    /// Insert a character at position
    pub fn insert_char(&mut self, pos: Position, ch: char) -> bool {
        let Some(line) = self.lines.get_mut(pos.line) else {
            return false;
        };
        if pos.col > char_len(line) {
            return false;
        }

        let at = byte_index(line, pos.col);
        line.insert(at, ch);
        true
    }

    /// Insert text that may span lines
    ///
    /// Returns the position just past the last inserted char.
    pub fn insert_str(&mut self, pos: Position, text: &str) -> Position {
        let line_idx = pos.line.min(self.last_line());
        let line = &mut self.lines[line_idx];
        let col = pos.col.min(char_len(line));
        let tail = line.split_off(byte_index(line, col));

        let mut segments = text.split('\n');
        let first = segments.next().unwrap_or_default();
        line.push_str(first);

        let rest: Vec<&str> = segments.collect();
        match rest.split_last() {
            None => {
                line.push_str(&tail);
                Position::new(line_idx, col + char_len(first))
            }
            Some((last, middle)) => {
                let mut inserted: Vec<String> = middle.iter().map(|s| String::from(*s)).collect();
                let end = Position::new(line_idx + rest.len(), char_len(last));
                inserted.push(format!("{last}{tail}"));
                let at = line_idx + 1;
                self.lines.splice(at..at, inserted);
                end
            }
        }
    }

    /// Insert a newline at position, splitting the line
    pub fn insert_newline(&mut self, pos: Position) -> bool {
        let Some(line) = self.lines.get_mut(pos.line) else {
            return false;
        };
        if pos.col > char_len(line) {
            return false;
        }

        let rest = line.split_off(byte_index(line, pos.col));
        self.lines.insert(pos.line + 1, rest);
        true
    }

    /// Delete character at position
    pub fn delete_char(&mut self, pos: Position) -> bool {
        let Some(line) = self.lines.get_mut(pos.line) else {
            return false;
        };
        if pos.col >= char_len(line) {
            return false;
        }

        let at = byte_index(line, pos.col);
        line.remove(at);
        true
    }

    /// Delete character before position (backspace)
    /// Returns new cursor position if successful
    pub fn backspace(&mut self, pos: Position) -> Option<Position> {
        if pos.line >= self.lines.len() {
            return None;
        }

        if pos.col > 0 {
            let line = &mut self.lines[pos.line];
            let at = byte_index(line, pos.col - 1);
            line.remove(at);
            Some(Position::new(pos.line, pos.col - 1))
        } else if pos.line > 0 {
            // Join with previous line
            let current_line = self.lines.remove(pos.line);
            let prev_line = &mut self.lines[pos.line - 1];
            let new_col = char_len(prev_line);
            prev_line.push_str(&current_line);
            Some(Position::new(pos.line - 1, new_col))
        } else {
            None
        }
    }

    /// Remove the chars `[start, end)` of one line and return them
    pub fn delete_range(&mut self, line: usize, start: usize, end: usize) -> String {
        let Some(text) = self.lines.get_mut(line) else {
            return String::new();
        };
        let from = byte_index(text, start);
        let to = byte_index(text, end.max(start));
        text.drain(from..to).collect()
    }

    /// Text of the inclusive char range `start..=end` (`start <= end`)
    ///
    /// Partial first and last lines are joined with the full interior lines
    /// by `\n`.
    pub fn text_span(&self, start: Position, end: Position) -> String {
        if start.line == end.line {
            let line = self.line(start.line).unwrap_or_default();
            return slice_chars(line, start.col, end.col + 1).into();
        }

        let mut parts = Vec::new();
        let first = self.line(start.line).unwrap_or_default();
        parts.push(String::from(&first[byte_index(first, start.col)..]));
        for line in start.line + 1..end.line {
            parts.push(self.lines[line].clone());
        }
        let last = self.line(end.line).unwrap_or_default();
        parts.push(String::from(&last[..byte_index(last, end.col + 1)]));
        parts.join("\n")
    }

    /// Remove the inclusive char range `start..=end` and return its text
    pub fn delete_span(&mut self, start: Position, end: Position) -> String {
        let text = self.text_span(start, end);

        if start.line == end.line {
            self.delete_range(start.line, start.col, end.col + 1);
            return text;
        }

        let first = &self.lines[start.line];
        let head = String::from(&first[..byte_index(first, start.col)]);
        let last = &self.lines[end.line];
        let tail = &last[byte_index(last, end.col + 1)..];
        let joined = format!("{head}{tail}");
        self.lines.splice(start.line..=end.line, [joined]);
        text
    }

    /// Remove up to `count` whole lines starting at `start`
    ///
    /// Collapses to a single empty line when nothing would remain.
    pub fn delete_lines(&mut self, start: usize, count: usize) -> Vec<String> {
        if start >= self.lines.len() {
            return Vec::new();
        }
        let end = start.saturating_add(count).min(self.lines.len());
        let removed: Vec<String> = self.lines.drain(start..end).collect();
        if self.lines.is_empty() {
            self.lines.push(String::new());
        }
        removed
    }

    /// Insert whole lines before index `at` (`at == line_count` appends)
    pub fn insert_lines(&mut self, at: usize, lines: Vec<String>) {
        let at = at.min(self.lines.len());
        self.lines.splice(at..at, lines);
    }

    /// Replace the text of one line
    pub fn set_line(&mut self, line: usize, text: String) {
        if let Some(slot) = self.lines.get_mut(line) {
            *slot = text;
        }
    }

    /// Join the next line onto `line`
    ///
    /// The next line's leading whitespace is trimmed and a single space
    /// separates the two when both sides have text. Returns the column of
    /// the join point.
    pub fn join_lines(&mut self, line: usize) -> Option<usize> {
        if line + 1 >= self.lines.len() {
            return None;
        }

        let next = self.lines.remove(line + 1);
        let trimmed = next.trim_start();
        let current = &mut self.lines[line];
        let join_col = char_len(current);
        if !trimmed.is_empty() && !current.is_empty() {
            current.push(' ');
        }
        current.push_str(trimmed);
        Some(join_col)
    }
}

fn slice_chars(s: &str, start: usize, end: usize) -> &str {
    let from = byte_index(s, start);
    let to = byte_index(s, end.max(start));
    &s[from..to]
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer(lines: &[&str]) -> TextBuffer {
        TextBuffer::from_lines(lines.iter().map(|s| String::from(*s)).collect())
    }

    #[test]
    fn test_position_ordering() {
        assert!(Position::new(0, 9) < Position::new(1, 0));
        assert!(Position::new(2, 1) < Position::new(2, 3));
    }

    #[test]
    fn test_text_buffer_new() {
        let buffer = TextBuffer::new();
        assert_eq!(buffer.line_count(), 1);
        assert_eq!(buffer.line(0), Some(""));
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_from_string() {
        let buffer = TextBuffer::from_string("hello\nworld");
        assert_eq!(buffer.line_count(), 2);
        assert_eq!(buffer.line(1), Some("world"));
        assert_eq!(TextBuffer::from_string("").line_count(), 1);
    }

    #[test]
    fn test_max_col() {
        let buffer = buffer(&["abc", ""]);
        assert_eq!(buffer.max_col(0, true), 3);
        assert_eq!(buffer.max_col(0, false), 2);
        assert_eq!(buffer.max_col(1, false), 0);
    }

    #[test]
    fn test_multibyte_columns() {
        let mut buffer = buffer(&["héllo"]);
        assert_eq!(buffer.line_length(0), 5);
        assert!(buffer.delete_char(Position::new(0, 1)));
        assert_eq!(buffer.line(0), Some("hllo"));
        assert!(buffer.insert_char(Position::new(0, 1), 'é'));
        assert_eq!(buffer.line(0), Some("héllo"));
    }

    #[test]
    fn test_insert_str_single_line() {
        let mut buffer = buffer(&["held"]);
        let end = buffer.insert_str(Position::new(0, 2), "llo wor");
        assert_eq!(buffer.line(0), Some("hello world"));
        assert_eq!(end, Position::new(0, 9));
    }

    #[test]
    fn test_insert_str_multi_line() {
        let mut buffer = buffer(&["abXY"]);
        let end = buffer.insert_str(Position::new(0, 2), "1\n2\n3");
        assert_eq!(buffer.lines(), &["ab1", "2", "3XY"]);
        assert_eq!(end, Position::new(2, 1));
    }

    #[test]
    fn test_backspace_line_join() {
        let mut buffer = buffer(&["hello", "world"]);
        let new_pos = buffer.backspace(Position::new(1, 0));
        assert_eq!(new_pos, Some(Position::new(0, 5)));
        assert_eq!(buffer.line(0), Some("helloworld"));
    }

    #[test]
    fn test_delete_span_single_line() {
        let mut buffer = buffer(&["abcdef"]);
        let text = buffer.delete_span(Position::new(0, 1), Position::new(0, 3));
        assert_eq!(text, "bcd");
        assert_eq!(buffer.line(0), Some("aef"));
    }

    #[test]
    fn test_delete_span_multi_line() {
        let mut buffer = buffer(&["first line", "middle", "last line"]);
        let text = buffer.delete_span(Position::new(0, 2), Position::new(2, 3));
        assert_eq!(text, "rst line\nmiddle\nlast");
        assert_eq!(buffer.lines(), &["fi line"]);
    }

    #[test]
    fn test_delete_lines_collapses() {
        let mut buffer = buffer(&["a", "b"]);
        let removed = buffer.delete_lines(0, 5);
        assert_eq!(removed, vec!["a", "b"]);
        assert_eq!(buffer.lines(), &[""]);
    }

    #[test]
    fn test_join_lines() {
        let mut buffer = buffer(&["foo", "   bar", "baz"]);
        assert_eq!(buffer.join_lines(0), Some(3));
        assert_eq!(buffer.lines(), &["foo bar", "baz"]);
        assert_eq!(buffer.join_lines(1), None);
    }

    #[test]
    fn test_join_blank_next_line() {
        let mut buffer = buffer(&["foo", "   "]);
        buffer.join_lines(0);
        assert_eq!(buffer.lines(), &["foo"]);
    }
}
