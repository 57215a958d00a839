//! Cursor motions
//!
//! Pure functions from a buffer and a position to a new position. Results are
//! not clamped for the active mode; the engine does that after every motion.
//!
//! Word motions walk a virtual stream in which every line ends with one
//! extra position standing for its line break. Chars fall into three
//! classes (word, punctuation, whitespace) and line breaks count as
//! whitespace. An empty line is always a stop.

use crate::buffer::{Position, TextBuffer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CharClass {
    Space,
    Word,
    Punct,
}

/// Letters, digits and underscore
pub fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

pub(crate) fn class_of(ch: char) -> CharClass {
    if ch.is_whitespace() {
        CharClass::Space
    } else if is_word_char(ch) {
        CharClass::Word
    } else {
        CharClass::Punct
    }
}

fn class_at(buffer: &TextBuffer, pos: Position) -> CharClass {
    buffer
        .char_at(pos)
        .map(class_of)
        .unwrap_or(CharClass::Space)
}

fn is_blank_line(buffer: &TextBuffer, line: usize) -> bool {
    buffer.line_length(line) == 0
}

fn next_pos(buffer: &TextBuffer, pos: Position) -> Option<Position> {
    if pos.col < buffer.line_length(pos.line) {
        Some(Position::new(pos.line, pos.col + 1))
    } else if pos.line < buffer.last_line() {
        Some(Position::new(pos.line + 1, 0))
    } else {
        None
    }
}

fn prev_pos(buffer: &TextBuffer, pos: Position) -> Option<Position> {
    if pos.col > 0 {
        Some(Position::new(pos.line, pos.col - 1))
    } else if pos.line > 0 {
        Some(Position::new(pos.line - 1, buffer.line_length(pos.line - 1)))
    } else {
        None
    }
}

/// `w`: start of the next word
pub fn word_forward(buffer: &TextBuffer, start: Position) -> Position {
    let mut pos = start;

    let class = class_at(buffer, pos);
    if class != CharClass::Space {
        while class_at(buffer, pos) == class {
            match next_pos(buffer, pos) {
                Some(next) => pos = next,
                None => return pos,
            }
        }
    }

    loop {
        if class_at(buffer, pos) != CharClass::Space {
            return pos;
        }
        if pos.line != start.line && is_blank_line(buffer, pos.line) {
            return pos;
        }
        match next_pos(buffer, pos) {
            Some(next) => pos = next,
            None => return pos,
        }
    }
}

/// `e`: last char of the current or next word
pub fn word_end(buffer: &TextBuffer, start: Position) -> Position {
    let Some(mut pos) = next_pos(buffer, start) else {
        return start;
    };

    while class_at(buffer, pos) == CharClass::Space {
        match next_pos(buffer, pos) {
            Some(next) => pos = next,
            None => return start,
        }
    }

    let class = class_at(buffer, pos);
    while let Some(next) = next_pos(buffer, pos) {
        if class_at(buffer, next) != class {
            break;
        }
        pos = next;
    }
    pos
}

/// `b`: start of the current or previous word
pub fn word_backward(buffer: &TextBuffer, start: Position) -> Position {
    let Some(mut pos) = prev_pos(buffer, start) else {
        return start;
    };

    while class_at(buffer, pos) == CharClass::Space {
        if pos.line != start.line && is_blank_line(buffer, pos.line) {
            return pos;
        }
        match prev_pos(buffer, pos) {
            Some(prev) => pos = prev,
            None => return pos,
        }
    }

    let class = class_at(buffer, pos);
    while let Some(prev) = prev_pos(buffer, pos) {
        if prev.line != pos.line || class_at(buffer, prev) != class {
            break;
        }
        pos = prev;
    }
    pos
}

/// Exclusive end of the class run that contains `col`
///
/// Used by `cw`, which changes a word without its trailing whitespace.
pub fn run_end(chars: &[char], col: usize) -> usize {
    let Some(&first) = chars.get(col) else {
        return col;
    };
    let class = class_of(first);
    chars[col..]
        .iter()
        .position(|&ch| class_of(ch) != class)
        .map(|offset| col + offset)
        .unwrap_or(chars.len())
}

/// `^`: first non-whitespace column, 0 for blank lines
pub fn first_non_blank(buffer: &TextBuffer, line: usize) -> usize {
    buffer
        .line(line)
        .and_then(|text| text.chars().position(|ch| !ch.is_whitespace()))
        .unwrap_or(0)
}

/// `f<c>`: column of the `count`-th `target` strictly after `col`
pub fn find_char_forward(chars: &[char], col: usize, target: char, count: usize) -> Option<usize> {
    chars
        .iter()
        .enumerate()
        .skip(col + 1)
        .filter(|&(_, &ch)| ch == target)
        .nth(count.saturating_sub(1))
        .map(|(i, _)| i)
}

/// `F<c>`: column of the `count`-th `target` strictly before `col`
pub fn find_char_backward(
    chars: &[char],
    col: usize,
    target: char,
    count: usize,
) -> Option<usize> {
    chars
        .iter()
        .enumerate()
        .take(col.min(chars.len()))
        .rev()
        .filter(|&(_, &ch)| ch == target)
        .nth(count.saturating_sub(1))
        .map(|(i, _)| i)
}

/// Word under (or after) the cursor on its line
pub fn word_at(chars: &[char], col: usize) -> Option<String> {
    let start = (col..chars.len()).find(|&i| is_word_char(chars[i]))?;
    let start = (0..start)
        .rev()
        .take_while(|&i| is_word_char(chars[i]))
        .last()
        .unwrap_or(start);
    let end = (start..chars.len())
        .find(|&i| !is_word_char(chars[i]))
        .unwrap_or(chars.len());
    Some(chars[start..end].iter().collect())
}

/// Matching quote pair around `col`
///
/// The enclosing pair is found by looking backward then forward from the
/// cursor; when the cursor is not between quotes the first pair on the line
/// is used. Returns the columns of the opening and closing quote.
pub fn quote_span(chars: &[char], col: usize, quote: char) -> Option<(usize, usize)> {
    if chars.is_empty() {
        return None;
    }
    let col = col.min(chars.len() - 1);
    let quotes: Vec<usize> = chars
        .iter()
        .enumerate()
        .filter(|&(_, &ch)| ch == quote)
        .map(|(i, _)| i)
        .collect();

    let enclosing = if chars[col] == quote {
        // On a quote: an odd number of quotes before it makes it a closer
        let before = quotes.iter().filter(|&&i| i < col).count();
        if before % 2 == 1 {
            quotes.iter().rev().find(|&&i| i < col).map(|&open| (open, col))
        } else {
            quotes.iter().find(|&&i| i > col).map(|&close| (col, close))
        }
    } else {
        let open = quotes.iter().rev().find(|&&i| i < col);
        let close = quotes.iter().find(|&&i| i > col);
        open.zip(close).map(|(&open, &close)| (open, close))
    };

    enclosing.or_else(|| match quotes.as_slice() {
        [open, close, ..] => Some((*open, *close)),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer(lines: &[&str]) -> TextBuffer {
        TextBuffer::from_lines(lines.iter().map(|s| String::from(*s)).collect())
    }

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_word_forward_skips_whitespace() {
        let buffer = buffer(&["foo  bar.baz"]);
        assert_eq!(word_forward(&buffer, Position::new(0, 0)), Position::new(0, 5));
        assert_eq!(word_forward(&buffer, Position::new(0, 5)), Position::new(0, 8));
        assert_eq!(word_forward(&buffer, Position::new(0, 8)), Position::new(0, 9));
    }

    #[test]
    fn test_word_forward_crosses_lines() {
        let buffer = buffer(&["foo", "   bar"]);
        assert_eq!(word_forward(&buffer, Position::new(0, 0)), Position::new(1, 3));
    }

    #[test]
    fn test_word_forward_stops_on_blank_line() {
        let buffer = buffer(&["foo", "", "bar"]);
        assert_eq!(word_forward(&buffer, Position::new(0, 1)), Position::new(1, 0));
    }

    #[test]
    fn test_word_forward_end_of_buffer() {
        let buffer = buffer(&["foo bar"]);
        // Lands past the last char; the engine clamps it back onto `r`
        assert_eq!(word_forward(&buffer, Position::new(0, 4)), Position::new(0, 7));
    }

    #[test]
    fn test_word_end() {
        let buffer = buffer(&["foo  bar.baz"]);
        assert_eq!(word_end(&buffer, Position::new(0, 0)), Position::new(0, 2));
        assert_eq!(word_end(&buffer, Position::new(0, 2)), Position::new(0, 7));
        assert_eq!(word_end(&buffer, Position::new(0, 7)), Position::new(0, 8));
    }

    #[test]
    fn test_word_end_crosses_lines() {
        let buffer = buffer(&["ab", "  cd"]);
        assert_eq!(word_end(&buffer, Position::new(0, 1)), Position::new(1, 3));
    }

    #[test]
    fn test_word_backward() {
        let buffer = buffer(&["foo  bar.baz"]);
        assert_eq!(word_backward(&buffer, Position::new(0, 10)), Position::new(0, 9));
        assert_eq!(word_backward(&buffer, Position::new(0, 9)), Position::new(0, 8));
        assert_eq!(word_backward(&buffer, Position::new(0, 8)), Position::new(0, 5));
        assert_eq!(word_backward(&buffer, Position::new(0, 5)), Position::new(0, 0));
        assert_eq!(word_backward(&buffer, Position::new(0, 0)), Position::new(0, 0));
    }

    #[test]
    fn test_word_backward_crosses_lines() {
        let buffer = buffer(&["one two", "  three"]);
        assert_eq!(word_backward(&buffer, Position::new(1, 2)), Position::new(0, 4));
    }

    #[test]
    fn test_run_end() {
        let line = chars("foo  bar");
        assert_eq!(run_end(&line, 0), 3);
        assert_eq!(run_end(&line, 1), 3);
        assert_eq!(run_end(&line, 3), 5);
        assert_eq!(run_end(&line, 5), 8);
    }

    #[test]
    fn test_first_non_blank() {
        let buffer = buffer(&["   indented", "    ", "x"]);
        assert_eq!(first_non_blank(&buffer, 0), 3);
        assert_eq!(first_non_blank(&buffer, 1), 0);
        assert_eq!(first_non_blank(&buffer, 2), 0);
    }

    #[test]
    fn test_find_char() {
        let line = chars("a,b,c,d");
        assert_eq!(find_char_forward(&line, 0, ',', 1), Some(1));
        assert_eq!(find_char_forward(&line, 1, ',', 1), Some(3));
        assert_eq!(find_char_forward(&line, 1, ',', 2), Some(5));
        assert_eq!(find_char_forward(&line, 5, ',', 1), None);
        assert_eq!(find_char_backward(&line, 5, ',', 1), Some(3));
        assert_eq!(find_char_backward(&line, 1, ',', 1), None);
        assert_eq!(find_char_forward(&line, 0, 'z', 1), None);
    }

    #[test]
    fn test_word_at() {
        let line = chars("let foo_bar = 1;");
        assert_eq!(word_at(&line, 6).as_deref(), Some("foo_bar"));
        assert_eq!(word_at(&line, 3).as_deref(), Some("foo_bar"));
        assert_eq!(word_at(&line, 15).as_deref(), None);
        assert_eq!(word_at(&line, 12).as_deref(), Some("1"));
    }

    #[test]
    fn test_quote_span_enclosing() {
        let line = chars(r#"say "hello there" now"#);
        assert_eq!(quote_span(&line, 7, '"'), Some((4, 16)));
        assert_eq!(quote_span(&line, 4, '"'), Some((4, 16)));
        assert_eq!(quote_span(&line, 16, '"'), Some((4, 16)));
    }

    #[test]
    fn test_quote_span_fallback_to_first_pair() {
        let line = chars(r#"x = 'a' + 'b'"#);
        assert_eq!(quote_span(&line, 0, '\''), Some((4, 6)));
        assert_eq!(quote_span(&chars("no quotes"), 2, '"'), None);
        assert_eq!(quote_span(&chars("one \" only"), 0, '"'), None);
    }
}
