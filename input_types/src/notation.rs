//! Compact key notation
//!
//! Scripts key sequences the way they are written in editor documentation:
//! printable characters stand for themselves and special keys are spelled in
//! angle brackets, e.g. `3dd<Esc>:s/a/b/g<CR>`.
//!
//! | notation             | key            |
//! |----------------------|----------------|
//! | `<Esc>`              | Escape         |
//! | `<CR>` / `<Enter>`   | Enter          |
//! | `<BS>`               | Backspace      |
//! | `<Del>`              | Delete         |
//! | `<Tab>`              | Tab            |
//! | `<Left>` `<Right>` `<Up>` `<Down>` | arrows |
//! | `<Home>` `<End>`     | Home / End     |
//! | `<Space>`            | `' '`          |
//! | `<lt>`               | `'<'`          |
//! | `<C-x>`              | Ctrl + `x`     |

use crate::{Key, KeyEvent, Modifiers};
use thiserror::Error;

/// Key notation error
#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyNotationError {
    #[error("Unterminated key name starting at offset {0}")]
    Unterminated(usize),

    #[error("Unknown key name: <{0}>")]
    UnknownKey(String),
}

/// Parse a notation string into key events
pub fn parse_keys(input: &str) -> Result<Vec<KeyEvent>, KeyNotationError> {
    let mut events = Vec::new();
    let mut rest = input;
    let mut offset = 0;

    while let Some(ch) = rest.chars().next() {
        if ch != '<' {
            events.push(KeyEvent::char(ch));
            rest = &rest[ch.len_utf8()..];
            offset += ch.len_utf8();
            continue;
        }

        let close = rest
            .find('>')
            .ok_or(KeyNotationError::Unterminated(offset))?;
        let name = &rest[1..close];
        events.push(parse_named(name)?);
        rest = &rest[close + 1..];
        offset += close + 1;
    }

    Ok(events)
}

fn parse_named(name: &str) -> Result<KeyEvent, KeyNotationError> {
    if let Some(ctrl) = name
        .strip_prefix("C-")
        .or_else(|| name.strip_prefix("c-"))
    {
        let mut chars = ctrl.chars();
        return match (chars.next(), chars.next()) {
            (Some(ch), None) => Ok(KeyEvent::ctrl(ch)),
            _ => Err(KeyNotationError::UnknownKey(name.into())),
        };
    }

    let key = match name.to_ascii_lowercase().as_str() {
        "esc" | "escape" => Key::Escape,
        "cr" | "enter" | "return" => Key::Enter,
        "bs" | "backspace" => Key::Backspace,
        "del" | "delete" => Key::Delete,
        "tab" => Key::Tab,
        "left" => Key::Left,
        "right" => Key::Right,
        "up" => Key::Up,
        "down" => Key::Down,
        "home" => Key::Home,
        "end" => Key::End,
        "space" => Key::Char(' '),
        "lt" => Key::Char('<'),
        _ => return Err(KeyNotationError::UnknownKey(name.into())),
    };

    Ok(KeyEvent::new(key, Modifiers::none()))
}

/// Render key events back into notation
pub fn format_keys(events: &[KeyEvent]) -> String {
    let mut out = String::new();
    for event in events {
        match event.key {
            Key::Char(ch) if event.modifiers.is_ctrl() => {
                out.push_str("<C-");
                out.push(ch);
                out.push('>');
            }
            Key::Char('<') => out.push_str("<lt>"),
            Key::Char(ch) => out.push(ch),
            Key::Escape => out.push_str("<Esc>"),
            Key::Enter => out.push_str("<CR>"),
            Key::Backspace => out.push_str("<BS>"),
            Key::Delete => out.push_str("<Del>"),
            Key::Tab => out.push_str("<Tab>"),
            Key::Left => out.push_str("<Left>"),
            Key::Right => out.push_str("<Right>"),
            Key::Up => out.push_str("<Up>"),
            Key::Down => out.push_str("<Down>"),
            Key::Home => out.push_str("<Home>"),
            Key::End => out.push_str("<End>"),
            Key::Unidentified => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_chars() {
        let events = parse_keys("3dd").unwrap();
        assert_eq!(
            events,
            vec![KeyEvent::char('3'), KeyEvent::char('d'), KeyEvent::char('d')]
        );
    }

    #[test]
    fn test_parse_named_keys() {
        let events = parse_keys("ihi<Esc>:w<CR>").unwrap();
        assert_eq!(events.len(), 7);
        assert_eq!(events[3].key, Key::Escape);
        assert_eq!(events[6].key, Key::Enter);
    }

    #[test]
    fn test_parse_ctrl_and_lt() {
        let events = parse_keys("<C-r><lt><space>").unwrap();
        assert_eq!(events[0], KeyEvent::ctrl('r'));
        assert_eq!(events[1].key, Key::Char('<'));
        assert_eq!(events[2].key, Key::Char(' '));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse_keys("ab<Esc"), Err(KeyNotationError::Unterminated(2)));
        assert_eq!(
            parse_keys("<Nope>"),
            Err(KeyNotationError::UnknownKey("Nope".into()))
        );
    }

    #[test]
    fn test_format_keys() {
        let events = parse_keys("ci\"x<Esc><C-r><lt>").unwrap();
        assert_eq!(format_keys(&events), "ci\"x<Esc><C-r><lt>");
    }
}
