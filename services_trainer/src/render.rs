//! Snapshot rendering

use modal_core::{EditorMode, EditorSnapshot, Position, SelectionKind};

/// Plain-text view of a snapshot
///
/// Provides a simple text-based representation of the editor state
/// suitable for display in a console or test output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextView {
    /// Number of lines to show in viewport
    viewport_lines: usize,
}

impl TextView {
    pub fn new(viewport_lines: usize) -> Self {
        Self { viewport_lines }
    }

    /// Render buffer lines followed by the status line
    ///
    /// The viewport scrolls just far enough to keep the cursor line
    /// visible. Rows past the end of the buffer show `~`.
    pub fn render(&self, snapshot: &EditorSnapshot) -> String {
        let mut output = String::new();
        let top = self.scroll_top(snapshot.cursor.line);

        for row in top..top + self.viewport_lines {
            match snapshot.line(row) {
                Some(line) => {
                    output.push_str(&self.render_line(snapshot, row, line));
                }
                None => output.push('~'),
            }
            output.push('\n');
        }

        output.push_str(&self.render_status(snapshot));
        output
    }

    fn scroll_top(&self, cursor_line: usize) -> usize {
        (cursor_line + 1).saturating_sub(self.viewport_lines.max(1))
    }

    /// Cursor char in `[]`, selected text in `{}`
    fn render_line(&self, snapshot: &EditorSnapshot, row: usize, line: &str) -> String {
        let cursor = snapshot.cursor;
        let selected = |col: usize| {
            snapshot.selection.is_some_and(|selection| {
                let (start, end) = selection.normalized();
                match selection.kind {
                    SelectionKind::Line => (start.line..=end.line).contains(&row),
                    SelectionKind::Char => {
                        (start..=end).contains(&Position::new(row, col))
                    }
                }
            })
        };

        let mut result = String::new();
        let mut in_selection = false;
        for (col, ch) in line.chars().enumerate() {
            let sel = selected(col);
            if sel != in_selection {
                result.push(if sel { '{' } else { '}' });
                in_selection = sel;
            }
            if row == cursor.line && col == cursor.col {
                result.push('[');
                result.push(ch);
                result.push(']');
            } else {
                result.push(ch);
            }
        }
        if in_selection {
            result.push('}');
        }

        // Cursor past the last char
        if row == cursor.line && cursor.col >= line.chars().count() {
            result.push_str("[ ]");
        }
        result
    }

    /// Mode, command buffer and message
    pub fn render_status(&self, snapshot: &EditorSnapshot) -> String {
        let mut status = String::new();

        status.push_str(snapshot.mode.as_str());

        if !snapshot.command_buffer.is_empty() {
            status.push(' ');
            status.push_str(&snapshot.command_buffer);
        }

        if snapshot.mode != EditorMode::Command {
            status.push_str(&format!(
                " {}:{}",
                snapshot.cursor.line + 1,
                snapshot.cursor.col + 1
            ));
        }

        if !snapshot.message.is_empty() {
            status.push_str(" | ");
            status.push_str(&snapshot.message);
        }

        status
    }
}

impl Default for TextView {
    fn default() -> Self {
        Self::new(20)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modal_core::EditorCore;

    fn render(view: &TextView, editor: &EditorCore) -> Vec<String> {
        view.render(&editor.snapshot())
            .lines()
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_render_empty_buffer() {
        let view = TextView::new(3);
        let lines = render(&view, &EditorCore::new());

        assert_eq!(lines.len(), 4); // 3 viewport lines + 1 status line
        assert_eq!(lines[0], "[ ]");
        assert_eq!(lines[1], "~");
        assert_eq!(lines[2], "~");
        assert!(lines[3].starts_with("NORMAL"));
    }

    #[test]
    fn test_render_cursor_position() {
        let view = TextView::new(3);
        let mut editor = EditorCore::with_content("hello\nworld");
        editor.apply_keys("ll").unwrap();

        let lines = render(&view, &editor);
        assert_eq!(lines[0], "he[l]lo");
        assert_eq!(lines[1], "world");
        assert_eq!(lines[3], "NORMAL 1:3");
    }

    #[test]
    fn test_render_insert_cursor_at_line_end() {
        let view = TextView::new(1);
        let mut editor = EditorCore::with_content("héllo");
        editor.apply_keys("A").unwrap();

        let lines = render(&view, &editor);
        assert_eq!(lines[0], "héllo[ ]");
        assert!(lines[1].starts_with("INSERT"));
    }

    #[test]
    fn test_render_selection() {
        let view = TextView::new(2);
        let mut editor = EditorCore::with_content("abcd\nefgh");
        editor.apply_keys("lvl").unwrap();
        assert_eq!(render(&view, &editor)[0], "a{b[c]}d");

        editor.apply_keys("<Esc>Vj").unwrap();
        let lines = render(&view, &editor);
        assert_eq!(lines[0], "{abcd}");
        assert_eq!(lines[1], "{ef[g]h}");
    }

    #[test]
    fn test_render_scrolls_to_cursor() {
        let view = TextView::new(2);
        let mut editor = EditorCore::with_content("1\n2\n3\n4");
        editor.apply_keys("G").unwrap();

        let lines = render(&view, &editor);
        assert_eq!(lines[0], "3");
        assert_eq!(lines[1], "[4]");
    }

    #[test]
    fn test_render_status_command_mode() {
        let view = TextView::new(1);
        let mut editor = EditorCore::new();
        editor.apply_keys(":wq").unwrap();

        assert_eq!(view.render_status(&editor.snapshot()), "COMMAND :wq");
    }

    #[test]
    fn test_render_status_pending_and_message() {
        let view = TextView::new(1);
        let mut editor = EditorCore::with_content("a");
        editor.apply_keys(":w<CR>2d").unwrap();

        let status = view.render_status(&editor.snapshot());
        assert_eq!(status, "NORMAL 2d 1:1 | File written (simulated)");
    }
}
