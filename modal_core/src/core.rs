//! EditorCore state machine
//!
//! One engine owns one buffer. Keys are interpreted against the current mode,
//! state is mutated in place, and the change hook sees a fresh snapshot after
//! every consumed key.

use std::fmt;
use std::time::Duration;

use input_types::{parse_keys, Key, KeyEvent, KeyNotationError};
use tracing::debug;

use crate::{
    buffer::{Position, TextBuffer},
    command::{parse_command, Command, SubstituteRange, Substitution},
    config::EngineConfig,
    mode::{EditorMode, Mode, PendingKeys, Selection, SelectionKind},
    motion,
    pending::{push_digit, resolve, MultiKey, PendingCommand, Prefix, Resolution},
    register::{RegisterContent, Registers, UNNAMED},
    search::{find_match, Direction},
    snapshot::EditorSnapshot,
};

const UNDO_UNSUPPORTED: &str = "Undo is not supported in this editor";
const REDO_UNSUPPORTED: &str = "Redo is not supported in this editor";

/// Change hook, called with the new state after every mutation
pub type ChangeHook = Box<dyn FnMut(&EditorSnapshot)>;

/// Editor core state machine
pub struct EditorCore {
    config: EngineConfig,
    mode: Mode,
    buffer: TextBuffer,
    cursor: Position,
    registers: Registers,
    last_search: Option<String>,
    message: String,
    /// Logical clock, advanced by [`EditorCore::tick`]
    now: Duration,
    on_change: Option<ChangeHook>,
}

impl EditorCore {
    /// Create a new empty editor
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            config,
            mode: Mode::normal(),
            buffer: TextBuffer::new(),
            cursor: Position::zero(),
            registers: Registers::new(),
            last_search: None,
            message: String::new(),
            now: Duration::ZERO,
            on_change: None,
        }
    }

    /// Create an editor holding `content`
    pub fn with_content(content: &str) -> Self {
        let mut editor = Self::new();
        editor.buffer = TextBuffer::from_string(content);
        editor
    }

    /// Handle a host key event
    ///
    /// Returns true when the key was consumed; the event's default action is
    /// then suppressed and the change hook fires.
    pub fn handle_key(&mut self, event: &mut KeyEvent) -> bool {
        let expired = self.expire_pending();

        let consumed = match self.mode.kind() {
            EditorMode::Normal => self.handle_normal_mode(event),
            EditorMode::Insert => self.handle_insert_mode(event),
            EditorMode::Visual => self.handle_visual_mode(event),
            EditorMode::Command => self.handle_command_mode(event),
        };

        if consumed {
            event.prevent_default();
        }
        if consumed || expired {
            self.notify();
        }
        consumed
    }

    /// Apply an unmodified key
    pub fn apply_key(&mut self, key: Key) -> bool {
        let mut event = match key {
            Key::Char(ch) => KeyEvent::char(ch),
            other => KeyEvent::plain(other),
        };
        self.handle_key(&mut event)
    }

    /// Apply a key-notation script such as `3dd<Esc>`
    ///
    /// Returns how many keys were consumed.
    pub fn apply_keys(&mut self, notation: &str) -> Result<usize, KeyNotationError> {
        let events = parse_keys(notation)?;
        Ok(events
            .into_iter()
            .map(|mut event| self.handle_key(&mut event))
            .filter(|consumed| *consumed)
            .count())
    }

    /// Advance the logical clock
    ///
    /// Expires a pending prefix whose deadline has passed. Returns true when
    /// that changed state.
    pub fn tick(&mut self, now: Duration) -> bool {
        self.now = self.now.max(now);
        let expired = self.expire_pending();
        if expired {
            self.notify();
        }
        expired
    }

    /// Advance the logical clock by `elapsed`
    pub fn advance(&mut self, elapsed: Duration) -> bool {
        self.tick(self.now.saturating_add(elapsed))
    }

    /// Get a complete snapshot of editor state
    pub fn snapshot(&self) -> EditorSnapshot {
        EditorSnapshot {
            mode: self.mode.kind(),
            cursor: self.cursor,
            lines: self.buffer.lines().to_vec(),
            selection: self.mode.selection(),
            command_buffer: self.mode.command_buffer(),
            registers: self.registers.as_map().clone(),
            last_search: self.last_search.clone(),
            message: self.message.clone(),
        }
    }

    /// Install the change hook, replacing any previous one
    pub fn subscribe(&mut self, hook: impl FnMut(&EditorSnapshot) + 'static) {
        self.on_change = Some(Box::new(hook));
    }

    pub fn unsubscribe(&mut self) {
        self.on_change = None;
    }

    /// Replace the buffer wholesale
    ///
    /// Resets cursor, mode, selection and command buffer. Registers, the
    /// last search and the message survive.
    pub fn load_content(&mut self, content: &str) {
        self.load_lines(content.lines().map(String::from).collect());
    }

    pub fn load_lines(&mut self, lines: Vec<String>) {
        self.buffer = TextBuffer::from_lines(lines);
        self.cursor = Position::zero();
        self.set_mode(Mode::normal());
        debug!(lines = self.buffer.line_count(), "content loaded");
        self.notify();
    }

    /// Move the cursor, clamped like any motion
    pub fn set_cursor(&mut self, pos: Position) {
        self.move_to(pos);
        self.notify();
    }

    // Public accessors for rendering/testing

    pub fn mode(&self) -> EditorMode {
        self.mode.kind()
    }

    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    pub fn cursor(&self) -> Position {
        self.cursor
    }

    pub fn selection(&self) -> Option<Selection> {
        self.mode.selection()
    }

    pub fn command_buffer(&self) -> String {
        self.mode.command_buffer()
    }

    pub fn registers(&self) -> &Registers {
        &self.registers
    }

    pub fn last_search(&self) -> Option<&str> {
        self.last_search.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    // Private mode handlers

    fn handle_normal_mode(&mut self, event: &KeyEvent) -> bool {
        if event.modifiers.has_command_modifier() {
            return match event.key {
                Key::Char('r') if event.modifiers.is_ctrl() => {
                    self.set_message(REDO_UNSUPPORTED);
                    true
                }
                _ => false,
            };
        }

        let Mode::Normal(keys) = &mut self.mode else {
            return false;
        };
        let PendingKeys { pending, count } = std::mem::take(keys);

        // A pending r/f/F takes the next char as its argument, digits included
        if let Some(pending) = pending {
            if let Key::Char(ch) = event.key {
                match resolve(pending.prefix, ch) {
                    Resolution::Command(command) => {
                        self.run_multi_key(command, count.unwrap_or(1));
                        return true;
                    }
                    Resolution::Prefix(prefix) => {
                        self.set_pending(Some(prefix), count);
                        return true;
                    }
                    Resolution::NoMatch => {}
                }
            }
            // Count and prefix are both cleared; the key runs on its own
            debug!(prefix = pending.prefix.keys(), "prefix dropped");
            return self.run_single_key(event.key, 1);
        }

        if let Key::Char(ch) = event.key {
            if let Some(digit) = ch.to_digit(10) {
                if digit != 0 || count.is_some() {
                    self.set_pending(None, Some(push_digit(count, digit)));
                    return true;
                }
            }

            if let Some(prefix) = Prefix::from_key(ch) {
                self.set_pending(Some(prefix), count);
                return true;
            }
        }

        self.run_single_key(event.key, count.unwrap_or(1))
    }

    fn handle_insert_mode(&mut self, event: &KeyEvent) -> bool {
        if event.modifiers.has_command_modifier() {
            return false;
        }

        match event.key {
            Key::Escape => {
                // Cursor steps back onto the last inserted char
                self.cursor.col = self.cursor.col.saturating_sub(1);
                self.set_mode(Mode::normal());
                self.clamp_cursor();
            }
            Key::Enter => {
                if self.buffer.insert_newline(self.cursor) {
                    self.cursor = Position::new(self.cursor.line + 1, 0);
                }
            }
            Key::Backspace => {
                if let Some(new_pos) = self.buffer.backspace(self.cursor) {
                    self.cursor = new_pos;
                }
            }
            Key::Delete => {
                self.buffer.delete_char(self.cursor);
            }
            Key::Tab => {
                let spaces = " ".repeat(self.config.tab_width);
                self.cursor = self.buffer.insert_str(self.cursor, &spaces);
            }
            Key::Char(ch) => {
                if self.buffer.insert_char(self.cursor, ch) {
                    self.cursor.col += 1;
                }
            }
            Key::Left | Key::Right | Key::Up | Key::Down | Key::Home | Key::End => {
                if let Some(target) = self.motion_target(event.key, 1) {
                    self.move_to(target);
                }
            }
            Key::Unidentified => return false,
        }
        true
    }

    fn handle_visual_mode(&mut self, event: &KeyEvent) -> bool {
        if event.modifiers.has_command_modifier() {
            return false;
        }
        let Mode::Visual { selection, keys } = &mut self.mode else {
            return false;
        };
        let selection = *selection;
        let PendingKeys { pending, count } = std::mem::take(keys);

        // Only motion prefixes are held here, so a match is always a motion
        if let Some(pending) = pending {
            if let Key::Char(ch) = event.key {
                if let Resolution::Command(command) = resolve(pending.prefix, ch) {
                    self.run_multi_key(command, count.unwrap_or(1));
                    return true;
                }
            }
            debug!(prefix = pending.prefix.keys(), "prefix dropped");
            return self.run_visual_key(selection, event.key, 1);
        }

        if let Key::Char(ch) = event.key {
            if let Some(digit) = ch.to_digit(10) {
                if digit != 0 || count.is_some() {
                    self.set_pending(None, Some(push_digit(count, digit)));
                    return true;
                }
            }

            if let Some(prefix) = Prefix::from_visual_key(ch) {
                self.set_pending(Some(prefix), count);
                return true;
            }
        }

        self.run_visual_key(selection, event.key, count.unwrap_or(1))
    }

    fn run_visual_key(&mut self, selection: Selection, key: Key, count: usize) -> bool {
        if let Some(target) = self.motion_target(key, count) {
            self.move_to(target);
            return true;
        }

        match key {
            Key::Escape => {
                self.set_mode(Mode::normal());
                self.clamp_cursor();
            }
            Key::Char('o') => {
                let swapped = selection.swapped();
                self.cursor = swapped.end;
                self.mode = Mode::visual(swapped);
            }
            Key::Char('d') | Key::Char('x') | Key::Delete => self.delete_selection(selection),
            Key::Char('y') => self.yank_selection(selection),
            Key::Char('c') => self.change_selection(selection),
            _ => return false,
        }
        true
    }

    fn handle_command_mode(&mut self, event: &KeyEvent) -> bool {
        if event.modifiers.has_command_modifier() {
            return false;
        }
        let Mode::Command(line) = &mut self.mode else {
            return false;
        };

        match event.key {
            Key::Escape => self.set_mode(Mode::normal()),
            Key::Enter => {
                let line = std::mem::take(line);
                self.set_mode(Mode::normal());
                self.execute_command_line(&line);
                self.clamp_cursor();
            }
            Key::Backspace => {
                // Only the trigger left: leave command mode
                if line.chars().count() <= 1 {
                    self.set_mode(Mode::normal());
                } else {
                    line.pop();
                }
            }
            Key::Char(ch) => line.push(ch),
            _ => return false,
        }
        true
    }

    // Normal-mode dispatch

    fn run_single_key(&mut self, key: Key, count: usize) -> bool {
        if let Some(target) = self.motion_target(key, count) {
            self.move_to(target);
            return true;
        }

        let line = self.cursor.line;
        match key {
            Key::Escape => {}

            // Enter insert mode
            Key::Char('i') => self.set_mode(Mode::Insert),
            Key::Char('a') => {
                if self.buffer.line_length(line) > 0 {
                    self.cursor.col += 1;
                }
                self.set_mode(Mode::Insert);
            }
            Key::Char('A') => {
                self.cursor.col = self.buffer.line_length(line);
                self.set_mode(Mode::Insert);
            }
            Key::Char('I') => {
                self.cursor.col = motion::first_non_blank(&self.buffer, line);
                self.set_mode(Mode::Insert);
            }
            Key::Char('o') => {
                self.buffer.insert_lines(line + 1, vec![String::new()]);
                self.cursor = Position::new(line + 1, 0);
                self.set_mode(Mode::Insert);
            }
            Key::Char('O') => {
                self.buffer.insert_lines(line, vec![String::new()]);
                self.cursor = Position::new(line, 0);
                self.set_mode(Mode::Insert);
            }
            Key::Char('s') => {
                self.delete_chars_forward(count);
                self.set_mode(Mode::Insert);
            }
            Key::Char('S') => self.change_lines(line, count),
            Key::Char('C') => {
                self.delete_to_line_end();
                self.set_mode(Mode::Insert);
            }

            // Editing
            Key::Char('x') | Key::Delete => {
                self.delete_chars_forward(count);
                self.clamp_cursor();
            }
            Key::Char('X') => self.delete_chars_backward(count),
            Key::Char('D') => {
                self.delete_to_line_end();
                self.clamp_cursor();
            }
            Key::Char('p') => self.paste(true, count),
            Key::Char('P') => self.paste(false, count),
            Key::Char('J') => self.join_lines(count),

            // Visual mode
            Key::Char('v') => self.set_mode(Mode::visual(Selection::char_at(self.cursor))),
            Key::Char('V') => {
                let last_col = self.buffer.max_col(line, false);
                self.set_mode(Mode::visual(Selection::line_at(line, last_col)));
            }

            // Command line
            Key::Char(trigger @ (':' | '/')) => self.set_mode(Mode::Command(trigger.to_string())),

            // Search
            Key::Char('n') => self.repeat_search(Direction::Forward, count),
            Key::Char('N') => self.repeat_search(Direction::Backward, count),
            Key::Char('*') => self.search_word_under_cursor(),

            Key::Char('u') => self.set_message(UNDO_UNSUPPORTED),

            _ => return false,
        }
        true
    }

    fn run_multi_key(&mut self, command: MultiKey, count: usize) {
        let line = self.cursor.line;
        match command {
            MultiKey::DeleteLines => self.delete_lines(line, count),
            MultiKey::YankLines => self.yank_lines(line, count),
            MultiKey::ChangeLines => self.change_lines(line, count),
            MultiKey::DeleteWord => {
                self.delete_word(count);
                self.clamp_cursor();
            }
            MultiKey::ChangeWord => {
                self.change_word(count);
                self.set_mode(Mode::Insert);
            }
            MultiKey::GotoFirstLine => self.move_to(Position::new(0, 0)),
            MultiKey::DeleteInner(quote) => {
                if self.delete_inside_quotes(quote) {
                    self.clamp_cursor();
                }
            }
            MultiKey::ChangeInner(quote) => {
                if self.delete_inside_quotes(quote) {
                    self.set_mode(Mode::Insert);
                }
            }
            MultiKey::Replace(ch) => {
                if self.buffer.delete_char(self.cursor) {
                    self.buffer.insert_char(self.cursor, ch);
                }
            }
            MultiKey::FindForward(target) => {
                let chars = self.buffer.line_chars(line);
                let col = self.cursor.col;
                if let Some(col) = motion::find_char_forward(&chars, col, target, count) {
                    self.move_to(Position::new(line, col));
                }
            }
            MultiKey::FindBackward(target) => {
                let chars = self.buffer.line_chars(line);
                let col = self.cursor.col;
                if let Some(col) = motion::find_char_backward(&chars, col, target, count) {
                    self.move_to(Position::new(line, col));
                }
            }
        }
    }

    /// Destination of a motion key, or `None` if the key is not a motion
    fn motion_target(&self, key: Key, count: usize) -> Option<Position> {
        let Position { line, col } = self.cursor;
        let last_line = self.buffer.last_line();

        let target = match key {
            Key::Char('h') | Key::Left => Position::new(line, col.saturating_sub(count)),
            Key::Char('l') | Key::Right => Position::new(line, col.saturating_add(count)),
            Key::Char('j') | Key::Down => {
                Position::new(line.saturating_add(count).min(last_line), col)
            }
            Key::Char('k') | Key::Up => Position::new(line.saturating_sub(count), col),
            Key::Char('w') => self.repeat_motion(count, motion::word_forward),
            Key::Char('b') => self.repeat_motion(count, motion::word_backward),
            Key::Char('e') => self.repeat_motion(count, motion::word_end),
            Key::Char('0') | Key::Home => Position::new(line, 0),
            Key::Char('^') => Position::new(line, motion::first_non_blank(&self.buffer, line)),
            Key::Char('$') | Key::End => Position::new(line, usize::MAX),
            Key::Char('G') => Position::new(last_line, col),
            _ => return None,
        };
        Some(target)
    }

    /// Apply `step` up to `count` times, stopping once the cursor stalls
    fn repeat_motion(&self, count: usize, step: fn(&TextBuffer, Position) -> Position) -> Position {
        let mut pos = self.cursor;
        for _ in 0..count {
            let next = step(&self.buffer, pos);
            if next == pos {
                break;
            }
            pos = next;
        }
        pos
    }

    // Cursor management

    fn move_to(&mut self, pos: Position) {
        self.cursor = pos;
        self.clamp_cursor();
        if let Mode::Visual { selection, .. } = &mut self.mode {
            selection.end = self.cursor;
        }
    }

    fn clamp_cursor(&mut self) {
        let line = self.cursor.line.min(self.buffer.last_line());
        let max_col = self
            .buffer
            .max_col(line, self.mode.kind() == EditorMode::Insert);
        self.cursor = Position::new(line, self.cursor.col.min(max_col));
    }

    fn set_mode(&mut self, mode: Mode) {
        let from = self.mode.kind();
        let to = mode.kind();
        if from != to {
            debug!(from = from.as_str(), to = to.as_str(), "mode change");
        }
        self.mode = mode;
    }

    fn set_pending(&mut self, prefix: Option<Prefix>, count: Option<usize>) {
        let pending = prefix
            .map(|prefix| PendingCommand::new(prefix, self.now, self.config.prefix_timeout()));
        if let Some(keys) = self.mode.pending_keys() {
            *keys = PendingKeys { pending, count };
        }
    }

    /// Clear a pending prefix whose deadline has passed
    fn expire_pending(&mut self) -> bool {
        let now = self.now;
        let Some(keys) = self.mode.pending_keys() else {
            return false;
        };
        match keys.pending.filter(|pending| pending.is_expired(now)) {
            Some(pending) => {
                keys.pending = None;
                debug!(prefix = pending.prefix.keys(), "pending prefix expired");
                true
            }
            None => false,
        }
    }

    fn set_message(&mut self, message: impl Into<String>) {
        self.message = message.into();
    }

    fn notify(&mut self) {
        if self.on_change.is_some() {
            let snapshot = self.snapshot();
            if let Some(hook) = self.on_change.as_mut() {
                hook(&snapshot);
            }
        }
    }

    // Edit and register operations

    fn delete_chars_forward(&mut self, count: usize) {
        let Position { line, col } = self.cursor;
        let len = self.buffer.line_length(line);
        if col >= len {
            return;
        }
        let end = col.saturating_add(count).min(len);
        let text = self.buffer.delete_range(line, col, end);
        self.registers.store(UNNAMED, text);
    }

    fn delete_chars_backward(&mut self, count: usize) {
        let Position { line, col } = self.cursor;
        if col == 0 {
            return;
        }
        let start = col.saturating_sub(count);
        let text = self.buffer.delete_range(line, start, col);
        self.registers.store(UNNAMED, text);
        self.cursor.col = start;
        self.clamp_cursor();
    }

    fn delete_to_line_end(&mut self) {
        let Position { line, col } = self.cursor;
        let len = self.buffer.line_length(line);
        if col >= len {
            return;
        }
        let text = self.buffer.delete_range(line, col, len);
        self.registers.store(UNNAMED, text);
    }

    fn delete_lines(&mut self, line: usize, count: usize) {
        let removed = self.buffer.delete_lines(line, count);
        if removed.is_empty() {
            return;
        }
        self.registers.store_lines(UNNAMED, &removed);
        let line = line.min(self.buffer.last_line());
        self.cursor = Position::new(line, motion::first_non_blank(&self.buffer, line));
        self.clamp_cursor();
    }

    fn yank_lines(&mut self, line: usize, count: usize) {
        let end = line.saturating_add(count).min(self.buffer.line_count());
        let lines = &self.buffer.lines()[line..end];
        self.registers.store_lines(UNNAMED, lines);
        let yanked = lines.len();
        self.set_message(if yanked == 1 {
            "1 line yanked".to_string()
        } else {
            format!("{yanked} lines yanked")
        });
    }

    /// Replace whole lines with one empty line and start inserting there
    fn change_lines(&mut self, line: usize, count: usize) {
        let removed = self.buffer.delete_lines(line, count);
        self.registers.store_lines(UNNAMED, &removed);
        if self.buffer.is_empty() {
            self.cursor = Position::zero();
        } else {
            self.buffer.insert_lines(line, vec![String::new()]);
            self.cursor = Position::new(line, 0);
        }
        self.set_mode(Mode::Insert);
    }

    /// `dw`: word plus trailing whitespace, never past the end of the line
    fn delete_word(&mut self, count: usize) {
        let Position { line, col } = self.cursor;
        let len = self.buffer.line_length(line);
        if col >= len {
            return;
        }
        let target = self.repeat_motion(count, motion::word_forward);
        let end = if target.line == line { target.col } else { len };
        let text = self.buffer.delete_range(line, col, end);
        self.registers.store(UNNAMED, text);
    }

    /// `cw`: word without trailing whitespace
    fn change_word(&mut self, count: usize) {
        let Position { line, col } = self.cursor;
        let chars = self.buffer.line_chars(line);
        if col >= chars.len() {
            return;
        }

        let mut end = motion::run_end(&chars, col);
        for _ in 1..count {
            let next = motion::word_end(&self.buffer, Position::new(line, end - 1));
            if next.line != line {
                end = chars.len();
                break;
            }
            if next.col < end {
                break;
            }
            end = next.col + 1;
        }

        let text = self.buffer.delete_range(line, col, end);
        self.registers.store(UNNAMED, text);
    }

    /// Delete between a quote pair; false when the line has no pair
    fn delete_inside_quotes(&mut self, quote: char) -> bool {
        let Position { line, col } = self.cursor;
        let chars = self.buffer.line_chars(line);
        let Some((open, close)) = motion::quote_span(&chars, col, quote) else {
            return false;
        };

        let text = self.buffer.delete_range(line, open + 1, close);
        self.registers.store(UNNAMED, text);
        self.cursor = Position::new(line, open + 1);
        true
    }

    fn join_lines(&mut self, count: usize) {
        let line = self.cursor.line;
        let mut join_col = None;
        for _ in 0..count.max(2) - 1 {
            match self.buffer.join_lines(line) {
                Some(col) => join_col = Some(col),
                None => break,
            }
        }
        if let Some(col) = join_col {
            self.move_to(Position::new(line, col));
        }
    }

    fn paste(&mut self, after: bool, count: usize) {
        let Some(content) = self.registers.content(UNNAMED) else {
            return;
        };
        let line = self.cursor.line;

        match content {
            RegisterContent::Lines(lines) => {
                let mut block = Vec::with_capacity(lines.len().saturating_mul(count));
                for _ in 0..count {
                    block.extend(lines.iter().map(|s| String::from(*s)));
                }
                let at = if after { line + 1 } else { line };
                self.buffer.insert_lines(at, block);
                let col = motion::first_non_blank(&self.buffer, at);
                self.move_to(Position::new(at, col));
            }
            RegisterContent::Chars(text) => {
                let text = text.repeat(count);
                let col = if after && self.buffer.line_length(line) > 0 {
                    self.cursor.col + 1
                } else {
                    self.cursor.col
                };
                let end = self.buffer.insert_str(Position::new(line, col), &text);
                self.move_to(Position::new(end.line, end.col.saturating_sub(1)));
            }
        }
    }

    // Visual operations

    fn delete_selection(&mut self, selection: Selection) {
        let (start, end) = selection.normalized();
        self.set_mode(Mode::normal());
        match selection.kind {
            SelectionKind::Char => {
                let text = self.buffer.delete_span(start, end);
                self.registers.store(UNNAMED, text);
                self.move_to(start);
            }
            SelectionKind::Line => self.delete_lines(start.line, end.line - start.line + 1),
        }
    }

    fn yank_selection(&mut self, selection: Selection) {
        let (start, end) = selection.normalized();
        self.set_mode(Mode::normal());
        match selection.kind {
            SelectionKind::Char => {
                let text = self.buffer.text_span(start, end);
                self.registers.store(UNNAMED, text);
            }
            SelectionKind::Line => self.yank_lines(start.line, end.line - start.line + 1),
        }
        self.move_to(start);
    }

    fn change_selection(&mut self, selection: Selection) {
        let (start, end) = selection.normalized();
        match selection.kind {
            SelectionKind::Char => {
                let text = self.buffer.delete_span(start, end);
                self.registers.store(UNNAMED, text);
                self.set_mode(Mode::Insert);
                self.move_to(start);
            }
            SelectionKind::Line => self.change_lines(start.line, end.line - start.line + 1),
        }
    }

    // Command line and search

    fn execute_command_line(&mut self, line: &str) {
        let mut chars = line.chars();
        match chars.next() {
            Some(':') => self.execute_command(chars.as_str()),
            Some('/') => {
                let typed = chars.as_str();
                if !typed.is_empty() {
                    self.last_search = Some(typed.to_string());
                }
                self.repeat_search(Direction::Forward, 1);
            }
            _ => {}
        }
    }

    fn execute_command(&mut self, input: &str) {
        let Some(command) = parse_command(input) else {
            debug!(input, "command ignored");
            return;
        };
        debug!(?command, "execute command");

        match command {
            Command::Write => self.set_message("File written (simulated)"),
            Command::Quit => self.set_message("Quit (simulated)"),
            Command::WriteQuit => self.set_message("File written and quit (simulated)"),
            Command::GotoLine(number) => {
                let line = number.saturating_sub(1);
                self.move_to(Position::new(line, 0));
            }
            Command::Substitute(substitution) => self.substitute(&substitution),
            Command::Unknown(name) => self.set_message(format!("Not an editor command: {name}")),
        }
    }

    fn substitute(&mut self, substitution: &Substitution) {
        let lines = match substitution.range {
            SubstituteRange::CurrentLine => self.cursor.line..self.cursor.line + 1,
            SubstituteRange::AllLines => 0..self.buffer.line_count(),
        };

        let mut changed = 0;
        for line in lines {
            let Some(text) = self.buffer.line(line) else {
                continue;
            };
            if let Some(replaced) = substitution.apply(text) {
                self.buffer.set_line(line, replaced);
                changed += 1;
            }
        }

        if changed == 0 {
            self.set_message(format!("Pattern not found: {}", substitution.search));
        }
    }

    fn repeat_search(&mut self, direction: Direction, count: usize) {
        let Some(pattern) = self.last_search.clone() else {
            self.set_message("No previous search pattern");
            return;
        };

        let mut pos = self.cursor;
        for _ in 0..count {
            match find_match(&self.buffer, pos, &pattern, direction) {
                // A lone match wraps onto itself
                Some(found) if found == pos => break,
                Some(found) => pos = found,
                None => {
                    self.set_message(format!("Pattern not found: {pattern}"));
                    return;
                }
            }
        }
        self.move_to(pos);
    }

    fn search_word_under_cursor(&mut self) {
        let chars = self.buffer.line_chars(self.cursor.line);
        if let Some(word) = motion::word_at(&chars, self.cursor.col) {
            self.last_search = Some(word);
            self.repeat_search(Direction::Forward, 1);
        }
    }
}

impl Default for EditorCore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EditorCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditorCore")
            .field("mode", &self.mode)
            .field("cursor", &self.cursor)
            .field("lines", &self.buffer.line_count())
            .field("registers", &self.registers)
            .field("last_search", &self.last_search)
            .field("message", &self.message)
            .field("now", &self.now)
            .field("subscribed", &self.on_change.is_some())
            .finish()
    }
}
