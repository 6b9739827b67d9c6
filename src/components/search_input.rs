//! Single-line filter field.
//!
//! Cursor is a byte index into the buffer and always sits on a UTF-8
//! boundary.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::Rect;
use ratatui::style::Style;
use unicode_width::UnicodeWidthStr;

use crate::components::{Component, ComponentContext};
use crate::theme;
use crate::ui::{UiFrame, safe_set_string};

/// What a key did to the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    Ignored,
    /// Cursor moved; text unchanged.
    Moved,
    /// Text changed.
    Edited,
}

#[derive(Debug, Clone, Default)]
pub struct SearchInput {
    input: String,
    cursor: usize,
    placeholder: String,
}

impl SearchInput {
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            input: String::new(),
            cursor: 0,
            placeholder: placeholder.into(),
        }
    }

    pub fn value(&self) -> &str {
        &self.input
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.input.trim().is_empty()
    }

    /// Replace the text and park the cursor at the end.
    pub fn set_value<S: Into<String>>(&mut self, value: S) {
        self.input = value.into();
        self.cursor = self.input.len();
    }

    pub fn move_left(&mut self) {
        if let Some(prev) = self.input[..self.cursor].chars().last() {
            self.cursor -= prev.len_utf8();
        }
    }

    pub fn move_right(&mut self) {
        if let Some(next) = self.input[self.cursor..].chars().next() {
            self.cursor += next.len_utf8();
        }
    }

    pub fn insert_char(&mut self, c: char) {
        self.input.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn backspace(&mut self) -> bool {
        let Some(prev) = self.input[..self.cursor].chars().last() else {
            return false;
        };
        let start = self.cursor - prev.len_utf8();
        self.input.drain(start..self.cursor);
        self.cursor = start;
        true
    }

    pub fn delete(&mut self) -> bool {
        let Some(next) = self.input[self.cursor..].chars().next() else {
            return false;
        };
        let end = self.cursor + next.len_utf8();
        self.input.drain(self.cursor..end);
        true
    }

    pub fn handle_key(&mut self, key: &KeyEvent) -> InputOutcome {
        let plain = key.modifiers.difference(KeyModifiers::SHIFT).is_empty();
        match key.code {
            KeyCode::Char(c) if plain => {
                self.insert_char(c);
                InputOutcome::Edited
            }
            KeyCode::Char('u') if key.modifiers == KeyModifiers::CONTROL => {
                if self.input.is_empty() {
                    return InputOutcome::Ignored;
                }
                self.set_value("");
                InputOutcome::Edited
            }
            KeyCode::Backspace if self.backspace() => InputOutcome::Edited,
            KeyCode::Delete if self.delete() => InputOutcome::Edited,
            KeyCode::Left if plain => {
                self.move_left();
                InputOutcome::Moved
            }
            KeyCode::Right if plain => {
                self.move_right();
                InputOutcome::Moved
            }
            KeyCode::Home => {
                self.cursor = 0;
                InputOutcome::Moved
            }
            KeyCode::End => {
                self.cursor = self.input.len();
                InputOutcome::Moved
            }
            _ => InputOutcome::Ignored,
        }
    }

    /// Terminal column of the cursor relative to the field's left edge.
    pub fn cursor_column(&self) -> u16 {
        self.input[..self.cursor].width().min(u16::MAX as usize) as u16
    }
}

impl Component for SearchInput {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, ctx: &ComponentContext) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let buffer = frame.buffer_mut();
        let bounds = area.intersection(buffer.area);
        let field = Style::default().bg(theme::input_bg());
        for x in bounds.x..bounds.x.saturating_add(bounds.width) {
            if let Some(cell) = buffer.cell_mut((x, area.y)) {
                cell.set_symbol(" ");
                cell.set_style(field);
            }
        }
        let x = area.x.saturating_add(1);
        if self.input.is_empty() {
            safe_set_string(buffer, bounds, x, area.y, &self.placeholder, field.patch(theme::muted()));
        } else {
            safe_set_string(buffer, bounds, x, area.y, &self.input, field.fg(theme::text()));
        }
        if ctx.focused() {
            let cx = x.saturating_add(self.cursor_column());
            if cx < bounds.x.saturating_add(bounds.width)
                && let Some(cell) = buffer.cell_mut((cx, area.y))
            {
                cell.set_style(theme::cursor());
            }
        }
    }

    fn handle_event(&mut self, event: &Event, ctx: &ComponentContext) -> bool {
        if !ctx.focused() {
            return false;
        }
        match event {
            Event::Key(key) => self.handle_key(key) != InputOutcome::Ignored,
            Event::Paste(text) => {
                for c in text.chars().filter(|c| !c.is_control()) {
                    self.insert_char(c);
                }
                true
            }
            _ => false,
        }
    }
}
