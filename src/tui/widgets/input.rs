//! Single-line text input
//!
//! The cursor counts characters, not bytes, so names with accents or
//! currency symbols edit correctly.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Widget,
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    content: String,
    /// Cursor position in characters
    cursor: usize,
    pub label: String,
    pub placeholder: String,
}

impl TextInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Prefill the input, cursor at the end
    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self.cursor = self.content.chars().count();
        self
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.content
            .char_indices()
            .nth(char_index)
            .map_or(self.content.len(), |(i, _)| i)
    }

    pub fn insert(&mut self, c: char) {
        let at = self.byte_index(self.cursor);
        self.content.insert(at, c);
        self.cursor += 1;
    }

    /// Delete the character before the cursor
    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let at = self.byte_index(self.cursor);
            self.content.remove(at);
        }
    }

    /// Delete the character under the cursor
    pub fn delete(&mut self) {
        if self.cursor < self.content.chars().count() {
            let at = self.byte_index(self.cursor);
            self.content.remove(at);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.content.chars().count());
    }

    pub fn move_start(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.content.chars().count();
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn value(&self) -> &str {
        &self.content
    }
}

impl Widget for &TextInput {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut spans = Vec::new();
        if !self.label.is_empty() {
            spans.push(Span::styled(
                format!("{}: ", self.label),
                Style::default().fg(Color::Cyan),
            ));
        }

        if self.content.is_empty() {
            spans.push(Span::styled(" ", Style::default().bg(Color::Cyan)));
            spans.push(Span::styled(
                format!(" {}", self.placeholder),
                Style::default().fg(Color::DarkGray),
            ));
        } else {
            let before: String = self.content.chars().take(self.cursor).collect();
            let under = self.content.chars().nth(self.cursor).unwrap_or(' ');
            let after: String = self.content.chars().skip(self.cursor + 1).collect();

            let text = Style::default().fg(Color::White);
            spans.push(Span::styled(before, text));
            spans.push(Span::styled(
                under.to_string(),
                Style::default().fg(Color::Black).bg(Color::Cyan),
            ));
            spans.push(Span::styled(after, text));
        }

        Line::from(spans).render(area, buf);
    }
}
