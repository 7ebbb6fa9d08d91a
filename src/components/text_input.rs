use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::theme::THEME;

/// Single-line editable text with a cursor. The cursor is a char index.
#[derive(Debug, Default)]
pub struct TextInput {
    value: String,
    cursor: usize,
}

impl TextInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    fn byte_index(&self) -> usize {
        self.value
            .char_indices()
            .nth(self.cursor)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }

    fn char_len(&self) -> usize {
        self.value.chars().count()
    }

    /// Apply an editing key. Returns false for keys this input does not handle
    /// (Enter, Esc, Tab) so the owner can act on them.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    let at = self.byte_index();
                    self.value.remove(at);
                }
                true
            }
            KeyCode::Delete => {
                if self.cursor < self.char_len() {
                    let at = self.byte_index();
                    self.value.remove(at);
                }
                true
            }
            KeyCode::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                true
            }
            KeyCode::Right => {
                if self.cursor < self.char_len() {
                    self.cursor += 1;
                }
                true
            }
            KeyCode::Home => {
                self.cursor = 0;
                true
            }
            KeyCode::End => {
                self.cursor = self.char_len();
                true
            }
            KeyCode::Char(c) => {
                if key.modifiers.contains(KeyModifiers::CONTROL) {
                    if c == 'u' {
                        self.clear();
                    }
                } else {
                    let at = self.byte_index();
                    self.value.insert(at, c);
                    self.cursor += 1;
                }
                true
            }
            _ => false,
        }
    }

    /// Render inside a bordered box; places the terminal cursor when `focused`.
    pub fn render(&self, frame: &mut Frame, area: Rect, title: &str, placeholder: &str, focused: bool) {
        let border_style = if focused {
            THEME.border_focused_style()
        } else {
            THEME.border_style()
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(format!(" {title} "));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let text = if self.value.is_empty() {
            Span::styled(placeholder.to_string(), THEME.muted_style())
        } else {
            Span::styled(self.value.clone(), Style::default().fg(THEME.text))
        };
        frame.render_widget(Paragraph::new(text), inner);

        if focused {
            let width: usize = self
                .value
                .chars()
                .take(self.cursor)
                .map(|c| unicode_width(c))
                .sum();
            let cursor_x = inner.x + width as u16;
            if cursor_x < inner.right() {
                frame.set_cursor_position((cursor_x, inner.y));
            }
        }
    }
}

fn unicode_width(c: char) -> usize {
    Span::raw(c.to_string()).width()
}
