use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::components::Component;
use crate::components::text_input::TextInput;
use crate::events::AppEvent;
use crate::theme::THEME;

/// Owner-only whitelist management.
pub struct AdminPanel {
    pub input: TextInput,
    pub editing: bool,
    /// true adds to the whitelist, false removes.
    pub status: bool,
}

impl AdminPanel {
    pub fn new() -> Self {
        Self {
            input: TextInput::new(),
            editing: false,
            status: true,
        }
    }

    fn mode_line(&self) -> Line<'static> {
        let (add, remove) = if self.status {
            (THEME.selected_style(), THEME.muted_style())
        } else {
            (THEME.muted_style(), THEME.selected_style())
        };
        Line::from(vec![
            Span::styled("  Action: ", THEME.muted_style()),
            Span::styled(" Add ", add),
            Span::raw(" "),
            Span::styled(" Remove ", remove),
            Span::styled("   (Tab to toggle)", THEME.muted_style()),
        ])
    }
}

impl Component for AdminPanel {
    fn handle_key(&mut self, key: KeyEvent) -> Option<AppEvent> {
        if key.code == KeyCode::Tab {
            self.status = !self.status;
            return None;
        }

        if !self.editing {
            if matches!(key.code, KeyCode::Char('i') | KeyCode::Enter) {
                self.editing = true;
            }
            return None;
        }

        match key.code {
            KeyCode::Enter => {
                self.editing = false;
                Some(AppEvent::UpdateWhitelist {
                    address: self.input.value().to_string(),
                    status: self.status,
                })
            }
            KeyCode::Esc => {
                self.editing = false;
                None
            }
            _ => {
                self.input.handle_key(key);
                None
            }
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Whitelist Management ")
            .borders(Borders::ALL)
            .border_style(THEME.border_style());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Length(3)])
            .split(inner);

        frame.render_widget(Paragraph::new(self.mode_line()), chunks[0]);
        self.input.render(
            frame,
            chunks[2],
            "Address (i: edit, Enter: send)",
            "0x...",
            self.editing,
        );
    }

    fn captures_input(&self) -> bool {
        self.editing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_tab_toggles_action() {
        let mut panel = AdminPanel::new();
        assert!(panel.status);
        panel.handle_key(key(KeyCode::Tab));
        assert!(!panel.status);
    }

    #[test]
    fn test_enter_sends_update() {
        let mut panel = AdminPanel::new();
        panel.handle_key(key(KeyCode::Char('i')));
        for c in "abc".chars() {
            panel.handle_key(key(KeyCode::Char(c)));
        }
        panel.handle_key(key(KeyCode::Tab));
        match panel.handle_key(key(KeyCode::Enter)) {
            Some(AppEvent::UpdateWhitelist { address, status }) => {
                assert_eq!(address, "abc");
                assert!(!status);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }
}
