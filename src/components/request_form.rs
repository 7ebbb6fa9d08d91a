use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;

use crate::components::Component;
use crate::components::text_input::TextInput;
use crate::events::AppEvent;

/// Free-text request input on the Account view.
pub struct RequestForm {
    pub input: TextInput,
    pub editing: bool,
    pub whitelisted: bool,
}

impl RequestForm {
    pub fn new() -> Self {
        Self {
            input: TextInput::new(),
            editing: false,
            whitelisted: false,
        }
    }
}

impl Component for RequestForm {
    fn handle_key(&mut self, key: KeyEvent) -> Option<AppEvent> {
        if !self.editing {
            return match key.code {
                KeyCode::Char('i') | KeyCode::Enter => {
                    self.editing = true;
                    None
                }
                _ => None,
            };
        }

        match key.code {
            KeyCode::Enter => {
                self.editing = false;
                Some(AppEvent::SubmitRequest(self.input.value().to_string()))
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
        let title = if self.whitelisted {
            "Request (i: edit, Enter: sign & submit)"
        } else {
            "Request (i: edit, Enter: sign & submit; account is not whitelisted)"
        };
        self.input
            .render(frame, area, title, "Type a request...", self.editing);
    }

    fn captures_input(&self) -> bool {
        self.editing
    }
}
