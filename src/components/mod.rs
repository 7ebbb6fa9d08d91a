pub mod account_panel;
pub mod admin_panel;
pub mod header;
pub mod help;
pub mod request_form;
pub mod request_list;
pub mod status_bar;
pub mod text_input;
pub mod tx_status;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Rect;

use crate::events::AppEvent;

/// Trait for all UI components
pub trait Component {
    /// Handle a key event, optionally returning an AppEvent
    fn handle_key(&mut self, key: KeyEvent) -> Option<AppEvent>;

    /// Render the component into the given area
    fn render(&mut self, frame: &mut Frame, area: Rect);

    /// Whether the component is editing text and wants every key, global ones included
    fn captures_input(&self) -> bool {
        false
    }
}
