use crossterm::event::KeyEvent;
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::theme::THEME;

const SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "Wallet",
        &[
            ("c", "Connect wallet (switches network if needed)"),
            ("r", "Refresh owner / whitelist status"),
        ],
    ),
    (
        "Views",
        &[
            ("1", "Account and request submission"),
            ("2", "Requests"),
            ("3", "Admin (contract owner only)"),
            ("Esc", "Go back / Stop editing"),
        ],
    ),
    (
        "Editing",
        &[
            ("i/Enter", "Start editing the focused input"),
            ("Enter", "Submit while editing"),
            ("Ctrl+U", "Clear input"),
            ("Tab", "Toggle add / remove (admin)"),
        ],
    ),
    (
        "Requests",
        &[
            ("l", "View latest submitted request"),
            ("a", "View all requests sent by this account"),
            ("x / X", "Export list to CSV / JSON"),
            ("\u{2191}\u{2193}/jk", "Move selection"),
        ],
    ),
    (
        "Other",
        &[("?", "Toggle this help"), ("q", "Quit")],
    ),
];

pub struct HelpOverlay {
    pub visible: bool,
}

impl HelpOverlay {
    pub fn new() -> Self {
        Self { visible: false }
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }

    /// Returns true if it consumed the event
    pub fn handle_key(&mut self, _key: KeyEvent) -> bool {
        if self.visible {
            self.visible = false;
            true
        } else {
            false
        }
    }

    fn lines() -> Vec<Line<'static>> {
        let mut lines = Vec::new();
        for (i, (title, keys)) in SECTIONS.iter().enumerate() {
            if i > 0 {
                lines.push(Line::from(""));
            }
            lines.push(Line::from(Span::styled(
                *title,
                Style::default()
                    .fg(THEME.text_accent)
                    .add_modifier(Modifier::BOLD),
            )));
            for (key, action) in keys.iter() {
                lines.push(Line::from(vec![
                    Span::styled(format!("  {key:<10}"), Style::default().fg(THEME.text_accent)),
                    Span::styled(*action, Style::default().fg(THEME.text)),
                ]));
            }
        }
        lines
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        if !self.visible {
            return;
        }

        let popup_width = area.width * 60 / 100;
        let popup_height = area.height * 80 / 100;
        let x = area.x + (area.width - popup_width) / 2;
        let y = area.y + (area.height - popup_height) / 2;
        let popup_area = Rect::new(x, y, popup_width, popup_height);

        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(" Keyboard Shortcuts ")
            .borders(Borders::ALL)
            .border_style(THEME.border_focused_style())
            .style(Style::default().bg(THEME.surface));

        let paragraph = Paragraph::new(Self::lines())
            .block(block)
            .wrap(Wrap { trim: false });

        frame.render_widget(paragraph, popup_area);
    }
}
