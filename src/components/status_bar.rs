use alloy::primitives::Address;
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::theme::THEME;
use crate::utils;

pub struct StatusBar {
    pub wallet_configured: bool,
    pub account: Option<Address>,
    pub error_message: Option<String>,
    pub info_message: Option<String>,
    pub loading: bool,
}

impl StatusBar {
    pub fn new(wallet_configured: bool) -> Self {
        Self {
            wallet_configured,
            account: None,
            error_message: None,
            info_message: None,
            loading: false,
        }
    }

    pub fn clear_messages(&mut self) {
        self.error_message = None;
        self.info_message = None;
    }

    fn hints() -> Line<'static> {
        let pairs = [
            ("c", ":Connect  "),
            ("r", ":Refresh  "),
            ("1-3", ":Tabs  "),
            ("?", ":Help  "),
            ("q", ":Quit"),
        ];
        let mut spans = vec![Span::raw(" ")];
        for (key, label) in pairs {
            spans.push(Span::styled(key, Style::default().fg(THEME.text_accent)));
            spans.push(Span::styled(label, Style::default().fg(THEME.text_muted)));
        }
        Line::from(spans)
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let bg = Block::default().style(THEME.header_style());
        frame.render_widget(bg, area);

        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(36)])
            .split(area);

        let left_content = if let Some(ref err) = self.error_message {
            Line::from(vec![
                Span::styled(
                    " ! ",
                    Style::default()
                        .fg(THEME.error)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(utils::escape_control(err), Style::default().fg(THEME.warning)),
            ])
        } else if self.loading {
            Line::from(Span::styled(
                " Loading...",
                Style::default().fg(THEME.text_accent),
            ))
        } else if let Some(ref info) = self.info_message {
            Line::from(Span::styled(
                format!(" {}", utils::escape_control(info)),
                THEME.success_style(),
            ))
        } else {
            Self::hints()
        };

        let left = Paragraph::new(left_content).style(THEME.header_style());
        frame.render_widget(left, chunks[0]);

        let (dot_color, status_text) = match (self.wallet_configured, self.account) {
            (false, _) => (THEME.text_muted, "No wallet".to_string()),
            (true, None) => (THEME.error, "Disconnected".to_string()),
            (true, Some(account)) => (THEME.success, utils::truncate_address(&account)),
        };

        let right_content = Line::from(vec![
            Span::styled("\u{25cf} ", Style::default().fg(dot_color)),
            Span::styled(status_text, Style::default().fg(dot_color)),
            Span::raw(" "),
        ]);

        let right = Paragraph::new(right_content)
            .alignment(Alignment::Right)
            .style(THEME.header_style());
        frame.render_widget(right, chunks[1]);
    }
}
