use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::data::types::{TransactionStatus, TxPhase};
use crate::theme::THEME;
use crate::utils;

/// Shows the most recent tracked transaction.
pub struct TxStatusPanel {
    pub status: Option<TransactionStatus>,
}

impl TxStatusPanel {
    pub fn new() -> Self {
        Self { status: None }
    }

    fn lines(&self) -> Vec<Line<'static>> {
        let Some(status) = &self.status else {
            return vec![Line::from(Span::styled(
                "  No transaction yet.",
                THEME.muted_style(),
            ))];
        };

        let phase_style = match status.phase {
            TxPhase::Pending => Style::default().fg(THEME.warning),
            TxPhase::Success => THEME.success_style(),
            TxPhase::Error => THEME.error_style(),
        };

        let mut lines = vec![Line::from(vec![
            Span::styled(format!("  {:<9}", status.phase.to_string()), phase_style.add_modifier(Modifier::BOLD)),
            Span::styled(status.kind.to_string(), Style::default().fg(THEME.text)),
        ])];
        if let Some(hash) = status.hash {
            lines.push(Line::from(vec![
                Span::styled("  Tx       ", THEME.muted_style()),
                Span::styled(format!("{hash}"), THEME.hash_style()),
            ]));
        }
        lines.push(Line::from(Span::styled(
            format!("  {}", utils::escape_control(&status.message)),
            phase_style,
        )));
        lines
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Transaction ")
            .borders(Borders::ALL)
            .border_style(THEME.border_style());
        let paragraph = Paragraph::new(self.lines())
            .block(block)
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, area);
    }
}
