use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::theme::THEME;
use crate::utils;

pub struct Header {
    pub latest_block: Option<u64>,
    pub current_tab: usize,
    pub show_admin: bool,
    pub chain_name: String,
}

const TABS: &[&str] = &["Account [1]", "Requests [2]"];
const ADMIN_TAB: &str = "Admin [3]";

impl Header {
    pub fn new(chain_name: &str) -> Self {
        Self {
            latest_block: None,
            current_tab: 0,
            show_admin: false,
            chain_name: chain_name.to_string(),
        }
    }

    fn tab_titles(&self) -> Vec<Line<'static>> {
        let mut titles: Vec<Line> = TABS.iter().map(|t| Line::from(*t)).collect();
        if self.show_admin {
            titles.push(Line::from(ADMIN_TAB));
        }
        titles
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let header_block = Block::default().style(THEME.header_style());
        frame.render_widget(header_block, area);

        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(16),
                Constraint::Min(0),
                Constraint::Length(30),
            ])
            .split(area);

        let title = Paragraph::new(Span::styled(
            " whitelist-tui",
            Style::default()
                .fg(THEME.text_accent)
                .add_modifier(Modifier::BOLD),
        ))
        .style(THEME.header_style());
        frame.render_widget(title, chunks[0]);

        let tabs = Tabs::new(self.tab_titles())
            .select(self.current_tab)
            .style(THEME.muted_style())
            .highlight_style(THEME.accent_style().add_modifier(Modifier::BOLD))
            .divider(Span::raw(" | "));
        frame.render_widget(tabs, chunks[1]);

        let block_str = match self.latest_block {
            Some(n) => format!("#{}", utils::format_number(n)),
            None => "#--".to_string(),
        };
        let network_info = Line::from(vec![
            Span::styled(self.chain_name.clone(), Style::default().fg(THEME.text)),
            Span::styled(" | ", THEME.muted_style()),
            Span::styled(format!("{block_str} "), THEME.accent_style()),
        ]);
        let network_paragraph = Paragraph::new(network_info)
            .alignment(Alignment::Right)
            .style(THEME.header_style());
        frame.render_widget(network_paragraph, chunks[2]);
    }
}
