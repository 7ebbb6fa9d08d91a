use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::components::Component;
use crate::data::types::{ExportFormat, RequestRecord};
use crate::events::AppEvent;
use crate::theme::THEME;
use crate::utils;

pub struct RequestList {
    pub records: Vec<RequestRecord>,
    pub loading: bool,
    pub error: Option<String>,
    table_state: TableState,
    scroll_state: ScrollbarState,
}

impl RequestList {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            loading: false,
            error: None,
            table_state: TableState::default(),
            scroll_state: ScrollbarState::default(),
        }
    }

    /// Replace the rows, keeping the selection in range.
    pub fn set_records(&mut self, records: Vec<RequestRecord>) {
        self.records = records;
        let selected = match self.table_state.selected() {
            _ if self.records.is_empty() => None,
            Some(i) => Some(i.min(self.records.len() - 1)),
            None => Some(0),
        };
        self.table_state.select(selected);
        self.scroll_state = self
            .scroll_state
            .content_length(self.records.len())
            .position(selected.unwrap_or(0));
    }

    pub fn selected(&self) -> Option<&RequestRecord> {
        self.table_state.selected().and_then(|i| self.records.get(i))
    }

    fn select(&mut self, index: usize) {
        if self.records.is_empty() {
            return;
        }
        let index = index.min(self.records.len() - 1);
        self.table_state.select(Some(index));
        self.scroll_state = self.scroll_state.position(index);
    }

    fn detail_lines(record: &RequestRecord) -> Vec<Line<'static>> {
        vec![
            Line::from(vec![
                Span::styled("  Request  ", THEME.muted_style()),
                Span::styled(format!("#{}", record.request_id), THEME.accent_style()),
                Span::styled("   Time  ", THEME.muted_style()),
                Span::styled(utils::format_timestamp(record.timestamp), Style::default().fg(THEME.text)),
            ]),
            Line::from(vec![
                Span::styled("  Sender   ", THEME.muted_style()),
                Span::styled(format!("{}", record.sender), THEME.address_style()),
            ]),
            Line::from(vec![
                Span::styled("  Data     ", THEME.muted_style()),
                Span::styled(utils::display_data(&record.data), Style::default().fg(THEME.text)),
            ]),
        ]
    }
}

fn build_rows(records: &[RequestRecord]) -> Vec<Row<'static>> {
    records
        .iter()
        .map(|r| {
            Row::new(vec![
                Cell::from(format!("{}", r.request_id)).style(THEME.accent_style()),
                Cell::from(utils::format_time_ago(r.timestamp)).style(THEME.muted_style()),
                Cell::from(utils::truncate_address(&r.sender)).style(THEME.address_style()),
                Cell::from(utils::display_data(&r.data)),
            ])
        })
        .collect()
}

impl Component for RequestList {
    fn handle_key(&mut self, key: KeyEvent) -> Option<AppEvent> {
        let current = self.table_state.selected().unwrap_or(0);
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.select(current + 1);
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.select(current.saturating_sub(1));
                None
            }
            KeyCode::Char('g') => {
                self.select(0);
                None
            }
            KeyCode::Char('G') => {
                self.select(usize::MAX);
                None
            }
            KeyCode::Char('l') => Some(AppEvent::ViewLatest),
            KeyCode::Char('a') => Some(AppEvent::ViewAllMine),
            KeyCode::Char('x') => Some(AppEvent::Export(ExportFormat::Csv)),
            KeyCode::Char('X') => Some(AppEvent::Export(ExportFormat::Json)),
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let title = format!(" Requests ({}) ", self.records.len());
        // A failed reload keeps the old rows; say so where the rows are.
        let footer = match &self.error {
            Some(err) if !self.records.is_empty() => Span::styled(
                format!(" {} ", utils::escape_control(err)),
                THEME.error_style(),
            ),
            _ => Span::styled(" l:Latest  a:All mine  x:CSV  X:JSON ", THEME.muted_style()),
        };
        let outer_block = Block::default()
            .title(title)
            .title_bottom(Line::from(footer))
            .borders(Borders::ALL)
            .border_style(THEME.border_focused_style());
        let inner = outer_block.inner(area);
        frame.render_widget(outer_block, area);

        if self.records.is_empty() {
            let (text, style) = if self.loading {
                ("Loading requests...".to_string(), THEME.accent_style())
            } else if let Some(ref err) = self.error {
                (utils::escape_control(err), THEME.error_style())
            } else {
                (
                    "No requests loaded.\n\nPress 'l' for your latest request or 'a' for all of yours.".to_string(),
                    THEME.muted_style(),
                )
            };
            let paragraph = Paragraph::new(text)
                .style(style)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: false });
            frame.render_widget(paragraph, inner);
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(5)])
            .split(inner);

        let header = Row::new(vec![
            Cell::from("ID"),
            Cell::from("Age"),
            Cell::from("Sender"),
            Cell::from("Data"),
        ])
        .style(THEME.table_header_style());

        let widths = [
            Constraint::Length(8),
            Constraint::Length(10),
            Constraint::Length(16),
            Constraint::Min(10),
        ];

        let table = Table::new(build_rows(&self.records), widths)
            .header(header)
            .row_highlight_style(THEME.selected_style())
            .highlight_symbol(" > ");
        frame.render_stateful_widget(table, chunks[0], &mut self.table_state);

        if self.records.len() > chunks[0].height as usize {
            let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .begin_symbol(Some("^"))
                .end_symbol(Some("v"));
            frame.render_stateful_widget(scrollbar, chunks[0], &mut self.scroll_state);
        }

        if let Some(record) = self.selected() {
            let detail = Paragraph::new(Self::detail_lines(record))
                .block(Block::default().borders(Borders::TOP).border_style(THEME.border_style()))
                .wrap(Wrap { trim: false });
            frame.render_widget(detail, chunks[1]);
        }
    }
}
