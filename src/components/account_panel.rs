use alloy::primitives::Address;
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::data::network::NetworkConfig;
use crate::theme::THEME;
use crate::utils;

pub struct AccountPanel {
    pub network: NetworkConfig,
    pub account: Option<Address>,
    pub connecting: bool,
    pub connection_error: Option<String>,
    pub is_owner: Option<bool>,
    pub is_whitelisted: Option<bool>,
    pub status_error: Option<String>,
}

impl AccountPanel {
    pub fn new(network: NetworkConfig) -> Self {
        Self {
            network,
            account: None,
            connecting: false,
            connection_error: None,
            is_owner: None,
            is_whitelisted: None,
            status_error: None,
        }
    }

    fn flag_span(flag: Option<bool>, yes: &'static str, no: &'static str) -> Span<'static> {
        match flag {
            Some(true) => Span::styled(yes, THEME.success_style()),
            Some(false) => Span::styled(no, THEME.error_style()),
            None => Span::styled("checking...", THEME.muted_style()),
        }
    }

    fn row(label: &'static str, value: Span<'static>) -> Line<'static> {
        Line::from(vec![Span::styled(format!("  {label:<12}"), THEME.muted_style()), value])
    }

    fn lines(&self) -> Vec<Line<'static>> {
        let account = match (self.account, self.connecting) {
            (Some(account), _) => Span::styled(format!("{account}"), THEME.address_style()),
            (None, true) => Span::styled("connecting...", THEME.accent_style()),
            (None, false) => Span::styled("not connected (press c)", THEME.muted_style()),
        };

        let mut lines = vec![
            Self::row("Account", account),
            Self::row(
                "Network",
                Span::styled(
                    format!("{} ({})", self.network.chain_name, self.network.chain_id_hex()),
                    Style::default().fg(THEME.text),
                ),
            ),
            Self::row(
                "Contract",
                Span::styled(format!("{}", self.network.contract_address), THEME.hash_style()),
            ),
        ];

        if self.account.is_some() {
            lines.push(Self::row(
                "Whitelisted",
                Self::flag_span(self.is_whitelisted, "yes", "no"),
            ));
            lines.push(Self::row("Owner", Self::flag_span(self.is_owner, "yes", "no")));
        }

        for err in [&self.connection_error, &self.status_error].into_iter().flatten() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                format!("  {}", utils::escape_control(err)),
                THEME.error_style(),
            )));
        }
        lines
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Wallet ")
            .borders(Borders::ALL)
            .border_style(THEME.border_style());
        frame.render_widget(Paragraph::new(self.lines()).block(block), area);
    }
}
