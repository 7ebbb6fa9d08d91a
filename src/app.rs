use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::Address;
use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::prelude::*;
use ratatui::widgets::*;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::components::Component;
use crate::components::account_panel::AccountPanel;
use crate::components::admin_panel::AdminPanel;
use crate::components::header::Header;
use crate::components::help::HelpOverlay;
use crate::components::request_form::RequestForm;
use crate::components::request_list::RequestList;
use crate::components::status_bar::StatusBar;
use crate::components::tx_status::TxStatusPanel;
use crate::config::Config;
use crate::data::contract::ContractHandle;
use crate::data::types::{TxKind, TxPhase};
use crate::data::{AccountWatcher, DataService, admin, submitter};
use crate::events::{AppEvent, TxUpdate, View};
use crate::state::{AccountChange, ConnectionState, ContractStatus, RecordsState, TxState};
use crate::theme::THEME;

pub struct App {
    // Navigation
    view_stack: Vec<View>,
    current_view: View,

    // Components
    header: Header,
    account_panel: AccountPanel,
    request_form: RequestForm,
    tx_status: TxStatusPanel,
    request_list: RequestList,
    admin_panel: AdminPanel,
    status_bar: StatusBar,
    help: HelpOverlay,

    // State, one object per concern
    connection: ConnectionState,
    status: ContractStatus,
    tx: TxState,
    records: RecordsState,
    handle: Option<ContractHandle>,
    account_watcher: Option<AccountWatcher>,

    // Data
    data_service: Arc<DataService>,
    event_rx: mpsc::UnboundedReceiver<AppEvent>,

    should_quit: bool,
    tick_rate: Duration,
    poll_interval: Duration,
    export_dir: PathBuf,
}

impl App {
    pub fn with_service(
        data_service: Arc<DataService>,
        event_rx: mpsc::UnboundedReceiver<AppEvent>,
        config: &Config,
    ) -> Self {
        let network = *data_service.network();
        Self {
            view_stack: Vec::new(),
            current_view: View::Account,
            header: Header::new(network.chain_name),
            account_panel: AccountPanel::new(network),
            request_form: RequestForm::new(),
            tx_status: TxStatusPanel::new(),
            request_list: RequestList::new(),
            admin_panel: AdminPanel::new(),
            status_bar: StatusBar::new(config.wallet_url().is_some()),
            help: HelpOverlay::new(),
            connection: ConnectionState::default(),
            status: ContractStatus::default(),
            tx: TxState::default(),
            records: RecordsState::default(),
            handle: None,
            account_watcher: None,
            data_service,
            event_rx,
            should_quit: false,
            tick_rate: Duration::from_millis(config.tick_rate_ms),
            poll_interval: Duration::from_secs(config.poll_interval_secs.max(1)),
            export_dir: config.export_dir.clone(),
        }
    }

    pub async fn run(&mut self, mut terminal: ratatui::DefaultTerminal) -> color_eyre::Result<()> {
        // Owned for the lifetime of the view; dropped when the loop exits.
        let liveness = self.data_service.start_liveness(self.poll_interval);

        let mut interval = tokio::time::interval(self.tick_rate);
        let mut events = EventStream::new();

        while !self.should_quit {
            tokio::select! {
                _ = interval.tick() => {
                    terminal.draw(|frame| self.render(frame))?;
                }
                Some(Ok(event)) = events.next() => {
                    self.handle_terminal_event(event);
                }
                Some(app_event) = self.event_rx.recv() => {
                    self.handle_app_event(app_event);
                }
            }
        }

        drop(liveness);
        self.account_watcher = None;
        info!("shutting down");
        Ok(())
    }

    fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();

        frame.render_widget(
            Block::default().style(Style::default().bg(THEME.bg)),
            area,
        );

        // Layout: header (1) | content (fill) | status bar (1)
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(area);

        self.header.render(frame, chunks[0]);

        match self.current_view {
            View::Account => {
                let parts = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([
                        Constraint::Length(10),
                        Constraint::Length(3),
                        Constraint::Length(6),
                        Constraint::Min(0),
                    ])
                    .split(chunks[1]);
                self.account_panel.render(frame, parts[0]);
                self.request_form.render(frame, parts[1]);
                self.tx_status.render(frame, parts[2]);
            }
            View::Requests => self.request_list.render(frame, chunks[1]),
            View::Admin => {
                let parts = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Length(7), Constraint::Length(6), Constraint::Min(0)])
                    .split(chunks[1]);
                self.admin_panel.render(frame, parts[0]);
                self.tx_status.render(frame, parts[1]);
            }
        }

        self.status_bar.render(frame, chunks[2]);

        // Overlays (rendered on top)
        self.help.render(frame, area);
    }

    fn handle_terminal_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            // Only handle key press events (not release/repeat) for cross-platform compat
            if key.kind != KeyEventKind::Press {
                return;
            }
            self.handle_key(key);
        }
    }

    fn active_component(&mut self) -> &mut dyn Component {
        match self.current_view {
            View::Account => &mut self.request_form,
            View::Requests => &mut self.request_list,
            View::Admin => &mut self.admin_panel,
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if self.help.handle_key(key) {
            return;
        }

        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        // A component editing text gets every other key, global ones included
        if self.active_component().captures_input() {
            if let Some(event) = self.active_component().handle_key(key) {
                self.handle_app_event(event);
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
                return;
            }
            KeyCode::Char('c') => {
                self.handle_app_event(AppEvent::Connect);
                return;
            }
            KeyCode::Char('r') => {
                self.handle_app_event(AppEvent::RefreshStatus);
                return;
            }
            KeyCode::Char('?') => {
                self.help.toggle();
                return;
            }
            KeyCode::Char('1') => {
                self.navigate_to(View::Account);
                return;
            }
            KeyCode::Char('2') => {
                self.navigate_to(View::Requests);
                return;
            }
            KeyCode::Char('3') => {
                self.navigate_to(View::Admin);
                return;
            }
            KeyCode::Esc => {
                self.go_back();
                return;
            }
            _ => {}
        }

        if let Some(event) = self.active_component().handle_key(key) {
            self.handle_app_event(event);
        }
    }

    fn handle_app_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Connect => {
                self.status_bar.clear_messages();
                let generation = self.connection.begin_connect();
                self.data_service.connect(generation);
            }
            AppEvent::Connection { generation, result } => {
                let was_connecting = self.connection.connecting;
                let change = self.connection.apply_connect(generation, result);
                if was_connecting && !self.connection.connecting {
                    if let Some(err) = &self.connection.error {
                        self.status_bar.error_message = Some(err.clone());
                    }
                }
                if self.connection.account.is_some() && self.account_watcher.is_none() {
                    self.account_watcher = self.data_service.watch_accounts();
                }
                if let AccountChange::Switched(account) = change {
                    self.on_account_changed(account);
                }
            }
            AppEvent::AccountsChanged(accounts) => {
                if let AccountChange::Switched(account) = self.connection.apply_accounts_changed(&accounts) {
                    self.on_account_changed(account);
                }
            }
            AppEvent::RefreshStatus => self.refresh_status(),
            AppEvent::Status { generation, update } => {
                if self.status.apply(generation, update) {
                    if let Some(err) = &self.status.error {
                        self.status_bar.error_message = Some(err.clone());
                    }
                }
            }
            AppEvent::SubmitRequest(input) => self.submit_request(input),
            AppEvent::UpdateWhitelist { address, status } => self.update_whitelist(&address, status),
            AppEvent::Tx { generation, update } => self.apply_tx(generation, update),
            AppEvent::ViewLatest => {
                let Some(handle) = self.require_handle() else { return };
                self.status_bar.clear_messages();
                let generation = self.records.begin();
                self.data_service
                    .view_latest(generation, handle, self.tx.last_request_tx);
            }
            AppEvent::ViewAllMine => {
                let (Some(handle), Some(account)) = (self.require_handle(), self.connection.account) else {
                    return;
                };
                self.status_bar.clear_messages();
                let generation = self.records.begin();
                self.data_service.view_all_mine(generation, handle, account);
            }
            AppEvent::Records { generation, update } => {
                if self.records.apply(generation, update) {
                    self.request_list.set_records(self.records.records.clone());
                    if let Some(err) = &self.records.error {
                        self.status_bar.error_message = Some(err.clone());
                    }
                }
            }
            AppEvent::Export(format) => {
                if self.records.records.is_empty() {
                    self.status_bar.error_message = Some("Nothing to export".to_string());
                } else {
                    self.data_service.export_records(
                        self.records.records.clone(),
                        self.export_dir.clone(),
                        format,
                    );
                }
            }
            AppEvent::ExportComplete(msg) => {
                self.status_bar.error_message = None;
                self.status_bar.info_message = Some(msg);
            }
            AppEvent::BlockHeight(number) => {
                self.header.latest_block = Some(number);
            }
            AppEvent::Error(msg) => {
                self.status_bar.error_message = Some(msg);
            }
        }
        self.sync_components();
    }

    /// Rebind the handle for the new signer and re-derive everything that depended on the old one.
    fn on_account_changed(&mut self, account: Option<Address>) {
        info!(account = ?account, "active account changed");
        self.handle = account.map(|a| self.data_service.bind(a));
        self.records.clear();
        self.request_list.set_records(Vec::new());
        match &self.handle {
            Some(_) => self.refresh_status(),
            None => self.status.clear(),
        }
    }

    fn refresh_status(&mut self) {
        let Some(handle) = self.require_handle() else { return };
        let generation = self.status.begin();
        self.data_service.refresh_status(generation, handle);
    }

    fn require_handle(&mut self) -> Option<ContractHandle> {
        if self.handle.is_none() {
            self.status_bar.error_message = Some("Connect a wallet first (press c)".to_string());
        }
        self.handle.clone()
    }

    fn submit_request(&mut self, input: String) {
        let handle = match submitter::validate(self.connection.account, self.handle.as_ref(), &input) {
            Ok(handle) => handle.clone(),
            Err(e) => {
                debug!(error = %e, "request rejected before signing");
                self.status_bar.error_message = Some(e.to_string());
                return;
            }
        };
        self.status_bar.clear_messages();
        let generation = self.tx.begin(TxKind::Request);
        self.data_service.submit_request(generation, handle, input);
    }

    fn update_whitelist(&mut self, address: &str, status: bool) {
        if !self.status.owner() {
            self.status_bar.error_message = Some("Only the contract owner can manage the whitelist".to_string());
            return;
        }
        let Some(account) = self.connection.account else {
            self.status_bar.error_message = Some("Connect a wallet first (press c)".to_string());
            return;
        };
        let target = match admin::normalize_address(address) {
            Ok(target) => target,
            Err(e) => {
                self.status_bar.error_message = Some(e.to_string());
                return;
            }
        };
        self.status_bar.clear_messages();
        let generation = self.tx.begin(TxKind::Whitelist { account: target, status });
        self.data_service.update_whitelist(generation, account, target, status);
    }

    fn apply_tx(&mut self, generation: u64, update: TxUpdate) {
        let Some(phase) = self.tx.apply(generation, update) else { return };
        if phase != TxPhase::Success {
            return;
        }
        match self.tx.kind() {
            Some(TxKind::Request) => self.request_form.input.clear(),
            Some(TxKind::Whitelist { .. }) => {
                self.admin_panel.input.clear();
                if self.handle.is_some() {
                    self.refresh_status();
                }
            }
            None => {}
        }
    }

    /// Copy state into the components that display it.
    fn sync_components(&mut self) {
        // Ownership can be lost on an account switch.
        if self.current_view == View::Admin && self.status.is_owner == Some(false) {
            self.view_stack.clear();
            self.current_view = View::Account;
        }

        self.header.show_admin = self.status.owner();
        self.header.current_tab = self.current_view.tab_index();

        self.account_panel.account = self.connection.account;
        self.account_panel.connecting = self.connection.connecting;
        self.account_panel.connection_error = self.connection.error.clone();
        self.account_panel.is_owner = self.status.is_owner;
        self.account_panel.is_whitelisted = self.status.is_whitelisted;
        self.account_panel.status_error = self.status.error.clone();

        self.request_form.whitelisted = self.status.whitelisted();
        self.tx_status.status = self.tx.current.clone();

        self.request_list.loading = self.records.loading;
        self.request_list.error = self.records.error.clone();

        self.status_bar.account = self.connection.account;
        self.status_bar.loading = self.connection.connecting || self.records.loading;
    }

    fn navigate_to(&mut self, view: View) {
        if view == View::Admin && !self.status.owner() {
            self.status_bar.error_message = Some("Admin view is only available to the contract owner".to_string());
            return;
        }
        if view == self.current_view {
            return;
        }
        self.status_bar.clear_messages();
        let old_view = std::mem::replace(&mut self.current_view, view);
        self.view_stack.push(old_view);
        self.sync_components();
    }

    fn go_back(&mut self) {
        if let Some(prev_view) = self.view_stack.pop() {
            if prev_view == View::Admin && !self.status.owner() {
                self.current_view = View::Account;
            } else {
                self.current_view = prev_view;
            }
            self.status_bar.clear_messages();
            self.sync_components();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    use crate::data::mock::{MockContract, MockWallet};
    use crate::data::network::TARGET;
    use crate::data::wallet::WalletProvider;
    use crate::errors::AppError;
    use crate::events::RecordsUpdate;

    fn addr(byte: u8) -> Address {
        Address::repeat_byte(byte)
    }

    fn app_with(wallet: Option<Arc<MockWallet>>, backend: Arc<MockContract>) -> App {
        let (tx, rx) = mpsc::unbounded_channel();
        let wallet = wallet.map(|w| w as Arc<dyn WalletProvider>);
        let service = Arc::new(DataService::new(wallet, backend, TARGET, tx));
        let config = Config::parse_from(["whitelist-tui", "--wallet-url", "http://127.0.0.1:1248"]);
        App::with_service(service, rx, &config)
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    async fn pump_until(app: &mut App, done: impl Fn(&App) -> bool) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while !done(app) {
                let event = app.event_rx.recv().await.expect("event channel closed");
                app.handle_app_event(event);
            }
        })
        .await
        .expect("timed out waiting for app state");
    }

    fn status_known(app: &App) -> bool {
        app.status.is_owner.is_some() && app.status.is_whitelisted.is_some()
    }

    async fn connected(wallet: Arc<MockWallet>, backend: Arc<MockContract>) -> App {
        let mut app = app_with(Some(wallet), backend);
        press(&mut app, KeyCode::Char('c'));
        pump_until(&mut app, |a| a.connection.account.is_some()).await;
        pump_until(&mut app, status_known).await;
        app
    }

    fn tx_phase(app: &App) -> Option<TxPhase> {
        app.tx.current.as_ref().map(|s| s.phase)
    }

    #[tokio::test]
    async fn test_connect_without_wallet() {
        let mut app = app_with(None, Arc::new(MockContract::new(addr(9))));
        press(&mut app, KeyCode::Char('c'));
        pump_until(&mut app, |a| !a.connection.connecting).await;

        assert!(app.connection.account.is_none());
        assert!(app.handle.is_none());
        assert!(app.status.is_owner.is_none());
        assert!(app.status_bar.error_message.as_deref().unwrap_or("").contains("no wallet"));
    }

    #[tokio::test]
    async fn test_connect_binds_first_account_and_queries_status() {
        let backend = Arc::new(MockContract::new(addr(1)));
        backend.add_to_whitelist(addr(1));
        let app = connected(Arc::new(MockWallet::new(vec![addr(1), addr(2)])), backend).await;

        assert_eq!(app.connection.account, Some(addr(1)));
        assert_eq!(app.handle.as_ref().map(|h| h.signer()), Some(addr(1)));
        assert!(app.status.owner());
        assert!(app.status.whitelisted());
        assert!(app.header.show_admin);
        assert!(app.account_watcher.is_some());
    }

    #[tokio::test]
    async fn test_empty_submit_never_signs() {
        let wallet = Arc::new(MockWallet::new(vec![addr(1)]));
        let backend = Arc::new(MockContract::new(addr(9)));
        let mut app = connected(wallet.clone(), backend.clone()).await;

        press(&mut app, KeyCode::Char('i'));
        type_text(&mut app, "   ");
        press(&mut app, KeyCode::Enter);

        assert!(app.tx.current.is_none());
        assert!(!wallet.calls().contains(&"personal_sign".to_string()));
        assert!(backend.process_calls().is_empty());
        assert!(app.status_bar.error_message.is_some());
    }

    #[tokio::test]
    async fn test_submit_pending_then_success_clears_input() {
        let wallet = Arc::new(MockWallet::new(vec![addr(1)]));
        let backend = Arc::new(MockContract::new(addr(9)));
        let mut app = connected(wallet, backend.clone()).await;

        press(&mut app, KeyCode::Char('i'));
        type_text(&mut app, "hello");
        press(&mut app, KeyCode::Enter);
        assert_eq!(tx_phase(&app), Some(TxPhase::Pending));

        pump_until(&mut app, |a| tx_phase(a) != Some(TxPhase::Pending)).await;
        assert_eq!(tx_phase(&app), Some(TxPhase::Success));
        assert_eq!(app.request_form.input.value(), "");
        assert!(app.tx.last_request_tx.is_some());
        assert_eq!(backend.process_calls().len(), 1);
    }

    #[tokio::test]
    async fn test_submit_failure_keeps_input() {
        let wallet = Arc::new(MockWallet::new(vec![addr(1)]));
        let backend = Arc::new(MockContract::new(addr(9)));
        backend.set_confirm_success(false);
        let mut app = connected(wallet, backend).await;

        press(&mut app, KeyCode::Char('i'));
        type_text(&mut app, "hello");
        press(&mut app, KeyCode::Enter);
        pump_until(&mut app, |a| tx_phase(a) != Some(TxPhase::Pending)).await;

        assert_eq!(tx_phase(&app), Some(TxPhase::Error));
        assert_eq!(app.request_form.input.value(), "hello");
    }

    #[tokio::test]
    async fn test_account_switch_while_submission_pending() {
        let wallet = Arc::new(MockWallet::new(vec![addr(1)]));
        let backend = Arc::new(MockContract::new(addr(1)));
        let gate = backend.gate_confirmations();
        let mut app = connected(wallet.clone(), backend).await;
        press(&mut app, KeyCode::Char('3'));
        assert_eq!(app.current_view, View::Admin);

        press(&mut app, KeyCode::Char('1'));
        press(&mut app, KeyCode::Char('i'));
        type_text(&mut app, "hello");
        press(&mut app, KeyCode::Enter);
        pump_until(&mut app, |a| a.tx.current.as_ref().is_some_and(|s| s.hash.is_some())).await;

        wallet.emit_accounts(vec![addr(2)]);
        pump_until(&mut app, |a| a.connection.account == Some(addr(2))).await;
        assert_eq!(app.handle.as_ref().map(|h| h.signer()), Some(addr(2)));
        pump_until(&mut app, status_known).await;
        assert!(!app.status.owner());
        assert!(!app.header.show_admin);

        // Still interactive
        press(&mut app, KeyCode::Char('2'));
        assert_eq!(app.current_view, View::Requests);
        press(&mut app, KeyCode::Char('3'));
        assert_eq!(app.current_view, View::Requests);

        gate.notify_one();
        pump_until(&mut app, |a| tx_phase(a) != Some(TxPhase::Pending)).await;
        assert!(!app.should_quit);
    }

    #[tokio::test]
    async fn test_accounts_changed_before_connect_is_ignored() {
        let mut app = app_with(
            Some(Arc::new(MockWallet::new(vec![addr(1)]))),
            Arc::new(MockContract::new(addr(9))),
        );
        app.handle_app_event(AppEvent::AccountsChanged(vec![addr(2)]));
        assert!(app.connection.account.is_none());
        assert!(app.handle.is_none());
    }

    #[tokio::test]
    async fn test_empty_accounts_disconnects() {
        let wallet = Arc::new(MockWallet::new(vec![addr(1)]));
        let mut app = connected(wallet, Arc::new(MockContract::new(addr(9)))).await;
        app.handle_app_event(AppEvent::AccountsChanged(vec![]));
        assert!(app.connection.account.is_none());
        assert!(app.handle.is_none());
        assert!(app.status.is_owner.is_none());
    }

    #[tokio::test]
    async fn test_admin_hidden_from_non_owner() {
        let wallet = Arc::new(MockWallet::new(vec![addr(2)]));
        let mut app = connected(wallet, Arc::new(MockContract::new(addr(1)))).await;

        press(&mut app, KeyCode::Char('3'));
        assert_eq!(app.current_view, View::Account);
        assert!(app.status_bar.error_message.is_some());

        app.handle_app_event(AppEvent::UpdateWhitelist {
            address: format!("{:x}", addr(7)),
            status: true,
        });
        assert!(app.tx.current.is_none());
    }

    #[tokio::test]
    async fn test_owner_whitelists_bare_hex_address() {
        let owner = addr(1);
        let backend = Arc::new(MockContract::new(owner));
        let mut app = connected(Arc::new(MockWallet::new(vec![owner])), backend.clone()).await;

        press(&mut app, KeyCode::Char('3'));
        press(&mut app, KeyCode::Char('i'));
        type_text(&mut app, "zz");
        press(&mut app, KeyCode::Enter);
        assert!(app.tx.current.is_none());
        assert!(backend.whitelist_calls().is_empty());

        press(&mut app, KeyCode::Char('i'));
        app.handle_key(KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL));
        type_text(&mut app, &"ab".repeat(20));
        press(&mut app, KeyCode::Enter);
        pump_until(&mut app, |a| tx_phase(a) == Some(TxPhase::Success)).await;

        assert_eq!(backend.whitelist_calls(), vec![(owner, addr(0xab), true)]);
        assert_eq!(app.admin_panel.input.value(), "");
    }

    #[tokio::test]
    async fn test_view_all_mine_from_requests_tab() {
        let me = addr(1);
        let backend = Arc::new(MockContract::new(addr(9)));
        for (id, sender) in [(1u64, me), (2, addr(2)), (3, me), (4, addr(3))] {
            backend.add_request(crate::data::types::RequestRecord {
                request_id: alloy::primitives::U256::from(id),
                data: alloy::primitives::Bytes::from_static(b"req"),
                timestamp: 1_700_000_000 + id,
                sender,
            });
        }
        let mut app = connected(Arc::new(MockWallet::new(vec![me])), backend).await;

        press(&mut app, KeyCode::Char('2'));
        press(&mut app, KeyCode::Char('a'));
        assert!(app.records.loading);
        pump_until(&mut app, |a| !a.records.loading).await;

        assert_eq!(app.request_list.records.len(), 2);
        assert!(app.request_list.records.iter().all(|r| r.sender == me));
    }

    #[tokio::test]
    async fn test_view_latest_without_tx_keeps_list() {
        let backend = Arc::new(MockContract::new(addr(9)));
        let mut app = connected(Arc::new(MockWallet::new(vec![addr(1)])), backend).await;

        app.handle_app_event(AppEvent::ViewLatest);
        pump_until(&mut app, |a| !a.records.loading).await;
        assert!(app.request_list.records.is_empty());
        assert!(app.records.error.is_none());
    }

    fn screen_text(app: &mut App) -> String {
        let mut terminal = Terminal::new(ratatui::backend::TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| app.render(frame)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[tokio::test]
    async fn test_failed_reload_shows_error_over_old_records() {
        let mut app = app_with(None, Arc::new(MockContract::new(addr(9))));
        press(&mut app, KeyCode::Char('2'));

        let generation = app.records.begin();
        app.handle_app_event(AppEvent::Records {
            generation,
            update: RecordsUpdate::Loaded(vec![crate::data::types::RequestRecord {
                request_id: alloy::primitives::U256::from(1),
                data: alloy::primitives::Bytes::from_static(b"req"),
                timestamp: 1_700_000_000,
                sender: addr(1),
            }]),
        });

        let generation = app.records.begin();
        app.handle_app_event(AppEvent::Records {
            generation,
            update: RecordsUpdate::Failed(AppError::ProviderFault("rpc down".into())),
        });

        assert_eq!(app.request_list.records.len(), 1);
        assert_eq!(app.status_bar.error_message.as_deref(), Some("rpc down"));
        assert!(screen_text(&mut app).contains("rpc down"));
    }

    #[tokio::test]
    async fn test_quit_keys() {
        let mut app = app_with(None, Arc::new(MockContract::new(addr(9))));
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn test_editing_swallows_global_keys() {
        let mut app = app_with(None, Arc::new(MockContract::new(addr(9))));
        press(&mut app, KeyCode::Char('i'));
        type_text(&mut app, "q2");
        assert!(!app.should_quit);
        assert_eq!(app.current_view, View::Account);
        assert_eq!(app.request_form.input.value(), "q2");
    }
}
