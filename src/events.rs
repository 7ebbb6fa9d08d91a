use alloy::primitives::{Address, B256};

use crate::data::types::{ExportFormat, RequestRecord};
use crate::errors::AppError;

/// Views the user can navigate to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Account,
    Requests,
    Admin,
}

impl View {
    pub fn tab_index(&self) -> usize {
        match self {
            View::Account => 0,
            View::Requests => 1,
            View::Admin => 2,
        }
    }
}

/// Result of an owner or whitelist lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusUpdate {
    Owner(Result<bool, AppError>),
    Whitelist(Result<bool, AppError>),
}

/// Progress of a tracked transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxUpdate {
    Submitted(B256),
    Confirmed(B256),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordsUpdate {
    Loaded(Vec<RequestRecord>),
    /// Nothing to show; keep whatever is on screen.
    Unchanged,
    Failed(AppError),
}

/// Events sent from background tasks and components to the main app loop
#[derive(Debug)]
pub enum AppEvent {
    // Background results, tagged with the generation that requested them
    Connection { generation: u64, result: Result<Address, AppError> },
    Status { generation: u64, update: StatusUpdate },
    Tx { generation: u64, update: TxUpdate },
    Records { generation: u64, update: RecordsUpdate },

    // Wallet notifications
    AccountsChanged(Vec<Address>),

    // Liveness
    BlockHeight(u64),

    // User intents
    Connect,
    RefreshStatus,
    SubmitRequest(String),
    UpdateWhitelist { address: String, status: bool },
    ViewLatest,
    ViewAllMine,
    Export(ExportFormat),
    ExportComplete(String),

    // Status
    Error(String),
}
