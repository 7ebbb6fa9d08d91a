//! UI state, one object per concern.
//!
//! Every user-triggered action calls `begin*`, which bumps the concern's
//! generation. Background results carry the generation they were started
//! with; results from an older generation are dropped.

use std::collections::HashSet;

use alloy::primitives::{Address, B256};

use crate::data::types::{RequestRecord, TransactionStatus, TxKind, TxPhase};
use crate::errors::AppError;
use crate::events::{RecordsUpdate, StatusUpdate, TxUpdate};

/// Whether the active account changed as a result of an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountChange {
    Unchanged,
    Switched(Option<Address>),
}

#[derive(Debug, Default)]
pub struct ConnectionState {
    pub account: Option<Address>,
    pub connecting: bool,
    pub error: Option<String>,
    generation: u64,
}

impl ConnectionState {
    pub fn begin_connect(&mut self) -> u64 {
        self.generation += 1;
        self.connecting = true;
        self.generation
    }

    pub fn apply_connect(&mut self, generation: u64, result: Result<Address, AppError>) -> AccountChange {
        if generation != self.generation {
            return AccountChange::Unchanged;
        }
        self.connecting = false;
        match result {
            Ok(account) => {
                self.error = None;
                self.set_account(Some(account))
            }
            Err(e) => {
                self.error = Some(e.to_string());
                AccountChange::Unchanged
            }
        }
    }

    /// Apply an `accountsChanged` notification. Ignored until the user has connected;
    /// an empty list disconnects.
    pub fn apply_accounts_changed(&mut self, accounts: &[Address]) -> AccountChange {
        if self.account.is_none() {
            return AccountChange::Unchanged;
        }
        // Supersedes any connect still in flight.
        self.generation += 1;
        self.connecting = false;
        self.set_account(accounts.first().copied())
    }

    fn set_account(&mut self, account: Option<Address>) -> AccountChange {
        if self.account == account {
            AccountChange::Unchanged
        } else {
            self.account = account;
            AccountChange::Switched(account)
        }
    }
}

/// Owner and whitelist flags. `None` means not known for the current account yet.
#[derive(Debug, Default)]
pub struct ContractStatus {
    pub is_owner: Option<bool>,
    pub is_whitelisted: Option<bool>,
    pub error: Option<String>,
    generation: u64,
}

impl ContractStatus {
    /// Mark both flags stale and start a new query round.
    pub fn begin(&mut self) -> u64 {
        self.generation += 1;
        self.is_owner = None;
        self.is_whitelisted = None;
        self.error = None;
        self.generation
    }

    pub fn clear(&mut self) {
        self.begin();
    }

    pub fn apply(&mut self, generation: u64, update: StatusUpdate) -> bool {
        if generation != self.generation {
            return false;
        }
        let (flag, result) = match update {
            StatusUpdate::Owner(result) => (&mut self.is_owner, result),
            StatusUpdate::Whitelist(result) => (&mut self.is_whitelisted, result),
        };
        match result {
            Ok(value) => *flag = Some(value),
            Err(e) => {
                *flag = Some(false);
                self.error = Some(e.to_string());
            }
        }
        true
    }

    pub fn owner(&self) -> bool {
        self.is_owner == Some(true)
    }

    pub fn whitelisted(&self) -> bool {
        self.is_whitelisted == Some(true)
    }
}

/// The last tracked transaction.
#[derive(Debug, Default)]
pub struct TxState {
    pub current: Option<TransactionStatus>,
    /// Hash of the most recent request submission, for "view latest".
    pub last_request_tx: Option<B256>,
    generation: u64,
    /// Request submissions that have not reported a hash yet, newer ones included.
    awaiting_hash: HashSet<u64>,
    last_request_generation: u64,
}

impl TxState {
    pub fn begin(&mut self, kind: TxKind) -> u64 {
        self.generation += 1;
        if kind == TxKind::Request {
            self.awaiting_hash.insert(self.generation);
        }
        self.current = Some(TransactionStatus {
            kind,
            hash: None,
            phase: TxPhase::Pending,
            message: "Waiting for wallet approval...".to_string(),
        });
        self.generation
    }

    /// Returns the new phase when the update was applied.
    ///
    /// Success and Error are terminal: nothing moves a finished status again.
    pub fn apply(&mut self, generation: u64, update: TxUpdate) -> Option<TxPhase> {
        self.note_request_hash(generation, &update);
        if generation != self.generation {
            return None;
        }
        let status = self.current.as_mut()?;
        if status.phase != TxPhase::Pending {
            return None;
        }
        match update {
            TxUpdate::Submitted(hash) => {
                status.hash = Some(hash);
                status.message = "Transaction sent, waiting for confirmation...".to_string();
            }
            TxUpdate::Confirmed(hash) => {
                status.hash = Some(hash);
                status.phase = TxPhase::Success;
                status.message = format!("{} confirmed", status.kind);
            }
            TxUpdate::Failed(message) => {
                status.phase = TxPhase::Error;
                status.message = message;
            }
        }
        Some(status.phase)
    }

    /// A sent request stays findable by "view latest" even after a newer action took over the panel.
    fn note_request_hash(&mut self, generation: u64, update: &TxUpdate) {
        match update {
            TxUpdate::Submitted(hash) if self.awaiting_hash.remove(&generation) => {
                if generation >= self.last_request_generation {
                    self.last_request_generation = generation;
                    self.last_request_tx = Some(*hash);
                }
            }
            TxUpdate::Failed(_) => {
                self.awaiting_hash.remove(&generation);
            }
            _ => {}
        }
    }

    pub fn kind(&self) -> Option<TxKind> {
        self.current.as_ref().map(|s| s.kind)
    }
}

#[derive(Debug, Default)]
pub struct RecordsState {
    pub records: Vec<RequestRecord>,
    pub loading: bool,
    pub error: Option<String>,
    generation: u64,
}

impl RecordsState {
    pub fn begin(&mut self) -> u64 {
        self.generation += 1;
        self.loading = true;
        self.error = None;
        self.generation
    }

    pub fn clear(&mut self) {
        self.generation += 1;
        self.records.clear();
        self.loading = false;
        self.error = None;
    }

    pub fn apply(&mut self, generation: u64, update: RecordsUpdate) -> bool {
        if generation != self.generation {
            return false;
        }
        self.loading = false;
        match update {
            RecordsUpdate::Loaded(records) => self.records = records,
            RecordsUpdate::Unchanged => {}
            RecordsUpdate::Failed(e) => self.error = Some(e.to_string()),
        }
        true
    }
}
