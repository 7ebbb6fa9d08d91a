use std::fmt;
use std::io;

use alloy::transports::TransportError;
use thiserror::Error;

/// A fault reported by the wallet endpoint, keeping the JSON-RPC error code when there is one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletFault {
    pub code: Option<i64>,
    pub message: String,
}

/// EIP-3326: the requested chain has not been added to the wallet.
pub const UNRECOGNIZED_CHAIN: i64 = 4902;

/// EIP-1193: the user rejected the request.
pub const USER_REJECTED: i64 = 4001;

impl WalletFault {
    pub fn new(code: Option<i64>, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn is_unrecognized_chain(&self) -> bool {
        self.code == Some(UNRECOGNIZED_CHAIN)
            || self.message.to_lowercase().contains("unrecognized chain")
    }

    pub fn is_user_rejection(&self) -> bool {
        self.code == Some(USER_REJECTED)
    }

    /// Wallets phrase this differently; they all mention an existing registration.
    pub fn mentions_existing_network(&self) -> bool {
        let msg = self.message.to_lowercase();
        msg.contains("already exists")
            || msg.contains("already registered")
            || msg.contains("already added")
            || msg.contains("conflict")
    }
}

impl fmt::Display for WalletFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "{} (code {code})", self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl From<TransportError> for WalletFault {
    fn from(err: TransportError) -> Self {
        match err.as_error_resp() {
            Some(payload) => WalletFault::new(Some(payload.code), payload.message.to_string()),
            None => WalletFault::new(None, err.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetworkSetupError {
    #[error("a conflicting network is already registered in the wallet: {0}")]
    ConflictingRegistration(String),
    #[error("wallet could not switch network: {0}")]
    SwitchFailed(WalletFault),
    #[error("wallet could not add network: {0}")]
    AddFailed(WalletFault),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    #[error("no wallet found (is the wallet running and its RPC endpoint reachable?)")]
    WalletNotFound,
    #[error("network setup failed: {0}")]
    NetworkSetup(#[from] NetworkSetupError),
    #[error("missing input: {0}")]
    MissingInput(&'static str),
    #[error("invalid address: {0}")]
    InvalidAddress(String),
    #[error("{0}")]
    ProviderFault(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl From<WalletFault> for AppError {
    fn from(fault: WalletFault) -> Self {
        AppError::ProviderFault(fault.to_string())
    }
}

impl From<TransportError> for AppError {
    fn from(err: TransportError) -> Self {
        AppError::from(WalletFault::from(err))
    }
}

impl From<alloy::contract::Error> for AppError {
    fn from(err: alloy::contract::Error) -> Self {
        AppError::ProviderFault(err.to_string())
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
