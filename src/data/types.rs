use alloy::primitives::{Address, Bytes, B256, U256};
use alloy::rpc::types::Log;

/// A request as stored by the registry contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestRecord {
    pub request_id: U256,
    pub data: Bytes,
    pub timestamp: u64,
    pub sender: Address,
}

/// A decoded `RequestProcessed` log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestEvent {
    pub request_id: U256,
    pub block_number: Option<u64>,
}

/// The parts of a transaction receipt this app reads.
#[derive(Debug, Clone)]
pub struct Receipt {
    pub tx_hash: B256,
    pub success: bool,
    pub block_number: Option<u64>,
    pub logs: Vec<Log>,
}

/// What a tracked transaction does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxKind {
    Request,
    Whitelist { account: Address, status: bool },
}

impl std::fmt::Display for TxKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TxKind::Request => write!(f, "Request submission"),
            TxKind::Whitelist { account, status: true } => write!(f, "Whitelist add {account}"),
            TxKind::Whitelist { account, status: false } => {
                write!(f, "Whitelist removal {account}")
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxPhase {
    Pending,
    Success,
    Error,
}

impl std::fmt::Display for TxPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TxPhase::Pending => write!(f, "Pending"),
            TxPhase::Success => write!(f, "Success"),
            TxPhase::Error => write!(f, "Error"),
        }
    }
}

/// Status of the most recent transaction; overwritten by the next action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionStatus {
    pub kind: TxKind,
    pub hash: Option<B256>,
    pub phase: TxPhase,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tx_phase_display() {
        assert_eq!(TxPhase::Pending.to_string(), "Pending");
        assert_eq!(TxPhase::Success.to_string(), "Success");
        assert_eq!(TxPhase::Error.to_string(), "Error");
    }

    #[test]
    fn test_tx_kind_display() {
        assert_eq!(TxKind::Request.to_string(), "Request submission");
        let kind = TxKind::Whitelist {
            account: Address::ZERO,
            status: false,
        };
        assert!(kind.to_string().starts_with("Whitelist removal 0x0000"));
    }

    #[test]
    fn test_export_extension() {
        assert_eq!(ExportFormat::Csv.extension(), "csv");
        assert_eq!(ExportFormat::Json.extension(), "json");
    }
}
