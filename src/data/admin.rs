use std::sync::Arc;

use alloy::primitives::{Address, B256};
use tracing::info;

use crate::data::contract::{ContractBackend, ContractHandle};
use crate::errors::{AppError, AppResult};

/// Normalize user input into an address: trim, add a missing `0x`, require 40
/// hex digits. Mixed-case input must carry a valid EIP-55 checksum.
pub fn normalize_address(input: &str) -> AppResult<Address> {
    let trimmed = input.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    if digits.len() != 40 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(AppError::InvalidAddress(trimmed.to_string()));
    }

    let prefixed = format!("0x{digits}");
    let has_lower = digits.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = digits.chars().any(|c| c.is_ascii_uppercase());
    if has_lower && has_upper {
        return Address::parse_checksummed(&prefixed, None)
            .map_err(|_| AppError::InvalidAddress(format!("{trimmed} (bad checksum)")));
    }

    prefixed
        .parse::<Address>()
        .map_err(|_| AppError::InvalidAddress(trimmed.to_string()))
}

/// Bind a fresh handle for `signer` and send `updateWhitelist(target, status)`.
pub async fn submit_whitelist_update(
    contract: Address,
    signer: Address,
    backend: Arc<dyn ContractBackend>,
    target: Address,
    status: bool,
) -> AppResult<(ContractHandle, B256)> {
    let handle = ContractHandle::bind(contract, signer, backend);
    let hash = handle.update_whitelist(target, status).await?;
    info!(%target, status, %hash, "whitelist update sent");
    Ok((handle, hash))
}
