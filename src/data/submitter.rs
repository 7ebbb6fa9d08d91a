use alloy::primitives::{Address, Bytes, B256, keccak256};
use tracing::info;

use crate::data::contract::ContractHandle;
use crate::data::wallet::{self, WalletProvider};
use crate::errors::{AppError, AppResult};

/// Check that there is something to submit and someone to submit it as.
pub fn validate<'a>(
    account: Option<Address>,
    handle: Option<&'a ContractHandle>,
    input: &str,
) -> AppResult<&'a ContractHandle> {
    if account.is_none() {
        return Err(AppError::MissingInput("connect a wallet first"));
    }
    let handle = handle.ok_or(AppError::MissingInput("contract is not bound"))?;
    if input.trim().is_empty() {
        return Err(AppError::MissingInput("request text is empty"));
    }
    Ok(handle)
}

/// UTF-8 bytes of the input and their keccak256 hash.
pub fn encode_input(input: &str) -> (Bytes, B256) {
    let data = Bytes::copy_from_slice(input.as_bytes());
    let hash = keccak256(&data);
    (data, hash)
}

/// Have the wallet sign the request hash, then send `processRequest`. Returns the tx hash.
pub async fn sign_and_submit(
    wallet: &dyn WalletProvider,
    handle: &ContractHandle,
    input: &str,
) -> AppResult<B256> {
    let (data, hash) = encode_input(input);
    let signature = wallet::sign_hash(wallet, handle.signer(), hash).await?;
    info!(%hash, bytes = data.len(), "request signed");
    handle.process_request(data, signature).await
}
