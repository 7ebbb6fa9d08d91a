use std::str::FromStr;
use std::time::Duration;

use alloy::primitives::{Address, Bytes, B256};
use alloy::providers::Provider;
use futures::future::BoxFuture;
use futures::FutureExt;
use serde_json::{Value, json};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::data::network::NetworkConfig;
use crate::errors::{AppError, AppResult, NetworkSetupError, WalletFault};

/// An EIP-1193 style wallet: every account, network and signing operation is a
/// `request(method, params)`, and account switches arrive as notifications.
pub trait WalletProvider: Send + Sync {
    /// Whether the wallet endpoint answers at all.
    fn is_available(&self) -> BoxFuture<'_, bool>;

    fn request(&self, method: &'static str, params: Value) -> BoxFuture<'_, Result<Value, WalletFault>>;

    /// Subscribe to `accountsChanged`. Dropping the subscription removes the listener.
    fn accounts_changed(&self) -> AccountsSubscription;
}

/// A live `accountsChanged` listener.
pub struct AccountsSubscription {
    rx: mpsc::UnboundedReceiver<Vec<Address>>,
    task: Option<JoinHandle<()>>,
}

impl AccountsSubscription {
    pub fn new(rx: mpsc::UnboundedReceiver<Vec<Address>>, task: Option<JoinHandle<()>>) -> Self {
        Self { rx, task }
    }

    pub async fn recv(&mut self) -> Option<Vec<Address>> {
        self.rx.recv().await
    }
}

impl Drop for AccountsSubscription {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// A wallet reached over its JSON-RPC endpoint (Frame, or a dev node with unlocked accounts).
pub struct RpcWallet<P> {
    provider: P,
    poll_interval: Duration,
}

impl<P> RpcWallet<P>
where
    P: Provider + Clone + 'static,
{
    pub fn new(provider: P, poll_interval: Duration) -> Self {
        Self {
            provider,
            poll_interval,
        }
    }
}

impl<P> WalletProvider for RpcWallet<P>
where
    P: Provider + Clone + 'static,
{
    fn is_available(&self) -> BoxFuture<'_, bool> {
        async move {
            match self.provider.get_chain_id().await {
                Ok(chain_id) => {
                    debug!(chain_id, "wallet endpoint answered");
                    true
                }
                Err(e) => {
                    warn!(error = %e, "wallet endpoint unreachable");
                    false
                }
            }
        }
        .boxed()
    }

    fn request(&self, method: &'static str, params: Value) -> BoxFuture<'_, Result<Value, WalletFault>> {
        async move {
            debug!(method, "wallet request");
            let value: Value = self.provider.raw_request(method.into(), params).await?;
            Ok(value)
        }
        .boxed()
    }

    fn accounts_changed(&self) -> AccountsSubscription {
        let (tx, rx) = mpsc::unbounded_channel();
        let provider = self.provider.clone();
        let poll_interval = self.poll_interval;

        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(poll_interval);
            let mut last: Option<Vec<Address>> = None;
            loop {
                interval.tick().await;
                let value: Value = match provider.raw_request("eth_accounts".into(), json!([])).await {
                    Ok(v) => v,
                    Err(e) => {
                        debug!(error = %e, "eth_accounts poll failed");
                        continue;
                    }
                };
                let accounts = match parse_accounts(&value) {
                    Ok(a) => a,
                    Err(e) => {
                        warn!(error = %e, "wallet returned malformed accounts");
                        continue;
                    }
                };
                match &last {
                    Some(prev) if *prev == accounts => {}
                    Some(_) => {
                        if tx.send(accounts.clone()).is_err() {
                            return;
                        }
                        last = Some(accounts);
                    }
                    None => last = Some(accounts),
                }
            }
        });

        AccountsSubscription::new(rx, Some(task))
    }
}

/// Parse a JSON array of address strings.
pub fn parse_accounts(value: &Value) -> AppResult<Vec<Address>> {
    let list = value
        .as_array()
        .ok_or_else(|| AppError::ProviderFault(format!("expected an account list, got {value}")))?;
    list.iter()
        .map(|entry| {
            let s = entry
                .as_str()
                .ok_or_else(|| AppError::ProviderFault(format!("expected an address, got {entry}")))?;
            Address::from_str(s).map_err(|e| AppError::ProviderFault(format!("bad address {s}: {e}")))
        })
        .collect()
}

/// Switch to the target network, adding it to the wallet first if the wallet does not know it.
pub async fn ensure_network(
    wallet: &dyn WalletProvider,
    network: &NetworkConfig,
) -> Result<(), NetworkSetupError> {
    let fault = match wallet
        .request("wallet_switchEthereumChain", network.switch_chain_params())
        .await
    {
        Ok(_) => return Ok(()),
        Err(fault) => fault,
    };

    if !fault.is_unrecognized_chain() {
        return Err(NetworkSetupError::SwitchFailed(fault));
    }

    info!(chain_id = network.chain_id, "network unknown to wallet, adding it");
    if let Err(fault) = wallet
        .request("wallet_addEthereumChain", network.add_chain_params())
        .await
    {
        if fault.mentions_existing_network() {
            return Err(NetworkSetupError::ConflictingRegistration(fault.message));
        }
        return Err(NetworkSetupError::AddFailed(fault));
    }

    // Not every wallet switches as part of adding.
    wallet
        .request("wallet_switchEthereumChain", network.switch_chain_params())
        .await
        .map(|_| ())
        .map_err(NetworkSetupError::SwitchFailed)
}

pub async fn request_accounts(wallet: &dyn WalletProvider) -> AppResult<Vec<Address>> {
    let value = wallet.request("eth_requestAccounts", json!([])).await?;
    parse_accounts(&value)
}

/// Ask the wallet for a `personal_sign` signature over a 32-byte hash.
pub async fn sign_hash(wallet: &dyn WalletProvider, account: Address, hash: B256) -> AppResult<Bytes> {
    let value = wallet
        .request("personal_sign", json!([format!("{hash}"), format!("{account:#x}")]))
        .await
        .map_err(|fault| {
            if fault.is_user_rejection() {
                AppError::ProviderFault(format!("Signature rejected by user: {}", fault.message))
            } else {
                AppError::from(fault)
            }
        })?;
    let s = value
        .as_str()
        .ok_or_else(|| AppError::ProviderFault(format!("expected a signature, got {value}")))?;
    Bytes::from_str(s).map_err(|e| AppError::ProviderFault(format!("bad signature: {e}")))
}

/// Connect: wallet present, network set up, accounts authorized. Returns the active account.
pub async fn connect(
    wallet: Option<&dyn WalletProvider>,
    network: &NetworkConfig,
) -> AppResult<Address> {
    let wallet = wallet.ok_or(AppError::WalletNotFound)?;
    if !wallet.is_available().await {
        return Err(AppError::WalletNotFound);
    }

    ensure_network(wallet, network).await?;

    let accounts = request_accounts(wallet).await?;
    let account = accounts
        .first()
        .copied()
        .ok_or_else(|| AppError::ProviderFault("Wallet returned no accounts".to_string()))?;
    info!(%account, "wallet connected");
    Ok(account)
}
