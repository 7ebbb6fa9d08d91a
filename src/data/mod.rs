pub mod admin;
pub mod cache;
pub mod contract;
pub mod export;
pub mod network;
pub mod status;
pub mod submitter;
pub mod types;
pub mod viewer;
pub mod wallet;

#[cfg(test)]
pub mod mock;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::{Address, B256};
use tokio::sync::RwLock;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::data::cache::RecordCache;
use crate::data::contract::{ContractBackend, ContractHandle};
use crate::data::network::NetworkConfig;
use crate::data::status::LivenessPoller;
use crate::data::types::{ExportFormat, RequestRecord};
use crate::data::wallet::WalletProvider;
use crate::events::{AppEvent, RecordsUpdate, StatusUpdate, TxUpdate};

/// Runs wallet and contract work in background tasks and reports back as `AppEvent`s.
pub struct DataService {
    wallet: Option<Arc<dyn WalletProvider>>,
    backend: Arc<dyn ContractBackend>,
    network: NetworkConfig,
    cache: Arc<RwLock<RecordCache>>,
    event_tx: mpsc::UnboundedSender<AppEvent>,
}

impl DataService {
    pub fn new(
        wallet: Option<Arc<dyn WalletProvider>>,
        backend: Arc<dyn ContractBackend>,
        network: NetworkConfig,
        event_tx: mpsc::UnboundedSender<AppEvent>,
    ) -> Self {
        Self {
            wallet,
            backend,
            network,
            cache: Arc::new(RwLock::new(RecordCache::new())),
            event_tx,
        }
    }

    pub fn network(&self) -> &NetworkConfig {
        &self.network
    }

    /// A fresh registry handle for `signer`.
    pub fn bind(&self, signer: Address) -> ContractHandle {
        ContractHandle::bind(self.network.contract_address, signer, Arc::clone(&self.backend))
    }

    /// Start the chain-liveness timer. The caller owns it; dropping it stops the timer.
    pub fn start_liveness(&self, interval: Duration) -> LivenessPoller {
        LivenessPoller::spawn(Arc::clone(&self.backend), interval, self.event_tx.clone())
    }

    /// Forward wallet account switches into the event loop. `None` without a wallet.
    pub fn watch_accounts(&self) -> Option<AccountWatcher> {
        let wallet = self.wallet.as_ref()?;
        let mut subscription = wallet.accounts_changed();
        let tx = self.event_tx.clone();
        let task = tokio::spawn(async move {
            while let Some(accounts) = subscription.recv().await {
                info!(count = accounts.len(), "wallet accounts changed");
                if tx.send(AppEvent::AccountsChanged(accounts)).is_err() {
                    return;
                }
            }
        });
        Some(AccountWatcher { task })
    }

    pub fn connect(&self, generation: u64) {
        let wallet = self.wallet.clone();
        let network = self.network;
        let tx = self.event_tx.clone();

        tokio::spawn(async move {
            let result = wallet::connect(wallet.as_deref(), &network).await;
            if let Err(e) = &result {
                warn!(error = %e, "connect failed");
            }
            let _ = tx.send(AppEvent::Connection { generation, result });
        });
    }

    /// Query owner and whitelist flags for the handle's signer.
    pub fn refresh_status(&self, generation: u64, handle: ContractHandle) {
        let tx = self.event_tx.clone();

        tokio::spawn(async move {
            let (owner, whitelisted) = tokio::join!(
                status::query_owner(&handle),
                status::query_whitelist(&handle),
            );
            for update in [StatusUpdate::Owner(owner), StatusUpdate::Whitelist(whitelisted)] {
                let _ = tx.send(AppEvent::Status { generation, update });
            }
        });
    }

    pub fn submit_request(&self, generation: u64, handle: ContractHandle, input: String) {
        let Some(wallet) = self.wallet.clone() else {
            let _ = self.event_tx.send(AppEvent::Tx {
                generation,
                update: TxUpdate::Failed(crate::errors::AppError::WalletNotFound.to_string()),
            });
            return;
        };
        let tx = self.event_tx.clone();

        tokio::spawn(async move {
            let hash = match submitter::sign_and_submit(&*wallet, &handle, &input).await {
                Ok(hash) => hash,
                Err(e) => {
                    warn!(error = %e, "request submission failed");
                    let _ = tx.send(AppEvent::Tx {
                        generation,
                        update: TxUpdate::Failed(e.to_string()),
                    });
                    return;
                }
            };
            track_confirmation(&handle, hash, generation, &tx).await;
        });
    }

    /// Bind a fresh handle for `signer` and send a whitelist update.
    pub fn update_whitelist(&self, generation: u64, signer: Address, target: Address, status: bool) {
        let backend = Arc::clone(&self.backend);
        let contract = self.network.contract_address;
        let tx = self.event_tx.clone();

        tokio::spawn(async move {
            match admin::submit_whitelist_update(contract, signer, backend, target, status).await {
                Ok((handle, hash)) => track_confirmation(&handle, hash, generation, &tx).await,
                Err(e) => {
                    warn!(error = %e, "whitelist update failed");
                    let _ = tx.send(AppEvent::Tx {
                        generation,
                        update: TxUpdate::Failed(e.to_string()),
                    });
                }
            }
        });
    }

    pub fn view_latest(&self, generation: u64, handle: ContractHandle, last_request_tx: Option<B256>) {
        let cache = Arc::clone(&self.cache);
        let tx = self.event_tx.clone();

        tokio::spawn(async move {
            let update = match viewer::view_latest(&handle, last_request_tx, &cache).await {
                Ok(Some(record)) => RecordsUpdate::Loaded(vec![record]),
                Ok(None) => RecordsUpdate::Unchanged,
                Err(e) => {
                    warn!(error = %e, "view latest failed");
                    RecordsUpdate::Failed(e)
                }
            };
            let _ = tx.send(AppEvent::Records { generation, update });
        });
    }

    pub fn view_all_mine(&self, generation: u64, handle: ContractHandle, account: Address) {
        let cache = Arc::clone(&self.cache);
        let tx = self.event_tx.clone();

        tokio::spawn(async move {
            let update = match viewer::view_all_mine(&handle, account, &cache).await {
                Ok(records) => RecordsUpdate::Loaded(records),
                Err(e) => {
                    warn!(error = %e, "view all mine failed");
                    RecordsUpdate::Failed(e)
                }
            };
            let _ = tx.send(AppEvent::Records { generation, update });
        });
    }

    pub fn export_records(&self, records: Vec<RequestRecord>, dir: PathBuf, format: ExportFormat) {
        let tx = self.event_tx.clone();

        tokio::task::spawn_blocking(move || {
            let event = match export::export_records(&records, &dir, format) {
                Ok(msg) => {
                    info!("{msg}");
                    AppEvent::ExportComplete(msg)
                }
                Err(e) => AppEvent::Error(format!("Export failed: {e}")),
            };
            let _ = tx.send(event);
        });
    }
}

/// Report the submitted hash, then the confirmation outcome.
async fn track_confirmation(
    handle: &ContractHandle,
    hash: B256,
    generation: u64,
    tx: &mpsc::UnboundedSender<AppEvent>,
) {
    let _ = tx.send(AppEvent::Tx {
        generation,
        update: TxUpdate::Submitted(hash),
    });
    let update = match handle.confirm(hash).await {
        Ok(receipt) => {
            info!(hash = %receipt.tx_hash, block = ?receipt.block_number, "transaction confirmed");
            TxUpdate::Confirmed(hash)
        }
        Err(e) => {
            warn!(%hash, error = %e, "transaction failed");
            TxUpdate::Failed(e.to_string())
        }
    };
    let _ = tx.send(AppEvent::Tx { generation, update });
}

/// Forwards `accountsChanged` notifications; dropping it removes the listener.
pub struct AccountWatcher {
    task: JoinHandle<()>,
}

impl Drop for AccountWatcher {
    fn drop(&mut self) {
        self.task.abort();
    }
}
