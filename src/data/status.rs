use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::data::contract::{ContractBackend, ContractHandle};
use crate::errors::AppResult;
use crate::events::AppEvent;

/// Whether the handle's signer is the contract owner.
///
/// `Address` compares the raw 20 bytes, so checksum casing on either side never matters.
pub async fn query_owner(handle: &ContractHandle) -> AppResult<bool> {
    let owner = handle.owner().await?;
    debug!(%owner, signer = %handle.signer(), "owner lookup");
    Ok(owner == handle.signer())
}

/// Whether the handle's signer is on the whitelist.
pub async fn query_whitelist(handle: &ContractHandle) -> AppResult<bool> {
    handle.is_whitelisted(handle.signer()).await
}

/// Polls the chain head on a fixed interval to keep the connection warm.
///
/// Owns its task: dropping the poller stops the timer.
pub struct LivenessPoller {
    task: JoinHandle<()>,
}

impl LivenessPoller {
    pub fn spawn(
        backend: Arc<dyn ContractBackend>,
        interval: Duration,
        event_tx: mpsc::UnboundedSender<AppEvent>,
    ) -> Self {
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                match backend.block_number().await {
                    Ok(number) => {
                        if event_tx.send(AppEvent::BlockHeight(number)).is_err() {
                            return;
                        }
                    }
                    Err(e) => warn!(error = %e, "liveness poll failed"),
                }
            }
        });
        Self { task }
    }
}

impl Drop for LivenessPoller {
    fn drop(&mut self) {
        self.task.abort();
    }
}
