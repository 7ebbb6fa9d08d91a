use alloy::primitives::{Address, B256, U256};
use futures::future::try_join_all;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::data::cache::RecordCache;
use crate::data::contract::{self, ContractHandle};
use crate::data::types::RequestRecord;
use crate::errors::AppResult;

/// Load the record created by the most recent request transaction.
///
/// `Ok(None)` when there is nothing to show: no transaction yet, no receipt,
/// or no `RequestProcessed` log in it. Those cases are only logged.
pub async fn view_latest(
    handle: &ContractHandle,
    last_request_tx: Option<B256>,
    cache: &RwLock<RecordCache>,
) -> AppResult<Option<RequestRecord>> {
    let Some(tx_hash) = last_request_tx else {
        info!("view latest: no request transaction yet");
        return Ok(None);
    };

    let Some(receipt) = handle.receipt(tx_hash).await? else {
        info!(%tx_hash, "view latest: receipt not available");
        return Ok(None);
    };

    let Some(request_id) = contract::request_id_from_logs(handle.address(), &receipt.logs) else {
        info!(%tx_hash, "view latest: no RequestProcessed event in receipt");
        return Ok(None);
    };

    lookup(handle, request_id, cache).await.map(Some)
}

/// Every request sent by `account`, in event order.
///
/// One lookup per emitted event, all in flight at once.
pub async fn view_all_mine(
    handle: &ContractHandle,
    account: Address,
    cache: &RwLock<RecordCache>,
) -> AppResult<Vec<RequestRecord>> {
    let events = handle.request_events().await?;
    let cached = cache.read().await.len();
    let latest_block = events.iter().filter_map(|e| e.block_number).max();
    debug!(events = events.len(), cached, ?latest_block, "resolving request events");

    let records = try_join_all(
        events
            .iter()
            .map(|event| lookup(handle, event.request_id, cache)),
    )
    .await?;

    let mine: Vec<RequestRecord> = records
        .into_iter()
        .filter(|record| record.sender == account)
        .collect();
    info!(%account, count = mine.len(), "loaded own requests");
    Ok(mine)
}

async fn lookup(
    handle: &ContractHandle,
    request_id: U256,
    cache: &RwLock<RecordCache>,
) -> AppResult<RequestRecord> {
    {
        let mut c = cache.write().await;
        if let Some(cached) = c.get(&request_id) {
            return Ok(cached);
        }
    }

    let record = handle.get_request(request_id).await?;
    {
        let mut c = cache.write().await;
        c.put(record.clone());
    }
    Ok(record)
}
