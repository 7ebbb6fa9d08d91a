use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::{Address, Bytes, B256, U256};
use alloy::providers::Provider;
use alloy::rpc::types::{BlockNumberOrTag, Filter, Log, TransactionReceipt};
use alloy::sol;
use alloy::sol_types::SolEvent;
use futures::future::BoxFuture;
use futures::FutureExt;

use crate::data::types::{Receipt, RequestEvent, RequestRecord};
use crate::errors::{AppError, AppResult};

sol! {
    #[sol(rpc)]
    interface IRequestRegistry {
        event RequestProcessed(uint256 indexed requestId, address indexed sender, bytes data, uint256 timestamp);

        function owner() external view returns (address);
        function whitelist(address account) external view returns (bool);
        function updateWhitelist(address account, bool status) external;
        function processRequest(bytes calldata data, bytes calldata signature) external returns (uint256);
        function getRequest(uint256 requestId) external view returns (bytes memory data, uint256 timestamp, address sender);
    }
}

pub use IRequestRegistry::RequestProcessed;

/// How long `confirm` waits for a receipt before giving up.
const RECEIPT_TIMEOUT: Duration = Duration::from_secs(120);
const RECEIPT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// The registry ABI as seen from the app. Every fault comes back as `AppError::ProviderFault`.
pub trait ContractBackend: Send + Sync {
    fn owner(&self, contract: Address) -> BoxFuture<'_, AppResult<Address>>;

    fn is_whitelisted(&self, contract: Address, account: Address) -> BoxFuture<'_, AppResult<bool>>;

    fn get_request(&self, contract: Address, request_id: U256)
    -> BoxFuture<'_, AppResult<RequestRecord>>;

    fn request_events(&self, contract: Address) -> BoxFuture<'_, AppResult<Vec<RequestEvent>>>;

    fn update_whitelist(
        &self,
        contract: Address,
        from: Address,
        account: Address,
        status: bool,
    ) -> BoxFuture<'_, AppResult<B256>>;

    fn process_request(
        &self,
        contract: Address,
        from: Address,
        data: Bytes,
        signature: Bytes,
    ) -> BoxFuture<'_, AppResult<B256>>;

    fn receipt(&self, hash: B256) -> BoxFuture<'_, AppResult<Option<Receipt>>>;

    /// Wait until the transaction is mined.
    fn confirm(&self, hash: B256) -> BoxFuture<'_, AppResult<Receipt>>;

    fn block_number(&self) -> BoxFuture<'_, AppResult<u64>>;
}

/// `ContractBackend` over an alloy provider. Writes go out as `eth_sendTransaction`,
/// so the wallet behind the provider does the signing.
pub struct AlloyContract<P> {
    provider: P,
}

impl<P> AlloyContract<P>
where
    P: Provider + Clone + 'static,
{
    pub fn new(provider: P) -> Self {
        Self { provider }
    }
}

impl<P> ContractBackend for AlloyContract<P>
where
    P: Provider + Clone + 'static,
{
    fn owner(&self, contract: Address) -> BoxFuture<'_, AppResult<Address>> {
        async move {
            let registry = IRequestRegistry::new(contract, &self.provider);
            Ok(registry.owner().call().await?._0)
        }
        .boxed()
    }

    fn is_whitelisted(&self, contract: Address, account: Address) -> BoxFuture<'_, AppResult<bool>> {
        async move {
            let registry = IRequestRegistry::new(contract, &self.provider);
            Ok(registry.whitelist(account).call().await?._0)
        }
        .boxed()
    }

    fn get_request(
        &self,
        contract: Address,
        request_id: U256,
    ) -> BoxFuture<'_, AppResult<RequestRecord>> {
        async move {
            let registry = IRequestRegistry::new(contract, &self.provider);
            let stored = registry.getRequest(request_id).call().await?;
            Ok(RequestRecord {
                request_id,
                data: stored.data,
                timestamp: stored.timestamp.saturating_to::<u64>(),
                sender: stored.sender,
            })
        }
        .boxed()
    }

    fn request_events(&self, contract: Address) -> BoxFuture<'_, AppResult<Vec<RequestEvent>>> {
        async move {
            let filter = Filter::new()
                .address(contract)
                .event_signature(RequestProcessed::SIGNATURE_HASH)
                .from_block(BlockNumberOrTag::Earliest);
            let logs = self.provider.get_logs(&filter).await?;
            Ok(decode_request_events(&logs))
        }
        .boxed()
    }

    fn update_whitelist(
        &self,
        contract: Address,
        from: Address,
        account: Address,
        status: bool,
    ) -> BoxFuture<'_, AppResult<B256>> {
        async move {
            let registry = IRequestRegistry::new(contract, &self.provider);
            let pending = registry
                .updateWhitelist(account, status)
                .from(from)
                .send()
                .await?;
            Ok(*pending.tx_hash())
        }
        .boxed()
    }

    fn process_request(
        &self,
        contract: Address,
        from: Address,
        data: Bytes,
        signature: Bytes,
    ) -> BoxFuture<'_, AppResult<B256>> {
        async move {
            let registry = IRequestRegistry::new(contract, &self.provider);
            let pending = registry
                .processRequest(data, signature)
                .from(from)
                .send()
                .await?;
            Ok(*pending.tx_hash())
        }
        .boxed()
    }

    fn receipt(&self, hash: B256) -> BoxFuture<'_, AppResult<Option<Receipt>>> {
        async move {
            let receipt = self.provider.get_transaction_receipt(hash).await?;
            Ok(receipt.as_ref().map(to_receipt))
        }
        .boxed()
    }

    fn confirm(&self, hash: B256) -> BoxFuture<'_, AppResult<Receipt>> {
        async move {
            let wait = async {
                loop {
                    if let Some(receipt) = self.provider.get_transaction_receipt(hash).await? {
                        return Ok::<_, AppError>(to_receipt(&receipt));
                    }
                    tokio::time::sleep(RECEIPT_POLL_INTERVAL).await;
                }
            };
            match tokio::time::timeout(RECEIPT_TIMEOUT, wait).await {
                Ok(result) => result,
                Err(_) => Err(AppError::ProviderFault(format!(
                    "Timed out waiting for receipt of {hash}"
                ))),
            }
        }
        .boxed()
    }

    fn block_number(&self) -> BoxFuture<'_, AppResult<u64>> {
        async move { Ok(self.provider.get_block_number().await?) }.boxed()
    }
}

fn to_receipt(receipt: &TransactionReceipt) -> Receipt {
    Receipt {
        tx_hash: receipt.transaction_hash,
        success: receipt.status(),
        block_number: receipt.block_number,
        logs: receipt.inner.logs().to_vec(),
    }
}

/// Decode every `RequestProcessed` log, skipping anything that does not decode.
pub fn decode_request_events(logs: &[Log]) -> Vec<RequestEvent> {
    logs.iter()
        .filter_map(|log| {
            let decoded = log.log_decode::<RequestProcessed>().ok()?;
            Some(RequestEvent {
                request_id: decoded.inner.data.requestId,
                block_number: log.block_number,
            })
        })
        .collect()
}

/// Find the request id emitted by `contract` in a receipt's logs.
pub fn request_id_from_logs(contract: Address, logs: &[Log]) -> Option<U256> {
    logs.iter()
        .filter(|log| log.inner.address == contract)
        .find_map(|log| log.log_decode::<RequestProcessed>().ok())
        .map(|decoded| decoded.inner.data.requestId)
}

/// A registry binding for one signer. Built fresh for every signer; never reused across accounts.
#[derive(Clone)]
pub struct ContractHandle {
    address: Address,
    signer: Address,
    backend: Arc<dyn ContractBackend>,
}

impl std::fmt::Debug for ContractHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContractHandle")
            .field("address", &self.address)
            .field("signer", &self.signer)
            .finish()
    }
}

impl ContractHandle {
    pub fn bind(address: Address, signer: Address, backend: Arc<dyn ContractBackend>) -> Self {
        Self {
            address,
            signer,
            backend,
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn signer(&self) -> Address {
        self.signer
    }

    pub async fn owner(&self) -> AppResult<Address> {
        self.backend.owner(self.address).await
    }

    pub async fn is_whitelisted(&self, account: Address) -> AppResult<bool> {
        self.backend.is_whitelisted(self.address, account).await
    }

    pub async fn get_request(&self, request_id: U256) -> AppResult<RequestRecord> {
        self.backend.get_request(self.address, request_id).await
    }

    pub async fn request_events(&self) -> AppResult<Vec<RequestEvent>> {
        self.backend.request_events(self.address).await
    }

    pub async fn update_whitelist(&self, account: Address, status: bool) -> AppResult<B256> {
        self.backend
            .update_whitelist(self.address, self.signer, account, status)
            .await
    }

    pub async fn process_request(&self, data: Bytes, signature: Bytes) -> AppResult<B256> {
        self.backend
            .process_request(self.address, self.signer, data, signature)
            .await
    }

    pub async fn receipt(&self, hash: B256) -> AppResult<Option<Receipt>> {
        self.backend.receipt(hash).await
    }

    /// Wait for the receipt; a reverted transaction is a fault.
    pub async fn confirm(&self, hash: B256) -> AppResult<Receipt> {
        let receipt = self.backend.confirm(hash).await?;
        if !receipt.success {
            return Err(AppError::ProviderFault(format!("Transaction {hash} reverted")));
        }
        Ok(receipt)
    }
}
