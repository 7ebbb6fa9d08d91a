//! In-memory wallet and contract used by the tests.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use alloy::primitives::{Address, Bytes, B256, U256};
use futures::future::BoxFuture;
use futures::FutureExt;
use serde_json::{Value, json};
use tokio::sync::{Notify, mpsc};

use crate::data::contract::ContractBackend;
use crate::data::types::{Receipt, RequestEvent, RequestRecord};
use crate::data::wallet::{AccountsSubscription, WalletProvider};
use crate::errors::{AppError, AppResult, WalletFault};

pub struct MockWallet {
    available: bool,
    accounts: Mutex<Vec<Address>>,
    switch_results: Mutex<VecDeque<Result<(), WalletFault>>>,
    add_result: Mutex<Result<(), WalletFault>>,
    sign_result: Mutex<Result<Bytes, WalletFault>>,
    calls: Mutex<Vec<String>>,
    listener: Mutex<Option<mpsc::UnboundedSender<Vec<Address>>>>,
}

impl MockWallet {
    pub fn new(accounts: Vec<Address>) -> Self {
        Self {
            available: true,
            accounts: Mutex::new(accounts),
            switch_results: Mutex::new(VecDeque::new()),
            add_result: Mutex::new(Ok(())),
            sign_result: Mutex::new(Ok(Bytes::from_static(&[0x5a; 65]))),
            calls: Mutex::new(Vec::new()),
            listener: Mutex::new(None),
        }
    }

    /// A wallet whose endpoint never answers.
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new(vec![])
        }
    }

    /// Queue the outcome of the next `wallet_switchEthereumChain` call.
    pub fn push_switch_result(&self, result: Result<(), WalletFault>) {
        self.switch_results.lock().unwrap().push_back(result);
    }

    pub fn set_add_result(&self, result: Result<(), WalletFault>) {
        *self.add_result.lock().unwrap() = result;
    }

    pub fn set_sign_result(&self, result: Result<Bytes, WalletFault>) {
        *self.sign_result.lock().unwrap() = result;
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Fire an `accountsChanged` notification to the current listener.
    pub fn emit_accounts(&self, accounts: Vec<Address>) {
        *self.accounts.lock().unwrap() = accounts.clone();
        if let Some(tx) = self.listener.lock().unwrap().as_ref() {
            let _ = tx.send(accounts);
        }
    }

    fn accounts_json(&self) -> Value {
        let accounts: Vec<String> = self
            .accounts
            .lock()
            .unwrap()
            .iter()
            .map(|a| format!("{a:#x}"))
            .collect();
        json!(accounts)
    }
}

impl WalletProvider for MockWallet {
    fn is_available(&self) -> BoxFuture<'_, bool> {
        let available = self.available;
        async move { available }.boxed()
    }

    fn request(&self, method: &'static str, _params: Value) -> BoxFuture<'_, Result<Value, WalletFault>> {
        self.calls.lock().unwrap().push(method.to_string());
        let result = match method {
            "eth_requestAccounts" | "eth_accounts" => Ok(self.accounts_json()),
            "wallet_switchEthereumChain" => self
                .switch_results
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Ok(()))
                .map(|_| Value::Null),
            "wallet_addEthereumChain" => self.add_result.lock().unwrap().clone().map(|_| Value::Null),
            "personal_sign" => self
                .sign_result
                .lock()
                .unwrap()
                .clone()
                .map(|sig| json!(sig.to_string())),
            other => Err(WalletFault::new(Some(-32601), format!("method {other} not found"))),
        };
        async move { result }.boxed()
    }

    fn accounts_changed(&self) -> AccountsSubscription {
        let (tx, rx) = mpsc::unbounded_channel();
        *self.listener.lock().unwrap() = Some(tx);
        AccountsSubscription::new(rx, None)
    }
}

pub struct MockContract {
    owner: Mutex<AppResult<Address>>,
    whitelist: Mutex<HashSet<Address>>,
    whitelist_fault: Mutex<Option<AppError>>,
    requests: Mutex<HashMap<U256, RequestRecord>>,
    events: Mutex<Vec<RequestEvent>>,
    events_fault: Mutex<Option<AppError>>,
    receipts: Mutex<HashMap<B256, Receipt>>,
    process_fault: Mutex<Option<AppError>>,
    confirm_fault: Mutex<Option<AppError>>,
    confirm_success: Mutex<bool>,
    confirm_gate: Mutex<Option<Arc<Notify>>>,
    block_fault: Mutex<Option<AppError>>,
    process_calls: Mutex<Vec<(Address, Bytes, Bytes)>>,
    whitelist_calls: Mutex<Vec<(Address, Address, bool)>>,
    get_request_calls: AtomicUsize,
    block_calls: AtomicUsize,
    next_hash: AtomicUsize,
}

impl MockContract {
    pub fn new(owner: Address) -> Self {
        Self {
            owner: Mutex::new(Ok(owner)),
            whitelist: Mutex::new(HashSet::new()),
            whitelist_fault: Mutex::new(None),
            requests: Mutex::new(HashMap::new()),
            events: Mutex::new(Vec::new()),
            events_fault: Mutex::new(None),
            receipts: Mutex::new(HashMap::new()),
            process_fault: Mutex::new(None),
            confirm_fault: Mutex::new(None),
            confirm_success: Mutex::new(true),
            confirm_gate: Mutex::new(None),
            block_fault: Mutex::new(None),
            process_calls: Mutex::new(Vec::new()),
            whitelist_calls: Mutex::new(Vec::new()),
            get_request_calls: AtomicUsize::new(0),
            block_calls: AtomicUsize::new(0),
            next_hash: AtomicUsize::new(1),
        }
    }

    pub fn set_owner_result(&self, result: AppResult<Address>) {
        *self.owner.lock().unwrap() = result;
    }

    pub fn add_to_whitelist(&self, account: Address) {
        self.whitelist.lock().unwrap().insert(account);
    }

    pub fn set_whitelist_fault(&self, fault: Option<AppError>) {
        *self.whitelist_fault.lock().unwrap() = fault;
    }

    /// Store a record and emit its `RequestProcessed` event.
    pub fn add_request(&self, record: RequestRecord) {
        self.events.lock().unwrap().push(RequestEvent {
            request_id: record.request_id,
            block_number: None,
        });
        self.requests.lock().unwrap().insert(record.request_id, record);
    }

    pub fn set_events_fault(&self, fault: Option<AppError>) {
        *self.events_fault.lock().unwrap() = fault;
    }

    /// Drop a stored record while keeping its event, so its lookup reverts.
    pub fn forget_request(&self, request_id: U256) {
        self.requests.lock().unwrap().remove(&request_id);
    }

    pub fn add_receipt(&self, receipt: Receipt) {
        self.receipts.lock().unwrap().insert(receipt.tx_hash, receipt);
    }

    pub fn set_process_fault(&self, fault: Option<AppError>) {
        *self.process_fault.lock().unwrap() = fault;
    }

    pub fn set_confirm_fault(&self, fault: Option<AppError>) {
        *self.confirm_fault.lock().unwrap() = fault;
    }

    pub fn set_confirm_success(&self, success: bool) {
        *self.confirm_success.lock().unwrap() = success;
    }

    /// Hold every `confirm` until the returned `Notify` is signalled.
    pub fn gate_confirmations(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.confirm_gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    pub fn set_block_fault(&self, fault: Option<AppError>) {
        *self.block_fault.lock().unwrap() = fault;
    }

    pub fn process_calls(&self) -> Vec<(Address, Bytes, Bytes)> {
        self.process_calls.lock().unwrap().clone()
    }

    pub fn whitelist_calls(&self) -> Vec<(Address, Address, bool)> {
        self.whitelist_calls.lock().unwrap().clone()
    }

    pub fn get_request_calls(&self) -> usize {
        self.get_request_calls.load(Ordering::SeqCst)
    }

    pub fn block_calls(&self) -> usize {
        self.block_calls.load(Ordering::SeqCst)
    }

    fn fresh_hash(&self) -> B256 {
        let n = self.next_hash.fetch_add(1, Ordering::SeqCst);
        B256::with_last_byte(n as u8)
    }
}

impl ContractBackend for MockContract {
    fn owner(&self, _contract: Address) -> BoxFuture<'_, AppResult<Address>> {
        let result = self.owner.lock().unwrap().clone();
        async move { result }.boxed()
    }

    fn is_whitelisted(&self, _contract: Address, account: Address) -> BoxFuture<'_, AppResult<bool>> {
        let result = match self.whitelist_fault.lock().unwrap().clone() {
            Some(fault) => Err(fault),
            None => Ok(self.whitelist.lock().unwrap().contains(&account)),
        };
        async move { result }.boxed()
    }

    fn get_request(
        &self,
        _contract: Address,
        request_id: U256,
    ) -> BoxFuture<'_, AppResult<RequestRecord>> {
        self.get_request_calls.fetch_add(1, Ordering::SeqCst);
        let result = self
            .requests
            .lock()
            .unwrap()
            .get(&request_id)
            .cloned()
            .ok_or_else(|| AppError::ProviderFault(format!("execution reverted: no request {request_id}")));
        async move { result }.boxed()
    }

    fn request_events(&self, _contract: Address) -> BoxFuture<'_, AppResult<Vec<RequestEvent>>> {
        let result = match self.events_fault.lock().unwrap().clone() {
            Some(fault) => Err(fault),
            None => Ok(self.events.lock().unwrap().clone()),
        };
        async move { result }.boxed()
    }

    fn update_whitelist(
        &self,
        _contract: Address,
        from: Address,
        account: Address,
        status: bool,
    ) -> BoxFuture<'_, AppResult<B256>> {
        self.whitelist_calls.lock().unwrap().push((from, account, status));
        let result = match self.process_fault.lock().unwrap().clone() {
            Some(fault) => Err(fault),
            None => Ok(self.fresh_hash()),
        };
        async move { result }.boxed()
    }

    fn process_request(
        &self,
        _contract: Address,
        from: Address,
        data: Bytes,
        signature: Bytes,
    ) -> BoxFuture<'_, AppResult<B256>> {
        self.process_calls.lock().unwrap().push((from, data, signature));
        let result = match self.process_fault.lock().unwrap().clone() {
            Some(fault) => Err(fault),
            None => Ok(self.fresh_hash()),
        };
        async move { result }.boxed()
    }

    fn receipt(&self, hash: B256) -> BoxFuture<'_, AppResult<Option<Receipt>>> {
        let receipt = self.receipts.lock().unwrap().get(&hash).cloned();
        async move { Ok(receipt) }.boxed()
    }

    fn confirm(&self, hash: B256) -> BoxFuture<'_, AppResult<Receipt>> {
        let gate = self.confirm_gate.lock().unwrap().clone();
        let fault = self.confirm_fault.lock().unwrap().clone();
        let success = *self.confirm_success.lock().unwrap();
        async move {
            if let Some(gate) = gate {
                gate.notified().await;
            }
            match fault {
                Some(fault) => Err(fault),
                None => Ok(Receipt {
                    tx_hash: hash,
                    success,
                    block_number: Some(1),
                    logs: vec![],
                }),
            }
        }
        .boxed()
    }

    fn block_number(&self) -> BoxFuture<'_, AppResult<u64>> {
        let calls = self.block_calls.fetch_add(1, Ordering::SeqCst);
        let result = match self.block_fault.lock().unwrap().clone() {
            Some(fault) => Err(fault),
            None => Ok(100 + calls as u64),
        };
        async move { result }.boxed()
    }
}
