use alloy::primitives::{Address, address};
use serde_json::{Value, json};

#[derive(Debug, Clone, Copy)]
pub struct NativeCurrency {
    pub name: &'static str,
    pub symbol: &'static str,
    pub decimals: u8,
}

/// Static description of the network and the deployed registry contract.
#[derive(Debug, Clone, Copy)]
pub struct NetworkConfig {
    pub contract_address: Address,
    pub chain_id: u64,
    pub chain_name: &'static str,
    pub rpc_url: &'static str,
    pub native_currency: NativeCurrency,
    pub explorer_url: Option<&'static str>,
}

/// The network and contract this app talks to.
pub const TARGET: NetworkConfig = NetworkConfig {
    contract_address: address!("5FbDB2315678afecb367f032d93F642f64180aa3"),
    chain_id: 31337,
    chain_name: "Anvil Local",
    rpc_url: "http://127.0.0.1:8545",
    native_currency: NativeCurrency {
        name: "Ether",
        symbol: "ETH",
        decimals: 18,
    },
    explorer_url: None,
};

impl NetworkConfig {
    /// Chain id in the `0x`-prefixed form wallets expect.
    pub fn chain_id_hex(&self) -> String {
        format!("{:#x}", self.chain_id)
    }

    /// Params for `wallet_switchEthereumChain`.
    pub fn switch_chain_params(&self) -> Value {
        json!([{ "chainId": self.chain_id_hex() }])
    }

    /// Params for `wallet_addEthereumChain` (EIP-3085).
    pub fn add_chain_params(&self) -> Value {
        let explorers: Vec<&str> = self.explorer_url.into_iter().collect();
        json!([{
            "chainId": self.chain_id_hex(),
            "chainName": self.chain_name,
            "rpcUrls": [self.rpc_url],
            "nativeCurrency": {
                "name": self.native_currency.name,
                "symbol": self.native_currency.symbol,
                "decimals": self.native_currency.decimals,
            },
            "blockExplorerUrls": explorers,
        }])
    }
}
