mod app;
mod components;
mod config;
mod data;
mod errors;
mod events;
mod state;
mod theme;
mod utils;

use std::fs;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use alloy::providers::ProviderBuilder;
use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::app::App;
use crate::config::Config;
use crate::data::DataService;
use crate::data::contract::{AlloyContract, ContractBackend};
use crate::data::network::TARGET;
use crate::data::wallet::{RpcWallet, WalletProvider};

/// Log to a file; the terminal belongs to the UI.
fn init_logging(config: &Config) -> Result<()> {
    let path = config.log_path();
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).wrap_err_with(|| format!("creating log directory {}", dir.display()))?;
    }
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .wrap_err_with(|| format!("opening log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let config = Config::parse();
    init_logging(&config)?;

    let poll_interval = Duration::from_secs(config.poll_interval_secs.max(1));

    // With a wallet, every call goes through it, as a dApp does with the injected provider.
    // Without one, the configured node still serves the liveness poll.
    let (wallet, backend): (Option<Arc<dyn WalletProvider>>, Arc<dyn ContractBackend>) =
        match config.wallet_url() {
            Some(url) => {
                let provider = ProviderBuilder::new()
                    .on_http(url.parse().wrap_err_with(|| format!("invalid wallet URL {url}"))?);
                info!(%url, "using wallet endpoint");
                (
                    Some(Arc::new(RpcWallet::new(provider.clone(), poll_interval))),
                    Arc::new(AlloyContract::new(provider)),
                )
            }
            None => {
                let provider = ProviderBuilder::new().on_http(TARGET.rpc_url.parse()?);
                info!(rpc = TARGET.rpc_url, "no wallet configured");
                (None, Arc::new(AlloyContract::new(provider)))
            }
        };

    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let data_service = Arc::new(DataService::new(wallet, backend, TARGET, event_tx));
    let mut app = App::with_service(data_service, event_rx, &config);

    let terminal = ratatui::init();
    let result = app.run(terminal).await;
    ratatui::restore();

    result
}
