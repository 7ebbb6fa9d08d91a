use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "whitelist-tui",
    about = "Terminal client for a whitelisted request registry contract"
)]
pub struct Config {
    /// Wallet JSON-RPC endpoint that holds the accounts and signs (empty: no wallet)
    #[arg(long, env = "WALLET_RPC_URL", default_value = "http://127.0.0.1:1248")]
    pub wallet_url: String,

    /// Seconds between chain liveness polls
    #[arg(long, default_value = "12")]
    pub poll_interval_secs: u64,

    /// Tick rate in milliseconds for UI refresh
    #[arg(long, default_value = "100")]
    pub tick_rate_ms: u64,

    /// Log file path (defaults to the platform data directory)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Directory that exported request lists are written to
    #[arg(long, default_value = ".")]
    pub export_dir: PathBuf,
}

impl Config {
    /// `None` when the wallet endpoint is blank.
    pub fn wallet_url(&self) -> Option<&str> {
        let url = self.wallet_url.trim();
        (!url.is_empty()).then_some(url)
    }

    pub fn log_path(&self) -> PathBuf {
        self.log_file.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("whitelist-tui")
                .join("whitelist-tui.log")
        })
    }
}
