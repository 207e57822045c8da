//! Command-line interface definition.

use clap::Parser;
use hash_notarizer::NotarizerConfig;
use std::path::PathBuf;

/// Anchors document hashes on a UTXO ledger and verifies them later.
#[derive(Parser, Debug)]
#[command(name = "hash-notarizer")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Address the HTTP server listens on.
    #[arg(long, env = "NOTARIZER_BIND_ADDRESS")]
    pub bind_address: Option<String>,

    /// Base URL of the ledger node REST API.
    #[arg(long, env = "NOTARIZER_NODE_URL")]
    pub node_url: Option<String>,

    /// Environment variable holding the wallet seed phrase.
    #[arg(long, env = "NOTARIZER_MNEMONIC_ENV")]
    pub mnemonic_env: Option<String>,

    /// BIP-44 coin type used for key derivation.
    #[arg(long, env = "NOTARIZER_COIN_TYPE")]
    pub coin_type: Option<u32>,

    /// Log every HTTP request and response.
    #[arg(long, env = "NOTARIZER_DEBUG_REQUEST_LOGGER")]
    pub debug_request_logger: bool,

    /// Log level.
    #[arg(long, env = "RUST_LOG")]
    pub log_level: Option<String>,

    /// Emit logs as JSON lines.
    #[arg(long, env = "NOTARIZER_LOG_JSON")]
    pub log_json: bool,

    /// Path to configuration file.
    #[arg(long, short)]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Convert CLI arguments into a [`NotarizerConfig`].
    ///
    /// # Errors
    ///
    /// Returns an error if a config file is specified but cannot be loaded.
    pub fn into_config(self) -> color_eyre::Result<NotarizerConfig> {
        let mut config = if let Some(ref path) = self.config {
            NotarizerConfig::from_file(path)?
        } else {
            NotarizerConfig::default()
        };

        if let Some(bind_address) = self.bind_address {
            config.rest_api.bind_address = bind_address;
        }
        if let Some(url) = self.node_url {
            config.node.url = url;
        }
        if let Some(mnemonic_env) = self.mnemonic_env {
            config.wallet.mnemonic_env = mnemonic_env;
        }
        if let Some(coin_type) = self.coin_type {
            config.wallet.coin_type = coin_type;
        }
        if let Some(log_level) = self.log_level {
            config.log_level = log_level;
        }
        config.rest_api.debug_request_logger_enabled |= self.debug_request_logger;

        Ok(config)
    }
}
