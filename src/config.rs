//! Configuration for hash-notarizer.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotarizerConfig {
    /// HTTP server configuration.
    #[serde(default)]
    pub rest_api: RestApiConfig,

    /// Ledger node configuration.
    #[serde(default)]
    pub node: NodeConfig,

    /// Wallet configuration.
    #[serde(default)]
    pub wallet: WalletConfig,

    /// Log level.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestApiConfig {
    /// Address the HTTP server listens on.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Log every request and response at debug level.
    #[serde(default)]
    pub debug_request_logger_enabled: bool,
}

/// Ledger node configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Base URL of the node REST API.
    #[serde(default = "default_node_url")]
    pub url: String,

    /// Deadline for a single indexer query, in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Deadline for the indexer to become available, in seconds.
    #[serde(default = "default_indexer_available_timeout")]
    pub indexer_available_timeout_secs: u64,
}

/// Wallet configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletConfig {
    /// Environment variable holding the seed phrase.
    #[serde(default = "default_mnemonic_env")]
    pub mnemonic_env: String,

    /// BIP-39 passphrase.
    #[serde(default)]
    pub passphrase: String,

    /// BIP-44 coin type.
    #[serde(default = "default_coin_type")]
    pub coin_type: u32,

    /// BIP-44 account index.
    #[serde(default)]
    pub account_index: u32,

    /// BIP-44 address index.
    #[serde(default)]
    pub address_index: u32,
}

impl Default for NotarizerConfig {
    fn default() -> Self {
        Self {
            rest_api: RestApiConfig::default(),
            node: NodeConfig::default(),
            wallet: WalletConfig::default(),
            log_level: default_log_level(),
        }
    }
}

impl Default for RestApiConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            debug_request_logger_enabled: false,
        }
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            url: default_node_url(),
            request_timeout_secs: default_request_timeout(),
            indexer_available_timeout_secs: default_indexer_available_timeout(),
        }
    }
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            mnemonic_env: default_mnemonic_env(),
            passphrase: String::new(),
            coin_type: default_coin_type(),
            account_index: 0,
            address_index: 0,
        }
    }
}

impl NodeConfig {
    /// Deadline for a single indexer query.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Deadline for the indexer to become available.
    #[must_use]
    pub fn indexer_available_timeout(&self) -> Duration {
        Duration::from_secs(self.indexer_available_timeout_secs)
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_bind_address() -> String {
    "localhost:9687".to_string()
}

fn default_node_url() -> String {
    "http://localhost:14265".to_string()
}

const fn default_request_timeout() -> u64 {
    5
}

const fn default_indexer_available_timeout() -> u64 {
    30
}

fn default_mnemonic_env() -> String {
    "MNEMONIC".to_string()
}

const fn default_coin_type() -> u32 {
    4218
}

impl NotarizerConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Save configuration to a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn to_file(&self, path: &std::path::Path) -> crate::Result<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
