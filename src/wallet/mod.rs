//! Service wallet.
//!
//! The seed phrase is read from an environment variable on every request and
//! turned into a request-scoped [`WalletIdentity`]: the spending address in
//! raw and bech32 form plus a signer for it. Nothing derived here is cached.

mod hd;
mod signer;

pub use hd::HdWallet;
pub use signer::Ed25519Signer;

use crate::config::WalletConfig;
use crate::error::{Error, Result};
use crate::ledger::{Address, ProtocolParameters};
use tracing::debug;

/// Read the seed phrase from `var`, split on single spaces.
///
/// # Errors
///
/// Returns [`Error::EnvVarNotSet`] if the variable is absent or empty.
pub fn load_seed_phrase(var: &str) -> Result<Vec<String>> {
    match std::env::var(var) {
        Ok(value) if !value.is_empty() => Ok(value.split(' ').map(str::to_string).collect()),
        _ => Err(Error::EnvVarNotSet(var.to_string())),
    }
}

/// Address and signer the service spends from for one request.
#[derive(Debug, Clone)]
pub struct WalletIdentity {
    /// Bech32 rendering under the network's prefix.
    pub bech32_address: String,
    /// Raw address.
    pub address: Address,
    /// Signer for `address`.
    pub signer: Ed25519Signer,
}

impl WalletIdentity {
    /// Derive the identity configured in `config` from `words`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Wallet`] if the mnemonic is malformed or derivation
    /// fails, and [`Error::Codec`] if the network prefix is unusable.
    pub fn derive(
        params: &ProtocolParameters,
        words: &[String],
        config: &WalletConfig,
    ) -> Result<Self> {
        let wallet = HdWallet::new(
            words,
            &config.passphrase,
            config.coin_type,
            config.account_index,
            false,
        )?;
        debug!("Wallet created");

        let (address, signer) = wallet.address_and_signer(config.address_index)?;
        let bech32_address = address.to_bech32(&params.bech32_hrp)?;
        debug!("Derived address {bech32_address}");

        Ok(Self {
            bech32_address,
            address,
            signer,
        })
    }
}
