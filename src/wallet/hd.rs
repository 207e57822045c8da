//! Hierarchical deterministic Ed25519 keys.
//!
//! Ed25519 only supports hardened derivation, so every path segment is
//! hardened: `m/44'/coin'/account'/change'/index'`.

use super::signer::Ed25519Signer;
use crate::error::{Error, Result};
use crate::ledger::Address;
use bip39::{Language, Mnemonic};
use hmac::{Hmac, Mac};
use sha2::Sha512;

type HmacSha512 = Hmac<Sha512>;

const HARDENED_OFFSET: u32 = 0x8000_0000;
const BIP44_PURPOSE: u32 = 44;
const MASTER_KEY_SALT: &[u8] = b"ed25519 seed";

/// Private key plus chain code at one node of the derivation tree.
struct ExtendedKey {
    key: [u8; 32],
    chain_code: [u8; 32],
}

impl ExtendedKey {
    fn from_hmac(key: &[u8], data: &[&[u8]]) -> Result<Self> {
        let mut mac = HmacSha512::new_from_slice(key)
            .map_err(|e| Error::Wallet(format!("HMAC key rejected: {e}")))?;
        for part in data {
            mac.update(part);
        }
        let out = mac.finalize().into_bytes();
        let mut key = [0u8; 32];
        let mut chain_code = [0u8; 32];
        key.copy_from_slice(&out[..32]);
        chain_code.copy_from_slice(&out[32..]);
        Ok(Self { key, chain_code })
    }

    fn master(seed: &[u8]) -> Result<Self> {
        Self::from_hmac(MASTER_KEY_SALT, &[seed])
    }

    fn child(&self, index: u32) -> Result<Self> {
        let hardened = (index | HARDENED_OFFSET).to_be_bytes();
        Self::from_hmac(&self.chain_code, &[&[0u8], &self.key, &hardened])
    }
}

/// An HD wallet rooted in a BIP-39 seed, fixed to one account.
pub struct HdWallet {
    seed: [u8; 64],
    coin_type: u32,
    account_index: u32,
    change: bool,
}

impl std::fmt::Debug for HdWallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HdWallet")
            .field("coin_type", &self.coin_type)
            .field("account_index", &self.account_index)
            .field("change", &self.change)
            .finish_non_exhaustive()
    }
}

impl HdWallet {
    /// Create a wallet from mnemonic words.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Wallet`] on an unknown word, a bad checksum or an
    /// unsupported word count.
    pub fn new(
        words: &[String],
        passphrase: &str,
        coin_type: u32,
        account_index: u32,
        change: bool,
    ) -> Result<Self> {
        let phrase = words.join(" ");
        let mnemonic = Mnemonic::parse_in(Language::English, phrase.as_str())
            .map_err(|e| Error::Wallet(format!("invalid mnemonic: {e}")))?;
        Ok(Self {
            seed: mnemonic.to_seed(passphrase),
            coin_type,
            account_index,
            change,
        })
    }

    /// Derive the Ed25519 address and signer at `address_index`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Wallet`] if an index does not fit the hardened range.
    pub fn address_and_signer(&self, address_index: u32) -> Result<(Address, Ed25519Signer)> {
        let path = [
            BIP44_PURPOSE,
            self.coin_type,
            self.account_index,
            u32::from(self.change),
            address_index,
        ];
        if let Some(bad) = path.iter().find(|i| **i >= HARDENED_OFFSET) {
            return Err(Error::Wallet(format!(
                "path index {bad} exceeds hardened range"
            )));
        }

        let mut node = ExtendedKey::master(&self.seed)?;
        for index in path {
            node = node.child(index)?;
        }

        let signer = Ed25519Signer::from_secret(node.key);
        Ok((signer.address(), signer))
    }
}
