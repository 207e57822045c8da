//! Ed25519 unlock signer.

use crate::error::{Error, Result};
use crate::ledger::{Address, AddressSigner, Signature};
use ed25519_dalek::{Signer, SigningKey};

/// Signs for the single Ed25519 address its key controls.
#[derive(Clone)]
pub struct Ed25519Signer {
    key: SigningKey,
    address: Address,
}

impl Ed25519Signer {
    /// Wrap a 32-byte Ed25519 secret.
    #[must_use]
    pub fn from_secret(secret: [u8; 32]) -> Self {
        let key = SigningKey::from_bytes(&secret);
        let address = Address::from_ed25519_public_key(key.verifying_key().as_bytes());
        Self { key, address }
    }

    /// The address this signer unlocks.
    #[must_use]
    pub fn address(&self) -> Address {
        self.address
    }

    /// The public key.
    #[must_use]
    pub fn public_key(&self) -> [u8; 32] {
        self.key.verifying_key().to_bytes()
    }
}

impl std::fmt::Debug for Ed25519Signer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ed25519Signer")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

impl AddressSigner for Ed25519Signer {
    fn sign(&self, address: &Address, message: &[u8]) -> Result<Signature> {
        if *address != self.address {
            return Err(Error::Wallet(format!("no key for address {address}")));
        }
        Ok(Signature {
            public_key: self.public_key(),
            signature: self.key.sign(message).to_bytes(),
        })
    }
}
