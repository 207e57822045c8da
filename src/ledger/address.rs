//! Ledger addresses and their bech32 form.

use super::{blake2b256, Packer};
use crate::error::{Error, Result};
use bech32::{FromBase32, ToBase32, Variant};
use std::fmt;

const ED25519_ADDRESS_TYPE: u8 = 0;
const ALIAS_ADDRESS_TYPE: u8 = 8;
const NFT_ADDRESS_TYPE: u8 = 16;

/// An address that can own outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Address {
    /// BLAKE2b-256 hash of an Ed25519 public key.
    Ed25519([u8; 32]),
    /// Address of an alias output.
    Alias([u8; 32]),
    /// Address of an NFT output.
    Nft([u8; 32]),
}

impl Address {
    /// Derive the Ed25519 address of a public key.
    #[must_use]
    pub fn from_ed25519_public_key(public_key: &[u8; 32]) -> Self {
        Self::Ed25519(blake2b256(public_key))
    }

    /// Type byte used in the binary and bech32 encodings.
    #[must_use]
    pub fn kind(&self) -> u8 {
        match self {
            Self::Ed25519(_) => ED25519_ADDRESS_TYPE,
            Self::Alias(_) => ALIAS_ADDRESS_TYPE,
            Self::Nft(_) => NFT_ADDRESS_TYPE,
        }
    }

    fn hash(&self) -> &[u8; 32] {
        match self {
            Self::Ed25519(h) | Self::Alias(h) | Self::Nft(h) => h,
        }
    }

    /// Rebuild an address from its type byte and 32-byte body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Codec`] for an unknown type byte.
    pub fn from_parts(kind: u8, hash: [u8; 32]) -> Result<Self> {
        match kind {
            ED25519_ADDRESS_TYPE => Ok(Self::Ed25519(hash)),
            ALIAS_ADDRESS_TYPE => Ok(Self::Alias(hash)),
            NFT_ADDRESS_TYPE => Ok(Self::Nft(hash)),
            other => Err(Error::Codec(format!("unknown address type {other}"))),
        }
    }

    pub(crate) fn pack(&self, p: &mut Packer) {
        p.u8(self.kind()).bytes(self.hash());
    }

    /// Encode as bech32 with the given human-readable prefix.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Codec`] if the prefix is not a valid bech32 HRP.
    pub fn to_bech32(&self, hrp: &str) -> Result<String> {
        let mut data = Vec::with_capacity(33);
        data.push(self.kind());
        data.extend_from_slice(self.hash());
        bech32::encode(hrp, data.to_base32(), Variant::Bech32)
            .map_err(|e| Error::Codec(format!("bech32 encoding failed: {e}")))
    }

    /// Decode a bech32 address, returning the prefix and the address.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Codec`] on checksum, variant or length errors.
    pub fn try_from_bech32(s: &str) -> Result<(String, Self)> {
        let (hrp, data, variant) =
            bech32::decode(s).map_err(|e| Error::Codec(format!("invalid bech32 '{s}': {e}")))?;
        if variant != Variant::Bech32 {
            return Err(Error::Codec(format!("'{s}' is not bech32")));
        }
        let bytes = Vec::<u8>::from_base32(&data)
            .map_err(|e| Error::Codec(format!("invalid bech32 data in '{s}': {e}")))?;
        let Some((&kind, body)) = bytes.split_first() else {
            return Err(Error::Codec(format!("empty bech32 payload in '{s}'")));
        };
        let hash: [u8; 32] = body
            .try_into()
            .map_err(|_| Error::Codec(format!("bad address length in '{s}'")))?;
        Ok((hrp, Self::from_parts(kind, hash)?))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind(), hex::encode(self.hash()))
    }
}
