//! Transaction, output and block identifiers.

use super::{from_prefix_hex, from_prefix_hex_array, to_prefix_hex};
use crate::error::{Error, Result};
use std::fmt;

/// Length of an [`OutputId`]: transaction id plus a `u16` output index.
pub const OUTPUT_ID_LENGTH: usize = 34;

/// BLAKE2b-256 of a packed transaction payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TransactionId(pub [u8; 32]);

impl TransactionId {
    /// Render as `0x`-prefixed hex.
    #[must_use]
    pub fn to_hex(&self) -> String {
        to_prefix_hex(&self.0)
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Globally unique key of a ledger output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OutputId {
    transaction_id: TransactionId,
    index: u16,
}

impl OutputId {
    /// Create an output id from its parts.
    #[must_use]
    pub fn new(transaction_id: TransactionId, index: u16) -> Self {
        Self {
            transaction_id,
            index,
        }
    }

    /// Transaction that created the output.
    #[must_use]
    pub fn transaction_id(&self) -> TransactionId {
        self.transaction_id
    }

    /// Position of the output within its transaction.
    #[must_use]
    pub fn index(&self) -> u16 {
        self.index
    }

    /// The 34-byte binary form.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; OUTPUT_ID_LENGTH] {
        let mut out = [0u8; OUTPUT_ID_LENGTH];
        out[..32].copy_from_slice(&self.transaction_id.0);
        out[32..].copy_from_slice(&self.index.to_le_bytes());
        out
    }

    /// Parse the 34-byte binary form.
    #[must_use]
    pub fn from_bytes(bytes: [u8; OUTPUT_ID_LENGTH]) -> Self {
        let mut tx = [0u8; 32];
        tx.copy_from_slice(&bytes[..32]);
        Self {
            transaction_id: TransactionId(tx),
            index: u16::from_le_bytes([bytes[32], bytes[33]]),
        }
    }

    /// Parse `0x`-prefixed hex.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOutputId`] unless `s` is `0x` followed by
    /// exactly 68 hex digits.
    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = from_prefix_hex(s).map_err(|e| Error::InvalidOutputId(e.to_string()))?;
        let bytes: [u8; OUTPUT_ID_LENGTH] = bytes.as_slice().try_into().map_err(|_| {
            Error::InvalidOutputId(format!(
                "expected {OUTPUT_ID_LENGTH} bytes, got {}",
                bytes.len()
            ))
        })?;
        Ok(Self::from_bytes(bytes))
    }

    /// Render as `0x`-prefixed hex.
    #[must_use]
    pub fn to_hex(&self) -> String {
        to_prefix_hex(&self.to_bytes())
    }
}

impl fmt::Display for OutputId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// BLAKE2b-256 of a packed block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(pub [u8; 32]);

impl BlockId {
    /// Parse `0x`-prefixed hex.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Codec`] on malformed input.
    pub fn from_hex(s: &str) -> Result<Self> {
        from_prefix_hex_array(s).map(Self)
    }

    /// Render as `0x`-prefixed hex.
    #[must_use]
    pub fn to_hex(&self) -> String {
        to_prefix_hex(&self.0)
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}
