//! Ledger data model.
//!
//! Identifiers, addresses, outputs, transactions and blocks of a
//! Stardust-style UTXO ledger, together with:
//!
//! - the canonical binary packing the node hashes and validates
//! - BLAKE2b-256 identifiers derived from packed bytes
//! - the JSON form the node REST API uses for outputs
//!
//! All multi-byte integers pack little-endian.

mod address;
mod block;
pub mod dto;
mod id;
mod output;
mod packer;
mod params;
mod transaction;

pub use address::Address;
pub use block::{Block, BlockBuilder, BLOCK_MAX_PARENTS, BLOCK_MIN_PARENTS};
pub use id::{BlockId, OutputId, TransactionId, OUTPUT_ID_LENGTH};
pub use output::{
    AliasOutput, BasicOutput, Feature, FoundryOutput, NativeToken, NftOutput, Output,
    UnlockCondition, MAX_METADATA_LENGTH, MAX_TAG_LENGTH,
};
pub use packer::Packer;
pub use params::{ProtocolParameters, RentStructure};
pub use transaction::{
    AddressSigner, Signature, Transaction, TransactionBuilder, TransactionEssence, TxInput,
    Unlock, UtxoInput, MAX_INPUTS, MAX_OUTPUTS,
};

use crate::error::{Error, Result};
use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};

type Blake2b256 = Blake2b<U32>;

/// BLAKE2b-256 digest of `data`.
#[must_use]
pub fn blake2b256(data: &[u8]) -> [u8; 32] {
    Blake2b256::digest(data).into()
}

/// Render bytes as `0x`-prefixed lowercase hex.
#[must_use]
pub fn to_prefix_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Decode `0x`-prefixed hex.
///
/// # Errors
///
/// Returns [`Error::Codec`] if the prefix is missing or the digits are invalid.
pub fn from_prefix_hex(s: &str) -> Result<Vec<u8>> {
    let digits = s
        .strip_prefix("0x")
        .ok_or_else(|| Error::Codec(format!("hex string '{s}' lacks 0x prefix")))?;
    hex::decode(digits).map_err(|e| Error::Codec(format!("invalid hex '{s}': {e}")))
}

/// Decode `0x`-prefixed hex into a fixed-size array.
///
/// # Errors
///
/// Returns [`Error::Codec`] on invalid hex or a length other than `N`.
pub fn from_prefix_hex_array<const N: usize>(s: &str) -> Result<[u8; N]> {
    let bytes = from_prefix_hex(s)?;
    bytes.as_slice().try_into().map_err(|_| {
        Error::Codec(format!(
            "expected {N} bytes, got {} in '{s}'",
            bytes.len()
        ))
    })
}
