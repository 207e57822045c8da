//! Blocks carrying a transaction payload to the ledger.

use super::{blake2b256, BlockId, Packer, Transaction};
use crate::error::{Error, Result};

/// Minimum number of parents a block references.
pub const BLOCK_MIN_PARENTS: usize = 1;

/// Maximum number of parents a block references.
pub const BLOCK_MAX_PARENTS: usize = 8;

/// A block: parents, payload and proof-of-work nonce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// Protocol version the block is issued under.
    pub protocol_version: u8,
    /// Sorted, unique parent block ids.
    pub parents: Vec<BlockId>,
    /// Transaction payload.
    pub payload: Transaction,
    /// Proof-of-work nonce. Zero lets the node do the work.
    pub nonce: u64,
}

impl Block {
    /// Canonical binary form.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BlockBuild`] if the payload does not fit a `u32`
    /// length prefix.
    #[allow(clippy::cast_possible_truncation)]
    pub fn pack(&self) -> Result<Vec<u8>> {
        let payload = self.payload.pack();
        let payload_len = u32::try_from(payload.len())
            .map_err(|_| Error::BlockBuild("payload too large".to_string()))?;

        let mut p = Packer::new();
        p.u8(self.protocol_version);
        // Parent count is capped at BLOCK_MAX_PARENTS by the builder.
        p.u8(self.parents.len() as u8);
        for parent in &self.parents {
            p.bytes(&parent.0);
        }
        p.u32(payload_len).bytes(&payload).u64(self.nonce);
        Ok(p.finish())
    }

    /// BLAKE2b-256 of the packed block.
    ///
    /// # Errors
    ///
    /// Propagates packing errors.
    pub fn id(&self) -> Result<BlockId> {
        Ok(BlockId(blake2b256(&self.pack()?)))
    }
}

/// Builds a [`Block`] from tips and a payload.
#[derive(Debug, Default)]
pub struct BlockBuilder {
    protocol_version: Option<u8>,
    parents: Vec<BlockId>,
    payload: Option<Transaction>,
}

impl BlockBuilder {
    /// Start an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the protocol version.
    #[must_use]
    pub fn protocol_version(mut self, version: u8) -> Self {
        self.protocol_version = Some(version);
        self
    }

    /// Set the parents; duplicates are dropped and the rest sorted.
    #[must_use]
    pub fn parents(mut self, parents: impl IntoIterator<Item = BlockId>) -> Self {
        self.parents = parents.into_iter().collect();
        self
    }

    /// Set the transaction payload.
    #[must_use]
    pub fn payload(mut self, payload: Transaction) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Validate and produce the block.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BlockBuild`] if the version or payload is missing or
    /// the number of distinct parents is outside
    /// `BLOCK_MIN_PARENTS..=BLOCK_MAX_PARENTS`.
    pub fn build(self) -> Result<Block> {
        let protocol_version = self
            .protocol_version
            .ok_or_else(|| Error::BlockBuild("protocol version not set".to_string()))?;
        let payload = self
            .payload
            .ok_or_else(|| Error::BlockBuild("payload not set".to_string()))?;

        let mut parents = self.parents;
        parents.sort_unstable();
        parents.dedup();
        if !(BLOCK_MIN_PARENTS..=BLOCK_MAX_PARENTS).contains(&parents.len()) {
            return Err(Error::BlockBuild(format!(
                "{} parents outside {BLOCK_MIN_PARENTS}..={BLOCK_MAX_PARENTS}",
                parents.len()
            )));
        }

        Ok(Block {
            protocol_version,
            parents,
            payload,
            nonce: 0,
        })
    }
}
