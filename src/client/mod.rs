//! Ledger node and indexer clients.
//!
//! The engines only see the [`NodeClient`], [`IndexerProvider`] and
//! [`Indexer`] traits. [`HttpNodeClient`] and [`HttpIndexerProvider`] talk
//! to a node's REST API; tests substitute an in-memory ledger.
//!
//! Implementations must be safe to share between concurrent requests: the
//! service holds one instance of each behind an `Arc` and never locks around
//! them.

mod indexer;
mod node;

pub use indexer::{HttpIndexer, HttpIndexerProvider};
pub use node::HttpNodeClient;

use crate::error::Result;
use crate::ledger::{Address, Block, BlockId, Output, OutputId, ProtocolParameters};
use async_trait::async_trait;
use futures::stream::BoxStream;
use std::sync::Arc;

/// An unspent output as reported by the indexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnspentOutput {
    /// Where the output lives in the ledger.
    pub output_id: OutputId,
    /// The output itself.
    pub output: Output,
    /// Address the output was indexed under.
    pub owner: Address,
}

/// Lazy stream of result pages. Ends after the last page; an `Err` item
/// means the query failed.
pub type OutputPages<'a> = BoxStream<'a, Result<Vec<UnspentOutput>>>;

/// Core node API.
#[async_trait]
pub trait NodeClient: Send + Sync {
    /// Parameters of the active protocol.
    async fn protocol_parameters(&self) -> Result<ProtocolParameters>;

    /// Blocks a new block may reference as parents.
    async fn tips(&self) -> Result<Vec<BlockId>>;

    /// Submit a block; returns the id the node assigned.
    async fn submit_block(&self, block: &Block) -> Result<BlockId>;

    /// Look up an output by id, spent or not.
    async fn output(&self, output_id: &OutputId) -> Result<Output>;
}

/// Query interface of the indexer.
pub trait Indexer: Send + Sync {
    /// Unspent basic outputs whose address unlock condition is `bech32`.
    fn basic_outputs_by_address<'a>(&'a self, bech32: &'a str) -> OutputPages<'a>;
}

/// Hands out an indexer once it is available.
#[async_trait]
pub trait IndexerProvider: Send + Sync {
    /// Wait for the indexer and return a handle to it.
    ///
    /// May wait indefinitely; callers bound it with a deadline.
    async fn indexer(&self) -> Result<Arc<dyn Indexer>>;
}
