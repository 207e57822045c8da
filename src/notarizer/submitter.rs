//! Attaching a transaction to the ledger.

use crate::client::NodeClient;
use crate::error::{Error, Result};
use crate::ledger::{BlockBuilder, BlockId, Transaction};
use std::sync::Arc;
use tracing::{debug, info, Instrument, Span};

/// Wraps transactions in blocks on top of the current tips and submits them.
pub struct BlockSubmitter {
    node: Arc<dyn NodeClient>,
    span: Span,
}

impl BlockSubmitter {
    /// Create a submitter for `node`.
    #[must_use]
    pub fn new(node: Arc<dyn NodeClient>, span: Span) -> Self {
        Self { node, span }
    }

    /// Submit `transaction` and return the id of the block carrying it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TipFetch`] or [`Error::BlockBuild`] when the block
    /// could not be prepared, in which case nothing was sent, and
    /// [`Error::Submit`] when the node rejected or never acknowledged it.
    pub async fn submit(&self, protocol_version: u8, transaction: Transaction) -> Result<BlockId> {
        async {
            debug!("Transaction ID: {}", transaction.id());

            let tips = self
                .node
                .tips()
                .await
                .map_err(|e| Error::TipFetch(e.to_string()))?;

            let block = BlockBuilder::new()
                .protocol_version(protocol_version)
                .parents(tips)
                .payload(transaction)
                .build()?;

            let block_id = self
                .node
                .submit_block(&block)
                .await
                .map_err(|e| Error::Submit(e.to_string()))?;

            info!("Block attached with ID: {block_id}");
            Ok::<_, Error>(block_id)
        }
        .instrument(self.span.clone())
        .await
    }
}
