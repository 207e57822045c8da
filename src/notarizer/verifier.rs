//! Checking a claimed hash against an output on the ledger.

use crate::client::NodeClient;
use crate::error::{Error, Result};
use crate::ledger::{Feature, OutputId};
use std::sync::Arc;
use tracing::{debug, Instrument, Span};

/// Resolves outputs and compares their metadata with claimed hashes.
pub struct Verifier {
    node: Arc<dyn NodeClient>,
    span: Span,
}

impl Verifier {
    /// Create a verifier backed by `node`.
    #[must_use]
    pub fn new(node: Arc<dyn NodeClient>, span: Span) -> Self {
        Self { node, span }
    }

    /// Whether the output at `output_id` carries `hash` as metadata.
    ///
    /// An output that cannot be resolved is a negative result, not an
    /// error. A match requires byte equality with some metadata feature.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOutputId`] for a malformed id and
    /// [`Error::UnexpectedOutputType`] when the output is not basic.
    pub async fn verify(&self, hash: &str, output_id: &str) -> Result<bool> {
        async {
            let output_id = OutputId::from_hex(output_id)?;

            let output = match self.node.output(&output_id).await {
                Ok(output) => output,
                Err(e) => {
                    debug!("No output found for {output_id}: {e}");
                    return Ok(false);
                }
            };

            let basic = output
                .as_basic()
                .ok_or_else(|| Error::UnexpectedOutputType(output.kind_name().to_string()))?;

            let matched = basic
                .features
                .iter()
                .filter_map(Feature::as_metadata)
                .any(|data| data == hash.as_bytes());
            debug!(matched, "Compared metadata of {output_id}");
            Ok::<_, Error>(matched)
        }
        .instrument(self.span.clone())
        .await
    }
}
