//! Unspent output retrieval through the indexer.

use crate::client::{IndexerProvider, UnspentOutput};
use crate::error::{Error, Result};
use futures::TryStreamExt;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, Instrument, Span};

/// Drains the indexer's result pages for one address.
pub struct UtxoFetcher {
    provider: Arc<dyn IndexerProvider>,
    indexer_available_timeout: Duration,
    request_timeout: Duration,
    span: Span,
}

impl UtxoFetcher {
    /// Create a fetcher with its two deadlines.
    #[must_use]
    pub fn new(
        provider: Arc<dyn IndexerProvider>,
        indexer_available_timeout: Duration,
        request_timeout: Duration,
        span: Span,
    ) -> Self {
        Self {
            provider,
            indexer_available_timeout,
            request_timeout,
            span,
        }
    }

    /// Every unspent output owned by `bech32`.
    ///
    /// Acquiring the indexer is bounded by the availability deadline and
    /// the query by the request deadline. A failed page fails the whole
    /// fetch.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Timeout`] when a deadline passes and
    /// [`Error::Indexer`] when acquisition or any page fails.
    pub async fn fetch(&self, bech32: &str) -> Result<Vec<UnspentOutput>> {
        async {
            debug!("Fetching unspent outputs for address: {bech32}");

            let indexer = timeout(self.indexer_available_timeout, self.provider.indexer())
                .await
                .map_err(|_| Error::Timeout("waiting for the indexer".to_string()))?
                .map_err(|e| Error::Indexer(format!("failed to get indexer client: {e}")))?;

            let drain = async {
                let mut pages = indexer.basic_outputs_by_address(bech32);
                let mut outputs = Vec::new();
                while let Some(page) = pages.try_next().await.map_err(as_indexer_error)? {
                    outputs.extend(page);
                }
                Ok::<_, Error>(outputs)
            };
            let outputs = timeout(self.request_timeout, drain)
                .await
                .map_err(|_| Error::Timeout("indexer query".to_string()))??;

            debug!(count = outputs.len(), "Fetched unspent outputs");
            Ok::<_, Error>(outputs)
        }
        .instrument(self.span.clone())
        .await
    }
}

fn as_indexer_error(e: Error) -> Error {
    match e {
        Error::Indexer(_) => e,
        other => Error::Indexer(format!("indexer result set error: {other}")),
    }
}
