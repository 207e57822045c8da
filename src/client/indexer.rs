//! REST client for the node's indexer plugin.

use super::node::HttpNodeClient;
use super::{Indexer, IndexerProvider, NodeClient, OutputPages, UnspentOutput};
use crate::error::{Error, Result};
use crate::ledger::{Address, OutputId};
use async_trait::async_trait;
use futures::stream;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

const INDEXER_ROUTE: &str = "indexer/v1";
const BASIC_OUTPUTS_PATH: &str = "/api/indexer/v1/outputs/basic";
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// One page of indexer results: output ids plus the cursor of the next page.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IndexerPage {
    cursor: Option<String>,
    items: Vec<String>,
}

enum Cursor {
    First,
    Next(String),
    Done,
}

/// Waits for the indexer route to appear on the node.
#[derive(Debug, Clone)]
pub struct HttpIndexerProvider {
    node: HttpNodeClient,
    poll_interval: Duration,
}

impl HttpIndexerProvider {
    /// Provider polling `node` at the default interval.
    #[must_use]
    pub fn new(node: HttpNodeClient) -> Self {
        Self {
            node,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Override the polling interval.
    #[must_use]
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }
}

#[async_trait]
impl IndexerProvider for HttpIndexerProvider {
    async fn indexer(&self) -> Result<Arc<dyn Indexer>> {
        loop {
            let routes = self
                .node
                .routes()
                .await
                .map_err(|e| Error::Indexer(format!("listing node routes failed: {e}")))?;
            if routes.iter().any(|r| r == INDEXER_ROUTE) {
                return Ok(Arc::new(HttpIndexer {
                    node: self.node.clone(),
                }));
            }
            debug!("Indexer route not yet available, polling again");
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

/// Indexer queries, resolving every listed id through the core API.
#[derive(Debug, Clone)]
pub struct HttpIndexer {
    node: HttpNodeClient,
}

impl HttpIndexer {
    async fn page(&self, address: &str, cursor: Option<&str>) -> Result<IndexerPage> {
        let mut query = vec![("address", address)];
        if let Some(cursor) = cursor {
            query.push(("cursor", cursor));
        }

        let response = self
            .node
            .http()
            .get(self.node.url(BASIC_OUTPUTS_PATH))
            .query(&query)
            .send()
            .await
            .map_err(|e| Error::Indexer(format!("query failed: {e}")))?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Indexer(format!("query returned status {status}")));
        }
        response
            .json()
            .await
            .map_err(|e| Error::Indexer(format!("malformed page: {e}")))
    }

    async fn resolve(&self, owner: Address, ids: Vec<String>) -> Result<Vec<UnspentOutput>> {
        let mut outputs = Vec::with_capacity(ids.len());
        for id in ids {
            let output_id = OutputId::from_hex(&id)
                .map_err(|e| Error::Indexer(format!("indexer listed bad id: {e}")))?;
            let output = self
                .node
                .output(&output_id)
                .await
                .map_err(|e| Error::Indexer(format!("resolving {output_id} failed: {e}")))?;
            outputs.push(UnspentOutput {
                output_id,
                output,
                owner,
            });
        }
        Ok(outputs)
    }

    async fn next_page(
        &self,
        bech32: &str,
        cursor: Cursor,
    ) -> Result<Option<(Vec<UnspentOutput>, Cursor)>> {
        let cursor = match cursor {
            Cursor::Done => return Ok(None),
            Cursor::First => None,
            Cursor::Next(c) => Some(c),
        };
        let (_, owner) = Address::try_from_bech32(bech32)
            .map_err(|e| Error::Indexer(format!("bad query address: {e}")))?;

        let page = self.page(bech32, cursor.as_deref()).await?;
        debug!(
            items = page.items.len(),
            more = page.cursor.is_some(),
            "Indexer page received"
        );
        let next = page.cursor.map_or(Cursor::Done, Cursor::Next);
        let outputs = self.resolve(owner, page.items).await?;
        Ok(Some((outputs, next)))
    }
}

impl Indexer for HttpIndexer {
    fn basic_outputs_by_address<'a>(&'a self, bech32: &'a str) -> OutputPages<'a> {
        Box::pin(stream::try_unfold(Cursor::First, move |cursor| {
            self.next_page(bech32, cursor)
        }))
    }
}
