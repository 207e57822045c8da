//! REST client for the node core API.

use super::NodeClient;
use crate::error::{Error, Result};
use crate::ledger::dto::OutputResponse;
use crate::ledger::{Block, BlockId, Output, OutputId, ProtocolParameters};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

const INFO_PATH: &str = "/api/core/v2/info";
const TIPS_PATH: &str = "/api/core/v2/tips";
const BLOCKS_PATH: &str = "/api/core/v2/blocks";
const OUTPUTS_PATH: &str = "/api/core/v2/outputs";
const ROUTES_PATH: &str = "/api/routes";

/// Media type of packed binary blocks.
const BINARY_BLOCK_MEDIA_TYPE: &str = "application/vnd.iota.serializer-v1";

#[derive(Deserialize)]
struct InfoResponse {
    protocol: ProtocolParameters,
}

#[derive(Deserialize)]
struct TipsResponse {
    tips: Vec<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubmitBlockResponse {
    block_id: String,
}

#[derive(Deserialize)]
struct RoutesResponse {
    routes: Vec<String>,
}

/// HTTP client for one node.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct HttpNodeClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpNodeClient {
    /// Create a client for the node at `base_url`. Every request, body
    /// included, must complete within `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Node`] if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Node(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.client
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        tracing::debug!(url = %url, "GET");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| transport_error(&format!("GET {path}"), &e))?;
        Self::decode(path, response).await
    }

    async fn decode<T: DeserializeOwned>(path: &str, response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Node(format!("{path} returned status {status}")));
        }
        response.json().await.map_err(|e| {
            if e.is_timeout() {
                Error::Timeout(format!("reading {path}"))
            } else {
                Error::Codec(format!("{path}: {e}"))
            }
        })
    }

    /// Routes the node exposes, such as `indexer/v1` when the indexer
    /// plugin is running.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Node`] on transport or status errors.
    pub async fn routes(&self) -> Result<Vec<String>> {
        let response: RoutesResponse = self.get_json(ROUTES_PATH).await?;
        Ok(response.routes)
    }
}

/// Deadline overruns become [`Error::Timeout`]; other failures are node errors.
fn transport_error(request: &str, e: &reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::Timeout(request.to_string())
    } else {
        Error::Node(format!("{request}: {e}"))
    }
}

#[async_trait]
impl NodeClient for HttpNodeClient {
    async fn protocol_parameters(&self) -> Result<ProtocolParameters> {
        let info: InfoResponse = self.get_json(INFO_PATH).await?;
        Ok(info.protocol)
    }

    async fn tips(&self) -> Result<Vec<BlockId>> {
        let response: TipsResponse = self.get_json(TIPS_PATH).await?;
        response.tips.iter().map(|t| BlockId::from_hex(t)).collect()
    }

    async fn submit_block(&self, block: &Block) -> Result<BlockId> {
        let body = block.pack()?;
        let url = self.url(BLOCKS_PATH);
        tracing::debug!(url = %url, bytes = body.len(), "POST block");

        let response = self
            .client
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, BINARY_BLOCK_MEDIA_TYPE)
            .body(body)
            .send()
            .await
            .map_err(|e| transport_error(&format!("POST {BLOCKS_PATH}"), &e))?;
        let submitted: SubmitBlockResponse = Self::decode(BLOCKS_PATH, response).await?;
        BlockId::from_hex(&submitted.block_id)
    }

    async fn output(&self, output_id: &OutputId) -> Result<Output> {
        let path = format!("{OUTPUTS_PATH}/{}", output_id.to_hex());
        let response: OutputResponse = self.get_json(&path).await?;
        response.output.try_into()
    }
}
