//! Route handlers.

use super::{ApiError, AppState};
use crate::error::{Error, Stage, StageError};
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Body of a successful notarization.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateResponse {
    /// Id of the block carrying the notarization.
    #[serde(rename = "blockId")]
    pub block_id: String,
}

/// Body of a verification request.
#[derive(Debug, Serialize, Deserialize)]
pub struct VerifyRequest {
    /// Claimed hash.
    pub hash: String,
    /// Output expected to carry it.
    #[serde(rename = "outputID")]
    pub output_id: String,
}

/// Body of a verification result.
#[derive(Debug, Serialize, Deserialize)]
pub struct VerifyResponse {
    /// Whether the output carries the hash.
    #[serde(rename = "match")]
    pub matched: bool,
}

/// `GET /health`
pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// `POST /create/:hash`
///
/// Runs on its own task so a dropped connection cannot abort a submission
/// halfway.
pub async fn create_notarization(
    State(state): State<AppState>,
    Path(hash): Path<String>,
) -> Result<Json<CreateResponse>, ApiError> {
    let notarizer = state.notarizer.clone();
    let block_id = tokio::spawn(async move { notarizer.notarize(&hash).await })
        .await
        .map_err(|e| StageError {
            stage: Stage::SendBlock,
            source: Error::Submit(format!("notarization task failed: {e}")),
        })??;

    info!("Notarization attached in block {block_id}");
    Ok(Json(CreateResponse {
        block_id: block_id.to_hex(),
    }))
}

/// `POST /verify`
pub async fn verify_notarization(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<VerifyResponse>, ApiError> {
    let request: VerifyRequest = serde_json::from_slice(&body).map_err(|e| StageError {
        stage: Stage::DecodeRequest,
        source: Error::Codec(e.to_string()),
    })?;
    debug!("Verifying hash {} against {}", request.hash, request.output_id);

    let matched = state
        .notarizer
        .verify(&request.hash, &request.output_id)
        .await?;
    Ok(Json(VerifyResponse { matched }))
}
