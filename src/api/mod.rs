//! HTTP routes.
//!
//! | Method | Path            | Success                      |
//! |--------|-----------------|------------------------------|
//! | GET    | `/health`       | 200, empty body              |
//! | POST   | `/create/:hash` | 200, `{"blockId": "0x…"}`    |
//! | POST   | `/verify`       | 200, `{"match": true/false}` |
//!
//! Every failure is a 500 with `{"message": ...}` naming the failed stage;
//! the underlying error is only logged.

mod handlers;

pub use handlers::{CreateResponse, VerifyRequest, VerifyResponse};

use crate::error::StageError;
use crate::notarizer::Notarizer;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// How long in-flight requests may keep running once shutdown begins.
pub const DEFAULT_SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    /// The engine behind every route.
    pub notarizer: Arc<Notarizer>,
}

/// Build the router. With `debug_request_logger` set, every request and
/// response is traced.
pub fn create_router(notarizer: Arc<Notarizer>, debug_request_logger: bool) -> Router {
    let router = Router::new()
        .route("/health", get(handlers::health))
        .route("/create/:hash", post(handlers::create_notarization))
        .route("/verify", post(handlers::verify_notarization))
        .with_state(AppState { notarizer });

    if debug_request_logger {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

/// Serve `router` on `listener` until `shutdown` fires.
///
/// New connections stop at the signal. Requests still running `grace`
/// later are abandoned and the call returns; they end with the runtime.
///
/// # Errors
///
/// Returns the server's I/O error.
pub async fn serve(
    listener: TcpListener,
    router: Router,
    mut shutdown: broadcast::Receiver<()>,
    grace: Duration,
) -> std::io::Result<()> {
    let mut deadline = shutdown.resubscribe();
    let server = axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            let _ = shutdown.recv().await;
            info!("Shutting down, draining in-flight requests");
        })
        .into_future();

    tokio::select! {
        result = server => result,
        () = async move {
            let _ = deadline.recv().await;
            tokio::time::sleep(grace).await;
        } => {
            warn!("Requests still running after {grace:?}, abandoning them");
            Ok(())
        }
    }
}

/// Error body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Failed stage, without internal detail.
    pub message: String,
}

/// A stage failure rendered as a generic server error.
#[derive(Debug)]
pub struct ApiError(pub StageError);

impl From<StageError> for ApiError {
    fn from(err: StageError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let StageError { stage, source } = self.0;
        tracing::error!("{stage}: {source}");
        let body = ErrorResponse {
            message: stage.message().to_string(),
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}
