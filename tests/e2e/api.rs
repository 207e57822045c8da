//! HTTP routes driven through the router without a socket.

use super::harness::{notarizer, wallet_address, TestLedger};
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use hash_notarizer::api::create_router;
use hash_notarizer::ledger::BlockId;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn app(ledger: &TestLedger, env: &str) -> Router {
    create_router(Arc::new(notarizer(ledger, env)), false)
}

async fn call(app: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

fn post(uri: &str, body: impl Into<Body>) -> Request<Body> {
    Request::post(uri)
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}

#[tokio::test]
async fn test_health() {
    let ledger = TestLedger::new();
    let (status, body) = call(
        app(&ledger, "HASH_NOTARIZER_API_SEED_HEALTH"),
        Request::get("/health").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_empty());
}

#[tokio::test]
async fn test_create_returns_block_id() {
    let ledger = TestLedger::new();
    ledger.fund(wallet_address(), 1_000_000);

    let (status, body) = call(
        app(&ledger, "HASH_NOTARIZER_API_SEED_CREATE"),
        post("/create/abcd1234", Body::empty()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let json: Value = serde_json::from_slice(&body).unwrap();
    let block_id = json["blockId"].as_str().unwrap();
    assert_eq!(block_id.len(), 66);
    assert_eq!(
        BlockId::from_hex(block_id).unwrap(),
        ledger.blocks()[0].id().unwrap()
    );
}

#[tokio::test]
async fn test_create_without_funds() {
    let ledger = TestLedger::new();
    let (status, body) = call(
        app(&ledger, "HASH_NOTARIZER_API_SEED_POOR"),
        post("/create/abcd1234", Body::empty()),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json, json!({"message": "Error preparing transaction payload"}));
}

#[tokio::test]
async fn test_create_then_verify() {
    let ledger = TestLedger::new();
    ledger.fund(wallet_address(), 1_000_000);
    let app = app(&ledger, "HASH_NOTARIZER_API_SEED_ROUND_TRIP");

    let (status, _) = call(app.clone(), post("/create/abcd1234", Body::empty())).await;
    assert_eq!(status, StatusCode::OK);
    let output_id = ledger.blocks()[0].payload.output_id(0).to_hex();

    let request = json!({"hash": "abcd1234", "outputID": output_id}).to_string();
    let (status, body) = call(app.clone(), post("/verify", request)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        serde_json::from_slice::<Value>(&body).unwrap(),
        json!({"match": true})
    );

    let request = json!({"hash": "ffff", "outputID": output_id}).to_string();
    let (_, body) = call(app, post("/verify", request)).await;
    assert_eq!(
        serde_json::from_slice::<Value>(&body).unwrap(),
        json!({"match": false})
    );
}

#[tokio::test]
async fn test_verify_undecodable_body() {
    let ledger = TestLedger::new();
    let (status, body) = call(
        app(&ledger, "HASH_NOTARIZER_API_SEED_BAD_BODY"),
        post("/verify", "{not json"),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        serde_json::from_slice::<Value>(&body).unwrap(),
        json!({"message": "Error decoding request body"})
    );
}

#[tokio::test]
async fn test_verify_bad_output_id() {
    let ledger = TestLedger::new();
    let request = json!({"hash": "abcd1234", "outputID": "0x1234"}).to_string();
    let (status, body) = call(
        app(&ledger, "HASH_NOTARIZER_API_SEED_BAD_ID"),
        post("/verify", request),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        serde_json::from_slice::<Value>(&body).unwrap(),
        json!({"message": "Error converting outputID string"})
    );
}

#[tokio::test]
async fn test_unknown_route() {
    let ledger = TestLedger::new();
    let (status, _) = call(
        app(&ledger, "HASH_NOTARIZER_API_SEED_404"),
        Request::get("/nope").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
