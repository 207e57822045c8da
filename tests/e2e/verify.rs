//! Verification of notarizations recorded on the in-memory ledger.

use super::harness::{notarizer, wallet_address, TestLedger};
use hash_notarizer::ledger::{AliasOutput, OutputId, Output, TransactionId};
use hash_notarizer::{Error, Stage};

async fn notarized(ledger: &TestLedger, env: &str, hash: &str) -> OutputId {
    ledger.fund(wallet_address(), 1_000_000);
    notarizer(ledger, env).notarize(hash).await.expect("notarizes");
    let blocks = ledger.blocks();
    blocks.last().expect("block").payload.output_id(0)
}

#[tokio::test]
async fn test_round_trip_matches() {
    let ledger = TestLedger::new();
    let output_id = notarized(&ledger, "HASH_NOTARIZER_E2E_SEED_VERIFY", "abcd1234").await;

    let notarizer = notarizer(&ledger, "HASH_NOTARIZER_E2E_SEED_VERIFY");
    assert!(notarizer
        .verify("abcd1234", &output_id.to_hex())
        .await
        .unwrap());
    assert!(!notarizer
        .verify("abcd1235", &output_id.to_hex())
        .await
        .unwrap());
}

#[tokio::test]
async fn test_remainder_output_never_matches() {
    let ledger = TestLedger::new();
    let notarization = notarized(&ledger, "HASH_NOTARIZER_E2E_SEED_REMAINDER", "abcd1234").await;
    let remainder = OutputId::new(notarization.transaction_id(), 1);

    let notarizer = notarizer(&ledger, "HASH_NOTARIZER_E2E_SEED_REMAINDER");
    assert!(!notarizer
        .verify("abcd1234", &remainder.to_hex())
        .await
        .unwrap());
}

#[tokio::test]
async fn test_unknown_output_is_no_match() {
    let ledger = TestLedger::new();
    let notarizer = notarizer(&ledger, "HASH_NOTARIZER_E2E_SEED_UNKNOWN");
    let missing = OutputId::new(TransactionId([0x42; 32]), 3);
    assert!(!notarizer
        .verify("abcd1234", &missing.to_hex())
        .await
        .unwrap());
}

#[tokio::test]
async fn test_malformed_output_id() {
    let ledger = TestLedger::new();
    let notarizer = notarizer(&ledger, "HASH_NOTARIZER_E2E_SEED_MALFORMED");
    let err = notarizer.verify("abcd1234", "0xnothex").await.unwrap_err();
    assert_eq!(err.stage, Stage::ParseOutputId);
    assert!(matches!(err.source, Error::InvalidOutputId(_)));
}

#[tokio::test]
async fn test_non_basic_output() {
    let ledger = TestLedger::new();
    let alias = ledger.insert(Output::Alias(AliasOutput {
        amount: 1_000_000,
        ..Default::default()
    }));
    let notarizer = notarizer(&ledger, "HASH_NOTARIZER_E2E_SEED_ALIAS");
    let err = notarizer
        .verify("abcd1234", &alias.to_hex())
        .await
        .unwrap_err();
    assert_eq!(err.stage, Stage::InspectOutput);
    assert_eq!(err.stage.message(), "Unexpected output type");
}
