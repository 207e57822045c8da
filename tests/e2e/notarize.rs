//! Notarization against the in-memory ledger.

use super::harness::{notarizer, notarizer_without_seed, wallet_address, TestLedger};
use hash_notarizer::ledger::{
    Address, BasicOutput, Feature, NativeToken, Output, UnlockCondition,
};
use hash_notarizer::{Error, Stage};

#[tokio::test]
async fn test_notarize_spends_only_plain_outputs() {
    let ledger = TestLedger::new();
    let owner = wallet_address();

    let plain = ledger.fund(owner, 1_000_000);
    let with_metadata = ledger.insert(Output::Basic(
        BasicOutput::with_address(500_000, owner).with_feature(Feature::Metadata(b"old".to_vec())),
    ));
    let mut with_tokens = BasicOutput::with_address(500_000, owner);
    with_tokens.native_tokens.push(NativeToken {
        id: [7; 38],
        amount: [1; 32],
    });
    let with_tokens = ledger.insert(Output::Basic(with_tokens));
    let mut timelocked = BasicOutput::with_address(500_000, owner);
    timelocked
        .unlock_conditions
        .push(UnlockCondition::Timelock { unix_time: 1 });
    let timelocked = ledger.insert(Output::Basic(timelocked));

    let notarizer = notarizer(&ledger, "HASH_NOTARIZER_E2E_SEED_FILTER");
    let block_id = notarizer.notarize("abcd1234").await.expect("notarizes");

    let blocks = ledger.blocks();
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].id().unwrap(), block_id);

    let essence = &blocks[0].payload.essence;
    assert_eq!(essence.inputs.len(), 1);
    assert_eq!(essence.inputs[0].0, plain);
    assert!(ledger.is_spent(&plain));
    for untouched in [with_metadata, with_tokens, timelocked] {
        assert!(!ledger.is_spent(&untouched));
    }

    assert_eq!(essence.outputs.len(), 2);
    assert_eq!(essence.outputs[0].amount, 218_500);
    assert_eq!(essence.outputs[0].metadata(), Some(&b"abcd1234"[..]));
    assert_eq!(essence.outputs[0].sole_address(), Some(&owner));
    assert_eq!(essence.outputs[1].amount, 781_500);
    assert_eq!(essence.outputs[1].metadata(), None);
    assert_eq!(ledger.balance(&owner), 2_500_000);
}

#[tokio::test]
async fn test_notarize_exact_funds_has_no_remainder() {
    let ledger = TestLedger::new();
    ledger.fund(wallet_address(), 218_500);

    let notarizer = notarizer(&ledger, "HASH_NOTARIZER_E2E_SEED_EXACT");
    notarizer.notarize("abcd1234").await.expect("notarizes");

    let blocks = ledger.blocks();
    assert_eq!(blocks[0].payload.essence.outputs.len(), 1);
}

#[tokio::test]
async fn test_notarize_across_indexer_pages() {
    let ledger = TestLedger::new().with_page_size(2);
    let owner = wallet_address();
    let funded: Vec<_> = (0..5).map(|_| ledger.fund(owner, 100_000)).collect();

    let notarizer = notarizer(&ledger, "HASH_NOTARIZER_E2E_SEED_PAGES");
    notarizer.notarize("abcd1234").await.expect("notarizes");

    assert!(funded.iter().all(|id| ledger.is_spent(id)));
    let essence = &ledger.blocks()[0].payload.essence;
    assert_eq!(essence.inputs.len(), 5);
    assert_eq!(essence.outputs[1].amount, 500_000 - 218_500);
}

#[tokio::test]
async fn test_successive_notarizations_chain() {
    let ledger = TestLedger::new();
    let owner = wallet_address();
    ledger.fund(owner, 1_000_000);

    let notarizer = notarizer(&ledger, "HASH_NOTARIZER_E2E_SEED_CHAIN");
    let first = notarizer.notarize("first-hash").await.expect("first");
    let second = notarizer.notarize("second-hash").await.expect("second");

    assert_ne!(first, second);
    let blocks = ledger.blocks();
    assert_eq!(blocks.len(), 2);
    assert_eq!(blocks[1].parents, vec![first]);
    // Notarization outputs carry metadata and are never spent again.
    let unspent = ledger.unspent_of(&owner);
    assert_eq!(unspent.len(), 3);
    assert_eq!(blocks[1].payload.essence.inputs.len(), 1);
    assert_eq!(ledger.balance(&owner), 1_000_000);
}

#[tokio::test]
async fn test_insufficient_funds_submits_nothing() {
    let ledger = TestLedger::new();
    ledger.fund(wallet_address(), 100_000);

    let notarizer = notarizer(&ledger, "HASH_NOTARIZER_E2E_SEED_POOR");
    let err = notarizer.notarize("abcd1234").await.unwrap_err();

    assert_eq!(err.stage, Stage::PrepareTransaction);
    assert!(matches!(
        err.source,
        Error::InsufficientFunds {
            available: 100_000,
            required: 218_500
        }
    ));
    assert!(ledger.blocks().is_empty());
}

#[tokio::test]
async fn test_empty_wallet_is_insufficient() {
    let ledger = TestLedger::new();
    ledger.fund(Address::Ed25519([9; 32]), 5_000_000);

    let notarizer = notarizer(&ledger, "HASH_NOTARIZER_E2E_SEED_EMPTY_WALLET");
    let err = notarizer.notarize("abcd1234").await.unwrap_err();
    assert!(matches!(
        err.source,
        Error::InsufficientFunds { available: 0, .. }
    ));
}

#[tokio::test]
async fn test_missing_seed_phrase() {
    let ledger = TestLedger::new();
    ledger.fund(wallet_address(), 1_000_000);
    std::env::remove_var("HASH_NOTARIZER_E2E_SEED_UNSET");

    let notarizer = notarizer_without_seed(&ledger, "HASH_NOTARIZER_E2E_SEED_UNSET");
    let err = notarizer.notarize("abcd1234").await.unwrap_err();

    assert_eq!(err.stage, Stage::LoadSeedPhrase);
    assert_eq!(err.stage.message(), "Error loading mnemonic");
    assert!(ledger.blocks().is_empty());
}

#[tokio::test]
async fn test_malformed_seed_phrase() {
    let ledger = TestLedger::new();
    std::env::set_var("HASH_NOTARIZER_E2E_SEED_BAD", "definitely not a seed phrase");

    let notarizer = notarizer_without_seed(&ledger, "HASH_NOTARIZER_E2E_SEED_BAD");
    let err = notarizer.notarize("abcd1234").await.unwrap_err();
    assert_eq!(err.stage, Stage::PrepareWallet);
}
