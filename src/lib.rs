//! # hash-notarizer
//!
//! Anchors arbitrary hash values into a UTXO ledger and verifies them later.
//!
//! A notarization is a basic output whose metadata feature carries the hash
//! bytes. Creating one means selecting spendable outputs of the service
//! wallet, computing the storage deposit the new output must hold, building
//! and signing a balanced transaction, and attaching it to the ledger tips in
//! a new block. Verification resolves an output by its identifier and
//! compares its metadata with the claimed hash.
//!
//! ## Layout
//!
//! - [`ledger`]: outputs, transactions, blocks and their binary packing
//! - [`wallet`]: seed-phrase loading and HD derivation of address and signer
//! - [`client`]: node and indexer clients
//! - [`notarizer`]: the notarization and verification engines
//! - [`api`]: HTTP routes

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod ledger;
pub mod notarizer;
pub mod wallet;

pub use config::NotarizerConfig;
pub use error::{Error, Result, Stage, StageError};
pub use notarizer::{Notarizer, NotarizerBuilder};
