//! End-to-end tests for hash-notarizer.
//!
//! Every test runs the real engines and HTTP routes against
//! [`harness::TestLedger`], an in-memory ledger that validates and applies
//! submitted blocks. No node is required.
//!
//! ```bash
//! cargo test --test e2e
//! ```

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod api;
mod harness;
mod notarize;
mod verify;
