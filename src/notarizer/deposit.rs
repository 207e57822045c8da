//! Output shapes the service creates and their minimum deposits.

use crate::ledger::{Address, BasicOutput, Feature, RentStructure};

/// Minimum deposit `output` must hold under `rent`.
///
/// Depends only on the output's shape, never on its current amount.
#[must_use]
pub fn min_deposit(rent: &RentStructure, output: &BasicOutput) -> u64 {
    rent.min_deposit(output)
}

/// The output anchoring `hash`: owned by `owner`, carrying the hash bytes as
/// metadata and exactly the minimum deposit.
#[must_use]
pub fn notarization_output(rent: &RentStructure, owner: Address, hash: &[u8]) -> BasicOutput {
    let mut output =
        BasicOutput::with_address(0, owner).with_feature(Feature::Metadata(hash.to_vec()));
    output.amount = min_deposit(rent, &output);
    output
}

/// The output returning `amount` to `owner`.
#[must_use]
pub fn remainder_output(owner: Address, amount: u64) -> BasicOutput {
    BasicOutput::with_address(amount, owner)
}
