//! Balanced, signed notarization transactions.

use super::deposit::{notarization_output, remainder_output};
use super::filter::EligibleOutput;
use crate::error::{Error, Result};
use crate::ledger::{ProtocolParameters, Transaction, TransactionBuilder, TxInput};
use crate::wallet::WalletIdentity;
use tracing::{debug, warn, Span};

/// Spends eligible outputs into a notarization output plus remainder.
pub struct TransactionAssembler {
    span: Span,
}

impl TransactionAssembler {
    /// Create an assembler logging under `span`.
    #[must_use]
    pub fn new(span: Span) -> Self {
        Self { span }
    }

    /// Build and sign the transaction anchoring `hash`.
    ///
    /// Every input is consumed. The notarization output comes first and
    /// holds exactly its minimum deposit; any surplus goes back to the
    /// wallet in a second output.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InsufficientFunds`] when the inputs cannot cover the
    /// notarization deposit, or leave a remainder too small to stand as an
    /// output of its own, and [`Error::TransactionBuild`] when the hash is
    /// empty, the input sum overflows or the builder rejects the result.
    pub fn assemble(
        &self,
        params: &ProtocolParameters,
        inputs: &[EligibleOutput],
        identity: &WalletIdentity,
        hash: &str,
    ) -> Result<Transaction> {
        let _guard = self.span.enter();

        if hash.is_empty() {
            return Err(Error::TransactionBuild("hash is empty".to_string()));
        }

        let available = inputs
            .iter()
            .try_fold(0u64, |sum, input| sum.checked_add(input.output.amount))
            .ok_or_else(|| Error::TransactionBuild("input deposit sum overflows u64".to_string()))?;

        let notarization =
            notarization_output(&params.rent_structure, identity.address, hash.as_bytes());
        let required = notarization.amount;
        if available < required {
            return Err(Error::InsufficientFunds {
                available,
                required,
            });
        }

        let network_id = params.network_id();
        debug!("Building transaction with network ID: {network_id}");

        let mut builder = inputs.iter().fold(TransactionBuilder::new(network_id), |b, input| {
            b.add_input(TxInput {
                unlock_target: identity.address,
                input_id: input.output_id,
                input: input.output.clone(),
            })
        });
        builder = builder.add_output(notarization);

        let remainder = available - required;
        if remainder > 0 {
            let output = remainder_output(identity.address, remainder);
            let floor = params.rent_structure.min_deposit(&output);
            if remainder < floor {
                warn!(remainder, floor, "Remainder is below its own minimum deposit");
                return Err(Error::InsufficientFunds {
                    available,
                    required: required.saturating_add(floor),
                });
            }
            builder = builder.add_output(output);
        }

        let transaction = builder.build(&identity.signer)?;
        debug!(
            inputs = inputs.len(),
            outputs = transaction.essence.outputs.len(),
            deposit = required,
            remainder,
            "Transaction assembled: {}",
            transaction.id()
        );
        Ok(transaction)
    }
}
