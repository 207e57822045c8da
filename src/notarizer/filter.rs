//! Selection of outputs that may fund a notarization.

use crate::client::UnspentOutput;
use crate::ledger::{BasicOutput, Output, OutputId};
use tracing::{debug, Span};

/// A basic output the wallet can spend with a plain signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EligibleOutput {
    /// Where the output lives.
    pub output_id: OutputId,
    /// The output; never carries a metadata feature.
    pub output: BasicOutput,
}

/// Whether `output` can be consumed as a notarization input.
///
/// Outputs carrying metadata are earlier notarizations and stay untouched.
/// Outputs with anything beyond a single address unlock condition, or with
/// native tokens, cannot be spent into the fixed output shape.
#[must_use]
pub fn is_eligible(output: &BasicOutput) -> bool {
    output.metadata().is_none() && output.sole_address().is_some() && output.native_tokens.is_empty()
}

/// Narrows fetched outputs to [`EligibleOutput`]s.
pub struct OutputFilter {
    span: Span,
}

impl OutputFilter {
    /// Create a filter logging under `span`.
    #[must_use]
    pub fn new(span: Span) -> Self {
        Self { span }
    }

    /// Keep eligible basic outputs in their original order. Everything
    /// else is dropped without error.
    #[must_use]
    pub fn filter(&self, outputs: Vec<UnspentOutput>) -> Vec<EligibleOutput> {
        let _guard = self.span.enter();
        let fetched = outputs.len();

        let eligible: Vec<EligibleOutput> = outputs
            .into_iter()
            .filter_map(|unspent| match unspent.output {
                Output::Basic(output) if is_eligible(&output) => Some(EligibleOutput {
                    output_id: unspent.output_id,
                    output,
                }),
                _ => None,
            })
            .collect();

        debug!(fetched, eligible = eligible.len(), "Filtered outputs");
        eligible
    }
}
