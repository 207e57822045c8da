//! Transactions, unlocks and the signing transaction builder.

use super::{blake2b256, Address, BasicOutput, OutputId, Packer, TransactionId, MAX_METADATA_LENGTH};
use crate::error::{Error, Result};
use ed25519_dalek::{Signature as DalekSignature, Verifier, VerifyingKey};
use std::collections::{HashMap, HashSet};

/// Maximum number of inputs in one transaction.
pub const MAX_INPUTS: usize = 128;

/// Maximum number of outputs in one transaction.
pub const MAX_OUTPUTS: usize = 128;

const TRANSACTION_PAYLOAD_TYPE: u32 = 6;
const TRANSACTION_ESSENCE_TYPE: u8 = 1;
const UTXO_INPUT_TYPE: u8 = 0;
const ED25519_SIGNATURE_TYPE: u8 = 0;
const SIGNATURE_UNLOCK_TYPE: u8 = 0;
const REFERENCE_UNLOCK_TYPE: u8 = 1;

/// Reference to the output a transaction consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UtxoInput(pub OutputId);

impl UtxoInput {
    fn pack(&self, p: &mut Packer) {
        p.u8(UTXO_INPUT_TYPE)
            .bytes(&self.0.transaction_id().0)
            .u16(self.0.index());
    }
}

/// Ed25519 signature together with the public key it verifies against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    /// Signer public key.
    pub public_key: [u8; 32],
    /// Signature bytes.
    pub signature: [u8; 64],
}

impl Signature {
    /// Address of the signing key.
    #[must_use]
    pub fn address(&self) -> Address {
        Address::from_ed25519_public_key(&self.public_key)
    }

    /// Check the signature over `message`.
    #[must_use]
    pub fn verify(&self, message: &[u8]) -> bool {
        let Ok(key) = VerifyingKey::from_bytes(&self.public_key) else {
            return false;
        };
        key.verify(message, &DalekSignature::from_bytes(&self.signature))
            .is_ok()
    }

    fn pack(&self, p: &mut Packer) {
        p.u8(ED25519_SIGNATURE_TYPE)
            .bytes(&self.public_key)
            .bytes(&self.signature);
    }
}

/// Proof that an input may be consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unlock {
    /// Signature of the input's owner.
    Signature(Signature),
    /// Reuse of the signature unlock at the given index.
    Reference(u16),
}

impl Unlock {
    fn pack(&self, p: &mut Packer) {
        match self {
            Self::Signature(sig) => {
                p.u8(SIGNATURE_UNLOCK_TYPE);
                sig.pack(p);
            }
            Self::Reference(index) => {
                p.u8(REFERENCE_UNLOCK_TYPE).u16(*index);
            }
        }
    }
}

/// Produces unlock signatures for the addresses it controls.
pub trait AddressSigner: Send + Sync {
    /// Sign `message` with the key behind `address`.
    ///
    /// # Errors
    ///
    /// Returns an error if the signer holds no key for `address`.
    fn sign(&self, address: &Address, message: &[u8]) -> Result<Signature>;
}

/// The signed part of a transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionEssence {
    /// Network the transaction is valid on.
    pub network_id: u64,
    /// Consumed outputs.
    pub inputs: Vec<UtxoInput>,
    /// BLAKE2b-256 over the hashes of the consumed outputs.
    pub inputs_commitment: [u8; 32],
    /// Created outputs.
    pub outputs: Vec<BasicOutput>,
}

impl TransactionEssence {
    /// Canonical binary form.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn pack(&self) -> Vec<u8> {
        let mut p = Packer::new();
        p.u8(TRANSACTION_ESSENCE_TYPE).u64(self.network_id);
        // Counts are capped at MAX_INPUTS / MAX_OUTPUTS by the builder.
        p.u16(self.inputs.len() as u16);
        for input in &self.inputs {
            input.pack(&mut p);
        }
        p.bytes(&self.inputs_commitment);
        p.u16(self.outputs.len() as u16);
        for output in &self.outputs {
            p.bytes(&output.pack());
        }
        // No tagged-data payload.
        p.u32(0);
        p.finish()
    }

    /// Message every unlock signature commits to.
    #[must_use]
    pub fn signing_message(&self) -> [u8; 32] {
        blake2b256(&self.pack())
    }
}

/// A signed transaction payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    /// Signed contents.
    pub essence: TransactionEssence,
    /// One unlock per input, in input order.
    pub unlocks: Vec<Unlock>,
}

impl Transaction {
    /// Canonical binary form, including the payload type prefix.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn pack(&self) -> Vec<u8> {
        let mut p = Packer::new();
        p.u32(TRANSACTION_PAYLOAD_TYPE);
        p.bytes(&self.essence.pack());
        p.u16(self.unlocks.len() as u16);
        for unlock in &self.unlocks {
            unlock.pack(&mut p);
        }
        p.finish()
    }

    /// Deterministic id derived from the signed contents.
    #[must_use]
    pub fn id(&self) -> TransactionId {
        TransactionId(blake2b256(&self.pack()))
    }

    /// Id of the output created at `index`.
    #[must_use]
    pub fn output_id(&self, index: u16) -> OutputId {
        OutputId::new(self.id(), index)
    }

    /// Total deposit of the created outputs.
    #[must_use]
    pub fn output_deposit(&self) -> u64 {
        self.essence.outputs.iter().map(|o| o.amount).sum()
    }
}

/// An output to consume together with the address that must unlock it.
#[derive(Debug, Clone)]
pub struct TxInput {
    /// Address whose signature unlocks the input.
    pub unlock_target: Address,
    /// Id of the consumed output.
    pub input_id: OutputId,
    /// The consumed output.
    pub input: BasicOutput,
}

/// Assembles and signs a [`Transaction`].
#[derive(Debug, Clone)]
pub struct TransactionBuilder {
    network_id: u64,
    inputs: Vec<TxInput>,
    outputs: Vec<BasicOutput>,
}

impl TransactionBuilder {
    /// Start a transaction for the given network.
    #[must_use]
    pub fn new(network_id: u64) -> Self {
        Self {
            network_id,
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }

    /// Consume an output.
    #[must_use]
    pub fn add_input(mut self, input: TxInput) -> Self {
        self.inputs.push(input);
        self
    }

    /// Create an output.
    #[must_use]
    pub fn add_output(mut self, output: BasicOutput) -> Self {
        self.outputs.push(output);
        self
    }

    /// Validate, sign and return the transaction.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TransactionBuild`] if the input or output count is out
    /// of range, an input repeats, deposits do not balance exactly, a metadata
    /// payload is oversized, or the signer fails.
    pub fn build(self, signer: &dyn AddressSigner) -> Result<Transaction> {
        self.validate()?;

        let mut commitment_preimage = Vec::with_capacity(self.inputs.len() * 32);
        for input in &self.inputs {
            commitment_preimage.extend_from_slice(&blake2b256(&input.input.pack()));
        }

        let essence = TransactionEssence {
            network_id: self.network_id,
            inputs: self.inputs.iter().map(|i| UtxoInput(i.input_id)).collect(),
            inputs_commitment: blake2b256(&commitment_preimage),
            outputs: self.outputs,
        };
        let message = essence.signing_message();

        let mut signed_at: HashMap<Address, u16> = HashMap::new();
        let mut unlocks = Vec::with_capacity(self.inputs.len());
        for (index, input) in self.inputs.iter().enumerate() {
            if let Some(&first) = signed_at.get(&input.unlock_target) {
                unlocks.push(Unlock::Reference(first));
                continue;
            }
            let signature = signer
                .sign(&input.unlock_target, &message)
                .map_err(|e| Error::TransactionBuild(format!("signing failed: {e}")))?;
            let position = u16::try_from(index)
                .map_err(|_| Error::TransactionBuild(format!("input index {index} out of range")))?;
            signed_at.insert(input.unlock_target, position);
            unlocks.push(Unlock::Signature(signature));
        }

        Ok(Transaction { essence, unlocks })
    }

    fn validate(&self) -> Result<()> {
        if self.inputs.is_empty() || self.inputs.len() > MAX_INPUTS {
            return Err(Error::TransactionBuild(format!(
                "input count {} outside 1..={MAX_INPUTS}",
                self.inputs.len()
            )));
        }
        if self.outputs.is_empty() || self.outputs.len() > MAX_OUTPUTS {
            return Err(Error::TransactionBuild(format!(
                "output count {} outside 1..={MAX_OUTPUTS}",
                self.outputs.len()
            )));
        }

        let mut seen = HashSet::new();
        for input in &self.inputs {
            if !seen.insert(input.input_id) {
                return Err(Error::TransactionBuild(format!(
                    "input {} consumed twice",
                    input.input_id
                )));
            }
        }

        if let Some(oversized) = self
            .outputs
            .iter()
            .filter_map(BasicOutput::metadata)
            .find(|m| m.len() > MAX_METADATA_LENGTH)
        {
            return Err(Error::TransactionBuild(format!(
                "metadata of {} bytes exceeds {MAX_METADATA_LENGTH}",
                oversized.len()
            )));
        }

        let input_sum = checked_sum(self.inputs.iter().map(|i| i.input.amount))?;
        let output_sum = checked_sum(self.outputs.iter().map(|o| o.amount))?;
        if input_sum != output_sum {
            return Err(Error::TransactionBuild(format!(
                "unbalanced deposits: inputs {input_sum}, outputs {output_sum}"
            )));
        }
        Ok(())
    }
}

fn checked_sum(mut amounts: impl Iterator<Item = u64>) -> Result<u64> {
    amounts
        .try_fold(0u64, u64::checked_add)
        .ok_or_else(|| Error::TransactionBuild("deposit sum overflows u64".to_string()))
}
