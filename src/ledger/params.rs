//! Protocol parameters and the storage deposit (rent) formula.

use super::{blake2b256, dto::string_u64, BasicOutput, OUTPUT_ID_LENGTH};
use serde::{Deserialize, Serialize};

/// Booking metadata the node stores next to every output: the including
/// block id plus confirming milestone index and timestamp.
const OUTPUT_METADATA_LENGTH: u64 = 32 + 4 + 4;

/// Byte-cost model deciding the minimum deposit of an output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RentStructure {
    /// Cost of one virtual byte in base tokens.
    pub v_byte_cost: u32,
    /// Weight of data bytes.
    pub v_byte_factor_data: u8,
    /// Weight of key bytes (indexed fields).
    pub v_byte_factor_key: u8,
}

impl RentStructure {
    /// Weighted size of `output` in virtual bytes.
    ///
    /// Every field of a basic output is weighted as data; the output id the
    /// ledger indexes it under counts as key.
    #[must_use]
    pub fn vbytes(&self, output: &BasicOutput) -> u64 {
        let key = u64::from(self.v_byte_factor_key);
        let data = u64::from(self.v_byte_factor_data);
        let packed = output.pack().len() as u64;
        key * OUTPUT_ID_LENGTH as u64 + data * (OUTPUT_METADATA_LENGTH + packed)
    }

    /// Minimum deposit `output` must hold to be valid on the ledger.
    ///
    /// The amount field has a fixed width, so the result does not depend on
    /// the amount currently set on `output`.
    #[must_use]
    pub fn min_deposit(&self, output: &BasicOutput) -> u64 {
        u64::from(self.v_byte_cost).saturating_mul(self.vbytes(output))
    }
}

/// Parameters of the active protocol, as reported by the node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtocolParameters {
    /// Protocol version blocks must carry.
    pub version: u8,
    /// Network name; the network id is derived from it.
    pub network_name: String,
    /// Human-readable bech32 prefix.
    pub bech32_hrp: String,
    /// Minimum proof-of-work score of a block.
    pub min_pow_score: u32,
    /// Tip age limit in milestones.
    pub below_max_depth: u8,
    /// Storage deposit model.
    pub rent_structure: RentStructure,
    /// Total base token supply.
    #[serde(with = "string_u64")]
    pub token_supply: u64,
}

impl ProtocolParameters {
    /// Network id committed to by transaction essences.
    #[must_use]
    pub fn network_id(&self) -> u64 {
        let hash = blake2b256(self.network_name.as_bytes());
        let mut first = [0u8; 8];
        first.copy_from_slice(&hash[..8]);
        u64::from_le_bytes(first)
    }
}
