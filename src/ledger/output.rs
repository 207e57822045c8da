//! Output kinds, unlock conditions and features.

use super::{Address, Packer};

/// Upper bound of a metadata feature payload in bytes.
pub const MAX_METADATA_LENGTH: usize = 8192;

/// Upper bound of a tag feature payload in bytes.
pub const MAX_TAG_LENGTH: usize = 64;

const BASIC_OUTPUT_TYPE: u8 = 3;

/// A native token balance held by an output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeToken {
    /// Foundry-derived token id.
    pub id: [u8; 38],
    /// Amount as a little-endian 256-bit integer.
    pub amount: [u8; 32],
}

/// Conditions that must hold to unlock an output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnlockCondition {
    /// Owner address.
    Address(Address),
    /// Amount that must be returned to `return_address` when spent.
    StorageDepositReturn {
        /// Recipient of the returned deposit.
        return_address: Address,
        /// Deposit to return.
        amount: u64,
    },
    /// Output cannot be spent before this time.
    Timelock {
        /// Unix timestamp in seconds.
        unix_time: u32,
    },
    /// Ownership falls back to `return_address` after this time.
    Expiration {
        /// Fallback owner.
        return_address: Address,
        /// Unix timestamp in seconds.
        unix_time: u32,
    },
    /// Alias state controller.
    StateControllerAddress(Address),
    /// Alias governor.
    GovernorAddress(Address),
    /// Controlling alias of a foundry.
    ImmutableAliasAddress(Address),
}

impl UnlockCondition {
    fn pack(&self, p: &mut Packer) {
        match self {
            Self::Address(a) => {
                p.u8(0);
                a.pack(p);
            }
            Self::StorageDepositReturn {
                return_address,
                amount,
            } => {
                p.u8(1);
                return_address.pack(p);
                p.u64(*amount);
            }
            Self::Timelock { unix_time } => {
                p.u8(2).u32(*unix_time);
            }
            Self::Expiration {
                return_address,
                unix_time,
            } => {
                p.u8(3);
                return_address.pack(p);
                p.u32(*unix_time);
            }
            Self::StateControllerAddress(a) => {
                p.u8(4);
                a.pack(p);
            }
            Self::GovernorAddress(a) => {
                p.u8(5);
                a.pack(p);
            }
            Self::ImmutableAliasAddress(a) => {
                p.u8(6);
                a.pack(p);
            }
        }
    }
}

/// Optional output attachments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Feature {
    /// Verified sender of the output.
    Sender(Address),
    /// Verified issuer of an NFT or alias.
    Issuer(Address),
    /// Arbitrary opaque bytes.
    Metadata(Vec<u8>),
    /// Indexation tag.
    Tag(Vec<u8>),
}

impl Feature {
    /// The metadata bytes, if this is a metadata feature.
    #[must_use]
    pub fn as_metadata(&self) -> Option<&[u8]> {
        match self {
            Self::Metadata(data) => Some(data.as_slice()),
            _ => None,
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn pack(&self, p: &mut Packer) {
        match self {
            Self::Sender(a) => {
                p.u8(0);
                a.pack(p);
            }
            Self::Issuer(a) => {
                p.u8(1);
                a.pack(p);
            }
            // Lengths are bounded by MAX_METADATA_LENGTH / MAX_TAG_LENGTH.
            Self::Metadata(data) => {
                p.u8(2).u16(data.len() as u16).bytes(data);
            }
            Self::Tag(tag) => {
                p.u8(3).u8(tag.len() as u8).bytes(tag);
            }
        }
    }
}

/// The simplest output: an amount, unlock conditions and optional features.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BasicOutput {
    /// Base token deposit.
    pub amount: u64,
    /// Native token balances.
    pub native_tokens: Vec<NativeToken>,
    /// Unlock conditions.
    pub unlock_conditions: Vec<UnlockCondition>,
    /// Features.
    pub features: Vec<Feature>,
}

impl BasicOutput {
    /// A basic output owned by `address` with no features.
    #[must_use]
    pub fn with_address(amount: u64, address: Address) -> Self {
        Self {
            amount,
            native_tokens: Vec::new(),
            unlock_conditions: vec![UnlockCondition::Address(address)],
            features: Vec::new(),
        }
    }

    /// Attach a feature.
    #[must_use]
    pub fn with_feature(mut self, feature: Feature) -> Self {
        self.features.push(feature);
        self
    }

    /// The first metadata feature payload, if any.
    #[must_use]
    pub fn metadata(&self) -> Option<&[u8]> {
        self.features.iter().find_map(Feature::as_metadata)
    }

    /// The owner address when the only unlock condition is an address.
    #[must_use]
    pub fn sole_address(&self) -> Option<&Address> {
        match self.unlock_conditions.as_slice() {
            [UnlockCondition::Address(a)] => Some(a),
            _ => None,
        }
    }

    /// Canonical binary form.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn pack(&self) -> Vec<u8> {
        let mut p = Packer::new();
        p.u8(BASIC_OUTPUT_TYPE).u64(self.amount);
        // Counts are bounded by protocol limits well below 256.
        p.u8(self.native_tokens.len() as u8);
        for token in &self.native_tokens {
            p.bytes(&token.id).bytes(&token.amount);
        }
        p.u8(self.unlock_conditions.len() as u8);
        for condition in &self.unlock_conditions {
            condition.pack(&mut p);
        }
        p.u8(self.features.len() as u8);
        for feature in &self.features {
            feature.pack(&mut p);
        }
        p.finish()
    }
}

/// An alias output: a chain-constrained account with state and governance.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AliasOutput {
    /// Base token deposit.
    pub amount: u64,
    /// Native token balances.
    pub native_tokens: Vec<NativeToken>,
    /// Alias identifier.
    pub alias_id: [u8; 32],
    /// State transition counter.
    pub state_index: u32,
    /// State metadata.
    pub state_metadata: Vec<u8>,
    /// Number of foundries created by this alias.
    pub foundry_counter: u32,
    /// Unlock conditions.
    pub unlock_conditions: Vec<UnlockCondition>,
    /// Features.
    pub features: Vec<Feature>,
    /// Immutable features.
    pub immutable_features: Vec<Feature>,
}

/// A foundry output controlling the supply of a native token.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FoundryOutput {
    /// Base token deposit.
    pub amount: u64,
    /// Native token balances.
    pub native_tokens: Vec<NativeToken>,
    /// Serial number within the controlling alias.
    pub serial_number: u32,
    /// Unlock conditions.
    pub unlock_conditions: Vec<UnlockCondition>,
    /// Features.
    pub features: Vec<Feature>,
    /// Immutable features.
    pub immutable_features: Vec<Feature>,
}

/// A non-fungible token output.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NftOutput {
    /// Base token deposit.
    pub amount: u64,
    /// Native token balances.
    pub native_tokens: Vec<NativeToken>,
    /// NFT identifier.
    pub nft_id: [u8; 32],
    /// Unlock conditions.
    pub unlock_conditions: Vec<UnlockCondition>,
    /// Features.
    pub features: Vec<Feature>,
    /// Immutable features.
    pub immutable_features: Vec<Feature>,
}

/// A typed ledger output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    /// See [`BasicOutput`].
    Basic(BasicOutput),
    /// See [`AliasOutput`].
    Alias(AliasOutput),
    /// See [`FoundryOutput`].
    Foundry(FoundryOutput),
    /// See [`NftOutput`].
    Nft(NftOutput),
}

impl Output {
    /// Base token deposit held by the output.
    #[must_use]
    pub fn amount(&self) -> u64 {
        match self {
            Self::Basic(o) => o.amount,
            Self::Alias(o) => o.amount,
            Self::Foundry(o) => o.amount,
            Self::Nft(o) => o.amount,
        }
    }

    /// Human-readable kind name, used in logs and errors.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Basic(_) => "basic",
            Self::Alias(_) => "alias",
            Self::Foundry(_) => "foundry",
            Self::Nft(_) => "nft",
        }
    }

    /// The basic output, if this is one.
    #[must_use]
    pub fn as_basic(&self) -> Option<&BasicOutput> {
        match self {
            Self::Basic(o) => Some(o),
            _ => None,
        }
    }
}
