//! JSON wire form of outputs, as served by the node REST API.
//!
//! Kinds are tagged by a numeric `type` field, which serde cannot dispatch
//! on directly, so every DTO is a flat struct with optional fields that is
//! converted into the typed model with `TryFrom`.

use super::{
    from_prefix_hex, from_prefix_hex_array, Address, AliasOutput, BasicOutput, Feature,
    FoundryOutput, NativeToken, NftOutput, Output, UnlockCondition,
};
use crate::error::{Error, Result};
use serde::Deserialize;

/// Serde adapter for `u64` values the API encodes as decimal strings.
pub mod string_u64 {
    use serde::{de, Deserialize, Deserializer, Serializer};

    /// Serialize as a decimal string.
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    #[allow(clippy::trivially_copy_pass_by_ref)]
    pub fn serialize<S: Serializer>(value: &u64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    /// Deserialize from a decimal string or a plain number.
    ///
    /// # Errors
    ///
    /// Fails on anything that is not a non-negative 64-bit integer.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Str(String),
            Num(u64),
        }
        match Repr::deserialize(deserializer)? {
            Repr::Str(s) => s.parse().map_err(de::Error::custom),
            Repr::Num(n) => Ok(n),
        }
    }
}

/// Address JSON.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressDto {
    /// Address type byte.
    #[serde(rename = "type")]
    pub kind: u8,
    /// Ed25519 public key hash.
    pub pub_key_hash: Option<String>,
    /// Alias id.
    pub alias_id: Option<String>,
    /// NFT id.
    pub nft_id: Option<String>,
}

impl TryFrom<AddressDto> for Address {
    type Error = Error;

    fn try_from(dto: AddressDto) -> Result<Self> {
        let body = dto
            .pub_key_hash
            .or(dto.alias_id)
            .or(dto.nft_id)
            .ok_or_else(|| Error::Codec(format!("address of type {} has no body", dto.kind)))?;
        Self::from_parts(dto.kind, from_prefix_hex_array(&body)?)
    }
}

/// Native token JSON.
#[derive(Debug, Clone, Deserialize)]
pub struct NativeTokenDto {
    /// Token id.
    pub id: String,
    /// Amount as big-endian hex.
    pub amount: String,
}

impl TryFrom<NativeTokenDto> for NativeToken {
    type Error = Error;

    fn try_from(dto: NativeTokenDto) -> Result<Self> {
        Ok(Self {
            id: from_prefix_hex_array(&dto.id)?,
            amount: u256_from_hex(&dto.amount)?,
        })
    }
}

/// Parse big-endian `0x` hex without leading zeros into little-endian bytes.
fn u256_from_hex(s: &str) -> Result<[u8; 32]> {
    let digits = s
        .strip_prefix("0x")
        .ok_or_else(|| Error::Codec(format!("u256 '{s}' lacks 0x prefix")))?;
    if digits.len() > 64 {
        return Err(Error::Codec(format!("u256 '{s}' is too long")));
    }
    let padded = format!("{digits:0>64}");
    let mut bytes: [u8; 32] = hex::decode(padded)
        .map_err(|e| Error::Codec(format!("invalid u256 '{s}': {e}")))?
        .try_into()
        .map_err(|_| Error::Codec(format!("invalid u256 '{s}'")))?;
    bytes.reverse();
    Ok(bytes)
}

/// Unlock condition JSON.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnlockConditionDto {
    /// Condition type byte.
    #[serde(rename = "type")]
    pub kind: u8,
    /// Address of address-like conditions.
    pub address: Option<AddressDto>,
    /// Return address of return and expiration conditions.
    pub return_address: Option<AddressDto>,
    /// Returned amount.
    #[serde(default, with = "opt_string_u64")]
    pub amount: Option<u64>,
    /// Unix time of time-based conditions.
    pub unix_time: Option<u32>,
}

mod opt_string_u64 {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
        #[derive(Deserialize)]
        struct Wrap(#[serde(with = "super::string_u64")] u64);
        Ok(Option::<Wrap>::deserialize(deserializer)?.map(|Wrap(v)| v))
    }
}

fn required<T>(value: Option<T>, what: &str, kind: u8) -> Result<T> {
    value.ok_or_else(|| Error::Codec(format!("{what} missing in item of type {kind}")))
}

impl TryFrom<UnlockConditionDto> for UnlockCondition {
    type Error = Error;

    fn try_from(dto: UnlockConditionDto) -> Result<Self> {
        let kind = dto.kind;
        let address = |a: Option<AddressDto>| -> Result<Address> {
            required(a, "address", kind)?.try_into()
        };
        Ok(match kind {
            0 => Self::Address(address(dto.address)?),
            1 => Self::StorageDepositReturn {
                return_address: address(dto.return_address)?,
                amount: required(dto.amount, "amount", kind)?,
            },
            2 => Self::Timelock {
                unix_time: required(dto.unix_time, "unixTime", kind)?,
            },
            3 => Self::Expiration {
                return_address: address(dto.return_address)?,
                unix_time: required(dto.unix_time, "unixTime", kind)?,
            },
            4 => Self::StateControllerAddress(address(dto.address)?),
            5 => Self::GovernorAddress(address(dto.address)?),
            6 => Self::ImmutableAliasAddress(address(dto.address)?),
            other => return Err(Error::Codec(format!("unknown unlock condition {other}"))),
        })
    }
}

/// Feature JSON.
#[derive(Debug, Clone, Deserialize)]
pub struct FeatureDto {
    /// Feature type byte.
    #[serde(rename = "type")]
    pub kind: u8,
    /// Sender or issuer address.
    pub address: Option<AddressDto>,
    /// Metadata bytes as hex.
    pub data: Option<String>,
    /// Tag bytes as hex.
    pub tag: Option<String>,
}

impl TryFrom<FeatureDto> for Feature {
    type Error = Error;

    fn try_from(dto: FeatureDto) -> Result<Self> {
        let kind = dto.kind;
        Ok(match kind {
            0 => Self::Sender(required(dto.address, "address", kind)?.try_into()?),
            1 => Self::Issuer(required(dto.address, "address", kind)?.try_into()?),
            2 => Self::Metadata(from_prefix_hex(&required(dto.data, "data", kind)?)?),
            3 => Self::Tag(from_prefix_hex(&required(dto.tag, "tag", kind)?)?),
            other => return Err(Error::Codec(format!("unknown feature {other}"))),
        })
    }
}

/// Output JSON; fields not used by a kind are absent.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputDto {
    /// Output type byte.
    #[serde(rename = "type")]
    pub kind: u8,
    /// Base token deposit.
    #[serde(with = "string_u64")]
    pub amount: u64,
    /// Native tokens.
    #[serde(default)]
    pub native_tokens: Vec<NativeTokenDto>,
    /// Alias id (alias outputs).
    pub alias_id: Option<String>,
    /// State index (alias outputs).
    pub state_index: Option<u32>,
    /// State metadata (alias outputs).
    pub state_metadata: Option<String>,
    /// Foundry counter (alias outputs).
    pub foundry_counter: Option<u32>,
    /// Serial number (foundry outputs).
    pub serial_number: Option<u32>,
    /// NFT id (NFT outputs).
    pub nft_id: Option<String>,
    /// Unlock conditions.
    #[serde(default)]
    pub unlock_conditions: Vec<UnlockConditionDto>,
    /// Features.
    #[serde(default)]
    pub features: Vec<FeatureDto>,
    /// Immutable features.
    #[serde(default)]
    pub immutable_features: Vec<FeatureDto>,
}

fn convert_all<D, T>(items: Vec<D>) -> Result<Vec<T>>
where
    T: TryFrom<D, Error = Error>,
{
    items.into_iter().map(T::try_from).collect()
}

impl TryFrom<OutputDto> for Output {
    type Error = Error;

    fn try_from(dto: OutputDto) -> Result<Self> {
        let kind = dto.kind;
        let native_tokens = convert_all(dto.native_tokens)?;
        let unlock_conditions = convert_all(dto.unlock_conditions)?;
        let features = convert_all(dto.features)?;
        let immutable_features = convert_all(dto.immutable_features)?;

        Ok(match kind {
            3 => Self::Basic(BasicOutput {
                amount: dto.amount,
                native_tokens,
                unlock_conditions,
                features,
            }),
            4 => Self::Alias(AliasOutput {
                amount: dto.amount,
                native_tokens,
                alias_id: from_prefix_hex_array(&required(dto.alias_id, "aliasId", kind)?)?,
                state_index: dto.state_index.unwrap_or_default(),
                state_metadata: dto
                    .state_metadata
                    .as_deref()
                    .map(from_prefix_hex)
                    .transpose()?
                    .unwrap_or_default(),
                foundry_counter: dto.foundry_counter.unwrap_or_default(),
                unlock_conditions,
                features,
                immutable_features,
            }),
            5 => Self::Foundry(FoundryOutput {
                amount: dto.amount,
                native_tokens,
                serial_number: required(dto.serial_number, "serialNumber", kind)?,
                unlock_conditions,
                features,
                immutable_features,
            }),
            6 => Self::Nft(NftOutput {
                amount: dto.amount,
                native_tokens,
                nft_id: from_prefix_hex_array(&required(dto.nft_id, "nftId", kind)?)?,
                unlock_conditions,
                features,
                immutable_features,
            }),
            other => return Err(Error::Codec(format!("unknown output type {other}"))),
        })
    }
}

/// Response of the output-by-id endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputResponse {
    /// The output itself. Metadata is not needed and ignored.
    pub output: OutputDto,
}
