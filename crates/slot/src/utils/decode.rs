use std::fmt;

use alloy::primitives::{Address, B256, U256};
use serde::{ser::SerializeMap, Serialize, Serializer};

use crate::{
    error::Error,
    utils::{derive::to_uint, layout::PackedLayout},
};

/// A typed projection of a raw storage word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedValue {
    /// The low 20 bytes of the word.
    Address(Address),
    /// The whole word as a big-endian integer.
    UnsignedInt(U256),
    /// One integer per packed field, in declaration order.
    PackedFields(Vec<U256>),
}

impl fmt::Display for DecodedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // `Address` displays with its EIP-55 checksum
            Self::Address(address) => write!(f, "{address}"),
            Self::UnsignedInt(value) => write!(f, "{value}"),
            Self::PackedFields(fields) => {
                let fields = fields.iter().map(U256::to_string).collect::<Vec<_>>();
                write!(f, "({})", fields.join(", "))
            }
        }
    }
}

impl Serialize for DecodedValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer, {
        let mut map = serializer.serialize_map(Some(2))?;
        match self {
            Self::Address(address) => {
                map.serialize_entry("type", "address")?;
                map.serialize_entry("value", &address.to_checksum(None))?;
            }
            Self::UnsignedInt(value) => {
                map.serialize_entry("type", "uint256")?;
                map.serialize_entry("value", &value.to_string())?;
            }
            Self::PackedFields(fields) => {
                map.serialize_entry("type", "packed")?;
                map.serialize_entry(
                    "value",
                    &fields.iter().map(U256::to_string).collect::<Vec<_>>(),
                )?;
            }
        }
        map.end()
    }
}

/// Serializes `address` in its EIP-55 checksummed form.
pub(crate) fn serialize_checksummed<S>(address: &Address, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer, {
    serializer.serialize_str(&address.to_checksum(None))
}

/// Serializes an optional address in its EIP-55 checksummed form, or `null`.
pub(crate) fn serialize_checksummed_opt<S>(
    address: &Option<Address>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer, {
    match address {
        Some(address) => serialize_checksummed(address, serializer),
        None => serializer.serialize_none(),
    }
}

/// Takes the low 20 bytes of `raw`. The high 12 bytes are padding for address-sized slots and
/// are discarded. Format the result with `{}` or [`Address::to_checksum`] for the EIP-55 form.
///
/// ```
/// use alloy::primitives::{address, b256};
/// use loupe_slot::decode_address;
///
/// let raw = b256!("000000000000000000000000a0b86991c6218b36c1d19d4a2e9eb0ce3606eb48");
/// let address = decode_address(raw);
/// assert_eq!(address, address!("A0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48"));
/// assert_eq!(address.to_string(), "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48");
/// ```
pub fn decode_address(raw: B256) -> Address {
    Address::from_slice(&raw[12..])
}

/// Reads `raw` as a big-endian 256-bit integer.
pub fn decode_uint(raw: B256) -> U256 {
    to_uint(raw)
}

/// Splits `raw` into fields of the given bit widths, the first field taken from the most
/// significant used bits. Bits above the sum of the widths are ignored.
pub fn decode_packed(raw: B256, field_widths: &[usize]) -> Result<Vec<U256>, Error> {
    Ok(PackedLayout::new(field_widths.to_vec())?.decode(raw))
}

/// Splits `raw` according to `layout`, honouring its field order.
pub fn decode_packed_with(raw: B256, layout: &PackedLayout) -> Vec<U256> {
    layout.decode(raw)
}
