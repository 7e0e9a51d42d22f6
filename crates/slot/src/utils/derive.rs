//! Storage key derivation, following the Solidity storage layout rules.

use alloy::primitives::{keccak256, B256, U256};
use serde::Serialize;
use std::str::FromStr;

use crate::error::Error;

/// Identifier hashed into the EIP-1967 implementation slot.
pub const EIP1967_IMPLEMENTATION_ID: &str = "eip1967.proxy.implementation";
/// Identifier hashed into the EIP-1967 admin slot.
pub const EIP1967_ADMIN_ID: &str = "eip1967.proxy.admin";
/// Identifier hashed into the EIP-1967 beacon slot.
pub const EIP1967_BEACON_ID: &str = "eip1967.proxy.beacon";
/// Identifier of the pre-EIP-1967 ZeppelinOS implementation slot. Unlike EIP-1967 slots it
/// is the bare hash, without the `- 1`.
pub const ZEPPELINOS_IMPLEMENTATION_ID: &str = "org.zeppelinos.proxy.implementation";
/// Identifier of the pre-EIP-1967 ZeppelinOS admin slot, also a bare hash.
pub const ZEPPELINOS_ADMIN_ID: &str = "org.zeppelinos.proxy.admin";

/// One step of a storage key derivation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotDerivation {
    /// A slot given verbatim.
    Literal(B256),
    /// `keccak256(id) - 1`, the unstructured storage pattern used by EIP-1967.
    Namespaced(String),
    /// `keccak256(keccak256(id) - 1) & !0xff`, as defined by ERC-7201.
    Erc7201(String),
    /// The entry of a mapping (or any value keyed by a word) rooted at `base`.
    MappingEntry {
        /// The slot the mapping is declared at.
        base: B256,
        /// The mapping key, left padded to a word.
        key: B256,
    },
    /// An element of a dynamic array whose length lives at `base`.
    ArrayElement {
        /// The slot the array is declared at.
        base: B256,
        /// The element index.
        index: U256,
        /// How many words a single element occupies.
        element_words: U256,
    },
    /// A later field of a struct whose first field lives at `base`.
    FieldOffset {
        /// The slot of the struct's first field.
        base: B256,
        /// The number of words to skip.
        offset: u64,
    },
}

impl SlotDerivation {
    /// Computes the storage key this step describes.
    pub fn resolve(&self) -> B256 {
        match self {
            Self::Literal(slot) => *slot,
            Self::Namespaced(id) => namespaced_slot(id),
            Self::Erc7201(id) => erc7201_slot(id),
            Self::MappingEntry { base, key } => compute_derived_slot(*base, *key),
            Self::ArrayElement { base, index, element_words } => {
                array_element_slot(*base, *index, *element_words)
            }
            Self::FieldOffset { base, offset } => offset_slot(*base, *offset),
        }
    }
}

/// Returns `keccak256(pad32(index) ++ pad32(base_slot))`, the slot of a mapping entry.
/// Further fields of a struct stored at that entry follow at `+1`, `+2`, ... (see
/// [`offset_slot`]).
///
/// ```
/// use alloy::primitives::{b256, B256};
/// use loupe_slot::compute_derived_slot;
///
/// let base = B256::with_last_byte(3);
/// let key = b256!("000000000000000000000000d8dA6BF26964aF9D7eEd9e03E53415D37aA96045");
/// assert_eq!(
///     compute_derived_slot(base, key),
///     b256!("3a988d762a24303c37d08f1543db6143453b579691d5c20fed39629ff1334cca")
/// );
/// ```
pub fn compute_derived_slot(base_slot: B256, index: B256) -> B256 {
    let mut preimage = [0u8; 64];
    preimage[..32].copy_from_slice(index.as_slice());
    preimage[32..].copy_from_slice(base_slot.as_slice());
    keccak256(preimage)
}

/// Returns `keccak256(id) - 1`.
pub fn namespaced_slot(id: &str) -> B256 {
    to_word(to_uint(keccak256(id.as_bytes())).wrapping_sub(U256::from(1)))
}

/// Returns the ERC-7201 root slot of the namespace `id`.
pub fn erc7201_slot(id: &str) -> B256 {
    let root = to_uint(keccak256(namespaced_slot(id)));
    to_word(root & !U256::from(0xff))
}

/// Returns `keccak256(base_slot) + index * element_words`, wrapping like the EVM does.
pub fn array_element_slot(base_slot: B256, index: U256, element_words: U256) -> B256 {
    let start = to_uint(keccak256(base_slot));
    to_word(start.wrapping_add(index.wrapping_mul(element_words)))
}

/// Returns `slot + offset`, wrapping like the EVM does.
pub fn offset_slot(slot: B256, offset: u64) -> B256 {
    to_word(to_uint(slot).wrapping_add(U256::from(offset)))
}

/// Parses a decimal or `0x`-prefixed hex value into a left padded word. Addresses parse to
/// their padded form, which is how they are hashed as mapping keys.
pub fn parse_word(value: &str) -> Result<B256, Error> {
    let value = value.trim();
    if value.starts_with('-') {
        return Err(Error::InvalidLayoutError(format!("negative value '{value}' is not a slot")));
    }

    U256::from_str(value)
        .map(to_word)
        .map_err(|e| Error::InvalidLayoutError(format!("'{value}' is not a 256-bit value: {e}")))
}

pub(crate) fn to_uint(word: B256) -> U256 {
    U256::from_be_bytes(word.0)
}

pub(crate) fn to_word(value: U256) -> B256 {
    B256::from(value.to_be_bytes::<32>())
}
