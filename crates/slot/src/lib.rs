//! The Slot module reads raw contract storage and decodes it.
//!
//! It derives storage keys for the standard Solidity layouts (plain slots, namespaced
//! unstructured-storage slots, mapping entries, dynamic array elements and struct field
//! offsets), fetches the 32-byte word behind a key through `eth_getStorageAt`, and projects
//! that word into an address, an integer, or a set of packed fields.
//!
//! Key derivation and decoding are pure; only [`read_slot`] and the commands built on it
//! touch the network, and they do so through the [`StorageSource`] trait.

/// Error types for the slot module
pub mod error;

mod core;
mod interfaces;
mod utils;

// re-export the public interface
pub use crate::core::{
    diff::{diff, diff_slots, SlotDiff, StorageDiff},
    inspect_slot,
    proxy::{inspect_proxy, proxy, ProxyReport},
    read_slot, slot, SlotResult, StorageSlot,
};
pub use error::Error;
pub use interfaces::{
    DecodeAs, DiffArgs, DiffArgsBuilder, ProxyArgs, ProxyArgsBuilder, SlotArgs, SlotArgsBuilder,
};
pub use utils::{
    decode::{decode_address, decode_packed, decode_packed_with, decode_uint, DecodedValue},
    derive::{
        array_element_slot, compute_derived_slot, erc7201_slot, namespaced_slot, offset_slot,
        parse_word, SlotDerivation, EIP1967_ADMIN_ID, EIP1967_BEACON_ID,
        EIP1967_IMPLEMENTATION_ID, ZEPPELINOS_ADMIN_ID, ZEPPELINOS_IMPLEMENTATION_ID,
    },
    layout::{FieldOrder, PackedLayout},
    source::{RpcStorage, StorageSource},
};
