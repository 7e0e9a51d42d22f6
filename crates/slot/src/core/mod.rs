pub(crate) mod diff;
pub(crate) mod proxy;

use alloy::primitives::{Address, B256};
use serde::Serialize;
use std::time::Instant;
use tracing::{debug, info};

use crate::{
    error::Error,
    interfaces::{DecodeAs, SlotArgs},
    utils::{
        decode::{
            decode_address, decode_packed_with, decode_uint, serialize_checksummed, DecodedValue,
        },
        derive::SlotDerivation,
        source::{RpcStorage, StorageSource},
    },
};

/// A raw storage word, as read from a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StorageSlot {
    /// The contract queried.
    #[serde(serialize_with = "serialize_checksummed")]
    pub address: Address,
    /// The storage key read.
    pub slot_key: B256,
    /// The 32-byte big-endian word stored at `slot_key`.
    pub raw_value: B256,
    /// The block the word was read at, `None` meaning the node's latest block.
    pub block: Option<u64>,
}

/// The result of the `slot` command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotResult {
    /// How the storage key was derived, in application order.
    pub derivation: Vec<SlotDerivation>,
    /// The word that was read.
    pub slot: StorageSlot,
    /// The decoded word, when a decoding was requested.
    pub decoded: Option<DecodedValue>,
}

impl SlotResult {
    /// Logs the result in a human readable form.
    pub fn display(&self) {
        info!("address: {}", self.slot.address);
        info!("slot:    {}", self.slot.slot_key);
        info!("raw:     {}", self.slot.raw_value);
        if let Some(block) = self.slot.block {
            info!("block:   {}", block);
        }
        if let Some(decoded) = &self.decoded {
            info!("decoded: {}", decoded);
        }
    }
}

/// Reads the word at `slot_key` of `address`. Exactly one request is made and errors are
/// returned as they come; nothing is retried.
pub async fn read_slot<S>(
    source: &S,
    address: Address,
    slot_key: B256,
    at_block: Option<u64>,
) -> Result<StorageSlot, Error>
where
    S: StorageSource + ?Sized, {
    let raw_value = source.storage_at(address, slot_key, at_block).await?;
    debug!("read {} from slot {} of {}", raw_value, slot_key, address);

    Ok(StorageSlot { address, slot_key, raw_value, block: at_block })
}

/// Runs the `slot` command against an arbitrary [`StorageSource`].
///
/// All argument validation (target, derivation, packed layout) happens before the first
/// request. When no block was given the latest block number is fetched and the read is
/// pinned to it, so the reported block is always the one the word was read at.
pub async fn inspect_slot<S>(args: &SlotArgs, source: &S) -> Result<SlotResult, Error>
where
    S: StorageSource + ?Sized, {
    let address = args.address()?;
    let derivation = args.derivations()?;
    let slot_key = args.slot_key()?;
    let layout = args.packed_layout()?;
    debug!("derived slot {} via {:?}", slot_key, derivation);

    let block = match args.block {
        Some(block) => block,
        None => source.latest_block().await?,
    };
    let slot = read_slot(source, address, slot_key, Some(block)).await?;

    let decoded = match (args.decode, layout) {
        (Some(DecodeAs::Address), _) => Some(DecodedValue::Address(decode_address(slot.raw_value))),
        (Some(DecodeAs::Uint), _) => Some(DecodedValue::UnsignedInt(decode_uint(slot.raw_value))),
        (Some(DecodeAs::Packed), Some(layout)) => {
            Some(DecodedValue::PackedFields(decode_packed_with(slot.raw_value, &layout)))
        }
        _ => None,
    };

    Ok(SlotResult { derivation, slot, decoded })
}

/// Reads and decodes a single storage slot of a contract
///
/// # Arguments
///
/// * `args` - Configuration parameters for the slot operation
///
/// # Returns
///
/// The derivation steps, the raw word and its decoded form
pub async fn slot(args: SlotArgs) -> Result<SlotResult, Error> {
    let start_time = Instant::now();
    let source = RpcStorage::new(&args.rpc_url)?;

    let result = inspect_slot(&args, &source).await?;

    debug!("slot read took {:?}", start_time.elapsed());
    Ok(result)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::{
        interfaces::SlotArgsBuilder,
        utils::{
            derive::{namespaced_slot, EIP1967_IMPLEMENTATION_ID},
            layout::FieldOrder,
        },
    };
    use alloy::primitives::{address, b256, U256};
    use async_trait::async_trait;
    use std::{
        collections::HashMap,
        sync::atomic::{AtomicUsize, Ordering},
    };

    /// An in-memory node holding a single block of storage.
    #[derive(Debug, Default)]
    pub(crate) struct MemoryStorage {
        pub(crate) words: HashMap<(Address, Option<u64>, B256), B256>,
        pub(crate) latest: u64,
        pub(crate) reads: AtomicUsize,
    }

    impl MemoryStorage {
        pub(crate) fn insert(&mut self, address: Address, block: u64, slot: B256, word: B256) {
            self.words.insert((address, Some(block), slot), word);
        }
    }

    #[async_trait]
    impl StorageSource for MemoryStorage {
        async fn storage_at(
            &self,
            address: Address,
            slot: B256,
            block: Option<u64>,
        ) -> Result<B256, Error> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            let block = block.or(Some(self.latest));
            Ok(self.words.get(&(address, block, slot)).copied().unwrap_or_default())
        }

        async fn latest_block(&self) -> Result<u64, Error> {
            Ok(self.latest)
        }
    }

    /// A node that is never reachable.
    #[derive(Debug)]
    pub(crate) struct OfflineStorage;

    #[async_trait]
    impl StorageSource for OfflineStorage {
        async fn storage_at(&self, _: Address, _: B256, _: Option<u64>) -> Result<B256, Error> {
            Err(Error::NetworkError("connection refused".to_string()))
        }

        async fn latest_block(&self) -> Result<u64, Error> {
            Err(Error::NetworkError("connection refused".to_string()))
        }
    }

    const PROXY: Address = address!("A0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48");

    #[tokio::test]
    async fn test_unset_slot_reads_as_zero() {
        let source = MemoryStorage::default();
        let slot = read_slot(&source, PROXY, B256::with_last_byte(7), None)
            .await
            .expect("read_slot() returned an error!");

        assert_eq!(slot.raw_value, B256::ZERO);
    }

    #[tokio::test]
    async fn test_network_errors_are_surfaced() {
        let result = read_slot(&OfflineStorage, PROXY, B256::ZERO, None).await;
        assert!(matches!(result, Err(Error::NetworkError(_))));
    }

    #[tokio::test]
    async fn test_inspect_slot_decodes_address_at_latest_block() {
        let implementation = address!("43506849D7C04F9138D1A2050bbF3A0c054402dd");
        let mut source = MemoryStorage { latest: 19_000_000, ..Default::default() };
        source.insert(
            PROXY,
            19_000_000,
            namespaced_slot(EIP1967_IMPLEMENTATION_ID),
            implementation.into_word(),
        );

        let args = SlotArgsBuilder::new()
            .target(PROXY.to_string())
            .namespace(Some(EIP1967_IMPLEMENTATION_ID.to_string()))
            .decode(Some(DecodeAs::Address))
            .build()
            .expect("failed to build args");
        let result = inspect_slot(&args, &source).await.expect("inspect_slot() returned an error!");

        assert_eq!(result.slot.block, Some(19_000_000));
        assert_eq!(result.decoded, Some(DecodedValue::Address(implementation)));
        assert_eq!(
            result.decoded.clone().expect("decoded").to_string(),
            "0x43506849D7C04F9138D1A2050bbF3A0c054402dd"
        );

        let json = serde_json::to_value(&result).expect("serializable");
        assert_eq!(json["slot"]["address"], "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48");
        assert_eq!(json["decoded"]["value"], "0x43506849D7C04F9138D1A2050bbF3A0c054402dd");
    }

    #[tokio::test]
    async fn test_struct_fields_follow_solidity_packing() {
        // struct Lock { uint128 amount; uint128 lockedUntil; } stored at locks[holder], with
        // amount = 600 in the low half and lockedUntil = 9876543210 in the high half
        let holder = address!("d8dA6BF26964aF9D7eEd9e03E53415D37aA96045");
        let word = b256!("0000000000000000000000024cb016ea00000000000000000000000000000258");

        let low_first = SlotArgsBuilder::new()
            .target(PROXY.to_string())
            .slot(Some("5".to_string()))
            .keys(vec![holder.to_string()])
            .decode(Some(DecodeAs::Packed))
            .widths(vec![128, 128])
            .order(FieldOrder::LowFirst)
            .block(Some(1))
            .build()
            .expect("failed to build args");
        let high_first = SlotArgs { order: FieldOrder::HighFirst, ..low_first.clone() };

        let mut source = MemoryStorage::default();
        source.insert(PROXY, 1, low_first.slot_key().expect("valid slot"), word);

        let result =
            inspect_slot(&low_first, &source).await.expect("inspect_slot() returned an error!");
        assert_eq!(
            result.decoded,
            Some(DecodedValue::PackedFields(vec![U256::from(600), U256::from(9_876_543_210u64)]))
        );

        let result =
            inspect_slot(&high_first, &source).await.expect("inspect_slot() returned an error!");
        assert_eq!(
            result.decoded,
            Some(DecodedValue::PackedFields(vec![U256::from(9_876_543_210u64), U256::from(600)]))
        );
    }

    #[tokio::test]
    async fn test_low_first_layout_reads_solidity_packing() {
        // solc packs `uint64 a; uint32 b;` as b << 64 | a
        let word = B256::from(
            ((U256::from(7u32) << 64usize) | U256::from(1_700_000_000u64)).to_be_bytes::<32>(),
        );
        let mut source = MemoryStorage::default();
        source.insert(PROXY, 1, B256::ZERO, word);

        let args = SlotArgsBuilder::new()
            .target(PROXY.to_string())
            .slot(Some("0".to_string()))
            .decode(Some(DecodeAs::Packed))
            .widths(vec![64, 32])
            .order(FieldOrder::LowFirst)
            .block(Some(1))
            .build()
            .expect("failed to build args");
        let result = inspect_slot(&args, &source).await.expect("inspect_slot() returned an error!");

        assert_eq!(
            result.decoded,
            Some(DecodedValue::PackedFields(vec![U256::from(1_700_000_000u64), U256::from(7)]))
        );
    }

    #[tokio::test]
    async fn test_invalid_layout_fails_before_any_read() {
        let source = MemoryStorage::default();
        let args = SlotArgsBuilder::new()
            .target(PROXY.to_string())
            .slot(Some("0".to_string()))
            .decode(Some(DecodeAs::Packed))
            .widths(vec![200, 100])
            .build()
            .expect("failed to build args");

        let result = inspect_slot(&args, &source).await;
        assert!(matches!(result, Err(Error::InvalidLayoutError(_))));
        assert_eq!(source.reads.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_raw_only_when_no_decoding_requested() {
        let mut source = MemoryStorage::default();
        source.insert(PROXY, 3, B256::ZERO, B256::with_last_byte(1));

        let args = SlotArgsBuilder::new()
            .target(PROXY.to_string())
            .slot(Some("0".to_string()))
            .block(Some(3))
            .build()
            .expect("failed to build args");
        let result = inspect_slot(&args, &source).await.expect("inspect_slot() returned an error!");

        assert_eq!(result.slot.raw_value, B256::with_last_byte(1));
        assert_eq!(result.decoded, None);
    }

    #[tokio::test]
    async fn test_slot_requires_rpc_url() {
        let args = SlotArgsBuilder::new()
            .target(PROXY.to_string())
            .slot(Some("0".to_string()))
            .build()
            .expect("failed to build args");

        assert!(matches!(slot(args).await, Err(Error::NetworkError(_))));
    }
}
