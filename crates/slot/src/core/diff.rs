use alloy::primitives::{Address, B256};
use serde::Serialize;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::{
    core::read_slot,
    error::Error,
    interfaces::DiffArgs,
    utils::{
        decode::serialize_checksummed,
        source::{RpcStorage, StorageSource},
    },
};

/// One slot read at two blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SlotDiff {
    /// The storage key compared.
    pub slot: B256,
    /// The word at the first block.
    pub before: B256,
    /// The word at the second block.
    pub after: B256,
    /// Whether the two words differ.
    pub changed: bool,
}

/// A set of slots of one contract, compared between two blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StorageDiff {
    /// The contract compared.
    #[serde(serialize_with = "serialize_checksummed")]
    pub address: Address,
    /// The block the "before" values were read at.
    pub from_block: u64,
    /// The block the "after" values were read at.
    pub to_block: u64,
    /// One entry per slot, in the order the slots were requested.
    pub slots: Vec<SlotDiff>,
}

impl StorageDiff {
    /// The slots whose value differs between the two blocks.
    pub fn changed(&self) -> impl Iterator<Item = &SlotDiff> {
        self.slots.iter().filter(|diff| diff.changed)
    }

    /// Logs the changed slots.
    pub fn display(&self) {
        info!("{} between blocks {} and {}", self.address, self.from_block, self.to_block);

        let mut changed = 0;
        for diff in self.changed() {
            info!("{}: {} -> {}", diff.slot, diff.before, diff.after);
            changed += 1;
        }
        info!("{} of {} slots changed", changed, self.slots.len());
    }
}

/// Reads every slot in `slots` at `block_a` and at `block_b`, one request at a time.
pub async fn diff_slots<S>(
    source: &S,
    address: Address,
    slots: &[B256],
    block_a: u64,
    block_b: u64,
) -> Result<StorageDiff, Error>
where
    S: StorageSource + ?Sized, {
    if block_a > block_b {
        warn!("comparing block {} against the earlier block {}", block_a, block_b);
    }

    let mut diffs = Vec::with_capacity(slots.len());
    for slot in slots {
        let before = read_slot(source, address, *slot, Some(block_a)).await?.raw_value;
        let after = read_slot(source, address, *slot, Some(block_b)).await?.raw_value;
        diffs.push(SlotDiff { slot: *slot, before, after, changed: before != after });
    }

    Ok(StorageDiff { address, from_block: block_a, to_block: block_b, slots: diffs })
}

/// Compares the slots named by `args` between `--from-block` and `--to-block`
pub async fn diff(args: DiffArgs) -> Result<StorageDiff, Error> {
    let start_time = Instant::now();
    let address = args.address()?;
    let slots = args.slot_keys()?;
    let source = RpcStorage::new(&args.rpc_url)?;

    let to_block = match args.to_block {
        Some(block) => block,
        None => source.latest_block().await?,
    };
    let result = diff_slots(&source, address, &slots, args.from_block, to_block).await?;

    debug!("storage diff of {} slots took {:?}", slots.len(), start_time.elapsed());
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::tests::MemoryStorage,
        interfaces::DiffArgsBuilder,
        utils::derive::{namespaced_slot, EIP1967_IMPLEMENTATION_ID},
    };
    use alloy::primitives::address;
    use std::sync::atomic::Ordering;

    const PROXY: Address = address!("A0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48");

    #[tokio::test]
    async fn test_detects_upgrade() {
        let implementation_slot = namespaced_slot(EIP1967_IMPLEMENTATION_ID);
        let old = address!("d8dA6BF26964aF9D7eEd9e03E53415D37aA96045");
        let new = address!("43506849D7C04F9138D1A2050bbF3A0c054402dd");

        let mut source = MemoryStorage::default();
        source.insert(PROXY, 100, implementation_slot, old.into_word());
        source.insert(PROXY, 200, implementation_slot, new.into_word());
        source.insert(PROXY, 100, B256::ZERO, B256::with_last_byte(1));
        source.insert(PROXY, 200, B256::ZERO, B256::with_last_byte(1));

        let result = diff_slots(&source, PROXY, &[B256::ZERO, implementation_slot], 100, 200)
            .await
            .expect("diff_slots() returned an error!");

        assert_eq!(result.slots.len(), 2);
        assert!(!result.slots[0].changed);
        assert!(result.slots[1].changed);
        assert_eq!(result.slots[1].before, old.into_word());
        assert_eq!(result.slots[1].after, new.into_word());
        assert_eq!(result.changed().count(), 1);
        assert_eq!(source.reads.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_same_block_never_changes() {
        let mut source = MemoryStorage::default();
        source.insert(PROXY, 5, B256::ZERO, B256::with_last_byte(9));

        let result =
            diff_slots(&source, PROXY, &[B256::ZERO], 5, 5).await.expect("diff_slots() failed");
        assert_eq!(result.changed().count(), 0);
    }

    #[tokio::test]
    async fn test_diff_json_address_is_checksummed() {
        let source = MemoryStorage::default();
        let result =
            diff_slots(&source, PROXY, &[B256::ZERO], 1, 2).await.expect("diff_slots() failed");
        let json = serde_json::to_value(&result).expect("serializable");

        assert_eq!(json["address"], "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48");
        assert_eq!(json["slots"][0]["changed"], false);
    }

    #[tokio::test]
    async fn test_diff_requires_slots() {
        let args = DiffArgsBuilder::new()
            .target(PROXY.to_string())
            .rpc_url("http://127.0.0.1:1".to_string())
            .build()
            .expect("failed to build args");

        assert!(matches!(diff(args).await, Err(Error::InvalidLayoutError(_))));
    }
}
