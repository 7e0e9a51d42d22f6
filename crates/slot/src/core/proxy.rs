use alloy::primitives::{keccak256, Address, B256};
use serde::Serialize;
use std::time::Instant;
use tracing::{debug, info, trace};

use crate::{
    core::read_slot,
    error::Error,
    interfaces::{parse_address, ProxyArgs},
    utils::{
        decode::{decode_address, serialize_checksummed, serialize_checksummed_opt},
        derive::{
            namespaced_slot, EIP1967_ADMIN_ID, EIP1967_BEACON_ID, EIP1967_IMPLEMENTATION_ID,
            ZEPPELINOS_ADMIN_ID, ZEPPELINOS_IMPLEMENTATION_ID,
        },
        source::{RpcStorage, StorageSource},
    },
};

/// The well-known proxy slots of a contract, each decoded as an address. A slot holding the
/// zero word is reported as `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProxyReport {
    /// The contract inspected.
    #[serde(serialize_with = "serialize_checksummed")]
    pub address: Address,
    /// The block every slot was read at.
    pub block: u64,
    /// The EIP-1967 implementation slot.
    #[serde(serialize_with = "serialize_checksummed_opt")]
    pub implementation: Option<Address>,
    /// The EIP-1967 admin slot.
    #[serde(serialize_with = "serialize_checksummed_opt")]
    pub admin: Option<Address>,
    /// The EIP-1967 beacon slot.
    #[serde(serialize_with = "serialize_checksummed_opt")]
    pub beacon: Option<Address>,
    /// The ZeppelinOS implementation slot, used by proxies that predate EIP-1967.
    #[serde(serialize_with = "serialize_checksummed_opt")]
    pub legacy_implementation: Option<Address>,
    /// The ZeppelinOS admin slot.
    #[serde(serialize_with = "serialize_checksummed_opt")]
    pub legacy_admin: Option<Address>,
}

impl ProxyReport {
    /// Whether any of the proxy slots is set.
    pub fn is_proxy(&self) -> bool {
        self.implementation.is_some() ||
            self.beacon.is_some() ||
            self.legacy_implementation.is_some()
    }

    /// Logs the report in a human readable form.
    pub fn display(&self) {
        let show = |value: &Option<Address>| {
            value.map(|address| address.to_string()).unwrap_or_else(|| "unset".to_string())
        };

        info!("proxy:                 {}", self.address);
        info!("block:                 {}", self.block);
        info!("implementation:        {}", show(&self.implementation));
        info!("admin:                 {}", show(&self.admin));
        info!("beacon:                {}", show(&self.beacon));
        info!("legacy implementation: {}", show(&self.legacy_implementation));
        info!("legacy admin:          {}", show(&self.legacy_admin));
        if !self.is_proxy() {
            info!("no proxy slot is set; {} is probably not a proxy", self.address);
        }
    }
}

/// Reads the EIP-1967 implementation, admin and beacon slots of `address`, plus the legacy
/// ZeppelinOS implementation and admin slots. Every read is pinned to the same block:
/// `at_block`, or the latest block at the time of the call.
pub async fn inspect_proxy<S>(
    source: &S,
    address: Address,
    at_block: Option<u64>,
) -> Result<ProxyReport, Error>
where
    S: StorageSource + ?Sized, {
    let block = match at_block {
        Some(block) => block,
        None => source.latest_block().await?,
    };
    debug!("reading proxy slots of {} at block {}", address, block);

    let read = |slot_key: B256| async move {
        let slot = read_slot(source, address, slot_key, Some(block)).await?;
        trace!("slot {} holds {}", slot_key, slot.raw_value);
        Ok::<_, Error>((!slot.raw_value.is_zero()).then(|| decode_address(slot.raw_value)))
    };

    Ok(ProxyReport {
        address,
        block,
        implementation: read(namespaced_slot(EIP1967_IMPLEMENTATION_ID)).await?,
        admin: read(namespaced_slot(EIP1967_ADMIN_ID)).await?,
        beacon: read(namespaced_slot(EIP1967_BEACON_ID)).await?,
        legacy_implementation: read(keccak256(ZEPPELINOS_IMPLEMENTATION_ID.as_bytes())).await?,
        legacy_admin: read(keccak256(ZEPPELINOS_ADMIN_ID.as_bytes())).await?,
    })
}

/// Inspects the proxy slots of the contract named by `args`
pub async fn proxy(args: ProxyArgs) -> Result<ProxyReport, Error> {
    let start_time = Instant::now();
    let address = parse_address(&args.target)?;
    let source = RpcStorage::new(&args.rpc_url)?;

    let report = inspect_proxy(&source, address, args.block).await?;

    debug!("proxy inspection took {:?}", start_time.elapsed());
    Ok(report)
}
