use alloy::primitives::{Address, B256};
use async_trait::async_trait;
use loupe_common::ether::rpc::{get_storage_at, latest_block_number};

use crate::error::Error;

/// Anything that can answer raw storage reads. The RPC-backed [`RpcStorage`] is the only
/// implementation loupe ships; tests substitute an in-memory one.
#[async_trait]
pub trait StorageSource: Send + Sync {
    /// Returns the word at `slot` of `address`, at `block` or at the latest block when `None`.
    /// Unset slots are the zero word.
    async fn storage_at(
        &self,
        address: Address,
        slot: B256,
        block: Option<u64>,
    ) -> Result<B256, Error>;

    /// Returns the number of the latest block.
    async fn latest_block(&self) -> Result<u64, Error>;
}

/// A [`StorageSource`] backed by a JSON-RPC node.
#[derive(Debug, Clone)]
pub struct RpcStorage {
    rpc_url: String,
}

impl RpcStorage {
    /// Creates a source talking to `rpc_url`. No request is made until the first read.
    pub fn new(rpc_url: &str) -> Result<Self, Error> {
        if rpc_url.is_empty() {
            return Err(Error::NetworkError(
                "no RPC URL provided. pass --rpc-url or set one with `loupe config rpc_url <URL>`"
                    .to_string(),
            ));
        }

        Ok(Self { rpc_url: rpc_url.to_string() })
    }
}

#[async_trait]
impl StorageSource for RpcStorage {
    async fn storage_at(
        &self,
        address: Address,
        slot: B256,
        block: Option<u64>,
    ) -> Result<B256, Error> {
        get_storage_at(address, slot, block, &self.rpc_url)
            .await
            .map_err(|e| Error::NetworkError(e.to_string()))
    }

    async fn latest_block(&self) -> Result<u64, Error> {
        latest_block_number(&self.rpc_url).await.map_err(|e| Error::NetworkError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rpc_storage_requires_url() {
        assert!(matches!(RpcStorage::new(""), Err(Error::NetworkError(_))));
        assert!(RpcStorage::new("http://localhost:8545").is_ok());
    }

    #[tokio::test]
    async fn test_unreachable_node_is_network_error() {
        let source = RpcStorage::new("http://127.0.0.1:1").expect("valid url");
        let result = source.storage_at(Address::ZERO, B256::ZERO, None).await;

        assert!(matches!(result, Err(Error::NetworkError(_))));
    }
}
