use crate::{error::Error, ether::provider::MultiTransportProvider};
use alloy::primitives::{Address, B256};
use tracing::trace;

/// Get the chainId of the provided RPC URL
///
/// ```no_run
/// use loupe_common::ether::rpc::chain_id;
///
/// // let chain_id = chain_id("https://eth.llamarpc.com").await?;
/// // assert_eq!(chain_id, 1);
/// ```
pub async fn chain_id(rpc_url: &str) -> Result<u64, Error> {
    let provider = MultiTransportProvider::connect(rpc_url)
        .await
        .map_err(|_| Error::RpcError(format!("failed to connect to provider '{}'", &rpc_url)))?;
    provider
        .get_chainid()
        .await
        .map_err(|e| Error::RpcError(format!("failed to get chain id: {e}")))
}

/// Get the latest block number of the provided RPC URL
///
/// ```no_run
/// use loupe_common::ether::rpc::latest_block_number;
/// // let block_number = latest_block_number("https://eth.llamarpc.com").await?;
/// // assert!(block_number > 0);
/// ```
pub async fn latest_block_number(rpc_url: &str) -> Result<u64, Error> {
    let provider = MultiTransportProvider::connect(rpc_url)
        .await
        .map_err(|_| Error::RpcError(format!("failed to connect to provider '{}'", &rpc_url)))?;
    provider
        .get_block_number()
        .await
        .map_err(|e| Error::RpcError(format!("failed to get block number: {e}")))
}

/// Get the raw storage word at `slot` of the provided contract address. Unset slots
/// come back as the zero word. A single request is issued; nothing is retried.
///
/// ```no_run
/// use loupe_common::ether::rpc::get_storage_at;
///
/// // let word = get_storage_at(address, B256::ZERO, None, "https://eth.llamarpc.com").await;
/// // assert!(word.is_ok());
/// ```
pub async fn get_storage_at(
    address: Address,
    slot: B256,
    block_number: Option<u64>,
    rpc_url: &str,
) -> Result<B256, Error> {
    let provider = MultiTransportProvider::connect(rpc_url)
        .await
        .map_err(|_| Error::RpcError(format!("failed to connect to provider '{}'", &rpc_url)))?;

    trace!("fetching storage slot {} of {} at block {:?}", slot, address, block_number);
    provider
        .get_storage_at(address, slot, block_number)
        .await
        .map_err(|e| Error::RpcError(format!("failed to get storage at slot {slot}: {e}")))
}

#[cfg(test)]
pub mod tests {
    use crate::ether::rpc::*;
    use alloy::primitives::address;

    #[tokio::test]
    async fn test_chain_id() {
        let Ok(rpc_url) = std::env::var("RPC_URL") else {
            println!("RPC_URL not set, skipping test");
            return;
        };

        let rpc_chain_id = chain_id(&rpc_url).await.expect("chain_id() returned an error!");

        assert_eq!(rpc_chain_id, 1);
    }

    #[tokio::test]
    async fn test_chain_id_invalid_rpc_url() {
        let rpc_url = "https://none.llamarpc.com";
        let rpc_chain_id = chain_id(rpc_url).await;

        assert!(rpc_chain_id.is_err())
    }

    #[tokio::test]
    async fn test_empty_rpc_url_is_rejected() {
        let block_number = latest_block_number("").await;

        assert!(matches!(block_number, Err(Error::RpcError(_))))
    }

    #[tokio::test]
    async fn test_get_storage_at_unset_slot_is_zero() {
        let Ok(rpc_url) = std::env::var("RPC_URL") else {
            println!("RPC_URL not set, skipping test");
            return;
        };

        // WETH has no storage beyond its first few slots
        let weth = address!("c02aaa39b223fe8d0a0e5c4f27ead9083c756cc2");
        let slot = B256::with_last_byte(0xff);
        let word = get_storage_at(weth, slot, None, &rpc_url)
            .await
            .expect("get_storage_at() returned an error!");

        assert_eq!(word, B256::ZERO);
    }

    #[tokio::test]
    async fn test_get_storage_at_unreachable_node() {
        let weth = address!("c02aaa39b223fe8d0a0e5c4f27ead9083c756cc2");
        let word = get_storage_at(weth, B256::ZERO, None, "http://127.0.0.1:1").await;

        assert!(word.is_err())
    }
}
