//! Create a custom data transport to use with a Provider.
use alloy::{
    eips::BlockId,
    network::Ethereum,
    primitives::{Address, B256, U256},
    providers::{Provider, ProviderBuilder, RootProvider},
};
use eyre::Result;

/// [`MultiTransportProvider`] is a convenience wrapper around the different transport types
/// supported by the [`Provider`].
#[derive(Clone, Debug)]
pub struct MultiTransportProvider {
    provider: RootProvider<Ethereum>,
}

// We implement a convenience "constructor" method, to easily initialize the transport.
// This will connect to [`Http`] if the rpc_url contains 'http', to [`Ws`] if it contains 'ws',
// otherwise it'll default to [`Ipc`].
impl MultiTransportProvider {
    /// Connect to a provider using the given rpc_url.
    pub async fn connect(rpc_url: &str) -> Result<Self> {
        if rpc_url.is_empty() {
            return Err(eyre::eyre!("No RPC URL provided"));
        }

        let provider = ProviderBuilder::new().connect(rpc_url).await?.root().clone();
        Ok(Self { provider })
    }

    /// Get the chain id.
    pub async fn get_chainid(&self) -> Result<u64> {
        Ok(self.provider.get_chain_id().await?)
    }

    /// Get the latest block number.
    pub async fn get_block_number(&self) -> Result<u64> {
        Ok(self.provider.get_block_number().await?)
    }

    /// Get the raw 32-byte word stored at `slot` of `address`.
    /// When `block_number` is `None` the node's latest block is used.
    pub async fn get_storage_at(
        &self,
        address: Address,
        slot: B256,
        block_number: Option<u64>,
    ) -> Result<B256> {
        let request = self.provider.get_storage_at(address, U256::from_be_bytes(slot.0));
        let value = match block_number {
            Some(number) => request.block_id(BlockId::number(number)).await?,
            None => request.await?,
        };

        Ok(B256::from(value.to_be_bytes::<32>()))
    }
}
