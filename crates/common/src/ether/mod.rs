/// A transport-agnostic alloy provider.
pub mod provider;

/// One-shot RPC helpers built on [`provider::MultiTransportProvider`].
pub mod rpc;
