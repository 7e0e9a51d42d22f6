//! Error types for the common module

/// Errors raised at the RPC boundary
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A generic error with a message
    #[error("Error: {0}")]
    Generic(String),

    /// The node was unreachable or returned an unusable response
    #[error("RPC error: {0}")]
    RpcError(String),
}
