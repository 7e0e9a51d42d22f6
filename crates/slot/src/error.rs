/// Error type for the Slot module
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The node was unreachable, timed out, or answered with something that is not a word
    #[error("Network error: {0}")]
    NetworkError(String),

    /// A slot or packed layout description was rejected before any request was made
    #[error("Invalid layout: {0}")]
    InvalidLayoutError(String),

    /// Generic internal error
    #[error("Internal error: {0}")]
    Eyre(#[from] eyre::Report),
}
