/// Error type for the Selector module
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The signature template cannot produce candidates
    #[error("Invalid template: {0}")]
    InvalidTemplate(String),

    /// The target is not a 4-byte selector
    #[error("Invalid selector: {0}")]
    InvalidSelector(String),

    /// Generic internal error
    #[error("Internal error: {0}")]
    Eyre(#[from] eyre::Report),
}
