#[derive(Debug, thiserror::Error)]
pub(crate) enum Error {
    #[error("{0}")]
    Generic(String),
    #[error("Slot error: {0}")]
    SlotError(#[from] loupe_core::loupe_slot::Error),
    #[error("Selector error: {0}")]
    SelectorError(#[from] loupe_core::loupe_selector::Error),
}
