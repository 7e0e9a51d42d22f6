//! The Core module is the single entry point to loupe's tools.
//!
//! It re-exports the public interfaces of the tool-specific crates so that other projects can
//! depend on one crate and reach all of them.

// Re-export all tool-specific modules
pub use loupe_common;
pub use loupe_selector;
pub use loupe_slot;
