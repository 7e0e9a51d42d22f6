//! The Selector module searches for a function signature whose 4-byte selector matches a
//! target, by substituting every integer of a range into a signature template.

/// Error types for the selector module
pub mod error;

mod core;
mod interfaces;
mod utils;

// re-export the public interface
pub use crate::core::{find_match, probe, ProbeReport, ProbeResult};
pub use error::Error;
pub use interfaces::{ProbeArgs, ProbeArgsBuilder};
pub use utils::{
    candidates::{generate_candidates, Candidates, PLACEHOLDER},
    selector::{parse_selector, selector_of, SelectorCandidate},
};
