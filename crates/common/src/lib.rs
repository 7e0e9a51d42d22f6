//! Common utilities used across the loupe codebase.
//!
//! This crate holds the RPC boundary shared by every loupe tool, along with a
//! handful of hex and file helpers.

/// Error types for the common module
pub mod error;

/// Utilities for interacting with Ethereum nodes over RPC.
pub mod ether;

/// General utility functions and types for common tasks.
pub mod utils;
