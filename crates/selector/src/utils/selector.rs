use alloy::primitives::{keccak256, Selector};
use loupe_common::utils::strings::decode_hex;
use serde::Serialize;

use crate::error::Error;

/// A signature together with its selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectorCandidate {
    /// The function signature, e.g. `transfer(address,uint256)`.
    pub signature: String,
    /// The first four bytes of the signature's hash.
    pub selector: Selector,
}

impl SelectorCandidate {
    /// Hashes `signature`.
    pub fn new(signature: String) -> Self {
        let selector = selector_of(&signature);
        Self { signature, selector }
    }
}

/// Returns the first four bytes of `keccak256(signature)`.
///
/// ```
/// use loupe_selector::selector_of;
///
/// assert_eq!(selector_of("transfer(address,uint256)").to_string(), "0xa9059cbb");
/// ```
pub fn selector_of(signature: &str) -> Selector {
    Selector::from_slice(&keccak256(signature.as_bytes())[..4])
}

/// Parses a 4-byte selector written as 8 hex digits, with or without a `0x` prefix.
pub fn parse_selector(value: &str) -> Result<Selector, Error> {
    let bytes = decode_hex(value)
        .map_err(|e| Error::InvalidSelector(format!("'{}': {e}", value.trim())))?;

    if bytes.len() != 4 {
        return Err(Error::InvalidSelector(format!(
            "'{}' is {} bytes long, expected 4",
            value.trim(),
            bytes.len()
        )));
    }

    Ok(Selector::from_slice(&bytes))
}
