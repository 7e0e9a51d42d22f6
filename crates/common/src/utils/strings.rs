use eyre::{bail, eyre, Result};

/// Decodes a hex string into a vector of bytes
///
/// ```
/// use loupe_common::utils::strings::decode_hex;
///
/// let hex = "48656c6c6f20576f726c64"; // "Hello World" in hex
/// let result = decode_hex(hex).expect("should decode hex");
/// assert_eq!(result, vec![72, 101, 108, 108, 111, 32, 87, 111, 114, 108, 100]);
/// ```
pub fn decode_hex(mut s: &str) -> Result<Vec<u8>> {
    // normalize
    s = s.trim();
    s = s.strip_prefix("0x").unwrap_or(s);

    if s.is_empty() {
        return Ok(vec![]);
    }
    if s.len() % 2 != 0 || !s.is_ascii() {
        bail!("invalid hex string: {}", s);
    }

    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&s[i..i + 2], 16))
        .collect::<Result<Vec<u8>, _>>()
        .map_err(|_| eyre!("invalid hex string: {}", s))
}
