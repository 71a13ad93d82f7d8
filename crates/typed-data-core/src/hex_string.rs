//! `0x`-prefixed hex strings as they appear in typed data values.
//!
//! dApps send `bytes`, `bytesN` and `address` values as hex strings. The
//! prefix is mandatory; an odd number of digits is accepted and read as if
//! a leading `0` nibble were present.

use crate::error::{Error, Result};

/// Returns `true` if `s` is `0x` (or `0X`) followed by zero or more hex digits.
#[must_use]
pub fn is_valid_hex_string(s: &str) -> bool {
    strip_hex_prefix(s).is_some_and(|digits| digits.bytes().all(|b| b.is_ascii_hexdigit()))
}

/// Decodes a `0x`-prefixed hex string into bytes.
///
/// `"0x"` decodes to an empty vector.
///
/// # Errors
///
/// Returns [`Error::MalformedHex`] if the prefix is missing or a digit is
/// not hexadecimal.
///
/// # Example
///
/// ```
/// use eth_typed_data_core::hex_string::decode_prefixed_hex;
///
/// assert_eq!(decode_prefixed_hex("0x0102").unwrap(), vec![1, 2]);
/// assert_eq!(decode_prefixed_hex("0x102").unwrap(), vec![1, 2]);
/// assert!(decode_prefixed_hex("0102").is_err());
/// ```
pub fn decode_prefixed_hex(s: &str) -> Result<Vec<u8>> {
    if !is_valid_hex_string(s) {
        return Err(Error::MalformedHex(s.to_string()));
    }
    let digits = &s[2..];
    if digits.len() % 2 == 1 {
        Ok(hex::decode(format!("0{digits}"))?)
    } else {
        Ok(hex::decode(digits)?)
    }
}

/// Decodes a `bytes`/`bytesN` value: the empty string is zero bytes,
/// anything else must be a valid prefixed hex string.
pub fn decode_hex_or_empty(s: &str) -> Result<Vec<u8>> {
    if s.is_empty() {
        return Ok(Vec::new());
    }
    decode_prefixed_hex(s)
}

pub(crate) fn strip_hex_prefix(s: &str) -> Option<&str> {
    s.strip_prefix("0x").or_else(|| s.strip_prefix("0X"))
}
