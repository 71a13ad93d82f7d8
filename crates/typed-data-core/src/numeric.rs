//! Decoding of `uintN` and `intN` values.
//!
//! Wallets receive integers either as JSON numbers (which JavaScript can only
//! represent exactly up to `Number.MAX_SAFE_INTEGER`) or as strings, hex
//! (`0x` prefixed) or base-10. Both are decoded into 256-bit integers and
//! checked against the declared bit width.

use alloy_primitives::{I256, U256};
use serde_json::{Number, Value};

use crate::error::{Error, Result};
use crate::hex_string::{is_valid_hex_string, strip_hex_prefix};
use crate::solidity::valid_solidity_bits;

/// ES6 `Number.MAX_SAFE_INTEGER` (2^53 - 1).
pub const MAX_SAFE_INTEGER: u64 = 9_007_199_254_740_991;

const MAX_SAFE_INTEGER_SIGNED: i64 = 9_007_199_254_740_991;

/// Largest value of a `uintN`.
#[must_use]
pub fn uint_max(bits: usize) -> U256 {
    if bits >= 256 {
        U256::MAX
    } else {
        (U256::from(1u8) << bits) - U256::from(1u8)
    }
}

/// Smallest value of an `intN`, or `None` if `bits` is not a Solidity
/// integer width.
#[must_use]
pub fn int_min(bits: usize) -> Option<I256> {
    valid_solidity_bits(bits).then(|| I256::from_raw(U256::MAX << (bits - 1)))
}

/// Largest value of an `intN`, or `None` if `bits` is not a Solidity
/// integer width.
#[must_use]
pub fn int_max(bits: usize) -> Option<I256> {
    valid_solidity_bits(bits)
        .then(|| I256::from_raw((U256::from(1u8) << (bits - 1)) - U256::from(1u8)))
}

/// Decodes a `uintN` value and checks it fits in `bits`.
///
/// # Errors
///
/// - [`Error::ShapeMismatch`] if the value is neither a number nor a string
/// - [`Error::UnsafeInteger`] if a JSON number is above [`MAX_SAFE_INTEGER`]
/// - [`Error::NotANumber`] if a string is empty or not hex/base-10
/// - [`Error::OutOfRange`] if the value is negative or above `2^bits - 1`
pub fn parse_uint(solidity_type: &str, bits: usize, value: &Value) -> Result<U256> {
    let parsed = match value {
        Value::Number(n) => uint_from_number(solidity_type, n)?,
        Value::String(s) => uint_from_str(s)?,
        _ => return Err(Error::shape(solidity_type, "a number or numeric string")),
    };

    if parsed > uint_max(bits) {
        return Err(Error::out_of_range(solidity_type, parsed));
    }
    Ok(parsed)
}

/// Decodes an `intN` value and checks it fits in `bits`.
///
/// Hex strings are read as the two's-complement bit pattern of a 256-bit
/// word, so `0xff…ff` (64 digits) is `-1`.
///
/// # Errors
///
/// Same as [`parse_uint`], with the range `[-2^(bits-1), 2^(bits-1) - 1]`.
pub fn parse_int(solidity_type: &str, bits: usize, value: &Value) -> Result<I256> {
    let parsed = match value {
        Value::Number(n) => int_from_number(n)?,
        Value::String(s) => int_from_str(s)?,
        _ => return Err(Error::shape(solidity_type, "a number or numeric string")),
    };

    let (Some(min), Some(max)) = (int_min(bits), int_max(bits)) else {
        return Err(Error::UnsupportedType(solidity_type.to_string()));
    };
    if parsed < min || parsed > max {
        return Err(Error::out_of_range(solidity_type, parsed));
    }
    Ok(parsed)
}

fn uint_from_number(solidity_type: &str, n: &Number) -> Result<U256> {
    let f = n.as_f64().ok_or_else(|| Error::NotANumber(n.to_string()))?;
    if f < 0.0 {
        return Err(Error::out_of_range(solidity_type, n));
    }
    let truncated = f as u64;
    if truncated > MAX_SAFE_INTEGER {
        return Err(Error::UnsafeInteger(n.to_string()));
    }
    Ok(U256::from(truncated))
}

// Only the upper ceiling is checked here; the intN range bounds the low side.
fn int_from_number(n: &Number) -> Result<I256> {
    let f = n.as_f64().ok_or_else(|| Error::NotANumber(n.to_string()))?;
    let truncated = f as i64;
    if truncated > MAX_SAFE_INTEGER_SIGNED {
        return Err(Error::UnsafeInteger(n.to_string()));
    }
    let magnitude = I256::from_raw(U256::from(truncated.unsigned_abs()));
    Ok(if truncated < 0 { -magnitude } else { magnitude })
}

fn uint_from_str(s: &str) -> Result<U256> {
    if let Some(digits) = hex_digits(s) {
        if digits.is_empty() {
            return Ok(U256::ZERO);
        }
        return U256::from_str_radix(digits, 16).map_err(|_| Error::NotANumber(s.to_string()));
    }
    if !is_decimal(s) {
        return Err(Error::NotANumber(s.to_string()));
    }
    U256::from_str_radix(s, 10).map_err(|_| Error::NotANumber(s.to_string()))
}

fn int_from_str(s: &str) -> Result<I256> {
    if hex_digits(s).is_some() {
        return uint_from_str(s).map(I256::from_raw);
    }
    let unsigned = s.strip_prefix('-').unwrap_or(s);
    if !is_decimal(unsigned) {
        return Err(Error::NotANumber(s.to_string()));
    }
    I256::from_dec_str(s).map_err(|_| Error::NotANumber(s.to_string()))
}

fn hex_digits(s: &str) -> Option<&str> {
    if is_valid_hex_string(s) {
        strip_hex_prefix(s)
    } else {
        None
    }
}

fn is_decimal(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}
