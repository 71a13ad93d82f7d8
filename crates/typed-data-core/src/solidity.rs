//! Parsing of EIP-712 field type strings.
//!
//! Every field in a type dictionary declares its type as a string such as
//! `"uint256"`, `"bytes32"`, `"Person"` or `"address[]"`. [`SolidityType::parse`]
//! turns that string into a tagged value once, so the encoder can dispatch
//! on it without re-inspecting prefixes.
//!
//! # Dispatch Order
//!
//! The order matters because the checks are prefix based:
//!
//! 1. `T[]` arrays (anything ending in `]`)
//! 2. `string`, `bytes`, `bool`, `address`
//! 3. `bytesN`, then `uintN`, then `intN`
//! 4. anything else names a struct
//!
//! A string that starts with `bytes`, `uint` or `int` but carries an
//! invalid size is rejected outright. It is never treated as a struct name.

use crate::error::{Error, Result};

/// Largest `N` accepted for `bytesN`.
pub const MAX_FIXED_BYTES: usize = 32;

/// A parsed field type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolidityType<'a> {
    /// A one-level array; `element` is the type string of its items.
    Array {
        /// The item type, e.g. `"Person"` for `"Person[]"`.
        element: &'a str,
    },
    /// Dynamic UTF-8 string, hashed.
    String,
    /// Dynamic byte string, hashed.
    Bytes,
    /// Boolean, encoded as a 0/1 word.
    Bool,
    /// 20-byte address, left padded.
    Address,
    /// `bytesN`, right padded.
    FixedBytes(usize),
    /// `uintN`.
    Uint(usize),
    /// `intN`.
    Int(usize),
    /// A reference to another entry of the type dictionary.
    Struct(&'a str),
}

impl<'a> SolidityType<'a> {
    /// Parses a field type string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NestedArray`] for array types that are not exactly
    /// one level deep, and [`Error::UnsupportedType`] for `bytesN`, `uintN`
    /// or `intN` with an invalid size.
    ///
    /// # Example
    ///
    /// ```
    /// use eth_typed_data_core::solidity::SolidityType;
    ///
    /// assert_eq!(SolidityType::parse("uint64").unwrap(), SolidityType::Uint(64));
    /// assert_eq!(
    ///     SolidityType::parse("Person[]").unwrap(),
    ///     SolidityType::Array { element: "Person" }
    /// );
    /// assert!(SolidityType::parse("uint7").is_err());
    /// ```
    pub fn parse(type_str: &'a str) -> Result<Self> {
        if type_str.ends_with(']') {
            let mut parts = type_str.split('[');
            let element = parts.next().unwrap_or_default();
            if parts.count() != 1 {
                return Err(Error::NestedArray(type_str.to_string()));
            }
            return Ok(Self::Array { element });
        }

        match type_str {
            "string" => return Ok(Self::String),
            "bytes" => return Ok(Self::Bytes),
            "bool" => return Ok(Self::Bool),
            "address" => return Ok(Self::Address),
            _ => {}
        }

        if let Some(size) = type_str.strip_prefix("bytes") {
            return match parse_size(size) {
                Some(n) if (1..=MAX_FIXED_BYTES).contains(&n) => Ok(Self::FixedBytes(n)),
                _ => Err(Error::UnsupportedType(type_str.to_string())),
            };
        }
        if let Some(bits) = type_str.strip_prefix("uint") {
            return match parse_size(bits) {
                Some(n) if valid_solidity_bits(n) => Ok(Self::Uint(n)),
                _ => Err(Error::UnsupportedType(type_str.to_string())),
            };
        }
        if let Some(bits) = type_str.strip_prefix("int") {
            return match parse_size(bits) {
                Some(n) if valid_solidity_bits(n) => Ok(Self::Int(n)),
                _ => Err(Error::UnsupportedType(type_str.to_string())),
            };
        }

        Ok(Self::Struct(type_str))
    }
}

/// Returns `true` for the integer widths Solidity allows: 8 to 256 in steps of 8.
#[must_use]
pub const fn valid_solidity_bits(bits: usize) -> bool {
    bits >= 8 && bits <= 256 && bits % 8 == 0
}

/// Returns the name to look up in the type dictionary for a field type.
///
/// `"Person[]"` becomes `"Person"`. Strings that do not split into exactly
/// two parts on `[` are returned unchanged.
#[must_use]
pub fn base_type_name(type_str: &str) -> &str {
    let mut parts = type_str.split('[');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(base), Some(_), None) => base,
        _ => type_str,
    }
}

fn parse_size(digits: &str) -> Option<usize> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
