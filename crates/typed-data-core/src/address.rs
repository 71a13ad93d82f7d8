//! Ethereum addresses in typed data.
//!
//! `address` fields are sent as `0x`-prefixed hex strings and encoded as a
//! 32-byte word with the 20 address bytes in the low-order position:
//!
//! ```text
//! 00 00 00 00 00 00 00 00 00 00 00 00 || address (20 bytes)
//! ```
//!
//! # Example
//!
//! ```
//! use eth_typed_data_core::Address;
//!
//! let addr = Address::from_hex("0xCD2a3d9F938E13CD947Ec05AbC7FE734Df8DD826").unwrap();
//! let word = addr.to_word();
//! assert_eq!(&word[..12], &[0u8; 12]);
//! assert_eq!(&word[12..], addr.as_bytes());
//! ```

use std::fmt;

use alloy_primitives::Address as AlloyAddress;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::hex_string::decode_prefixed_hex;

/// An Ethereum address (20 bytes).
///
/// This is a wrapper around [`alloy_primitives::Address`] with the strict
/// hex parsing rules used for typed data values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(AlloyAddress);

impl Address {
    /// The length of an Ethereum address in bytes.
    pub const BYTE_LEN: usize = 20;

    /// Creates a new address from a 20-byte array.
    #[must_use]
    pub const fn new(bytes: [u8; Self::BYTE_LEN]) -> Self {
        Self(AlloyAddress::new(bytes))
    }

    /// Returns the zero address (`0x0000...0000`).
    ///
    /// # Example
    ///
    /// ```
    /// use eth_typed_data_core::Address;
    ///
    /// let zero = Address::zero();
    /// assert!(zero.is_zero());
    /// ```
    #[must_use]
    pub const fn zero() -> Self {
        Self(AlloyAddress::ZERO)
    }

    /// Checks if this is the zero address.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns the [`Address`] as a byte slice.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; Self::BYTE_LEN] {
        self.0.as_ref()
    }

    /// Returns the [`Address`] as a 20-byte array.
    #[must_use]
    pub const fn to_bytes(&self) -> [u8; Self::BYTE_LEN] {
        self.0.0.0
    }

    /// Returns the address as a left-padded 32-byte ABI word.
    #[must_use]
    pub fn to_word(&self) -> [u8; 32] {
        let mut word = [0u8; 32];
        word[32 - Self::BYTE_LEN..].copy_from_slice(self.as_bytes());
        word
    }

    /// Returns the [`Address`] as a checksummed hex string.
    ///
    /// Uses EIP-55 mixed-case checksum encoding.
    #[must_use]
    pub fn to_checksum_hex(&self) -> String {
        self.0.to_checksum(None)
    }

    /// Returns the [`Address`] as a lowercase hex string with `0x` prefix.
    #[must_use]
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.as_bytes()))
    }

    /// Parses an [`Address`] from a `0x`-prefixed hex string.
    ///
    /// Checksum casing is not verified; typed data payloads routinely carry
    /// all-lowercase addresses.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedHex`] if the string is not prefixed hex, or
    /// [`Error::InvalidAddress`] if it does not decode to exactly 20 bytes.
    ///
    /// # Example
    ///
    /// ```
    /// use eth_typed_data_core::Address;
    ///
    /// let addr = Address::from_hex("0x0000000000000000000000000000000000000000").unwrap();
    /// assert!(addr.is_zero());
    /// assert!(Address::from_hex("0000000000000000000000000000000000000000").is_err());
    /// ```
    pub fn from_hex(hex_str: &str) -> Result<Self> {
        let bytes = decode_prefixed_hex(hex_str)?;

        let address_bytes: [u8; Self::BYTE_LEN] = bytes.as_slice().try_into().map_err(|_| {
            Error::InvalidAddress(format!(
                "expected {} bytes, got {}",
                Self::BYTE_LEN,
                bytes.len()
            ))
        })?;
        Ok(Self::new(address_bytes))
    }

    /// Returns the inner [`alloy_primitives::Address`].
    #[must_use]
    pub const fn inner(&self) -> AlloyAddress {
        self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_checksum_hex())
    }
}

impl From<AlloyAddress> for Address {
    fn from(addr: AlloyAddress) -> Self {
        Self(addr)
    }
}

impl From<Address> for AlloyAddress {
    fn from(addr: Address) -> Self {
        addr.0
    }
}

impl From<[u8; 20]> for Address {
    fn from(bytes: [u8; 20]) -> Self {
        Self::new(bytes)
    }
}
