//! Error types for EIP-712 typed data encoding.
//!
//! This module provides the error type [`enum@Error`] that covers every way
//! a typed data payload can fail to produce a signable digest.
//!
//! # Error Categories
//!
//! - **Type dictionary errors**: unknown struct names, malformed field descriptors
//! - **Value errors**: wrong JSON kind, out-of-range integers, malformed hex
//! - **Version errors**: features only available under `eth_signTypedData_v4`
//! - **Request errors**: malformed `eth_signTypedData` parameters, chain mismatch
//!
//! Any error at any nesting depth aborts the whole encoding. There are no
//! partial results.
//!
//! # Example
//!
//! ```
//! use eth_typed_data_core::Error;
//!
//! fn example() -> Result<(), Error> {
//!     let err = Error::ArrayRequiresV4("uint256[]".to_string());
//!     assert!(matches!(err, Error::ArrayRequiresV4(_)));
//!     Ok(())
//! }
//! ```

use core::result::Result as CoreResult;
use hex::FromHexError;
use serde_json::Error as SerdeJsonError;
use thiserror::Error;

/// The main error type for typed data encoding.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    // =========================================================================
    // Type Dictionary Errors
    // =========================================================================
    /// A primary or referenced struct type is not present in the dictionary.
    #[error("undefined type in EIP-712 data: {0}")]
    UndefinedType(String),

    /// A type's field list contains an entry that is not a `{type, name}` object.
    #[error("malformed field descriptor in type {0}")]
    MalformedFieldDescriptor(String),

    /// The type string is not a supported Solidity type.
    #[error("unsupported type: {0}")]
    UnsupportedType(String),

    /// Arrays of arrays are not supported.
    #[error("nested array types are not supported: {0}")]
    NestedArray(String),

    // =========================================================================
    // Value Errors
    // =========================================================================
    /// The JSON value kind does not match what the Solidity type requires.
    #[error("expected {expected} for type {solidity_type}")]
    ShapeMismatch {
        /// The Solidity type being encoded.
        solidity_type: String,
        /// A description of the expected JSON kind.
        expected: &'static str,
    },

    /// The integer does not fit in the declared bit width.
    #[error("value {value} out of range for {solidity_type}")]
    OutOfRange {
        /// The Solidity type being encoded.
        solidity_type: String,
        /// The offending value, as supplied.
        value: String,
    },

    /// A JSON number above `Number.MAX_SAFE_INTEGER`.
    #[error("number {0} exceeds the safe integer ceiling")]
    UnsafeInteger(String),

    /// A numeric string that is neither hex nor base-10.
    #[error("not a number: {0:?}")]
    NotANumber(String),

    /// A hex string without `0x` prefix or with non-hex digits.
    #[error("malformed hex string: {0:?}")]
    MalformedHex(String),

    /// An `address` value that does not decode to exactly 20 bytes.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    // =========================================================================
    // Version Errors
    // =========================================================================
    /// Array types are only allowed with [`Version::V4`](crate::Version::V4).
    #[error("array type {0} requires eth_signTypedData_v4")]
    ArrayRequiresV4(String),

    /// The version string or RPC method is not a known typed data version.
    #[error("invalid typed data version: {0}")]
    InvalidVersion(String),

    // =========================================================================
    // Hashing Errors
    // =========================================================================
    /// The domain or primary hash handed to the final digest step is empty.
    #[error("empty {0} hash")]
    EmptyHash(&'static str),

    // =========================================================================
    // Request Errors
    // =========================================================================
    /// The typed data document is structurally invalid.
    #[error("invalid EIP-712 typed data: {0}")]
    InvalidTypedData(String),

    /// The `eth_signTypedData` parameters are malformed.
    #[error("invalid request params: {0}")]
    InvalidRequest(String),

    /// The domain's `chainId` differs from the wallet's active chain.
    #[error("chain id mismatch: domain is {domain}, active chain is {active}")]
    ChainIdMismatch {
        /// The chain id requested by the domain, as `0x` hex.
        domain: String,
        /// The wallet's active chain id.
        active: String,
    },

    // =========================================================================
    // Serialization Errors
    // =========================================================================
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    JsonError(String),
}

impl Error {
    pub(crate) fn shape(solidity_type: &str, expected: &'static str) -> Self {
        Self::ShapeMismatch {
            solidity_type: solidity_type.to_string(),
            expected,
        }
    }

    pub(crate) fn out_of_range(solidity_type: &str, value: impl ToString) -> Self {
        Self::OutOfRange {
            solidity_type: solidity_type.to_string(),
            value: value.to_string(),
        }
    }
}

impl From<FromHexError> for Error {
    fn from(err: FromHexError) -> Self {
        Self::MalformedHex(err.to_string())
    }
}

impl From<SerdeJsonError> for Error {
    fn from(err: SerdeJsonError) -> Self {
        Self::JsonError(err.to_string())
    }
}

/// A specialized [`Result`] type for typed data operations.
pub type Result<T> = CoreResult<T, Error>;

#[cfg(test)]
mod tests {
    use serde_json::{Value, from_str};

    use super::*;

    #[test]
    fn error_display() {
        let err = Error::UndefinedType("Mail".to_string());
        assert_eq!(err.to_string(), "undefined type in EIP-712 data: Mail");

        let err = Error::out_of_range("uint8", 256);
        assert_eq!(err.to_string(), "value 256 out of range for uint8");

        let err = Error::shape("bool", "a boolean");
        assert_eq!(err.to_string(), "expected a boolean for type bool");

        let err = Error::EmptyHash("domain");
        assert_eq!(err.to_string(), "empty domain hash");
    }

    #[test]
    fn error_is_non_exhaustive() {
        let err = Error::NestedArray("uint8[][]".to_string());
        match err {
            Error::NestedArray(_) => {}
            _ => panic!("unexpected variant"),
        }
    }

    #[test]
    fn from_hex_error() {
        let hex_err = FromHexError::InvalidHexCharacter { c: 'g', index: 0 };
        let err: Error = hex_err.into();
        assert!(matches!(err, Error::MalformedHex(_)));
    }

    #[test]
    fn from_json_error() {
        let json_err = from_str::<Value>("not valid json{").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::JsonError(_)));
    }
}
