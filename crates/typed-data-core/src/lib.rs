//! Ethereum Typed Data Core Library
//!
//! This crate hashes [EIP-712] typed structured data the way a wallet does
//! when a dApp calls `eth_signTypedData_v3` or `eth_signTypedData_v4`.
//!
//! # Overview
//!
//! Signing typed data means computing
//!
//! ```text
//! keccak256(0x19 0x01 || hashStruct(EIP712Domain, domain) || hashStruct(primaryType, message))
//! ```
//!
//! over an untrusted JSON document. This library provides:
//!
//! - **Type Encoding**: `encodeType` strings, dependency discovery and type hashes
//! - **Data Encoding**: per-field ABI words for every Solidity value kind
//! - **Versions**: V3 (no arrays, missing fields skipped) and V4 (arrays,
//!   missing fields zero-filled)
//! - **Requests**: parsing `[address, typedData]` params, chain id checks and
//!   the payload handed to a signer
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │            request (JSON-RPC params, chain id)           │
//! ├──────────────────────────────────────────────────────────┤
//! │              typed_data (document, digests)              │
//! ├──────────────────────────────────────────────────────────┤
//! │       eip712 (TypedDataEncoder: types, data, hashes)     │
//! ├───────────────┬───────────────┬──────────────┬───────────┤
//! │   solidity    │    numeric    │   address    │ hex_string│
//! └───────────────┴───────────────┴──────────────┴───────────┘
//! ```
//!
//! # Quick Start
//!
//! ## Hashing a document
//!
//! ```rust
//! use eth_typed_data_core::{TypedData, Version};
//! use serde_json::json;
//!
//! let typed_data = TypedData::from_value(&json!({
//!     "types": {
//!         "EIP712Domain": [{"name": "name", "type": "string"}],
//!         "Transfer": [
//!             {"name": "to", "type": "address"},
//!             {"name": "amount", "type": "uint256"}
//!         ]
//!     },
//!     "primaryType": "Transfer",
//!     "domain": {"name": "My DApp"},
//!     "message": {
//!         "to": "0x0000000000000000000000000000000000000001",
//!         "amount": "1000000000000000000"
//!     }
//! }))
//! .unwrap();
//!
//! let hashes = typed_data.hash(Version::V4).unwrap();
//! assert!(!hashes.message_to_sign.is_zero());
//! ```
//!
//! ## Encoding types directly
//!
//! ```rust
//! use eth_typed_data_core::{TypedDataEncoder, Version};
//! use serde_json::json;
//!
//! let types = json!({
//!     "Person": [
//!         {"name": "name", "type": "string"},
//!         {"name": "wallet", "type": "address"}
//!     ]
//! });
//! let encoder = TypedDataEncoder::new(types.as_object().unwrap().clone(), Version::V4);
//!
//! assert_eq!(encoder.encode_types("Person"), "Person(string name,address wallet)");
//! ```
//!
//! # Error Handling
//!
//! Every encoding step returns [`Result`]. Any failure anywhere in a struct
//! (an undefined type, a value of the wrong shape, an integer out of range)
//! fails the whole hash; there is no partial output.
//!
//! [EIP-712]: https://eips.ethereum.org/EIPS/eip-712

// Modules
pub mod address;
pub mod eip712;
pub mod error;
pub mod hex_string;
pub mod numeric;
pub mod request;
pub mod solidity;
pub mod typed_data;

// Re-exports for convenience
pub use address::Address;
pub use eip712::{EncodedStruct, StructHash, TypeDictionary, TypedDataEncoder, Version};
pub use error::{Error, Result};
pub use request::{SignTypedData, SignTypedDataRequest, is_typed_data_structure, parse_request};
pub use typed_data::{TypedData, TypedDataHashes};

// Re-export commonly used alloy types
pub use alloy_primitives::{B256, I256, U256};
