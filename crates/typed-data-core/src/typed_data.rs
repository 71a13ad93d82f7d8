//! The complete EIP-712 typed data document.
//!
//! dApps hand wallets a single JSON object:
//!
//! ```json
//! {
//!   "types": { "EIP712Domain": [...], "Mail": [...] },
//!   "primaryType": "Mail",
//!   "domain": { "name": "Ether Mail", "chainId": 1 },
//!   "message": { "contents": "Hello, Bob!" }
//! }
//! ```
//!
//! [`TypedData`] parses that document and drives a [`TypedDataEncoder`] over
//! it to produce the domain hash, the primary hash and the final digest.
//!
//! # Example
//!
//! ```
//! use eth_typed_data_core::{TypedData, Version};
//!
//! let typed_data = TypedData::from_json(r#"{
//!     "types": {
//!         "EIP712Domain": [{"name": "name", "type": "string"}],
//!         "Person": [
//!             {"name": "name", "type": "string"},
//!             {"name": "wallet", "type": "address"}
//!         ]
//!     },
//!     "primaryType": "Person",
//!     "domain": {"name": "My DApp"},
//!     "message": {
//!         "name": "Alice",
//!         "wallet": "0x0000000000000000000000000000000000000001"
//!     }
//! }"#).unwrap();
//!
//! let hash = typed_data.signing_hash(Version::V4).unwrap();
//! assert!(!hash.is_zero());
//! ```

use alloy_primitives::B256;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::eip712::{TypeDictionary, TypedDataEncoder, Version};
use crate::error::{Error, Result};

/// Typed structured data for EIP-712 signing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypedData {
    /// The type definitions, including `EIP712Domain`.
    pub types: TypeDictionary,

    /// The primary type being signed.
    pub primary_type: String,

    /// The domain separator values.
    pub domain: Map<String, Value>,

    /// The message data.
    pub message: Map<String, Value>,
}

/// Everything a signing flow needs from one typed data document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypedDataHashes {
    /// `hashStruct(EIP712Domain, domain)`.
    pub domain_hash: B256,
    /// `hashStruct(primaryType, message)`.
    pub primary_hash: B256,
    /// `keccak256(0x1901 || domain_hash || primary_hash)`.
    pub message_to_sign: B256,
    /// The domain fields that went into `domain_hash`.
    pub sanitized_domain: Map<String, Value>,
    /// The message fields that went into `primary_hash`.
    pub sanitized_message: Map<String, Value>,
}

impl TypedData {
    /// Creates a new typed data instance.
    #[must_use]
    pub const fn new(
        types: TypeDictionary,
        primary_type: String,
        domain: Map<String, Value>,
        message: Map<String, Value>,
    ) -> Self {
        Self {
            types,
            primary_type,
            domain,
            message,
        }
    }

    /// Parses typed data from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::JsonError`] if the string is not JSON, or
    /// [`Error::InvalidTypedData`] if the document is missing a member or a
    /// member has the wrong JSON kind.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(&value)
    }

    /// Builds typed data from an already parsed JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTypedData`] naming the offending member.
    pub fn from_value(value: &Value) -> Result<Self> {
        let document = value
            .as_object()
            .ok_or_else(|| Error::InvalidTypedData("expected object".to_string()))?;

        let member = |key: &str| {
            document
                .get(key)
                .ok_or_else(|| Error::InvalidTypedData(format!("missing {key}")))
        };
        let object = |key: &str| {
            member(key)?
                .as_object()
                .cloned()
                .ok_or_else(|| Error::InvalidTypedData(format!("{key} must be an object")))
        };

        let primary_type = member("primaryType")?
            .as_str()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| Error::InvalidTypedData("primaryType must be a string".to_string()))?
            .to_string();

        Ok(Self {
            types: object("types")?,
            primary_type,
            domain: object("domain")?,
            message: object("message")?,
        })
    }

    /// Serializes the typed data to JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::JsonError`] if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Creates an encoder over this document's types.
    #[must_use]
    pub fn encoder(&self, version: Version) -> TypedDataEncoder {
        TypedDataEncoder::new(self.types.clone(), version)
    }

    /// Computes the domain hash, primary hash and message to sign.
    ///
    /// # Arguments
    ///
    /// * `version` - Whether arrays are allowed and how missing fields encode
    ///
    /// # Returns
    ///
    /// The three hashes plus the sanitized domain and message.
    ///
    /// # Errors
    ///
    /// Returns the first encoding error of either struct.
    pub fn hash(&self, version: Version) -> Result<TypedDataHashes> {
        let encoder = self.encoder(version);

        let domain = encoder
            .domain_hash(&self.domain)
            .inspect_err(|err| debug!(%err, %version, "domain hash failed"))?;
        let primary = encoder
            .primary_hash(&self.primary_type, &self.message)
            .inspect_err(|err| {
                debug!(%err, %version, primary_type = %self.primary_type, "primary hash failed");
            })?;
        let message_to_sign =
            TypedDataEncoder::message_to_sign(domain.hash.as_slice(), primary.hash.as_slice())?;

        Ok(TypedDataHashes {
            domain_hash: domain.hash,
            primary_hash: primary.hash,
            message_to_sign,
            sanitized_domain: domain.sanitized,
            sanitized_message: primary.sanitized,
        })
    }

    /// Computes the digest to sign:
    /// `keccak256("\x19\x01" || domainSeparator || hashStruct(message))`.
    ///
    /// # Errors
    ///
    /// Same as [`hash`](Self::hash).
    pub fn signing_hash(&self, version: Version) -> Result<B256> {
        Ok(self.hash(version)?.message_to_sign)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn document() -> Value {
        json!({
            "types": {
                "EIP712Domain": [
                    {"name": "name", "type": "string"},
                    {"name": "version", "type": "string"},
                    {"name": "chainId", "type": "uint256"}
                ],
                "Batch": [
                    {"name": "recipients", "type": "address[]"},
                    {"name": "amounts", "type": "uint256[]"}
                ]
            },
            "primaryType": "Batch",
            "domain": {"name": "Test", "version": "1", "chainId": 1},
            "message": {
                "recipients": [
                    "0x0000000000000000000000000000000000000001",
                    "0x0000000000000000000000000000000000000002"
                ],
                "amounts": ["1000000000000000000", "2000000000000000000"]
            }
        })
    }

    #[test]
    fn typed_data_with_array() {
        let typed_data = TypedData::from_value(&document()).unwrap();
        let hashes = typed_data.hash(Version::V4).unwrap();

        assert!(!hashes.domain_hash.is_zero());
        assert!(!hashes.primary_hash.is_zero());
        assert_eq!(hashes.sanitized_message, typed_data.message);
        assert_eq!(
            hashes.message_to_sign,
            TypedDataEncoder::message_to_sign(
                hashes.domain_hash.as_slice(),
                hashes.primary_hash.as_slice()
            )
            .unwrap()
        );
    }

    #[test]
    fn arrays_fail_under_v3() {
        let typed_data = TypedData::from_value(&document()).unwrap();
        assert!(matches!(
            typed_data.hash(Version::V3),
            Err(Error::ArrayRequiresV4(_))
        ));
    }

    #[test]
    fn typed_data_json_roundtrip() {
        let original = TypedData::from_value(&document()).unwrap();
        let json = original.to_json().unwrap();
        let recovered = TypedData::from_json(&json).unwrap();

        assert_eq!(original, recovered);
        assert_eq!(
            original.signing_hash(Version::V4).unwrap(),
            recovered.signing_hash(Version::V4).unwrap()
        );
    }

    #[test]
    fn missing_members_are_rejected() {
        for key in ["types", "primaryType", "domain", "message"] {
            let mut doc = document();
            doc.as_object_mut().unwrap().remove(key);
            assert!(
                matches!(TypedData::from_value(&doc), Err(Error::InvalidTypedData(_))),
                "missing {key} should be rejected"
            );
        }
    }

    #[test]
    fn wrong_member_kinds_are_rejected() {
        let mut doc = document();
        doc["message"] = json!("not an object");
        assert!(TypedData::from_value(&doc).is_err());

        let mut doc = document();
        doc["primaryType"] = json!("");
        assert!(TypedData::from_value(&doc).is_err());

        assert!(matches!(
            TypedData::from_json("not json"),
            Err(Error::JsonError(_))
        ));
    }

    #[test]
    fn undefined_primary_type() {
        let mut doc = document();
        doc["primaryType"] = json!("NonExistent");
        let typed_data = TypedData::from_value(&doc).unwrap();

        assert!(matches!(
            typed_data.signing_hash(Version::V4),
            Err(Error::UndefinedType(_))
        ));
    }

    #[test]
    fn missing_domain_type() {
        let mut doc = document();
        doc["types"].as_object_mut().unwrap().remove("EIP712Domain");
        let typed_data = TypedData::from_value(&doc).unwrap();

        assert_eq!(
            typed_data.signing_hash(Version::V4),
            Err(Error::UndefinedType("EIP712Domain".to_string()))
        );
    }
}
