//! EIP-712 typed structured data encoding.
//!
//! This module implements [EIP-712] hashing over a JSON type dictionary, the
//! way wallets receive it through `eth_signTypedData_v3` and
//! `eth_signTypedData_v4`.
//!
//! # Hash Computation
//!
//! ```text
//! encodeType(T)   = "T(type1 name1,...)" || sorted dependency signatures
//! typeHash(T)     = keccak256(encodeType(T))
//! encodeData(T,s) = typeHash(T) || enc(field1) || enc(field2) || ...
//! hashStruct(T,s) = keccak256(encodeData(T, s))
//! message         = keccak256("\x19\x01" || hashStruct(EIP712Domain, domain) || hashStruct(T, message))
//! ```
//!
//! Every field encoding is one 32-byte word. Dynamic values (`string`,
//! `bytes`, arrays and nested structs) contribute their Keccak-256 hash.
//!
//! # Versions
//!
//! [`Version::V4`] allows array types and encodes a field missing from the
//! value as 32 zero bytes. [`Version::V3`] rejects arrays and silently skips
//! missing fields, so the encoding gets shorter.
//!
//! # Example
//!
//! ```
//! use eth_typed_data_core::{TypedDataEncoder, Version};
//! use serde_json::json;
//!
//! let types = json!({
//!     "EIP712Domain": [{"name": "name", "type": "string"}],
//!     "Mail": [{"name": "contents", "type": "string"}]
//! });
//! let encoder = TypedDataEncoder::new(types.as_object().unwrap().clone(), Version::V4);
//!
//! let domain = json!({"name": "Test"});
//! let message = json!({"contents": "hello"});
//!
//! let domain_hash = encoder.domain_hash(domain.as_object().unwrap()).unwrap();
//! let primary_hash = encoder.primary_hash("Mail", message.as_object().unwrap()).unwrap();
//! let digest = TypedDataEncoder::message_to_sign(
//!     domain_hash.hash.as_slice(),
//!     primary_hash.hash.as_slice(),
//! )
//! .unwrap();
//! assert!(!digest.is_zero());
//! ```
//!
//! [EIP-712]: https://eips.ethereum.org/EIPS/eip-712

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use alloy_primitives::{B256, keccak256};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::address::Address;
use crate::error::{Error, Result};
use crate::hex_string::decode_hex_or_empty;
use crate::numeric::{parse_int, parse_uint};
use crate::solidity::{SolidityType, base_type_name};

/// Type name of the domain separator struct.
pub const DOMAIN_TYPE_NAME: &str = "EIP712Domain";

/// The EIP-191 version byte prefix of a typed data message.
pub const TYPED_DATA_PREFIX: [u8; 2] = [0x19, 0x01];

/// The EIP-712 `types` object: type name to an ordered list of
/// `{"name": ..., "type": ...}` descriptors.
///
/// Kept as raw JSON so that malformed descriptors surface as encoding
/// errors instead of being dropped at parse time.
pub type TypeDictionary = Map<String, Value>;

/// The typed data flavor requested by the dApp.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Version {
    /// `eth_signTypedData_v3`: no arrays, missing fields are skipped.
    V3,
    /// `eth_signTypedData_v4`: arrays allowed, missing fields are zero words.
    #[default]
    V4,
}

impl Version {
    /// Picks the version from a JSON-RPC method name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidVersion`] for any other method.
    ///
    /// # Example
    ///
    /// ```
    /// use eth_typed_data_core::Version;
    ///
    /// assert_eq!(Version::from_method("eth_signTypedData_v3").unwrap(), Version::V3);
    /// assert!(Version::from_method("eth_sign").is_err());
    /// ```
    pub fn from_method(method: &str) -> Result<Self> {
        match method {
            "eth_signTypedData_v3" => Ok(Self::V3),
            "eth_signTypedData_v4" => Ok(Self::V4),
            other => Err(Error::InvalidVersion(other.to_string())),
        }
    }

    /// The JSON-RPC method name for this version.
    #[must_use]
    pub const fn method(self) -> &'static str {
        match self {
            Self::V3 => "eth_signTypedData_v3",
            Self::V4 => "eth_signTypedData_v4",
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::V3 => f.write_str("v3"),
            Self::V4 => f.write_str("v4"),
        }
    }
}

impl FromStr for Version {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "v3" | "3" => Ok(Self::V3),
            "v4" | "4" => Ok(Self::V4),
            _ => Err(Error::InvalidVersion(s.to_string())),
        }
    }
}

/// The output of [`TypedDataEncoder::encode_data`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedStruct {
    /// `typeHash || enc(field1) || ...`
    pub bytes: Vec<u8>,
    /// The fields that were present in the value, cloned verbatim.
    pub sanitized: Map<String, Value>,
}

/// The output of [`TypedDataEncoder::hash_struct`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructHash {
    /// `keccak256(encodeData(T, s))`
    pub hash: B256,
    /// The fields that were present in the value, cloned verbatim. This is
    /// what an approval UI shows the user.
    pub sanitized: Map<String, Value>,
}

/// Encodes and hashes typed data against one type dictionary.
///
/// The encoder holds only the dictionary and the [`Version`]; every call is
/// a pure computation over its inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypedDataEncoder {
    types: TypeDictionary,
    version: Version,
}

impl TypedDataEncoder {
    /// Creates an encoder for `types` under `version`.
    #[must_use]
    pub const fn new(types: TypeDictionary, version: Version) -> Self {
        Self { types, version }
    }

    /// Replaces the type dictionary.
    pub fn set_types(&mut self, types: TypeDictionary) {
        self.types = types;
    }

    /// Replaces the version.
    pub const fn set_version(&mut self, version: Version) {
        self.version = version;
    }

    /// The current type dictionary.
    #[must_use]
    pub const fn types(&self) -> &TypeDictionary {
        &self.types
    }

    /// The current version.
    #[must_use]
    pub const fn version(&self) -> Version {
        self.version
    }

    /// Collects `anchor` and every struct type reachable from it.
    ///
    /// The result is keyed by type name in lexicographic order, which fixes
    /// the order of dependency signatures in [`encode_types`](Self::encode_types).
    /// Each type is visited once, so self-referencing types terminate. Names
    /// that are not in the dictionary (including atomic types) are ignored.
    /// Walking a type's fields stops at the first descriptor that is not an
    /// object; [`encode_type`](Self::encode_type) rejects that type later.
    #[must_use]
    pub fn find_all_dependency_types(&self, anchor: &str) -> BTreeMap<&str, &Value> {
        let mut known = BTreeMap::new();
        self.collect_dependencies(&mut known, anchor);
        known
    }

    fn collect_dependencies<'a>(&'a self, known: &mut BTreeMap<&'a str, &'a Value>, anchor: &str) {
        let Some((name, fields)) = self.types.get_key_value(anchor) else {
            return;
        };
        let Some(list) = fields.as_array() else {
            return;
        };
        known.insert(name.as_str(), fields);

        for field in list {
            let Some(descriptor) = field.as_object() else {
                return;
            };
            if let Some(field_type) = descriptor.get("type").and_then(Value::as_str) {
                let lookup = base_type_name(field_type);
                if !known.contains_key(lookup) {
                    self.collect_dependencies(known, lookup);
                }
            }
        }
    }

    /// Formats one type signature: `Name(type1 name1,type2 name2)`.
    ///
    /// Returns an empty string if `fields` is not a list or any entry lacks a
    /// string `type` or `name`.
    ///
    /// # Example
    ///
    /// ```
    /// use eth_typed_data_core::TypedDataEncoder;
    /// use serde_json::json;
    ///
    /// let fields = json!([
    ///     {"type": "string", "name": "a"},
    ///     {"type": "uint256", "name": "b"}
    /// ]);
    /// assert_eq!(TypedDataEncoder::encode_type(&fields, "Mail"), "Mail(string a,uint256 b)");
    /// ```
    #[must_use]
    pub fn encode_type(fields: &Value, type_name: &str) -> String {
        let Some(list) = fields.as_array() else {
            return String::new();
        };

        let mut members = Vec::with_capacity(list.len());
        for field in list {
            let Some((field_type, name)) = field_descriptor(field) else {
                return String::new();
            };
            members.push(format!("{field_type} {name}"));
        }
        format!("{type_name}({})", members.join(","))
    }

    /// Encodes the primary type followed by all of its dependencies.
    ///
    /// The primary type always comes first and is never repeated.
    #[must_use]
    pub fn encode_types(&self, primary_type: &str) -> String {
        let dependencies = self.find_all_dependency_types(primary_type);

        let mut result = String::new();
        if let Some(fields) = dependencies.get(primary_type) {
            result.push_str(&Self::encode_type(fields, primary_type));
        }
        for (name, fields) in &dependencies {
            if *name == primary_type {
                continue;
            }
            result.push_str(&Self::encode_type(fields, name));
        }
        result
    }

    /// `keccak256(encodeTypes(primary_type))`.
    #[must_use]
    pub fn type_hash(&self, primary_type: &str) -> B256 {
        keccak256(self.encode_types(primary_type).as_bytes())
    }

    /// Encodes `data` as an instance of `primary_type`.
    ///
    /// Fields are encoded in declaration order. A field absent from `data`
    /// is encoded as 32 zero bytes under [`Version::V4`] and contributes
    /// nothing under [`Version::V3`].
    ///
    /// # Returns
    ///
    /// `typeHash || enc(field1) || ...` and the fields that were present.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UndefinedType`] if `primary_type` is not a list in the
    /// dictionary, [`Error::MalformedFieldDescriptor`] for a bad descriptor,
    /// or the first error from [`encode_field`](Self::encode_field).
    pub fn encode_data(&self, primary_type: &str, data: &Map<String, Value>) -> Result<EncodedStruct> {
        let fields = self
            .types
            .get(primary_type)
            .and_then(Value::as_array)
            .ok_or_else(|| Error::UndefinedType(primary_type.to_string()))?;

        let mut bytes = Vec::with_capacity(32 * (fields.len() + 1));
        bytes.extend_from_slice(self.type_hash(primary_type).as_slice());
        let mut sanitized = Map::new();

        for field in fields {
            let (field_type, name) = field_descriptor(field)
                .ok_or_else(|| Error::MalformedFieldDescriptor(primary_type.to_string()))?;

            match data.get(name) {
                Some(value) => {
                    let encoded = self.encode_field(field_type, value).inspect_err(|err| {
                        debug!(primary_type, field = name, field_type, %err, "failed to encode field");
                    })?;
                    bytes.extend_from_slice(&encoded);
                    sanitized.insert(name.to_string(), value.clone());
                }
                None if self.version == Version::V4 => bytes.extend_from_slice(&[0u8; 32]),
                None => trace!(primary_type, field = name, "skipping missing field"),
            }
        }

        Ok(EncodedStruct { bytes, sanitized })
    }

    /// Encodes one field value as a 32-byte word.
    ///
    /// # Arguments
    ///
    /// * `field_type` - The declared type string, e.g. `"uint256"` or `"Person[]"`
    /// * `value` - The JSON value supplied for the field
    ///
    /// # Errors
    ///
    /// Fails if the type string is unsupported, the value has the wrong JSON
    /// kind or range, a hex string is malformed, an array is used outside
    /// [`Version::V4`], or a nested struct fails to encode.
    pub fn encode_field(&self, field_type: &str, value: &Value) -> Result<Vec<u8>> {
        let encoded = match SolidityType::parse(field_type)? {
            SolidityType::Array { element } => {
                if self.version != Version::V4 {
                    return Err(Error::ArrayRequiresV4(field_type.to_string()));
                }
                let items = value
                    .as_array()
                    .ok_or_else(|| Error::shape(field_type, "an array"))?;

                let mut concatenated = Vec::with_capacity(32 * items.len());
                for item in items {
                    concatenated.extend_from_slice(&self.encode_field(element, item)?);
                }
                keccak256(&concatenated).to_vec()
            }
            SolidityType::String => {
                let s = value
                    .as_str()
                    .ok_or_else(|| Error::shape(field_type, "a string"))?;
                keccak256(s.as_bytes()).to_vec()
            }
            SolidityType::Bytes => {
                let s = value
                    .as_str()
                    .ok_or_else(|| Error::shape(field_type, "a hex string"))?;
                keccak256(decode_hex_or_empty(s)?).to_vec()
            }
            SolidityType::Bool => {
                let b = value
                    .as_bool()
                    .ok_or_else(|| Error::shape(field_type, "a boolean"))?;
                let mut word = [0u8; 32];
                word[31] = u8::from(b);
                word.to_vec()
            }
            SolidityType::Address => {
                let s = value
                    .as_str()
                    .ok_or_else(|| Error::shape(field_type, "an address string"))?;
                Address::from_hex(s)?.to_word().to_vec()
            }
            SolidityType::FixedBytes(_) => {
                let s = value
                    .as_str()
                    .ok_or_else(|| Error::shape(field_type, "a hex string"))?;
                let bytes = decode_hex_or_empty(s)?;
                // Only the word size is enforced, not N.
                if bytes.len() > 32 {
                    return Err(Error::out_of_range(field_type, s));
                }
                let mut word = [0u8; 32];
                word[..bytes.len()].copy_from_slice(&bytes);
                word.to_vec()
            }
            SolidityType::Uint(bits) => parse_uint(field_type, bits, value)?
                .to_be_bytes::<32>()
                .to_vec(),
            SolidityType::Int(bits) => parse_int(field_type, bits, value)?
                .into_raw()
                .to_be_bytes::<32>()
                .to_vec(),
            SolidityType::Struct(name) => {
                let fields = value
                    .as_object()
                    .ok_or_else(|| Error::shape(field_type, "an object"))?;
                keccak256(self.encode_data(name, fields)?.bytes).to_vec()
            }
        };
        Ok(encoded)
    }

    /// `keccak256(encodeData(primary_type, data))`, with the sanitized echo.
    ///
    /// # Errors
    ///
    /// Returns the first error from [`encode_data`](Self::encode_data).
    pub fn hash_struct(&self, primary_type: &str, data: &Map<String, Value>) -> Result<StructHash> {
        let EncodedStruct { bytes, sanitized } = self.encode_data(primary_type, data)?;
        let hash = keccak256(&bytes);
        trace!(primary_type, %hash, "hashed struct");
        Ok(StructHash { hash, sanitized })
    }

    /// Hashes the domain separator as an [`DOMAIN_TYPE_NAME`] struct.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UndefinedType`] if the dictionary has no
    /// `EIP712Domain` entry, or any domain field encoding error.
    pub fn domain_hash(&self, domain: &Map<String, Value>) -> Result<StructHash> {
        self.hash_struct(DOMAIN_TYPE_NAME, domain)
    }

    /// Hashes the message as an instance of `primary_type`.
    ///
    /// # Errors
    ///
    /// Same as [`hash_struct`](Self::hash_struct).
    pub fn primary_hash(&self, primary_type: &str, message: &Map<String, Value>) -> Result<StructHash> {
        self.hash_struct(primary_type, message)
    }

    /// Computes `keccak256(0x19 || 0x01 || domain_hash || primary_hash)`.
    ///
    /// # Arguments
    ///
    /// * `domain_hash` - The domain separator hash
    /// * `primary_hash` - The message struct hash
    ///
    /// # Returns
    ///
    /// The 32-byte digest a wallet signs.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyHash`] if either input is empty.
    pub fn message_to_sign(domain_hash: &[u8], primary_hash: &[u8]) -> Result<B256> {
        if domain_hash.is_empty() {
            return Err(Error::EmptyHash("domain"));
        }
        if primary_hash.is_empty() {
            return Err(Error::EmptyHash("primary"));
        }

        let mut data =
            Vec::with_capacity(TYPED_DATA_PREFIX.len() + domain_hash.len() + primary_hash.len());
        data.extend_from_slice(&TYPED_DATA_PREFIX);
        data.extend_from_slice(domain_hash);
        data.extend_from_slice(primary_hash);

        Ok(keccak256(&data))
    }
}

/// Reads a `{"type": ..., "name": ...}` descriptor.
fn field_descriptor(field: &Value) -> Option<(&str, &str)> {
    let descriptor = field.as_object()?;
    let field_type = descriptor.get("type")?.as_str()?;
    let name = descriptor.get("name")?.as_str()?;
    Some((field_type, name))
}
