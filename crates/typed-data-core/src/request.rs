//! `eth_signTypedData_v3` / `eth_signTypedData_v4` request handling.
//!
//! A dApp asks the wallet to sign typed data with a JSON-RPC call whose
//! `params` are `[address, typedData]`. `typedData` is normally the JSON
//! document serialized to a string; an inline object is accepted too.
//!
//! Parsing a request hashes both structs up front, so a request that parses
//! is always signable. The sanitized domain and message are kept for the
//! approval UI.
//!
//! # Example
//!
//! ```
//! use eth_typed_data_core::request::parse_request;
//!
//! let body = r#"{
//!     "method": "eth_signTypedData_v4",
//!     "params": [
//!         "0x0000000000000000000000000000000000000001",
//!         "{\"types\":{\"EIP712Domain\":[{\"name\":\"chainId\",\"type\":\"uint256\"}],\"Ping\":[{\"name\":\"n\",\"type\":\"uint8\"}]},\"primaryType\":\"Ping\",\"domain\":{\"chainId\":1},\"message\":{\"n\":1}}"
//!     ]
//! }"#;
//!
//! let request = parse_request(body).unwrap();
//! assert_eq!(request.chain_id_hex().unwrap().as_deref(), Some("0x1"));
//! let sign_data = request.sign_data("0x1").unwrap();
//! assert!(!sign_data.message_to_sign.is_zero());
//! ```

use alloy_primitives::{B256, U256};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::address::Address;
use crate::eip712::{TypedDataEncoder, Version};
use crate::error::{Error, Result};
use crate::numeric::parse_uint;
use crate::typed_data::TypedData;

/// A parsed and hashed typed data signing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignTypedDataRequest {
    /// The account asked to sign.
    pub address: Address,
    /// The typed data flavor the request was parsed with.
    pub version: Version,
    /// The primary type name.
    pub primary_type: String,
    /// The sanitized message, pretty-printed JSON.
    pub message: String,
    /// The sanitized domain.
    pub domain: Map<String, Value>,
    /// `hashStruct(EIP712Domain, domain)`.
    pub domain_hash: B256,
    /// `hashStruct(primaryType, message)`.
    pub primary_hash: B256,
}

/// The payload handed to the signer and shown on the approval screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignTypedData {
    /// The sanitized message, pretty-printed JSON.
    pub message: String,
    /// The sanitized domain, serialized JSON.
    pub domain: String,
    /// Uppercase hex of the domain hash, no prefix.
    pub domain_hash: String,
    /// Uppercase hex of the primary hash, no prefix.
    pub primary_hash: String,
    /// The 32-byte digest to sign.
    pub message_to_sign: B256,
}

impl SignTypedDataRequest {
    /// Parses a `params` array of `[address, typedData]`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRequest`] if `params` is not a two-element
    /// array of the right kinds, or the first error from hashing the domain
    /// or the message.
    pub fn parse(params: &Value, version: Version) -> Result<Self> {
        let params = params
            .as_array()
            .filter(|list| list.len() == 2)
            .ok_or_else(|| Error::InvalidRequest("expected [address, typedData]".to_string()))?;

        let address = params[0]
            .as_str()
            .ok_or_else(|| Error::InvalidRequest("address must be a string".to_string()))
            .and_then(Address::from_hex)?;

        let typed_data = match &params[1] {
            Value::String(json) => TypedData::from_json(json)?,
            document @ Value::Object(_) => TypedData::from_value(document)?,
            _ => {
                return Err(Error::InvalidRequest(
                    "typed data must be a JSON string or object".to_string(),
                ));
            }
        };

        let hashes = typed_data.hash(version)?;
        let message = serde_json::to_string_pretty(&hashes.sanitized_message)?;

        Ok(Self {
            address,
            version,
            primary_type: typed_data.primary_type,
            message,
            domain: hashes.sanitized_domain,
            domain_hash: hashes.domain_hash,
            primary_hash: hashes.primary_hash,
        })
    }

    /// Parses a `params` array serialized as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::JsonError`] if `params_json` is not JSON, otherwise
    /// as [`parse`](Self::parse).
    pub fn parse_json(params_json: &str, version: Version) -> Result<Self> {
        let params: Value = serde_json::from_str(params_json)?;
        Self::parse(&params, version)
    }

    /// The domain's `chainId` as lowercase `0x` hex.
    ///
    /// Numbers and numeric strings (decimal or `0x` hex) are accepted.
    ///
    /// # Returns
    ///
    /// `Ok(None)` if the sanitized domain has no `chainId`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRequest`] if `chainId` is present but is not a
    /// non-negative integer.
    pub fn chain_id_hex(&self) -> Result<Option<String>> {
        let Some(chain_id) = self.domain.get("chainId") else {
            return Ok(None);
        };
        let id: U256 = parse_uint("uint256", 256, chain_id).map_err(|err| {
            debug!(%chain_id, %err, "unusable typed data chain id");
            Error::InvalidRequest(format!("invalid chainId {chain_id}: {err}"))
        })?;
        Ok(Some(format!("{id:#x}")))
    }

    /// Checks the domain's chain against the wallet's active chain.
    ///
    /// A domain without `chainId` is accepted.
    ///
    /// # Arguments
    ///
    /// * `active_chain_id` - The wallet's current chain as `0x` hex
    ///
    /// # Errors
    ///
    /// Returns [`Error::ChainIdMismatch`] if the ids differ (compared
    /// case-insensitively as hex strings), or [`Error::InvalidRequest`] if
    /// the domain's `chainId` is not a usable number.
    pub fn check_chain_id(&self, active_chain_id: &str) -> Result<()> {
        match self.chain_id_hex()? {
            Some(domain) if !domain.eq_ignore_ascii_case(active_chain_id) => {
                debug!(%domain, active_chain_id, "typed data chain id mismatch");
                Err(Error::ChainIdMismatch {
                    domain,
                    active: active_chain_id.to_string(),
                })
            }
            _ => Ok(()),
        }
    }

    /// `keccak256(0x1901 || domain_hash || primary_hash)`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyHash`] if either hash is empty.
    pub fn message_to_sign(&self) -> Result<B256> {
        TypedDataEncoder::message_to_sign(self.domain_hash.as_slice(), self.primary_hash.as_slice())
    }

    /// Validates the request against the active chain and builds the
    /// payload to sign.
    ///
    /// # Arguments
    ///
    /// * `active_chain_id` - The wallet's current chain as `0x` hex
    ///
    /// # Returns
    ///
    /// The [`SignTypedData`] payload for the signer and the approval UI.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`check_chain_id`](Self::check_chain_id) or a
    /// JSON error from serializing the domain.
    pub fn sign_data(&self, active_chain_id: &str) -> Result<SignTypedData> {
        self.check_chain_id(active_chain_id)?;

        Ok(SignTypedData {
            message: self.message.clone(),
            domain: serde_json::to_string(&self.domain)?,
            domain_hash: hex::encode_upper(self.domain_hash),
            primary_hash: hex::encode_upper(self.primary_hash),
            message_to_sign: self.message_to_sign()?,
        })
    }
}

/// Parses a full JSON-RPC request body (`{"method": ..., "params": [...]}`),
/// taking the version from the method name.
///
/// # Errors
///
/// Returns [`Error::InvalidVersion`] for methods other than
/// `eth_signTypedData_v3`/`_v4`, otherwise as [`SignTypedDataRequest::parse`].
pub fn parse_request(body: &str) -> Result<SignTypedDataRequest> {
    let body: Value = serde_json::from_str(body)?;
    let method = body
        .get("method")
        .and_then(Value::as_str)
        .ok_or_else(|| Error::InvalidRequest("missing method".to_string()))?;
    let version = Version::from_method(method)?;
    let params = body
        .get("params")
        .ok_or_else(|| Error::InvalidRequest("missing params".to_string()))?;

    SignTypedDataRequest::parse(params, version)
}

/// Returns `true` if `json` holds a signable typed data request under
/// either version, trying V4 first.
///
/// Used to route a plain `eth_sign`/`personal_sign` call that carries typed
/// data to the typed data flow.
///
/// # Arguments
///
/// * `json` - Either a full JSON-RPC request body, whose `params` member is
///   checked, or a bare `params` array
#[must_use]
pub fn is_typed_data_structure(json: &str) -> bool {
    let Ok(value) = serde_json::from_str::<Value>(json) else {
        return false;
    };
    let params = match &value {
        Value::Object(body) => match body.get("params") {
            Some(params) => params,
            None => return false,
        },
        other => other,
    };

    SignTypedDataRequest::parse(params, Version::V4).is_ok()
        || SignTypedDataRequest::parse(params, Version::V3).is_ok()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    const SIGNER: &str = "0xCD2a3d9F938E13CD947Ec05AbC7FE734Df8DD826";

    fn typed_data(chain_id: &Value) -> Value {
        json!({
            "types": {
                "EIP712Domain": [
                    {"name": "name", "type": "string"},
                    {"name": "chainId", "type": "uint256"}
                ],
                "Order": [
                    {"name": "amount", "type": "uint256"},
                    {"name": "note", "type": "string"}
                ]
            },
            "primaryType": "Order",
            "domain": {"name": "Exchange", "chainId": chain_id, "salt": "dropped"},
            "message": {"amount": "100", "note": "buy"}
        })
    }

    fn params(chain_id: &Value) -> Value {
        json!([SIGNER, typed_data(chain_id).to_string()])
    }

    #[test]
    fn parse_string_params() {
        let request = SignTypedDataRequest::parse(&params(&json!(1)), Version::V4).unwrap();

        assert_eq!(request.address, Address::from_hex(SIGNER).unwrap());
        assert_eq!(request.primary_type, "Order");
        assert_eq!(request.version, Version::V4);
        assert!(!request.domain.contains_key("salt"));
        assert_eq!(
            serde_json::from_str::<Value>(&request.message).unwrap(),
            json!({"amount": "100", "note": "buy"})
        );
    }

    #[test]
    fn parse_inline_object_params() {
        let inline = json!([SIGNER, typed_data(&json!(1))]);
        let from_inline = SignTypedDataRequest::parse(&inline, Version::V4).unwrap();
        let from_string = SignTypedDataRequest::parse(&params(&json!(1)), Version::V4).unwrap();
        assert_eq!(from_inline, from_string);
    }

    #[test]
    fn parse_rejects_bad_shapes() {
        for bad in [
            json!([]),
            json!([SIGNER]),
            json!([SIGNER, typed_data(&json!(1)).to_string(), "extra"]),
            json!([1, typed_data(&json!(1)).to_string()]),
            json!(["not an address", typed_data(&json!(1)).to_string()]),
            json!([SIGNER, 42]),
            json!([SIGNER, "{not json"]),
            json!({"address": SIGNER}),
        ] {
            assert!(
                SignTypedDataRequest::parse(&bad, Version::V4).is_err(),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn chain_id_formats() {
        let request = SignTypedDataRequest::parse(&params(&json!(137)), Version::V4).unwrap();
        assert_eq!(request.chain_id_hex().unwrap().as_deref(), Some("0x89"));

        let request = SignTypedDataRequest::parse(&params(&json!("0x89")), Version::V4).unwrap();
        assert_eq!(request.chain_id_hex().unwrap().as_deref(), Some("0x89"));
    }

    #[test]
    fn chain_id_check() {
        let request = SignTypedDataRequest::parse(&params(&json!(1)), Version::V4).unwrap();
        assert!(request.check_chain_id("0x1").is_ok());
        assert_eq!(
            request.check_chain_id("0x89"),
            Err(Error::ChainIdMismatch {
                domain: "0x1".to_string(),
                active: "0x89".to_string(),
            })
        );

        let request = SignTypedDataRequest::parse(&params(&json!(10)), Version::V4).unwrap();
        assert!(request.check_chain_id("0XA").is_ok());
    }

    #[test]
    fn domain_without_chain_id_passes() {
        let mut doc = typed_data(&json!(1));
        doc["domain"].as_object_mut().unwrap().remove("chainId");
        let request =
            SignTypedDataRequest::parse(&json!([SIGNER, doc.to_string()]), Version::V4).unwrap();

        assert_eq!(request.chain_id_hex(), Ok(None));
        assert!(request.check_chain_id("0x1").is_ok());
    }

    fn with_chain_id_type(chain_id_type: &str, chain_id: &Value) -> SignTypedDataRequest {
        let mut doc = typed_data(chain_id);
        doc["types"]["EIP712Domain"][1]["type"] = json!(chain_id_type);
        SignTypedDataRequest::parse(&json!([SIGNER, doc.to_string()]), Version::V4).unwrap()
    }

    #[test]
    fn unusable_chain_id_is_rejected() {
        for request in [
            with_chain_id_type("int256", &json!(-1)),
            with_chain_id_type("string", &json!("abc")),
            with_chain_id_type("bool", &json!(true)),
        ] {
            assert!(request.domain.contains_key("chainId"));
            assert!(matches!(
                request.chain_id_hex(),
                Err(Error::InvalidRequest(_))
            ));
            assert!(matches!(
                request.check_chain_id("0x1"),
                Err(Error::InvalidRequest(_))
            ));
            assert!(request.sign_data("0x1").is_err());
        }
    }

    #[test]
    fn string_typed_chain_id_is_still_checked() {
        let request = with_chain_id_type("string", &json!("137"));
        assert_eq!(request.chain_id_hex().unwrap().as_deref(), Some("0x89"));
        assert!(matches!(
            request.sign_data("0x1"),
            Err(Error::ChainIdMismatch { .. })
        ));
        assert!(request.sign_data("0x89").is_ok());
    }

    #[test]
    fn sign_data_payload() {
        let request = SignTypedDataRequest::parse(&params(&json!(1)), Version::V4).unwrap();
        let sign_data = request.sign_data("0x1").unwrap();

        assert_eq!(sign_data.domain_hash, hex::encode_upper(request.domain_hash));
        assert_eq!(sign_data.primary_hash, hex::encode_upper(request.primary_hash));
        assert_eq!(sign_data.message_to_sign, request.message_to_sign().unwrap());
        assert_eq!(
            serde_json::from_str::<Value>(&sign_data.domain).unwrap(),
            json!({"name": "Exchange", "chainId": 1})
        );

        assert!(matches!(
            request.sign_data("0x5"),
            Err(Error::ChainIdMismatch { .. })
        ));
    }

    #[test]
    fn parse_request_picks_version_from_method() {
        let body = json!({"method": "eth_signTypedData_v3", "params": params(&json!(1))});
        let request = parse_request(&body.to_string()).unwrap();
        assert_eq!(request.version, Version::V3);

        let body = json!({"method": "eth_sendTransaction", "params": params(&json!(1))});
        assert!(matches!(
            parse_request(&body.to_string()),
            Err(Error::InvalidVersion(_))
        ));

        let body = json!({"method": "eth_signTypedData_v4"});
        assert!(matches!(
            parse_request(&body.to_string()),
            Err(Error::InvalidRequest(_))
        ));
    }

    #[test]
    fn typed_data_structure_detection() {
        assert!(is_typed_data_structure(&params(&json!(1)).to_string()));

        let mut doc = typed_data(&json!(1));
        doc["types"]["Order"] = json!([{"name": "amounts", "type": "uint256[]"}]);
        doc["message"] = json!({"amounts": [1, 2]});
        let v4_only = json!([SIGNER, doc.to_string()]).to_string();
        assert!(is_typed_data_structure(&v4_only));
        assert!(SignTypedDataRequest::parse_json(&v4_only, Version::V3).is_err());

        let body = json!({"method": "eth_sign", "params": params(&json!(1))}).to_string();
        assert!(is_typed_data_structure(&body));
        assert!(!is_typed_data_structure(r#"{"method": "eth_sign"}"#));
        assert!(!is_typed_data_structure(
            &json!({"method": "eth_sign", "params": [SIGNER, "0xdeadbeef"]}).to_string()
        ));

        assert!(!is_typed_data_structure(r#"["0x01", "hello"]"#));
        assert!(!is_typed_data_structure("not json"));
    }
}
