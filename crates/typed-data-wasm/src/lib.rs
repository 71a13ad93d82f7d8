//! Ethereum Typed Data WASM Library
//!
//! This crate provides WebAssembly bindings for the EIP-712 typed data
//! encoder, so a browser wallet or dApp can compute exactly the digest a
//! signer will be asked to sign.
//!
//! # Quick Start
//!
//! ```javascript
//! import init, { hashTypedData, isTypedDataStructure } from 'eth-typed-data-wasm';
//!
//! // Initialize WASM module
//! await init();
//!
//! const result = JSON.parse(hashTypedData(JSON.stringify(typedData), "v4"));
//! console.log("Digest:", result.messageToSign);
//!
//! // Route a personal_sign payload that is really typed data
//! if (isTypedDataStructure(JSON.stringify([address, JSON.stringify(typedData)]))) {
//!     // ...
//! }
//!
//! // Build the payload for an eth_signTypedData_v4 request body
//! const payload = JSON.parse(signTypedDataPayload(requestBody, "0x1"));
//! ```
//!
//! # API Reference
//!
//! - [`hashTypedData(json, version)`](hash_typed_data) - Domain hash, primary hash and digest
//! - [`encodeType(json, typeName)`](encode_type) - The `encodeType` string and type hash
//! - [`isTypedDataStructure(paramsJson)`](is_typed_data_structure) - Whether params hold signable typed data
//! - [`signTypedDataPayload(body, chainId)`](sign_typed_data_payload) - Parse a request and check its chain
//! - [`getVersion()`](get_version) - The library version
//!
//! Failures are thrown as JavaScript `Error` objects.

pub mod error;

pub use error::{WasmError, WasmResult};

use eth_typed_data_core::{B256, TypedData, Version, parse_request};
use serde::Serialize;
use serde_json::{Map, Value};
use wasm_bindgen::prelude::*;

/// Hashes returned by [`hash_typed_data`], serialized as JSON.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HashOutput {
    version: Version,
    primary_type: String,
    domain_hash: String,
    primary_hash: String,
    message_to_sign: String,
    domain: Map<String, Value>,
    message: Map<String, Value>,
}

/// Output of [`encode_type`], serialized as JSON.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EncodeTypeOutput {
    encoded_type: String,
    type_hash: String,
}

fn hex_hash(hash: B256) -> String {
    format!("0x{}", hex::encode(hash))
}

fn parse_version(version: &str) -> WasmResult<Version> {
    if version.is_empty() {
        return Ok(Version::default());
    }
    version
        .parse()
        .map_err(|_| WasmError::InvalidVersion(version.to_string()))
}

/// Initializes the WASM module.
///
/// This function is automatically called when the module is loaded,
/// but can be called explicitly if needed.
#[wasm_bindgen(start)]
#[expect(clippy::missing_const_for_fn, reason = "not a stable API function")]
pub fn init() {
    // Nothing to initialize for now
}

/// Hashes a typed data document.
///
/// # Arguments
///
/// * `typed_data_json` - The `{types, primaryType, domain, message}` document
/// * `version` - `"v3"` or `"v4"` (empty defaults to `"v4"`)
///
/// # Returns
///
/// A JSON string with `domainHash`, `primaryHash`, `messageToSign` (all
/// `0x` hex) and the sanitized `domain` and `message`.
#[wasm_bindgen(js_name = "hashTypedData")]
pub fn hash_typed_data(typed_data_json: &str, version: &str) -> Result<String, JsValue> {
    hash_typed_data_internal(typed_data_json, version).map_err(JsValue::from)
}

fn hash_typed_data_internal(typed_data_json: &str, version: &str) -> WasmResult<String> {
    let version = parse_version(version)?;
    let typed_data = TypedData::from_json(typed_data_json)?;
    let hashes = typed_data.hash(version)?;

    let output = HashOutput {
        version,
        primary_type: typed_data.primary_type,
        domain_hash: hex_hash(hashes.domain_hash),
        primary_hash: hex_hash(hashes.primary_hash),
        message_to_sign: hex_hash(hashes.message_to_sign),
        domain: hashes.sanitized_domain,
        message: hashes.sanitized_message,
    };
    Ok(serde_json::to_string(&output)?)
}

/// Returns the `encodeType` string and type hash of `type_name`.
///
/// An empty `type_name` selects the document's primary type.
#[wasm_bindgen(js_name = "encodeType")]
pub fn encode_type(typed_data_json: &str, type_name: &str) -> Result<String, JsValue> {
    encode_type_internal(typed_data_json, type_name).map_err(JsValue::from)
}

fn encode_type_internal(typed_data_json: &str, type_name: &str) -> WasmResult<String> {
    let typed_data = TypedData::from_json(typed_data_json)?;
    let type_name = if type_name.is_empty() {
        typed_data.primary_type.as_str()
    } else {
        type_name
    };
    let encoder = typed_data.encoder(Version::default());

    let encoded_type = encoder.encode_types(type_name);
    if encoded_type.is_empty() {
        return Err(WasmError::InvalidTypedData(format!(
            "type {type_name} is not defined or is malformed"
        )));
    }

    let output = EncodeTypeOutput {
        type_hash: hex_hash(encoder.type_hash(type_name)),
        encoded_type,
    };
    Ok(serde_json::to_string(&output)?)
}

/// Checks whether a `[address, typedData]` params array is signable typed
/// data under either version.
#[wasm_bindgen(js_name = "isTypedDataStructure")]
pub fn is_typed_data_structure(params_json: &str) -> bool {
    eth_typed_data_core::is_typed_data_structure(params_json)
}

/// Parses an `eth_signTypedData_v3`/`_v4` JSON-RPC request body, checks its
/// domain chain against `active_chain_id` and returns the signing payload as
/// JSON.
#[wasm_bindgen(js_name = "signTypedDataPayload")]
pub fn sign_typed_data_payload(body: &str, active_chain_id: &str) -> Result<String, JsValue> {
    sign_typed_data_payload_internal(body, active_chain_id).map_err(JsValue::from)
}

fn sign_typed_data_payload_internal(body: &str, active_chain_id: &str) -> WasmResult<String> {
    let request = parse_request(body)?;
    let sign_data = request.sign_data(active_chain_id)?;
    Ok(serde_json::to_string(&sign_data)?)
}

/// Returns the library version.
///
/// # Returns
///
/// The version string (e.g., `"0.1.0"`).
#[wasm_bindgen(js_name = "getVersion")]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
