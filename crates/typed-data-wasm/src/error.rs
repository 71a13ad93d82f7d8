//! JavaScript-friendly error types for WASM bindings.
//!
//! Every binding returns `Result<_, JsValue>`; the internal functions return
//! [`WasmResult`] and are converted at the boundary, so the error surfaces in
//! JavaScript as a thrown `Error` with the message below.
//!
//! # Example
//!
//! ```ignore
//! use eth_typed_data_wasm::error::WasmError;
//!
//! fn hash(json: &str) -> Result<String, WasmError> {
//!     Err(WasmError::InvalidTypedData("missing types".to_string()))
//! }
//! ```

use std::{error, fmt};

use eth_typed_data_core::error::Error as CoreError;
use js_sys::Error as JsError;
use wasm_bindgen::prelude::*;

/// Error type for WASM operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WasmError {
    /// The typed data document could not be parsed.
    InvalidTypedData(String),

    /// The version string was not `v3` or `v4`.
    InvalidVersion(String),

    /// Encoding or request handling failed in the core library.
    CoreError(String),

    /// The result could not be serialized for JavaScript.
    Serialization(String),
}

impl fmt::Display for WasmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTypedData(msg) => {
                write!(f, "Invalid typed data: {msg}")
            }
            Self::InvalidVersion(msg) => {
                write!(f, "Invalid version: {msg}")
            }
            Self::CoreError(msg) => {
                write!(f, "Core error: {msg}")
            }
            Self::Serialization(msg) => {
                write!(f, "Serialization error: {msg}")
            }
        }
    }
}

impl error::Error for WasmError {}

impl From<WasmError> for JsValue {
    fn from(error: WasmError) -> Self {
        JsError::new(&error.to_string()).into()
    }
}

impl From<CoreError> for WasmError {
    fn from(error: CoreError) -> Self {
        match error {
            CoreError::InvalidTypedData(_) | CoreError::JsonError(_) => {
                Self::InvalidTypedData(error.to_string())
            }
            CoreError::InvalidVersion(version) => Self::InvalidVersion(version),
            _ => Self::CoreError(error.to_string()),
        }
    }
}

impl From<serde_json::Error> for WasmError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization(error.to_string())
    }
}

/// Result type for WASM operations.
pub type WasmResult<T> = Result<T, WasmError>;
