use serde_json::Value;
use thiserror::Error;

use sd_abi::units::UnitsError;

/// Failures of the JSON-RPC channel itself.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String },
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl ProviderError {
    /// Build an `Rpc` variant from a JSON-RPC `error` object, tolerating
    /// providers that omit the code or message.
    pub fn from_error_object(error: &Value) -> Self {
        let code = error.get("code").and_then(Value::as_i64).unwrap_or_default();
        let message = error
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("unknown error")
            .to_owned();
        ProviderError::Rpc { code, message }
    }
}

/// Failures of a crowdsale operation.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("no crowdsale contract address set")]
    NoContract,
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error("abi decode failed: {0}")]
    Abi(String),
    #[error("invalid address: {0}")]
    InvalidAddress(String),
    #[error(transparent)]
    InvalidAmount(#[from] UnitsError),
}
