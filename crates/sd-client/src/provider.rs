use alloy_primitives::Address;
use async_trait::async_trait;
use serde_json::Value;

use crate::error::ProviderError;

/// One JSON-RPC channel to an Ethereum node or injected wallet.
///
/// Implementations own the request envelope and error extraction; callers
/// see only the method name, the params array and the decoded `result`.
/// `?Send` because browser futures are not `Send`.
#[async_trait(?Send)]
pub trait Provider {
    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderError>;

    /// Discover the provider's account list.
    ///
    /// Injected wallets override this with `eth_requestAccounts` so a locked
    /// wallet prompts the user instead of reporting an empty list.
    async fn accounts(&self) -> Result<Vec<Address>, ProviderError> {
        let result = self.request("eth_accounts", Value::Array(Vec::new())).await?;
        accounts_from_value(result)
    }
}

/// Parse an `eth_accounts`/`eth_requestAccounts` result into addresses.
pub fn accounts_from_value(value: Value) -> Result<Vec<Address>, ProviderError> {
    let Value::Array(items) = value else {
        return Err(ProviderError::Malformed("account list is not an array".into()));
    };
    items
        .into_iter()
        .map(|item| {
            let raw = item
                .as_str()
                .ok_or_else(|| ProviderError::Malformed("account entry is not a string".into()))?;
            raw.parse()
                .map_err(|e| ProviderError::Malformed(format!("invalid account address: {e}")))
        })
        .collect()
}
