//! Blockchain channel selection and the two concrete providers.
//!
//! An injected EIP-1193 wallet is preferred; without one, JSON-RPC goes
//! over `fetch` to a fixed local node. Both implement `sd_client::Provider`
//! so the rest of the console never knows which channel it is on.

use alloy_primitives::Address;
use async_trait::async_trait;
use sd_client::{accounts_from_value, Provider, ProviderError};
use serde_json::{json, Value};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, RequestMode, Response};

use crate::state;

/// Fallback node used when nothing is injected into the page.
pub const FALLBACK_RPC_URL: &str = "http://127.0.0.1:9545";

pub enum ActiveProvider {
    Injected(InjectedProvider),
    Http(HttpRpcProvider),
}

/// Probe for an injected provider once, at page load.
pub fn detect() -> ActiveProvider {
    if injected_ethereum().is_some() {
        gloo_console::warn!("using the injected provider");
        ActiveProvider::Injected(InjectedProvider)
    } else {
        gloo_console::warn!(format!("no injected provider, falling back to {FALLBACK_RPC_URL}"));
        ActiveProvider::Http(HttpRpcProvider::default())
    }
}

/// The channel chosen at bootstrap, rebuilt from the session flag.
pub fn active() -> ActiveProvider {
    if state::injected_provider() {
        ActiveProvider::Injected(InjectedProvider)
    } else {
        ActiveProvider::Http(HttpRpcProvider::default())
    }
}

#[async_trait(?Send)]
impl Provider for ActiveProvider {
    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderError> {
        match self {
            ActiveProvider::Injected(p) => p.request(method, params).await,
            ActiveProvider::Http(p) => p.request(method, params).await,
        }
    }

    async fn accounts(&self) -> Result<Vec<Address>, ProviderError> {
        match self {
            ActiveProvider::Injected(p) => p.accounts().await,
            ActiveProvider::Http(p) => p.accounts().await,
        }
    }
}

// ── Injected EIP-1193 provider ──

pub struct InjectedProvider;

fn injected_ethereum() -> Option<JsValue> {
    let window = web_sys::window()?;
    let provider = js_sys::Reflect::get(&window.into(), &JsValue::from_str("ethereum")).ok()?;
    if provider.is_null() || provider.is_undefined() {
        None
    } else {
        Some(provider)
    }
}

#[async_trait(?Send)]
impl Provider for InjectedProvider {
    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderError> {
        let provider = injected_ethereum()
            .ok_or_else(|| ProviderError::Transport("window.ethereum is gone".into()))?;
        let request_fn = js_sys::Reflect::get(&provider, &JsValue::from_str("request"))
            .ok()
            .and_then(|v| v.dyn_into::<js_sys::Function>().ok())
            .ok_or_else(|| {
                ProviderError::Transport("window.ethereum.request is unavailable".into())
            })?;

        let payload = serde_wasm_bindgen::to_value(&json!({ "method": method, "params": params }))
            .map_err(|e| ProviderError::Transport(format!("request encode failed: {e}")))?;
        let promise = request_fn
            .call1(&provider, &payload)
            .map_err(|e| ProviderError::Transport(format!("request dispatch failed: {e:?}")))?;
        let promise: js_sys::Promise = promise.dyn_into().map_err(|_| {
            ProviderError::Transport("provider request did not return a promise".into())
        })?;
        let result = JsFuture::from(promise).await.map_err(rejection_to_error)?;
        serde_wasm_bindgen::from_value(result)
            .map_err(|e| ProviderError::Malformed(format!("response decode failed: {e}")))
    }

    async fn accounts(&self) -> Result<Vec<Address>, ProviderError> {
        // eth_requestAccounts so a locked wallet prompts the user instead of
        // answering with an empty list.
        let result = self
            .request("eth_requestAccounts", Value::Array(Vec::new()))
            .await?;
        accounts_from_value(result)
    }
}

/// Keep the rpc taxonomy when the rejection carries `code`/`message`;
/// otherwise report the raw JS value.
fn rejection_to_error(rejection: JsValue) -> ProviderError {
    let code = js_sys::Reflect::get(&rejection, &JsValue::from_str("code"))
        .ok()
        .and_then(|v| v.as_f64());
    let message = js_sys::Reflect::get(&rejection, &JsValue::from_str("message"))
        .ok()
        .and_then(|v| v.as_string());
    match (code, message) {
        (Some(code), Some(message)) => ProviderError::Rpc {
            code: code as i64,
            message,
        },
        _ => ProviderError::Transport(format!("{rejection:?}")),
    }
}

// ── Fetch-based JSON-RPC fallback ──

pub struct HttpRpcProvider {
    endpoint: String,
}

impl Default for HttpRpcProvider {
    fn default() -> Self {
        Self {
            endpoint: FALLBACK_RPC_URL.to_owned(),
        }
    }
}

#[async_trait(?Send)]
impl Provider for HttpRpcProvider {
    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderError> {
        let envelope = json!({ "jsonrpc": "2.0", "id": 1, "method": method, "params": params });
        let body = fetch_json(&self.endpoint, Some(envelope.to_string())).await?;
        if let Some(error) = body.get("error") {
            return Err(ProviderError::from_error_object(error));
        }
        body.get("result")
            .cloned()
            .ok_or_else(|| ProviderError::Malformed("rpc response has no result".into()))
    }
}

/// Perform a fetch request (`POST` with a JSON body, `GET` without) and
/// parse the response as JSON.
pub(crate) async fn fetch_json(url: &str, body: Option<String>) -> Result<Value, ProviderError> {
    let opts = RequestInit::new();
    opts.set_mode(RequestMode::Cors);

    if let Some(ref body) = body {
        opts.set_method("POST");
        let headers = Headers::new().map_err(transport)?;
        headers
            .set("Content-Type", "application/json")
            .map_err(transport)?;
        opts.set_headers(&headers);
        opts.set_body(&JsValue::from_str(body));
    } else {
        opts.set_method("GET");
    }

    let request = Request::new_with_str_and_init(url, &opts).map_err(transport)?;
    let window =
        web_sys::window().ok_or_else(|| ProviderError::Transport("missing window".into()))?;
    let response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(transport)?;
    let response: Response = response
        .dyn_into()
        .map_err(|_| ProviderError::Transport("fetch did not return a response".into()))?;

    let text = JsFuture::from(response.text().map_err(transport)?)
        .await
        .map_err(transport)?;
    let text = text.as_string().unwrap_or_default();

    if !response.ok() {
        return Err(ProviderError::Transport(format!(
            "{} {}: {}",
            response.status(),
            response.status_text(),
            text
        )));
    }

    serde_json::from_str(&text).map_err(|e| ProviderError::Malformed(format!("json parse error: {e}")))
}

fn transport(e: JsValue) -> ProviderError {
    ProviderError::Transport(format!("{e:?}"))
}
