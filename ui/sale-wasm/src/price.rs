//! External market-price lookup.
//!
//! One GET against a third-party ticker with a cache-busting timestamp; a
//! failure only logs and leaves the field as it was.

use sd_client::fmt::parse_ticker_price;

use crate::dom::{self, Elements};
use crate::provider;

pub const TICKER_URL: &str = "https://api.coinmarketcap.com/v1/ticker/ethereum/";

pub async fn refresh(els: &Elements) {
    let url = format!("{TICKER_URL}?t={}", js_sys::Date::now() as u64);
    match provider::fetch_json(&url, None).await {
        Ok(payload) => match parse_ticker_price(&payload) {
            Some(usd) => dom::set_text(&els.ethereum_price, &usd.to_string()),
            None => gloo_console::error!("ticker payload has no usable price_usd"),
        },
        Err(e) => gloo_console::error!(format!("ticker lookup failed: {e}")),
    }
}
