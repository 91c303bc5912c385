//! SaleDesk crowdsale console — WASM front end.
//!
//! Pure Rust + WASM page controller for a deployed token-crowdsale
//! contract. Each concern lives in its own module; the portable call logic
//! is in the `sd-client` crate.

pub mod dom;
pub mod events;
pub mod ops;
pub mod price;
pub mod provider;
pub mod state;

use sd_client::Provider as _;
use wasm_bindgen::prelude::*;

/// WASM entry point – called automatically when the module is instantiated.
#[wasm_bindgen(start)]
pub async fn start() -> Result<(), JsValue> {
    // Improve panic messages in the browser console
    console_error_panic_hook::set_once();

    init().await
}

/// Main initialisation sequence: provider detection, session seeding,
/// account discovery, first refresh.
async fn init() -> Result<(), JsValue> {
    let els = dom::Elements::bind()?;

    let active = provider::detect();
    state::set_injected_provider(matches!(active, provider::ActiveProvider::Injected(_)));

    // The address field may be prefilled by the page; seed the session now,
    // the change listener keeps it current afterwards.
    let raw = dom::get_input_value(&els.address);
    if !raw.is_empty() {
        match raw.parse() {
            Ok(address) => state::set_contract_address(Some(address)),
            Err(e) => gloo_console::error!(format!("invalid contract address: {e}")),
        }
    }

    events::bind_events(&els);

    // Account discovery failure is unrecoverable for the session.
    let accounts = match active.accounts().await {
        Ok(accounts) => accounts,
        Err(e) => {
            gloo_console::error!(format!("account discovery failed: {e}"));
            dom::alert("There was an error fetching your accounts.");
            return Ok(());
        }
    };
    if accounts.is_empty() {
        dom::alert("Couldn't get any accounts! Make sure your Ethereum client is configured correctly.");
        return Ok(());
    }

    let first = accounts[0];
    state::set_accounts(accounts);
    dom::set_input_value(&els.account, &first.to_string());

    ops::refresh_balance(&els).await;
    ops::refresh_info(&els).await;

    Ok(())
}
