//! Action handlers.
//!
//! Each function corresponds to one user intent: it reads its form fields,
//! issues the remote calls through `CrowdsaleClient` and writes the result
//! back into the page. Wired to buttons in `events.rs`.

use alloy_primitives::Address;
use sd_abi::units::{format_units, parse_units, NATIVE_DECIMALS};
use sd_abi::TOKEN_SYMBOL;
use sd_client::{fmt, ClientError, CrowdsaleClient};

use crate::dom::{self, Elements};
use crate::price;
use crate::provider;
use crate::state;

const STATUS_PENDING: &str = "Initiating transaction... (please wait)";
const STATUS_COMPLETE: &str = "Transaction complete!";
const STATUS_FAILED: &str = "Error sending coin; see log.";

pub fn set_status(els: &Elements, message: &str) {
    dom::set_text(&els.status, message);
}

fn fail(els: &Elements, action: &str, error: &ClientError) {
    gloo_console::error!(format!("{action} failed: {error}"));
    set_status(els, STATUS_FAILED);
}

fn parse_address_input(els: &Elements, input: &web_sys::HtmlInputElement) -> Option<Address> {
    match dom::get_input_value(input).parse() {
        Ok(address) => Some(address),
        Err(e) => {
            set_status(els, &format!("Invalid address: {e}"));
            None
        }
    }
}

// ── Refresh ──

/// Refresh the active account's standing, then the market price.
pub async fn refresh_balance(els: &Elements) {
    let Some(account) = state::active_account() else {
        return;
    };
    if state::contract_address().is_some() {
        let active = provider::active();
        let client = CrowdsaleClient::new(&active, state::contract_address());
        match client.balance_snapshot(account).await {
            Ok(snapshot) => {
                dom::set_text(&els.balance, &snapshot.native);
                dom::set_text(&els.balance_confirmed, &snapshot.tokens);
                dom::set_text(&els.whitelisted, &snapshot.whitelisted.to_string());
            }
            Err(e) => gloo_console::error!(format!("balance refresh failed: {e}")),
        }
    }
    price::refresh(els).await;
}

/// Populate the read-only sale-configuration fields. Every read stands
/// alone: a failed one logs and leaves its field untouched, the others
/// still land.
pub async fn refresh_info(els: &Elements) {
    if state::contract_address().is_none() {
        return;
    }
    let active = provider::active();
    let client = CrowdsaleClient::new(&active, state::contract_address());

    match client.tokens_sold().await {
        Ok(v) => dom::set_text(&els.tokens_sold, &v.to_string()),
        Err(e) => log_read_error("tokensSold", &e),
    }
    match client.token_address().await {
        Ok(v) => dom::set_text(&els.token, &v.to_string()),
        Err(e) => log_read_error("token", &e),
    }
    match client.buy_price().await {
        Ok(v) => dom::set_text(&els.buy_price, &format!("{v} {TOKEN_SYMBOL}")),
        Err(e) => log_read_error("buyPrice", &e),
    }
    match client.softcap().await {
        Ok(v) => dom::set_text(&els.softcap, &format_units(v, NATIVE_DECIMALS)),
        Err(e) => log_read_error("softcap", &e),
    }
    match client.hardcap().await {
        Ok(v) => dom::set_text(&els.hardcap, &format_units(v, NATIVE_DECIMALS)),
        Err(e) => log_read_error("hardcap", &e),
    }
    match client.sale_status().await {
        Ok(v) => dom::set_text(&els.crowd_sale_status, &v),
        Err(e) => log_read_error("crowdSaleStatus", &e),
    }
    match client.deadline().await {
        Ok(v) => dom::set_text(&els.ico_deadline, &fmt::format_deadline(v)),
        Err(e) => log_read_error("ICOdeadLine", &e),
    }
    match client.wei_delivered().await {
        Ok(v) => dom::set_text(&els.wei_delivered, &format_units(v, NATIVE_DECIMALS)),
        Err(e) => log_read_error("weiDelivered", &e),
    }
}

fn log_read_error(field: &str, error: &ClientError) {
    gloo_console::error!(format!("{field} read failed: {error}"));
}

/// Refresh button: balances first, then the info panel.
pub async fn on_refresh(els: &Elements) {
    refresh_balance(els).await;
    refresh_info(els).await;
}

/// Contract-address field changed: re-seed the session and refresh.
pub async fn on_contract_address_change(els: &Elements) {
    let raw = dom::get_input_value(&els.address);
    let parsed = if raw.is_empty() {
        None
    } else {
        match raw.parse() {
            Ok(address) => Some(address),
            Err(e) => {
                gloo_console::error!(format!("invalid contract address: {e}"));
                None
            }
        }
    };
    state::set_contract_address(parsed);
    on_refresh(els).await;
}

// ── State-changing actions ──

/// Buy tokens for the beneficiary with the entered amount attached.
pub async fn on_buy_tokens(els: &Elements) {
    let Some(account) = state::active_account() else {
        return;
    };
    if state::contract_address().is_none() {
        return;
    }

    let amount = match parse_units(&dom::get_input_value(&els.amount), NATIVE_DECIMALS) {
        Ok(amount) => amount,
        Err(e) => {
            set_status(els, &format!("Invalid amount: {e}"));
            return;
        }
    };
    let Some(beneficiary) = parse_address_input(els, &els.beneficiary) else {
        return;
    };

    set_status(els, STATUS_PENDING);
    let active = provider::active();
    let client = CrowdsaleClient::new(&active, state::contract_address());
    match client.buy_tokens(account, beneficiary, amount).await {
        Ok(_) => {
            set_status(els, STATUS_COMPLETE);
            refresh_balance(els).await;
        }
        Err(e) => fail(els, "buy", &e),
    }
}

pub async fn on_whitelist_address(els: &Elements) {
    let Some(account) = state::active_account() else {
        return;
    };
    if state::contract_address().is_none() {
        return;
    }
    let Some(candidate) = parse_address_input(els, &els.whitelist) else {
        return;
    };

    set_status(els, STATUS_PENDING);
    let active = provider::active();
    let client = CrowdsaleClient::new(&active, state::contract_address());
    match client.whitelist_address(account, candidate).await {
        Ok(_) => set_status(els, STATUS_COMPLETE),
        Err(e) => fail(els, "whitelist", &e),
    }
}

pub async fn on_refund_tokens(els: &Elements) {
    let Some(account) = state::active_account() else {
        return;
    };
    if state::contract_address().is_none() {
        return;
    }

    set_status(els, STATUS_PENDING);
    let active = provider::active();
    let client = CrowdsaleClient::new(&active, state::contract_address());
    match client.refund_tokens(account).await {
        Ok(_) => set_status(els, STATUS_COMPLETE),
        Err(e) => fail(els, "refund", &e),
    }
}

pub async fn on_refund_for_address(els: &Elements) {
    let Some(account) = state::active_account() else {
        return;
    };
    if state::contract_address().is_none() {
        return;
    }
    let Some(target) = parse_address_input(els, &els.refund) else {
        return;
    };

    set_status(els, STATUS_PENDING);
    let active = provider::active();
    let client = CrowdsaleClient::new(&active, state::contract_address());
    match client.refund_tokens_for_address(account, target).await {
        Ok(_) => set_status(els, STATUS_COMPLETE),
        Err(e) => fail(els, "refund for address", &e),
    }
}

/// Hand token ownership to the entered address. This is a distinct
/// contract method, not a refund.
pub async fn on_transfer_ownership(els: &Elements) {
    let Some(account) = state::active_account() else {
        return;
    };
    if state::contract_address().is_none() {
        return;
    }
    let Some(new_owner) = parse_address_input(els, &els.new_owner) else {
        return;
    };

    set_status(els, STATUS_PENDING);
    let active = provider::active();
    let client = CrowdsaleClient::new(&active, state::contract_address());
    match client.transfer_token_ownership(account, new_owner).await {
        Ok(_) => set_status(els, STATUS_COMPLETE),
        Err(e) => fail(els, "transfer ownership", &e),
    }
}

// ── Bulk report ──

/// List every participant with one balance line each. The per-address
/// fetches are joined before the completion status is set.
pub async fn on_address_report(els: &Elements) {
    if state::contract_address().is_none() {
        return;
    }

    set_status(els, STATUS_PENDING);
    let active = provider::active();
    let client = CrowdsaleClient::new(&active, state::contract_address());
    match client.balance_report().await {
        Ok(report) => {
            let lines: Vec<String> = report.iter().map(fmt::report_line).collect();
            els.addresses.set_value(&lines.join("\n"));
            set_status(els, STATUS_COMPLETE);
        }
        Err(e) => fail(els, "address report", &e),
    }
}
