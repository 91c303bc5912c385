//! DOM element bindings.
//!
//! Mirrors the page's fixed element-id contract. All references are
//! resolved once at startup; to add a UI element, add a field here and
//! bind it in `Elements::bind()`.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, HtmlInputElement, HtmlTextAreaElement};

// ── Helpers ──

fn doc() -> Document {
    web_sys::window().unwrap().document().unwrap()
}

pub fn by_id(id: &str) -> Option<Element> {
    doc().get_element_by_id(id)
}

pub fn by_id_typed<T: JsCast>(id: &str) -> Option<T> {
    by_id(id).and_then(|e| e.dyn_into::<T>().ok())
}

pub fn set_text(el: &Element, text: &str) {
    el.set_text_content(Some(text));
}

pub fn get_input_value(el: &HtmlInputElement) -> String {
    el.value().trim().to_string()
}

pub fn set_input_value(el: &HtmlInputElement, val: &str) {
    el.set_value(val);
}

pub fn window() -> web_sys::Window {
    web_sys::window().unwrap()
}

/// Blocking user alert, used only for unrecoverable session failures.
pub fn alert(message: &str) {
    let _ = window().alert_with_message(message);
}

// ── Elements struct ──

/// All DOM element references used by the console.
/// Clone-friendly (all inner types are reference-counted via JS GC).
#[derive(Clone)]
pub struct Elements {
    // Session
    pub address: HtmlInputElement,
    pub account: HtmlInputElement,
    pub status: Element,

    // Balance panel
    pub balance: Element,
    pub balance_confirmed: Element,
    pub whitelisted: Element,
    pub ethereum_price: Element,
    pub refresh_btn: HtmlElement,

    // Buy form
    pub amount: HtmlInputElement,
    pub beneficiary: HtmlInputElement,
    pub buy_btn: HtmlElement,

    // Admin actions
    pub whitelist: HtmlInputElement,
    pub whitelist_btn: HtmlElement,
    pub refund_btn: HtmlElement,
    pub refund: HtmlInputElement,
    pub refund_address_btn: HtmlElement,
    pub new_owner: HtmlInputElement,
    pub transfer_ownership_btn: HtmlElement,

    // Participants report
    pub addresses: HtmlTextAreaElement,
    pub address_report_btn: HtmlElement,

    // Sale info
    pub tokens_sold: Element,
    pub token: Element,
    pub buy_price: Element,
    pub softcap: Element,
    pub hardcap: Element,
    pub crowd_sale_status: Element,
    pub ico_deadline: Element,
    pub wei_delivered: Element,
}

macro_rules! get_el {
    ($id:expr) => {
        by_id($id).ok_or_else(|| JsValue::from_str(&format!("missing element #{}", $id)))?
    };
}

macro_rules! get_input {
    ($id:expr) => {
        by_id_typed::<HtmlInputElement>($id)
            .ok_or_else(|| JsValue::from_str(&format!("missing input #{}", $id)))?
    };
}

macro_rules! get_textarea {
    ($id:expr) => {
        by_id_typed::<HtmlTextAreaElement>($id)
            .ok_or_else(|| JsValue::from_str(&format!("missing textarea #{}", $id)))?
    };
}

macro_rules! get_html {
    ($id:expr) => {
        by_id_typed::<HtmlElement>($id)
            .ok_or_else(|| JsValue::from_str(&format!("missing html element #{}", $id)))?
    };
}

impl Elements {
    /// Resolve all DOM references. Call once after DOMContentLoaded.
    pub fn bind() -> Result<Elements, JsValue> {
        Ok(Elements {
            address: get_input!("address"),
            account: get_input!("account"),
            status: get_el!("status"),

            balance: get_el!("balance"),
            balance_confirmed: get_el!("balance_confirmed"),
            whitelisted: get_el!("whitelisted"),
            ethereum_price: get_el!("ethereumPrice"),
            refresh_btn: get_html!("refreshBtn"),

            amount: get_input!("amount"),
            beneficiary: get_input!("beneficiary"),
            buy_btn: get_html!("buyTokensBtn"),

            whitelist: get_input!("whitelist"),
            whitelist_btn: get_html!("whitelistBtn"),
            refund_btn: get_html!("refundBtn"),
            refund: get_input!("refund"),
            refund_address_btn: get_html!("refundAddressBtn"),
            new_owner: get_input!("new_owner"),
            transfer_ownership_btn: get_html!("transferOwnershipBtn"),

            addresses: get_textarea!("addresses"),
            address_report_btn: get_html!("addressReportBtn"),

            tokens_sold: get_el!("tokensSold"),
            token: get_el!("token"),
            buy_price: get_el!("buyPrice"),
            softcap: get_el!("softcap"),
            hardcap: get_el!("hardcap"),
            crowd_sale_status: get_el!("crowdSaleStatus"),
            ico_deadline: get_el!("ICOdeadLine"),
            wei_delivered: get_el!("weiDelivered"),
        })
    }
}
