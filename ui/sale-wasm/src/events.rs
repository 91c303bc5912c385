//! Event binding.
//!
//! Wires all UI listeners once at startup. Async handlers are spawned via
//! `wasm_bindgen_futures::spawn_local`.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::dom::Elements;
use crate::ops;

/// Helper: attach an async click handler to an HtmlElement.
macro_rules! on_click_async {
    ($el:expr, $els:expr, $handler:expr) => {{
        let els = $els.clone();
        let cb = Closure::wrap(Box::new(move |_: web_sys::MouseEvent| {
            let els2 = els.clone();
            wasm_bindgen_futures::spawn_local(async move {
                $handler(&els2).await;
            });
        }) as Box<dyn FnMut(_)>);
        $el.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())
            .unwrap();
        cb.forget();
    }};
}

/// Bind all UI event listeners. Call once after init.
pub fn bind_events(els: &Elements) {
    // ── Actions ──
    on_click_async!(els.buy_btn, els, ops::on_buy_tokens);
    on_click_async!(els.whitelist_btn, els, ops::on_whitelist_address);
    on_click_async!(els.refund_btn, els, ops::on_refund_tokens);
    on_click_async!(els.refund_address_btn, els, ops::on_refund_for_address);
    on_click_async!(els.transfer_ownership_btn, els, ops::on_transfer_ownership);
    on_click_async!(els.address_report_btn, els, ops::on_address_report);
    on_click_async!(els.refresh_btn, els, ops::on_refresh);

    // ── Contract address field ──
    {
        let els2 = els.clone();
        let cb = Closure::wrap(Box::new(move |_: web_sys::Event| {
            let els3 = els2.clone();
            wasm_bindgen_futures::spawn_local(async move {
                ops::on_contract_address_change(&els3).await;
            });
        }) as Box<dyn FnMut(_)>);
        els.address
            .add_event_listener_with_callback("change", cb.as_ref().unchecked_ref())
            .unwrap();
        cb.forget();
    }
}
