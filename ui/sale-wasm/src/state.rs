//! Session state.
//!
//! `RefCell`-wrapped `thread_local!` storage (WASM is single-threaded).
//! Seeded at page load, re-seeded when the contract-address field changes,
//! gone on page unload.

use alloy_primitives::Address;
use std::cell::RefCell;

#[derive(Clone, Debug, Default)]
pub struct Session {
    pub accounts: Vec<Address>,
    pub active_account: Option<Address>,
    pub contract_address: Option<Address>,
    pub injected_provider: bool,
}

thread_local! {
    static SESSION: RefCell<Session> = RefCell::new(Session::default());
}

/// Run a closure with shared read access to the session.
pub fn with<F, R>(f: F) -> R
where
    F: FnOnce(&Session) -> R,
{
    SESSION.with(|s| f(&s.borrow()))
}

/// Run a closure with mutable access to the session.
pub fn with_mut<F, R>(f: F) -> R
where
    F: FnOnce(&mut Session) -> R,
{
    SESSION.with(|s| f(&mut s.borrow_mut()))
}

// ── Convenience accessors ──

/// Store the discovered account list; the first entry becomes the active
/// account by convention.
pub fn set_accounts(accounts: Vec<Address>) {
    with_mut(|s| {
        s.active_account = accounts.first().copied();
        s.accounts = accounts;
    });
}

pub fn active_account() -> Option<Address> {
    with(|s| s.active_account)
}

pub fn contract_address() -> Option<Address> {
    with(|s| s.contract_address)
}

pub fn set_contract_address(address: Option<Address>) {
    with_mut(|s| s.contract_address = address);
}

pub fn injected_provider() -> bool {
    with(|s| s.injected_provider)
}

pub fn set_injected_provider(injected: bool) {
    with_mut(|s| s.injected_provider = injected);
}
