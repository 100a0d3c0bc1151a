//! # client
//!
//! Leptos + WASM operator console for the WAF backend.
//!
//! This crate contains the route table and session guard, the persisted
//! session store, the authenticated request pipeline and the pages that sit
//! on top of them. The `wafboard` server renders it via SSR and the browser
//! hydrates it through [`hydrate`].

pub mod app;
pub mod components;
pub mod net;
pub mod pages;
pub mod routes;
pub mod state;
pub mod util;

/// WASM entry point: attach the reactive app to the server-rendered body.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    leptos::mount::hydrate_body(app::App);
}
