//! # wafer-client
//!
//! Leptos + WASM frontend for reviewing wafer-map defect predictions.
//!
//! This crate contains pages, components, application state, and the typed
//! HTTP client for the review server. The server renders it with the `ssr`
//! feature; the browser hydrates it with the `hydrate` feature.

pub mod app;
pub mod components;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// WASM entry point: attach to the server-rendered body.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    leptos::mount::hydrate_body(app::App);
}
