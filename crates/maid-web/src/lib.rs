//! maid-hire Web Frontend
//!
//! Leptos-based WASM frontend: maid browsing and profiles with the plan
//! selector, login, the payment completion page and the contact-unlock gate.

mod api;
mod app;
mod components;
mod pages;
mod session;

pub use app::App;

use wasm_bindgen::prelude::*;

/// WASM entry point
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    leptos::mount::mount_to_body(App);
}
