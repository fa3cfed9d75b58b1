//! Leptos front end (compiled for `wasm32` only).

pub mod app;
pub mod context;
pub mod gate;

use wasm_bindgen::prelude::*;

/// WASM entry point, called automatically when the module loads.
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    leptos::mount_to_body(app::App);
}
