//! Civic Report Web App (Leptos + WASM)

mod api;
mod app;
mod components;
mod config;
mod device;
mod js_error;
mod leaflet;
mod navigation;
mod platform;
mod storage;

use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    // 二重初期化のときだけ失敗する
    let _ = console_log::init_with_level(log::Level::Debug);
    app::mount_pages();
}
