//! ブラウザのデバイスAPI

pub mod camera;
pub mod geolocation;

/// ブラウザのロケール形式の現在時刻
pub fn local_timestamp() -> String {
    String::from(js_sys::Date::new_0().to_locale_string("default", &wasm_bindgen::JsValue::UNDEFINED))
}
