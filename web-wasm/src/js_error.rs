//! JavaScript 例外 → 共通エラー型

use civic_report_common::Error;
use wasm_bindgen::{JsCast, JsValue};

/// 例外オブジェクトから表示用メッセージを取り出す
pub fn describe(value: &JsValue) -> String {
    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

pub fn permission(value: JsValue) -> Error {
    Error::DevicePermission(describe(&value))
}

pub fn capture(value: JsValue) -> Error {
    Error::Capture(describe(&value))
}

pub fn map(value: JsValue) -> Error {
    Error::Map(describe(&value))
}

pub fn storage(value: JsValue) -> Error {
    Error::Storage(describe(&value))
}

pub fn network(value: JsValue) -> Error {
    Error::Network(describe(&value))
}

#[cfg(all(target_arch = "wasm32", test))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn wasm_describe_reads_error_message() {
        let error = js_sys::Error::new("Permission denied");
        assert_eq!(describe(&error.into()), "Permission denied");
    }

    #[wasm_bindgen_test]
    fn wasm_describe_plain_string() {
        assert_eq!(describe(&JsValue::from_str("NotAllowedError")), "NotAllowedError");
    }
}
