//! localStorage によるテーマ保存

use crate::js_error;
use civic_report_common::{Result, ThemeStore};
use gloo::storage::{LocalStorage, Storage};

/// 値は JSON ではなく生の文字列（"dark" / "light"）で保存する
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalThemeStore;

impl ThemeStore for LocalThemeStore {
    fn load(&self, key: &str) -> Option<String> {
        LocalStorage::raw().get_item(key).ok().flatten()
    }

    fn save(&mut self, key: &str, value: &str) -> Result<()> {
        LocalStorage::raw()
            .set_item(key, value)
            .map_err(js_error::storage)
    }
}

#[cfg(all(target_arch = "wasm32", test))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn wasm_theme_value_is_stored_raw() {
        let mut store = LocalThemeStore;
        store.save("civic-test-theme", "dark").expect("保存失敗");
        assert_eq!(store.load("civic-test-theme").as_deref(), Some("dark"));
        LocalStorage::delete("civic-test-theme");
    }
}
