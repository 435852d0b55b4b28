//! ページ遷移とクエリ文字列

use crate::js_error;
use civic_report_common::{AnalysisResult, Destination, Error, Result};
use web_sys::UrlSearchParams;

/// パスとクエリを URL エンコードして結合する
pub fn to_url(destination: &Destination) -> Result<String> {
    if destination.query.is_empty() {
        return Ok(destination.path.clone());
    }
    let params = UrlSearchParams::new().map_err(js_error::network)?;
    for (key, value) in &destination.query {
        params.append(key, value);
    }
    Ok(format!("{}?{}", destination.path, String::from(params.to_string())))
}

pub fn navigate(destination: &Destination) -> Result<()> {
    let url = to_url(destination)?;
    log::info!("navigate to {}", destination.path);
    gloo::utils::window()
        .location()
        .set_href(&url)
        .map_err(|e| Error::Network(js_error::describe(&e)))
}

/// 現在のページのクエリから解析結果を復元する
pub fn draft_from_query() -> AnalysisResult {
    let search = gloo::utils::window().location().search().unwrap_or_default();
    let Ok(params) = UrlSearchParams::new_with_str(&search) else {
        return AnalysisResult::default();
    };
    let keys = AnalysisResult::default().query_pairs().map(|(key, _)| key);
    AnalysisResult::from_query_pairs(
        keys.into_iter()
            .filter_map(|key| params.get(key).map(|value| (key, value))),
    )
}

#[cfg(all(target_arch = "wasm32", test))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn wasm_review_url_is_encoded() {
        let result = AnalysisResult {
            category: "Water Logging".into(),
            severity: "7".into(),
            draft_en: "Dear Sir & Madam".into(),
            draft_bn: String::new(),
        };
        let url = to_url(&Destination::review("/review", &result)).expect("URL生成失敗");

        assert!(url.starts_with("/review?category=Water+Logging&severity=7"));
        assert!(url.contains("draft_en=Dear+Sir+%26+Madam"));
        assert!(url.ends_with("draft_bn="));
    }

    #[wasm_bindgen_test]
    fn wasm_plain_path_has_no_query() {
        let url = to_url(&Destination::new("/submit_success")).expect("URL生成失敗");
        assert_eq!(url, "/submit_success");
    }
}
