//! ページ埋め込み設定の読み込み
//!
//! `<script id="civic-config" type="application/json">` があればその JSON を使う。

use civic_report_common::ClientConfig;

pub const CONFIG_ELEMENT_ID: &str = "civic-config";

/// 埋め込みが無い・壊れている場合は既定値
pub fn load_client_config() -> ClientConfig {
    let Some(element) = gloo::utils::document().get_element_by_id(CONFIG_ELEMENT_ID) else {
        return ClientConfig::default();
    };
    let text = element.text_content().unwrap_or_default();
    match ClientConfig::from_json(&text) {
        Ok(config) => config,
        Err(e) => {
            log::warn!("ignoring #{}: {}", CONFIG_ELEMENT_ID, e);
            ClientConfig::default()
        }
    }
}
