//! 通報フローで受け渡す型の定義
//!
//! - Coordinates: 緯度経度
//! - CaptureMode: 画像の取得方法（ライブ撮影 / アップロード）
//! - AnalysisResult: `/analyze` の解析結果（レビュー画面へ素通しする）

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// 緯度経度
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// 小数点以下5桁で表示（約1m精度）
impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5}, {:.5}", self.lat, self.lon)
    }
}

/// 画像の取得方法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptureMode {
    Live,
    Upload,
}

impl CaptureMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CaptureMode::Live => "live",
            CaptureMode::Upload => "upload",
        }
    }
}

/// AI解析結果
///
/// 中身は解釈せず、レビュー画面のクエリパラメータへそのまま渡す。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisResult {
    pub category: String,

    /// サーバは整数で返すことがあるため文字列に正規化する
    #[serde(deserialize_with = "string_or_number")]
    pub severity: String,

    pub draft_en: String,
    pub draft_bn: String,
}

impl AnalysisResult {
    /// `/review` に渡すクエリパラメータ（順序固定）
    pub fn query_pairs(&self) -> [(&'static str, &str); 4] {
        [
            ("category", self.category.as_str()),
            ("severity", self.severity.as_str()),
            ("draft_en", self.draft_en.as_str()),
            ("draft_bn", self.draft_bn.as_str()),
        ]
    }

    /// クエリパラメータから復元（未知のキーは無視）
    pub fn from_query_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut result = Self::default();
        for (key, value) in pairs {
            match key.as_ref() {
                "category" => result.category = value.into(),
                "severity" => result.severity = value.into(),
                "draft_en" => result.draft_en = value.into(),
                "draft_bn" => result.draft_bn = value.into(),
                _ => {}
            }
        }
        result
    }
}

fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}
