//! バックエンドとの通信契約
//!
//! - `POST /analyze`: multipart（image, mode, lat, lon, timestamp）
//! - `POST /submit`: JSON（category, draft_en）

use crate::error::{Error, Result};
use crate::types::{AnalysisResult, CaptureMode, Coordinates};
use serde::{Deserialize, Serialize};

/// multipart の画像フィールド名
pub const IMAGE_FIELD: &str = "image";

/// `/analyze` に送る画像以外の項目
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalyzeForm {
    pub mode: Option<CaptureMode>,
    pub location: Option<Coordinates>,
    pub timestamp: Option<String>,
}

impl AnalyzeForm {
    /// フォームに追加する (名前, 値) の列
    ///
    /// 位置が無い場合も lat/lon は空文字で送る（サーバ側で「位置なし」扱い）。
    pub fn text_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = Vec::with_capacity(4);
        if let Some(mode) = self.mode {
            fields.push(("mode", mode.as_str().to_string()));
        }
        let (lat, lon) = match self.location {
            Some(c) => (c.lat.to_string(), c.lon.to_string()),
            None => (String::new(), String::new()),
        };
        fields.push(("lat", lat));
        fields.push(("lon", lon));
        if let Some(timestamp) = &self.timestamp {
            fields.push(("timestamp", timestamp.clone()));
        }
        fields
    }
}

/// 送信準備が整った解析リクエスト
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzeSubmission<I> {
    pub image: I,
    /// multipart のファイル名（None ならブラウザ既定）
    pub file_name: Option<&'static str>,
    pub form: AnalyzeForm,
}

/// `/analyze` のレスポンス本文をパース
pub fn parse_analyze_response(body: &str) -> Result<AnalysisResult> {
    let value: serde_json::Value = serde_json::from_str(body)?;
    interpret_analyze_response(value)
}

/// `error` フィールドがあれば解析結果より優先してエラーとする
pub fn interpret_analyze_response(value: serde_json::Value) -> Result<AnalysisResult> {
    if let Some(error) = value.get("error").filter(|e| !e.is_null()) {
        let message = error
            .as_str()
            .map(str::to_string)
            .unwrap_or_else(|| error.to_string());
        return Err(Error::Backend(message));
    }
    Ok(serde_json::from_value(value)?)
}

/// `/submit` のリクエスト
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitRequest {
    pub category: String,
    pub draft_en: String,
}

/// `/submit` のレスポンス
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SubmitResponse {
    pub success: bool,
    pub recipient: Option<String>,
    pub error: Option<String>,
    pub message: Option<String>,
}
