//! バックエンド API クライアント
//!
//! - `/analyze`: multipart で画像と位置・日時を送り、解析結果を受け取る
//! - `/submit`: JSON でカテゴリと本文を送る

use crate::js_error;
use civic_report_common::api::IMAGE_FIELD;
use civic_report_common::{
    interpret_analyze_response, AnalysisResult, AnalyzeSubmission, Error, Result, SubmitRequest,
    SubmitResponse,
};
use gloo::net::http::Request;
use web_sys::{Blob, FormData};

fn network(error: gloo::net::Error) -> Error {
    Error::Network(error.to_string())
}

/// 送信内容を FormData に詰める
pub fn analyze_form(submission: &AnalyzeSubmission<Blob>) -> Result<FormData> {
    let form = FormData::new().map_err(js_error::network)?;
    match submission.file_name {
        Some(name) => form.append_with_blob_and_filename(IMAGE_FIELD, &submission.image, name),
        None => form.append_with_blob(IMAGE_FIELD, &submission.image),
    }
    .map_err(js_error::network)?;
    for (name, value) in submission.form.text_fields() {
        form.append_with_str(name, &value).map_err(js_error::network)?;
    }
    Ok(form)
}

/// 画像を解析に回す
pub async fn analyze(endpoint: &str, submission: &AnalyzeSubmission<Blob>) -> Result<AnalysisResult> {
    let form = analyze_form(submission)?;
    log::info!("POST {}", endpoint);
    let response = Request::post(endpoint)
        .body(form)
        .map_err(network)?
        .send()
        .await
        .map_err(network)?;
    let body: serde_json::Value = response.json().await.map_err(network)?;
    interpret_analyze_response(body)
}

/// 確定した通報を送る
pub async fn submit(endpoint: &str, request: &SubmitRequest) -> Result<SubmitResponse> {
    log::info!("POST {} ({})", endpoint, request.category);
    let response = Request::post(endpoint)
        .json(request)
        .map_err(network)?
        .send()
        .await
        .map_err(network)?;
    response.json::<SubmitResponse>().await.map_err(network)
}

#[cfg(all(target_arch = "wasm32", test))]
mod wasm_tests {
    use super::*;
    use civic_report_common::{AnalyzeForm, CaptureMode, Coordinates};
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn wasm_analyze_form_carries_text_fields() {
        let submission = AnalyzeSubmission {
            image: Blob::new().expect("Blob生成失敗"),
            file_name: Some("live-capture.png"),
            form: AnalyzeForm {
                mode: Some(CaptureMode::Live),
                location: Some(Coordinates::new(22.5, 88.3)),
                timestamp: Some("10:00".into()),
            },
        };

        let form = analyze_form(&submission).expect("FormData生成失敗");
        assert_eq!(form.get("mode").as_string().as_deref(), Some("live"));
        assert_eq!(form.get("lat").as_string().as_deref(), Some("22.5"));
        assert!(form.has(IMAGE_FIELD));
    }
}
