//! カメラ（getUserMedia）と静止画の切り出し

use crate::js_error;
use civic_report_common::{CameraStream, Error, Result, VideoConstraints};
use futures::channel::oneshot;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    Blob, CanvasRenderingContext2d, HtmlCanvasElement, HtmlVideoElement, MediaStream,
    MediaStreamConstraints, MediaStreamTrack, MediaStreamTrackState,
};

/// ブラウザのカメラストリーム
#[derive(Clone)]
pub struct WebCameraStream {
    stream: MediaStream,
}

impl WebCameraStream {
    pub fn media_stream(&self) -> &MediaStream {
        &self.stream
    }

    fn tracks(&self) -> impl Iterator<Item = MediaStreamTrack> {
        self.stream
            .get_tracks()
            .to_vec()
            .into_iter()
            .filter_map(|track| track.dyn_into::<MediaStreamTrack>().ok())
    }
}

impl CameraStream for WebCameraStream {
    fn stop(&self) {
        for track in self.tracks() {
            track.stop();
        }
    }

    fn is_active(&self) -> bool {
        self.tracks()
            .any(|track| track.ready_state() == MediaStreamTrackState::Live)
    }
}

/// 映像のみのストリームを要求する（拒否・未対応は DevicePermission）
pub async fn request_camera(constraints: &VideoConstraints) -> Result<WebCameraStream> {
    let devices = gloo::utils::window()
        .navigator()
        .media_devices()
        .map_err(js_error::permission)?;
    let video = serde_wasm_bindgen::to_value(constraints)
        .map_err(|e| Error::DevicePermission(e.to_string()))?;

    let options = MediaStreamConstraints::new();
    options.set_audio(&JsValue::FALSE);
    options.set_video(&video);

    let promise = devices
        .get_user_media_with_constraints(&options)
        .map_err(js_error::permission)?;
    let stream = JsFuture::from(promise)
        .await
        .map_err(js_error::permission)?
        .dyn_into::<MediaStream>()
        .map_err(js_error::permission)?;

    log::info!("camera stream started");
    Ok(WebCameraStream { stream })
}

/// video の現在フレームを canvas に描き、指定形式の Blob にする
pub async fn capture_frame(
    video: &HtmlVideoElement,
    canvas: &HtmlCanvasElement,
    mime_type: &str,
) -> Result<Blob> {
    let (width, height) = (video.video_width(), video.video_height());
    if width == 0 || height == 0 {
        return Err(Error::Capture("video has no frame yet".into()));
    }
    canvas.set_width(width);
    canvas.set_height(height);

    let context = canvas
        .get_context("2d")
        .map_err(js_error::capture)?
        .ok_or_else(|| Error::Capture("2d context unavailable".into()))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|context| js_error::capture(context.into()))?;
    context
        .draw_image_with_html_video_element_and_dw_and_dh(
            video,
            0.0,
            0.0,
            width as f64,
            height as f64,
        )
        .map_err(js_error::capture)?;

    // toBlob はコールバック形式なので oneshot で待つ
    let (tx, rx) = oneshot::channel::<Option<Blob>>();
    let on_blob = Closure::once(move |blob: JsValue| {
        let _ = tx.send(blob.dyn_into::<Blob>().ok());
    });
    canvas
        .to_blob_with_type(on_blob.as_ref().unchecked_ref(), mime_type)
        .map_err(js_error::capture)?;

    rx.await
        .map_err(|_| Error::Capture("toBlob callback dropped".into()))?
        .ok_or_else(|| Error::Capture("canvas produced no image".into()))
}
