//! ブラウザ実装の組み合わせ

use crate::device::camera::WebCameraStream;
use crate::leaflet::LeafletCanvas;
use civic_report_common::Platform;

/// カメラ = getUserMedia、地図 = Leaflet、画像 = Blob
pub struct WebPlatform;

impl Platform for WebPlatform {
    type Stream = WebCameraStream;
    type Map = LeafletCanvas;
    type Image = web_sys::Blob;
}
