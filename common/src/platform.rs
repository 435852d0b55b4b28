//! ブラウザ依存リソースの型の組

use crate::device::CameraStream;
use crate::map::MapCanvas;

/// ページコントローラが扱うカメラ・地図・画像の具体型
///
/// ブラウザでは web-sys / Leaflet の型、テストではフェイクを割り当てる。
pub trait Platform {
    type Stream: CameraStream;
    type Map: MapCanvas;
    type Image: Clone;
}
