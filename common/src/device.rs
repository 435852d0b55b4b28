//! カメラ・位置情報デバイスの型定義
//!
//! - CameraStream: 取得済みカメラストリームの抽象
//! - StreamSlot: ストリームの所有と確実な解放
//! - VideoConstraints / GeoOptions: デバイス要求パラメータ
//! - GeoError: 位置情報取得の失敗

use serde::Serialize;
use thiserror::Error;

/// 取得済みのカメラストリーム
pub trait CameraStream {
    /// 全トラックを停止してデバイスを解放する
    fn stop(&self);

    /// まだ停止していないトラックがあるか
    fn is_active(&self) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FacingMode {
    User,
    Environment,
}

/// `getUserMedia` の video 制約
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoConstraints {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facing_mode: Option<FacingMode>,
}

impl VideoConstraints {
    pub fn resolution(width: u32, height: u32) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            facing_mode: None,
        }
    }

    pub fn facing(mode: FacingMode) -> Self {
        Self {
            width: None,
            height: None,
            facing_mode: Some(mode),
        }
    }
}

/// `getCurrentPosition` のオプション
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GeoOptions {
    pub high_accuracy: bool,
    pub timeout_ms: Option<u32>,
    pub maximum_age_ms: Option<u32>,
}

impl GeoOptions {
    /// 高精度・キャッシュ不可
    pub fn precise(timeout_ms: u32) -> Self {
        Self {
            high_accuracy: true,
            timeout_ms: Some(timeout_ms),
            maximum_age_ms: Some(0),
        }
    }
}

/// 位置情報取得エラー
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeoError {
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("position unavailable: {0}")]
    PositionUnavailable(String),

    #[error("timed out: {0}")]
    Timeout(String),

    #[error("geolocation is not supported by this browser")]
    Unsupported,
}

impl GeoError {
    /// `GeolocationPositionError.code` から変換
    pub fn from_code(code: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match code {
            1 => GeoError::PermissionDenied(message),
            3 => GeoError::Timeout(message),
            _ => GeoError::PositionUnavailable(message),
        }
    }
}

/// カメラストリームの所有者
///
/// 保持できるストリームは1本だけ。差し替え・解放・ドロップのいずれでも
/// 古いストリームは必ず停止される。
pub struct StreamSlot<S: CameraStream> {
    stream: Option<S>,
}

impl<S: CameraStream> StreamSlot<S> {
    pub fn new() -> Self {
        Self { stream: None }
    }

    pub fn attach(&mut self, stream: S) {
        self.release();
        self.stream = Some(stream);
    }

    /// ストリームを停止して手放す。停止したものがあれば true
    pub fn release(&mut self) -> bool {
        match self.stream.take() {
            Some(stream) => {
                stream.stop();
                log::debug!("camera stream released");
                true
            }
            None => false,
        }
    }

    pub fn is_live(&self) -> bool {
        self.stream.as_ref().is_some_and(|s| s.is_active())
    }

    pub fn get(&self) -> Option<&S> {
        self.stream.as_ref()
    }
}

impl<S: CameraStream> Default for StreamSlot<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: CameraStream> Drop for StreamSlot<S> {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeStream;

    #[test]
    fn test_video_constraints_serialize_resolution() {
        let json = serde_json::to_string(&VideoConstraints::resolution(1280, 720)).unwrap();
        assert_eq!(json, r#"{"width":1280,"height":720}"#);
    }

    #[test]
    fn test_video_constraints_serialize_facing() {
        let json = serde_json::to_string(&VideoConstraints::facing(FacingMode::Environment)).unwrap();
        assert_eq!(json, r#"{"facingMode":"environment"}"#);
    }

    #[test]
    fn test_geo_options_precise() {
        let options = GeoOptions::precise(8000);
        assert!(options.high_accuracy);
        assert_eq!(options.timeout_ms, Some(8000));
        assert_eq!(options.maximum_age_ms, Some(0));
    }

    #[test]
    fn test_geo_error_from_code() {
        assert!(matches!(GeoError::from_code(1, "denied"), GeoError::PermissionDenied(_)));
        assert!(matches!(GeoError::from_code(2, "no fix"), GeoError::PositionUnavailable(_)));
        assert!(matches!(GeoError::from_code(3, "slow"), GeoError::Timeout(_)));
    }

    #[test]
    fn test_stream_slot_release_stops_tracks() {
        let stream = FakeStream::new();
        let probe = stream.clone();
        let mut slot = StreamSlot::new();

        slot.attach(stream);
        assert!(slot.is_live());

        assert!(slot.release());
        assert!(!probe.is_active());
        assert!(!slot.is_live());
        assert!(!slot.release()); // 2回目は何もしない
    }

    #[test]
    fn test_stream_slot_attach_replaces_and_stops_previous() {
        let first = FakeStream::new();
        let second = FakeStream::new();
        let mut slot = StreamSlot::new();

        slot.attach(first.clone());
        slot.attach(second.clone());

        assert!(!first.is_active());
        assert!(second.is_active());
    }

    #[test]
    fn test_stream_slot_drop_stops_tracks() {
        let stream = FakeStream::new();
        {
            let mut slot = StreamSlot::new();
            slot.attach(stream.clone());
        }
        assert!(!stream.is_active());
    }
}
