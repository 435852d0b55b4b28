//! エラー型定義

use crate::device::GeoError;
use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("Device permission denied: {0}")]
    DevicePermission(String),

    #[error("Geolocation error: {0}")]
    Geolocation(#[from] GeoError),

    #[error("Image capture failed: {0}")]
    Capture(String),

    #[error("Map error: {0}")]
    Map(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Network error: {0}")]
    Network(String),

    /// サーバが `error` フィールドで返した論理エラー（メッセージをそのまま表示する）
    #[error("{0}")]
    Backend(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid transition: {event} while {phase}")]
    InvalidTransition {
        phase: &'static str,
        event: &'static str,
    },

    #[error("No image has been provided")]
    MissingImage,

    #[error("No location has been selected")]
    MissingLocation,

    #[error("Submission is not ready")]
    NotReady,

    #[error("Config error: {0}")]
    Config(String),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
