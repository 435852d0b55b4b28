//! クライアント設定
//!
//! 既定値はコンパイル時に埋め込み、ページ側の JSON で部分的に上書きできる。

use crate::error::{Error, Result};
use crate::map::MapView;
use crate::types::Coordinates;
use serde::{Deserialize, Serialize};

/// 位置情報が取れないときの地図中心（コルカタ）
pub const FALLBACK_COORDS: Coordinates = Coordinates::new(22.5726, 88.3639);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub endpoints: Endpoints,
    pub map: MapConfig,
    pub camera: CameraConfig,
    pub geolocation: GeolocationConfig,
    /// テーマ設定を保存する localStorage のキー
    pub theme_key: String,
    /// レビュー画面のカテゴリ候補
    pub categories: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub analyze: String,
    pub submit: String,
    pub review: String,
    pub submit_success: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub fallback: Coordinates,
    pub wizard_located_zoom: u8,
    pub wizard_fallback_zoom: u8,
    pub upload_located_zoom: u8,
    pub upload_fallback_zoom: u8,
    pub street: TileLayerConfig,
    pub satellite: TileLayerConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileLayerConfig {
    pub url: String,
    pub attribution: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_zoom: Option<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeolocationConfig {
    pub timeout_ms: u32,
}

impl ClientConfig {
    /// ページに埋め込まれた JSON を読み込む（省略したキーは既定値）
    pub fn from_json(json: &str) -> Result<Self> {
        let config: ClientConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.categories.is_empty() {
            return Err(Error::Config("categories must not be empty".into()));
        }
        if self.endpoints.analyze.is_empty() || self.endpoints.submit.is_empty() {
            return Err(Error::Config("endpoint paths must not be empty".into()));
        }
        Ok(())
    }
}

impl MapConfig {
    pub fn wizard_fallback(&self) -> MapView {
        MapView::new(self.fallback, self.wizard_fallback_zoom)
    }

    pub fn upload_fallback(&self) -> MapView {
        MapView::new(self.fallback, self.upload_fallback_zoom)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoints: Endpoints::default(),
            map: MapConfig::default(),
            camera: CameraConfig::default(),
            geolocation: GeolocationConfig::default(),
            theme_key: "theme".into(),
            categories: [
                "Pothole",
                "Accumulated Garbage",
                "Street Light Outage",
                "Water Logging",
                "Broken Signage",
                "Fallen Tree",
                "Other",
            ]
            .iter()
            .map(|c| c.to_string())
            .collect(),
        }
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            analyze: "/analyze".into(),
            submit: "/submit".into(),
            review: "/review".into(),
            submit_success: "/submit_success".into(),
        }
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            fallback: FALLBACK_COORDS,
            wizard_located_zoom: 19,
            wizard_fallback_zoom: 12,
            upload_located_zoom: 18,
            upload_fallback_zoom: 13,
            street: TileLayerConfig {
                url: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".into(),
                attribution: "&copy; OpenStreetMap contributors".into(),
                max_zoom: Some(19),
            },
            satellite: TileLayerConfig {
                url: "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}".into(),
                attribution: "Tiles &copy; Esri &mdash; Source: Esri, i-cubed, USDA, USGS, AEX, GeoEye, Getmapping, Aerogrid, IGN, IGP, UPR-EGP, and the GIS User Community".into(),
                max_zoom: None,
            },
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

impl Default for GeolocationConfig {
    fn default() -> Self {
        Self { timeout_ms: 8000 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.endpoints.analyze, "/analyze");
        assert_eq!(config.endpoints.submit_success, "/submit_success");
        assert_eq!(config.map.fallback, Coordinates::new(22.5726, 88.3639));
        assert_eq!(config.map.wizard_located_zoom, 19);
        assert_eq!(config.map.wizard_fallback_zoom, 12);
        assert_eq!(config.camera.width, 1280);
        assert_eq!(config.geolocation.timeout_ms, 8000);
        assert_eq!(config.categories.len(), 7);
    }

    #[test]
    fn test_from_json_partial_override() {
        let json = r#"{
            "endpoints": {"analyze": "/api/analyze"},
            "map": {"upload_located_zoom": 17}
        }"#;

        let config = ClientConfig::from_json(json).expect("設定の読み込み失敗");
        assert_eq!(config.endpoints.analyze, "/api/analyze");
        assert_eq!(config.endpoints.submit, "/submit"); // 既定値
        assert_eq!(config.map.upload_located_zoom, 17);
        assert_eq!(config.map.upload_fallback_zoom, 13);
        assert_eq!(config.theme_key, "theme");
    }

    #[test]
    fn test_from_json_empty_object() {
        let config = ClientConfig::from_json("{}").expect("設定の読み込み失敗");
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_from_json_rejects_empty_categories() {
        let result = ClientConfig::from_json(r#"{"categories": []}"#);
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_from_json_malformed() {
        let result = ClientConfig::from_json("{not json");
        assert!(matches!(result, Err(Error::Json(_))));
    }
}
