//! 地図表示と位置マーカー
//!
//! - MapCanvas: 地図ウィジェットの抽象（ブラウザ側は Leaflet）
//! - PinnedMap: 地図とマーカー1本の組。マーカーは常に高々1本
//! - Placement: 位置情報の結果から初期表示を決める

use crate::config::{MapConfig, TileLayerConfig};
use crate::device::GeoError;
use crate::types::Coordinates;

/// 地図の中心とズーム
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapView {
    pub center: Coordinates,
    pub zoom: u8,
}

impl MapView {
    pub const fn new(center: Coordinates, zoom: u8) -> Self {
        Self { center, zoom }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseLayer {
    Street,
    Satellite,
}

/// レイヤ切替コントロールに並べる1項目
#[derive(Debug, Clone, PartialEq)]
pub struct LayerChoice {
    pub label: &'static str,
    pub layer: BaseLayer,
    pub tiles: TileLayerConfig,
}

/// 地図生成時のパラメータ
#[derive(Debug, Clone, PartialEq)]
pub struct MapSetup {
    pub view: MapView,
    /// 先頭が既定レイヤ
    pub layers: Vec<LayerChoice>,
}

impl MapSetup {
    /// 通報ウィザード用（道路地図が既定）
    pub fn wizard(view: MapView, config: &MapConfig) -> Self {
        Self {
            view,
            layers: vec![
                LayerChoice {
                    label: "Street View",
                    layer: BaseLayer::Street,
                    tiles: config.street.clone(),
                },
                LayerChoice {
                    label: "Satellite View",
                    layer: BaseLayer::Satellite,
                    tiles: config.satellite.clone(),
                },
            ],
        }
    }

    /// アップロード画面用（衛星写真が既定）
    pub fn upload(view: MapView, config: &MapConfig) -> Self {
        Self {
            view,
            layers: vec![
                LayerChoice {
                    label: "Satellite",
                    layer: BaseLayer::Satellite,
                    tiles: config.satellite.clone(),
                },
                LayerChoice {
                    label: "Street",
                    layer: BaseLayer::Street,
                    tiles: config.street.clone(),
                },
            ],
        }
    }

    pub fn default_layer(&self) -> Option<&LayerChoice> {
        self.layers.first()
    }
}

/// 地図ウィジェット
pub trait MapCanvas {
    fn set_view(&mut self, view: MapView);
    fn add_marker(&mut self, at: Coordinates);
    fn move_marker(&mut self, at: Coordinates);
    /// 地図を破棄する。以後このインスタンスは使わない
    fn destroy(&mut self);
}

/// 通報位置を表すピン
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocationMarker {
    pub position: Coordinates,
    pub placed_on_map: bool,
}

/// 地図とマーカー1本
pub struct PinnedMap<M: MapCanvas> {
    canvas: M,
    marker: Option<LocationMarker>,
}

impl<M: MapCanvas> PinnedMap<M> {
    pub fn new(canvas: M) -> Self {
        Self {
            canvas,
            marker: None,
        }
    }

    /// 初回はマーカーを作成し、以降は既存のマーカーを移動する
    pub fn pin(&mut self, at: Coordinates) {
        match &mut self.marker {
            Some(marker) => {
                self.canvas.move_marker(at);
                marker.position = at;
            }
            None => {
                self.canvas.add_marker(at);
                self.marker = Some(LocationMarker {
                    position: at,
                    placed_on_map: true,
                });
            }
        }
    }

    pub fn recenter(&mut self, view: MapView) {
        self.canvas.set_view(view);
    }

    pub fn marker(&self) -> Option<&LocationMarker> {
        self.marker.as_ref()
    }

    pub fn position(&self) -> Option<Coordinates> {
        self.marker.map(|m| m.position)
    }

    pub fn canvas(&self) -> &M {
        &self.canvas
    }

    pub fn destroy(mut self) {
        self.canvas.destroy();
        log::debug!("map destroyed");
    }
}

/// 位置情報の結果から決めた初期表示
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub view: MapView,
    pub located: bool,
}

impl Placement {
    /// 取得成功なら現在地を `located_zoom` で、失敗なら `fallback` を表示する
    pub fn resolve(
        fix: &Result<Coordinates, GeoError>,
        located_zoom: u8,
        fallback: MapView,
    ) -> Self {
        match fix {
            Ok(coords) => Self {
                view: MapView::new(*coords, located_zoom),
                located: true,
            },
            Err(e) => {
                log::warn!("geolocation failed, using fallback location: {}", e);
                Self {
                    view: fallback,
                    located: false,
                }
            }
        }
    }
}
