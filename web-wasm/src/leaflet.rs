//! Leaflet バインディング
//!
//! ページで読み込まれたグローバル `L` を使う。

use crate::js_error;
use civic_report_common::{Coordinates, Error, MapCanvas, MapSetup, MapView, Result};
use js_sys::{Array, Object, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::HtmlElement;

// ============================================
// JS 側の型と関数
// ============================================

#[wasm_bindgen]
extern "C" {
    type LeafletMap;
    type TileLayer;
    type Marker;
    type LayersControl;

    #[wasm_bindgen(catch, js_namespace = L, js_name = map)]
    fn create_map(container: &HtmlElement, options: &JsValue) -> std::result::Result<LeafletMap, JsValue>;

    #[wasm_bindgen(js_namespace = L, js_name = tileLayer)]
    fn tile_layer(url: &str, options: &JsValue) -> TileLayer;

    #[wasm_bindgen(js_namespace = L, js_name = marker)]
    fn create_marker(at: &JsValue) -> Marker;

    #[wasm_bindgen(js_namespace = ["L", "control"], js_name = layers)]
    fn layers_control(base_layers: &JsValue) -> LayersControl;

    #[wasm_bindgen(method, js_name = setView)]
    fn set_view(this: &LeafletMap, center: &JsValue, zoom: u8);

    #[wasm_bindgen(method, js_name = invalidateSize)]
    fn invalidate_size(this: &LeafletMap);

    #[wasm_bindgen(method)]
    fn on(this: &LeafletMap, event: &str, handler: &js_sys::Function);

    #[wasm_bindgen(method)]
    fn remove(this: &LeafletMap);

    #[wasm_bindgen(method, js_name = addTo)]
    fn add_marker_to(this: &Marker, map: &LeafletMap);

    #[wasm_bindgen(method, js_name = setLatLng)]
    fn set_lat_lng(this: &Marker, at: &JsValue);

    #[wasm_bindgen(method, js_name = addTo)]
    fn add_control_to(this: &LayersControl, map: &LeafletMap);
}

// ============================================
// 変換ヘルパー
// ============================================

fn lat_lng(at: Coordinates) -> JsValue {
    Array::of2(&JsValue::from_f64(at.lat), &JsValue::from_f64(at.lon)).into()
}

fn object(entries: &[(&str, JsValue)]) -> Result<Object> {
    let object = Object::new();
    for (key, value) in entries {
        Reflect::set(&object, &JsValue::from_str(key), value).map_err(js_error::map)?;
    }
    Ok(object)
}

/// クリックイベントの `latlng` を読む
fn event_lat_lng(event: &JsValue) -> Option<Coordinates> {
    let latlng = Reflect::get(event, &JsValue::from_str("latlng")).ok()?;
    let lat = Reflect::get(&latlng, &JsValue::from_str("lat")).ok()?.as_f64()?;
    let lon = Reflect::get(&latlng, &JsValue::from_str("lng")).ok()?.as_f64()?;
    Some(Coordinates::new(lat, lon))
}

// ============================================
// MapCanvas 実装
// ============================================

/// Leaflet の地図1枚とピン
pub struct LeafletCanvas {
    map: LeafletMap,
    marker: Option<Marker>,
    _on_click: Closure<dyn FnMut(JsValue)>,
}

impl LeafletCanvas {
    /// `container` に地図を作り、タイル切替とクリック通知を設定する
    pub fn mount<F>(container: &HtmlElement, setup: &MapSetup, mut on_click: F) -> Result<Self>
    where
        F: FnMut(Coordinates) + 'static,
    {
        let mut tiles = Vec::with_capacity(setup.layers.len());
        for choice in &setup.layers {
            let mut options = vec![("attribution", JsValue::from_str(&choice.tiles.attribution))];
            if let Some(max_zoom) = choice.tiles.max_zoom {
                options.push(("maxZoom", JsValue::from(max_zoom)));
            }
            tiles.push(tile_layer(&choice.tiles.url, &object(&options)?.into()));
        }
        let default_layer = tiles
            .first()
            .ok_or_else(|| Error::Map("no tile layers configured".into()))?;

        let options = object(&[
            ("center", lat_lng(setup.view.center)),
            ("zoom", JsValue::from(setup.view.zoom)),
            ("layers", Array::of1(default_layer).into()),
        ])?;
        let map = create_map(container, &options).map_err(js_error::map)?;

        let base_layers = Object::new();
        for (choice, layer) in setup.layers.iter().zip(&tiles) {
            Reflect::set(&base_layers, &JsValue::from_str(choice.label), layer)
                .map_err(js_error::map)?;
        }
        layers_control(&base_layers).add_control_to(&map);

        let handler = Closure::wrap(Box::new(move |event: JsValue| {
            if let Some(at) = event_lat_lng(&event) {
                on_click(at);
            }
        }) as Box<dyn FnMut(JsValue)>);
        map.on("click", handler.as_ref().unchecked_ref());

        Ok(Self {
            map,
            marker: None,
            _on_click: handler,
        })
    }

    /// コンテナの表示サイズが変わった後に呼ぶ
    pub fn invalidate_size(&self) {
        self.map.invalidate_size();
    }
}

impl MapCanvas for LeafletCanvas {
    fn set_view(&mut self, view: MapView) {
        self.map.set_view(&lat_lng(view.center), view.zoom);
        self.map.invalidate_size();
    }

    fn add_marker(&mut self, at: Coordinates) {
        let marker = create_marker(&lat_lng(at));
        marker.add_marker_to(&self.map);
        self.marker = Some(marker);
    }

    fn move_marker(&mut self, at: Coordinates) {
        if let Some(marker) = &self.marker {
            marker.set_lat_lng(&lat_lng(at));
            return;
        }
        self.add_marker(at);
    }

    fn destroy(&mut self) {
        self.marker = None;
        self.map.remove();
    }
}
