//! 位置情報（navigator.geolocation）

use civic_report_common::{Coordinates, GeoError, GeoOptions};
use futures::channel::oneshot;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{GeolocationPosition, GeolocationPositionError, PositionOptions};

type Fix = Result<Coordinates, GeoError>;

/// 現在地を1回だけ取得する
pub async fn current_position(options: GeoOptions) -> Fix {
    let navigator = gloo::utils::window().navigator();
    let supported = js_sys::Reflect::has(&navigator, &JsValue::from_str("geolocation"))
        .unwrap_or(false);
    if !supported {
        return Err(GeoError::Unsupported);
    }
    let geolocation = navigator.geolocation().map_err(|_| GeoError::Unsupported)?;

    // 成功・失敗どちらか一方だけが呼ばれる
    let (tx, rx) = oneshot::channel::<Fix>();
    let tx = Rc::new(RefCell::new(Some(tx)));

    let on_success = {
        let tx = tx.clone();
        Closure::once(move |position: JsValue| {
            send(&tx, Ok(read_position(position)));
        })
    };
    let on_error = {
        let tx = tx.clone();
        Closure::once(move |error: JsValue| {
            send(&tx, Err(read_error(error)));
        })
    };

    geolocation
        .get_current_position_with_error_callback_and_options(
            on_success.as_ref().unchecked_ref(),
            Some(on_error.as_ref().unchecked_ref()),
            &position_options(options),
        )
        .map_err(|e| GeoError::PositionUnavailable(crate::js_error::describe(&e)))?;

    rx.await
        .unwrap_or_else(|_| Err(GeoError::PositionUnavailable("callback dropped".into())))
}

fn send(tx: &Rc<RefCell<Option<oneshot::Sender<Fix>>>>, fix: Fix) {
    if let Some(tx) = tx.borrow_mut().take() {
        let _ = tx.send(fix);
    }
}

fn position_options(options: GeoOptions) -> PositionOptions {
    let js = PositionOptions::new();
    js.set_enable_high_accuracy(options.high_accuracy);
    if let Some(timeout) = options.timeout_ms {
        js.set_timeout(timeout);
    }
    if let Some(maximum_age) = options.maximum_age_ms {
        js.set_maximum_age(maximum_age);
    }
    js
}

fn read_position(value: JsValue) -> Coordinates {
    let coords = value.unchecked_into::<GeolocationPosition>().coords();
    Coordinates::new(coords.latitude(), coords.longitude())
}

fn read_error(value: JsValue) -> GeoError {
    let error = value.unchecked_into::<GeolocationPositionError>();
    GeoError::from_code(error.code(), error.message())
}
