//! 撮影・アップロード画面（タブ切替）
//!
//! タブの切替でカメラの起動・解放と、アップロード用地図の初期化を行う。
//! 各タブの入力と送信は `LivePanel` / `UploadPanel` が受け持つ。

use super::live_panel::LivePanel;
use super::upload_panel::UploadPanel;
use super::{dispatch, LocalStored};
use crate::api;
use crate::device::{camera, geolocation, local_timestamp};
use crate::leaflet::LeafletCanvas;
use crate::navigation;
use crate::platform::WebPlatform;
use civic_report_common::config::Endpoints;
use civic_report_common::{
    CaptureController, CaptureSnapshot, CaptureTab, ClientConfig, Coordinates, GeoOptions,
};
use gloo::dialogs::alert;
use gloo::timers::future::TimeoutFuture;
use leptos::html;
use leptos::prelude::*;
use leptos::task::spawn_local;

pub type Capture = CaptureController<WebPlatform>;

/// 地図を表示してからサイズを再計算するまでの待ち
const MAP_RESIZE_DELAY_MS: u32 = 10;

/// 現在のタブの内容を `/analyze` に送り、成功したらレビュー画面へ
pub fn submit_capture(
    capture: LocalStored<Capture>,
    set_snapshot: WriteSignal<CaptureSnapshot>,
    endpoints: Endpoints,
) {
    let now = local_timestamp();
    let submission = match dispatch(capture, set_snapshot, |c| c.begin_submit(&now)) {
        Some(Ok(submission)) => submission,
        Some(Err(e)) => {
            log::debug!("submit ignored: {}", e);
            return;
        }
        None => return,
    };
    spawn_local(async move {
        match api::analyze(&endpoints.analyze, &submission).await {
            Ok(result) => {
                let destination =
                    capture.try_with_value(|c| c.submit_succeeded(&result, &endpoints.review));
                if let Some(destination) = destination {
                    if let Err(e) = navigation::navigate(&destination) {
                        log::error!("{}", e);
                    }
                }
            }
            Err(e) => {
                dispatch(capture, set_snapshot, |c| c.submit_failed(&e));
            }
        }
    });
}

/// カメラと位置情報を並行して要求する
fn open_live_tab(
    capture: LocalStored<Capture>,
    set_snapshot: WriteSignal<CaptureSnapshot>,
    video_ref: NodeRef<html::Video>,
) {
    let Some(constraints) = dispatch(capture, set_snapshot, |c| c.activate_live_mode()) else {
        return;
    };

    spawn_local(async move {
        match camera::request_camera(&constraints).await {
            Ok(stream) => {
                let media = stream.media_stream().clone();
                let attached = dispatch(capture, set_snapshot, |c| c.live_stream_ready(stream));
                if attached == Some(true) {
                    if let Some(video) = video_ref.get_untracked() {
                        video.set_src_object(Some(&media));
                    }
                }
            }
            Err(e) => {
                if let Some(message) = dispatch(capture, set_snapshot, |c| c.live_stream_failed(&e)) {
                    alert(message);
                }
            }
        }
    });

    spawn_local(async move {
        let fix = geolocation::current_position(GeoOptions::default()).await;
        let timestamp = local_timestamp();
        dispatch(capture, set_snapshot, |c| c.live_location(fix, timestamp));
    });
}

/// アップロード用地図を1回だけ作る
fn init_upload_map(
    capture: LocalStored<Capture>,
    set_snapshot: WriteSignal<CaptureSnapshot>,
    map_ref: NodeRef<html::Div>,
) {
    if dispatch(capture, set_snapshot, |c| c.begin_map_init()) != Some(true) {
        return;
    }
    spawn_local(async move {
        let fix = geolocation::current_position(GeoOptions::default()).await;
        let Some(container) = map_ref.get_untracked() else {
            log::warn!("map container is not mounted");
            return;
        };
        let on_click = move |at: Coordinates| {
            if let Some(Err(e)) = dispatch(capture, set_snapshot, |c| c.map_clicked(at)) {
                log::debug!("{}", e);
            }
        };
        let ready = dispatch(capture, set_snapshot, |c| {
            c.map_ready(fix, |setup| LeafletCanvas::mount(&container, setup, on_click))
        });
        match ready {
            Some(Ok(_)) => {
                TimeoutFuture::new(MAP_RESIZE_DELAY_MS).await;
                capture.try_with_value(|c| {
                    if let Some(map) = c.map() {
                        map.canvas().invalidate_size();
                    }
                });
            }
            Some(Err(e)) => log::error!("upload map unavailable: {}", e),
            None => {}
        }
    });
}

#[component]
pub fn CapturePage(config: ClientConfig) -> impl IntoView {
    let capture: LocalStored<Capture> =
        StoredValue::new_local(CaptureController::new(config.camera, config.map.clone()));
    let (snapshot, set_snapshot) = signal(capture.with_value(|c| c.snapshot()));

    let video_ref = NodeRef::<html::Video>::new();
    let map_ref = NodeRef::<html::Div>::new();

    let tab = move || snapshot.get().tab;
    let tab_class = move |target: CaptureTab| {
        move || {
            if tab() == target {
                "nav-link active"
            } else {
                "nav-link"
            }
        }
    };

    let show_live = move |_| {
        if snapshot.get_untracked().tab == CaptureTab::Live {
            return;
        }
        open_live_tab(capture, set_snapshot, video_ref);
    };

    let show_upload = move |_| {
        let needs_map = dispatch(capture, set_snapshot, |c| c.toggle_upload_mode()).unwrap_or(false);
        if let Some(video) = video_ref.get_untracked() {
            video.set_src_object(None);
        }
        if needs_map {
            init_upload_map(capture, set_snapshot, map_ref);
        }
    };

    // 既定タブはアップロードなので、表示後に地図を用意する
    Effect::new(move |_| init_upload_map(capture, set_snapshot, map_ref));

    on_cleanup(move || {
        capture.try_update_value(|c| {
            c.toggle_upload_mode();
        });
    });

    view! {
        <div class="capture-page">
            <ul class="nav nav-tabs mb-3">
                <li class="nav-item">
                    <button id="upload-tab" class=tab_class(CaptureTab::Upload) on:click=show_upload>
                        <i class="fas fa-upload"></i>" Upload"
                    </button>
                </li>
                <li class="nav-item">
                    <button id="live-tab" class=tab_class(CaptureTab::Live) on:click=show_live>
                        <i class="fas fa-camera"></i>" Live"
                    </button>
                </li>
            </ul>

            <UploadPanel
                capture=capture
                snapshot=snapshot
                set_snapshot=set_snapshot
                map_ref=map_ref
                endpoints=config.endpoints.clone()
            />
            <LivePanel
                capture=capture
                snapshot=snapshot
                set_snapshot=set_snapshot
                video_ref=video_ref
                endpoints=config.endpoints
            />
        </div>
    }
}
