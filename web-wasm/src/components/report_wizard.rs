//! 2ステップ通報ウィザード
//!
//! Step1: ライブ撮影またはファイル選択で画像を用意
//! Step2: 現在地（拒否時は既定位置）の地図でピンを調整
//! 確定後は解析中表示 → 成功ならレビュー画面へ遷移、失敗なら Step1 に戻る

use super::{dispatch, display, replace_preview, LocalStored};
use crate::api;
use crate::device::{camera, geolocation};
use crate::leaflet::LeafletCanvas;
use crate::navigation;
use crate::platform::WebPlatform;
use civic_report_common::wizard::IMAGE_REQUIRED_ALERT;
use civic_report_common::{
    ClientConfig, Coordinates, Error, GeoOptions, ReportWizard, WizardPhase, WizardStep,
};
use gloo::dialogs::alert;
use gloo::timers::future::TimeoutFuture;
use leptos::html;
use leptos::prelude::*;
use leptos::task::spawn_local;
use web_sys::Blob;

type Wizard = ReportWizard<WebPlatform>;

/// Step2 を表示してから地図を作るまでの待ち（コンテナのサイズ確定待ち）
const MAP_RENDER_DELAY_MS: u32 = 150;
const CAPTURE_MIME_TYPE: &str = "image/jpeg";

#[component]
pub fn ReportWizardPage(config: ClientConfig) -> impl IntoView {
    let wizard: LocalStored<Wizard> = StoredValue::new_local(ReportWizard::new(config.map.clone()));
    let (snapshot, set_snapshot) = signal(wizard.with_value(|w| w.snapshot()));
    let (preview_url, set_preview_url) = signal(None::<String>);
    let geo_timeout_ms = config.geolocation.timeout_ms;
    let endpoints = StoredValue::new(config.endpoints);

    let video_ref = NodeRef::<html::Video>::new();
    let canvas_ref = NodeRef::<html::Canvas>::new();
    let file_ref = NodeRef::<html::Input>::new();
    let map_ref = NodeRef::<html::Div>::new();

    let phase = move || snapshot.get().phase;

    // DOM 側の後始末（状態のリセットはコントローラが行う）
    let clear_view = move || {
        replace_preview(set_preview_url, None);
        if let Some(input) = file_ref.get_untracked() {
            input.set_value("");
        }
        if let Some(video) = video_ref.get_untracked() {
            video.set_src_object(None);
        }
    };
    let reset = move || {
        dispatch(wizard, set_snapshot, |w| w.reset());
        clear_view();
    };

    let show_image = move |blob: &Blob| replace_preview(set_preview_url, Some(blob));

    // =============================================
    // Step1: 画像
    // =============================================

    let on_live_capture = move |_| {
        let constraints = match dispatch(wizard, set_snapshot, |w| w.start_camera()) {
            Some(Ok(constraints)) => constraints,
            Some(Err(e)) => {
                log::debug!("{}", e);
                return;
            }
            None => return,
        };
        spawn_local(async move {
            match camera::request_camera(&constraints).await {
                Ok(stream) => {
                    let media = stream.media_stream().clone();
                    match dispatch(wizard, set_snapshot, |w| w.camera_ready(stream)) {
                        Some(Ok(())) => {
                            if let Some(video) = video_ref.get_untracked() {
                                video.set_src_object(Some(&media));
                            }
                        }
                        Some(Err(e)) => log::debug!("camera discarded: {}", e),
                        None => {}
                    }
                }
                Err(e) => {
                    if let Some(message) = dispatch(wizard, set_snapshot, |w| w.camera_failed(&e)) {
                        alert(message);
                    }
                    clear_view();
                }
            }
        });
    };

    let on_capture = move |_| {
        let (Some(video), Some(canvas)) = (video_ref.get_untracked(), canvas_ref.get_untracked())
        else {
            return;
        };
        spawn_local(async move {
            match camera::capture_frame(&video, &canvas, CAPTURE_MIME_TYPE).await {
                Ok(blob) => {
                    let shown = blob.clone();
                    match dispatch(wizard, set_snapshot, |w| w.capture_frame(blob)) {
                        Some(Ok(())) => show_image(&shown),
                        Some(Err(e)) => log::warn!("capture ignored: {}", e),
                        None => {}
                    }
                    video.set_src_object(None);
                }
                Err(e) => log::error!("{}", e),
            }
        });
    };

    let on_upload_click = move |_| {
        if let Some(input) = file_ref.get_untracked() {
            input.click();
        }
    };

    let on_file_chosen = move |ev: leptos::ev::Event| {
        let input: web_sys::HtmlInputElement = event_target(&ev);
        let Some(file) = input.files().and_then(|files| files.get(0)) else {
            return;
        };
        let blob = Blob::from(file);
        show_image(&blob);
        if let Some(Err(e)) = dispatch(wizard, set_snapshot, |w| w.choose_file(blob)) {
            log::warn!("file ignored: {}", e);
        }
        if let Some(video) = video_ref.get_untracked() {
            video.set_src_object(None);
        }
    };

    // =============================================
    // Step2: 位置
    // =============================================

    let on_map_click = move |at: Coordinates| {
        if let Some(Err(e)) = dispatch(wizard, set_snapshot, |w| w.map_clicked(at)) {
            log::debug!("{}", e);
        }
    };

    let on_next = move |_| {
        match dispatch(wizard, set_snapshot, |w| w.proceed_to_location()) {
            Some(Ok(())) => {}
            Some(Err(Error::MissingImage)) => {
                alert(IMAGE_REQUIRED_ALERT);
                return;
            }
            Some(Err(e)) => {
                log::debug!("{}", e);
                return;
            }
            None => return,
        }
        spawn_local(async move {
            let fix = geolocation::current_position(GeoOptions::precise(geo_timeout_ms)).await;
            TimeoutFuture::new(MAP_RENDER_DELAY_MS).await;
            let Some(container) = map_ref.get_untracked() else {
                return;
            };
            let resolved = dispatch(wizard, set_snapshot, |w| {
                w.location_resolved(fix, |setup| LeafletCanvas::mount(&container, setup, on_map_click))
            });
            match resolved {
                Some(Ok(placement)) => log::info!("location step ready (located: {})", placement.located),
                Some(Err(Error::InvalidTransition { .. })) => {}
                Some(Err(e)) => {
                    if let Some(message) = dispatch(wizard, set_snapshot, |w| w.map_failed(&e)) {
                        alert(&message);
                    }
                    clear_view();
                }
                None => {}
            }
        });
    };

    let on_confirm = move |_| {
        let submission = match dispatch(wizard, set_snapshot, |w| w.confirm_location()) {
            Some(Ok(submission)) => submission,
            Some(Err(e)) => {
                log::debug!("{}", e);
                return;
            }
            None => return,
        };
        let endpoints = endpoints.get_value();
        spawn_local(async move {
            match api::analyze(&endpoints.analyze, &submission).await {
                Ok(result) => {
                    match dispatch(wizard, set_snapshot, |w| w.analysis_succeeded(&result, &endpoints.review)) {
                        Some(Ok(destination)) => {
                            if let Err(e) = navigation::navigate(&destination) {
                                log::error!("{}", e);
                            }
                        }
                        Some(Err(e)) => log::debug!("{}", e),
                        None => {}
                    }
                }
                Err(e) => {
                    if let Some(message) = dispatch(wizard, set_snapshot, |w| w.analysis_failed(&e)) {
                        alert(&message);
                    }
                    clear_view();
                }
            }
        });
    };

    // ページ離脱時もカメラを止める
    on_cleanup(move || {
        wizard.try_update_value(|w| w.reset());
    });

    view! {
        <div class="report-wizard">
            <div id="report-step-1" style:display=move || display(phase().step() == WizardStep::Image)>
                <p id="step-1-prompt" class="lead">{move || phase().prompt()}</p>

                <div
                    id="initial-choice-buttons"
                    class="d-grid gap-2"
                    style:display=move || {
                        display(matches!(phase(), WizardPhase::AwaitingImageChoice | WizardPhase::StartingCamera))
                    }
                >
                    <button
                        id="live-capture-btn"
                        class="btn btn-primary btn-lg"
                        disabled=move || phase() == WizardPhase::StartingCamera
                        on:click=on_live_capture
                    >
                        <i class="fas fa-camera"></i>" Live Capture"
                    </button>
                    <button id="upload-btn" class="btn btn-outline-primary btn-lg" on:click=on_upload_click>
                        <i class="fas fa-upload"></i>" Upload Photo"
                    </button>
                </div>
                <input
                    id="image-upload-input"
                    type="file"
                    accept="image/*"
                    style="display: none"
                    node_ref=file_ref
                    on:change=on_file_chosen
                />

                <div id="live-camera-view" style:display=move || display(phase() == WizardPhase::LiveCameraActive)>
                    <video id="camera-video" autoplay=true playsinline=true prop:muted=true node_ref=video_ref></video>
                    <canvas id="camera-canvas" style="display: none" node_ref=canvas_ref></canvas>
                    <div class="d-flex gap-2 mt-2">
                        <button id="capture-btn" class="btn btn-success" on:click=on_capture>"Capture"</button>
                        <button id="cancel-camera-btn" class="btn btn-secondary" on:click=move |_| reset()>"Cancel"</button>
                    </div>
                </div>

                <div id="image-preview-container" style:display=move || display(phase() == WizardPhase::PreviewingImage)>
                    <img id="image-preview" class="img-fluid" alt="Selected issue" src=move || preview_url.get().unwrap_or_default() />
                    <div class="d-flex gap-2 mt-2">
                        <button id="next-step-btn" class="btn btn-primary" on:click=on_next>"Next: Confirm Location"</button>
                        <button id="try-again-btn" class="btn btn-outline-secondary" on:click=move |_| reset()>"Try Again"</button>
                    </div>
                </div>
            </div>

            <div id="report-step-2" style:display=move || display(phase().step() == WizardStep::Location)>
                <p id="location-status">
                    {move || {
                        let status = snapshot.get().status;
                        view! { <strong>{status.headline()}</strong>" "{status.detail()} }
                    }}
                </p>
                <div id="map" class="report-map" node_ref=map_ref></div>
                <button
                    id="confirm-location-btn"
                    class="btn btn-primary mt-2"
                    disabled=move || phase() != WizardPhase::Step2LocationPick
                    on:click=on_confirm
                >
                    "Confirm Location & Analyze"
                </button>
            </div>

            <div id="loading" class="text-center" style:display=move || display(phase().step() == WizardStep::Loading)>
                <div class="spinner-border" role="status"></div>
                <p>"Analyzing your report..."</p>
            </div>
        </div>
    }
}

