//! ライブ撮影タブ

use super::capture_page::{submit_capture, Capture};
use super::{dispatch, display, LocalStored};
use crate::device::camera;
use civic_report_common::config::Endpoints;
use civic_report_common::{CaptureSnapshot, CaptureTab, LiveView};
use leptos::html;
use leptos::prelude::*;
use leptos::task::spawn_local;

const LIVE_MIME_TYPE: &str = "image/png";

#[component]
pub fn LivePanel(
    capture: LocalStored<Capture>,
    snapshot: ReadSignal<CaptureSnapshot>,
    set_snapshot: WriteSignal<CaptureSnapshot>,
    video_ref: NodeRef<html::Video>,
    endpoints: Endpoints,
) -> impl IntoView {
    let canvas_ref = NodeRef::<html::Canvas>::new();
    let endpoints = StoredValue::new(endpoints);
    let live_view = move || snapshot.get().live_view;

    let on_snap = move |_| {
        let (Some(video), Some(canvas)) = (video_ref.get_untracked(), canvas_ref.get_untracked())
        else {
            return;
        };
        spawn_local(async move {
            match camera::capture_frame(&video, &canvas, LIVE_MIME_TYPE).await {
                Ok(blob) => {
                    if let Some(Err(e)) = dispatch(capture, set_snapshot, |c| c.capture_photo(blob)) {
                        log::debug!("{}", e);
                    }
                    video.set_src_object(None);
                }
                Err(e) => log::error!("{}", e),
            }
        });
    };

    let on_pledge = move |ev: leptos::ev::Event| {
        let checked = event_target_checked(&ev);
        dispatch(capture, set_snapshot, |c| c.set_consent(CaptureTab::Live, checked));
    };

    view! {
        <div id="live-mode" style:display=move || display(snapshot.get().tab == CaptureTab::Live)>
            <div class="camera-frame">
                <video
                    id="video"
                    autoplay=true
                    playsinline=true
                    prop:muted=true
                    node_ref=video_ref
                    style:display=move || display(live_view() != LiveView::Still)
                ></video>
                <canvas
                    id="canvas"
                    node_ref=canvas_ref
                    style:display=move || display(live_view() == LiveView::Still)
                ></canvas>
            </div>
            <button
                id="snap"
                class="btn btn-primary mt-2"
                disabled=move || live_view() != LiveView::Feed
                on:click=on_snap
            >
                <i class="fas fa-camera"></i>" Capture"
            </button>

            <ul class="list-unstyled mt-3">
                <li>"Latitude: "<span id="lat">{move || snapshot.get().live_location.map(|c| c.lat.to_string()).unwrap_or_default()}</span></li>
                <li>"Longitude: "<span id="lon">{move || snapshot.get().live_location.map(|c| c.lon.to_string()).unwrap_or_default()}</span></li>
                <li>"Time: "<span id="timestamp">{move || snapshot.get().live_timestamp.unwrap_or_default()}</span></li>
            </ul>

            <div class="form-check">
                <input
                    id="live-pledge"
                    class="form-check-input"
                    type="checkbox"
                    prop:checked=move || snapshot.get().live_consent
                    on:change=on_pledge
                />
                <label class="form-check-label" for="live-pledge">
                    "I confirm this report is genuine and taken at the reported location."
                </label>
            </div>

            <button
                id="analyze-btn"
                class="btn btn-success mt-2"
                disabled=move || !snapshot.get().can_submit
                on:click=move |_| submit_capture(capture, set_snapshot, endpoints.get_value())
            >
                "Analyze"
            </button>
        </div>
    }
}
