//! 写真アップロードタブ

use super::capture_page::{submit_capture, Capture};
use super::{dispatch, display, LocalStored};
use civic_report_common::config::Endpoints;
use civic_report_common::{CaptureSnapshot, CaptureTab};
use leptos::html;
use leptos::prelude::*;
use web_sys::{Blob, HtmlInputElement};

#[component]
pub fn UploadPanel(
    capture: LocalStored<Capture>,
    snapshot: ReadSignal<CaptureSnapshot>,
    set_snapshot: WriteSignal<CaptureSnapshot>,
    map_ref: NodeRef<html::Div>,
    endpoints: Endpoints,
) -> impl IntoView {
    let endpoints = StoredValue::new(endpoints);

    let on_file = move |ev: leptos::ev::Event| {
        let input: HtmlInputElement = event_target(&ev);
        let file = input.files().and_then(|files| files.get(0)).map(Blob::from);
        dispatch(capture, set_snapshot, |c| c.choose_file(file));
    };

    let on_datetime = move |ev: leptos::ev::Event| {
        let value = event_target_value(&ev);
        dispatch(capture, set_snapshot, |c| c.set_upload_timestamp(Some(value)));
    };

    let on_pledge = move |ev: leptos::ev::Event| {
        let checked = event_target_checked(&ev);
        dispatch(capture, set_snapshot, |c| c.set_consent(CaptureTab::Upload, checked));
    };

    view! {
        <div id="upload-mode" style:display=move || display(snapshot.get().tab == CaptureTab::Upload)>
            <div class="mb-3">
                <label class="form-label" for="upload-file">"Photo"</label>
                <input id="upload-file" class="form-control" type="file" accept="image/*" on:change=on_file />
            </div>
            <div class="mb-3">
                <label class="form-label" for="datetime">"Date & time taken"</label>
                <input id="datetime" class="form-control" type="datetime-local" on:change=on_datetime />
            </div>
            <p class="form-text">"Tap the map to mark where the photo was taken."</p>
            <div id="map" class="upload-map" node_ref=map_ref></div>

            <div class="form-check mt-3">
                <input
                    id="civic-pledge"
                    class="form-check-input"
                    type="checkbox"
                    prop:checked=move || snapshot.get().upload_consent
                    on:change=on_pledge
                />
                <label class="form-check-label" for="civic-pledge">
                    "I confirm this report is genuine and the location is accurate."
                </label>
            </div>

            <button
                id="upload-btn"
                class="btn btn-success mt-2"
                disabled=move || !snapshot.get().can_submit
                on:click=move |_| submit_capture(capture, set_snapshot, endpoints.get_value())
            >
                "Analyze"
            </button>
        </div>
    }
}
