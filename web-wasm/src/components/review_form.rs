//! レビュー画面
//!
//! 推定カテゴリを選択済みにして表示し、編集後の本文を `/submit` に送る。

use crate::api;
use crate::navigation;
use civic_report_common::{AnalysisResult, ClientConfig, ReviewController, SubmitOutcome};
use gloo::dialogs::alert;
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn ReviewForm(config: ClientConfig, guessed_category: String, draft: AnalysisResult) -> impl IntoView {
    let severity = draft.severity.clone();
    let initial_en = draft.draft_en.clone();
    let draft_bn = draft.draft_bn.clone();
    let review = RwSignal::new(ReviewController::new(config.categories, &guessed_category, draft));
    let endpoints = StoredValue::new(config.endpoints);

    let on_submit = move |_| {
        let request = match review.try_update(|r| r.begin_submit()) {
            Some(Ok(request)) => request,
            Some(Err(e)) => {
                log::debug!("submit ignored: {}", e);
                return;
            }
            None => return,
        };
        let endpoints = endpoints.get_value();
        spawn_local(async move {
            let outcome = match api::submit(&endpoints.submit, &request).await {
                Ok(response) => review.try_update(|r| r.submit_finished(&response, &endpoints.submit_success)),
                Err(e) => review
                    .try_update(|r| r.submit_failed(&e))
                    .map(SubmitOutcome::Alert),
            };
            match outcome {
                Some(SubmitOutcome::Navigate(destination)) => {
                    if let Err(e) = navigation::navigate(&destination) {
                        log::error!("{}", e);
                    }
                }
                Some(SubmitOutcome::Alert(message)) => alert(message),
                None => {}
            }
        });
    };

    let options = review
        .with_untracked(|r| r.categories().to_vec())
        .into_iter()
        .enumerate()
        .map(|(index, category)| {
            view! {
                <option
                    value=category.clone()
                    selected=move || review.with(|r| r.selected() == Some(index))
                >
                    {category.clone()}
                </option>
            }
        })
        .collect_view();

    view! {
        <form id="review-form" on:submit=|ev| ev.prevent_default()>
            <p class="severity">"Severity: "<span id="severity">{severity}</span></p>

            <div class="mb-3">
                <label class="form-label" for="category-select">"Category"</label>
                <select
                    id="category-select"
                    class="form-select"
                    on:change=move |ev| {
                        let value = event_target_value(&ev);
                        review.update(|r| r.select_category(&value));
                    }
                >
                    {options}
                </select>
            </div>

            <div class="mb-3">
                <label class="form-label" for="draft-en">"Complaint (English)"</label>
                <textarea
                    id="draft-en"
                    class="form-control"
                    rows="8"
                    prop:value=initial_en
                    on:input=move |ev| {
                        let text = event_target_value(&ev);
                        review.update(|r| r.edit_draft_en(text));
                    }
                ></textarea>
            </div>

            <div class="mb-3">
                <label class="form-label" for="draft-bn">"Complaint (Bengali)"</label>
                <textarea id="draft-bn" class="form-control" rows="8" readonly=true prop:value=draft_bn></textarea>
            </div>

            <button
                id="submit-btn"
                type="button"
                class="btn btn-primary"
                disabled=move || review.with(|r| r.is_submitting())
                on:click=on_submit
            >
                "Submit Report"
            </button>
        </form>
    }
}
