//! ページごとのマウント
//!
//! サーバが描画した各ページに置かれたホスト要素を探し、対応するコンポーネントを
//! 差し込む。テーマ切替はすべてのページ共通。

use crate::components::capture_page::CapturePage;
use crate::components::report_wizard::ReportWizardPage;
use crate::components::review_form::ReviewForm;
use crate::components::theme_toggle::ThemeToggle;
use crate::config::load_client_config;
use crate::navigation::draft_from_query;
use leptos::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::HtmlElement;

pub const THEME_HOST_ID: &str = "theme-toggle";
pub const CAPTURE_HOST_ID: &str = "capture-app";
pub const REPORT_HOST_ID: &str = "report-app";
pub const REVIEW_HOST_ID: &str = "review-app";
/// サーバが推定カテゴリを書き込む要素
pub const GUESSED_CATEGORY_ID: &str = "guessed-category";

fn host(id: &str) -> Option<HtmlElement> {
    gloo::utils::document()
        .get_element_by_id(id)?
        .dyn_into::<HtmlElement>()
        .ok()
}

/// `id` の要素があればその中にマウントする
fn mount_into<F, N>(id: &str, view: F) -> bool
where
    F: FnOnce() -> N + 'static,
    N: IntoView,
{
    let Some(parent) = host(id) else {
        return false;
    };
    leptos::mount::mount_to(parent, view).forget();
    log::debug!("mounted #{}", id);
    true
}

/// ページ上のホスト要素に応じてコンポーネントを起動する
pub fn mount_pages() {
    let config = load_client_config();

    let theme_key = config.theme_key.clone();
    mount_into(THEME_HOST_ID, move || view! { <ThemeToggle storage_key=theme_key /> });

    if host(CAPTURE_HOST_ID).is_some() {
        mount_into(CAPTURE_HOST_ID, move || view! { <CapturePage config=config /> });
    } else if host(REPORT_HOST_ID).is_some() {
        mount_into(REPORT_HOST_ID, move || view! { <ReportWizardPage config=config /> });
    } else if host(REVIEW_HOST_ID).is_some() {
        let guessed = host(GUESSED_CATEGORY_ID)
            .and_then(|el| el.text_content())
            .unwrap_or_default();
        let draft = draft_from_query();
        mount_into(REVIEW_HOST_ID, move || {
            view! { <ReviewForm config=config guessed_category=guessed draft=draft /> }
        });
    } else {
        log::debug!("no controller host on this page");
    }
}
