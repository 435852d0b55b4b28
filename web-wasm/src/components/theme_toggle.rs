//! テーマ切替アイコン

use crate::storage::LocalThemeStore;
use civic_report_common::theme::DARK_BODY_CLASS;
use civic_report_common::{Theme, ThemeController};
use leptos::prelude::*;

fn apply_body_class(theme: Theme) {
    if let Err(e) = gloo::utils::body()
        .class_list()
        .toggle_with_force(DARK_BODY_CLASS, theme.is_dark())
    {
        log::warn!("failed to update body class: {:?}", e);
    }
}

#[component]
pub fn ThemeToggle(storage_key: String) -> impl IntoView {
    let controller = StoredValue::new_local(ThemeController::load(LocalThemeStore, storage_key));
    let (theme, set_theme) = signal(controller.with_value(|c| c.theme()));

    // 保存済みテーマを即時反映
    apply_body_class(theme.get_untracked());

    let on_click = move |_| {
        match controller.try_update_value(|c| c.toggle()) {
            Some(Ok(next)) => {
                apply_body_class(next);
                set_theme.set(next);
            }
            Some(Err(e)) => log::warn!("theme not saved: {}", e),
            None => {}
        }
    };

    view! {
        <i
            id="theme-toggle-icon"
            class=move || format!("fas {} theme-toggle", theme.get().icon_class())
            role="button"
            title="Toggle theme"
            on:click=on_click
        ></i>
    }
}
