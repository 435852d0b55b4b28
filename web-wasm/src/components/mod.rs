//! UIコンポーネント

pub mod capture_page;
pub mod live_panel;
pub mod report_wizard;
pub mod review_form;
pub mod theme_toggle;
pub mod upload_panel;

use crate::platform::WebPlatform;
use civic_report_common::{CaptureController, CaptureSnapshot, ReportWizard, WizardSnapshot};
use leptos::prelude::*;
use leptos::reactive::owner::LocalStorage;

/// 非 Send のコントローラをコンポーネント間で共有するためのハンドル
pub type LocalStored<T> = StoredValue<T, LocalStorage>;

/// 画面が購読する状態の写し
pub trait Snapshot {
    type View: Clone + Send + Sync + 'static;

    fn view(&self) -> Self::View;
}

impl Snapshot for ReportWizard<WebPlatform> {
    type View = WizardSnapshot;

    fn view(&self) -> WizardSnapshot {
        self.snapshot()
    }
}

impl Snapshot for CaptureController<WebPlatform> {
    type View = CaptureSnapshot;

    fn view(&self) -> CaptureSnapshot {
        self.snapshot()
    }
}

/// コントローラを操作し、終わったら写しをシグナルへ反映する
///
/// コンポーネントが破棄済みなら None。
pub fn dispatch<C, R>(
    controller: LocalStored<C>,
    view: WriteSignal<C::View>,
    f: impl FnOnce(&mut C) -> R,
) -> Option<R>
where
    C: Snapshot + 'static,
{
    let (out, snapshot) = controller.try_update_value(|c| {
        let out = f(c);
        (out, c.view())
    })?;
    view.set(snapshot);
    Some(out)
}

/// `style:display` 用
pub fn display(visible: bool) -> &'static str {
    if visible {
        "block"
    } else {
        "none"
    }
}

/// 画像プレビュー用の Object URL を差し替える（古いものは解放）
pub fn replace_preview(preview: WriteSignal<Option<String>>, blob: Option<&web_sys::Blob>) {
    let next = blob.and_then(|blob| web_sys::Url::create_object_url_with_blob(blob).ok());
    preview.update(|current| {
        if let Some(old) = std::mem::replace(current, next) {
            let _ = web_sys::Url::revoke_object_url(&old);
        }
    });
}
