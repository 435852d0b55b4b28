//! 通報フロー全体のシナリオテスト
//!
//! 公開APIだけを使い、撮影 → 位置 → 解析 → レビュー → 送信 の流れを検証

use civic_report_common::api::SubmitResponse;
use civic_report_common::review::SUBMIT_REJECTED_ALERT;
use civic_report_common::{
    parse_analyze_response, CameraStream, CaptureController, CaptureTab, ClientConfig,
    Coordinates, Destination, GeoError, LocationStatus, MapCanvas, MapView, Platform,
    ReportWizard, ReviewController, SubmitOutcome, Theme, ThemeController, ThemeStore,
    WizardPhase,
};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[derive(Clone)]
struct Stream(Rc<Cell<bool>>);

impl CameraStream for Stream {
    fn stop(&self) {
        self.0.set(false);
    }
    fn is_active(&self) -> bool {
        self.0.get()
    }
}

#[derive(Clone, Default)]
struct Map {
    markers: Rc<Cell<usize>>,
    last_view: Rc<Cell<Option<MapView>>>,
    removed: Rc<Cell<bool>>,
}

impl MapCanvas for Map {
    fn set_view(&mut self, view: MapView) {
        self.last_view.set(Some(view));
    }
    fn add_marker(&mut self, _at: Coordinates) {
        self.markers.set(self.markers.get() + 1);
    }
    fn move_marker(&mut self, _at: Coordinates) {}
    fn destroy(&mut self) {
        self.removed.set(true);
    }
}

struct Browser;

impl Platform for Browser {
    type Stream = Stream;
    type Map = Map;
    type Image = Vec<u8>;
}

#[derive(Clone, Default)]
struct Storage(Rc<RefCell<Option<String>>>);

impl ThemeStore for Storage {
    fn load(&self, _key: &str) -> Option<String> {
        self.0.borrow().clone()
    }
    fn save(&mut self, _key: &str, value: &str) -> civic_report_common::Result<()> {
        *self.0.borrow_mut() = Some(value.to_string());
        Ok(())
    }
}

fn live_stream() -> Stream {
    Stream(Rc::new(Cell::new(true)))
}

/// 位置情報を拒否 → 既定位置 → ピン調整 → 解析成功 → レビュー → 送信成功
#[test]
fn test_wizard_denied_location_to_submit_success() {
    let config = ClientConfig::default();
    let mut wizard: ReportWizard<Browser> = ReportWizard::new(config.map.clone());

    // Step1: カメラで撮影
    let stream = live_stream();
    wizard.start_camera().unwrap();
    wizard.camera_ready(stream.clone()).unwrap();
    wizard.capture_frame(vec![0xFF, 0xD8]).unwrap();
    assert!(!stream.is_active());

    // Step2: 位置情報拒否
    wizard.proceed_to_location().unwrap();
    assert_eq!(wizard.status(), LocationStatus::Requesting);
    let map = Map::default();
    let probe = map.clone();
    wizard
        .location_resolved(Err(GeoError::PermissionDenied("User denied".into())), |setup| {
            assert_eq!(setup.view.zoom, 12);
            Ok(map)
        })
        .unwrap();
    assert!(wizard.status().to_string().contains("Location access denied"));
    assert_eq!(
        probe.last_view.get().map(|v| v.center),
        Some(Coordinates::new(22.5726, 88.3639))
    );

    wizard.map_clicked(Coordinates::new(22.58, 88.37)).unwrap();
    assert_eq!(probe.markers.get(), 1);

    // 解析
    let submission = wizard.confirm_location().unwrap();
    assert_eq!(submission.file_name, Some("capture.jpg"));
    let result = parse_analyze_response(
        r#"{"category":"Pothole","severity":8,"draft_en":"Dear Sir","draft_bn":"মহাশয়"}"#,
    )
    .unwrap();
    let dest = wizard
        .analysis_succeeded(&result, &config.endpoints.review)
        .unwrap();
    assert_eq!(dest.path, "/review");

    // レビュー画面（クエリから復元）
    let draft = civic_report_common::AnalysisResult::from_query_pairs(dest.query.clone());
    let mut review = ReviewController::new(config.categories.clone(), "Pothole", draft);
    let request = review.begin_submit().unwrap();
    assert_eq!(request.category, "Pothole");
    assert_eq!(request.draft_en, "Dear Sir");

    let response: SubmitResponse = serde_json::from_str(r#"{"success": true}"#).unwrap();
    assert_eq!(
        review.submit_finished(&response, &config.endpoints.submit_success),
        SubmitOutcome::Navigate(Destination::new("/submit_success"))
    );
}

/// `/analyze` が error を返した場合は Step1 に戻り、画像・位置・地図を破棄する
#[test]
fn test_wizard_backend_error_returns_to_step1() {
    let mut wizard: ReportWizard<Browser> = ReportWizard::new(ClientConfig::default().map);
    wizard.choose_file(vec![1, 2, 3]).unwrap();
    wizard.proceed_to_location().unwrap();
    let map = Map::default();
    let probe = map.clone();
    wizard
        .location_resolved(Ok(Coordinates::new(22.6, 88.4)), |_| Ok(map))
        .unwrap();
    wizard.confirm_location().unwrap();

    let err = parse_analyze_response(r#"{"error":"no issue detected"}"#).unwrap_err();
    let alert = wizard.analysis_failed(&err);

    assert!(alert.contains("no issue detected"));
    assert_eq!(wizard.phase(), WizardPhase::AwaitingImageChoice);
    assert!(!wizard.has_image());
    assert!(wizard.map().is_none());
    assert!(probe.removed.get());
}

/// ライブ撮影とアップロードを行き来してもカメラが残らない
#[test]
fn test_capture_tabs_release_camera() {
    let config = ClientConfig::default();
    let mut capture: CaptureController<Browser> =
        CaptureController::new(config.camera, config.map.clone());

    let first = live_stream();
    capture.activate_live_mode();
    capture.live_stream_ready(first.clone());
    capture.toggle_upload_mode();
    assert!(!first.is_active());

    let second = live_stream();
    capture.activate_live_mode();
    capture.live_stream_ready(second.clone());
    capture.live_location(Ok(Coordinates::new(22.5, 88.3)), "10:00".into());
    capture.capture_photo(vec![0x89, 0x50]).unwrap();
    assert!(!second.is_active());

    capture.set_consent(CaptureTab::Live, true);
    let submission = capture.begin_submit("now").unwrap();
    assert_eq!(submission.form.timestamp.as_deref(), Some("10:00"));
    assert_eq!(submission.form.location, Some(Coordinates::new(22.5, 88.3)));
}

/// テーマ切替は2回で元に戻る
#[test]
fn test_theme_toggle_involution() {
    let storage = Storage::default();
    let mut theme = ThemeController::load(storage.clone(), "theme");
    assert_eq!(theme.theme(), Theme::Light);

    theme.toggle().unwrap();
    assert_eq!(storage.0.borrow().as_deref(), Some("dark"));
    theme.toggle().unwrap();
    assert_eq!(theme.theme(), Theme::Light);
    assert_eq!(storage.0.borrow().as_deref(), Some("light"));

    let reloaded = ThemeController::load(storage, "theme");
    assert_eq!(reloaded.theme(), Theme::Light);
}

/// 送信失敗時はその場で警告する
#[test]
fn test_review_rejection_alerts_in_place() {
    let mut review = ReviewController::new(
        ClientConfig::default().categories,
        "Other",
        Default::default(),
    );
    review.begin_submit().unwrap();
    let response: SubmitResponse = serde_json::from_str(r#"{"success": false}"#).unwrap();
    assert_eq!(
        review.submit_finished(&response, "/submit_success"),
        SubmitOutcome::Alert(SUBMIT_REJECTED_ALERT)
    );
}
