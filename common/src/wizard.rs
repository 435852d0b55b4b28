//! 2ステップ通報ウィザード
//!
//! Step1（画像の取得）→ Step2（位置の確認）→ 解析中 → レビュー画面へ遷移。
//! 失敗時はすべて破棄して Step1 に戻る。
//!
//! 状態遷移は `transition` に集約し、`ReportWizard` はそれに従って
//! カメラ・画像・地図を出し入れする。

use crate::api::{AnalyzeForm, AnalyzeSubmission};
use crate::config::MapConfig;
use crate::device::{CameraStream, FacingMode, GeoError, StreamSlot, VideoConstraints};
use crate::error::{Error, Result};
use crate::map::{MapSetup, PinnedMap, Placement};
use crate::navigation::Destination;
use crate::platform::Platform;
use crate::types::{AnalysisResult, Coordinates};
use std::fmt;

pub const CAMERA_DENIED_ALERT: &str =
    "Could not access the camera. Please ensure you grant permission.";
pub const IMAGE_REQUIRED_ALERT: &str = "Please provide an image first.";
pub const MAP_UNAVAILABLE_ALERT: &str = "Could not load the map:";

const CAPTURE_FILE_NAME: &str = "capture.jpg";

/// ウィザードの状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardPhase {
    AwaitingImageChoice,
    /// カメラ許可待ち
    StartingCamera,
    LiveCameraActive,
    PreviewingImage,
    /// Step2表示済み、位置情報待ち
    LocatingUser,
    Step2LocationPick,
    Analyzing,
    /// 解析成功、レビュー画面へ遷移中
    Submitted,
}

impl WizardPhase {
    pub fn name(&self) -> &'static str {
        match self {
            WizardPhase::AwaitingImageChoice => "AwaitingImageChoice",
            WizardPhase::StartingCamera => "StartingCamera",
            WizardPhase::LiveCameraActive => "LiveCameraActive",
            WizardPhase::PreviewingImage => "PreviewingImage",
            WizardPhase::LocatingUser => "LocatingUser",
            WizardPhase::Step2LocationPick => "Step2LocationPick",
            WizardPhase::Analyzing => "Analyzing",
            WizardPhase::Submitted => "Submitted",
        }
    }

    /// どのコンテナを表示するか
    pub fn step(&self) -> WizardStep {
        match self {
            WizardPhase::AwaitingImageChoice
            | WizardPhase::StartingCamera
            | WizardPhase::LiveCameraActive
            | WizardPhase::PreviewingImage => WizardStep::Image,
            WizardPhase::LocatingUser | WizardPhase::Step2LocationPick => WizardStep::Location,
            WizardPhase::Analyzing | WizardPhase::Submitted => WizardStep::Loading,
        }
    }

    /// Step1 の案内文
    pub fn prompt(&self) -> &'static str {
        match self {
            WizardPhase::LiveCameraActive => "Point your camera at the issue and capture.",
            WizardPhase::PreviewingImage => "Confirm your image to proceed.",
            _ => "How would you like to provide an image of the issue?",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    Image,
    Location,
    Loading,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardEvent {
    StartCamera,
    CameraReady,
    CameraFailed,
    ImageChosen,
    ProceedToLocation,
    LocationResolved,
    ConfirmLocation,
    AnalysisSucceeded,
    AnalysisFailed,
    Reset,
}

impl WizardEvent {
    pub fn name(&self) -> &'static str {
        match self {
            WizardEvent::StartCamera => "StartCamera",
            WizardEvent::CameraReady => "CameraReady",
            WizardEvent::CameraFailed => "CameraFailed",
            WizardEvent::ImageChosen => "ImageChosen",
            WizardEvent::ProceedToLocation => "ProceedToLocation",
            WizardEvent::LocationResolved => "LocationResolved",
            WizardEvent::ConfirmLocation => "ConfirmLocation",
            WizardEvent::AnalysisSucceeded => "AnalysisSucceeded",
            WizardEvent::AnalysisFailed => "AnalysisFailed",
            WizardEvent::Reset => "Reset",
        }
    }
}

/// 状態遷移表
pub fn transition(phase: WizardPhase, event: WizardEvent) -> Result<WizardPhase> {
    use WizardEvent as E;
    use WizardPhase as P;

    let next = match (phase, event) {
        (_, E::Reset) => P::AwaitingImageChoice,
        (P::AwaitingImageChoice, E::StartCamera) => P::StartingCamera,
        (P::StartingCamera, E::CameraReady) => P::LiveCameraActive,
        (P::StartingCamera, E::CameraFailed) => P::AwaitingImageChoice,
        (P::AwaitingImageChoice | P::LiveCameraActive | P::PreviewingImage, E::ImageChosen) => {
            P::PreviewingImage
        }
        (P::PreviewingImage, E::ProceedToLocation) => P::LocatingUser,
        (P::LocatingUser, E::LocationResolved) => P::Step2LocationPick,
        (P::Step2LocationPick, E::ConfirmLocation) => P::Analyzing,
        (P::Analyzing, E::AnalysisSucceeded) => P::Submitted,
        (P::Analyzing, E::AnalysisFailed) => P::AwaitingImageChoice,
        (phase, event) => {
            return Err(Error::InvalidTransition {
                phase: phase.name(),
                event: event.name(),
            })
        }
    };
    Ok(next)
}

/// Step2 の案内表示
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocationStatus {
    Idle,
    Requesting,
    Found,
    Denied,
    MarkerMoved(Coordinates),
}

impl LocationStatus {
    /// 強調表示する見出し
    pub fn headline(&self) -> Option<&'static str> {
        match self {
            LocationStatus::Found => Some("Location found!"),
            LocationStatus::Denied => Some("Location access denied."),
            _ => None,
        }
    }

    /// 見出しに続く本文
    pub fn detail(&self) -> String {
        match self {
            LocationStatus::Idle => String::new(),
            LocationStatus::Requesting => "Requesting your location...".to_string(),
            LocationStatus::Found => "Tap on the map to pinpoint the exact spot.".to_string(),
            LocationStatus::Denied => "Tap on the map to place the marker correctly.".to_string(),
            LocationStatus::MarkerMoved(at) => format!("Marker moved to: {}", at),
        }
    }
}

impl fmt::Display for LocationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.headline() {
            Some(headline) => write!(f, "{} {}", headline, self.detail()),
            None => f.write_str(&self.detail()),
        }
    }
}

/// 画面描画用のスナップショット
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WizardSnapshot {
    pub phase: WizardPhase,
    pub status: LocationStatus,
    pub has_image: bool,
    pub camera_live: bool,
    pub map_open: bool,
}

/// 通報ウィザードのコントローラ
pub struct ReportWizard<P: Platform> {
    phase: WizardPhase,
    camera: StreamSlot<P::Stream>,
    image: Option<(P::Image, Option<&'static str>)>,
    map: Option<PinnedMap<P::Map>>,
    status: LocationStatus,
    map_config: MapConfig,
}

impl<P: Platform> ReportWizard<P> {
    pub fn new(map_config: MapConfig) -> Self {
        Self {
            phase: WizardPhase::AwaitingImageChoice,
            camera: StreamSlot::new(),
            image: None,
            map: None,
            status: LocationStatus::Idle,
            map_config,
        }
    }

    pub fn phase(&self) -> WizardPhase {
        self.phase
    }

    pub fn status(&self) -> LocationStatus {
        self.status
    }

    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    pub fn map(&self) -> Option<&PinnedMap<P::Map>> {
        self.map.as_ref()
    }

    pub fn snapshot(&self) -> WizardSnapshot {
        WizardSnapshot {
            phase: self.phase,
            status: self.status,
            has_image: self.image.is_some(),
            camera_live: self.camera.is_live(),
            map_open: self.map.is_some(),
        }
    }

    fn apply(&mut self, event: WizardEvent) -> Result<()> {
        let next = transition(self.phase, event)?;
        log::debug!("wizard: {} --{}--> {}", self.phase.name(), event.name(), next.name());
        self.phase = next;
        Ok(())
    }

    // =============================================
    // Step1: 画像
    // =============================================

    /// 背面カメラの起動を開始し、要求すべき制約を返す
    pub fn start_camera(&mut self) -> Result<VideoConstraints> {
        self.apply(WizardEvent::StartCamera)?;
        Ok(VideoConstraints::facing(FacingMode::Environment))
    }

    /// カメラ許可が下りた
    ///
    /// 許可待ちの間にリセットされていた場合はストリームを止めてエラーを返す。
    pub fn camera_ready(&mut self, stream: P::Stream) -> Result<()> {
        if let Err(e) = self.apply(WizardEvent::CameraReady) {
            stream.stop();
            return Err(e);
        }
        self.camera.attach(stream);
        Ok(())
    }

    /// カメラ許可が得られなかった。警告文を返して初期状態に戻す
    pub fn camera_failed(&mut self, error: &Error) -> &'static str {
        log::warn!("camera unavailable: {}", error);
        self.reset();
        CAMERA_DENIED_ALERT
    }

    /// 撮影したフレームを画像として確定する
    pub fn capture_frame(&mut self, image: P::Image) -> Result<()> {
        if self.phase != WizardPhase::LiveCameraActive {
            return Err(Error::InvalidTransition {
                phase: self.phase.name(),
                event: WizardEvent::ImageChosen.name(),
            });
        }
        self.accept_image(image, Some(CAPTURE_FILE_NAME))
    }

    /// ファイル選択で画像を受け取る
    pub fn choose_file(&mut self, image: P::Image) -> Result<()> {
        self.accept_image(image, None)
    }

    fn accept_image(&mut self, image: P::Image, file_name: Option<&'static str>) -> Result<()> {
        self.apply(WizardEvent::ImageChosen)?;
        self.camera.release();
        self.image = Some((image, file_name));
        Ok(())
    }

    // =============================================
    // Step2: 位置
    // =============================================

    /// Step2 へ進む。画像が無ければ `MissingImage`
    pub fn proceed_to_location(&mut self) -> Result<()> {
        if self.image.is_none() {
            return Err(Error::MissingImage);
        }
        self.apply(WizardEvent::ProceedToLocation)?;
        self.status = LocationStatus::Requesting;
        Ok(())
    }

    /// 位置情報の結果を受けて地図とピンを用意する
    ///
    /// 成功時は現在地をズーム19、失敗時は既定位置をズーム12で表示する。
    /// 地図が既にあれば作り直さずに表示位置とピンだけ更新する。
    pub fn location_resolved<F>(
        &mut self,
        fix: std::result::Result<Coordinates, GeoError>,
        build: F,
    ) -> Result<Placement>
    where
        F: FnOnce(&MapSetup) -> Result<P::Map>,
    {
        if self.phase != WizardPhase::LocatingUser {
            return Err(Error::InvalidTransition {
                phase: self.phase.name(),
                event: WizardEvent::LocationResolved.name(),
            });
        }
        let placement = Placement::resolve(
            &fix,
            self.map_config.wizard_located_zoom,
            self.map_config.wizard_fallback(),
        );

        let map = match self.map.take() {
            Some(existing) => existing,
            None => PinnedMap::new(build(&MapSetup::wizard(placement.view, &self.map_config))?),
        };
        let map = self.map.insert(map);
        map.recenter(placement.view);
        map.pin(placement.view.center);

        self.status = if placement.located {
            LocationStatus::Found
        } else {
            LocationStatus::Denied
        };
        self.apply(WizardEvent::LocationResolved)?;
        Ok(placement)
    }

    /// 地図クリックでピンを移動する
    pub fn map_clicked(&mut self, at: Coordinates) -> Result<()> {
        let map = match (self.phase, self.map.as_mut()) {
            (WizardPhase::Step2LocationPick, Some(map)) => map,
            _ => {
                return Err(Error::InvalidTransition {
                    phase: self.phase.name(),
                    event: "MapClicked",
                })
            }
        };
        map.pin(at);
        self.status = LocationStatus::MarkerMoved(at);
        Ok(())
    }

    /// 位置を確定して解析リクエストを組み立てる
    ///
    /// 位置はピンの現在位置（ユーザーが動かした位置）を使う。
    pub fn confirm_location(&mut self) -> Result<AnalyzeSubmission<P::Image>> {
        let location = self
            .map
            .as_ref()
            .and_then(|m| m.position())
            .ok_or(Error::MissingLocation)?;
        let (image, file_name) = self.image.clone().ok_or(Error::MissingImage)?;
        self.apply(WizardEvent::ConfirmLocation)?;

        Ok(AnalyzeSubmission {
            image,
            file_name,
            form: AnalyzeForm {
                mode: None,
                location: Some(location),
                timestamp: None,
            },
        })
    }

    // =============================================
    // 解析結果
    // =============================================

    pub fn analysis_succeeded(
        &mut self,
        result: &AnalysisResult,
        review_path: &str,
    ) -> Result<Destination> {
        self.apply(WizardEvent::AnalysisSucceeded)?;
        Ok(Destination::review(review_path, result))
    }

    /// 解析失敗。警告文を返してすべて破棄する
    pub fn analysis_failed(&mut self, error: &Error) -> String {
        log::error!("analysis error: {}", error);
        self.reset();
        format!("An unexpected error occurred during analysis: {}", error)
    }

    /// 地図を作れなかった。警告文を返してすべて破棄する
    pub fn map_failed(&mut self, error: &Error) -> String {
        log::error!("map unavailable: {}", error);
        self.reset();
        format!("{} {}", MAP_UNAVAILABLE_ALERT, error)
    }

    /// 唯一のリセット経路。どの状態からでも何度でも呼べる
    pub fn reset(&mut self) {
        self.camera.release();
        self.image = None;
        if let Some(map) = self.map.take() {
            map.destroy();
        }
        self.status = LocationStatus::Idle;
        self.phase = WizardPhase::AwaitingImageChoice;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeMap, FakePlatform, FakeStream};

    fn wizard() -> ReportWizard<FakePlatform> {
        ReportWizard::new(MapConfig::default())
    }

    fn wizard_at_step2(fix: std::result::Result<Coordinates, GeoError>) -> (ReportWizard<FakePlatform>, FakeMap) {
        let mut w = wizard();
        w.choose_file("photo.jpg".into()).unwrap();
        w.proceed_to_location().unwrap();
        let canvas = FakeMap::new();
        let probe = canvas.clone();
        w.location_resolved(fix, move |_| Ok(canvas)).unwrap();
        (w, probe)
    }

    #[test]
    fn test_transition_table_happy_path() {
        use WizardEvent as E;
        use WizardPhase as P;

        let mut phase = P::AwaitingImageChoice;
        for event in [
            E::StartCamera,
            E::CameraReady,
            E::ImageChosen,
            E::ProceedToLocation,
            E::LocationResolved,
            E::ConfirmLocation,
            E::AnalysisSucceeded,
        ] {
            phase = transition(phase, event).unwrap();
        }
        assert_eq!(phase, P::Submitted);
    }

    #[test]
    fn test_transition_rejects_skipping_steps() {
        let err = transition(WizardPhase::AwaitingImageChoice, WizardEvent::ConfirmLocation).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidTransition {
                phase: "AwaitingImageChoice",
                event: "ConfirmLocation"
            }
        ));
        assert!(transition(WizardPhase::Analyzing, WizardEvent::StartCamera).is_err());
    }

    #[test]
    fn test_reset_allowed_from_every_phase() {
        for phase in [
            WizardPhase::AwaitingImageChoice,
            WizardPhase::StartingCamera,
            WizardPhase::LiveCameraActive,
            WizardPhase::PreviewingImage,
            WizardPhase::LocatingUser,
            WizardPhase::Step2LocationPick,
            WizardPhase::Analyzing,
            WizardPhase::Submitted,
        ] {
            assert_eq!(
                transition(phase, WizardEvent::Reset).unwrap(),
                WizardPhase::AwaitingImageChoice
            );
        }
    }

    #[test]
    fn test_phase_steps_and_prompts() {
        assert_eq!(WizardPhase::LiveCameraActive.step(), WizardStep::Image);
        assert_eq!(WizardPhase::LocatingUser.step(), WizardStep::Location);
        assert_eq!(WizardPhase::Analyzing.step(), WizardStep::Loading);
        assert_eq!(
            WizardPhase::AwaitingImageChoice.prompt(),
            "How would you like to provide an image of the issue?"
        );
        assert_eq!(WizardPhase::PreviewingImage.prompt(), "Confirm your image to proceed.");
    }

    #[test]
    fn test_camera_capture_releases_stream() {
        let mut w = wizard();
        let stream = FakeStream::new();

        let constraints = w.start_camera().unwrap();
        assert_eq!(constraints.facing_mode, Some(FacingMode::Environment));
        w.camera_ready(stream.clone()).unwrap();
        assert!(w.snapshot().camera_live);

        w.capture_frame("frame".into()).unwrap();
        assert!(!stream.is_active());
        assert_eq!(w.phase(), WizardPhase::PreviewingImage);
    }

    #[test]
    fn test_camera_denied_resets() {
        let mut w = wizard();
        w.start_camera().unwrap();

        let alert = w.camera_failed(&Error::DevicePermission("NotAllowedError".into()));
        assert_eq!(alert, CAMERA_DENIED_ALERT);
        assert_eq!(w.phase(), WizardPhase::AwaitingImageChoice);
    }

    #[test]
    fn test_camera_ready_after_cancel_stops_stream() {
        let mut w = wizard();
        let stream = FakeStream::new();
        w.start_camera().unwrap();
        w.reset();

        assert!(w.camera_ready(stream.clone()).is_err());
        assert!(!stream.is_active());
    }

    #[test]
    fn test_capture_after_cancel_is_rejected() {
        let mut w = wizard();
        w.start_camera().expect("カメラ起動失敗");
        w.camera_ready(FakeStream::new()).expect("カメラ接続失敗");
        w.reset();

        assert!(w.capture_frame("late-frame".into()).is_err());
        assert!(!w.has_image());
        assert_eq!(w.phase(), WizardPhase::AwaitingImageChoice);
    }

    #[test]
    fn test_proceed_without_image() {
        let mut w = wizard();
        assert!(matches!(w.proceed_to_location(), Err(Error::MissingImage)));
        assert_eq!(w.phase(), WizardPhase::AwaitingImageChoice);
    }

    #[test]
    fn test_location_found_zooms_in() {
        let fix = Coordinates::new(22.6, 88.45);
        let (w, map) = wizard_at_step2(Ok(fix));

        assert_eq!(w.phase(), WizardPhase::Step2LocationPick);
        assert_eq!(w.status(), LocationStatus::Found);
        assert_eq!(map.views().last().map(|v| v.zoom), Some(19));
        assert_eq!(w.map().and_then(|m| m.position()), Some(fix));
    }

    #[test]
    fn test_location_denied_uses_fallback() {
        let (w, map) = wizard_at_step2(Err(GeoError::PermissionDenied("denied".into())));

        assert!(w.status().to_string().contains("Location access denied"));
        let view = map.views().last().copied().unwrap();
        assert_eq!(view.center, Coordinates::new(22.5726, 88.3639));
        assert_eq!(view.zoom, 12);
        assert_eq!(map.markers_added(), 1);
    }

    #[test]
    fn test_map_click_moves_single_marker() {
        let (mut w, map) = wizard_at_step2(Err(GeoError::Timeout("slow".into())));

        w.map_clicked(Coordinates::new(22.51234, 88.31234)).unwrap();
        w.map_clicked(Coordinates::new(22.52, 88.32)).unwrap();

        assert_eq!(map.markers_added(), 1);
        assert_eq!(map.moves().len(), 2);
        assert_eq!(w.status().to_string(), "Marker moved to: 22.52000, 88.32000");
    }

    #[test]
    fn test_confirm_uses_adjusted_marker_position() {
        let (mut w, _) = wizard_at_step2(Ok(Coordinates::new(22.6, 88.45)));
        let adjusted = Coordinates::new(22.61, 88.46);
        w.map_clicked(adjusted).unwrap();

        let submission = w.confirm_location().unwrap();
        assert_eq!(submission.form.location, Some(adjusted));
        assert_eq!(submission.form.mode, None);
        assert_eq!(submission.image, "photo.jpg");
        assert_eq!(w.phase(), WizardPhase::Analyzing);
    }

    #[test]
    fn test_backend_error_resets_everything() {
        let (mut w, map) = wizard_at_step2(Ok(Coordinates::new(22.6, 88.45)));
        w.confirm_location().unwrap();

        let alert = w.analysis_failed(&Error::Backend("no issue detected".into()));
        assert!(alert.contains("no issue detected"));
        assert_eq!(w.phase(), WizardPhase::AwaitingImageChoice);
        assert!(!w.has_image());
        assert!(w.map().is_none());
        assert!(map.destroyed());
    }

    #[test]
    fn test_reset_is_idempotent() {
        let (mut w, _) = wizard_at_step2(Ok(Coordinates::new(22.6, 88.45)));

        w.reset();
        let first = w.snapshot();
        w.reset();
        assert_eq!(w.snapshot(), first);
        assert_eq!(first.phase, WizardPhase::AwaitingImageChoice);
        assert!(!first.camera_live && !first.map_open && !first.has_image);
    }

    /// 各状態まで進めたウィザードと、そこで保持しているフェイク
    fn wizard_in(phase: WizardPhase) -> (ReportWizard<FakePlatform>, Option<FakeStream>, Option<FakeMap>) {
        let mut w = wizard();
        match phase {
            WizardPhase::AwaitingImageChoice => (w, None, None),
            WizardPhase::StartingCamera => {
                w.start_camera().expect("カメラ起動失敗");
                (w, None, None)
            }
            WizardPhase::LiveCameraActive => {
                let stream = FakeStream::new();
                w.start_camera().expect("カメラ起動失敗");
                w.camera_ready(stream.clone()).expect("カメラ接続失敗");
                (w, Some(stream), None)
            }
            WizardPhase::PreviewingImage => {
                let stream = FakeStream::new();
                w.start_camera().expect("カメラ起動失敗");
                w.camera_ready(stream.clone()).expect("カメラ接続失敗");
                w.capture_frame("frame".into()).expect("撮影失敗");
                (w, Some(stream), None)
            }
            WizardPhase::LocatingUser => {
                w.choose_file("photo.jpg".into()).expect("画像選択失敗");
                w.proceed_to_location().expect("Step2遷移失敗");
                (w, None, None)
            }
            WizardPhase::Step2LocationPick => {
                let (w, map) = wizard_at_step2(Ok(Coordinates::new(22.6, 88.45)));
                (w, None, Some(map))
            }
            WizardPhase::Analyzing => {
                let (mut w, map) = wizard_at_step2(Ok(Coordinates::new(22.6, 88.45)));
                w.confirm_location().expect("位置確定失敗");
                (w, None, Some(map))
            }
            WizardPhase::Submitted => {
                let (mut w, map) = wizard_at_step2(Ok(Coordinates::new(22.6, 88.45)));
                w.confirm_location().expect("位置確定失敗");
                w.analysis_succeeded(&AnalysisResult::default(), "/review")
                    .expect("解析成功遷移失敗");
                (w, None, Some(map))
            }
        }
    }

    #[test]
    fn test_reset_from_every_reachable_phase_releases_resources() {
        for phase in [
            WizardPhase::AwaitingImageChoice,
            WizardPhase::StartingCamera,
            WizardPhase::LiveCameraActive,
            WizardPhase::PreviewingImage,
            WizardPhase::LocatingUser,
            WizardPhase::Step2LocationPick,
            WizardPhase::Analyzing,
            WizardPhase::Submitted,
        ] {
            let (mut w, stream, map) = wizard_in(phase);
            assert_eq!(w.phase(), phase);

            w.reset();
            let first = w.snapshot();
            w.reset();
            assert_eq!(w.snapshot(), first, "{}", phase.name());

            assert_eq!(first.phase, WizardPhase::AwaitingImageChoice);
            assert!(!first.camera_live && !first.map_open && !first.has_image);
            assert_eq!(first.status, LocationStatus::Idle);
            if let Some(stream) = stream {
                assert!(!stream.is_active(), "{}", phase.name());
            }
            if let Some(map) = map {
                assert!(map.destroyed(), "{}", phase.name());
            }
        }
    }

    #[test]
    fn test_map_failure_resets_with_alert() {
        let mut w = wizard();
        w.choose_file("photo.jpg".into()).expect("画像選択失敗");
        w.proceed_to_location().expect("Step2遷移失敗");
        let err = w
            .location_resolved(Err(GeoError::Unsupported), |_| {
                Err(Error::Map("L is not defined".into()))
            })
            .unwrap_err();

        let alert = w.map_failed(&err);
        assert_eq!(alert, "Could not load the map: Map error: L is not defined");
        assert!(alert.starts_with(MAP_UNAVAILABLE_ALERT));
        assert_eq!(w.phase(), WizardPhase::AwaitingImageChoice);
        assert!(!w.has_image());
    }

    #[test]
    fn test_success_navigates_to_review() {
        let (mut w, _) = wizard_at_step2(Ok(Coordinates::new(22.6, 88.45)));
        w.confirm_location().unwrap();
        let result = AnalysisResult {
            category: "Pothole".into(),
            severity: "7".into(),
            ..Default::default()
        };

        let dest = w.analysis_succeeded(&result, "/review").unwrap();
        assert_eq!(dest.path, "/review");
        assert_eq!(w.phase(), WizardPhase::Submitted);
    }
}
