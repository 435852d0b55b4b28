//! 撮影・アップロード画面の状態管理
//!
//! タブは2つ:
//! - ライブ撮影: カメラ起動 → 撮影 → 同意 → 送信（位置は任意）
//! - アップロード: ファイル選択 → 地図でピン留め → 同意 → 送信
//!
//! 送信可否の判定はタブごとに異なる。ライブ撮影では位置を必須にしない。

use crate::api::{AnalyzeForm, AnalyzeSubmission};
use crate::config::{CameraConfig, MapConfig};
use crate::device::{CameraStream, GeoError, StreamSlot, VideoConstraints};
use crate::error::{Error, Result};
use crate::map::{MapSetup, PinnedMap, Placement};
use crate::navigation::Destination;
use crate::platform::Platform;
use crate::types::{AnalysisResult, CaptureMode, Coordinates};

pub const CAMERA_REQUIRED_ALERT: &str =
    "Camera access is required for Live Mode. Please allow access and try again.";

const LIVE_CAPTURE_FILE_NAME: &str = "live-capture.png";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureTab {
    Upload,
    Live,
}

/// ライブ撮影タブの表示
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiveView {
    Idle,
    /// カメラ許可待ち
    Starting,
    Feed,
    Still,
}

impl LiveView {
    fn name(&self) -> &'static str {
        match self {
            LiveView::Idle => "Idle",
            LiveView::Starting => "Starting",
            LiveView::Feed => "Feed",
            LiveView::Still => "Still",
        }
    }
}

/// アップロード用地図の初期化状態（ページ内で1回だけ）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapInit {
    NotStarted,
    Pending,
    Ready,
}

/// 1タブ分の入力状態
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureState<I> {
    pub image: Option<I>,
    pub location: Option<Coordinates>,
    pub timestamp: Option<String>,
    pub consent_given: bool,
}

impl<I> Default for CaptureState<I> {
    fn default() -> Self {
        Self {
            image: None,
            location: None,
            timestamp: None,
            consent_given: false,
        }
    }
}

impl<I> CaptureState<I> {
    pub fn image_acquired(&self) -> bool {
        self.image.is_some()
    }
}

/// 画面描画用のスナップショット
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureSnapshot {
    pub tab: CaptureTab,
    pub live_view: LiveView,
    pub live_location: Option<Coordinates>,
    pub live_timestamp: Option<String>,
    pub live_consent: bool,
    pub upload_consent: bool,
    pub can_submit: bool,
}

/// 撮影・アップロード画面のコントローラ
pub struct CaptureController<P: Platform> {
    tab: CaptureTab,
    live_view: LiveView,
    stream: StreamSlot<P::Stream>,
    live: CaptureState<P::Image>,
    upload: CaptureState<P::Image>,
    map: Option<PinnedMap<P::Map>>,
    map_init: MapInit,
    submitting: bool,
    camera: CameraConfig,
    map_config: MapConfig,
}

impl<P: Platform> CaptureController<P> {
    pub fn new(camera: CameraConfig, map_config: MapConfig) -> Self {
        Self {
            tab: CaptureTab::Upload,
            live_view: LiveView::Idle,
            stream: StreamSlot::new(),
            live: CaptureState::default(),
            upload: CaptureState::default(),
            map: None,
            map_init: MapInit::NotStarted,
            submitting: false,
            camera,
            map_config,
        }
    }

    pub fn tab(&self) -> CaptureTab {
        self.tab
    }

    pub fn live_view(&self) -> LiveView {
        self.live_view
    }

    pub fn live_state(&self) -> &CaptureState<P::Image> {
        &self.live
    }

    pub fn upload_state(&self) -> &CaptureState<P::Image> {
        &self.upload
    }

    pub fn is_camera_live(&self) -> bool {
        self.stream.is_live()
    }

    pub fn map(&self) -> Option<&PinnedMap<P::Map>> {
        self.map.as_ref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn snapshot(&self) -> CaptureSnapshot {
        CaptureSnapshot {
            tab: self.tab,
            live_view: self.live_view,
            live_location: self.live.location,
            live_timestamp: self.live.timestamp.clone(),
            live_consent: self.live.consent_given,
            upload_consent: self.upload.consent_given,
            can_submit: self.can_submit(),
        }
    }

    // =============================================
    // ライブ撮影
    // =============================================

    /// ライブ撮影タブへ切り替え、要求すべきカメラ制約を返す
    ///
    /// 位置情報はカメラとは独立に要求してよい（`live_location` で受け取る）。
    /// 以前の撮影画像と同意は表示されなくなるので破棄する。
    pub fn activate_live_mode(&mut self) -> VideoConstraints {
        self.tab = CaptureTab::Live;
        self.live_view = LiveView::Starting;
        self.live.image = None;
        self.live.consent_given = false;
        VideoConstraints::resolution(self.camera.width, self.camera.height)
    }

    /// カメラ許可が下りた
    ///
    /// 待っている間に別タブへ移っていた場合はその場で停止して false を返す。
    pub fn live_stream_ready(&mut self, stream: P::Stream) -> bool {
        if self.tab != CaptureTab::Live || self.live_view != LiveView::Starting {
            log::debug!("camera arrived after leaving live view, stopping it");
            stream.stop();
            return false;
        }
        self.stream.attach(stream);
        self.live_view = LiveView::Feed;
        self.live.image = None;
        self.live.consent_given = false;
        true
    }

    /// カメラ許可が得られなかった。表示する警告文を返す
    pub fn live_stream_failed(&mut self, error: &Error) -> &'static str {
        log::warn!("camera unavailable: {}", error);
        self.stream.release();
        self.live_view = LiveView::Idle;
        CAMERA_REQUIRED_ALERT
    }

    /// 位置情報の結果（失敗時は以前の値を残す）
    pub fn live_location(&mut self, fix: std::result::Result<Coordinates, GeoError>, timestamp: String) {
        match fix {
            Ok(coords) => {
                self.live.location = Some(coords);
                self.live.timestamp = Some(timestamp);
            }
            Err(e) => log::warn!("live capture location unavailable: {}", e),
        }
    }

    /// 現在のフレームを静止画として確定し、カメラを解放する
    pub fn capture_photo(&mut self, image: P::Image) -> Result<()> {
        if self.live_view != LiveView::Feed {
            return Err(Error::InvalidTransition {
                phase: self.live_view.name(),
                event: "CapturePhoto",
            });
        }
        self.live.image = Some(image);
        self.live_view = LiveView::Still;
        self.stream.release();
        Ok(())
    }

    /// アップロードタブへ切り替える。地図の初期化が必要なら true
    pub fn toggle_upload_mode(&mut self) -> bool {
        self.tab = CaptureTab::Upload;
        self.stream.release();
        if matches!(self.live_view, LiveView::Starting | LiveView::Feed) {
            self.live_view = LiveView::Idle;
        }
        self.map_init == MapInit::NotStarted
    }

    // =============================================
    // アップロード
    // =============================================

    pub fn choose_file(&mut self, file: Option<P::Image>) {
        self.upload.image = file;
    }

    pub fn set_upload_timestamp(&mut self, timestamp: Option<String>) {
        self.upload.timestamp = timestamp.filter(|t| !t.is_empty());
    }

    pub fn set_consent(&mut self, tab: CaptureTab, given: bool) {
        match tab {
            CaptureTab::Live => self.live.consent_given = given,
            CaptureTab::Upload => self.upload.consent_given = given,
        }
    }

    /// 地図の初期化を開始してよいか（2回目以降は false）
    pub fn begin_map_init(&mut self) -> bool {
        if self.map_init != MapInit::NotStarted {
            return false;
        }
        self.map_init = MapInit::Pending;
        true
    }

    /// 位置情報の結果を受けて地図を生成する
    ///
    /// 成功時は現在地をズーム18、失敗時は既定位置をズーム13で表示する。
    pub fn map_ready<F>(
        &mut self,
        fix: std::result::Result<Coordinates, GeoError>,
        build: F,
    ) -> Result<Placement>
    where
        F: FnOnce(&MapSetup) -> Result<P::Map>,
    {
        let placement = Placement::resolve(
            &fix,
            self.map_config.upload_located_zoom,
            self.map_config.upload_fallback(),
        );
        let setup = MapSetup::upload(placement.view, &self.map_config);
        match build(&setup) {
            Ok(canvas) => {
                self.map = Some(PinnedMap::new(canvas));
                self.map_init = MapInit::Ready;
                log::info!("upload map ready at zoom {}", placement.view.zoom);
                Ok(placement)
            }
            Err(e) => {
                self.map_init = MapInit::NotStarted;
                Err(e)
            }
        }
    }

    /// 地図クリックでピンを置く（既存のピンは移動）
    pub fn map_clicked(&mut self, at: Coordinates) -> Result<()> {
        let map = self.map.as_mut().ok_or(Error::InvalidTransition {
            phase: "MapNotReady",
            event: "MapClicked",
        })?;
        map.pin(at);
        self.upload.location = Some(at);
        Ok(())
    }

    // =============================================
    // 送信
    // =============================================

    /// 現在のタブで送信可能か
    pub fn submit_enabled(&self) -> bool {
        match self.tab {
            CaptureTab::Live => self.live.image_acquired() && self.live.consent_given,
            CaptureTab::Upload => {
                self.upload.image_acquired()
                    && self.upload.consent_given
                    && self.map.as_ref().is_some_and(|m| m.marker().is_some())
            }
        }
    }

    /// 送信ボタンを押せるか（送信中は押せない）
    pub fn can_submit(&self) -> bool {
        self.submit_enabled() && !self.submitting
    }

    /// 送信内容を組み立てて送信中にする
    ///
    /// `now` は撮影日時が未入力のときに使う。
    pub fn begin_submit(&mut self, now: &str) -> Result<AnalyzeSubmission<P::Image>> {
        if !self.can_submit() {
            return Err(Error::NotReady);
        }
        let (state, mode, file_name) = match self.tab {
            CaptureTab::Live => (&self.live, CaptureMode::Live, Some(LIVE_CAPTURE_FILE_NAME)),
            CaptureTab::Upload => (&self.upload, CaptureMode::Upload, None),
        };
        let image = state.image.clone().ok_or(Error::MissingImage)?;
        let location = match mode {
            CaptureMode::Live => state.location,
            CaptureMode::Upload => self.map.as_ref().and_then(|m| m.position()),
        };
        let timestamp = state.timestamp.clone().unwrap_or_else(|| now.to_string());

        self.submitting = true;
        Ok(AnalyzeSubmission {
            image,
            file_name,
            form: AnalyzeForm {
                mode: Some(mode),
                location,
                timestamp: Some(timestamp),
            },
        })
    }

    /// 送信成功。レビュー画面への遷移先を返す
    pub fn submit_succeeded(&self, result: &AnalysisResult, review_path: &str) -> Destination {
        Destination::review(review_path, result)
    }

    /// 送信失敗。画面はそのままで再送信できるようにする
    pub fn submit_failed(&mut self, error: &Error) {
        log::error!("analysis request failed: {}", error);
        self.submitting = false;
    }
}
