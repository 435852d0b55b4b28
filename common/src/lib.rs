//! Civic Report Common Library
//!
//! ブラウザ(WASM)のページコントローラが使う型と状態管理。
//! カメラ・地図・ストレージはトレイト越しに扱うので、ネイティブでテストできる。

pub mod api;
pub mod capture;
pub mod config;
pub mod device;
pub mod error;
pub mod map;
pub mod navigation;
pub mod platform;
pub mod review;
pub mod theme;
pub mod types;
pub mod wizard;

#[cfg(test)]
mod testing;

pub use api::{
    interpret_analyze_response, parse_analyze_response, AnalyzeForm, AnalyzeSubmission,
    SubmitRequest, SubmitResponse,
};
pub use capture::{CaptureController, CaptureSnapshot, CaptureTab, LiveView};
pub use config::ClientConfig;
pub use device::{CameraStream, GeoError, GeoOptions, VideoConstraints};
pub use error::{Error, Result};
pub use map::{MapCanvas, MapSetup, MapView, PinnedMap};
pub use navigation::Destination;
pub use platform::Platform;
pub use review::{ReviewController, SubmitOutcome};
pub use theme::{Theme, ThemeController, ThemeStore};
pub use types::{AnalysisResult, CaptureMode, Coordinates};
pub use wizard::{LocationStatus, ReportWizard, WizardPhase, WizardSnapshot, WizardStep};
