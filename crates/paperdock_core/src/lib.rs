//! Paperdock core: pure session state machine and view-model helpers.
mod effect;
mod msg;
mod slot;
mod staged;
mod state;
mod update;
mod upload;
mod view_model;

pub use effect::{Effect, TOAST_DURATION};
pub use msg::Msg;
pub use slot::{Slot, SlotSpec, UNAVAILABLE_NOTICE, UNAVAILABLE_TITLE};
pub use staged::{classify_mime, AddMode, FileKind, StagedFile};
pub use state::{
    AppState, Artifact, ConversionResult, OutputArea, RunId, RunState, Toast, ToastId, ToastKind,
};
pub use update::update;
pub use upload::{Binding, Disposition, SurfaceEvent, UploadBinder};
pub use view_model::{
    AppViewModel, DownloadLink, FileRowView, OutputView, PanelView, SlotPanelView, TabView,
    Thumbnail, ToastView, TriggerView,
};
