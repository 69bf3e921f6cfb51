use crate::state::SlotState;
use crate::{
    AppState, FileKind, OutputArea, RunState, Slot, StagedFile, ToastId, ToastKind,
    UNAVAILABLE_NOTICE, UNAVAILABLE_TITLE,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppViewModel {
    pub active_tab: Slot,
    pub tabs: Vec<TabView>,
    pub panels: Vec<PanelView>,
    pub toasts: Vec<ToastView>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabView {
    pub slot: Slot,
    pub title: &'static str,
    pub active: bool,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelView {
    Available(SlotPanelView),
    Unavailable {
        slot: Slot,
        title: &'static str,
        notice: &'static str,
    },
}

impl PanelView {
    pub fn slot(&self) -> Slot {
        match self {
            PanelView::Available(panel) => panel.slot,
            PanelView::Unavailable { slot, .. } => *slot,
        }
    }

    pub fn as_available(&self) -> Option<&SlotPanelView> {
        match self {
            PanelView::Available(panel) => Some(panel),
            PanelView::Unavailable { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotPanelView {
    pub slot: Slot,
    pub title: &'static str,
    pub drop_hint: &'static str,
    pub drag_active: bool,
    /// The file list (and its clear button) is hidden while nothing is staged.
    pub list_visible: bool,
    pub files: Vec<FileRowView>,
    pub trigger: TriggerView,
    pub output: OutputView,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRowView {
    pub name: String,
    pub thumbnail: Thumbnail,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Thumbnail {
    Image { mime: String, byte_len: usize },
    PdfIcon,
    GenericIcon,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerView {
    pub label: String,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputView {
    Empty,
    Loading,
    Downloads {
        status: String,
        links: Vec<DownloadLink>,
        /// Filename of the artifact previewed inline, if any.
        preview: Option<String>,
    },
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadLink {
    pub filename: String,
    pub label: String,
    pub byte_len: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToastView {
    pub id: ToastId,
    pub kind: ToastKind,
    pub message: String,
}

impl AppViewModel {
    pub(crate) fn build(state: &AppState) -> Self {
        let active_tab = state.active_tab();
        let tabs = Slot::ALL
            .iter()
            .map(|&slot| TabView {
                slot,
                title: slot.spec().title,
                active: slot == active_tab,
                enabled: state.is_available(slot),
            })
            .collect();
        let panels = Slot::ALL
            .iter()
            .map(|&slot| build_panel(slot, state.slot(slot)))
            .collect();
        let toasts = state
            .toasts()
            .iter()
            .map(|toast| ToastView {
                id: toast.id,
                kind: toast.kind,
                message: toast.message.clone(),
            })
            .collect();

        Self {
            active_tab,
            tabs,
            panels,
            toasts,
            dirty: state.is_dirty(),
        }
    }

    pub fn panel(&self, slot: Slot) -> &PanelView {
        // Panels are built for every slot in `Slot::ALL` order.
        &self.panels[slot.index()]
    }
}

fn build_panel(slot: Slot, state: &SlotState) -> PanelView {
    let spec = slot.spec();
    if !state.available {
        return PanelView::Unavailable {
            slot,
            title: UNAVAILABLE_TITLE,
            notice: UNAVAILABLE_NOTICE,
        };
    }

    let running = state.run.is_running();
    let label = match state.run {
        RunState::Running {
            percent: Some(percent),
            ..
        } => format!("{} {percent}%", spec.busy_label),
        RunState::Running { percent: None, .. } => spec.busy_label.to_string(),
        RunState::Idle | RunState::Done | RunState::Failed => spec.trigger_label.to_string(),
    };

    PanelView::Available(SlotPanelView {
        slot,
        title: spec.title,
        drop_hint: spec.drop_hint,
        drag_active: state.drag_active,
        list_visible: !state.files.is_empty(),
        files: state.files.iter().map(file_row).collect(),
        trigger: TriggerView {
            label,
            enabled: !running && !state.files.is_empty(),
        },
        output: output_view(slot, &state.output),
    })
}

fn file_row(file: &StagedFile) -> FileRowView {
    let thumbnail = match file.kind() {
        FileKind::Image => Thumbnail::Image {
            mime: file.mime.clone(),
            byte_len: file.len(),
        },
        FileKind::Document => Thumbnail::PdfIcon,
        FileKind::Other => Thumbnail::GenericIcon,
    };
    FileRowView {
        name: file.name.clone(),
        thumbnail,
    }
}

fn output_view(slot: Slot, output: &OutputArea) -> OutputView {
    match output {
        OutputArea::Empty => OutputView::Empty,
        OutputArea::Loading => OutputView::Loading,
        OutputArea::Error(message) => OutputView::Error(message.clone()),
        OutputArea::Result(result) => OutputView::Downloads {
            status: result.status.clone(),
            links: result
                .artifacts
                .iter()
                .map(|artifact| DownloadLink {
                    filename: artifact.filename.clone(),
                    label: slot.download_label(&artifact.filename),
                    byte_len: artifact.bytes.len(),
                })
                .collect(),
            preview: if result.preview {
                result.artifacts.first().map(|a| a.filename.clone())
            } else {
                None
            },
        },
    }
}
