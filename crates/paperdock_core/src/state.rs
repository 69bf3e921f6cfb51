use bytes::Bytes;

use crate::view_model::AppViewModel;
use crate::{AddMode, Slot, StagedFile};

pub type RunId = u64;
pub type ToastId = u64;

/// Orchestrator state of one slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    #[default]
    Idle,
    Running {
        run_id: RunId,
        /// Last reported progress, in whole percent.
        percent: Option<u8>,
    },
    Done,
    Failed,
}

impl RunState {
    pub fn is_running(&self) -> bool {
        matches!(self, RunState::Running { .. })
    }
}

/// One downloadable blob produced by a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub filename: String,
    pub mime: String,
    pub bytes: Bytes,
}

impl Artifact {
    pub fn new(filename: impl Into<String>, mime: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            filename: filename.into(),
            mime: mime.into(),
            bytes: bytes.into(),
        }
    }
}

/// Everything a successful run hands back to the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionResult {
    pub artifacts: Vec<Artifact>,
    pub status: String,
    /// Show the first artifact inline next to its download entry.
    pub preview: bool,
}

/// Content of a slot's output area.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OutputArea {
    #[default]
    Empty,
    Loading,
    Result(ConversionResult),
    Error(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: ToastId,
    pub kind: ToastKind,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SlotState {
    pub(crate) files: Vec<StagedFile>,
    pub(crate) drag_active: bool,
    pub(crate) run: RunState,
    pub(crate) output: OutputArea,
    pub(crate) available: bool,
}

impl Default for SlotState {
    fn default() -> Self {
        Self {
            files: Vec::new(),
            drag_active: false,
            run: RunState::Idle,
            output: OutputArea::Empty,
            available: true,
        }
    }
}

/// Session-scoped state owned by the page controller.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    slots: [SlotState; 3],
    active_tab: Slot,
    toasts: Vec<Toast>,
    next_run_id: RunId,
    next_toast_id: ToastId,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel::build(self)
    }

    /// Currently staged files of `slot`, in insertion order.
    pub fn files(&self, slot: Slot) -> &[StagedFile] {
        &self.slot(slot).files
    }

    pub fn run_state(&self, slot: Slot) -> RunState {
        self.slot(slot).run
    }

    pub fn output(&self, slot: Slot) -> &OutputArea {
        &self.slot(slot).output
    }

    pub fn is_available(&self, slot: Slot) -> bool {
        self.slot(slot).available
    }

    pub fn is_drag_active(&self, slot: Slot) -> bool {
        self.slot(slot).drag_active
    }

    pub fn active_tab(&self) -> Slot {
        self.active_tab
    }

    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    /// Returns whether anything changed since the last call and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub(crate) fn slot(&self, slot: Slot) -> &SlotState {
        &self.slots[slot.index()]
    }

    fn slot_mut(&mut self, slot: Slot) -> &mut SlotState {
        &mut self.slots[slot.index()]
    }

    pub(crate) fn add_files(&mut self, slot: Slot, files: Vec<StagedFile>, mode: AddMode) {
        let state = self.slot_mut(slot);
        match mode {
            AddMode::Append => state.files.extend(files),
            AddMode::Replace => state.files = files,
        }
        self.dirty = true;
    }

    pub(crate) fn clear(&mut self, slot: Slot) {
        let state = self.slot_mut(slot);
        state.files.clear();
        state.output = OutputArea::Empty;
        self.dirty = true;
    }

    pub(crate) fn set_drag_active(&mut self, slot: Slot, active: bool) {
        let state = self.slot_mut(slot);
        if state.drag_active != active {
            state.drag_active = active;
            self.dirty = true;
        }
    }

    pub(crate) fn set_available(&mut self, slot: Slot, available: bool) {
        let state = self.slot_mut(slot);
        state.available = available;
        if !available {
            state.drag_active = false;
        }
        self.dirty = true;
    }

    pub(crate) fn select_tab(&mut self, slot: Slot) {
        if self.active_tab != slot {
            self.active_tab = slot;
            self.dirty = true;
        }
    }

    pub(crate) fn begin_run(&mut self, slot: Slot) -> RunId {
        self.next_run_id += 1;
        let run_id = self.next_run_id;
        let state = self.slot_mut(slot);
        state.run = RunState::Running {
            run_id,
            percent: None,
        };
        state.output = OutputArea::Loading;
        self.dirty = true;
        run_id
    }

    /// True when `run_id` is the run currently in flight for `slot`.
    pub(crate) fn is_current_run(&self, slot: Slot, run_id: RunId) -> bool {
        matches!(self.slot(slot).run, RunState::Running { run_id: current, .. } if current == run_id)
    }

    pub(crate) fn set_progress(&mut self, slot: Slot, percent: u8) {
        let mut changed = false;
        if let RunState::Running { percent: current, .. } = &mut self.slot_mut(slot).run {
            changed = *current != Some(percent);
            *current = Some(percent);
        }
        self.dirty |= changed;
    }

    pub(crate) fn complete_run(&mut self, slot: Slot, result: ConversionResult) {
        let state = self.slot_mut(slot);
        state.run = RunState::Done;
        state.output = OutputArea::Result(result);
        self.dirty = true;
    }

    pub(crate) fn fail_run(&mut self, slot: Slot) {
        let state = self.slot_mut(slot);
        state.run = RunState::Failed;
        state.output = OutputArea::Error(slot.spec().failure_inline.to_string());
        self.dirty = true;
    }

    pub(crate) fn push_toast(&mut self, kind: ToastKind, message: impl Into<String>) -> ToastId {
        self.next_toast_id += 1;
        let id = self.next_toast_id;
        self.toasts.push(Toast {
            id,
            kind,
            message: message.into(),
        });
        self.dirty = true;
        id
    }

    pub(crate) fn expire_toast(&mut self, id: ToastId) {
        let before = self.toasts.len();
        self.toasts.retain(|toast| toast.id != id);
        if self.toasts.len() != before {
            self.dirty = true;
        }
    }
}
