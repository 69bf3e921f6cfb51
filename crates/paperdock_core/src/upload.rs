use crate::{AddMode, Msg, Slot, StagedFile};

/// Raw interaction on a slot's drop zone, picker, or clear button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceEvent {
    DragEnter,
    DragOver,
    DragLeave,
    Drop(Vec<StagedFile>),
    PickerChanged(Vec<StagedFile>),
    ClearClicked,
}

/// Whether the host must suppress its own handling of the event
/// (navigating to a dropped file, for instance).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    PreventDefault,
    Default,
}

/// Messages produced for one surface event, in dispatch order.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub msgs: Vec<Msg>,
    pub disposition: Disposition,
}

/// Wires one slot's drop zone and picker to the staged-file set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadBinder {
    slot: Slot,
    allows_multiple: bool,
}

impl UploadBinder {
    pub fn new(slot: Slot) -> Self {
        Self {
            slot,
            allows_multiple: slot.spec().allows_multiple,
        }
    }

    pub fn bind(&self, event: SurfaceEvent) -> Binding {
        let slot = self.slot;
        match event {
            SurfaceEvent::DragEnter | SurfaceEvent::DragOver => Binding {
                msgs: vec![Msg::DragActive { slot, active: true }],
                disposition: Disposition::PreventDefault,
            },
            SurfaceEvent::DragLeave => Binding {
                msgs: vec![Msg::DragActive {
                    slot,
                    active: false,
                }],
                disposition: Disposition::PreventDefault,
            },
            SurfaceEvent::Drop(files) => Binding {
                msgs: vec![
                    Msg::DragActive {
                        slot,
                        active: false,
                    },
                    self.files_added(files),
                ],
                disposition: Disposition::PreventDefault,
            },
            SurfaceEvent::PickerChanged(files) => Binding {
                msgs: vec![self.files_added(files)],
                disposition: Disposition::PreventDefault,
            },
            SurfaceEvent::ClearClicked => Binding {
                msgs: vec![Msg::ClearClicked { slot }],
                disposition: Disposition::Default,
            },
        }
    }

    fn files_added(&self, files: Vec<StagedFile>) -> Msg {
        Msg::FilesAdded {
            slot: self.slot,
            files,
            mode: AddMode::for_input(self.allows_multiple),
        }
    }
}
