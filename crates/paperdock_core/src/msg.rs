use crate::{AddMode, ConversionResult, RunId, Slot, StagedFile, ToastId};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// A drag entered or left a slot's drop zone.
    DragActive { slot: Slot, active: bool },
    /// Files arrived through a drop or the file picker.
    FilesAdded {
        slot: Slot,
        files: Vec<StagedFile>,
        mode: AddMode,
    },
    /// User clicked the slot's clear button.
    ClearClicked { slot: Slot },
    /// User clicked the slot's conversion trigger.
    TriggerClicked { slot: Slot },
    /// User clicked a tab header.
    TabSelected(Slot),
    /// Startup probe result for a slot's external capability.
    FeatureProbed { slot: Slot, available: bool },
    /// Engine progress for a run, as a fraction in `0.0..=1.0`.
    ConversionProgress {
        slot: Slot,
        run_id: RunId,
        fraction: f32,
    },
    /// Engine completion for a run.
    ConversionSucceeded {
        slot: Slot,
        run_id: RunId,
        result: ConversionResult,
    },
    /// Engine failure for a run. Details are logged by whoever saw them.
    ConversionFailed { slot: Slot, run_id: RunId },
    /// A toast's display time ran out.
    ToastExpired(ToastId),
}
