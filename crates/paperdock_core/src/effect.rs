use std::time::Duration;

use crate::{RunId, Slot, StagedFile, ToastId};

/// How long a toast stays on screen.
pub const TOAST_DURATION: Duration = Duration::from_millis(4000);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    StartConversion {
        slot: Slot,
        run_id: RunId,
        files: Vec<StagedFile>,
    },
    ScheduleToastExpiry { toast_id: ToastId, after: Duration },
}
