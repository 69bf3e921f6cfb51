use crate::{AppState, ConversionResult, Effect, Msg, Slot, ToastKind, TOAST_DURATION};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::DragActive { slot, active } => {
            if state.is_available(slot) {
                state.set_drag_active(slot, active);
            }
            Vec::new()
        }
        Msg::FilesAdded { slot, files, mode } => {
            // An unavailable slot has no intake surface left to receive files.
            if state.is_available(slot) {
                state.add_files(slot, files, mode);
            }
            Vec::new()
        }
        Msg::ClearClicked { slot } => {
            state.clear(slot);
            Vec::new()
        }
        Msg::TriggerClicked { slot } => trigger(&mut state, slot),
        Msg::TabSelected(slot) => {
            if state.is_available(slot) {
                state.select_tab(slot);
            }
            Vec::new()
        }
        Msg::FeatureProbed { slot, available } => {
            state.set_available(slot, available);
            Vec::new()
        }
        Msg::ConversionProgress {
            slot,
            run_id,
            fraction,
        } => {
            if state.is_current_run(slot, run_id) {
                state.set_progress(slot, to_percent(fraction));
            }
            Vec::new()
        }
        Msg::ConversionSucceeded {
            slot,
            run_id,
            result,
        } => {
            if state.is_current_run(slot, run_id) {
                succeed(&mut state, slot, result)
            } else {
                Vec::new()
            }
        }
        Msg::ConversionFailed { slot, run_id } => {
            if state.is_current_run(slot, run_id) {
                state.fail_run(slot);
                toast(&mut state, ToastKind::Error, slot.spec().failure_toast)
            } else {
                Vec::new()
            }
        }
        Msg::ToastExpired(id) => {
            state.expire_toast(id);
            Vec::new()
        }
    };

    (state, effects)
}

fn trigger(state: &mut AppState, slot: Slot) -> Vec<Effect> {
    if !state.is_available(slot) || state.run_state(slot).is_running() {
        return Vec::new();
    }
    if state.files(slot).is_empty() {
        return toast(state, ToastKind::Error, slot.spec().empty_message);
    }

    let files = state.files(slot).to_vec();
    let run_id = state.begin_run(slot);
    vec![Effect::StartConversion {
        slot,
        run_id,
        files,
    }]
}

fn succeed(state: &mut AppState, slot: Slot, result: ConversionResult) -> Vec<Effect> {
    let message = result.status.clone();
    state.complete_run(slot, result);
    toast(state, ToastKind::Success, message)
}

fn toast(state: &mut AppState, kind: ToastKind, message: impl Into<String>) -> Vec<Effect> {
    let toast_id = state.push_toast(kind, message);
    vec![Effect::ScheduleToastExpiry {
        toast_id,
        after: TOAST_DURATION,
    }]
}

fn to_percent(fraction: f32) -> u8 {
    if fraction.is_nan() {
        return 0;
    }
    (fraction.clamp(0.0, 1.0) * 100.0).round() as u8
}
