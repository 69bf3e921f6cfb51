use std::sync::Once;

use paperdock_core::{
    update, AddMode, AppState, Artifact, ConversionResult, Effect, Msg, OutputArea, OutputView,
    PanelView, RunId, RunState, Slot, StagedFile, ToastKind, TOAST_DURATION, UNAVAILABLE_TITLE,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(paperdock_logging::initialize_for_tests);
}

fn staged(slot: Slot, files: Vec<StagedFile>) -> AppState {
    let (state, _) = update(
        AppState::new(),
        Msg::FilesAdded {
            slot,
            files,
            mode: AddMode::for_input(slot.spec().allows_multiple),
        },
    );
    state
}

fn photo() -> StagedFile {
    StagedFile::new("cat.photo.jpg", "image/jpeg", vec![9; 16])
}

fn start(state: AppState, slot: Slot) -> (AppState, RunId) {
    let (state, effects) = update(state, Msg::TriggerClicked { slot });
    match &effects[..] {
        [Effect::StartConversion { run_id, .. }] => (state, *run_id),
        other => panic!("expected a single StartConversion, got {other:?}"),
    }
}

fn trigger(state: &AppState, slot: Slot) -> (String, bool) {
    let view = state.view();
    let panel = view.panel(slot).as_available().expect("available panel");
    (panel.trigger.label.clone(), panel.trigger.enabled)
}

fn error_toasts(state: &AppState) -> usize {
    state
        .toasts()
        .iter()
        .filter(|toast| toast.kind == ToastKind::Error)
        .count()
}

#[test]
fn empty_slot_trigger_raises_validation_toast_and_stays_idle() {
    init_logging();
    let (state, effects) = update(
        AppState::new(),
        Msg::TriggerClicked {
            slot: Slot::PdfToImages,
        },
    );

    assert_eq!(state.run_state(Slot::PdfToImages), RunState::Idle);
    assert_eq!(state.output(Slot::PdfToImages), &OutputArea::Empty);
    assert_eq!(state.toasts().len(), 1);
    assert_eq!(state.toasts()[0].kind, ToastKind::Error);
    assert_eq!(state.toasts()[0].message, "Please select a PDF file.");
    assert_eq!(
        effects,
        vec![Effect::ScheduleToastExpiry {
            toast_id: state.toasts()[0].id,
            after: TOAST_DURATION,
        }]
    );
}

#[test]
fn trigger_starts_run_with_staged_files_and_shows_loader() {
    init_logging();
    let files = vec![
        StagedFile::new("a.png", "image/png", vec![1]),
        StagedFile::new("b.png", "image/png", vec![2]),
    ];
    let state = staged(Slot::ImagesToPdf, files.clone());

    let (state, effects) = update(
        state,
        Msg::TriggerClicked {
            slot: Slot::ImagesToPdf,
        },
    );

    assert_eq!(
        effects,
        vec![Effect::StartConversion {
            slot: Slot::ImagesToPdf,
            run_id: 1,
            files,
        }]
    );
    assert!(state.run_state(Slot::ImagesToPdf).is_running());
    assert_eq!(state.output(Slot::ImagesToPdf), &OutputArea::Loading);
    assert_eq!(trigger(&state, Slot::ImagesToPdf), ("Converting...".to_string(), false));
}

#[test]
fn trigger_is_not_reentrant_while_running() {
    init_logging();
    let state = staged(Slot::ImagesToPdf, vec![photo()]);
    let (state, _run_id) = start(state, Slot::ImagesToPdf);

    let before = state.clone();
    let (after, effects) = update(
        state,
        Msg::TriggerClicked {
            slot: Slot::ImagesToPdf,
        },
    );

    assert!(effects.is_empty());
    assert_eq!(after, before);
}

#[test]
fn progress_is_shown_in_trigger_label_then_restored() {
    init_logging();
    let slot = Slot::RemoveBackground;
    let (state, run_id) = start(staged(slot, vec![photo()]), slot);

    let (state, _) = update(
        state,
        Msg::ConversionProgress {
            slot,
            run_id,
            fraction: 0.42,
        },
    );
    assert_eq!(trigger(&state, slot), ("Processing... 42%".to_string(), false));

    let (state, effects) = update(
        state,
        Msg::ConversionSucceeded {
            slot,
            run_id,
            result: ConversionResult {
                artifacts: vec![Artifact::new("cat.photo-no-bg.png", "image/png", vec![7; 3])],
                status: slot.success_message(1),
                preview: true,
            },
        },
    );

    assert_eq!(state.run_state(slot), RunState::Done);
    assert_eq!(trigger(&state, slot), ("Remove Background".to_string(), true));
    assert_eq!(effects.len(), 1);
    assert_eq!(state.toasts().last().unwrap().kind, ToastKind::Success);
    assert_eq!(
        state.toasts().last().unwrap().message,
        "Background removed successfully!"
    );

    let view = state.view();
    let panel = view.panel(slot).as_available().unwrap();
    match &panel.output {
        OutputView::Downloads {
            links, preview, ..
        } => {
            assert_eq!(links.len(), 1);
            assert_eq!(links[0].label, "Download PNG");
            assert_eq!(links[0].byte_len, 3);
            assert_eq!(preview.as_deref(), Some("cat.photo-no-bg.png"));
        }
        other => panic!("unexpected output {other:?}"),
    }
}

#[test]
fn failure_restores_trigger_and_raises_exactly_one_error_toast() {
    init_logging();
    let slot = Slot::PdfToImages;
    let doc = StagedFile::new("broken.pdf", "application/pdf", b"not a pdf".to_vec());
    let (state, run_id) = start(staged(slot, vec![doc]), slot);
    assert_eq!(error_toasts(&state), 0);

    let (state, effects) = update(state, Msg::ConversionFailed { slot, run_id });

    assert_eq!(state.run_state(slot), RunState::Failed);
    assert_eq!(trigger(&state, slot), ("Convert to Images".to_string(), true));
    assert_eq!(error_toasts(&state), 1);
    assert_eq!(
        state.toasts()[0].message,
        "Error converting PDF. It may be corrupted or protected."
    );
    assert_eq!(effects.len(), 1);
    assert_eq!(
        state.output(slot),
        &OutputArea::Error(
            "An error occurred during conversion. The PDF might be corrupted or protected."
                .to_string()
        )
    );
}

#[test]
fn next_run_supersedes_previous_result() {
    init_logging();
    let slot = Slot::PdfToImages;
    let doc = StagedFile::new("doc.pdf", "application/pdf", b"%PDF".to_vec());
    let (state, first) = start(staged(slot, vec![doc]), slot);
    let pages = |count: usize| ConversionResult {
        artifacts: (1..=count)
            .map(|n| Artifact::new(format!("page_{n}.png"), "image/png", vec![0]))
            .collect(),
        status: slot.success_message(count),
        preview: false,
    };
    let (state, _) = update(
        state,
        Msg::ConversionSucceeded {
            slot,
            run_id: first,
            result: pages(3),
        },
    );
    let (state, second) = start(state, slot);
    assert_ne!(first, second);
    assert_eq!(state.output(slot), &OutputArea::Loading);

    let (state, _) = update(
        state,
        Msg::ConversionSucceeded {
            slot,
            run_id: second,
            result: pages(1),
        },
    );

    let view = state.view();
    match &view.panel(slot).as_available().unwrap().output {
        OutputView::Downloads { status, links, .. } => {
            assert_eq!(status, "Converted 1 page(s) successfully!");
            let labels: Vec<_> = links.iter().map(|l| l.label.as_str()).collect();
            assert_eq!(labels, vec!["page_1.png"]);
        }
        other => panic!("unexpected output {other:?}"),
    }
}

#[test]
fn messages_for_stale_runs_are_ignored() {
    init_logging();
    let slot = Slot::ImagesToPdf;
    let (state, run_id) = start(staged(slot, vec![photo()]), slot);

    let before = state.clone();
    let (state, effects) = update(
        state,
        Msg::ConversionFailed {
            slot,
            run_id: run_id + 10,
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state, before);

    let (state, effects) = update(
        state,
        Msg::ConversionProgress {
            slot: Slot::RemoveBackground,
            run_id,
            fraction: 0.5,
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state, before);
}

#[test]
fn clearing_while_running_keeps_trigger_disabled_until_files_return() {
    init_logging();
    let slot = Slot::ImagesToPdf;
    let (state, run_id) = start(staged(slot, vec![photo()]), slot);
    let (state, _) = update(state, Msg::ClearClicked { slot });
    assert_eq!(state.output(slot), &OutputArea::Empty);

    let (state, _) = update(state, Msg::ConversionFailed { slot, run_id });
    assert_eq!(trigger(&state, slot), ("Convert to PDF".to_string(), false));
}

#[test]
fn unavailable_feature_disables_trigger_and_ignores_activation() {
    init_logging();
    let slot = Slot::RemoveBackground;
    let state = staged(slot, vec![photo()]);
    let (state, _) = update(
        state,
        Msg::FeatureProbed {
            slot,
            available: false,
        },
    );

    let view = state.view();
    match view.panel(slot) {
        PanelView::Unavailable { title, .. } => assert_eq!(*title, UNAVAILABLE_TITLE),
        other => panic!("expected unavailable notice, got {other:?}"),
    }
    let tab = view.tabs.iter().find(|tab| tab.slot == slot).unwrap();
    assert!(!tab.enabled);

    let before = state.clone();
    let (state, effects) = update(state, Msg::TriggerClicked { slot });
    assert!(effects.is_empty());
    assert_eq!(state, before);

    let (state, effects) = update(state, Msg::TabSelected(slot));
    assert!(effects.is_empty());
    assert_eq!(state.active_tab(), Slot::ImagesToPdf);

    let (state, _) = update(
        state,
        Msg::FilesAdded {
            slot,
            files: vec![photo()],
            mode: AddMode::Replace,
        },
    );
    assert_eq!(state.files(slot).len(), 1);
}

#[test]
fn available_feature_probe_keeps_panel() {
    init_logging();
    let (state, _) = update(
        AppState::new(),
        Msg::FeatureProbed {
            slot: Slot::RemoveBackground,
            available: true,
        },
    );
    assert!(state
        .view()
        .panel(Slot::RemoveBackground)
        .as_available()
        .is_some());
}

#[test]
fn tabs_switch_active_slot() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::TabSelected(Slot::PdfToImages));
    let view = state.view();
    assert_eq!(view.active_tab, Slot::PdfToImages);
    let active: Vec<_> = view.tabs.iter().filter(|t| t.active).map(|t| t.slot).collect();
    assert_eq!(active, vec![Slot::PdfToImages]);
}

#[test]
fn toasts_expire_individually() {
    init_logging();
    let (state, first) = update(
        AppState::new(),
        Msg::TriggerClicked {
            slot: Slot::ImagesToPdf,
        },
    );
    let (state, second) = update(
        state,
        Msg::TriggerClicked {
            slot: Slot::RemoveBackground,
        },
    );
    assert_eq!(state.toasts().len(), 2);

    let first_id = match &first[..] {
        [Effect::ScheduleToastExpiry { toast_id, .. }] => *toast_id,
        _ => panic!("expected expiry effect"),
    };
    let second_id = match &second[..] {
        [Effect::ScheduleToastExpiry { toast_id, .. }] => *toast_id,
        _ => panic!("expected expiry effect"),
    };

    let (state, _) = update(state, Msg::ToastExpired(first_id));
    let remaining: Vec<_> = state.view().toasts.iter().map(|t| t.id).collect();
    assert_eq!(remaining, vec![second_id]);

    let (mut state, _) = update(state, Msg::ToastExpired(first_id));
    assert_eq!(state.toasts().len(), 1);
    state.consume_dirty();
    let (mut state, _) = update(state, Msg::ToastExpired(first_id));
    assert!(!state.consume_dirty());
}
