use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use paperdock_core::{Effect, Msg};
use paperdock_engine::{write_artifacts, EngineEvent, EngineEvents, EngineHandle};
use paperdock_logging::{dock_debug, dock_error, dock_info, dock_warn};

const EVENT_POLL: Duration = Duration::from_millis(50);

/// Carries effects out against the engine and turns engine events back
/// into messages for the page controller.
pub struct EffectRunner {
    engine: EngineHandle,
    msg_tx: mpsc::Sender<Msg>,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle, output_dir: PathBuf, msg_tx: mpsc::Sender<Msg>) -> Self {
        spawn_event_loop(engine.events(), output_dir, msg_tx.clone());
        Self { engine, msg_tx }
    }

    pub fn segmenter_available(&self) -> bool {
        self.engine.segmenter_available()
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::StartConversion {
                    slot,
                    run_id,
                    files,
                } => {
                    dock_info!(
                        "StartConversion slot={:?} run_id={} files={}",
                        slot,
                        run_id,
                        files.len()
                    );
                    self.engine.start(slot, run_id, files);
                }
                Effect::ScheduleToastExpiry { toast_id, after } => {
                    let msg_tx = self.msg_tx.clone();
                    thread::spawn(move || {
                        thread::sleep(after);
                        let _ = msg_tx.send(Msg::ToastExpired(toast_id));
                    });
                }
            }
        }
    }
}

/// Forwards engine events as messages until the engine shuts down or the
/// page stops listening.
fn spawn_event_loop(
    events: EngineEvents,
    output_dir: PathBuf,
    msg_tx: mpsc::Sender<Msg>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || loop {
        match events.recv_timeout(EVENT_POLL) {
            Ok(event) => {
                if msg_tx.send(event_to_msg(&output_dir, event)).is_err() {
                    break;
                }
            }
            Err(mpsc::RecvTimeoutError::Timeout) => continue,
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                dock_debug!("Engine event queue closed");
                break;
            }
        }
    })
}

/// Successful runs are saved to `output_dir` before they are reported; a run
/// whose results cannot be saved counts as failed.
pub(crate) fn event_to_msg(output_dir: &Path, event: EngineEvent) -> Msg {
    match event {
        EngineEvent::Progress {
            slot,
            run_id,
            fraction,
        } => Msg::ConversionProgress {
            slot,
            run_id,
            fraction,
        },
        EngineEvent::RunCompleted {
            slot,
            run_id,
            result: Ok(result),
        } => match write_artifacts(output_dir, &result.artifacts) {
            Ok(paths) => {
                for path in &paths {
                    dock_info!("Saved {:?}", path);
                }
                Msg::ConversionSucceeded {
                    slot,
                    run_id,
                    result,
                }
            }
            Err(err) => {
                dock_error!("Run {} finished but saving failed: {}", run_id, err);
                Msg::ConversionFailed { slot, run_id }
            }
        },
        EngineEvent::RunCompleted {
            slot,
            run_id,
            result: Err(err),
        } => {
            dock_warn!("Run {} of {:?} failed: {}", run_id, slot, err);
            Msg::ConversionFailed { slot, run_id }
        }
    }
}
