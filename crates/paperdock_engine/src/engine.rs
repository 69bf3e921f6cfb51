use std::io;
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

use paperdock_core::{RunId, Slot, StagedFile};
use paperdock_logging::{dock_debug, dock_info, dock_warn};

use crate::pipeline::{ChannelProgressSink, Pipelines};
use crate::types::SlotLabel;
use crate::EngineEvent;

enum EngineCommand {
    Start {
        slot: Slot,
        run_id: RunId,
        files: Vec<StagedFile>,
    },
}

/// Handle to the engine thread and its tokio runtime. Dropping the handle
/// shuts both down.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    events: EngineEvents,
    segmenter_available: bool,
}

/// Receiving side of the engine's event queue. Holding it does not keep the
/// engine alive; once the handle is dropped and queued events are drained,
/// receives report `Disconnected`.
#[derive(Clone)]
pub struct EngineEvents {
    rx: Arc<Mutex<mpsc::Receiver<EngineEvent>>>,
}

impl EngineEvents {
    pub fn try_recv(&self) -> Result<EngineEvent, mpsc::TryRecvError> {
        match self.rx.lock() {
            Ok(rx) => rx.try_recv(),
            Err(_) => Err(mpsc::TryRecvError::Disconnected),
        }
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Result<EngineEvent, mpsc::RecvTimeoutError> {
        match self.rx.lock() {
            Ok(rx) => rx.recv_timeout(timeout),
            Err(_) => Err(mpsc::RecvTimeoutError::Disconnected),
        }
    }
}

impl EngineHandle {
    pub fn new(pipelines: Pipelines) -> io::Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let segmenter_available = pipelines.probe_segmenter();
        let pipelines = Arc::new(pipelines);
        let runtime = tokio::runtime::Runtime::new()?;

        thread::Builder::new()
            .name("paperdock-engine".to_string())
            .spawn(move || {
                while let Ok(command) = cmd_rx.recv() {
                    let pipelines = pipelines.clone();
                    let event_tx = event_tx.clone();
                    runtime.spawn(async move {
                        handle_command(&pipelines, command, event_tx).await;
                    });
                }
                dock_debug!("Engine command channel closed");
            })?;

        Ok(Self {
            cmd_tx,
            events: EngineEvents {
                rx: Arc::new(Mutex::new(event_rx)),
            },
            segmenter_available,
        })
    }

    /// Result of the startup probe of the segmentation capability.
    pub fn segmenter_available(&self) -> bool {
        self.segmenter_available
    }

    pub fn start(&self, slot: Slot, run_id: RunId, files: Vec<StagedFile>) {
        let _ = self.cmd_tx.send(EngineCommand::Start {
            slot,
            run_id,
            files,
        });
    }

    pub fn events(&self) -> EngineEvents {
        self.events.clone()
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.events.try_recv().ok()
    }

    /// Waits up to `timeout` for the next event.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.events.recv_timeout(timeout).ok()
    }
}

async fn handle_command(
    pipelines: &Pipelines,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    match command {
        EngineCommand::Start {
            slot,
            run_id,
            files,
        } => {
            dock_info!(
                "{} run {} started with {} file(s)",
                SlotLabel(slot),
                run_id,
                files.len()
            );
            let sink = ChannelProgressSink::new(event_tx.clone());
            let result = pipelines.run(slot, run_id, files, &sink).await;
            match &result {
                Ok(output) => dock_info!(
                    "{} run {} produced {} artifact(s)",
                    SlotLabel(slot),
                    run_id,
                    output.artifacts.len()
                ),
                Err(err) => dock_warn!("{} run {} failed: {}", SlotLabel(slot), run_id, err),
            }
            let _ = event_tx.send(EngineEvent::RunCompleted {
                slot,
                run_id,
                result,
            });
        }
    }
}
