use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::Parser;
use paperdock_core::{
    update, AppState, AppViewModel, Disposition, Msg, OutputArea, PanelView, RunState, Slot,
    SurfaceEvent, UploadBinder,
};
use paperdock_engine::{EngineHandle, Pipelines};
use paperdock_logging::{dock_debug, dock_info, DEFAULT_LOG_FILE};

use super::cli::Cli;
use super::effects::EffectRunner;
use super::{config, files, render};

const MSG_POLL: Duration = Duration::from_millis(75);

pub fn run_app() -> anyhow::Result<()> {
    let cli = Cli::parse();
    paperdock_logging::initialize(cli.log, cli.log_level, Path::new(DEFAULT_LOG_FILE));

    let mut settings = config::load(cli.config.as_deref())?;
    cli.apply_overrides(&mut settings);
    settings
        .engine
        .validate()
        .context("invalid configuration")?;

    let engine = EngineHandle::new(Pipelines::from_config(&settings.engine))
        .context("starting the conversion engine")?;
    let mut page = PageController::new(engine, settings.output_dir.clone());
    page.startup();

    let conversion = cli.command.conversion();
    if let Some((slot, paths)) = &conversion {
        page.convert(*slot, paths, |view| {
            if let Some(panel) = view.panel(*slot).as_available() {
                dock_info!("{}", panel.trigger.label);
            }
        })?;
    }

    let view = page.view();
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&render::render_json(&view))?);
    } else {
        for line in render::render_text(&view) {
            println!("{line}");
        }
    }

    match conversion {
        Some((slot, _)) => page.outcome(slot),
        None => Ok(()),
    }
}

/// Owns the session state and routes messages through `update`.
pub struct PageController {
    state: AppState,
    msg_rx: mpsc::Receiver<Msg>,
    effects: EffectRunner,
}

impl PageController {
    pub fn new(engine: EngineHandle, output_dir: PathBuf) -> Self {
        let (msg_tx, msg_rx) = mpsc::channel();
        Self {
            state: AppState::new(),
            msg_rx,
            effects: EffectRunner::new(engine, output_dir, msg_tx),
        }
    }

    /// Publishes the result of the segmentation probe.
    pub fn startup(&mut self) {
        let available = self.effects.segmenter_available();
        if !available {
            dock_info!("Background removal is unavailable");
        }
        self.dispatch(Msg::FeatureProbed {
            slot: Slot::RemoveBackground,
            available,
        });
    }

    pub fn surface_event(&mut self, slot: Slot, event: SurfaceEvent) -> Disposition {
        let binding = UploadBinder::new(slot).bind(event);
        for msg in binding.msgs {
            self.dispatch(msg);
        }
        binding.disposition
    }

    pub fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        self.effects.enqueue(effects);
    }

    pub fn process_pending(&mut self) {
        while let Ok(msg) = self.msg_rx.try_recv() {
            self.dispatch(msg);
        }
    }

    /// Blocks until `slot` leaves the running state, calling `on_change`
    /// whenever the page needs repainting.
    pub fn wait_for_run(&mut self, slot: Slot, mut on_change: impl FnMut(&AppViewModel)) {
        while self.state.run_state(slot).is_running() {
            match self.msg_rx.recv_timeout(MSG_POLL) {
                Ok(msg) => self.dispatch(msg),
                Err(mpsc::RecvTimeoutError::Timeout) => continue,
                Err(mpsc::RecvTimeoutError::Disconnected) => break,
            }
            if self.state.consume_dirty() {
                on_change(&self.state.view());
            }
        }
        self.process_pending();
    }

    /// Stages `paths` through the slot's picker, presses its trigger and
    /// waits for the run to settle.
    pub fn convert(
        &mut self,
        slot: Slot,
        paths: &[PathBuf],
        on_change: impl FnMut(&AppViewModel),
    ) -> anyhow::Result<()> {
        let staged = paths
            .iter()
            .map(|path| files::load_staged_file(path))
            .collect::<anyhow::Result<Vec<_>>>()?;
        dock_debug!("Staging {} file(s) into {:?}", staged.len(), slot);

        self.dispatch(Msg::TabSelected(slot));
        self.surface_event(slot, SurfaceEvent::PickerChanged(staged));
        self.dispatch(Msg::TriggerClicked { slot });
        self.wait_for_run(slot, on_change);
        Ok(())
    }

    /// Maps the final state of `slot` to the process outcome.
    pub fn outcome(&self, slot: Slot) -> anyhow::Result<()> {
        if let PanelView::Unavailable { notice, .. } = self.view().panel(slot) {
            bail!("{notice}");
        }
        match (self.state.run_state(slot), self.state.output(slot)) {
            (RunState::Done, _) => Ok(()),
            (RunState::Failed, OutputArea::Error(message)) => bail!("{message}"),
            _ => match self.state.toasts().last() {
                Some(toast) => bail!("{}", toast.message),
                None => bail!("nothing was converted"),
            },
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn view(&self) -> AppViewModel {
        self.state.view()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::path::PathBuf;
    use std::sync::Arc;

    use bytes::Bytes;
    use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
    use paperdock_core::{
        Disposition, OutputArea, RunState, Slot, StagedFile, SurfaceEvent, ToastKind,
    };
    use paperdock_engine::{
        CapabilityError, EngineConfig, EngineHandle, LopdfAssembler, Pipelines,
        SegmentationConfig, Segmenter, UnavailableRenderer,
    };
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::PageController;

    struct StubSegmenter {
        available: bool,
    }

    #[async_trait::async_trait]
    impl Segmenter for StubSegmenter {
        fn probe(&self) -> bool {
            self.available
        }

        async fn remove_background(
            &self,
            file: &StagedFile,
            config: SegmentationConfig<'_>,
        ) -> Result<Bytes, CapabilityError> {
            (config.on_progress)(0.5);
            Ok(file.bytes.clone())
        }
    }

    fn controller(segmenter_available: bool, output_dir: PathBuf) -> PageController {
        paperdock_logging::initialize_for_tests();
        let pipelines = Pipelines::new(
            &EngineConfig::default(),
            Arc::new(LopdfAssembler::default()),
            Arc::new(StubSegmenter {
                available: segmenter_available,
            }),
            Arc::new(UnavailableRenderer::new("pdfium")),
        );
        let mut page = PageController::new(EngineHandle::new(pipelines).unwrap(), output_dir);
        page.startup();
        page
    }

    fn write_png(dir: &TempDir, name: &str, width: u32, height: u32) -> PathBuf {
        let image = RgbaImage::from_pixel(width, height, Rgba([9, 99, 199, 255]));
        let mut buffer = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(image)
            .write_to(&mut buffer, ImageFormat::Png)
            .unwrap();
        let path = dir.path().join(name);
        std::fs::write(&path, buffer.into_inner()).unwrap();
        path
    }

    #[test]
    fn images_are_combined_and_saved() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        let paths = vec![
            write_png(&input, "wide.png", 30, 10),
            write_png(&input, "tall.png", 10, 30),
        ];
        let mut page = controller(true, output.path().to_path_buf());

        page.convert(Slot::ImagesToPdf, &paths, |_| {}).unwrap();

        assert_eq!(page.state().run_state(Slot::ImagesToPdf), RunState::Done);
        assert!(page.outcome(Slot::ImagesToPdf).is_ok());
        let saved = std::fs::read(output.path().join("converted.pdf")).unwrap();
        assert!(saved.starts_with(b"%PDF-"));
        assert_eq!(page.state().toasts()[0].message, "PDF created successfully!");
    }

    #[test]
    fn progress_repaints_then_result_is_previewed() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        let paths = vec![write_png(&input, "dog.png", 4, 4)];
        let mut page = controller(true, output.path().to_path_buf());

        let mut labels = Vec::new();
        page.convert(Slot::RemoveBackground, &paths, |view| {
            if let Some(panel) = view.panel(Slot::RemoveBackground).as_available() {
                labels.push(panel.trigger.label.clone());
            }
        })
        .unwrap();

        assert!(labels.contains(&"Processing... 50%".to_string()));
        assert_eq!(labels.last().map(String::as_str), Some("Remove Background"));
        assert!(output.path().join("dog-no-bg.png").is_file());
        match page.state().output(Slot::RemoveBackground) {
            OutputArea::Result(result) => assert!(result.preview),
            other => panic!("unexpected output {other:?}"),
        }
    }

    #[test]
    fn failed_run_reports_generic_message() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        let pdf = input.path().join("doc.pdf");
        std::fs::write(&pdf, b"%PDF-1.4").unwrap();
        let mut page = controller(true, output.path().to_path_buf());

        page.convert(Slot::PdfToImages, &[pdf], |_| {}).unwrap();

        assert_eq!(page.state().run_state(Slot::PdfToImages), RunState::Failed);
        let errors: Vec<_> = page
            .state()
            .toasts()
            .iter()
            .filter(|toast| toast.kind == ToastKind::Error)
            .collect();
        assert_eq!(errors.len(), 1);
        let err = page.outcome(Slot::PdfToImages).unwrap_err();
        assert_eq!(
            err.to_string(),
            "An error occurred during conversion. The PDF might be corrupted or protected."
        );
    }

    #[test]
    fn unavailable_segmenter_blocks_the_slot() {
        let output = TempDir::new().unwrap();
        let mut page = controller(false, output.path().to_path_buf());

        let disposition = page.surface_event(
            Slot::RemoveBackground,
            SurfaceEvent::PickerChanged(vec![StagedFile::new("a.png", "image/png", vec![1])]),
        );
        assert_eq!(disposition, Disposition::PreventDefault);
        assert!(page.state().files(Slot::RemoveBackground).is_empty());
        assert!(!page.state().is_available(Slot::RemoveBackground));
        assert!(page.outcome(Slot::RemoveBackground).is_err());
    }

    #[test]
    fn clear_button_keeps_default_handling() {
        let output = TempDir::new().unwrap();
        let mut page = controller(true, output.path().to_path_buf());
        page.surface_event(
            Slot::ImagesToPdf,
            SurfaceEvent::Drop(vec![StagedFile::new("a.png", "image/png", vec![1])]),
        );
        assert_eq!(page.state().files(Slot::ImagesToPdf).len(), 1);

        let disposition = page.surface_event(Slot::ImagesToPdf, SurfaceEvent::ClearClicked);
        assert_eq!(disposition, Disposition::Default);
        assert!(page.state().files(Slot::ImagesToPdf).is_empty());
    }
}
