use std::sync::{mpsc, Arc};

use paperdock_core::{Artifact, ConversionResult, RunId, Slot, StagedFile};
use paperdock_logging::dock_warn;

use crate::{
    decode_image, encode_png, fit_to_page, no_background_filename, page_filename,
    CapabilityError, CommandSegmenter, DocumentRenderer, EngineConfig, EngineEvent,
    LopdfAssembler, PageSize, PagePlacement, PagedDocument, PdfAssembler, PdfiumRenderer,
    SegmentationConfig, Segmenter, UnavailableRenderer, PDF_FILENAME,
};

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelProgressSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelProgressSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelProgressSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

/// Runs CPU-bound capability work off the async workers.
async fn blocking<T, F>(job: F) -> Result<T, CapabilityError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, CapabilityError> + Send + 'static,
{
    tokio::task::spawn_blocking(job)
        .await
        .map_err(|err| CapabilityError::Internal(format!("worker task failed: {err}")))?
}

/// Decodes every image in order and lays each one out on its own page.
pub async fn aggregate_images(
    assembler: Arc<dyn PdfAssembler>,
    page: PageSize,
    files: Vec<StagedFile>,
) -> Result<ConversionResult, CapabilityError> {
    if files.is_empty() {
        return Err(CapabilityError::NoInput);
    }
    blocking(move || {
        let mut placements = Vec::with_capacity(files.len());
        for file in &files {
            let image = decode_image(&file.name, &file.bytes)?;
            let rect = fit_to_page(image.width(), image.height(), page);
            placements.push(PagePlacement { image, rect });
        }
        let pdf = assembler.assemble(page, &placements)?;
        Ok(ConversionResult {
            artifacts: vec![Artifact::new(PDF_FILENAME, "application/pdf", pdf)],
            status: Slot::ImagesToPdf.success_message(placements.len()),
            preview: false,
        })
    })
    .await
}

pub async fn remove_background(
    segmenter: &dyn Segmenter,
    config: SegmentationConfig<'_>,
    file: &StagedFile,
) -> Result<ConversionResult, CapabilityError> {
    let png = segmenter.remove_background(file, config).await?;
    Ok(ConversionResult {
        artifacts: vec![Artifact::new(
            no_background_filename(&file.name),
            "image/png",
            png,
        )],
        status: Slot::RemoveBackground.success_message(1),
        preview: true,
    })
}

/// Renders every page in document order, one PNG per page.
pub async fn rasterize_document(
    renderer: Arc<dyn DocumentRenderer>,
    scale: f32,
    file: StagedFile,
) -> Result<ConversionResult, CapabilityError> {
    blocking(move || {
        let mut artifacts = Vec::new();
        renderer.with_document(&file.bytes, &mut |document: &dyn PagedDocument| {
            let count = document.page_count();
            artifacts.reserve(count);
            for index in 0..count {
                let image = document.render_page(index, scale)?;
                artifacts.push(Artifact::new(
                    page_filename(index + 1),
                    "image/png",
                    encode_png(&image)?,
                ));
            }
            Ok(())
        })?;
        Ok(ConversionResult {
            status: Slot::PdfToImages.success_message(artifacts.len()),
            artifacts,
            preview: false,
        })
    })
    .await
}

/// The three conversion pipelines wired to their capabilities.
pub struct Pipelines {
    page: PageSize,
    raster_scale: f32,
    asset_location: Option<String>,
    assembler: Arc<dyn PdfAssembler>,
    segmenter: Arc<dyn Segmenter>,
    renderer: Arc<dyn DocumentRenderer>,
}

impl Pipelines {
    pub fn new(
        config: &EngineConfig,
        assembler: Arc<dyn PdfAssembler>,
        segmenter: Arc<dyn Segmenter>,
        renderer: Arc<dyn DocumentRenderer>,
    ) -> Self {
        Self {
            page: config.page,
            raster_scale: config.raster_scale,
            asset_location: config.segmenter.asset_location.clone(),
            assembler,
            segmenter,
            renderer,
        }
    }

    /// Production capabilities. A missing pdfium leaves rasterization failing
    /// per run rather than failing startup.
    pub fn from_config(config: &EngineConfig) -> Self {
        let renderer: Arc<dyn DocumentRenderer> =
            match PdfiumRenderer::bind(config.pdfium_dir.as_deref()) {
                Ok(renderer) => Arc::new(renderer),
                Err(err) => {
                    dock_warn!("{}", err);
                    Arc::new(UnavailableRenderer::new(err.to_string()))
                }
            };
        Self::new(
            config,
            Arc::new(LopdfAssembler::new(config.jpeg_quality)),
            Arc::new(CommandSegmenter::new(config.segmenter.clone())),
            renderer,
        )
    }

    pub fn probe_segmenter(&self) -> bool {
        self.segmenter.probe()
    }

    /// Executes one run of `slot` over `files`, reporting progress to `sink`.
    pub async fn run(
        &self,
        slot: Slot,
        run_id: RunId,
        files: Vec<StagedFile>,
        sink: &dyn ProgressSink,
    ) -> Result<ConversionResult, CapabilityError> {
        match slot {
            Slot::ImagesToPdf => aggregate_images(self.assembler.clone(), self.page, files).await,
            Slot::RemoveBackground => {
                let file = files.first().ok_or(CapabilityError::NoInput)?;
                let on_progress = |fraction: f32| {
                    sink.emit(EngineEvent::Progress {
                        slot,
                        run_id,
                        fraction,
                    })
                };
                let config = SegmentationConfig {
                    asset_location: self.asset_location.as_deref(),
                    on_progress: &on_progress,
                };
                remove_background(self.segmenter.as_ref(), config, file).await
            }
            Slot::PdfToImages => {
                let file = files.into_iter().next().ok_or(CapabilityError::NoInput)?;
                rasterize_document(self.renderer.clone(), self.raster_scale, file).await
            }
        }
    }
}
