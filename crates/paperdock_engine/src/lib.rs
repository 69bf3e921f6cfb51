//! Paperdock engine: external conversion capabilities and run execution.
mod assemble;
mod config;
mod engine;
mod filename;
mod layout;
mod persist;
mod pipeline;
mod raster;
mod segment;
mod types;

pub use assemble::{decode_image, LopdfAssembler, PagePlacement, PdfAssembler};
pub use config::{ConfigError, EngineConfig, PageSize, SegmenterSettings};
pub use engine::{EngineEvents, EngineHandle};
pub use filename::{no_background_filename, page_filename, safe_filename, PDF_FILENAME};
pub use layout::{fit_to_page, Rect};
pub use persist::{ensure_output_dir, write_artifacts, AtomicFileWriter, PersistError};
pub use pipeline::{
    aggregate_images, rasterize_document, remove_background, ChannelProgressSink, Pipelines,
    ProgressSink,
};
pub use raster::{
    encode_png, DocumentRenderer, DocumentVisitor, PagedDocument, PdfiumRenderer,
    UnavailableRenderer,
};
pub use segment::{CommandSegmenter, ProgressFn, SegmentationConfig, Segmenter};
pub use types::{CapabilityError, EngineEvent};
