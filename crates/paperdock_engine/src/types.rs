use std::fmt;

use paperdock_core::{ConversionResult, RunId, Slot};

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    Progress {
        slot: Slot,
        run_id: RunId,
        fraction: f32,
    },
    RunCompleted {
        slot: Slot,
        run_id: RunId,
        result: Result<ConversionResult, CapabilityError>,
    },
}

/// Failure of an external conversion capability, or of the plumbing around it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CapabilityError {
    #[error("no input file staged")]
    NoInput,
    #[error("could not decode image '{name}': {message}")]
    Decode { name: String, message: String },
    #[error("pdf assembly failed: {0}")]
    Assembly(String),
    #[error("could not open document: {0}")]
    DocumentLoad(String),
    #[error("rendering page {page} failed: {message}")]
    Render { page: usize, message: String },
    #[error("png encoding failed: {0}")]
    Encode(String),
    #[error("segmentation failed: {0}")]
    Segmentation(String),
    #[error("{0} is not available")]
    Unavailable(String),
    #[error("io error: {0}")]
    Io(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<std::io::Error> for CapabilityError {
    fn from(err: std::io::Error) -> Self {
        CapabilityError::Io(err.to_string())
    }
}

/// Short label used in log lines.
pub(crate) struct SlotLabel(pub(crate) Slot);

impl fmt::Display for SlotLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.0 {
            Slot::ImagesToPdf => "images-to-pdf",
            Slot::RemoveBackground => "remove-bg",
            Slot::PdfToImages => "pdf-to-images",
        };
        f.write_str(label)
    }
}
