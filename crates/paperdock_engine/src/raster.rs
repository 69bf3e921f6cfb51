use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbaImage};
use paperdock_logging::{dock_debug, dock_info, dock_warn};
use pdfium_render::prelude::*;

use crate::CapabilityError;

/// A loaded, paged document whose pages can be rendered to bitmaps.
pub trait PagedDocument {
    fn page_count(&self) -> usize;

    /// Renders page `index` (zero-based) at `scale` times its natural size.
    fn render_page(&self, index: usize, scale: f32) -> Result<RgbaImage, CapabilityError>;
}

/// Receives an opened document for the duration of one load.
pub type DocumentVisitor<'v> = dyn FnMut(&dyn PagedDocument) -> Result<(), CapabilityError> + 'v;

/// PDF parsing and rendering capability.
pub trait DocumentRenderer: Send + Sync {
    /// Loads `data` and lends the opened document to `visit`.
    fn with_document(
        &self,
        data: &[u8],
        visit: &mut DocumentVisitor<'_>,
    ) -> Result<(), CapabilityError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum LibrarySource {
    Path(PathBuf),
    System,
}

/// Renders with pdfium. The library is bound on the thread doing the work.
#[derive(Debug, Clone)]
pub struct PdfiumRenderer {
    source: LibrarySource,
}

impl PdfiumRenderer {
    /// Locates a usable pdfium shared library.
    ///
    /// Tries `pdfium_dir` first when given, then the working directory, then
    /// whatever the system loader finds.
    pub fn bind(pdfium_dir: Option<&Path>) -> Result<Self, CapabilityError> {
        let mut candidates = Vec::new();
        if let Some(dir) = pdfium_dir {
            candidates.push(dir.join(Pdfium::pdfium_platform_library_name()));
        }
        candidates.push(PathBuf::from(Pdfium::pdfium_platform_library_name_at_path("./")));

        for library in candidates {
            match Pdfium::bind_to_library(&library) {
                Ok(_) => {
                    dock_info!("pdfium found at {:?}", library);
                    return Ok(Self {
                        source: LibrarySource::Path(library),
                    });
                }
                Err(err) => dock_debug!("no pdfium at {:?}: {}", library, err),
            }
        }

        Pdfium::bind_to_system_library()
            .map(|_| {
                dock_info!("pdfium found on the system library path");
                Self {
                    source: LibrarySource::System,
                }
            })
            .map_err(|err| CapabilityError::Unavailable(format!("pdfium ({err})")))
    }

    fn pdfium(&self) -> Result<Pdfium, CapabilityError> {
        let bindings = match &self.source {
            LibrarySource::Path(library) => Pdfium::bind_to_library(library),
            LibrarySource::System => Pdfium::bind_to_system_library(),
        }
        .map_err(|err| CapabilityError::Unavailable(format!("pdfium ({err})")))?;
        Ok(Pdfium::new(bindings))
    }
}

impl DocumentRenderer for PdfiumRenderer {
    fn with_document(
        &self,
        data: &[u8],
        visit: &mut DocumentVisitor<'_>,
    ) -> Result<(), CapabilityError> {
        let pdfium = self.pdfium()?;
        let document = pdfium
            .load_pdf_from_byte_slice(data, None)
            .map_err(|err| CapabilityError::DocumentLoad(err.to_string()))?;
        let result = visit(&PdfiumDocument { document });
        result
    }
}

struct PdfiumDocument<'a> {
    document: PdfDocument<'a>,
}

impl PagedDocument for PdfiumDocument<'_> {
    fn page_count(&self) -> usize {
        self.document.pages().len() as usize
    }

    fn render_page(&self, index: usize, scale: f32) -> Result<RgbaImage, CapabilityError> {
        let render_error = |err: PdfiumError| CapabilityError::Render {
            page: index + 1,
            message: err.to_string(),
        };
        let page = self.document.pages().get(index as u16).map_err(render_error)?;
        let config = PdfRenderConfig::new().scale_page_by_factor(scale);
        let bitmap = page.render_with_config(&config).map_err(render_error)?;
        let image = bitmap.as_image().into_rgba8();
        dock_debug!(
            "rendered page {} at {}x{}",
            index + 1,
            image.width(),
            image.height()
        );
        Ok(image)
    }
}

/// Stand-in used when pdfium could not be found; every load fails.
#[derive(Debug, Clone, Default)]
pub struct UnavailableRenderer {
    reason: String,
}

impl UnavailableRenderer {
    pub fn new(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        dock_warn!("document rendering disabled: {}", reason);
        Self { reason }
    }
}

impl DocumentRenderer for UnavailableRenderer {
    fn with_document(
        &self,
        _data: &[u8],
        _visit: &mut DocumentVisitor<'_>,
    ) -> Result<(), CapabilityError> {
        Err(CapabilityError::Unavailable(self.reason.clone()))
    }
}

pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, CapabilityError> {
    let mut buffer = Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, ImageFormat::Png)
        .map_err(|err| CapabilityError::Encode(err.to_string()))?;
    Ok(buffer.into_inner())
}
