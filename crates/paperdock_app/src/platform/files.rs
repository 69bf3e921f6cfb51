use std::fs;
use std::path::Path;

use anyhow::Context;
use image::ImageFormat;
use paperdock_core::StagedFile;

const PDF_MIME: &str = "application/pdf";
const UNKNOWN_MIME: &str = "application/octet-stream";

/// Reads `path` into a staged file, sniffing its media type.
pub fn load_staged_file(path: &Path) -> anyhow::Result<StagedFile> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let mime = detect_mime(path, &bytes);
    Ok(StagedFile::new(name, mime, bytes))
}

/// Content first, then the extension.
fn detect_mime(path: &Path, bytes: &[u8]) -> &'static str {
    if bytes.starts_with(b"%PDF-") {
        return PDF_MIME;
    }
    if let Ok(format) = image::guess_format(bytes) {
        return format.to_mime_type();
    }
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("pdf") => PDF_MIME,
        Some(ext) => ImageFormat::from_extension(ext)
            .map(|format| format.to_mime_type())
            .unwrap_or(UNKNOWN_MIME),
        None => UNKNOWN_MIME,
    }
}
