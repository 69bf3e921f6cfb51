/// Name of the single artifact produced by image aggregation.
pub const PDF_FILENAME: &str = "converted.pdf";

const NO_BACKGROUND_SUFFIX: &str = "-no-bg.png";

/// `photo.final.jpg` becomes `photo.final-no-bg.png`.
///
/// Names without an extension (or dot-files such as `.hidden`) keep their
/// whole name as the stem.
pub fn no_background_filename(original: &str) -> String {
    let stem = match original.rfind('.') {
        Some(idx) if idx > 0 => &original[..idx],
        _ => original,
    };
    format!("{stem}{NO_BACKGROUND_SUFFIX}")
}

/// 1-based page image name.
pub fn page_filename(page_number: usize) -> String {
    format!("page_{page_number}.png")
}

/// Filesystem-safe version of an artifact name: separators and control
/// characters become `_`, reserved Windows device names get a suffix.
pub fn safe_filename(name: &str) -> String {
    let mut cleaned: String = name
        .chars()
        .map(|c| if is_forbidden(c) { '_' } else { c })
        .collect();
    cleaned = cleaned.trim_matches(&[' ', '.'][..]).to_string();
    if cleaned.is_empty() {
        cleaned = "artifact".to_string();
    }
    let stem = cleaned.split('.').next().unwrap_or_default();
    if is_reserved_windows_name(stem) {
        cleaned.insert(stem.len(), '_');
    }
    cleaned
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}'
    )
}

fn is_reserved_windows_name(name: &str) -> bool {
    const RESERVED: &[&str] = &[
        "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
        "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
    ];
    RESERVED.iter().any(|r| r.eq_ignore_ascii_case(name))
}
