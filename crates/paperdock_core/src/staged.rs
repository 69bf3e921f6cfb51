use bytes::Bytes;

/// A file the user selected but has not submitted for conversion yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedFile {
    pub name: String,
    pub mime: String,
    pub bytes: Bytes,
}

impl StagedFile {
    pub fn new(name: impl Into<String>, mime: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            bytes: bytes.into(),
        }
    }

    pub fn kind(&self) -> FileKind {
        classify_mime(&self.mime)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Broad file category used to pick how a staged file is listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    Image,
    Document,
    Other,
}

/// `image/*` is an image, `application/pdf` a document, anything else falls
/// through to `Other` rather than being rejected.
pub fn classify_mime(mime: &str) -> FileKind {
    let essence = mime.split(';').next().unwrap_or(mime).trim();
    if starts_with_ignore_case(essence, "image/") {
        FileKind::Image
    } else if essence.eq_ignore_ascii_case("application/pdf") {
        FileKind::Document
    } else {
        FileKind::Other
    }
}

fn starts_with_ignore_case(value: &str, prefix: &str) -> bool {
    value.len() >= prefix.len()
        && value.is_char_boundary(prefix.len())
        && value[..prefix.len()].eq_ignore_ascii_case(prefix)
}

/// How newly selected files combine with the ones already staged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddMode {
    Append,
    Replace,
}

impl AddMode {
    pub fn for_input(allows_multiple: bool) -> Self {
        if allows_multiple {
            AddMode::Append
        } else {
            AddMode::Replace
        }
    }
}
