/// One of the three independent upload contexts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Slot {
    /// Many images combined into one PDF.
    #[default]
    ImagesToPdf,
    /// One image with its background segmented away.
    RemoveBackground,
    /// One PDF rasterized into one image per page.
    PdfToImages,
}

/// Static description of a slot: intake rules and every user-facing string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotSpec {
    pub title: &'static str,
    pub drop_hint: &'static str,
    pub allows_multiple: bool,
    /// Picker filter, in `accept` attribute syntax.
    pub accept: &'static str,
    pub trigger_label: &'static str,
    pub busy_label: &'static str,
    pub empty_message: &'static str,
    pub failure_inline: &'static str,
    pub failure_toast: &'static str,
}

pub const UNAVAILABLE_TITLE: &str = "Feature Unavailable";

pub const UNAVAILABLE_NOTICE: &str = "The background removal tool failed to load. \
This can be caused by a missing segmentation program, a blocked download of its model files, \
or a security tool interfering with it. Check the segmentation command in your configuration \
and your PATH, then restart.";

const IMAGES_TO_PDF: SlotSpec = SlotSpec {
    title: "Image to PDF",
    drop_hint: "Drag & drop images here, or click to select",
    allows_multiple: true,
    accept: "image/*",
    trigger_label: "Convert to PDF",
    busy_label: "Converting...",
    empty_message: "Please select at least one image.",
    failure_inline: "An error occurred during conversion.",
    failure_toast: "An error occurred during PDF conversion.",
};

const REMOVE_BACKGROUND: SlotSpec = SlotSpec {
    title: "Remove Background",
    drop_hint: "Drag & drop an image here, or click to select",
    allows_multiple: false,
    accept: "image/*",
    trigger_label: "Remove Background",
    busy_label: "Processing...",
    empty_message: "Please select an image.",
    failure_inline: "An error occurred. The image format might not be supported.",
    failure_toast: "Failed to remove background.",
};

const PDF_TO_IMAGES: SlotSpec = SlotSpec {
    title: "PDF to Image",
    drop_hint: "Drag & drop a PDF here, or click to select",
    allows_multiple: false,
    accept: "application/pdf",
    trigger_label: "Convert to Images",
    busy_label: "Converting...",
    empty_message: "Please select a PDF file.",
    failure_inline: "An error occurred during conversion. The PDF might be corrupted or protected.",
    failure_toast: "Error converting PDF. It may be corrupted or protected.",
};

impl Slot {
    pub const ALL: [Slot; 3] = [Slot::ImagesToPdf, Slot::RemoveBackground, Slot::PdfToImages];

    pub fn spec(self) -> &'static SlotSpec {
        match self {
            Slot::ImagesToPdf => &IMAGES_TO_PDF,
            Slot::RemoveBackground => &REMOVE_BACKGROUND,
            Slot::PdfToImages => &PDF_TO_IMAGES,
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Slot::ImagesToPdf => 0,
            Slot::RemoveBackground => 1,
            Slot::PdfToImages => 2,
        }
    }

    /// Toast and status line shown after a successful run.
    pub fn success_message(self, artifact_count: usize) -> String {
        match self {
            Slot::ImagesToPdf => "PDF created successfully!".to_string(),
            Slot::RemoveBackground => "Background removed successfully!".to_string(),
            Slot::PdfToImages => format!("Converted {artifact_count} page(s) successfully!"),
        }
    }

    /// Text of the download entry for one produced artifact.
    pub fn download_label(self, filename: &str) -> String {
        match self {
            Slot::ImagesToPdf => "Download PDF".to_string(),
            Slot::RemoveBackground => "Download PNG".to_string(),
            Slot::PdfToImages => filename.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Slot;

    #[test]
    fn only_the_image_slot_accepts_multiple_files() {
        let multiple: Vec<_> = Slot::ALL
            .iter()
            .filter(|slot| slot.spec().allows_multiple)
            .collect();
        assert_eq!(multiple, vec![&Slot::ImagesToPdf]);
    }

    #[test]
    fn indices_are_dense_and_ordered() {
        let indices: Vec<_> = Slot::ALL.iter().map(|slot| slot.index()).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn page_count_appears_in_rasterization_message() {
        assert_eq!(
            Slot::PdfToImages.success_message(3),
            "Converted 3 page(s) successfully!"
        );
        assert_eq!(
            Slot::ImagesToPdf.success_message(1),
            "PDF created successfully!"
        );
    }
}
