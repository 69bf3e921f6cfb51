use crate::PageSize;

/// Axis-aligned rectangle in page units (millimetres), origin at the top-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Largest top-left anchored rectangle with the image's aspect ratio that
/// fits the page. A relatively wider image is clamped to the page width,
/// otherwise the height is clamped to the page height.
pub fn fit_to_page(image_width: u32, image_height: u32, page: PageSize) -> Rect {
    let image_ratio = f64::from(image_width) / f64::from(image_height.max(1));
    let (width, height) = if image_ratio > page.ratio() {
        (page.width, page.width / image_ratio)
    } else {
        (page.height * image_ratio, page.height)
    };
    Rect {
        x: 0.0,
        y: 0.0,
        width,
        height,
    }
}
