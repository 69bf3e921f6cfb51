use paperdock_engine::{fit_to_page, PageSize, Rect};
use pretty_assertions::assert_eq;

#[test]
fn wide_image_is_clamped_to_page_width() {
    let rect = fit_to_page(2000, 1000, PageSize::LETTER);
    assert_eq!(rect.width, PageSize::LETTER.width);
    assert!((rect.height - PageSize::LETTER.width / 2.0).abs() < 1e-9);
    assert!(rect.height < PageSize::LETTER.height);
}

#[test]
fn tall_image_is_clamped_to_page_height() {
    let rect = fit_to_page(1000, 2000, PageSize::LETTER);
    assert_eq!(rect.height, PageSize::LETTER.height);
    assert!((rect.width - PageSize::LETTER.height / 2.0).abs() < 1e-9);
    assert!(rect.width < PageSize::LETTER.width);
}

#[test]
fn placement_is_anchored_top_left() {
    let rect = fit_to_page(640, 480, PageSize::A4);
    assert_eq!((rect.x, rect.y), (0.0, 0.0));
}

#[test]
fn matching_ratio_fills_the_page() {
    let Rect {
        x,
        y,
        width,
        height,
    } = fit_to_page(210, 297, PageSize::A4);
    assert_eq!((x, y, height), (0.0, 0.0, 297.0));
    assert!((width - 210.0).abs() < 1e-9);
}
