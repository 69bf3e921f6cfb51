#![cfg(unix)]

use std::io::Cursor;
use std::sync::Mutex;

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use paperdock_core::StagedFile;
use paperdock_engine::{
    CapabilityError, CommandSegmenter, SegmentationConfig, Segmenter, SegmenterSettings,
};

fn copying_segmenter() -> CommandSegmenter {
    CommandSegmenter::new(SegmenterSettings {
        program: "cp".to_string(),
        args: vec!["{input}".to_string(), "{output}".to_string()],
        ..SegmenterSettings::default()
    })
}

fn encoded(format: ImageFormat) -> Vec<u8> {
    let image = RgbImage::from_pixel(4, 2, Rgb([10, 200, 10]));
    let mut buffer = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(image)
        .write_to(&mut buffer, format)
        .unwrap();
    buffer.into_inner()
}

#[tokio::test]
async fn png_output_is_passed_through() {
    paperdock_logging::initialize_for_tests();
    let segmenter = copying_segmenter();
    assert!(segmenter.probe());

    let input = encoded(ImageFormat::Png);
    let file = StagedFile::new("leaf.png", "image/png", input.clone());
    let progress = Mutex::new(Vec::new());
    let on_progress = |fraction: f32| progress.lock().unwrap().push(fraction);

    let output = segmenter
        .remove_background(
            &file,
            SegmentationConfig {
                asset_location: Some("/tmp/models"),
                on_progress: &on_progress,
            },
        )
        .await
        .unwrap();

    assert_eq!(output.as_ref(), input.as_slice());
    assert_eq!(*progress.lock().unwrap(), vec![0.0, 1.0]);
}

#[tokio::test]
async fn non_png_output_is_reencoded() {
    let segmenter = copying_segmenter();
    let file = StagedFile::new("leaf.jpg", "image/jpeg", encoded(ImageFormat::Jpeg));
    let on_progress = |_: f32| {};

    let output = segmenter
        .remove_background(
            &file,
            SegmentationConfig {
                asset_location: None,
                on_progress: &on_progress,
            },
        )
        .await
        .unwrap();

    assert_eq!(image::guess_format(&output).unwrap(), ImageFormat::Png);
    let decoded = image::load_from_memory(&output).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (4, 2));
}

#[tokio::test]
async fn failing_program_is_a_segmentation_error() {
    let segmenter = CommandSegmenter::new(SegmenterSettings {
        program: "false".to_string(),
        args: Vec::new(),
        ..SegmenterSettings::default()
    });
    let file = StagedFile::new("leaf.png", "image/png", encoded(ImageFormat::Png));
    let on_progress = |_: f32| {};

    let err = segmenter
        .remove_background(
            &file,
            SegmentationConfig {
                asset_location: None,
                on_progress: &on_progress,
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, CapabilityError::Segmentation(_)), "{err:?}");
}

#[tokio::test]
async fn missing_program_is_unavailable() {
    let segmenter = CommandSegmenter::new(SegmenterSettings {
        program: "paperdock-no-such-segmenter".to_string(),
        ..SegmenterSettings::default()
    });
    assert!(!segmenter.probe());

    let file = StagedFile::new("leaf.png", "image/png", encoded(ImageFormat::Png));
    let on_progress = |_: f32| {};
    let err = segmenter
        .remove_background(
            &file,
            SegmentationConfig {
                asset_location: None,
                on_progress: &on_progress,
            },
        )
        .await
        .unwrap_err();

    assert_eq!(
        err,
        CapabilityError::Unavailable("paperdock-no-such-segmenter".to_string())
    );
}
