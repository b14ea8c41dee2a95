//! Directory batch conversion.

mod common;

use common::*;
use image_to_schematic::models::AppConfig;
use image_to_schematic::services::batch::ItemOutcome;
use image_to_schematic::services::{BatchDriver, LoadedImage, SizeLimits};
use image_to_schematic::AppError;
use pixel_stacker::PixelBuffer;
use pretty_assertions::assert_eq;
use std::path::Path;

/// Decodes normally, except files named `empty.*` which come back with no pixels.
fn loader_with_empty_image(path: &Path, limits: SizeLimits) -> Result<LoadedImage, AppError> {
    if path.file_stem().is_some_and(|s| s == "empty") {
        return Ok(LoadedImage {
            buffer: PixelBuffer::new(0, 0, Vec::new()).unwrap(),
            source_width: 0,
            source_height: 0,
        });
    }
    image_to_schematic::services::load_image(path, limits.max_width, limits.max_height)
}

#[test]
fn test_batch_reports_success_and_render_failure() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write_solid_png(input.path(), "valid.png", 4, 2, colors::RED);
    write_solid_png(input.path(), "empty.png", 1, 1, colors::RED);

    let converter = test_converter(top_view());
    let report = BatchDriver::new(&converter, &AppConfig::default())
        .with_loader(loader_with_empty_image)
        .run(input.path(), output.path())
        .unwrap();

    assert_eq!(report.succeeded(), 1);
    assert_eq!(report.failed(), 1);
    assert!(!report.is_success());

    // Sorted by name: empty.png before valid.png
    match &report.items[0] {
        ItemOutcome::Failed { input, kind, .. } => {
            assert_eq!(input.file_name().unwrap(), "empty.png");
            assert_eq!(*kind, "render");
        }
        other => panic!("Expected failure, got {other:?}"),
    }
    assert!(report.items[1].is_success());

    assert!(!output.path().join("empty.schematic").exists());
    let parsed = assert_schematic_file(
        &output.path().join("valid.schematic"),
        converter.palette(),
        4,
        2,
    );
    assert_uniform(&parsed, converter.palette(), "WOOL_14");
}

#[test]
fn test_batch_skips_non_images_and_creates_output_dir() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    let out_dir = output.path().join("schematics");
    write_solid_png(input.path(), "a.png", 2, 2, colors::BLUE);
    write_solid_png(input.path(), "B.PNG", 2, 2, colors::WHITE);
    std::fs::write(input.path().join("readme.txt"), "not an image").unwrap();

    let converter = test_converter(top_view());
    let report = BatchDriver::new(&converter, &AppConfig::default())
        .run(input.path(), &out_dir)
        .unwrap();

    assert_eq!(report.items.len(), 2);
    assert!(report.is_success());
    assert!(out_dir.join("a.schematic").exists());
    assert!(out_dir.join("B.schematic").exists());
    assert!(!out_dir.join("readme.schematic").exists());
}

#[test]
fn test_undecodable_image_is_reported() {
    let input = tempfile::tempdir().unwrap();
    std::fs::write(input.path().join("broken.jpg"), b"\xff\xd8garbage").unwrap();
    write_solid_png(input.path(), "ok.png", 1, 1, colors::BLACK);

    let converter = test_converter(top_view());
    let report = BatchDriver::new(&converter, &AppConfig::default())
        .run(input.path(), input.path())
        .unwrap();

    assert_eq!(report.succeeded(), 1);
    assert!(matches!(
        &report.items[0],
        ItemOutcome::Failed { kind: "decode", .. }
    ));
}

#[test]
fn test_fail_fast_stops_batch() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write_solid_png(input.path(), "empty.png", 1, 1, colors::RED);
    write_solid_png(input.path(), "later.png", 1, 1, colors::RED);

    let converter = test_converter(top_view());
    let report = BatchDriver::new(&converter, &AppConfig::default())
        .with_loader(loader_with_empty_image)
        .fail_fast(true)
        .run(input.path(), output.path())
        .unwrap();

    assert_eq!(report.items.len(), 1);
    assert!(report.stopped_early);
    assert!(!output.path().join("later.schematic").exists());
}

#[test]
fn test_batch_applies_size_limits() {
    let input = tempfile::tempdir().unwrap();
    write_solid_png(input.path(), "wide.png", 16, 4, colors::BLUE);

    let config = AppConfig {
        max_width: Some(8),
        ..AppConfig::default()
    };
    let converter = test_converter(top_view());
    let report = BatchDriver::new(&converter, &config)
        .run(input.path(), input.path())
        .unwrap();

    match &report.items[0] {
        ItemOutcome::Converted(item) => {
            assert_eq!((item.width, item.height), (8, 2));
            assert_eq!((item.source_width, item.source_height), (16, 4));
        }
        other => panic!("Expected success, got {other:?}"),
    }
}

#[test]
fn test_report_json() {
    let input = tempfile::tempdir().unwrap();
    write_solid_png(input.path(), "one.png", 2, 1, colors::WHITE);

    let converter = test_converter(top_view());
    let report = BatchDriver::new(&converter, &AppConfig::default())
        .run(input.path(), input.path())
        .unwrap();

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["items"][0]["status"], "converted");
    assert_eq!(json["items"][0]["materials"]["WOOL_00"], 2);
    assert_eq!(json["stopped_early"], false);
}
