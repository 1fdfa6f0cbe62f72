// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for reduced-size photo loading

use image::{Rgb, RgbImage};
use location_checker::errors::DecodeError;
use location_checker::media::downscale::probe_dimensions;
use location_checker::media::{ViewSize, load_scaled};
use std::path::PathBuf;

fn write_photo(name: &str, width: u32, height: u32) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "location-checker-downscale-{}",
        std::process::id()
    ));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    RgbImage::from_pixel(width, height, Rgb([200, 100, 50]))
        .save(&path)
        .unwrap();
    path
}

#[test]
fn test_probe_reads_header_dimensions() {
    let path = write_photo("probe.jpg", 120, 80);
    assert_eq!(probe_dimensions(&path).unwrap(), (120, 80));
}

#[test]
fn test_large_photo_is_reduced() {
    let path = write_photo("large.jpg", 800, 600);
    let photo = load_scaled(&path, ViewSize::new(400, 300)).unwrap();

    assert_eq!(photo.sample_size, 2);
    assert_eq!((photo.width(), photo.height()), (400, 300));
    assert_eq!((photo.source_width, photo.source_height), (800, 600));
}

#[test]
fn test_small_photo_is_not_enlarged() {
    let path = write_photo("small.png", 100, 50);
    let photo = load_scaled(&path, ViewSize::new(400, 300)).unwrap();

    assert_eq!(photo.sample_size, 1);
    assert_eq!((photo.width(), photo.height()), (100, 50));
}

#[test]
fn test_zero_target_is_rejected() {
    let path = write_photo("zero.jpg", 40, 30);
    assert_eq!(
        load_scaled(&path, ViewSize::new(0, 300)).unwrap_err(),
        DecodeError::ZeroTarget
    );
}

#[test]
fn test_missing_file_is_an_io_error() {
    let err = load_scaled(
        &PathBuf::from("/nonexistent/photo.jpg"),
        ViewSize::new(400, 300),
    )
    .unwrap_err();
    assert!(matches!(err, DecodeError::Io(_)));
}
