// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for photo storage

use chrono::NaiveDate;
use location_checker::storage::{PendingPhoto, photo_file_name};
use std::io::Write;

#[test]
fn test_file_name_is_zero_padded() {
    let timestamp = NaiveDate::from_ymd_opt(2025, 1, 2)
        .and_then(|d| d.and_hms_opt(3, 4, 5))
        .unwrap();
    assert_eq!(photo_file_name(timestamp), "photo_20250102_030405.jpg");
}

#[test]
fn test_shared_destination_is_writable_once() {
    let dir = std::env::temp_dir().join(format!(
        "location-checker-storage-{}",
        std::process::id()
    ));
    let _ = std::fs::remove_dir_all(&dir);

    let timestamp = NaiveDate::from_ymd_opt(2024, 12, 31)
        .and_then(|d| d.and_hms_opt(23, 59, 59))
        .unwrap();
    let photo = PendingPhoto::create(&dir.join("nested"), timestamp);
    let shared = photo.share();
    assert!(shared.uri().ends_with("/my_images/photo_20241231_235959.jpg"));

    let mut file = shared.open_for_write().unwrap();
    file.write_all(b"jpeg").unwrap();
    drop(file);

    assert_eq!(std::fs::read(photo.path()).unwrap(), b"jpeg");
    let _ = std::fs::remove_dir_all(&dir);
}
