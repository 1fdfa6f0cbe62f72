// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for configuration module

use location_checker::Config;
use location_checker::config::PermissionPolicy;
use std::path::PathBuf;
use std::time::Duration;

fn temp_config_path(name: &str) -> PathBuf {
    std::env::temp_dir()
        .join(format!("location-checker-config-{}-{}", name, std::process::id()))
        .join("config.json")
}

#[test]
fn test_config_default() {
    let config = Config::default();

    assert_eq!((config.view_width, config.view_height), (400, 300));
    assert_eq!(config.location_timeout(), Some(Duration::from_secs(30)));
    assert!(config.report_capture_failures);
    assert_eq!(config.permission_policy, PermissionPolicy::Ask);
}

#[test]
fn test_config_round_trip() {
    let path = temp_config_path("round-trip");
    let config = Config {
        photos_dir: Some(PathBuf::from("/tmp/photos")),
        location_timeout_secs: None,
        permission_policy: PermissionPolicy::GrantAll,
        ..Config::default()
    };

    config.save_to(&path).unwrap();
    let loaded = Config::load_from(&path);
    assert_eq!(loaded, config);
    assert_eq!(loaded.location_timeout(), None);

    let _ = std::fs::remove_dir_all(path.parent().unwrap());
}

#[test]
fn test_partial_config_fills_defaults() {
    let path = temp_config_path("partial");
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, r#"{ "view_width": 800 }"#).unwrap();

    let loaded = Config::load_from(&path);
    assert_eq!(loaded.view_width, 800);
    assert_eq!(loaded.view_height, 300);

    let _ = std::fs::remove_dir_all(path.parent().unwrap());
}

#[test]
fn test_malformed_config_falls_back_to_defaults() {
    let path = temp_config_path("malformed");
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, "not json at all").unwrap();

    assert_eq!(Config::load_from(&path), Config::default());

    let _ = std::fs::remove_dir_all(path.parent().unwrap());
}

#[test]
fn test_missing_config_falls_back_to_defaults() {
    let path = temp_config_path("missing");
    assert_eq!(Config::load_from(&path), Config::default());
}

#[test]
fn test_configured_photos_dir_wins() {
    let config = Config {
        photos_dir: Some(PathBuf::from("/srv/shots")),
        ..Config::default()
    };
    assert_eq!(config.photos_dir(), PathBuf::from("/srv/shots"));
    assert!(Config::default().photos_dir().ends_with("location-checker"));
}
