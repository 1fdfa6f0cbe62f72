// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands
//!
//! This module provides command-line functionality for:
//! - The interactive two-button session
//! - One-shot photo capture and location lookup
//! - Reduced-size decoding of an existing image
//! - Showing the active configuration

use location_checker::backends::audio::GstAudio;
use location_checker::backends::camera::GstCamera;
use location_checker::backends::location::GeoClueLocation;
use location_checker::backends::mock::{
    MockAudio, MockCamera, MockLocation, MockPermissions, MockShot,
};
use location_checker::backends::presenter::TerminalPresenter;
use location_checker::backends::{Backends, Fix, PermissionStatus, Presenter, permission};
use location_checker::config::PermissionPolicy;
use location_checker::media::{ViewSize, load_scaled};
use location_checker::{Config, Message, Runtime};
use std::path::Path;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

/// Position reported by the simulated location service
const SIMULATED_FIX: Fix = Fix {
    latitude: 37.422,
    longitude: -122.0841,
};

/// Services for a session, real or simulated
fn build_backends(config: &Config, simulate: bool) -> Backends {
    if simulate {
        info!("Using simulated backends");
        let permissions: Arc<dyn location_checker::backends::PermissionBackend> =
            match config.permission_policy {
                PermissionPolicy::DenyAll => {
                    Arc::new(MockPermissions::answering(PermissionStatus::Denied))
                }
                PermissionPolicy::Ask | PermissionPolicy::GrantAll => {
                    Arc::new(MockPermissions::answering(PermissionStatus::Granted))
                }
            };
        return Backends {
            permissions,
            camera: Arc::new(MockCamera::new(MockShot::Photo {
                width: 1600,
                height: 1200,
            })),
            location: Arc::new(MockLocation::scripted(vec![SIMULATED_FIX])),
            audio: Arc::new(MockAudio::new()),
            presenter: Arc::new(TerminalPresenter::new(false)),
        };
    }

    Backends {
        permissions: permission::for_policy(config.permission_policy),
        camera: Arc::new(GstCamera::new(
            config.camera_device.clone(),
            config.warmup_frames,
            config.jpeg_quality,
        )),
        location: Arc::new(GeoClueLocation::new()),
        audio: Arc::new(GstAudio::new(config.sound_path.clone())),
        presenter: Arc::new(TerminalPresenter::new(true)),
    }
}

/// Interactive session reading single-letter commands from stdin
pub async fn run_interactive(
    config: Config,
    simulate: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let backends = build_backends(&config, simulate);
    let mut runtime = Runtime::new(config, backends);
    let sender = runtime.sender();

    println!("Photos are saved to {}", runtime.model().photos_dir.display());
    println!("[p] take photo  [l] check location  [q] quit");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let message = match line.trim() {
                    "p" => Message::TakePhotoClicked,
                    "l" => Message::CheckLocationClicked,
                    "q" => break,
                    "" => continue,
                    other => {
                        println!("Unknown command '{}'", other);
                        continue;
                    }
                };
                sender.send(message)?;
            }
            _ = tokio::signal::ctrl_c() => break,
            _ = runtime.step() => {}
        }
    }

    runtime.shutdown();
    Ok(())
}

/// Take one photo and show it
pub async fn take_photo(config: Config, simulate: bool) -> Result<(), Box<dyn std::error::Error>> {
    let backends = build_backends(&config, simulate);
    let mut runtime = Runtime::new(config, backends);

    runtime.dispatch(Message::TakePhotoClicked);
    runtime.run_until(None, |model| model.capture.is_idle()).await;

    let result = match &runtime.model().displayed_photo {
        Some(photo) => {
            println!("Photo saved: {}", photo.path.display());
            Ok(())
        }
        None => Err("No photo captured".into()),
    };

    runtime.shutdown();
    result
}

/// Look up the current position once
pub async fn locate(config: Config, simulate: bool) -> Result<(), Box<dyn std::error::Error>> {
    let backends = build_backends(&config, simulate);
    let mut runtime = Runtime::new(config, backends);

    runtime.dispatch(Message::CheckLocationClicked);
    runtime.run_until(None, |model| model.location.is_idle()).await;

    if runtime.model().dialog.is_none() {
        runtime.shutdown();
        return Err("No position fix received".into());
    }

    // Keep running until the dialog is acknowledged
    runtime.run_until(None, |model| model.dialog.is_none()).await;
    runtime.shutdown();
    Ok(())
}

/// Decode `file` for a view of `width` x `height` and draw it
pub fn downscale(file: &Path, width: u32, height: u32) -> Result<(), Box<dyn std::error::Error>> {
    let photo = load_scaled(file, ViewSize::new(width, height))?;
    TerminalPresenter::new(false).display_photo(&photo);
    Ok(())
}

/// Print the active configuration as JSON
pub fn print_config(
    config: &Config,
    path: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    match path.map(Path::to_path_buf).or_else(Config::path) {
        Some(path) => println!("# {}", path.display()),
        None => println!("# (no config directory)"),
    }
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(())
}
