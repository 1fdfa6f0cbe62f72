// SPDX-License-Identifier: GPL-3.0-only

use crate::constants::{APP_ID, photo, timing, view};
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// How capability requests are answered
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum PermissionPolicy {
    /// Ask the user with a native dialog
    #[default]
    Ask,
    /// Grant every request without asking (headless use)
    GrantAll,
    /// Refuse every request
    DenyAll,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where captured photos are written (None = pictures dir)
    pub photos_dir: Option<PathBuf>,
    /// Camera device node, e.g. "/dev/video0" (None = autodetect)
    pub camera_device: Option<String>,
    /// Frames dropped before the photo frame is taken
    pub warmup_frames: u32,
    /// JPEG quality of captured photos (0-100)
    pub jpeg_quality: u8,
    /// Sound file played on each button press (None = synthesized click)
    pub sound_path: Option<PathBuf>,
    /// Seconds to wait for a position fix (None = wait indefinitely)
    pub location_timeout_secs: Option<u64>,
    /// Show a notice when the camera does not deliver a photo
    pub report_capture_failures: bool,
    /// How camera and location access requests are answered
    pub permission_policy: PermissionPolicy,
    /// Photo view width in pixels
    pub view_width: u32,
    /// Photo view height in pixels
    pub view_height: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            photos_dir: None,
            camera_device: None,
            warmup_frames: photo::DEFAULT_WARMUP_FRAMES,
            jpeg_quality: photo::DEFAULT_JPEG_QUALITY,
            sound_path: None,
            location_timeout_secs: Some(timing::DEFAULT_LOCATION_TIMEOUT_SECS),
            report_capture_failures: true,
            permission_policy: PermissionPolicy::default(),
            view_width: view::DEFAULT_WIDTH,
            view_height: view::DEFAULT_HEIGHT,
        }
    }
}

impl Config {
    /// Default location of the config file
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_ID).join("config.json"))
    }

    /// Load the config from its default location
    ///
    /// A missing or unreadable file yields the defaults.
    pub fn load() -> Self {
        match Self::path() {
            Some(path) => Self::load_from(&path),
            None => {
                warn!("No config directory available, using defaults");
                Self::default()
            }
        }
    }

    /// Load the config from a specific file, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "Config not readable, using defaults");
                return Self::default();
            }
        };

        match serde_json::from_str(&contents) {
            Ok(config) => config,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Malformed config, using defaults");
                Self::default()
            }
        }
    }

    /// Save the config to its default location
    pub fn save(&self) -> AppResult<()> {
        let path = Self::path().ok_or_else(|| AppError::Config("No config directory".into()))?;
        self.save_to(&path)
    }

    /// Save the config to a specific file
    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| AppError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, json)?;
        info!(path = %path.display(), "Config saved");
        Ok(())
    }

    /// Directory photos are written to
    pub fn photos_dir(&self) -> PathBuf {
        self.photos_dir
            .clone()
            .unwrap_or_else(crate::storage::default_photos_dir)
    }

    /// Location fix deadline, if any
    pub fn location_timeout(&self) -> Option<std::time::Duration> {
        self.location_timeout_secs
            .map(std::time::Duration::from_secs)
    }
}
