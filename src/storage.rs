// SPDX-License-Identifier: GPL-3.0-only

//! Storage utilities for captured photos
//!
//! Photos live in an app-private pictures directory and are named after the
//! moment the capture was requested. The camera never sees the raw path: it
//! receives a [`SharedPhotoRef`] that can be opened for writing exactly once.

use crate::constants::{APP_ID, photo};
use chrono::NaiveDateTime;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default directory for captured photos (`~/Pictures/location-checker`)
pub fn default_photos_dir() -> PathBuf {
    dirs::picture_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("Pictures")))
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_ID)
}

/// Build the file name for a photo taken at `timestamp`
///
/// The format is fixed (`photo_yyyyMMdd_HHmmss.jpg`) and does not depend on
/// the user's locale.
pub fn photo_file_name(timestamp: NaiveDateTime) -> String {
    format!(
        "{}{}.{}",
        photo::FILE_PREFIX,
        timestamp.format(photo::TIMESTAMP_FORMAT),
        photo::FILE_EXTENSION
    )
}

/// Destination of a photo that has been requested but not yet displayed
///
/// Owned by the capture flow from the moment the camera is launched until the
/// decoded image has been handed to the view (or the flow was abandoned).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingPhoto {
    path: PathBuf,
}

impl PendingPhoto {
    /// Designate a new photo file in `dir` for a capture requested at `timestamp`
    pub fn create(dir: &Path, timestamp: NaiveDateTime) -> Self {
        let path = dir.join(photo_file_name(timestamp));
        debug!(path = %path.display(), "Designated photo destination");
        Self { path }
    }

    /// Wrap an existing path
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Local path of the photo file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name component
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Create the write grant handed to the camera
    pub fn share(&self) -> SharedPhotoRef {
        SharedPhotoRef {
            uri: format!(
                "content://{}/{}/{}",
                photo::SHARE_AUTHORITY,
                photo::SHARE_PATH,
                self.file_name()
            ),
            path: self.path.clone(),
        }
    }
}

/// Capability-scoped reference to a photo destination
///
/// Carries a content URI for display and logging. The underlying file can
/// only be reached through [`SharedPhotoRef::open_for_write`], which consumes
/// the reference so the grant is single use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedPhotoRef {
    uri: String,
    path: PathBuf,
}

impl SharedPhotoRef {
    /// Content URI identifying the destination
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Open the destination for writing, creating its directory if needed
    pub fn open_for_write(self) -> std::io::Result<File> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        debug!(uri = %self.uri, "Opening shared photo destination");
        File::create(&self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn timestamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 7)
            .and_then(|d| d.and_hms_opt(9, 5, 2))
            .unwrap()
    }

    #[test]
    fn test_photo_file_name_is_zero_padded() {
        assert_eq!(photo_file_name(timestamp()), "photo_20240307_090502.jpg");
    }

    #[test]
    fn test_share_uri_uses_file_name_only() {
        let pending = PendingPhoto::create(Path::new("/tmp/pics"), timestamp());
        let shared = pending.share();
        assert_eq!(
            shared.uri(),
            "content://location-checker.fileprovider/my_images/photo_20240307_090502.jpg"
        );
        assert!(!shared.uri().contains("/tmp/pics"));
    }
}
