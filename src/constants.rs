// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

use std::time::Duration;

/// Application identifier used for directories and D-Bus registration
pub const APP_ID: &str = "location-checker";

/// Permission request correlation codes
///
/// Each capability gets its own code so a permission response can be
/// routed back to the flow that asked for it.
pub mod request_codes {
    /// Fine-grained location access
    pub const LOCATION: i32 = 1;

    /// Camera access
    pub const CAMERA: i32 = 2;
}

/// Photo file naming
pub mod photo {
    /// File name prefix for captured photos
    pub const FILE_PREFIX: &str = "photo_";

    /// File extension for captured photos
    pub const FILE_EXTENSION: &str = "jpg";

    /// chrono format for the timestamp part (yyyyMMdd_HHmmss)
    pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

    /// Authority part of shared photo references
    pub const SHARE_AUTHORITY: &str = "location-checker.fileprovider";

    /// Path segment under the authority
    pub const SHARE_PATH: &str = "my_images";

    /// Default JPEG quality (0-100)
    pub const DEFAULT_JPEG_QUALITY: u8 = 92;

    /// Frames to discard while the sensor settles
    pub const DEFAULT_WARMUP_FRAMES: u32 = 10;
}

/// Display defaults for the photo view
pub mod view {
    /// Default photo view width in pixels
    pub const DEFAULT_WIDTH: u32 = 400;

    /// Default photo view height in pixels
    pub const DEFAULT_HEIGHT: u32 = 300;
}

/// Timing constants
pub mod timing {
    use super::Duration;

    /// Default wait for a position fix before giving up
    pub const DEFAULT_LOCATION_TIMEOUT_SECS: u64 = 30;

    /// Deadline for the camera pipeline to deliver frames
    pub const CAPTURE_TIMEOUT: Duration = Duration::from_secs(5);

    /// Poll interval of the sound bus watcher
    pub const SOUND_POLL_INTERVAL_MS: u64 = 100;

    /// Length of the synthesized click in audio buffers
    pub const BEEP_BUFFERS: u32 = 6;
}

/// User-visible strings
pub mod strings {
    /// Title of the location dialog
    pub const LOCATION_DIALOG_TITLE: &str = "Your Location";

    /// Single dismiss button of the location dialog
    pub const OK: &str = "OK";

    /// Transient notice when camera access is refused
    pub const CAMERA_PERMISSION_DENIED: &str = "Camera permission denied";

    /// Transient notice when location access is refused
    pub const LOCATION_PERMISSION_DENIED: &str = "Location permission denied";

    /// Transient notice when the camera did not produce a photo
    pub const CAPTURE_FAILED: &str = "Photo capture failed";

    /// Transient notice when no fix arrived in time
    pub const LOCATION_UNAVAILABLE: &str = "Location unavailable";

    /// Body of the location dialog, coordinates with six decimals
    pub fn location_message(latitude: f64, longitude: f64) -> String {
        format!("Latitude: {:.6}\nLongitude: {:.6}", latitude, longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_codes_are_distinct() {
        assert_ne!(request_codes::LOCATION, request_codes::CAMERA);
    }

    #[test]
    fn test_location_message_keeps_sign() {
        let message = strings::location_message(37.422, -122.0841);
        assert!(message.contains("37.422"));
        assert!(message.contains("-122.0841"));
    }
}
