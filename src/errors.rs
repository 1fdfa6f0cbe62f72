// SPDX-License-Identifier: GPL-3.0-only

//! Error types for the location checker

use std::fmt;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Result type alias for hardware backends
pub type BackendResult<T> = Result<T, BackendError>;

/// Main application error type
#[derive(Debug, Clone)]
pub enum AppError {
    /// A capability was not granted by the user
    PermissionDenied(String),
    /// Photo capture errors
    Capture(CaptureError),
    /// Position lookup errors
    Location(LocationError),
    /// Sound effect errors
    Audio(AudioError),
    /// Photo decode errors
    Decode(DecodeError),
    /// Configuration errors
    Config(String),
    /// Storage/filesystem errors
    Storage(String),
    /// Generic error with message
    Other(String),
}

/// Photo capture errors
#[derive(Debug, Clone)]
pub enum CaptureError {
    /// No camera device could be opened
    NoCameraFound,
    /// Capture pipeline could not be built or started
    PipelineFailed(String),
    /// No frame arrived before the capture deadline
    NoFrameAvailable,
    /// JPEG encoding failed
    EncodingFailed(String),
    /// Writing to the shared destination failed
    SaveFailed(String),
}

/// Position lookup errors
#[derive(Debug, Clone)]
pub enum LocationError {
    /// Positioning service is not reachable
    ServiceUnavailable(String),
    /// Service rejected the subscription
    SubscriptionFailed(String),
    /// No fix arrived in time
    TimedOut,
}

/// Sound effect errors
#[derive(Debug, Clone)]
pub enum AudioError {
    /// Playback pipeline could not be built or started
    PipelineFailed(String),
    /// Sound file does not exist
    MissingSound(String),
}

/// Photo decode errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Photo file could not be read
    Io(String),
    /// Photo data is not a decodable image
    Image(String),
    /// Display target has no area (not laid out yet)
    ZeroTarget,
    /// Image header reports a zero dimension
    ZeroSource,
}

/// Low level backend errors
#[derive(Debug, Clone)]
pub enum BackendError {
    /// Backend is not available on this system
    NotAvailable(String),
    /// Failed to initialize backend
    InitializationFailed(String),
    /// General I/O error
    IoError(String),
    /// Other errors
    Other(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::PermissionDenied(what) => write!(f, "Permission denied: {}", what),
            AppError::Capture(e) => write!(f, "Capture error: {}", e),
            AppError::Location(e) => write!(f, "Location error: {}", e),
            AppError::Audio(e) => write!(f, "Audio error: {}", e),
            AppError::Decode(e) => write!(f, "Decode error: {}", e),
            AppError::Config(msg) => write!(f, "Configuration error: {}", msg),
            AppError::Storage(msg) => write!(f, "Storage error: {}", msg),
            AppError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureError::NoCameraFound => write!(f, "No camera devices found"),
            CaptureError::PipelineFailed(msg) => write!(f, "Capture pipeline failed: {}", msg),
            CaptureError::NoFrameAvailable => write!(f, "No frame available for capture"),
            CaptureError::EncodingFailed(msg) => write!(f, "Encoding failed: {}", msg),
            CaptureError::SaveFailed(msg) => write!(f, "Save failed: {}", msg),
        }
    }
}

impl fmt::Display for LocationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocationError::ServiceUnavailable(msg) => {
                write!(f, "Location service unavailable: {}", msg)
            }
            LocationError::SubscriptionFailed(msg) => write!(f, "Subscription failed: {}", msg),
            LocationError::TimedOut => write!(f, "Timed out waiting for a position fix"),
        }
    }
}

impl fmt::Display for AudioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AudioError::PipelineFailed(msg) => write!(f, "Playback pipeline failed: {}", msg),
            AudioError::MissingSound(path) => write!(f, "Sound file not found: {}", path),
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::Io(msg) => write!(f, "Failed to read photo: {}", msg),
            DecodeError::Image(msg) => write!(f, "Failed to decode photo: {}", msg),
            DecodeError::ZeroTarget => write!(f, "Display target has zero size"),
            DecodeError::ZeroSource => write!(f, "Photo has zero size"),
        }
    }
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::NotAvailable(msg) => write!(f, "Backend not available: {}", msg),
            BackendError::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            BackendError::IoError(msg) => write!(f, "I/O error: {}", msg),
            BackendError::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}
impl std::error::Error for CaptureError {}
impl std::error::Error for LocationError {}
impl std::error::Error for AudioError {}
impl std::error::Error for DecodeError {}
impl std::error::Error for BackendError {}

impl From<CaptureError> for AppError {
    fn from(err: CaptureError) -> Self {
        AppError::Capture(err)
    }
}

impl From<LocationError> for AppError {
    fn from(err: LocationError) -> Self {
        AppError::Location(err)
    }
}

impl From<AudioError> for AppError {
    fn from(err: AudioError) -> Self {
        AppError::Audio(err)
    }
}

impl From<DecodeError> for AppError {
    fn from(err: DecodeError) -> Self {
        AppError::Decode(err)
    }
}

impl From<BackendError> for AppError {
    fn from(err: BackendError) -> Self {
        AppError::Other(err.to_string())
    }
}

impl From<String> for AppError {
    fn from(msg: String) -> Self {
        AppError::Other(msg)
    }
}

impl From<&str> for AppError {
    fn from(msg: &str) -> Self {
        AppError::Other(msg.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<std::io::Error> for CaptureError {
    fn from(err: std::io::Error) -> Self {
        CaptureError::SaveFailed(err.to_string())
    }
}

impl From<std::io::Error> for BackendError {
    fn from(err: std::io::Error) -> Self {
        BackendError::IoError(err.to_string())
    }
}

impl From<std::io::Error> for DecodeError {
    fn from(err: std::io::Error) -> Self {
        DecodeError::Io(err.to_string())
    }
}

impl From<image::ImageError> for DecodeError {
    fn from(err: image::ImageError) -> Self {
        match err {
            image::ImageError::IoError(e) => DecodeError::Io(e.to_string()),
            other => DecodeError::Image(other.to_string()),
        }
    }
}

impl From<CaptureError> for BackendError {
    fn from(err: CaptureError) -> Self {
        BackendError::Other(err.to_string())
    }
}

impl From<AudioError> for BackendError {
    fn from(err: AudioError) -> Self {
        BackendError::Other(err.to_string())
    }
}

impl From<LocationError> for BackendError {
    fn from(err: LocationError) -> Self {
        BackendError::NotAvailable(err.to_string())
    }
}
