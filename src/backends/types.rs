// SPDX-License-Identifier: GPL-3.0-only

//! Shared types for the platform backends

use crate::constants::{request_codes, strings};
use std::fmt;
use std::time::Duration;

/// A permission-gated device feature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Camera access
    Camera,
    /// Fine-grained (GPS) location access
    FineLocation,
}

impl Capability {
    pub const ALL: [Capability; 2] = [Capability::Camera, Capability::FineLocation];

    /// Correlation code used when requesting this capability
    pub fn request_code(&self) -> i32 {
        match self {
            Capability::Camera => request_codes::CAMERA,
            Capability::FineLocation => request_codes::LOCATION,
        }
    }

    /// Reverse lookup of [`Capability::request_code`]
    pub fn from_request_code(code: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|cap| cap.request_code() == code)
    }

    /// Transient notice shown when the user refuses this capability
    pub fn denial_notice(&self) -> &'static str {
        match self {
            Capability::Camera => strings::CAMERA_PERMISSION_DENIED,
            Capability::FineLocation => strings::LOCATION_PERMISSION_DENIED,
        }
    }

    /// Human-readable name for permission prompts
    pub fn display_name(&self) -> &'static str {
        match self {
            Capability::Camera => "camera",
            Capability::FineLocation => "precise location",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Outcome of a permission check or a single grant result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
}

/// Answer to a capability request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionResponse {
    /// Code the request was issued with
    pub request_code: i32,
    /// One entry per requested permission, possibly empty
    pub grant_results: Vec<PermissionStatus>,
}

impl PermissionResponse {
    pub fn new(capability: Capability, status: PermissionStatus) -> Self {
        Self {
            request_code: capability.request_code(),
            grant_results: vec![status],
        }
    }

    /// A response whose result list came back empty (e.g. the prompt was
    /// interrupted)
    pub fn empty(capability: Capability) -> Self {
        Self {
            request_code: capability.request_code(),
            grant_results: Vec::new(),
        }
    }

    /// Granted only if the first result is a grant; empty means denied
    pub fn is_granted(&self) -> bool {
        self.grant_results.first() == Some(&PermissionStatus::Granted)
    }
}

/// A single reported position sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fix {
    pub latitude: f64,
    pub longitude: f64,
}

impl Fix {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Identifies one location subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Requested provider accuracy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accuracy {
    /// Best available (GPS)
    Fine,
    /// Network based
    Coarse,
}

/// Parameters of a location subscription
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocationRequest {
    pub accuracy: Accuracy,
    /// Minimum time between updates
    pub min_interval: Duration,
    /// Minimum distance in meters between updates
    pub min_distance: f32,
}

impl LocationRequest {
    /// Highest accuracy, next fix as soon as possible
    pub fn next_fix() -> Self {
        Self {
            accuracy: Accuracy::Fine,
            min_interval: Duration::ZERO,
            min_distance: 0.0,
        }
    }
}

/// Provider notifications that carry no position
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderEvent {
    StatusChanged { provider: String, status: i32 },
    Enabled(String),
    Disabled(String),
}

/// Identifies one sound effect playback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SoundId(pub u64);

/// Modal acknowledgment showing a position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationDialog {
    pub title: String,
    pub message: String,
    /// Label of the single dismiss button
    pub dismiss_label: String,
}

impl LocationDialog {
    pub fn for_fix(fix: Fix) -> Self {
        Self {
            title: strings::LOCATION_DIALOG_TITLE.to_string(),
            message: strings::location_message(fix.latitude, fix.longitude),
            dismiss_label: strings::OK.to_string(),
        }
    }
}
