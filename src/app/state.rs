// SPDX-License-Identifier: GPL-3.0-only

//! Application state management

use crate::backends::{
    Capability, Fix, LocationDialog, LocationRequest, PermissionBackend, PermissionResponse,
    ProviderEvent, SoundId, SubscriptionId,
};
use crate::config::Config;
use crate::media::downscale::{ScaledPhoto, ViewSize};
use crate::storage::{PendingPhoto, SharedPhotoRef};
use chrono::NaiveDateTime;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Capture flow state machine
///
/// At most one suspension is pending at a time: the permission prompt, the
/// camera, or the decode.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub enum CaptureState {
    /// Nothing in flight
    #[default]
    Idle,
    /// Waiting for the user to answer the camera prompt
    AwaitingPermission,
    /// Camera owns the destination until it reports back
    Capturing { photo: PendingPhoto },
    /// Photo is being decoded for display
    Decoding { photo: PendingPhoto },
}

impl CaptureState {
    pub fn is_idle(&self) -> bool {
        matches!(self, CaptureState::Idle)
    }

    /// Pending photo, if the camera has been launched
    pub fn pending_photo(&self) -> Option<&PendingPhoto> {
        match self {
            CaptureState::Capturing { photo } | CaptureState::Decoding { photo } => Some(photo),
            _ => None,
        }
    }

    /// Reset to idle, returning the previous state
    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }
}

/// Location flow state machine
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub enum LocationState {
    /// Nothing in flight
    #[default]
    Idle,
    /// Waiting for the user to answer the location prompt
    AwaitingPermission,
    /// Subscribed, waiting for the first fix
    Subscribed { subscription: SubscriptionId },
}

impl LocationState {
    pub fn is_idle(&self) -> bool {
        matches!(self, LocationState::Idle)
    }

    /// Active subscription, if any
    pub fn subscription(&self) -> Option<SubscriptionId> {
        match self {
            LocationState::Subscribed { subscription } => Some(*subscription),
            _ => None,
        }
    }
}

/// Result of gating a flow behind a capability
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapabilityGate {
    /// Consent already given, the flow may proceed right away
    AlreadyGranted,
    /// A prompt was issued; the flow resumes on the response
    RequestIssued,
}

/// Messages delivered to the coordinator
#[derive(Debug, Clone)]
pub enum Message {
    // ===== User Actions =====
    /// Take photo button pressed
    TakePhotoClicked,
    /// Check location button pressed
    CheckLocationClicked,
    /// Location dialog dismissed
    DialogDismissed,
    /// Photo view changed size (layout)
    ViewResized(ViewSize),

    // ===== Permissions =====
    /// Answer to a capability request
    PermissionResult(PermissionResponse),

    // ===== Capture =====
    /// Camera returned; no image data, only whether it succeeded
    CaptureFinished { success: bool },
    /// Decode finished; `None` when the photo could not be shown
    PhotoDecoded(Option<Arc<ScaledPhoto>>),

    // ===== Location =====
    /// Position sample for a subscription
    LocationFix {
        subscription: SubscriptionId,
        fix: Fix,
    },
    /// Provider status notification without a position
    LocationStatus(ProviderEvent),
    /// No fix arrived before the deadline
    LocationTimedOut(SubscriptionId),
    /// Positioning service failed for a subscription
    LocationFailed {
        subscription: SubscriptionId,
        reason: String,
    },

    // ===== Feedback =====
    /// Sound effect completed on its own
    SoundFinished(SoundId),
}

/// Effects requested by the coordinator, executed by the runtime
#[derive(Debug, Clone)]
pub enum Command {
    /// Start the feedback sound, replacing any sound still playing
    PlaySound,
    /// Release a sound that completed
    ReleaseSound(SoundId),
    /// Ask the user for a capability
    RequestPermission {
        capability: Capability,
        request_code: i32,
    },
    /// Hand the shared destination to the camera
    LaunchCamera(SharedPhotoRef),
    /// Decode the captured photo for a view of `target` size
    DecodePhoto { path: PathBuf, target: ViewSize },
    /// Show a decoded photo
    DisplayPhoto(Arc<ScaledPhoto>),
    /// Empty the photo view
    ClearPhoto,
    /// Open a position subscription
    SubscribeLocation {
        subscription: SubscriptionId,
        request: LocationRequest,
        timeout: Option<Duration>,
    },
    /// Close a position subscription
    Unsubscribe(SubscriptionId),
    /// Transient notice
    ShowToast(String),
    /// Modal location dialog
    ShowDialog(LocationDialog),
}

/// Ordered list of commands produced by one update
#[derive(Debug, Default)]
#[must_use]
pub struct Task {
    commands: Vec<Command>,
}

impl Task {
    /// A task that does nothing
    pub fn none() -> Self {
        Self::default()
    }

    /// A task running a single command
    pub fn done(command: Command) -> Self {
        Self {
            commands: vec![command],
        }
    }

    /// Concatenate tasks, preserving order
    pub fn batch(tasks: impl IntoIterator<Item = Task>) -> Self {
        Self {
            commands: tasks.into_iter().flat_map(|t| t.commands).collect(),
        }
    }

    /// Append a command
    pub fn then(mut self, command: Command) -> Self {
        self.commands.push(command);
        self
    }

    /// Append a command in place
    pub fn push(&mut self, command: Command) {
        self.commands.push(command);
    }

    pub fn is_none(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn into_commands(self) -> Vec<Command> {
        self.commands
    }
}

/// The coordinator
///
/// Owns both flows and routes every [`Message`] to the handler of the flow it
/// belongs to. Holds no platform resources itself; everything it wants done
/// is returned as a [`Task`].
pub struct AppModel {
    /// User configuration
    pub config: Config,
    /// Consent checks (synchronous part of the permission backend)
    pub(crate) permissions: Arc<dyn PermissionBackend>,
    /// Directory new photos are written to
    pub photos_dir: PathBuf,
    /// Capture flow
    pub capture: CaptureState,
    /// Location flow
    pub location: LocationState,
    /// Current size of the photo view
    pub view_size: ViewSize,
    /// Photo currently shown, if any
    pub displayed_photo: Option<Arc<ScaledPhoto>>,
    /// Location dialog currently shown, if any
    pub dialog: Option<LocationDialog>,
    /// Source of capture timestamps
    pub(crate) clock: fn() -> NaiveDateTime,
    pub(crate) next_subscription: u64,
}

impl AppModel {
    pub fn new(config: Config, permissions: Arc<dyn PermissionBackend>) -> Self {
        let photos_dir = config.photos_dir();
        let view_size = ViewSize::new(config.view_width, config.view_height);
        Self {
            config,
            permissions,
            photos_dir,
            capture: CaptureState::default(),
            location: LocationState::default(),
            view_size,
            displayed_photo: None,
            dialog: None,
            clock: local_now,
            next_subscription: 1,
        }
    }

    /// Replace the timestamp source used for photo names
    pub fn with_clock(mut self, clock: fn() -> NaiveDateTime) -> Self {
        self.clock = clock;
        self
    }
}

fn local_now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}
