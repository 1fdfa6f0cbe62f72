// SPDX-License-Identifier: GPL-3.0-only

//! Backend abstraction layer for the host platform services
//!
//! Every service the coordinator delegates to sits behind a trait so the
//! flows can run against real hardware or deterministic fakes:
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │           AppModel (coordinator)            │
//! └────────────────────┬────────────────────────┘
//!          Command ↓   │   ↑ Message (mpsc)
//! ┌────────────────────┴────────────────────────┐
//! │              Backend Layer                  │
//! │  Permissions   Camera     Location          │
//! │  (rfd)         (GStreamer) (GeoClue/zbus)   │
//! │  Audio         Presenter                    │
//! │  (GStreamer)   (terminal + rfd)             │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! Backends never call back into the coordinator directly. Results are posted
//! as [`Message`]s on the [`MessageSender`] they were handed, and the runtime
//! feeds them to [`AppModel::update`](crate::app::AppModel::update).
//!
//! # Modules
//!
//! - [`audio`]: Sound effect playback
//! - [`camera`]: Single photo capture
//! - [`location`]: GeoClue position subscription
//! - [`mock`]: Deterministic fakes for tests and dry runs
//! - [`permission`]: Capability prompts
//! - [`presenter`]: Terminal UI surface

pub mod audio;
pub mod camera;
pub mod location;
pub mod mock;
pub mod permission;
pub mod presenter;
pub mod types;

pub use types::{
    Accuracy, Capability, Fix, LocationDialog, LocationRequest, PermissionResponse,
    PermissionStatus, ProviderEvent, SoundId, SubscriptionId,
};

use crate::app::Message;
use crate::errors::BackendResult;
use crate::media::downscale::ScaledPhoto;
use crate::storage::SharedPhotoRef;
use std::sync::Arc;

/// Channel on which backends deliver their asynchronous results
pub type MessageSender = tokio::sync::mpsc::UnboundedSender<Message>;

/// Receiving end of [`MessageSender`]
pub type MessageReceiver = tokio::sync::mpsc::UnboundedReceiver<Message>;

/// User consent for sensitive capabilities
pub trait PermissionBackend: Send + Sync {
    /// Current consent state, answered synchronously
    fn check(&self, capability: Capability) -> PermissionStatus;

    /// Ask the user; the answer is posted later as
    /// [`Message::PermissionResult`] carrying `request_code`
    fn request(&self, capability: Capability, request_code: i32, reply: MessageSender);
}

/// External camera facility
pub trait CameraBackend: Send + Sync {
    /// Capture one photo into `destination`
    ///
    /// Exactly one [`Message::CaptureFinished`] is posted per launch. No image
    /// data travels back; the photo is read from the destination afterwards.
    fn launch(&self, destination: SharedPhotoRef, reply: MessageSender);
}

/// Positioning facility
pub trait LocationBackend: Send + Sync {
    /// Start delivering [`Message::LocationFix`] for `subscription`
    fn subscribe(
        &self,
        subscription: SubscriptionId,
        request: LocationRequest,
        reply: MessageSender,
    ) -> BackendResult<()>;

    /// Stop delivering fixes for `subscription`; unknown ids are ignored
    fn unsubscribe(&self, subscription: SubscriptionId);
}

/// Sound effect player
pub trait AudioBackend: Send + Sync {
    /// Start the feedback sound
    ///
    /// [`Message::SoundFinished`] is posted when playback completes on its own.
    fn play(&self, id: SoundId, reply: MessageSender) -> BackendResult<Box<dyn SoundHandle>>;
}

/// An in-flight sound; dropping it releases its resources
pub trait SoundHandle: Send {
    fn id(&self) -> SoundId;

    /// Stop playback. Calling it more than once has no further effect.
    fn stop(&mut self);
}

/// The single screen the user looks at
pub trait Presenter: Send + Sync {
    /// Fire-and-forget transient notice
    fn show_toast(&self, text: &str);

    /// Modal acknowledgment; [`Message::DialogDismissed`] is posted when the
    /// user presses the dismiss button
    fn show_dialog(&self, dialog: &LocationDialog, reply: MessageSender);

    /// Show the decoded photo in the photo view
    fn display_photo(&self, photo: &ScaledPhoto);

    /// Empty the photo view
    fn clear_photo(&self);
}

/// The full set of services the coordinator runs against
#[derive(Clone)]
pub struct Backends {
    pub permissions: Arc<dyn PermissionBackend>,
    pub camera: Arc<dyn CameraBackend>,
    pub location: Arc<dyn LocationBackend>,
    pub audio: Arc<dyn AudioBackend>,
    pub presenter: Arc<dyn Presenter>,
}
