// SPDX-License-Identifier: GPL-3.0-only

//! Message update handling
//!
//! The main `update()` function acts as a dispatcher, while specific handlers
//! are implemented in the `handlers` submodules organized by flow.
//!
//! # Handler Modules
//!
//! - `handlers::permission`: Capability gating and permission responses
//! - `handlers::capture`: Photo capture, decode and display
//! - `handlers::location`: Single-shot position lookup
//! - `handlers::feedback`: Button sound effect

use crate::app::state::{AppModel, Message, Task};
use tracing::debug;

impl AppModel {
    /// Main message handler - routes messages to appropriate handler methods.
    pub fn update(&mut self, message: Message) -> Task {
        match message {
            // ===== User Actions =====
            Message::TakePhotoClicked => self.handle_take_photo_clicked(),
            Message::CheckLocationClicked => self.handle_check_location_clicked(),
            Message::DialogDismissed => self.handle_dialog_dismissed(),
            Message::ViewResized(size) => {
                debug!(width = size.width, height = size.height, "Photo view resized");
                self.view_size = size;
                Task::none()
            }

            // ===== Permissions =====
            Message::PermissionResult(response) => self.handle_permission_result(response),

            // ===== Capture =====
            Message::CaptureFinished { success } => self.handle_capture_finished(success),
            Message::PhotoDecoded(photo) => self.handle_photo_decoded(photo),

            // ===== Location =====
            Message::LocationFix { subscription, fix } => {
                self.handle_location_fix(subscription, fix)
            }
            Message::LocationStatus(event) => self.handle_location_status(event),
            Message::LocationTimedOut(subscription) => {
                self.handle_location_timed_out(subscription)
            }
            Message::LocationFailed {
                subscription,
                reason,
            } => self.handle_location_failed(subscription, reason),

            // ===== Feedback =====
            Message::SoundFinished(id) => self.handle_sound_finished(id),
        }
    }

    /// Release everything still in flight
    ///
    /// Called once when the session ends. Closes an open position
    /// subscription and abandons a pending capture.
    pub fn teardown(&mut self) -> Task {
        let mut task = Task::none();

        if let Some(subscription) = self.location.subscription() {
            debug!(%subscription, "Closing subscription on teardown");
            task = task.then(crate::app::Command::Unsubscribe(subscription));
        }
        self.location = Default::default();

        if let Some(photo) = self.capture.take().pending_photo() {
            debug!(path = %photo.path().display(), "Abandoning pending photo on teardown");
        }

        self.dialog = None;
        task
    }
}
