// SPDX-License-Identifier: GPL-3.0-only

//! Capture operations handlers
//!
//! Take photo → camera consent → camera writes the file → decode at reduced
//! size → display.

use crate::app::state::{AppModel, CaptureState, CapabilityGate, Command, Task};
use crate::backends::Capability;
use crate::constants::strings;
use crate::media::downscale::ScaledPhoto;
use crate::storage::PendingPhoto;
use std::sync::Arc;
use tracing::{debug, info, warn};

impl AppModel {
    pub(crate) fn handle_take_photo_clicked(&mut self) -> Task {
        let mut task = self.play_feedback();

        if !self.capture.is_idle() {
            debug!(state = ?self.capture, "Capture already in progress");
            return task;
        }

        match self.request_capability(Capability::Camera, &mut task) {
            CapabilityGate::AlreadyGranted => Task::batch([task, self.begin_capture()]),
            CapabilityGate::RequestIssued => {
                self.capture = CaptureState::AwaitingPermission;
                task
            }
        }
    }

    /// Designate a destination and hand it to the camera
    ///
    /// Only called once camera consent is known to be granted.
    pub(crate) fn begin_capture(&mut self) -> Task {
        let photo = PendingPhoto::create(&self.photos_dir, (self.clock)());
        let shared = photo.share();
        info!(uri = %shared.uri(), "Launching camera");
        self.capture = CaptureState::Capturing { photo };
        Task::done(Command::LaunchCamera(shared))
    }

    pub(crate) fn handle_capture_finished(&mut self, success: bool) -> Task {
        if !matches!(self.capture, CaptureState::Capturing { .. }) {
            warn!(state = ?self.capture, "Capture result without a launched camera");
            return Task::none();
        }
        let CaptureState::Capturing { photo } = self.capture.take() else {
            return Task::none();
        };

        if !success {
            info!(path = %photo.path().display(), "Camera did not produce a photo");
            if self.config.report_capture_failures {
                return Task::done(Command::ShowToast(strings::CAPTURE_FAILED.to_string()));
            }
            return Task::none();
        }

        self.display_photo(photo)
    }

    /// Decode the captured photo for the current view size
    fn display_photo(&mut self, photo: PendingPhoto) -> Task {
        if self.view_size.is_empty() {
            warn!(
                width = self.view_size.width,
                height = self.view_size.height,
                "Photo view has no size, not displaying photo"
            );
            return self.clear_displayed_photo();
        }

        let command = Command::DecodePhoto {
            path: photo.path().to_path_buf(),
            target: self.view_size,
        };
        self.capture = CaptureState::Decoding { photo };
        Task::done(command)
    }

    pub(crate) fn handle_photo_decoded(&mut self, decoded: Option<Arc<ScaledPhoto>>) -> Task {
        if !matches!(self.capture, CaptureState::Decoding { .. }) {
            warn!(state = ?self.capture, "Decoded photo without a pending decode");
            return Task::none();
        }
        let CaptureState::Decoding { photo } = self.capture.take() else {
            return Task::none();
        };

        match decoded {
            Some(scaled) => {
                info!(
                    path = %photo.path().display(),
                    width = scaled.width(),
                    height = scaled.height(),
                    sample_size = scaled.sample_size,
                    "Displaying photo"
                );
                self.displayed_photo = Some(Arc::clone(&scaled));
                Task::done(Command::DisplayPhoto(scaled))
            }
            None => {
                warn!(path = %photo.path().display(), "Photo could not be decoded");
                self.clear_displayed_photo()
            }
        }
    }

    fn clear_displayed_photo(&mut self) -> Task {
        self.displayed_photo = None;
        Task::done(Command::ClearPhoto)
    }
}
