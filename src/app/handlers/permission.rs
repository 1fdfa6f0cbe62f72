// SPDX-License-Identifier: GPL-3.0-only

//! Capability gating
//!
//! Every sensitive operation goes through [`AppModel::request_capability`].
//! If consent is already known the flow continues synchronously, otherwise a
//! prompt is issued and the flow resumes from
//! [`AppModel::handle_permission_result`] exactly once.

use crate::app::state::{AppModel, CaptureState, CapabilityGate, Command, LocationState, Task};
use crate::backends::{Capability, PermissionResponse, PermissionStatus};
use tracing::{info, warn};

impl AppModel {
    /// Check consent for `capability`, issuing a prompt when it is missing
    ///
    /// The prompt command is appended to `task`.
    pub(crate) fn request_capability(
        &self,
        capability: Capability,
        task: &mut Task,
    ) -> CapabilityGate {
        if self.permissions.check(capability) == PermissionStatus::Granted {
            return CapabilityGate::AlreadyGranted;
        }

        let request_code = capability.request_code();
        info!(%capability, request_code, "Requesting permission");
        task.push(Command::RequestPermission {
            capability,
            request_code,
        });
        CapabilityGate::RequestIssued
    }

    pub(crate) fn handle_permission_result(&mut self, response: PermissionResponse) -> Task {
        let Some(capability) = Capability::from_request_code(response.request_code) else {
            warn!(
                request_code = response.request_code,
                "Permission result for unknown request code"
            );
            return Task::none();
        };

        let granted = response.is_granted();
        info!(%capability, granted, "Permission result");

        match capability {
            Capability::Camera => {
                if self.capture != CaptureState::AwaitingPermission {
                    warn!("Camera permission result without a pending capture");
                    return Task::none();
                }
                if granted {
                    self.begin_capture()
                } else {
                    self.capture = CaptureState::Idle;
                    Task::done(Command::ShowToast(capability.denial_notice().to_string()))
                }
            }
            Capability::FineLocation => {
                if self.location != LocationState::AwaitingPermission {
                    warn!("Location permission result without a pending lookup");
                    return Task::none();
                }
                if granted {
                    self.fetch_location()
                } else {
                    self.location = LocationState::Idle;
                    Task::done(Command::ShowToast(capability.denial_notice().to_string()))
                }
            }
        }
    }
}
