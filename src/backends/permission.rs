// SPDX-License-Identifier: GPL-3.0-only

//! Capability prompts
//!
//! Desktop sessions have no per-app camera/location consent store the way a
//! phone does, so consent is asked for with a native yes/no dialog and
//! remembered for the rest of the process.

use super::{Capability, MessageSender, PermissionBackend, PermissionResponse, PermissionStatus};
use crate::app::Message;
use crate::config::PermissionPolicy;
use rfd::{MessageButtons, MessageDialog, MessageDialogResult, MessageLevel};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

/// Asks the user with a native dialog
#[derive(Default)]
pub struct DialogPermissions {
    granted: Arc<Mutex<HashSet<Capability>>>,
}

impl DialogPermissions {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PermissionBackend for DialogPermissions {
    fn check(&self, capability: Capability) -> PermissionStatus {
        match self.granted.lock() {
            Ok(granted) if granted.contains(&capability) => PermissionStatus::Granted,
            _ => PermissionStatus::Denied,
        }
    }

    fn request(&self, capability: Capability, request_code: i32, reply: MessageSender) {
        let granted = Arc::clone(&self.granted);

        // The dialog blocks until answered
        tokio::task::spawn_blocking(move || {
            let answer = MessageDialog::new()
                .set_level(MessageLevel::Info)
                .set_title("Permission request")
                .set_description(format!(
                    "Allow Location Checker to access your {}?",
                    capability
                ))
                .set_buttons(MessageButtons::YesNo)
                .show();

            let grant_results = match answer {
                MessageDialogResult::Yes => {
                    if let Ok(mut granted) = granted.lock() {
                        granted.insert(capability);
                    }
                    vec![PermissionStatus::Granted]
                }
                MessageDialogResult::No => vec![PermissionStatus::Denied],
                other => {
                    // Closed without an answer
                    warn!(%capability, ?other, "Permission dialog closed without an answer");
                    Vec::new()
                }
            };

            info!(%capability, request_code, ?grant_results, "Permission answered");
            let _ = reply.send(Message::PermissionResult(PermissionResponse {
                request_code,
                grant_results,
            }));
        });
    }
}

/// Answers every request the same way, without asking
pub struct StaticPermissions {
    status: PermissionStatus,
}

impl StaticPermissions {
    pub fn new(status: PermissionStatus) -> Self {
        Self { status }
    }
}

impl PermissionBackend for StaticPermissions {
    fn check(&self, _capability: Capability) -> PermissionStatus {
        self.status
    }

    fn request(&self, _capability: Capability, request_code: i32, reply: MessageSender) {
        let _ = reply.send(Message::PermissionResult(PermissionResponse {
            request_code,
            grant_results: vec![self.status],
        }));
    }
}

/// Permission backend for a configured policy
pub fn for_policy(policy: PermissionPolicy) -> Arc<dyn PermissionBackend> {
    match policy {
        PermissionPolicy::Ask => Arc::new(DialogPermissions::new()),
        PermissionPolicy::GrantAll => Arc::new(StaticPermissions::new(PermissionStatus::Granted)),
        PermissionPolicy::DenyAll => Arc::new(StaticPermissions::new(PermissionStatus::Denied)),
    }
}
