// SPDX-License-Identifier: GPL-3.0-only

//! Deterministic stand-ins for the platform services
//!
//! Used by the test suite and by `--simulate` runs on machines without a
//! camera, GeoClue or a display. Every fake records what it was asked to do
//! so flows can be checked call by call.

use super::{
    AudioBackend, CameraBackend, Capability, Fix, LocationBackend, LocationDialog,
    LocationRequest, MessageSender, PermissionBackend, PermissionResponse, PermissionStatus,
    Presenter, SoundHandle, SoundId, SubscriptionId,
};
use crate::app::Message;
use crate::errors::{BackendError, BackendResult};
use crate::media::downscale::ScaledPhoto;
use crate::media::encoding;
use crate::storage::SharedPhotoRef;
use image::{Rgb, RgbImage};
use std::collections::{HashMap, HashSet};
use std::io::Write;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

// ===== Permissions =====

/// Permission provider with a fixed answer
///
/// Grants are remembered, so a second check after a granted prompt reports
/// the capability as granted.
pub struct MockPermissions {
    granted: Mutex<HashSet<Capability>>,
    /// Answer to prompts; `None` answers with an empty result list
    answer: Option<PermissionStatus>,
    requests: Mutex<Vec<(Capability, i32)>>,
}

impl MockPermissions {
    /// Every capability already granted, no prompt ever shown
    pub fn pre_granted() -> Self {
        Self {
            granted: Mutex::new(Capability::ALL.into_iter().collect()),
            answer: Some(PermissionStatus::Granted),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Nothing granted yet; prompts are answered with `status`
    pub fn answering(status: PermissionStatus) -> Self {
        Self {
            granted: Mutex::new(HashSet::new()),
            answer: Some(status),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Nothing granted yet; prompts come back with no results
    pub fn answering_empty() -> Self {
        Self {
            granted: Mutex::new(HashSet::new()),
            answer: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Prompts issued so far, with their request codes
    pub fn requests(&self) -> Vec<(Capability, i32)> {
        lock(&self.requests).clone()
    }
}

impl PermissionBackend for MockPermissions {
    fn check(&self, capability: Capability) -> PermissionStatus {
        if lock(&self.granted).contains(&capability) {
            PermissionStatus::Granted
        } else {
            PermissionStatus::Denied
        }
    }

    fn request(&self, capability: Capability, request_code: i32, reply: MessageSender) {
        lock(&self.requests).push((capability, request_code));

        let grant_results = match self.answer {
            Some(PermissionStatus::Granted) => {
                lock(&self.granted).insert(capability);
                vec![PermissionStatus::Granted]
            }
            Some(PermissionStatus::Denied) => vec![PermissionStatus::Denied],
            None => Vec::new(),
        };

        let _ = reply.send(Message::PermissionResult(PermissionResponse {
            request_code,
            grant_results,
        }));
    }
}

// ===== Camera =====

/// What the fake camera leaves at the destination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockShot {
    /// A real JPEG of the given size
    Photo { width: u32, height: u32 },
    /// Bytes that are not an image, reported as success
    Garbage,
    /// Nothing written, reported as failure
    Cancelled,
}

/// Camera that produces a generated photo
pub struct MockCamera {
    shot: MockShot,
    launches: Mutex<Vec<String>>,
}

impl MockCamera {
    pub fn new(shot: MockShot) -> Self {
        Self {
            shot,
            launches: Mutex::new(Vec::new()),
        }
    }

    /// Content URIs the camera was launched with
    pub fn launches(&self) -> Vec<String> {
        lock(&self.launches).clone()
    }

    fn shoot(&self, destination: SharedPhotoRef) -> bool {
        match self.shot {
            MockShot::Photo { width, height } => {
                let image = RgbImage::from_fn(width, height, |x, y| {
                    Rgb([(x % 256) as u8, (y % 256) as u8, 128])
                });
                destination
                    .open_for_write()
                    .map_err(BackendError::from)
                    .and_then(|file| {
                        encoding::write_jpeg(file, &image, 80).map_err(BackendError::from)
                    })
                    .is_ok()
            }
            MockShot::Garbage => destination
                .open_for_write()
                .and_then(|mut file| file.write_all(b"definitely not a jpeg"))
                .is_ok(),
            MockShot::Cancelled => false,
        }
    }
}

impl CameraBackend for MockCamera {
    fn launch(&self, destination: SharedPhotoRef, reply: MessageSender) {
        lock(&self.launches).push(destination.uri().to_string());
        let success = self.shoot(destination);
        debug!(success, "Mock camera finished");
        let _ = reply.send(Message::CaptureFinished { success });
    }
}

// ===== Location =====

/// Location source that replays scripted fixes
pub struct MockLocation {
    /// Delivered right after subscribing, in order
    scripted: Vec<Fix>,
    fail: bool,
    active: Mutex<HashMap<SubscriptionId, MessageSender>>,
    subscribed: Mutex<Vec<SubscriptionId>>,
    unsubscribed: Mutex<Vec<SubscriptionId>>,
}

impl MockLocation {
    /// Deliver `fixes` immediately on every subscription
    pub fn scripted(fixes: Vec<Fix>) -> Self {
        Self {
            scripted: fixes,
            fail: false,
            active: Mutex::new(HashMap::new()),
            subscribed: Mutex::new(Vec::new()),
            unsubscribed: Mutex::new(Vec::new()),
        }
    }

    /// Never deliver anything until [`MockLocation::emit`] is called
    pub fn silent() -> Self {
        Self::scripted(Vec::new())
    }

    /// Reject every subscription
    pub fn unavailable() -> Self {
        Self {
            fail: true,
            ..Self::silent()
        }
    }

    /// Push a fix to every open subscription
    pub fn emit(&self, fix: Fix) {
        for (subscription, reply) in lock(&self.active).iter() {
            let _ = reply.send(Message::LocationFix {
                subscription: *subscription,
                fix,
            });
        }
    }

    pub fn subscribed(&self) -> Vec<SubscriptionId> {
        lock(&self.subscribed).clone()
    }

    pub fn unsubscribed(&self) -> Vec<SubscriptionId> {
        lock(&self.unsubscribed).clone()
    }

    /// Subscriptions opened and not yet closed
    pub fn open_subscriptions(&self) -> usize {
        lock(&self.active).len()
    }
}

impl LocationBackend for MockLocation {
    fn subscribe(
        &self,
        subscription: SubscriptionId,
        _request: LocationRequest,
        reply: MessageSender,
    ) -> BackendResult<()> {
        if self.fail {
            return Err(BackendError::NotAvailable("mock location disabled".into()));
        }

        lock(&self.subscribed).push(subscription);
        for fix in &self.scripted {
            let _ = reply.send(Message::LocationFix {
                subscription,
                fix: *fix,
            });
        }
        lock(&self.active).insert(subscription, reply);
        Ok(())
    }

    fn unsubscribe(&self, subscription: SubscriptionId) {
        if lock(&self.active).remove(&subscription).is_some() {
            lock(&self.unsubscribed).push(subscription);
        }
    }
}

// ===== Audio =====

#[derive(Debug, Default)]
struct AudioLog {
    playing: HashSet<SoundId>,
    started: Vec<SoundId>,
    max_concurrent: usize,
    reply: Option<MessageSender>,
}

/// Audio backend that only keeps count
#[derive(Default)]
pub struct MockAudio {
    log: Arc<Mutex<AudioLog>>,
}

impl MockAudio {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sounds started so far
    pub fn started(&self) -> Vec<SoundId> {
        lock(&self.log).started.clone()
    }

    /// Sounds currently audible
    pub fn playing(&self) -> usize {
        lock(&self.log).playing.len()
    }

    /// Highest number of sounds that were ever audible at once
    pub fn max_concurrent(&self) -> usize {
        lock(&self.log).max_concurrent
    }

    /// Let sound `id` run to completion
    pub fn finish(&self, id: SoundId) {
        let mut log = lock(&self.log);
        if log.playing.remove(&id)
            && let Some(reply) = &log.reply
        {
            let _ = reply.send(Message::SoundFinished(id));
        }
    }
}

impl AudioBackend for MockAudio {
    fn play(&self, id: SoundId, reply: MessageSender) -> BackendResult<Box<dyn SoundHandle>> {
        let mut log = lock(&self.log);
        log.playing.insert(id);
        log.started.push(id);
        log.max_concurrent = log.max_concurrent.max(log.playing.len());
        log.reply = Some(reply);

        Ok(Box::new(MockSound {
            id,
            log: Arc::clone(&self.log),
        }))
    }
}

struct MockSound {
    id: SoundId,
    log: Arc<Mutex<AudioLog>>,
}

impl SoundHandle for MockSound {
    fn id(&self) -> SoundId {
        self.id
    }

    fn stop(&mut self) {
        lock(&self.log).playing.remove(&self.id);
    }
}

impl Drop for MockSound {
    fn drop(&mut self) {
        self.stop();
    }
}

// ===== Presenter =====

/// Presenter that records what would have been shown
#[derive(Default)]
pub struct MockPresenter {
    auto_dismiss: bool,
    toasts: Mutex<Vec<String>>,
    dialogs: Mutex<Vec<LocationDialog>>,
    photos: Mutex<Vec<(u32, u32, u32)>>,
    clears: Mutex<usize>,
}

impl MockPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Press the dismiss button of every dialog right away
    pub fn auto_dismissing() -> Self {
        Self {
            auto_dismiss: true,
            ..Self::default()
        }
    }

    pub fn toasts(&self) -> Vec<String> {
        lock(&self.toasts).clone()
    }

    pub fn dialogs(&self) -> Vec<LocationDialog> {
        lock(&self.dialogs).clone()
    }

    /// Displayed photos as (width, height, sample size)
    pub fn photos(&self) -> Vec<(u32, u32, u32)> {
        lock(&self.photos).clone()
    }

    pub fn clears(&self) -> usize {
        *lock(&self.clears)
    }
}

impl Presenter for MockPresenter {
    fn show_toast(&self, text: &str) {
        lock(&self.toasts).push(text.to_string());
    }

    fn show_dialog(&self, dialog: &LocationDialog, reply: MessageSender) {
        lock(&self.dialogs).push(dialog.clone());
        if self.auto_dismiss {
            let _ = reply.send(Message::DialogDismissed);
        }
    }

    fn display_photo(&self, photo: &ScaledPhoto) {
        lock(&self.photos).push((photo.width(), photo.height(), photo.sample_size));
    }

    fn clear_photo(&self) {
        *lock(&self.clears) += 1;
    }
}
