// SPDX-License-Identifier: GPL-3.0-only

//! Event loop connecting the coordinator to the backends
//!
//! The runtime owns the [`AppModel`], the message channel and every resource
//! a command may leave behind (the playing sound and location deadlines).
//! Backends post results on the channel; [`Runtime::step`] pulls one message,
//! runs it through `update` and executes the resulting commands.
//!
//! Must be driven from inside a tokio runtime: photo decoding runs on the
//! blocking pool and location deadlines are tokio timers.

use crate::app::{AppModel, Command, Message, Task};
use crate::backends::{Backends, MessageReceiver, MessageSender, SoundId, SubscriptionId};
use crate::config::Config;
use crate::feedback::SoundSlot;
use crate::media::downscale;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

pub struct Runtime {
    model: AppModel,
    backends: Backends,
    sender: MessageSender,
    receiver: MessageReceiver,
    sound: SoundSlot,
    next_sound: u64,
    deadlines: HashMap<SubscriptionId, JoinHandle<()>>,
    shut_down: bool,
}

impl Runtime {
    pub fn new(config: Config, backends: Backends) -> Self {
        let model = AppModel::new(config, Arc::clone(&backends.permissions));
        Self::with_model(model, backends)
    }

    /// Build a runtime around an existing model
    pub fn with_model(model: AppModel, backends: Backends) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            model,
            backends,
            sender,
            receiver,
            sound: SoundSlot::new(),
            next_sound: 1,
            deadlines: HashMap::new(),
            shut_down: false,
        }
    }

    pub fn model(&self) -> &AppModel {
        &self.model
    }

    /// Sender for injecting messages (user actions, layout changes)
    pub fn sender(&self) -> MessageSender {
        self.sender.clone()
    }

    /// Id of the sound currently playing
    pub fn playing_sound(&self) -> Option<SoundId> {
        self.sound.current()
    }

    /// Number of location deadlines still armed
    pub fn pending_deadlines(&self) -> usize {
        self.deadlines.len()
    }

    /// Run one message through the coordinator and execute its commands
    pub fn dispatch(&mut self, message: Message) {
        debug!(?message, "Dispatching");
        let task = self.model.update(message);
        self.execute(task);
    }

    /// Wait for the next message and dispatch it
    pub async fn step(&mut self) {
        // The runtime holds a sender itself, so the channel never closes
        if let Some(message) = self.receiver.recv().await {
            self.dispatch(message);
        }
    }

    /// Dispatch messages until `done` holds or `limit` elapses
    ///
    /// Returns whether `done` was reached.
    pub async fn run_until<F>(&mut self, limit: Option<Duration>, done: F) -> bool
    where
        F: Fn(&AppModel) -> bool,
    {
        let drive = async {
            while !done(&self.model) {
                self.step().await;
            }
        };

        match limit {
            Some(limit) => tokio::time::timeout(limit, drive).await.is_ok(),
            None => {
                drive.await;
                true
            }
        }
    }

    /// Release everything still in flight
    ///
    /// Closes open location subscriptions, disarms deadlines and stops the
    /// sound. Safe to call more than once.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.shut_down = true;

        let task = self.model.teardown();
        self.execute(task);

        for (subscription, deadline) in self.deadlines.drain() {
            debug!(%subscription, "Disarming location deadline");
            self.backends.location.unsubscribe(subscription);
            deadline.abort();
        }
        self.sound.clear();
        info!("Runtime shut down");
    }

    fn execute(&mut self, task: Task) {
        for command in task.into_commands() {
            self.execute_command(command);
        }
    }

    fn execute_command(&mut self, command: Command) {
        match command {
            Command::PlaySound => self.play_sound(),
            Command::ReleaseSound(id) => {
                self.sound.release(id);
            }
            Command::RequestPermission {
                capability,
                request_code,
            } => {
                self.backends
                    .permissions
                    .request(capability, request_code, self.sender());
            }
            Command::LaunchCamera(destination) => {
                self.backends.camera.launch(destination, self.sender());
            }
            Command::DecodePhoto { path, target } => {
                let sender = self.sender();
                tokio::task::spawn_blocking(move || {
                    let decoded = match downscale::load_scaled(&path, target) {
                        Ok(photo) => Some(Arc::new(photo)),
                        Err(e) => {
                            warn!(path = %path.display(), error = %e, "Photo decode failed");
                            None
                        }
                    };
                    let _ = sender.send(Message::PhotoDecoded(decoded));
                });
            }
            Command::DisplayPhoto(photo) => self.backends.presenter.display_photo(&photo),
            Command::ClearPhoto => self.backends.presenter.clear_photo(),
            Command::SubscribeLocation {
                subscription,
                request,
                timeout,
            } => self.subscribe_location(subscription, request, timeout),
            Command::Unsubscribe(subscription) => {
                self.backends.location.unsubscribe(subscription);
                if let Some(deadline) = self.deadlines.remove(&subscription) {
                    deadline.abort();
                }
            }
            Command::ShowToast(text) => self.backends.presenter.show_toast(&text),
            Command::ShowDialog(dialog) => {
                self.backends.presenter.show_dialog(&dialog, self.sender());
            }
        }
    }

    /// Replace any playing sound with a new one
    fn play_sound(&mut self) {
        // Stop the previous sound before the new one starts
        self.sound.clear();

        let id = SoundId(self.next_sound);
        self.next_sound += 1;

        match self.backends.audio.play(id, self.sender()) {
            Ok(handle) => self.sound.install(handle),
            Err(e) => warn!(error = %e, "Failed to play feedback sound"),
        }
    }

    fn subscribe_location(
        &mut self,
        subscription: SubscriptionId,
        request: crate::backends::LocationRequest,
        timeout: Option<Duration>,
    ) {
        if let Err(e) = self
            .backends
            .location
            .subscribe(subscription, request, self.sender())
        {
            warn!(%subscription, error = %e, "Location subscription failed");
            let _ = self.sender.send(Message::LocationFailed {
                subscription,
                reason: e.to_string(),
            });
            return;
        }

        if let Some(timeout) = timeout {
            let sender = self.sender();
            let deadline = tokio::spawn(async move {
                tokio::time::sleep(timeout).await;
                let _ = sender.send(Message::LocationTimedOut(subscription));
            });
            self.deadlines.insert(subscription, deadline);
        }
    }
}

impl Drop for Runtime {
    fn drop(&mut self) {
        self.shutdown();
    }
}
