// SPDX-License-Identifier: GPL-3.0-only

//! Location lookup handlers
//!
//! A lookup is a single-shot subscription: the first fix closes the
//! subscription and opens the location dialog. Fixes for a subscription that
//! is no longer active are dropped, so each lookup produces at most one
//! unsubscribe and one dialog.

use crate::app::state::{AppModel, CapabilityGate, Command, LocationState, Task};
use crate::backends::{Capability, Fix, LocationDialog, LocationRequest, ProviderEvent, SubscriptionId};
use crate::constants::strings;
use tracing::{debug, info, trace, warn};

impl AppModel {
    pub(crate) fn handle_check_location_clicked(&mut self) -> Task {
        let mut task = self.play_feedback();

        if !self.location.is_idle() {
            debug!(state = ?self.location, "Location lookup already in progress");
            return task;
        }

        match self.request_capability(Capability::FineLocation, &mut task) {
            CapabilityGate::AlreadyGranted => Task::batch([task, self.fetch_location()]),
            CapabilityGate::RequestIssued => {
                self.location = LocationState::AwaitingPermission;
                task
            }
        }
    }

    /// Subscribe for the next fix from the most accurate provider
    ///
    /// Only called once location consent is known to be granted.
    pub(crate) fn fetch_location(&mut self) -> Task {
        let subscription = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;

        let timeout = self.config.location_timeout();
        info!(%subscription, ?timeout, "Requesting position fix");
        self.location = LocationState::Subscribed { subscription };

        Task::done(Command::SubscribeLocation {
            subscription,
            request: LocationRequest::next_fix(),
            timeout,
        })
    }

    pub(crate) fn handle_location_fix(&mut self, subscription: SubscriptionId, fix: Fix) -> Task {
        if self.location.subscription() != Some(subscription) {
            debug!(%subscription, "Dropping fix for inactive subscription");
            return Task::none();
        }

        info!(
            %subscription,
            latitude = fix.latitude,
            longitude = fix.longitude,
            "Position fix received"
        );
        self.location = LocationState::Idle;

        let dialog = LocationDialog::for_fix(fix);
        self.dialog = Some(dialog.clone());
        Task::batch([
            Task::done(Command::Unsubscribe(subscription)),
            Task::done(Command::ShowDialog(dialog)),
        ])
    }

    /// Provider notifications carry no position and change nothing
    pub(crate) fn handle_location_status(&mut self, event: ProviderEvent) -> Task {
        trace!(?event, "Location provider event");
        Task::none()
    }

    pub(crate) fn handle_location_timed_out(&mut self, subscription: SubscriptionId) -> Task {
        if self.location.subscription() != Some(subscription) {
            return Task::none();
        }

        warn!(%subscription, "No position fix before the deadline");
        self.abandon_subscription(subscription)
    }

    pub(crate) fn handle_location_failed(
        &mut self,
        subscription: SubscriptionId,
        reason: String,
    ) -> Task {
        if self.location.subscription() != Some(subscription) {
            return Task::none();
        }

        warn!(%subscription, %reason, "Positioning service failed");
        self.abandon_subscription(subscription)
    }

    fn abandon_subscription(&mut self, subscription: SubscriptionId) -> Task {
        self.location = LocationState::Idle;
        Task::batch([
            Task::done(Command::Unsubscribe(subscription)),
            Task::done(Command::ShowToast(strings::LOCATION_UNAVAILABLE.to_string())),
        ])
    }

    pub(crate) fn handle_dialog_dismissed(&mut self) -> Task {
        self.dialog = None;
        Task::none()
    }
}
