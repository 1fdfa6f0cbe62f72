// SPDX-License-Identifier: GPL-3.0-only

//! Position updates from GeoClue2 over the system D-Bus
//!
//! Each subscription gets its own GeoClue client. The client is started,
//! every `LocationUpdated` signal is resolved into a [`Fix`] and posted to
//! the coordinator, and the client is stopped again on unsubscribe.

use super::{
    Accuracy, Fix, LocationBackend, LocationRequest, MessageSender, ProviderEvent, SubscriptionId,
};
use crate::app::Message;
use crate::constants::APP_ID;
use crate::errors::{BackendError, BackendResult, LocationError};
use futures::StreamExt;
use std::collections::HashMap;
use std::fmt::Display;
use std::sync::Mutex;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};
use zbus::zvariant::OwnedObjectPath;

const GEOCLUE_SERVICE: &str = "org.freedesktop.GeoClue2";
const MANAGER_PATH: &str = "/org/freedesktop/GeoClue2/Manager";
const MANAGER_INTERFACE: &str = "org.freedesktop.GeoClue2.Manager";
const CLIENT_INTERFACE: &str = "org.freedesktop.GeoClue2.Client";
const LOCATION_INTERFACE: &str = "org.freedesktop.GeoClue2.Location";

/// GeoClue accuracy level for a request
///
/// Values from GClueAccuracyLevel: CITY = 4, EXACT = 8.
fn accuracy_level(accuracy: Accuracy) -> u32 {
    match accuracy {
        Accuracy::Fine => 8,
        Accuracy::Coarse => 4,
    }
}

fn unavailable(e: impl Display) -> LocationError {
    LocationError::ServiceUnavailable(e.to_string())
}

fn rejected(e: impl Display) -> LocationError {
    LocationError::SubscriptionFailed(e.to_string())
}

/// Location backend talking to the GeoClue2 daemon
#[derive(Default)]
pub struct GeoClueLocation {
    stops: Mutex<HashMap<SubscriptionId, oneshot::Sender<()>>>,
}

impl GeoClueLocation {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocationBackend for GeoClueLocation {
    fn subscribe(
        &self,
        subscription: SubscriptionId,
        request: LocationRequest,
        reply: MessageSender,
    ) -> BackendResult<()> {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| BackendError::NotAvailable(format!("No async runtime: {}", e)))?;

        let (stop_tx, stop_rx) = oneshot::channel();
        self.stops
            .lock()
            .map_err(|e| BackendError::Other(e.to_string()))?
            .insert(subscription, stop_tx);

        runtime.spawn(async move {
            if let Err(e) = follow_position(subscription, request, &reply, stop_rx).await {
                warn!(%subscription, error = %e, "Location subscription ended with an error");
                let _ = reply.send(Message::LocationFailed {
                    subscription,
                    reason: e.to_string(),
                });
            }
        });

        Ok(())
    }

    fn unsubscribe(&self, subscription: SubscriptionId) {
        let stop = match self.stops.lock() {
            Ok(mut stops) => stops.remove(&subscription),
            Err(_) => None,
        };
        if let Some(stop) = stop {
            debug!(%subscription, "Stopping location subscription");
            let _ = stop.send(());
        }
    }
}

async fn follow_position(
    subscription: SubscriptionId,
    request: LocationRequest,
    reply: &MessageSender,
    stop: oneshot::Receiver<()>,
) -> Result<(), LocationError> {
    let connection = zbus::Connection::system().await.map_err(unavailable)?;

    let manager = zbus::Proxy::new(
        &connection,
        GEOCLUE_SERVICE,
        MANAGER_PATH,
        MANAGER_INTERFACE,
    )
    .await
    .map_err(unavailable)?;

    let client_path: OwnedObjectPath = manager.call("GetClient", &()).await.map_err(unavailable)?;

    let client = zbus::Proxy::new(
        &connection,
        GEOCLUE_SERVICE,
        client_path.as_str(),
        CLIENT_INTERFACE,
    )
    .await
    .map_err(rejected)?;

    client
        .set_property("DesktopId", APP_ID)
        .await
        .map_err(rejected)?;
    client
        .set_property("RequestedAccuracyLevel", accuracy_level(request.accuracy))
        .await
        .map_err(rejected)?;
    client
        .set_property("DistanceThreshold", request.min_distance.round() as u32)
        .await
        .map_err(rejected)?;
    client
        .set_property("TimeThreshold", request.min_interval.as_secs() as u32)
        .await
        .map_err(rejected)?;

    let updates = client
        .receive_signal("LocationUpdated")
        .await
        .map_err(rejected)?;

    let () = client.call("Start", &()).await.map_err(rejected)?;
    info!(%subscription, client = %client_path, "GeoClue client started");
    let _ = reply.send(Message::LocationStatus(ProviderEvent::Enabled(
        GEOCLUE_SERVICE.to_string(),
    )));

    let result = pump_updates(&connection, subscription, updates, reply, stop).await;

    let stopped: zbus::Result<()> = client.call("Stop", &()).await;
    if let Err(e) = stopped {
        debug!(%subscription, error = %e, "GeoClue client did not stop cleanly");
    }
    info!(%subscription, "GeoClue client stopped");

    result
}

/// Forward every location update until asked to stop
async fn pump_updates(
    connection: &zbus::Connection,
    subscription: SubscriptionId,
    mut updates: zbus::proxy::SignalStream<'_>,
    reply: &MessageSender,
    mut stop: oneshot::Receiver<()>,
) -> Result<(), LocationError> {
    loop {
        tokio::select! {
            _ = &mut stop => return Ok(()),
            signal = updates.next() => {
                let Some(signal) = signal else {
                    return Err(rejected("GeoClue closed the update stream"));
                };

                let (_old, new): (OwnedObjectPath, OwnedObjectPath) =
                    signal.body().deserialize().map_err(rejected)?;
                let fix = read_fix(connection, &new).await?;
                debug!(
                    %subscription,
                    latitude = fix.latitude,
                    longitude = fix.longitude,
                    "Position update"
                );

                if reply
                    .send(Message::LocationFix { subscription, fix })
                    .is_err()
                {
                    return Ok(());
                }
            }
        }
    }
}

async fn read_fix(
    connection: &zbus::Connection,
    path: &OwnedObjectPath,
) -> Result<Fix, LocationError> {
    let location = zbus::Proxy::new(connection, GEOCLUE_SERVICE, path.as_str(), LOCATION_INTERFACE)
        .await
        .map_err(rejected)?;

    let latitude: f64 = location.get_property("Latitude").await.map_err(rejected)?;
    let longitude: f64 = location.get_property("Longitude").await.map_err(rejected)?;
    Ok(Fix::new(latitude, longitude))
}
