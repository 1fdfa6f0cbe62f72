// SPDX-License-Identifier: GPL-3.0-only

//! End-to-end flows of the coordinator against the mock backends

use chrono::{NaiveDate, NaiveDateTime};
use location_checker::app::{CaptureState, Command, LocationState};
use location_checker::backends::mock::{
    MockAudio, MockCamera, MockLocation, MockPermissions, MockPresenter, MockShot,
};
use location_checker::backends::{
    Backends, Capability, Fix, PermissionResponse, PermissionStatus, ProviderEvent,
    SubscriptionId,
};
use location_checker::constants::{request_codes, strings};
use location_checker::media::ViewSize;
use location_checker::{AppModel, Config, Message, Runtime};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

const LIMIT: Option<Duration> = Some(Duration::from_secs(10));

fn fixed_clock() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 7)
        .and_then(|d| d.and_hms_opt(9, 5, 2))
        .unwrap()
}

fn temp_photos_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "location-checker-{}-{}",
        name,
        std::process::id()
    ));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

struct Harness {
    permissions: Arc<MockPermissions>,
    camera: Arc<MockCamera>,
    location: Arc<MockLocation>,
    audio: Arc<MockAudio>,
    presenter: Arc<MockPresenter>,
    photos_dir: PathBuf,
    runtime: Runtime,
}

impl Harness {
    fn new(
        name: &str,
        permissions: MockPermissions,
        shot: MockShot,
        location: MockLocation,
        presenter: MockPresenter,
        config: Config,
    ) -> Self {
        let photos_dir = temp_photos_dir(name);
        let config = Config {
            photos_dir: Some(photos_dir.clone()),
            ..config
        };

        let permissions = Arc::new(permissions);
        let camera = Arc::new(MockCamera::new(shot));
        let location = Arc::new(location);
        let audio = Arc::new(MockAudio::new());
        let presenter = Arc::new(presenter);

        let backends = Backends {
            permissions: permissions.clone(),
            camera: camera.clone(),
            location: location.clone(),
            audio: audio.clone(),
            presenter: presenter.clone(),
        };
        let model = AppModel::new(config, permissions.clone()).with_clock(fixed_clock);

        Self {
            permissions,
            camera,
            location,
            audio,
            presenter,
            photos_dir,
            runtime: Runtime::with_model(model, backends),
        }
    }

    fn photo(name: &str, permissions: MockPermissions, shot: MockShot) -> Self {
        Self::new(
            name,
            permissions,
            shot,
            MockLocation::silent(),
            MockPresenter::new(),
            Config::default(),
        )
    }

    fn locate(name: &str, permissions: MockPermissions, location: MockLocation) -> Self {
        Self::new(
            name,
            permissions,
            MockShot::Cancelled,
            location,
            MockPresenter::new(),
            Config::default(),
        )
    }

    async fn take_photo(&mut self) {
        self.runtime.dispatch(Message::TakePhotoClicked);
        assert!(
            self.runtime
                .run_until(LIMIT, |model| model.capture.is_idle())
                .await,
            "capture flow did not settle"
        );
    }

    async fn check_location(&mut self) {
        self.runtime.dispatch(Message::CheckLocationClicked);
        assert!(
            self.runtime
                .run_until(LIMIT, |model| model.location.is_idle())
                .await,
            "location flow did not settle"
        );
    }

    /// Process whatever is still queued
    async fn drain(&mut self) {
        self.runtime
            .run_until(Some(Duration::from_millis(100)), |_| false)
            .await;
    }
}

impl Drop for Harness {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.photos_dir);
    }
}

// ===== Capture =====

#[tokio::test]
async fn test_granted_camera_launches_without_prompt() {
    let mut h = Harness::photo(
        "granted-camera",
        MockPermissions::pre_granted(),
        MockShot::Photo {
            width: 64,
            height: 48,
        },
    );

    h.take_photo().await;

    assert!(h.permissions.requests().is_empty());
    assert_eq!(
        h.camera.launches(),
        vec!["content://location-checker.fileprovider/my_images/photo_20240307_090502.jpg"]
    );
    assert!(h.photos_dir.join("photo_20240307_090502.jpg").exists());
}

#[tokio::test]
async fn test_photo_is_decoded_at_reduced_size() {
    let mut h = Harness::photo(
        "reduced",
        MockPermissions::pre_granted(),
        MockShot::Photo {
            width: 1600,
            height: 1200,
        },
    );

    h.take_photo().await;

    assert_eq!(h.presenter.photos(), vec![(400, 300, 4)]);
    let shown = h.runtime.model().displayed_photo.clone().unwrap();
    assert_eq!(shown.source_width, 1600);
    assert_eq!(shown.source_height, 1200);
    assert_eq!(shown.sample_size, 4);
}

#[tokio::test]
async fn test_denied_camera_never_launches() {
    let mut h = Harness::photo(
        "denied-camera",
        MockPermissions::answering(PermissionStatus::Denied),
        MockShot::Photo {
            width: 64,
            height: 48,
        },
    );

    h.take_photo().await;

    assert_eq!(
        h.permissions.requests(),
        vec![(Capability::Camera, request_codes::CAMERA)]
    );
    assert!(h.camera.launches().is_empty());
    assert_eq!(h.presenter.toasts(), vec![strings::CAMERA_PERMISSION_DENIED]);
    assert!(!h.photos_dir.exists());
}

#[tokio::test]
async fn test_granted_prompt_resumes_capture_once() {
    let mut h = Harness::photo(
        "prompt-camera",
        MockPermissions::answering(PermissionStatus::Granted),
        MockShot::Photo {
            width: 64,
            height: 48,
        },
    );

    h.take_photo().await;
    h.drain().await;
    assert_eq!(h.permissions.requests().len(), 1);
    assert_eq!(h.camera.launches().len(), 1);
    assert_eq!(h.presenter.photos().len(), 1);

    // The grant is remembered, so the second capture skips the prompt
    h.take_photo().await;
    assert_eq!(h.permissions.requests().len(), 1);
    assert_eq!(h.camera.launches().len(), 2);
}

#[tokio::test]
async fn test_cancelled_capture_reports_failure() {
    let mut h = Harness::photo(
        "cancelled",
        MockPermissions::pre_granted(),
        MockShot::Cancelled,
    );

    h.take_photo().await;

    assert_eq!(h.presenter.toasts(), vec![strings::CAPTURE_FAILED]);
    assert!(h.presenter.photos().is_empty());
    assert!(h.runtime.model().displayed_photo.is_none());
}

#[tokio::test]
async fn test_cancelled_capture_can_stay_silent() {
    let mut h = Harness::new(
        "cancelled-silent",
        MockPermissions::pre_granted(),
        MockShot::Cancelled,
        MockLocation::silent(),
        MockPresenter::new(),
        Config {
            report_capture_failures: false,
            ..Config::default()
        },
    );

    h.take_photo().await;

    assert!(h.presenter.toasts().is_empty());
    assert!(h.presenter.photos().is_empty());
}

#[tokio::test]
async fn test_undecodable_photo_clears_view() {
    let mut h = Harness::photo(
        "garbage",
        MockPermissions::pre_granted(),
        MockShot::Garbage,
    );

    h.take_photo().await;

    assert!(h.presenter.photos().is_empty());
    assert_eq!(h.presenter.clears(), 1);
    assert!(h.runtime.model().displayed_photo.is_none());
}

#[tokio::test]
async fn test_unlaid_out_view_shows_no_photo() {
    let mut h = Harness::photo(
        "zero-view",
        MockPermissions::pre_granted(),
        MockShot::Photo {
            width: 64,
            height: 48,
        },
    );

    h.runtime.dispatch(Message::ViewResized(ViewSize::new(0, 0)));
    h.take_photo().await;

    assert!(h.presenter.photos().is_empty());
    assert_eq!(h.presenter.clears(), 1);
    // The photo itself was still written
    assert!(h.photos_dir.join("photo_20240307_090502.jpg").exists());
}

// ===== Sound =====

#[tokio::test]
async fn test_rapid_clicks_never_overlap_sounds() {
    let mut h = Harness::photo(
        "rapid",
        MockPermissions::pre_granted(),
        MockShot::Photo {
            width: 64,
            height: 48,
        },
    );

    h.runtime.dispatch(Message::TakePhotoClicked);
    h.runtime.dispatch(Message::TakePhotoClicked);
    h.runtime.dispatch(Message::CheckLocationClicked);

    assert_eq!(h.audio.started().len(), 3);
    assert_eq!(h.audio.max_concurrent(), 1);
    assert_eq!(h.audio.playing(), 1);
    // The second photo click only plays the sound
    assert_eq!(h.camera.launches().len(), 1);
}

#[tokio::test]
async fn test_finished_sound_is_released() {
    let mut h = Harness::photo(
        "sound-done",
        MockPermissions::pre_granted(),
        MockShot::Cancelled,
    );

    h.take_photo().await;
    let playing = h.runtime.playing_sound().unwrap();

    h.audio.finish(playing);
    h.runtime.step().await;

    assert_eq!(h.runtime.playing_sound(), None);
    assert_eq!(h.audio.playing(), 0);
}

// ===== Location =====

#[tokio::test]
async fn test_fix_opens_dialog_and_unsubscribes_once() {
    let mut h = Harness::locate(
        "fix-once",
        MockPermissions::pre_granted(),
        MockLocation::scripted(vec![Fix::new(37.422, -122.0841), Fix::new(48.8584, 2.2945)]),
    );

    h.check_location().await;
    h.drain().await;

    assert_eq!(h.location.subscribed(), vec![SubscriptionId(1)]);
    assert_eq!(h.location.unsubscribed(), vec![SubscriptionId(1)]);
    assert_eq!(h.location.open_subscriptions(), 0);
    assert_eq!(h.runtime.pending_deadlines(), 0);

    let dialogs = h.presenter.dialogs();
    assert_eq!(dialogs.len(), 1);
    assert_eq!(dialogs[0].title, strings::LOCATION_DIALOG_TITLE);
    assert_eq!(dialogs[0].message, "Latitude: 37.422000\nLongitude: -122.084100");
    assert_eq!(dialogs[0].dismiss_label, strings::OK);
}

#[tokio::test]
async fn test_dismissed_dialog_is_cleared() {
    let mut h = Harness::new(
        "dismiss",
        MockPermissions::pre_granted(),
        MockShot::Cancelled,
        MockLocation::scripted(vec![Fix::new(1.0, 2.0)]),
        MockPresenter::auto_dismissing(),
        Config::default(),
    );

    h.check_location().await;
    assert!(
        h.runtime
            .run_until(LIMIT, |model| model.dialog.is_none())
            .await
    );
    assert_eq!(h.presenter.dialogs().len(), 1);
}

#[tokio::test]
async fn test_denied_location_never_subscribes() {
    let mut h = Harness::locate(
        "denied-location",
        MockPermissions::answering(PermissionStatus::Denied),
        MockLocation::scripted(vec![Fix::new(1.0, 2.0)]),
    );

    h.check_location().await;
    h.drain().await;

    assert_eq!(
        h.permissions.requests(),
        vec![(Capability::FineLocation, request_codes::LOCATION)]
    );
    assert!(h.location.subscribed().is_empty());
    assert_eq!(
        h.presenter.toasts(),
        vec![strings::LOCATION_PERMISSION_DENIED]
    );
    assert!(h.presenter.dialogs().is_empty());
}

#[tokio::test]
async fn test_empty_grant_results_count_as_denied() {
    let mut h = Harness::locate(
        "empty-grant",
        MockPermissions::answering_empty(),
        MockLocation::scripted(vec![Fix::new(1.0, 2.0)]),
    );

    h.check_location().await;

    assert!(h.location.subscribed().is_empty());
    assert_eq!(
        h.presenter.toasts(),
        vec![strings::LOCATION_PERMISSION_DENIED]
    );
}

#[tokio::test(start_paused = true)]
async fn test_location_gives_up_after_timeout() {
    let mut h = Harness::new(
        "timeout",
        MockPermissions::pre_granted(),
        MockShot::Cancelled,
        MockLocation::silent(),
        MockPresenter::new(),
        Config {
            location_timeout_secs: Some(30),
            ..Config::default()
        },
    );

    h.runtime.dispatch(Message::CheckLocationClicked);
    assert_eq!(h.location.open_subscriptions(), 1);
    assert_eq!(h.runtime.pending_deadlines(), 1);

    assert!(
        h.runtime
            .run_until(Some(Duration::from_secs(60)), |model| model
                .location
                .is_idle())
            .await
    );

    assert_eq!(h.location.unsubscribed(), vec![SubscriptionId(1)]);
    assert_eq!(h.presenter.toasts(), vec![strings::LOCATION_UNAVAILABLE]);
    assert!(h.presenter.dialogs().is_empty());

    // A late fix for the abandoned subscription is dropped
    h.runtime
        .sender()
        .send(Message::LocationFix {
            subscription: SubscriptionId(1),
            fix: Fix::new(1.0, 2.0),
        })
        .unwrap();
    h.runtime.step().await;
    assert!(h.presenter.dialogs().is_empty());
}

#[tokio::test]
async fn test_unavailable_service_reports_and_recovers() {
    let mut h = Harness::locate(
        "unavailable",
        MockPermissions::pre_granted(),
        MockLocation::unavailable(),
    );

    h.check_location().await;

    assert_eq!(h.presenter.toasts(), vec![strings::LOCATION_UNAVAILABLE]);
    assert!(h.runtime.model().location.is_idle());
}

#[tokio::test]
async fn test_shutdown_releases_open_subscription() {
    let mut h = Harness::locate(
        "shutdown",
        MockPermissions::pre_granted(),
        MockLocation::silent(),
    );

    h.runtime.dispatch(Message::CheckLocationClicked);
    assert_eq!(h.location.open_subscriptions(), 1);
    assert_eq!(h.audio.playing(), 1);

    h.runtime.shutdown();
    h.runtime.shutdown();

    assert_eq!(h.location.open_subscriptions(), 0);
    assert_eq!(h.location.unsubscribed(), vec![SubscriptionId(1)]);
    assert_eq!(h.runtime.pending_deadlines(), 0);
    assert_eq!(h.audio.playing(), 0);
    assert_eq!(h.runtime.model().location, LocationState::Idle);
}

// ===== Coordinator without a runtime =====

#[test]
fn test_unknown_request_code_is_ignored() {
    let mut model = AppModel::new(
        Config::default(),
        Arc::new(MockPermissions::answering(PermissionStatus::Granted)),
    );

    let task = model.update(Message::PermissionResult(PermissionResponse {
        request_code: 99,
        grant_results: vec![PermissionStatus::Granted],
    }));

    assert!(task.is_none());
    assert_eq!(model.capture, CaptureState::Idle);
    assert_eq!(model.location, LocationState::Idle);
}

#[test]
fn test_unsolicited_grant_starts_nothing() {
    let mut model = AppModel::new(
        Config::default(),
        Arc::new(MockPermissions::pre_granted()),
    );

    let task = model.update(Message::PermissionResult(PermissionResponse::new(
        Capability::Camera,
        PermissionStatus::Granted,
    )));

    assert!(task.is_none());
    assert!(model.capture.is_idle());
}

#[test]
fn test_provider_events_change_nothing() {
    let mut model = AppModel::new(
        Config::default(),
        Arc::new(MockPermissions::pre_granted()),
    );

    for event in [
        ProviderEvent::Enabled("gps".into()),
        ProviderEvent::Disabled("gps".into()),
        ProviderEvent::StatusChanged {
            provider: "gps".into(),
            status: 2,
        },
    ] {
        assert!(model.update(Message::LocationStatus(event)).is_none());
    }
    assert!(model.location.is_idle());
}

#[test]
fn test_click_issues_sound_and_prompt() {
    let mut model = AppModel::new(
        Config::default(),
        Arc::new(MockPermissions::answering(PermissionStatus::Granted)),
    );

    let task = model.update(Message::CheckLocationClicked);

    assert!(matches!(task.commands()[0], Command::PlaySound));
    assert!(matches!(
        task.commands()[1],
        Command::RequestPermission {
            capability: Capability::FineLocation,
            request_code: request_codes::LOCATION,
        }
    ));
    assert_eq!(model.location, LocationState::AwaitingPermission);
}
