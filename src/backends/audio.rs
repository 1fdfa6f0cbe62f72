// SPDX-License-Identifier: GPL-3.0-only

//! Feedback sound playback via GStreamer
//!
//! Plays the configured sound file, or a short synthesized click when none is
//! configured. A watcher thread reports natural completion; an explicit
//! stop silences the watcher so a replaced sound never reports back.

use super::{AudioBackend, MessageSender, SoundHandle, SoundId};
use crate::app::Message;
use crate::constants::timing;
use crate::errors::{AudioError, BackendResult};
use gstreamer::prelude::*;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, warn};

/// Sound player backed by a GStreamer pipeline per playback
pub struct GstAudio {
    sound_path: Option<PathBuf>,
}

impl GstAudio {
    pub fn new(sound_path: Option<PathBuf>) -> Self {
        Self { sound_path }
    }

    fn pipeline_description(&self) -> Result<String, AudioError> {
        match &self.sound_path {
            Some(path) => {
                if !path.exists() {
                    return Err(AudioError::MissingSound(path.display().to_string()));
                }
                Ok(format!(
                    "filesrc location=\"{}\" ! decodebin ! audioconvert ! audioresample ! autoaudiosink",
                    path.display()
                ))
            }
            None => Ok(format!(
                "audiotestsrc wave=sine freq=880 volume=0.3 num-buffers={} ! audioconvert ! autoaudiosink",
                timing::BEEP_BUFFERS
            )),
        }
    }
}

impl AudioBackend for GstAudio {
    fn play(&self, id: SoundId, reply: MessageSender) -> BackendResult<Box<dyn SoundHandle>> {
        gstreamer::init().map_err(|e| AudioError::PipelineFailed(e.to_string()))?;

        let description = self.pipeline_description()?;
        let pipeline = gstreamer::parse::launch(&description)
            .map_err(|e| AudioError::PipelineFailed(e.to_string()))?
            .downcast::<gstreamer::Pipeline>()
            .map_err(|_| AudioError::PipelineFailed("Failed to downcast to Pipeline".into()))?;

        let bus = pipeline
            .bus()
            .ok_or_else(|| AudioError::PipelineFailed("Pipeline has no bus".into()))?;

        pipeline
            .set_state(gstreamer::State::Playing)
            .map_err(|e| AudioError::PipelineFailed(format!("{:?}", e)))?;
        debug!(sound = id.0, "Sound started");

        let stopped = Arc::new(AtomicBool::new(false));
        let watcher_stopped = Arc::clone(&stopped);
        std::thread::spawn(move || {
            watch_until_done(&bus, &watcher_stopped);
            if !watcher_stopped.load(Ordering::SeqCst) {
                let _ = reply.send(Message::SoundFinished(id));
            }
        });

        Ok(Box::new(GstSound {
            id,
            pipeline,
            stopped,
        }))
    }
}

/// Block until the stream ends, fails, or playback is stopped
fn watch_until_done(bus: &gstreamer::Bus, stopped: &AtomicBool) {
    use gstreamer::MessageView;

    while !stopped.load(Ordering::SeqCst) {
        let Some(msg) = bus.timed_pop_filtered(
            gstreamer::ClockTime::from_mseconds(timing::SOUND_POLL_INTERVAL_MS),
            &[gstreamer::MessageType::Eos, gstreamer::MessageType::Error],
        ) else {
            continue;
        };

        if let MessageView::Error(err) = msg.view() {
            warn!(error = %err.error(), debug = ?err.debug(), "Sound playback error");
        }
        return;
    }
}

struct GstSound {
    id: SoundId,
    pipeline: gstreamer::Pipeline,
    stopped: Arc<AtomicBool>,
}

impl SoundHandle for GstSound {
    fn id(&self) -> SoundId {
        self.id
    }

    fn stop(&mut self) {
        if self.stopped.swap(true, Ordering::SeqCst) {
            return;
        }
        let _ = self.pipeline.set_state(gstreamer::State::Null);
        debug!(sound = self.id.0, "Sound stopped");
    }
}

impl Drop for GstSound {
    fn drop(&mut self) {
        self.stop();
    }
}
