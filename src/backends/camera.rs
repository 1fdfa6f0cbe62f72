// SPDX-License-Identifier: GPL-3.0-only

//! Single photo capture via GStreamer
//!
//! Plays the role of the external camera app: it receives a shared
//! destination, grabs one frame, writes a JPEG there and reports only
//! success or failure.
//!
//! ```text
//! v4l2src / autovideosrc → videoconvert → RGB appsink → JPEG → destination
//! ```
//!
//! The first `warmup_frames` frames are dropped so auto exposure can settle.

use super::{CameraBackend, MessageSender};
use crate::app::Message;
use crate::constants::timing;
use crate::errors::CaptureError;
use crate::media::encoding;
use crate::storage::SharedPhotoRef;
use gstreamer::prelude::*;
use gstreamer_video::VideoInfo;
use image::RgbImage;
use std::time::Instant;
use tracing::{debug, error, info};

/// Camera backed by a GStreamer capture pipeline
#[derive(Debug, Clone)]
pub struct GstCamera {
    /// Device node, e.g. "/dev/video0" (None = autovideosrc)
    device: Option<String>,
    warmup_frames: u32,
    jpeg_quality: u8,
}

impl GstCamera {
    pub fn new(device: Option<String>, warmup_frames: u32, jpeg_quality: u8) -> Self {
        Self {
            device,
            warmup_frames,
            jpeg_quality,
        }
    }

    /// Pipeline description for the configured device
    fn pipeline_description(&self) -> String {
        let source = match &self.device {
            Some(device) => format!("v4l2src device=\"{}\"", device),
            None => "autovideosrc".to_string(),
        };
        format!(
            "{} ! videoconvert ! video/x-raw,format=RGB ! \
             appsink name=sink max-buffers=2 drop=false sync=false",
            source
        )
    }

    /// Grab one frame after warm-up
    fn grab_frame(&self) -> Result<RgbImage, CaptureError> {
        gstreamer::init().map_err(|e| CaptureError::PipelineFailed(e.to_string()))?;

        let description = self.pipeline_description();
        info!(pipeline = %description, "Starting capture pipeline");

        let pipeline = gstreamer::parse::launch(&description)
            .map_err(|e| CaptureError::PipelineFailed(e.to_string()))?
            .downcast::<gstreamer::Pipeline>()
            .map_err(|_| CaptureError::PipelineFailed("Failed to downcast to Pipeline".into()))?;

        let appsink = pipeline
            .by_name("sink")
            .ok_or_else(|| CaptureError::PipelineFailed("Failed to find appsink".into()))?
            .downcast::<gstreamer_app::AppSink>()
            .map_err(|_| CaptureError::PipelineFailed("Failed to downcast to AppSink".into()))?;

        pipeline
            .set_state(gstreamer::State::Playing)
            .map_err(|e| CaptureError::PipelineFailed(format!("{:?}", e)))?;

        let result = self.pull_settled_frame(&appsink);

        let _ = pipeline.set_state(gstreamer::State::Null);
        result
    }

    fn pull_settled_frame(
        &self,
        appsink: &gstreamer_app::AppSink,
    ) -> Result<RgbImage, CaptureError> {
        let deadline = Instant::now() + timing::CAPTURE_TIMEOUT;
        let mut frames = 0u32;

        while Instant::now() < deadline {
            let Some(sample) = appsink.try_pull_sample(gstreamer::ClockTime::from_mseconds(200))
            else {
                if appsink.is_eos() {
                    break;
                }
                continue;
            };

            frames += 1;
            if frames <= self.warmup_frames {
                continue;
            }

            debug!(frames, "Frame settled, converting");
            return sample_to_image(&sample);
        }

        error!(frames, "Camera delivered no usable frame");
        if frames == 0 {
            Err(CaptureError::NoCameraFound)
        } else {
            Err(CaptureError::NoFrameAvailable)
        }
    }

    fn capture_into(&self, destination: SharedPhotoRef) -> Result<(), CaptureError> {
        let image = self.grab_frame()?;
        let uri = destination.uri().to_string();
        let file = destination.open_for_write()?;
        encoding::write_jpeg(file, &image, self.jpeg_quality)?;
        info!(%uri, width = image.width(), height = image.height(), "Photo written");
        Ok(())
    }
}

impl CameraBackend for GstCamera {
    fn launch(&self, destination: SharedPhotoRef, reply: MessageSender) {
        let camera = self.clone();

        tokio::task::spawn_blocking(move || {
            let success = match camera.capture_into(destination) {
                Ok(()) => true,
                Err(e) => {
                    error!(error = %e, "Photo capture failed");
                    false
                }
            };
            let _ = reply.send(Message::CaptureFinished { success });
        });
    }
}

/// Copy an RGB sample into a tightly packed image, dropping row padding
fn sample_to_image(sample: &gstreamer::Sample) -> Result<RgbImage, CaptureError> {
    let caps = sample
        .caps()
        .ok_or_else(|| CaptureError::PipelineFailed("No caps on sample".into()))?;
    let info = VideoInfo::from_caps(caps)
        .map_err(|e| CaptureError::PipelineFailed(format!("Invalid caps: {}", e)))?;
    let buffer = sample
        .buffer()
        .ok_or_else(|| CaptureError::PipelineFailed("No buffer in sample".into()))?;
    let map = buffer
        .map_readable()
        .map_err(|_| CaptureError::PipelineFailed("Failed to map buffer".into()))?;

    let width = info.width();
    let height = info.height();
    let stride = info.stride()[0] as usize;
    let row_bytes = width as usize * 3;
    pack_rows(map.as_slice(), width, height, stride, row_bytes)
}

/// Copy `height` rows of `row_bytes` out of a buffer with `stride` bytes per row
fn pack_rows(
    data: &[u8],
    width: u32,
    height: u32,
    stride: usize,
    row_bytes: usize,
) -> Result<RgbImage, CaptureError> {
    if stride < row_bytes || data.len() < stride * (height as usize).saturating_sub(1) + row_bytes
    {
        return Err(CaptureError::PipelineFailed("Frame buffer too small".into()));
    }

    let mut packed = Vec::with_capacity(row_bytes * height as usize);
    for row in data.chunks(stride).take(height as usize) {
        packed.extend_from_slice(&row[..row_bytes]);
    }

    RgbImage::from_raw(width, height, packed)
        .ok_or_else(|| CaptureError::PipelineFailed("Frame size mismatch".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_description_uses_device() {
        let camera = GstCamera::new(Some("/dev/video2".into()), 0, 90);
        assert!(camera
            .pipeline_description()
            .starts_with("v4l2src device=\"/dev/video2\""));

        let camera = GstCamera::new(None, 0, 90);
        assert!(camera.pipeline_description().starts_with("autovideosrc"));
    }

    #[test]
    fn test_pack_rows_drops_padding() {
        // 2x2 RGB with stride 8 (2 bytes padding per row)
        let data = [
            1, 2, 3, 4, 5, 6, 0, 0, //
            7, 8, 9, 10, 11, 12, 0, 0,
        ];
        let image = pack_rows(&data, 2, 2, 8, 6).unwrap();
        assert_eq!(image.as_raw(), &vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12]);
    }

    #[test]
    fn test_pack_rows_rejects_short_buffer() {
        let data = [0u8; 10];
        assert!(pack_rows(&data, 2, 2, 8, 6).is_err());
    }
}
