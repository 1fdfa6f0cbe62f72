// SPDX-License-Identifier: GPL-3.0-only

//! JPEG encoding of captured frames

use crate::errors::CaptureError;
use image::RgbImage;
use std::io::Write;
use tracing::debug;

/// Encode an RGB image as JPEG with the given quality (clamped to 1-100)
pub fn encode_jpeg(image: &RgbImage, quality: u8) -> Result<Vec<u8>, CaptureError> {
    let mut buffer = Vec::new();
    let mut cursor = std::io::Cursor::new(&mut buffer);

    let mut encoder =
        image::codecs::jpeg::JpegEncoder::new_with_quality(&mut cursor, quality.clamp(1, 100));

    encoder
        .encode(
            image.as_raw(),
            image.width(),
            image.height(),
            image::ExtendedColorType::Rgb8,
        )
        .map_err(|e| CaptureError::EncodingFailed(e.to_string()))?;

    debug!(
        width = image.width(),
        height = image.height(),
        size = buffer.len(),
        "JPEG encoding complete"
    );
    Ok(buffer)
}

/// Encode `image` and write it to `writer`
pub fn write_jpeg<W: Write>(
    mut writer: W,
    image: &RgbImage,
    quality: u8,
) -> Result<(), CaptureError> {
    let data = encode_jpeg(image, quality)?;
    writer.write_all(&data)?;
    writer.flush()?;
    Ok(())
}
