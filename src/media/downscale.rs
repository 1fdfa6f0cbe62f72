// SPDX-License-Identifier: GPL-3.0-only

//! Memory-friendly photo loading for the photo view
//!
//! A full camera photo is far larger than the view that shows it. Loading
//! goes in two steps:
//!
//! 1. **Probe**: read only the image header to learn its pixel dimensions
//! 2. **Decode**: decode and reduce by an integer sample size so the result
//!    stays close to, but not below, the view size
//!
//! The sample size is `min(W / w, H / h)` with integer division, and never
//! less than 1 (a view larger than the photo leaves the photo untouched).

use crate::errors::DecodeError;
use image::{ImageReader, RgbaImage, imageops::FilterType};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Pixel size of the photo view
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewSize {
    pub width: u32,
    pub height: u32,
}

impl ViewSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// A view that has not been laid out yet has no area
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Photo decoded at reduced size, ready for display
#[derive(Clone)]
pub struct ScaledPhoto {
    /// File the photo was loaded from
    pub path: PathBuf,
    /// Width reported by the file header
    pub source_width: u32,
    /// Height reported by the file header
    pub source_height: u32,
    /// Integer divisor applied while decoding
    pub sample_size: u32,
    /// Decoded pixels
    pub image: RgbaImage,
}

impl fmt::Debug for ScaledPhoto {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Pixel data left out
        f.debug_struct("ScaledPhoto")
            .field("path", &self.path)
            .field("source", &(self.source_width, self.source_height))
            .field("sample_size", &self.sample_size)
            .field("size", &(self.width(), self.height()))
            .finish()
    }
}

impl ScaledPhoto {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// Compute the integer downscale factor for showing `source` in `target`
///
/// Returns `None` when either size has no area, since no sensible factor
/// exists (e.g. the view is queried before layout).
pub fn sample_size(source: (u32, u32), target: ViewSize) -> Option<u32> {
    let (source_width, source_height) = source;
    if target.is_empty() || source_width == 0 || source_height == 0 {
        return None;
    }

    let factor = (source_width / target.width).min(source_height / target.height);
    Some(factor.max(1))
}

/// Dimensions after applying `sample_size` to `source`
pub fn scaled_dimensions(source: (u32, u32), sample_size: u32) -> (u32, u32) {
    let sample_size = sample_size.max(1);
    (
        (source.0 / sample_size).max(1),
        (source.1 / sample_size).max(1),
    )
}

/// Read only the header of an image file and return its dimensions
pub fn probe_dimensions(path: &Path) -> Result<(u32, u32), DecodeError> {
    let dimensions = ImageReader::open(path)?
        .with_guessed_format()?
        .into_dimensions()?;
    debug!(path = %path.display(), width = dimensions.0, height = dimensions.1, "Probed photo");
    Ok(dimensions)
}

/// Load a photo reduced to roughly the size of `target`
///
/// Missing files, corrupt data and an empty target all return an error; the
/// caller shows no image in that case.
pub fn load_scaled(path: &Path, target: ViewSize) -> Result<ScaledPhoto, DecodeError> {
    if target.is_empty() {
        return Err(DecodeError::ZeroTarget);
    }

    let source = probe_dimensions(path)?;
    let factor = sample_size(source, target).ok_or(DecodeError::ZeroSource)?;

    let decoded = ImageReader::open(path)?.with_guessed_format()?.decode()?;

    let (width, height) = scaled_dimensions(source, factor);
    let image = if factor == 1 {
        decoded.to_rgba8()
    } else {
        decoded
            .resize_exact(width, height, FilterType::Triangle)
            .to_rgba8()
    };

    info!(
        path = %path.display(),
        source_width = source.0,
        source_height = source.1,
        sample_size = factor,
        width = image.width(),
        height = image.height(),
        "Photo decoded for display"
    );

    Ok(ScaledPhoto {
        path: path.to_path_buf(),
        source_width: source.0,
        source_height: source.1,
        sample_size: factor,
        image,
    })
}
