// SPDX-License-Identifier: GPL-3.0-only

//! Image processing for captured photos
//!
//! # Modules
//!
//! - [`downscale`]: Header probe and reduced-size decode for the photo view
//! - [`encoding`]: JPEG encoding of captured frames

pub mod downscale;
pub mod encoding;

pub use downscale::{ScaledPhoto, ViewSize, load_scaled, sample_size};
