// SPDX-License-Identifier: GPL-3.0-only

//! Location Checker - take a photo or look up your position
//!
//! A single-screen utility with two actions: capture a photo through the
//! camera and show it scaled to the photo view, or fetch one precise position
//! fix and show it in a dialog. Both actions are gated on user consent and
//! play a short feedback sound.
//!
//! # Architecture
//!
//! - [`app`]: The coordinator: state machines, messages and commands
//! - [`backends`]: Platform services behind traits (camera, location, ...)
//! - [`runtime`]: Event loop executing commands and feeding back messages
//! - [`feedback`]: Ownership of the playing sound effect
//! - [`media`]: Reduced-size decoding and JPEG encoding
//! - [`storage`]: Photo naming and shareable destinations
//! - [`config`]: User configuration handling

pub mod app;
pub mod backends;
pub mod config;
pub mod constants;
pub mod errors;
pub mod feedback;
pub mod media;
pub mod runtime;
pub mod storage;

// Re-export commonly used types
pub use app::{AppModel, Command, Message, Task};
pub use backends::Backends;
pub use config::Config;
pub use errors::{AppError, AppResult};
pub use runtime::Runtime;
