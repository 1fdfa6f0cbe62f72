// SPDX-License-Identifier: GPL-3.0-only

//! Coordinator for the capture and location flows
//!
//! Follows a message/update design: user actions and backend results arrive
//! as [`Message`]s, [`AppModel::update`] advances the flow state machines and
//! returns a [`Task`] of [`Command`]s for the runtime to execute. Nothing in
//! here touches a device, so every transition can be tested directly.
//!
//! # Module Structure
//!
//! - `state`: Flow state machines, messages, commands
//! - `update`: Message dispatcher
//! - `handlers`: Per-flow message handlers

mod handlers;
mod state;
mod update;

pub use state::{AppModel, CaptureState, CapabilityGate, Command, LocationState, Message, Task};
