// SPDX-License-Identifier: GPL-3.0-only

//! Message handler modules
//!
//! This module organizes message handlers by flow,
//! keeping related functionality together for easier maintenance.

pub mod capture;
pub mod feedback;
pub mod location;
pub mod permission;
