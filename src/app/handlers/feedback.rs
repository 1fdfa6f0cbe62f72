// SPDX-License-Identifier: GPL-3.0-only

//! Button sound effect

use crate::app::state::{AppModel, Command, Task};
use crate::backends::SoundId;

impl AppModel {
    /// Sound played on every user-initiated action
    pub(crate) fn play_feedback(&self) -> Task {
        Task::done(Command::PlaySound)
    }

    pub(crate) fn handle_sound_finished(&mut self, id: SoundId) -> Task {
        Task::done(Command::ReleaseSound(id))
    }
}
