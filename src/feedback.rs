// SPDX-License-Identifier: GPL-3.0-only

//! Single-slot ownership of the feedback sound
//!
//! Only one sound may exist at a time. Installing a new one stops and drops
//! the previous handle first, so two plays in quick succession never overlap.

use crate::backends::{SoundHandle, SoundId};
use tracing::debug;

/// Holds at most one playing sound
#[derive(Default)]
pub struct SoundSlot {
    current: Option<Box<dyn SoundHandle>>,
}

impl SoundSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id of the sound currently held
    pub fn current(&self) -> Option<SoundId> {
        self.current.as_ref().map(|handle| handle.id())
    }

    /// Stop and release whatever is playing
    pub fn clear(&mut self) {
        if let Some(mut previous) = self.current.take() {
            debug!(sound = previous.id().0, "Stopping sound");
            previous.stop();
        }
    }

    /// Install a freshly started sound
    ///
    /// Callers that have not yet started the new sound should call
    /// [`SoundSlot::clear`] before starting it so playbacks never overlap.
    pub fn install(&mut self, handle: Box<dyn SoundHandle>) {
        self.clear();
        self.current = Some(handle);
    }

    /// Release the sound with `id` after it completed on its own
    ///
    /// Ignored when a newer sound has already replaced it.
    pub fn release(&mut self, id: SoundId) -> bool {
        if self.current() != Some(id) {
            return false;
        }
        if let Some(mut finished) = self.current.take() {
            finished.stop();
        }
        debug!(sound = id.0, "Released finished sound");
        true
    }
}

impl Drop for SoundSlot {
    fn drop(&mut self) {
        self.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Records lifecycle events in a shared log
    struct LoggedSound {
        id: SoundId,
        log: Arc<Mutex<Vec<String>>>,
    }

    impl SoundHandle for LoggedSound {
        fn id(&self) -> SoundId {
            self.id
        }

        fn stop(&mut self) {
            self.log.lock().unwrap().push(format!("stop {}", self.id.0));
        }
    }

    impl Drop for LoggedSound {
        fn drop(&mut self) {
            self.log.lock().unwrap().push(format!("drop {}", self.id.0));
        }
    }

    fn sound(id: u64, log: &Arc<Mutex<Vec<String>>>) -> Box<dyn SoundHandle> {
        Box::new(LoggedSound {
            id: SoundId(id),
            log: Arc::clone(log),
        })
    }

    #[test]
    fn test_install_releases_previous_first() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut slot = SoundSlot::new();

        slot.install(sound(1, &log));
        slot.install(sound(2, &log));

        assert_eq!(*log.lock().unwrap(), vec!["stop 1", "drop 1"]);
        assert_eq!(slot.current(), Some(SoundId(2)));
    }

    #[test]
    fn test_release_ignores_superseded_sound() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut slot = SoundSlot::new();

        slot.install(sound(1, &log));
        slot.install(sound(2, &log));
        assert!(!slot.release(SoundId(1)));
        assert_eq!(slot.current(), Some(SoundId(2)));

        assert!(slot.release(SoundId(2)));
        assert_eq!(slot.current(), None);
    }

    #[test]
    fn test_drop_stops_current() {
        let log = Arc::new(Mutex::new(Vec::new()));
        {
            let mut slot = SoundSlot::new();
            slot.install(sound(7, &log));
        }
        assert_eq!(*log.lock().unwrap(), vec!["stop 7", "drop 7"]);
    }
}
