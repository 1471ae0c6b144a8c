//! Shared face state for the simulator services.
//!
//! `SharedFace` gives the HTTP handlers and the tick driver thread-safe
//! access to a single [`WatchFace`]. Every handler runs to completion under
//! the lock, which preserves the one-event-at-a-time model of the watch.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use aviator_face::services::{LocalClock, SharedFace};
//!
//! let state = Arc::new(SharedFace::new(face, LocalClock));
//!
//! // Web handlers read snapshots
//! let frame = state.frame();
//!
//! // and mutate through the closure, reading the clock under the lock
//! state.with_face(|face| face.apply_config_update(1, "on", state.now()));
//! ```

use std::sync::{Mutex, PoisonError};

use crate::face::{FaceFrame, WatchFace};
use crate::time::CalendarTime;
use crate::traits::{RenderSurface, SettingsStore, WallClock};

/// A [`WatchFace`] shared between services, with the time source they agree on.
pub struct SharedFace<R: RenderSurface, S: SettingsStore> {
    face: Mutex<WatchFace<R, S>>,
    clock: Box<dyn WallClock + Send + Sync>,
}

impl<R: RenderSurface, S: SettingsStore> SharedFace<R, S> {
    /// Wraps a loaded face.
    pub fn new(face: WatchFace<R, S>, clock: impl WallClock + Send + Sync + 'static) -> Self {
        Self {
            face: Mutex::new(face),
            clock: Box::new(clock),
        }
    }

    /// Current local time, from the shared clock.
    #[inline]
    pub fn now(&self) -> CalendarTime {
        self.clock.now()
    }

    /// Runs `f` with exclusive access to the face.
    ///
    /// The closure pattern prevents holding the lock across await points.
    pub fn with_face<T, F>(&self, f: F) -> T
    where
        F: FnOnce(&mut WatchFace<R, S>) -> T,
    {
        // a panicking handler cannot leave the face half-updated
        let mut guard = self.face.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    /// Snapshot of what is on screen.
    pub fn frame(&self) -> FaceFrame {
        self.with_face(|face| face.frame())
    }
}
