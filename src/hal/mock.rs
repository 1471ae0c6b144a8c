//! Mock implementations for testing without a watch.
//!
//! This module provides test doubles for every collaborator trait, so the
//! whole face runs on the desktop and in unit tests.
//!
//! # Available Mocks
//!
//! | Mock | Trait | Purpose |
//! |------|-------|---------|
//! | [`MockSurface`] | [`RenderSurface`] | Tracks live resources, texts and dirty marks; injects allocation failures |
//! | [`MockStore`] | [`SettingsStore`] | In-memory flags with read/write failure injection |
//! | [`MockWallClock`] | [`WallClock`] | Controllable calendar time |
//!
//! # Example
//!
//! ```rust
//! use aviator_face::config::FaceVariant;
//! use aviator_face::face::WatchFace;
//! use aviator_face::hal::{MockStore, MockSurface, MockWallClock};
//! use aviator_face::time::CalendarTime;
//! use aviator_face::traits::WallClock;
//!
//! let clock = MockWallClock::new(CalendarTime::new(6, 0, 0, 1));
//! let face = WatchFace::load(
//!     MockSurface::new(),
//!     MockStore::new(),
//!     FaceVariant::aviator_24h(),
//!     clock.now(),
//! )
//! .unwrap();
//!
//! // background, hands layer and date label
//! assert_eq!(face.surface().live().len(), 3);
//! assert_eq!(face.surface().dirty_marks, 1);
//! ```
//!
//! [`RenderSurface`]: crate::traits::RenderSurface
//! [`SettingsStore`]: crate::traits::SettingsStore
//! [`WallClock`]: crate::traits::WallClock

extern crate alloc;
use alloc::string::String;
use alloc::vec::Vec;

use crate::messages::SettingKey;
use crate::time::CalendarTime;
use crate::traits::{
    RenderSurface, ResourceId, ResourceKind, ResourceSpec, SettingsStore, WallClock,
};

// ============================================================================
// Render Surface Mock
// ============================================================================

/// A resource currently held by a [`MockSurface`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MockResource {
    /// Handle given to the face.
    pub id: ResourceId,
    /// What was requested.
    pub spec: ResourceSpec,
    /// Last text set, empty for non-text resources.
    pub text: String,
}

/// Mock compositor for testing.
///
/// Keeps the set of live resources and counts every call. Use the public
/// fields to inspect activity and to inject allocation failures.
///
/// # Example
///
/// ```rust
/// use aviator_face::hal::MockSurface;
/// use aviator_face::hands::Rect;
/// use aviator_face::traits::{RenderSurface, ResourceKind, ResourceSpec};
///
/// let mut surface = MockSurface::new();
/// let spec = ResourceSpec::new(ResourceKind::DateLabel, Rect::new(115, 74, 12, 14));
///
/// let id = surface.create(&spec).unwrap();
/// surface.set_text(id, "31");
/// assert_eq!(surface.text_of(id), Some("31"));
///
/// // next allocation fails once
/// surface.fail_after = Some(0);
/// assert!(surface.create(&spec).is_err());
/// assert!(surface.create(&spec).is_ok());
/// ```
#[derive(Debug, Default)]
pub struct MockSurface {
    live: Vec<MockResource>,
    next_id: u32,
    /// Number of successful allocations.
    pub created: usize,
    /// Every destroyed id, in call order.
    pub destroyed: Vec<ResourceId>,
    /// Destroy calls for ids that were not live.
    pub invalid_destroys: usize,
    /// Number of `mark_dirty` calls.
    pub dirty_marks: usize,
    /// Number of `set_text` calls.
    pub text_updates: usize,
    /// When `Some(n)`, `n` more allocations succeed and the next one fails.
    /// Cleared after the failure.
    pub fail_after: Option<usize>,
    /// Every allocation fails.
    pub fail_always: bool,
}

impl MockSurface {
    /// Creates an empty surface.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resources currently allocated.
    pub fn live(&self) -> &[MockResource] {
        &self.live
    }

    /// Kind of a live resource.
    pub fn kind_of(&self, id: ResourceId) -> Option<ResourceKind> {
        self.find(id).map(|r| r.spec.kind)
    }

    /// Text of a live resource.
    pub fn text_of(&self, id: ResourceId) -> Option<&str> {
        self.find(id).map(|r| r.text.as_str())
    }

    /// Returns true if a live resource of `kind` exists.
    pub fn has_live(&self, kind: ResourceKind) -> bool {
        self.live.iter().any(|r| r.spec.kind == kind)
    }

    fn find(&self, id: ResourceId) -> Option<&MockResource> {
        self.live.iter().find(|r| r.id == id)
    }

    fn should_fail(&mut self) -> bool {
        if self.fail_always {
            return true;
        }
        match self.fail_after {
            Some(0) => {
                self.fail_after = None;
                true
            }
            Some(n) => {
                self.fail_after = Some(n - 1);
                false
            }
            None => false,
        }
    }
}

impl RenderSurface for MockSurface {
    type Error = ();

    fn create(&mut self, spec: &ResourceSpec) -> Result<ResourceId, ()> {
        if self.should_fail() {
            return Err(());
        }
        self.next_id += 1;
        let id = ResourceId(self.next_id);
        self.live.push(MockResource {
            id,
            spec: *spec,
            text: String::new(),
        });
        self.created += 1;
        Ok(id)
    }

    fn destroy(&mut self, id: ResourceId) {
        match self.live.iter().position(|r| r.id == id) {
            Some(index) => {
                self.live.remove(index);
            }
            None => self.invalid_destroys += 1,
        }
        self.destroyed.push(id);
    }

    fn set_text(&mut self, id: ResourceId, text: &str) {
        if let Some(resource) = self.live.iter_mut().find(|r| r.id == id) {
            resource.text = text.into();
        }
        self.text_updates += 1;
    }

    fn mark_dirty(&mut self, _id: ResourceId) {
        self.dirty_marks += 1;
    }
}

// ============================================================================
// Settings Store Mock
// ============================================================================

/// Mock persistent store for testing.
///
/// Holds the flags in memory. Clone it to simulate a restart with the same
/// persisted state.
///
/// # Example
///
/// ```rust
/// use aviator_face::hal::MockStore;
/// use aviator_face::messages::SettingKey;
/// use aviator_face::traits::SettingsStore;
///
/// let mut store = MockStore::new();
/// store.write_bool(SettingKey::SecondsVisible, false).unwrap();
/// assert_eq!(store.read_bool(SettingKey::SecondsVisible), Ok(Some(false)));
/// assert_eq!(store.writes, 1);
///
/// store.fail_writes = true;
/// assert!(store.write_bool(SettingKey::ColorInversion, true).is_err());
/// assert_eq!(store.value(SettingKey::ColorInversion), None);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MockStore {
    values: [Option<bool>; 2],
    /// Every read fails.
    pub fail_reads: bool,
    /// Every write fails.
    pub fail_writes: bool,
    /// Number of successful writes.
    pub writes: usize,
    /// Number of rejected writes.
    pub failed_writes: usize,
}

impl MockStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populates a flag without counting it as a write.
    pub fn with_value(mut self, key: SettingKey, value: bool) -> Self {
        self.values[key.id() as usize] = Some(value);
        self
    }

    /// Stored flag, ignoring failure injection.
    pub fn value(&self, key: SettingKey) -> Option<bool> {
        self.values[key.id() as usize]
    }
}

impl SettingsStore for MockStore {
    type Error = ();

    fn read_bool(&self, key: SettingKey) -> Result<Option<bool>, ()> {
        if self.fail_reads {
            return Err(());
        }
        Ok(self.value(key))
    }

    fn write_bool(&mut self, key: SettingKey, value: bool) -> Result<(), ()> {
        if self.fail_writes {
            self.failed_writes += 1;
            return Err(());
        }
        self.values[key.id() as usize] = Some(value);
        self.writes += 1;
        Ok(())
    }
}

// ============================================================================
// Clock Mock
// ============================================================================

/// Mock wall clock for testing.
///
/// # Example
///
/// ```rust
/// use aviator_face::hal::MockWallClock;
/// use aviator_face::time::CalendarTime;
/// use aviator_face::traits::WallClock;
///
/// let mut clock = MockWallClock::new(CalendarTime::new(23, 59, 59, 4));
/// clock.advance(1);
/// assert_eq!(clock.now(), CalendarTime::new(0, 0, 0, 5));
///
/// clock.set(CalendarTime::new(12, 0, 0, 1));
/// assert_eq!(clock.now().hour(), 12);
/// ```
#[derive(Debug, Default)]
pub struct MockWallClock {
    current: CalendarTime,
}

impl MockWallClock {
    /// Creates a clock showing `time`.
    pub fn new(time: CalendarTime) -> Self {
        Self { current: time }
    }

    /// Sets the current time.
    pub fn set(&mut self, time: CalendarTime) {
        self.current = time;
    }

    /// Advances the clock by whole seconds.
    pub fn advance(&mut self, seconds: u32) {
        for _ in 0..seconds {
            self.current = self.current.succ();
        }
    }
}

impl WallClock for MockWallClock {
    fn now(&self) -> CalendarTime {
        self.current
    }
}
