//! Wall-clock time source.

use crate::time::CalendarTime;

/// Platform wall clock.
///
/// Used when the face needs the current time outside of a tick, e.g. to
/// seed the hands when the window loads.
///
/// # Example
///
/// ```rust
/// use aviator_face::traits::WallClock;
/// use aviator_face::hal::MockWallClock;
/// use aviator_face::time::CalendarTime;
///
/// let mut clock = MockWallClock::new(CalendarTime::new(10, 9, 58, 1));
/// clock.advance(2);
/// assert_eq!(clock.now(), CalendarTime::new(10, 10, 0, 1));
/// ```
pub trait WallClock {
    /// Returns the current local calendar time.
    fn now(&self) -> CalendarTime;
}
