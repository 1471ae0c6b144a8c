//! Calendar time snapshots and the per-tick change set.
//!
//! The platform timer service delivers one [`CalendarTime`] per second together
//! with a [`TimeUnits`] set describing which larger units rolled over since the
//! previous tick. Both are plain `Copy` values and are never mutated after
//! construction.
//!
//! # Example
//!
//! ```rust
//! use aviator_face::time::{CalendarTime, TimeUnits};
//!
//! let prev = CalendarTime::new(9, 59, 59, 14);
//! let now = CalendarTime::new(10, 0, 0, 14);
//!
//! let units = TimeUnits::between(&prev, &now);
//! assert!(units.contains(TimeUnits::MINUTE));
//! assert!(units.contains(TimeUnits::HOUR));
//! assert!(!units.contains(TimeUnits::DAY));
//! ```

use core::ops::{BitOr, BitOrAssign};

/// Seconds in one day, used for time-of-day comparisons.
pub const SECONDS_PER_DAY: u32 = 24 * 60 * 60;

/// Immutable snapshot of wall-clock time for one tick.
///
/// Fields are validated on construction: out-of-range components are
/// clamped into their calendar range so that every derived angle stays
/// inside one turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CalendarTime {
    hour: u8,
    minute: u8,
    second: u8,
    day: u8,
}

impl CalendarTime {
    /// Creates a snapshot, clamping each component into range
    /// (hour 0–23, minute 0–59, second 0–59, day 1–31).
    pub const fn new(hour: u8, minute: u8, second: u8, day: u8) -> Self {
        Self {
            hour: if hour > 23 { 23 } else { hour },
            minute: if minute > 59 { 59 } else { minute },
            second: if second > 59 { 59 } else { second },
            day: if day == 0 {
                1
            } else if day > 31 {
                31
            } else {
                day
            },
        }
    }

    /// Midnight on the first of the month.
    pub const fn midnight() -> Self {
        Self::new(0, 0, 0, 1)
    }

    /// Hour of day (0–23).
    #[inline]
    pub const fn hour(&self) -> u8 {
        self.hour
    }

    /// Minute of hour (0–59).
    #[inline]
    pub const fn minute(&self) -> u8 {
        self.minute
    }

    /// Second of minute (0–59).
    #[inline]
    pub const fn second(&self) -> u8 {
        self.second
    }

    /// Day of month (1–31).
    #[inline]
    pub const fn day(&self) -> u8 {
        self.day
    }

    /// Seconds elapsed since midnight.
    #[inline]
    pub const fn seconds_of_day(&self) -> u32 {
        self.hour as u32 * 3600 + self.minute as u32 * 60 + self.second as u32
    }

    /// Returns the snapshot one second later, rolling minutes, hours and the
    /// day of month (months are treated as 31 days long).
    pub const fn succ(&self) -> Self {
        let secs = self.seconds_of_day() + 1;
        if secs >= SECONDS_PER_DAY {
            let day = if self.day >= 31 { 1 } else { self.day + 1 };
            return Self::new(0, 0, 0, day);
        }
        Self::new(
            (secs / 3600) as u8,
            ((secs / 60) % 60) as u8,
            (secs % 60) as u8,
            self.day,
        )
    }
}

impl Default for CalendarTime {
    fn default() -> Self {
        Self::midnight()
    }
}

/// Set of time units that changed since the previous tick.
///
/// This is the GranularityChangeSet delivered alongside every tick.
/// [`SECOND`](Self::SECOND) is set on every regular tick; the larger units
/// are set only on the tick where the platform reports a rollover.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeUnits(u8);

impl TimeUnits {
    /// No unit changed.
    pub const NONE: Self = Self(0);
    /// The second changed (every tick).
    pub const SECOND: Self = Self(1 << 0);
    /// A minute boundary was crossed.
    pub const MINUTE: Self = Self(1 << 1);
    /// An hour boundary was crossed.
    pub const HOUR: Self = Self(1 << 2);
    /// The day changed.
    pub const DAY: Self = Self(1 << 3);
    /// Every unit, as reported on the very first tick.
    pub const ALL: Self = Self(0b1111);

    /// Builds a set from raw bits, dropping unknown bits.
    #[inline]
    pub const fn from_bits_truncate(bits: u8) -> Self {
        Self(bits & Self::ALL.0)
    }

    /// Raw bit representation.
    #[inline]
    pub const fn bits(&self) -> u8 {
        self.0
    }

    /// Returns true if every unit in `other` is also in `self`.
    #[inline]
    pub const fn contains(&self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns true if no unit is set.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Derives the change set the platform would report going from `prev` to `now`.
    ///
    /// A larger unit implies every smaller one, matching how the timer
    /// service reports rollovers.
    pub fn between(prev: &CalendarTime, now: &CalendarTime) -> Self {
        let mut units = Self::NONE;
        if prev.day() != now.day() {
            units |= Self::DAY | Self::HOUR | Self::MINUTE | Self::SECOND;
        } else if prev.hour() != now.hour() {
            units |= Self::HOUR | Self::MINUTE | Self::SECOND;
        } else if prev.minute() != now.minute() {
            units |= Self::MINUTE | Self::SECOND;
        } else if prev.second() != now.second() {
            units |= Self::SECOND;
        }
        units
    }
}

impl BitOr for TimeUnits {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for TimeUnits {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}
