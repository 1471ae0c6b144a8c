//! Angle Resolver: maps a [`CalendarTime`] to hand rotations.
//!
//! Angles are fixed-point fractions of a full turn with resolution
//! [`TURN`] (`0x10000` units per revolution, 0 = twelve o'clock / top of
//! the dial, increasing clockwise). All arithmetic is exact integer math and
//! truncates toward zero.
//!
//! | Indicator | Angle |
//! |-----------|-------|
//! | second | `second / 60` |
//! | minute | `(minute + second/60) / 60` |
//! | hour | `(hour + minute/60) / H`, `H` from [`HourDial`] |
//!
//! # Example
//!
//! ```rust
//! use aviator_face::angle::{hour_angle, minute_angle, Angle, HourDial};
//! use aviator_face::time::CalendarTime;
//!
//! let t = CalendarTime::new(6, 0, 0, 1);
//! assert_eq!(hour_angle(&t, HourDial::TwentyFour), Angle::QUARTER);
//!
//! let t = CalendarTime::new(0, 30, 30, 1);
//! assert_eq!(minute_angle(&t).units(), (30.5 / 60.0 * 65536.0) as u32);
//! ```

use crate::settings::DisplayConfig;
use crate::time::CalendarTime;

/// Units in one full turn.
pub const TURN: u32 = 0x10000;

/// Rotation as a fraction of a full turn, in units of `1 / TURN`.
///
/// Always normalized to `0..TURN`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Angle(u32);

impl Angle {
    /// Pointing straight up.
    pub const ZERO: Self = Self(0);
    /// A quarter turn clockwise (three o'clock on a 12-hour face).
    pub const QUARTER: Self = Self(TURN / 4);
    /// Half a turn.
    pub const HALF: Self = Self(TURN / 2);

    /// Creates an angle from raw units, reducing modulo one turn.
    #[inline]
    pub const fn from_units(units: u32) -> Self {
        Self(units % TURN)
    }

    /// Creates the angle `numerator / denominator` of a turn, truncated.
    ///
    /// `denominator` must be non-zero.
    #[inline]
    pub const fn from_fraction(numerator: u32, denominator: u32) -> Self {
        Self::from_units(((numerator as u64 * TURN as u64) / denominator as u64) as u32)
    }

    /// Raw fixed-point units (`0..TURN`).
    #[inline]
    pub const fn units(&self) -> u32 {
        self.0
    }

    /// Adds another rotation, wrapping at one turn.
    #[inline]
    pub const fn wrapping_add(self, other: Self) -> Self {
        Self::from_units(self.0 + other.0)
    }

    /// Angle in radians, for geometry.
    pub fn radians(&self) -> f32 {
        self.0 as f32 * (2.0 * core::f32::consts::PI) / TURN as f32
    }

    /// Angle in degrees.
    pub fn degrees(&self) -> f32 {
        self.0 as f32 * 360.0 / TURN as f32
    }
}

/// Layout of the hour scale.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum HourDial {
    /// One revolution per day, midnight at the top.
    #[default]
    TwentyFour,
    /// One revolution per day, rotated half a turn so noon is at the bottom
    /// of the face (matches "noon-down" background artwork).
    TwentyFourNoonDown,
    /// Two revolutions per day.
    Twelve,
}

impl HourDial {
    /// Number of hours in one revolution of the hour hand.
    #[inline]
    pub const fn hours_per_turn(&self) -> u32 {
        match self {
            HourDial::TwentyFour | HourDial::TwentyFourNoonDown => 24,
            HourDial::Twelve => 12,
        }
    }

    /// Fixed rotation applied on top of the computed hour angle.
    #[inline]
    pub const fn offset(&self) -> Angle {
        match self {
            HourDial::TwentyFourNoonDown => Angle::HALF,
            HourDial::TwentyFour | HourDial::Twelve => Angle::ZERO,
        }
    }
}

/// Second hand angle: `second / 60` of a turn.
#[inline]
pub const fn second_angle(time: &CalendarTime) -> Angle {
    Angle::from_fraction(time.second() as u32, 60)
}

/// Minute hand angle, interpolated by the current second.
#[inline]
pub const fn minute_angle(time: &CalendarTime) -> Angle {
    Angle::from_fraction(time.minute() as u32 * 60 + time.second() as u32, 3600)
}

/// Hour hand angle, interpolated by the current minute.
#[inline]
pub const fn hour_angle(time: &CalendarTime, dial: HourDial) -> Angle {
    let minutes = (time.hour() as u32 % dial.hours_per_turn()) * 60 + time.minute() as u32;
    Angle::from_fraction(minutes, dial.hours_per_turn() * 60).wrapping_add(dial.offset())
}

/// Angles for every indicator the current configuration needs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HandAngles {
    /// Second hand, `None` while seconds are hidden.
    pub second: Option<Angle>,
    /// Minute hand.
    pub minute: Angle,
    /// Hour hand.
    pub hour: Angle,
}

/// Resolves every required indicator for `time` under `config`.
pub fn resolve(time: &CalendarTime, config: &DisplayConfig, dial: HourDial) -> HandAngles {
    HandAngles {
        second: config.seconds_visible.then(|| second_angle(time)),
        minute: minute_angle(time),
        hour: hour_angle(time, dial),
    }
}
