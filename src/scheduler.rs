//! Update Scheduler: decides which indicators are recomputed on each tick.
//!
//! Every indicator caches its last angle in an [`IndicatorState`]. On each
//! tick the scheduler marks indicators stale according to a coarsening
//! policy, recomputes only those through the [angle resolver](crate::angle),
//! and reports whether anything visible changed.
//!
//! # Coarsening policy
//!
//! | Indicator | Recomputed when |
//! |-----------|-----------------|
//! | second | every tick, while seconds are visible |
//! | minute | `second % 10 == 0` |
//! | hour | minute boundary crossed **and** `minute % 10 == 0` |
//! | date | day changed |
//!
//! A full reinitialization (first tick, after a rebuild, on a day change,
//! after the clock went backwards) recomputes every indicator regardless of
//! the policy. A day change always reinitializes: without a date the tick
//! cannot tell a midnight rollover from a jump back to an earlier day.
//!
//! # Example
//!
//! ```rust
//! use aviator_face::angle::HourDial;
//! use aviator_face::scheduler::{Indicator, UpdateScheduler};
//! use aviator_face::settings::DisplayConfig;
//! use aviator_face::time::{CalendarTime, TimeUnits};
//!
//! let config = DisplayConfig::default();
//! let mut scheduler = UpdateScheduler::new(HourDial::TwentyFour, true);
//!
//! // first tick always recomputes everything
//! let t = CalendarTime::new(10, 0, 0, 3);
//! let outcome = scheduler.on_tick(t, TimeUnits::SECOND, &config);
//! assert!(outcome.forced);
//!
//! // one second later only the second hand moves
//! let outcome = scheduler.on_tick(t.succ(), TimeUnits::SECOND, &config);
//! assert!(outcome.recomputed.contains(Indicator::Second));
//! assert!(!outcome.recomputed.contains(Indicator::Minute));
//! ```

use core::fmt::Write;

use heapless::String;
use log::warn;

use crate::angle::{hour_angle, minute_angle, second_angle, Angle, HourDial};
use crate::settings::DisplayConfig;
use crate::time::{CalendarTime, TimeUnits};

/// Minute hand sampling period, in seconds.
pub const MINUTE_SAMPLE_SECONDS: u8 = 10;

/// Hour hand sampling period, in minutes.
pub const HOUR_SAMPLE_MINUTES: u8 = 10;

/// Day-of-month text ("1".."31").
pub type DateText = String<2>;

/// A time-dependent visual element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Indicator {
    /// Second hand.
    Second,
    /// Minute hand.
    Minute,
    /// Hour hand.
    Hour,
    /// Day-of-month label.
    Date,
}

impl Indicator {
    const fn bit(&self) -> u8 {
        match self {
            Indicator::Second => 1 << 0,
            Indicator::Minute => 1 << 1,
            Indicator::Hour => 1 << 2,
            Indicator::Date => 1 << 3,
        }
    }
}

/// Small set of [`Indicator`]s.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IndicatorSet(u8);

impl IndicatorSet {
    /// Empty set.
    pub const EMPTY: Self = Self(0);

    /// Adds an indicator.
    #[inline]
    pub fn insert(&mut self, indicator: Indicator) {
        self.0 |= indicator.bit();
    }

    /// Returns true if `indicator` is in the set.
    #[inline]
    pub const fn contains(&self, indicator: Indicator) -> bool {
        self.0 & indicator.bit() != 0
    }

    /// Returns true if the set is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Returns true if any hand (not the date) is in the set.
    #[inline]
    pub const fn any_hand(&self) -> bool {
        self.0 & !Indicator::Date.bit() != 0
    }
}

/// Cached rotation of one hand. `None` means stale.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct IndicatorState {
    angle: Option<Angle>,
}

impl IndicatorState {
    /// A stale indicator that has never been computed.
    pub const fn stale() -> Self {
        Self { angle: None }
    }

    /// Cached angle, `None` while stale.
    #[inline]
    pub const fn angle(&self) -> Option<Angle> {
        self.angle
    }

    /// Returns true if the next tick must recompute this indicator.
    #[inline]
    pub const fn is_stale(&self) -> bool {
        self.angle.is_none()
    }

    /// Forces the next tick to recompute.
    #[inline]
    pub fn invalidate(&mut self) {
        self.angle = None;
    }

    /// Stores a fresh angle, returning true if it differs from the cached one.
    fn store(&mut self, angle: Angle) -> bool {
        let changed = self.angle != Some(angle);
        self.angle = Some(angle);
        changed
    }
}

/// What one tick did.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TickOutcome {
    /// Indicators whose value was recomputed.
    pub recomputed: IndicatorSet,
    /// Indicators whose value actually changed.
    pub changed: IndicatorSet,
    /// The tick ran the full reinitialization path.
    pub forced: bool,
    /// Something visible changed and must be redrawn.
    pub redraw: bool,
}

/// Per-indicator cache and the tick-driven update policy.
#[derive(Clone, Debug)]
pub struct UpdateScheduler {
    dial: HourDial,
    second: IndicatorState,
    minute: IndicatorState,
    hour: IndicatorState,
    date: Option<DateText>,
    has_date: bool,
    last_time: Option<CalendarTime>,
}

impl UpdateScheduler {
    /// Creates a scheduler with every indicator stale.
    pub fn new(dial: HourDial, has_date: bool) -> Self {
        Self {
            dial,
            second: IndicatorState::stale(),
            minute: IndicatorState::stale(),
            hour: IndicatorState::stale(),
            date: None,
            has_date,
            last_time: None,
        }
    }

    /// Hour scale used for the hour hand.
    #[inline]
    pub fn dial(&self) -> HourDial {
        self.dial
    }

    /// Cached second hand angle.
    #[inline]
    pub fn second(&self) -> Option<Angle> {
        self.second.angle()
    }

    /// Cached minute hand angle.
    #[inline]
    pub fn minute(&self) -> Option<Angle> {
        self.minute.angle()
    }

    /// Cached hour hand angle.
    #[inline]
    pub fn hour(&self) -> Option<Angle> {
        self.hour.angle()
    }

    /// Current date text, `None` before the first computation or without a date label.
    #[inline]
    pub fn date(&self) -> Option<&DateText> {
        self.date.as_ref()
    }

    /// Current date text, empty before the first computation or without a date label.
    pub fn date_text(&self) -> &str {
        self.date.as_ref().map(|d| d.as_str()).unwrap_or("")
    }

    /// Time of the most recent tick or reinitialization.
    #[inline]
    pub fn last_time(&self) -> Option<CalendarTime> {
        self.last_time
    }

    /// Returns true if `indicator` will be recomputed regardless of coarsening.
    pub fn is_stale(&self, indicator: Indicator) -> bool {
        match indicator {
            Indicator::Second => self.second.is_stale(),
            Indicator::Minute => self.minute.is_stale(),
            Indicator::Hour => self.hour.is_stale(),
            Indicator::Date => self.has_date && self.date.is_none(),
        }
    }

    /// Marks every indicator stale.
    pub fn invalidate(&mut self) {
        self.second.invalidate();
        self.minute.invalidate();
        self.hour.invalidate();
        self.date = None;
    }

    /// Recomputes every required indicator now, ignoring the coarsening policy.
    pub fn reinitialize(&mut self, time: CalendarTime, config: &DisplayConfig) -> TickOutcome {
        self.invalidate();
        let mut outcome = TickOutcome {
            forced: true,
            redraw: true,
            ..TickOutcome::default()
        };

        if config.seconds_visible {
            self.refresh(Indicator::Second, &time, &mut outcome);
        }
        self.refresh(Indicator::Minute, &time, &mut outcome);
        self.refresh(Indicator::Hour, &time, &mut outcome);
        if self.has_date {
            self.refresh(Indicator::Date, &time, &mut outcome);
        }

        self.last_time = Some(time);
        outcome
    }

    /// Applies the coarsening policy for one delivered tick.
    pub fn on_tick(
        &mut self,
        time: CalendarTime,
        units: TimeUnits,
        config: &DisplayConfig,
    ) -> TickOutcome {
        if self.went_backwards(&time, units) {
            warn!(
                "clock went backwards to {:02}:{:02}:{:02}, recomputing all hands",
                time.hour(),
                time.minute(),
                time.second()
            );
            return self.reinitialize(time, config);
        }

        if units.contains(TimeUnits::DAY) || self.needs_full(config) {
            return self.reinitialize(time, config);
        }

        let mut outcome = TickOutcome::default();

        if config.seconds_visible {
            self.refresh(Indicator::Second, &time, &mut outcome);
        } else if !self.second.is_stale() {
            // hand was just hidden; drop it so the next frame erases it
            self.second.invalidate();
            outcome.changed.insert(Indicator::Second);
        }

        if time.second() % MINUTE_SAMPLE_SECONDS == 0 {
            self.refresh(Indicator::Minute, &time, &mut outcome);
        }

        if units.contains(TimeUnits::MINUTE) && time.minute() % HOUR_SAMPLE_MINUTES == 0 {
            self.refresh(Indicator::Hour, &time, &mut outcome);
        }

        outcome.redraw = !outcome.changed.is_empty();
        self.last_time = Some(time);
        outcome
    }

    fn needs_full(&self, config: &DisplayConfig) -> bool {
        (config.seconds_visible && self.second.is_stale())
            || self.minute.is_stale()
            || self.hour.is_stale()
            || self.is_stale(Indicator::Date)
    }

    fn went_backwards(&self, time: &CalendarTime, units: TimeUnits) -> bool {
        match self.last_time {
            Some(prev) => {
                !units.contains(TimeUnits::DAY) && time.seconds_of_day() < prev.seconds_of_day()
            }
            None => false,
        }
    }

    fn refresh(&mut self, indicator: Indicator, time: &CalendarTime, outcome: &mut TickOutcome) {
        outcome.recomputed.insert(indicator);
        let changed = match indicator {
            Indicator::Second => self.second.store(second_angle(time)),
            Indicator::Minute => self.minute.store(minute_angle(time)),
            Indicator::Hour => self.hour.store(hour_angle(time, self.dial)),
            Indicator::Date => {
                let mut text = DateText::new();
                // two digits always fit
                let _ = write!(text, "{}", time.day());
                let changed = self.date.as_ref() != Some(&text);
                self.date = Some(text);
                changed
            }
        };
        if changed {
            outcome.changed.insert(indicator);
        }
    }
}
