//! Tick driver for the simulator.
//!
//! Stands in for the watch's timer service: samples the local clock on a
//! tokio interval and delivers a tick, with its [`TimeUnits`] change set,
//! whenever the displayed second changes.

use std::sync::Arc;
use std::time::Duration;

use chrono::{Datelike, Local, Timelike};
use log::debug;

use crate::scheduler::TickOutcome;
use crate::time::{CalendarTime, TimeUnits};
use crate::traits::{RenderSurface, SettingsStore, WallClock};

use super::shared::SharedFace;

/// Wall clock backed by the host's local time zone.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalClock;

impl WallClock for LocalClock {
    fn now(&self) -> CalendarTime {
        let now = Local::now();
        CalendarTime::new(
            now.hour() as u8,
            now.minute() as u8,
            now.second() as u8,
            now.day() as u8,
        )
    }
}

/// Converts clock samples into ticks.
#[derive(Clone, Copy, Debug)]
pub struct Ticker {
    previous: CalendarTime,
}

impl Ticker {
    /// Starts from the time the face was loaded at.
    pub fn new(start: CalendarTime) -> Self {
        Self { previous: start }
    }

    /// Samples the shared clock and delivers a tick unless the sample
    /// repeats the previous one.
    pub fn step<R, S>(&mut self, state: &SharedFace<R, S>) -> Option<TickOutcome>
    where
        R: RenderSurface,
        S: SettingsStore,
    {
        let previous = &mut self.previous;
        state.with_face(|face| {
            // sampled under the lock: handlers reinitialize with their own reading
            let now = state.now();
            if now == *previous {
                return None;
            }
            let units = TimeUnits::between(previous, &now);
            *previous = now;
            let outcome = face.on_tick(now, units);
            if outcome.redraw {
                debug!("tick {:02}:{:02}:{:02} redraw", now.hour(), now.minute(), now.second());
            }
            Some(outcome)
        })
    }
}

/// Drives `state` from its clock forever.
///
/// Sampling faster than once per second is harmless: repeated samples
/// produce no tick.
pub async fn run_ticker<R, S>(state: Arc<SharedFace<R, S>>, interval_ms: u32)
where
    R: RenderSurface + Send + 'static,
    S: SettingsStore + Send + 'static,
{
    let mut interval = tokio::time::interval(Duration::from_millis(u64::from(interval_ms.max(1))));
    let mut ticker = Ticker::new(state.now());
    loop {
        interval.tick().await;
        ticker.step(&state);
    }
}
