//! The watch face: scheduler, settings and rendering resources in one place.
//!
//! [`WatchFace`] is the owned display state of a running face. The host event
//! loop feeds it ticks and inbound configuration messages, one at a time, and
//! it drives the [`RenderSurface`] accordingly:
//!
//! - **Tick**: the [`UpdateScheduler`] recomputes stale indicators; if
//!   anything changed the hands layer is marked dirty and the date label text
//!   is refreshed.
//! - **Configuration**: entries are validated, persisted and applied through
//!   the [`SettingsController`]; a colour inversion releases the current
//!   [`Generation`] and builds a new one before recomputing every indicator.
//!
//! # Example
//!
//! ```rust
//! use aviator_face::config::FaceVariant;
//! use aviator_face::face::{ConfigOutcome, WatchFace};
//! use aviator_face::hal::{MockStore, MockSurface};
//! use aviator_face::time::{CalendarTime, TimeUnits};
//!
//! let now = CalendarTime::new(9, 41, 0, 14);
//! let mut face = WatchFace::load(
//!     MockSurface::new(),
//!     MockStore::new(),
//!     FaceVariant::aviator_24h(),
//!     now,
//! )
//! .unwrap();
//!
//! face.on_tick(now.succ(), TimeUnits::SECOND);
//!
//! let outcome = face.apply_config_update(1, "on", now.succ()).unwrap();
//! assert!(matches!(outcome, ConfigOutcome::Applied { rebuilt: true, .. }));
//! assert!(face.config().inverted);
//! ```

use core::fmt;

use heapless::Vec;
use log::{error, info, warn};

use crate::angle::Angle;
use crate::config::{FaceLayout, FaceVariant};
use crate::generation::{Generation, Theme};
use crate::messages::{
    DeliveryStatus, InboundMessage, RejectReason, SettingKey, Toggle, MAX_ENTRIES,
};
use crate::scheduler::{DateText, Indicator, TickOutcome, UpdateScheduler};
use crate::settings::{DisplayConfig, SettingEffect, SettingsController};
use crate::time::{CalendarTime, TimeUnits};
use crate::traits::{RenderSurface, SettingsStore};

// ============================================================================
// Outcomes and errors
// ============================================================================

/// Result of one configuration entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ConfigOutcome {
    /// The entry was persisted and applied.
    Applied {
        /// Setting that changed.
        key: SettingKey,
        /// New value.
        value: Toggle,
        /// Rendering resources were rebuilt.
        rebuilt: bool,
    },
    /// The entry was ignored; nothing changed.
    Rejected {
        /// Why.
        reason: RejectReason,
    },
}

impl ConfigOutcome {
    /// Returns true if the entry was applied.
    pub fn is_applied(&self) -> bool {
        matches!(self, ConfigOutcome::Applied { .. })
    }
}

/// Failures surfaced by [`WatchFace`] operations.
#[derive(Debug, PartialEq, Eq)]
pub enum FaceError<E> {
    /// The compositor could not allocate a resource.
    Surface(E),
    /// Building resources for a new configuration failed.
    RebuildFailed {
        /// The previous configuration is live again with a working generation.
        restored: bool,
        /// The allocation error that aborted the rebuild.
        source: E,
    },
}

impl<E: fmt::Debug> fmt::Display for FaceError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FaceError::Surface(e) => write!(f, "resource allocation failed: {:?}", e),
            FaceError::RebuildFailed { restored: true, source } => {
                write!(f, "rebuild failed ({:?}), previous configuration restored", source)
            }
            FaceError::RebuildFailed { restored: false, source } => {
                write!(f, "rebuild failed ({:?}), face has no resources", source)
            }
        }
    }
}

#[cfg(feature = "std")]
impl<E: fmt::Debug> std::error::Error for FaceError<E> {}

/// Per-entry results of one inbound message, in entry order.
pub type MessageOutcomes<E> = Vec<Result<ConfigOutcome, FaceError<E>>, MAX_ENTRIES>;

// ============================================================================
// Frame snapshot
// ============================================================================

/// Everything needed to draw the face as it currently is.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FaceFrame {
    /// Live preferences.
    pub config: DisplayConfig,
    /// Palette of the live generation, `None` if the face has no resources.
    pub theme: Option<Theme>,
    /// Screen placement.
    pub layout: FaceLayout,
    /// Second hand, `None` while hidden.
    pub second: Option<Angle>,
    /// Minute hand.
    pub minute: Option<Angle>,
    /// Hour hand.
    pub hour: Option<Angle>,
    /// Day-of-month text, empty on faces without a date.
    pub date: DateText,
    /// Live generation id.
    pub generation: Option<u32>,
}

// ============================================================================
// Watch face
// ============================================================================

/// A running watch face.
pub struct WatchFace<R: RenderSurface, S: SettingsStore> {
    surface: R,
    settings: SettingsController<S>,
    scheduler: UpdateScheduler,
    generation: Option<Generation>,
    variant: FaceVariant,
    next_generation: u32,
    redraws: u32,
    rebuilds: u32,
}

impl<R: RenderSurface, S: SettingsStore> WatchFace<R, S> {
    /// Loads preferences, builds the first generation and draws `now`.
    pub fn load(
        surface: R,
        store: S,
        variant: FaceVariant,
        now: CalendarTime,
    ) -> Result<Self, FaceError<R::Error>> {
        let settings = SettingsController::load(store, variant.capabilities);
        let scheduler = UpdateScheduler::new(variant.dial, variant.has_date());
        let mut face = Self {
            surface,
            settings,
            scheduler,
            generation: None,
            variant,
            next_generation: 1,
            redraws: 0,
            rebuilds: 0,
        };

        face.build_generation().map_err(FaceError::Surface)?;
        face.reinitialize(now);
        info!(
            "face '{}' loaded (seconds={}, inverted={})",
            face.variant.name,
            face.config().seconds_visible,
            face.config().inverted
        );
        Ok(face)
    }

    /// Releases every resource and hands back the collaborators.
    pub fn unload(mut self) -> (R, S) {
        if let Some(generation) = self.generation.take() {
            generation.release(&mut self.surface);
        }
        (self.surface, self.settings.into_store())
    }

    // ------------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------------

    /// Handles one timer tick.
    pub fn on_tick(&mut self, time: CalendarTime, units: TimeUnits) -> TickOutcome {
        let config = self.settings.config();
        let outcome = self.scheduler.on_tick(time, units, &config);
        self.present(&outcome);
        outcome
    }

    /// Validates and applies one configuration entry.
    ///
    /// Rejected entries leave the configuration and the store untouched.
    pub fn apply_config_update(
        &mut self,
        key: u32,
        value: &str,
        now: CalendarTime,
    ) -> Result<ConfigOutcome, FaceError<R::Error>> {
        let cmd = match self.settings.validate(key, value) {
            Ok(cmd) => cmd,
            Err(reason) => {
                warn!("ignoring config entry {}={:?}: {:?}", key, value, reason);
                return Ok(ConfigOutcome::Rejected { reason });
            }
        };

        let previous = self.settings.config();
        let rebuilt = match self.settings.apply(cmd) {
            SettingEffect::NextTick => false,
            SettingEffect::RefreshAll => {
                self.reinitialize(now);
                false
            }
            SettingEffect::Rebuild => {
                self.rebuild_from(previous, now)?;
                true
            }
        };

        Ok(ConfigOutcome::Applied {
            key: cmd.key,
            value: cmd.value,
            rebuilt,
        })
    }

    /// Applies every entry of an inbound message independently, in order.
    pub fn handle_message(
        &mut self,
        message: &InboundMessage,
        now: CalendarTime,
    ) -> MessageOutcomes<R::Error> {
        let mut outcomes = Vec::new();
        for entry in message.entries() {
            let outcome = self.apply_config_update(entry.key, &entry.value, now);
            // message capacity equals outcome capacity
            let _ = outcomes.push(outcome);
        }
        outcomes
    }

    /// Records an outbound delivery notification.
    pub fn on_delivery(&self, status: DeliveryStatus) {
        status.log();
    }

    /// Tears down and rebuilds every resource for the current configuration.
    ///
    /// Hosts call this to recover a face left without resources by a failed
    /// rebuild.
    pub fn rebuild(&mut self, now: CalendarTime) -> Result<(), FaceError<R::Error>> {
        let current = self.settings.config();
        self.rebuild_from(current, now)
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    /// Live preferences.
    #[inline]
    pub fn config(&self) -> DisplayConfig {
        self.settings.config()
    }

    /// Variant this face was loaded as.
    #[inline]
    pub fn variant(&self) -> &FaceVariant {
        &self.variant
    }

    /// Indicator cache.
    #[inline]
    pub fn scheduler(&self) -> &UpdateScheduler {
        &self.scheduler
    }

    /// Preference owner.
    #[inline]
    pub fn settings(&self) -> &SettingsController<S> {
        &self.settings
    }

    /// Persistent store.
    #[inline]
    pub fn store(&self) -> &S {
        self.settings.store()
    }

    /// Compositor.
    #[inline]
    pub fn surface(&self) -> &R {
        &self.surface
    }

    /// Mutable compositor access.
    #[inline]
    pub fn surface_mut(&mut self) -> &mut R {
        &mut self.surface
    }

    /// Live resource generation, `None` after an unrecovered rebuild failure.
    #[inline]
    pub fn generation(&self) -> Option<&Generation> {
        self.generation.as_ref()
    }

    /// Number of times the hands layer was marked dirty.
    #[inline]
    pub fn redraws(&self) -> u32 {
        self.redraws
    }

    /// Number of completed rebuilds.
    #[inline]
    pub fn rebuilds(&self) -> u32 {
        self.rebuilds
    }

    /// Snapshot for drawing.
    pub fn frame(&self) -> FaceFrame {
        FaceFrame {
            config: self.config(),
            theme: self.generation.as_ref().map(Generation::theme),
            layout: self.variant.layout,
            second: self.scheduler.second(),
            minute: self.scheduler.minute(),
            hour: self.scheduler.hour(),
            date: self.scheduler.date().cloned().unwrap_or_default(),
            generation: self.generation.as_ref().map(Generation::id),
        }
    }

    // ------------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------------

    fn build_generation(&mut self) -> Result<(), R::Error> {
        let id = self.next_generation;
        self.next_generation = self.next_generation.wrapping_add(1);
        let config = self.settings.config();
        let generation =
            Generation::build(&mut self.surface, id, &config, &self.variant.layout)?;
        self.generation = Some(generation);
        Ok(())
    }

    fn rebuild_from(
        &mut self,
        previous: DisplayConfig,
        now: CalendarTime,
    ) -> Result<(), FaceError<R::Error>> {
        info!("rebuilding face resources for {:?}", self.settings.config());
        if let Some(old) = self.generation.take() {
            old.release(&mut self.surface);
        }
        self.scheduler.invalidate();

        let source = match self.build_generation() {
            Ok(()) => {
                self.rebuilds += 1;
                self.reinitialize(now);
                return Ok(());
            }
            Err(e) => e,
        };

        error!("rebuild failed: {:?}, restoring {:?}", source, previous);
        self.settings.restore(previous);
        let restored = match self.build_generation() {
            Ok(()) => {
                self.reinitialize(now);
                true
            }
            Err(e) => {
                error!("fallback rebuild failed: {:?}", e);
                false
            }
        };
        Err(FaceError::RebuildFailed { restored, source })
    }

    fn reinitialize(&mut self, now: CalendarTime) {
        let config = self.settings.config();
        let outcome = self.scheduler.reinitialize(now, &config);
        self.present(&outcome);
    }

    /// Pushes a tick outcome to the compositor.
    fn present(&mut self, outcome: &TickOutcome) {
        let Some(generation) = self.generation.as_ref() else {
            return;
        };

        if outcome.forced || outcome.changed.any_hand() {
            self.surface.mark_dirty(generation.hands());
            self.redraws = self.redraws.wrapping_add(1);
        }

        if outcome.changed.contains(Indicator::Date) {
            if let Some(date) = generation.date() {
                self.surface.set_text(date, self.scheduler.date_text());
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::{MockStore, MockSurface};

    fn at(hour: u8, minute: u8, second: u8) -> CalendarTime {
        CalendarTime::new(hour, minute, second, 7)
    }

    fn face() -> WatchFace<MockSurface, MockStore> {
        WatchFace::load(
            MockSurface::new(),
            MockStore::new(),
            FaceVariant::aviator_24h(),
            at(12, 0, 0),
        )
        .unwrap()
    }

    #[test]
    fn load_builds_and_draws() {
        let face = face();
        assert_eq!(face.surface().live().len(), 3);
        assert_eq!(face.redraws(), 1);
        assert_eq!(face.generation().map(Generation::id), Some(1));
        let date = face.generation().and_then(Generation::date).unwrap();
        assert_eq!(face.surface().text_of(date), Some("7"));
    }

    #[test]
    fn load_fails_cleanly() {
        let mut surface = MockSurface::new();
        surface.fail_always = true;
        let result = WatchFace::load(
            surface,
            MockStore::new(),
            FaceVariant::aviator_24h(),
            at(0, 0, 0),
        );
        assert!(matches!(result, Err(FaceError::Surface(_))));
    }

    #[test]
    fn tick_without_change_does_not_redraw() {
        let mut face = face();
        let cmd = face.apply_config_update(0, "off", at(12, 0, 0)).unwrap();
        assert!(cmd.is_applied());
        // drops the cached second hand
        face.on_tick(at(12, 0, 1), TimeUnits::SECOND);
        let before = face.redraws();
        let outcome = face.on_tick(at(12, 0, 2), TimeUnits::SECOND);
        assert!(!outcome.redraw);
        assert_eq!(face.redraws(), before);
    }

    #[test]
    fn seconds_on_recomputes_immediately() {
        let store = MockStore::new().with_value(SettingKey::SecondsVisible, false);
        let mut face = WatchFace::load(
            MockSurface::new(),
            store,
            FaceVariant::aviator_24h(),
            at(8, 0, 0),
        )
        .unwrap();
        assert_eq!(face.frame().second, None);

        face.apply_config_update(0, "on", at(8, 0, 15)).unwrap();
        assert_eq!(face.frame().second, Some(Angle::QUARTER));
        assert_eq!(face.rebuilds(), 0);
    }

    #[test]
    fn inversion_swaps_generation() {
        let mut face = face();
        face.apply_config_update(1, "on", at(12, 0, 5)).unwrap();
        let generation = face.generation().unwrap();
        assert_eq!(generation.id(), 2);
        assert_eq!(generation.theme(), Theme::for_config(&face.config()));
        assert_eq!(face.surface().live().len(), 3);
        assert_eq!(face.rebuilds(), 1);
    }

    #[test]
    fn rejected_entry_reports_reason() {
        let mut face = face();
        let outcome = face.apply_config_update(0, "maybe", at(12, 0, 1)).unwrap();
        assert_eq!(
            outcome,
            ConfigOutcome::Rejected {
                reason: RejectReason::InvalidValue {
                    key: SettingKey::SecondsVisible
                }
            }
        );
    }

    #[test]
    fn frame_reflects_state() {
        let face = face();
        let frame = face.frame();
        assert_eq!(frame.hour, Some(Angle::HALF));
        assert_eq!(frame.minute, Some(Angle::ZERO));
        assert_eq!(frame.second, Some(Angle::ZERO));
        assert_eq!(frame.date.as_str(), "7");
        assert_eq!(frame.generation, Some(1));
    }

    #[test]
    fn unload_releases_everything() {
        let (surface, store) = face().unload();
        assert!(surface.live().is_empty());
        assert_eq!(store.writes, 0);
    }

    #[test]
    fn error_display() {
        let e: FaceError<&str> = FaceError::RebuildFailed {
            restored: true,
            source: "oom",
        };
        let mut text: heapless::String<96> = heapless::String::new();
        fmt::write(&mut text, format_args!("{}", e)).unwrap();
        assert!(text.contains("restored"));
    }
}
