//! # aviator-face
//!
//! An analog watch face engine for a low-power wearable: hour, minute and
//! second hands, a day-of-month label, and two display preferences the
//! paired phone can change at runtime.
//!
//! ## Features
//!
//! - **Exact hand angles**: fixed-point fractions of a turn, 12- or 24-hour dials
//! - **Coarsened updates**: the minute hand samples every ten seconds, the hour
//!   hand every ten minutes, and nothing is redrawn unless something moved
//! - **Live preferences**: seconds visibility and colour inversion, validated,
//!   persisted, and applied without restarting the face
//! - **Atomic rebuilds**: rendering resources are released and recreated as
//!   one generation, with fallback to the previous configuration on failure
//!
//! ## Architecture
//!
//! The crate is structured to allow testing on desktop without a watch:
//!
//! - `time` - Calendar snapshots and the per-tick change set
//! - `angle` - Time to hand angle conversion
//! - `scheduler` - Per-indicator cache and the coarsening policy
//! - `settings` - Persisted display preferences
//! - `generation` - One set of rendering resources
//! - `face` - The running face tying it all together
//! - `traits` - Compositor, store and clock abstractions
//! - `hal` - Mock implementations, plus a JSON file store
//! - `render` - embedded-graphics rasterizer (`display` feature)
//! - `services` - HTTP companion channel and tick driver (`web` feature)
//!
//! ## Example
//!
//! ```rust
//! use aviator_face::{CalendarTime, FaceVariant, TimeUnits, WatchFace};
//! use aviator_face::hal::{MockStore, MockSurface};
//!
//! let now = CalendarTime::new(18, 30, 0, 21);
//! let mut face = WatchFace::load(
//!     MockSurface::new(),
//!     MockStore::new(),
//!     FaceVariant::aviator_24h(),
//!     now,
//! )
//! .unwrap();
//!
//! let outcome = face.on_tick(now.succ(), TimeUnits::SECOND);
//! assert!(outcome.redraw); // second hand moved
//!
//! face.apply_config_update(0, "off", now.succ()).unwrap();
//! assert!(!face.config().seconds_visible);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

/// Angle Resolver: time to hand rotation.
pub mod angle;
/// Shared configuration system: face variants, layout and simulator settings.
pub mod config;
/// The running watch face.
pub mod face;
/// Rendering resource generations and colour themes.
pub mod generation;
/// Hardware abstraction layer with mock implementations for testing.
pub mod hal;
/// Screen geometry and hand outlines.
pub mod hands;
/// Inbound configuration messages and outbound delivery notifications.
pub mod messages;
/// Update Scheduler: coarsened per-indicator recomputation.
pub mod scheduler;
/// Persisted display preferences.
pub mod settings;
/// Calendar time snapshots and tick change sets.
pub mod time;
/// Core traits for the compositor, persistent store and clock.
pub mod traits;

/// Rasterization with embedded-graphics (feature-gated).
#[cfg(feature = "display")]
pub mod render;

/// Desktop simulator services (feature-gated).
#[cfg(feature = "web")]
pub mod services;

// Re-exports for convenience
pub use angle::{hour_angle, minute_angle, resolve, second_angle, Angle, HandAngles, HourDial};
pub use config::{Capabilities, Config, FaceLayout, FaceVariant, WebConfig};
pub use face::{ConfigOutcome, FaceError, FaceFrame, WatchFace};
pub use generation::{Generation, HandColor, Theme};
pub use messages::{
    ConfigCommand, DeliveryStatus, InboundMessage, MessageEntry, RejectReason, SettingKey, Toggle,
};
pub use scheduler::{Indicator, IndicatorSet, IndicatorState, TickOutcome, UpdateScheduler};
pub use settings::{DisplayConfig, SettingEffect, SettingsController};
pub use time::{CalendarTime, TimeUnits};
pub use traits::{
    Background, RenderSurface, ResourceId, ResourceKind, ResourceSpec, SettingsStore, WallClock,
};

// Companion payload re-exports
#[cfg(feature = "serde")]
pub use messages::CompanionSettings;

#[cfg(feature = "serde-json-core")]
pub use messages::parse_companion_settings;
