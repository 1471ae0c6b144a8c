//! Static configuration: face variants, layout and the desktop simulator.
//!
//! Uses `heapless::String` for `no_std` compatibility while remaining
//! ergonomic to use on desktop with `std`. Runtime preferences that the user
//! can change live a level below, in [`DisplayConfig`](crate::settings::DisplayConfig).
//!
//! # Example
//!
//! ```rust
//! use aviator_face::config::{Config, FaceVariant, WebConfig};
//!
//! // Use defaults
//! let config = Config::default();
//! assert_eq!(config.face.name.as_str(), "aviator-24h");
//!
//! // Or customize
//! let config = Config::default()
//!     .with_face(FaceVariant::noon_down_24h())
//!     .with_web(WebConfig::default().with_port(3000));
//! ```

use heapless::String as HString;

use crate::angle::HourDial;
use crate::hands::{Point, Rect};
use crate::messages::SettingKey;

/// Maximum length for short config strings (names)
pub const MAX_SHORT_STRING: usize = 32;

/// Maximum length for longer config strings (file paths)
pub const MAX_LONG_STRING: usize = 128;

/// Type alias for short config strings
pub type ShortString = HString<MAX_SHORT_STRING>;

/// Type alias for longer config strings
pub type LongString = HString<MAX_LONG_STRING>;

/// Copies as much of `s` as fits into a fixed-capacity string, on a char boundary.
fn bounded<const N: usize>(s: &str) -> HString<N> {
    let mut out = HString::new();
    for c in s.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

/// Create a ShortString from a &str, truncating if too long
pub fn short_string(s: &str) -> ShortString {
    bounded(s)
}

/// Create a LongString from a &str, truncating if too long
pub fn long_string(s: &str) -> LongString {
    bounded(s)
}

// ============================================================================
// Main Config
// ============================================================================

/// Complete application configuration
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Config {
    /// Which watch face to run
    pub face: FaceVariant,
    /// Desktop simulator configuration
    pub web: WebConfig,
}

impl Config {
    /// Set the face variant
    pub fn with_face(mut self, face: FaceVariant) -> Self {
        self.face = face;
        self
    }

    /// Set web configuration
    pub fn with_web(mut self, web: WebConfig) -> Self {
        self.web = web;
        self
    }
}

// ============================================================================
// Face Variant
// ============================================================================

/// Which preferences a face variant lets the companion change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Capabilities {
    /// Key `0` is accepted.
    pub seconds_toggle: bool,
    /// Key `1` is accepted.
    pub color_inversion: bool,
}

impl Capabilities {
    /// Every preference configurable.
    pub const ALL: Self = Self {
        seconds_toggle: true,
        color_inversion: true,
    };

    /// Nothing configurable.
    pub const NONE: Self = Self {
        seconds_toggle: false,
        color_inversion: false,
    };

    /// Returns true if `key` may be changed on this variant.
    pub const fn supports(&self, key: SettingKey) -> bool {
        match key {
            SettingKey::SecondsVisible => self.seconds_toggle,
            SettingKey::ColorInversion => self.color_inversion,
        }
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::ALL
    }
}

/// Screen placement of the dial and its resources.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FaceLayout {
    /// Full screen bounds.
    pub bounds: Rect,
    /// Pivot of all hands.
    pub center: Point,
    /// Radius of the cap drawn over the pivot.
    pub cap_radius: u32,
    /// Date label frame, `None` for faces without a date.
    pub date_frame: Option<Rect>,
}

impl Default for FaceLayout {
    fn default() -> Self {
        Self {
            bounds: Rect::new(0, 0, 144, 168),
            center: Point::new(71, 83),
            cap_radius: 8,
            date_frame: Some(Rect::new(115, 74, 12, 14)),
        }
    }
}

impl FaceLayout {
    /// Remove the date label
    pub fn without_date(mut self) -> Self {
        self.date_frame = None;
        self
    }

    /// Set the date label frame
    pub fn with_date_frame(mut self, frame: Rect) -> Self {
        self.date_frame = Some(frame);
        self
    }

    /// Set the hand pivot
    pub fn with_center(mut self, center: Point) -> Self {
        self.center = center;
        self
    }
}

/// A watch face variant: dial, layout and what the companion may change.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FaceVariant {
    /// Human-readable variant name
    pub name: ShortString,
    /// Hour scale
    pub dial: HourDial,
    /// Configurable preferences
    pub capabilities: Capabilities,
    /// Screen placement
    pub layout: FaceLayout,
}

impl Default for FaceVariant {
    fn default() -> Self {
        Self::aviator_24h()
    }
}

impl FaceVariant {
    /// 24-hour dial with a date label; seconds and inversion configurable.
    pub fn aviator_24h() -> Self {
        Self {
            name: short_string("aviator-24h"),
            dial: HourDial::TwentyFour,
            capabilities: Capabilities::ALL,
            layout: FaceLayout::default(),
        }
    }

    /// 24-hour dial rotated so noon sits at the bottom. No date, nothing configurable.
    pub fn noon_down_24h() -> Self {
        Self {
            name: short_string("noon-down-24h"),
            dial: HourDial::TwentyFourNoonDown,
            capabilities: Capabilities::NONE,
            layout: FaceLayout::default().without_date(),
        }
    }

    /// Conventional 12-hour dial with a date label; only seconds configurable.
    pub fn classic_12h() -> Self {
        Self {
            name: short_string("classic-12h"),
            dial: HourDial::Twelve,
            capabilities: Capabilities {
                seconds_toggle: true,
                color_inversion: false,
            },
            layout: FaceLayout::default(),
        }
    }

    /// Set the variant name
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = short_string(name);
        self
    }

    /// Set the hour dial
    pub fn with_dial(mut self, dial: HourDial) -> Self {
        self.dial = dial;
        self
    }

    /// Set the configurable preferences
    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Set the layout
    pub fn with_layout(mut self, layout: FaceLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Returns true if the variant shows a date label.
    pub fn has_date(&self) -> bool {
        self.layout.date_frame.is_some()
    }
}

// ============================================================================
// Web Config
// ============================================================================

/// Desktop simulator configuration
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WebConfig {
    /// Port to listen on
    pub port: u16,
    /// Whether to enable CORS for all origins
    pub cors_permissive: bool,
    /// Tick interval in milliseconds (one tick per second on hardware)
    pub tick_interval_ms: u32,
    /// File the preferences are persisted to
    pub settings_path: LongString,
    /// Whether the web server is enabled
    pub enabled: bool,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            cors_permissive: true,
            tick_interval_ms: 1000,
            settings_path: long_string("aviator-face-settings.json"),
            enabled: true,
        }
    }
}

impl WebConfig {
    /// Set the port
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set CORS mode
    pub fn with_cors(mut self, permissive: bool) -> Self {
        self.cors_permissive = permissive;
        self
    }

    /// Set the tick interval
    pub fn with_tick_interval_ms(mut self, ms: u32) -> Self {
        self.tick_interval_ms = ms.max(1);
        self
    }

    /// Set the settings file path
    pub fn with_settings_path(mut self, path: &str) -> Self {
        self.settings_path = long_string(path);
        self
    }

    /// Enable or disable web server
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.face, FaceVariant::aviator_24h());
        assert_eq!(config.web.port, 8080);
        assert_eq!(config.web.tick_interval_ms, 1000);
    }

    #[test]
    fn variant_presets() {
        let aviator = FaceVariant::aviator_24h();
        assert_eq!(aviator.dial, HourDial::TwentyFour);
        assert!(aviator.has_date());
        assert!(aviator.capabilities.supports(SettingKey::ColorInversion));

        let noon = FaceVariant::noon_down_24h();
        assert_eq!(noon.dial, HourDial::TwentyFourNoonDown);
        assert!(!noon.has_date());
        assert!(!noon.capabilities.supports(SettingKey::SecondsVisible));
        assert!(!noon.capabilities.supports(SettingKey::ColorInversion));

        let classic = FaceVariant::classic_12h();
        assert_eq!(classic.dial.hours_per_turn(), 12);
        assert!(classic.capabilities.supports(SettingKey::SecondsVisible));
        assert!(!classic.capabilities.supports(SettingKey::ColorInversion));
    }

    #[test]
    fn layout_defaults_match_dial() {
        let layout = FaceLayout::default();
        assert_eq!(layout.center, Point::new(71, 83));
        assert_eq!(layout.cap_radius, 8);
        assert_eq!(layout.date_frame, Some(Rect::new(115, 74, 12, 14)));
        assert!(layout.bounds.contains(layout.center));
    }

    #[test]
    fn builder_pattern() {
        let config = Config::default()
            .with_face(
                FaceVariant::aviator_24h()
                    .with_name("My Face")
                    .with_dial(HourDial::Twelve)
                    .with_layout(FaceLayout::default().with_center(Point::new(72, 84))),
            )
            .with_web(WebConfig::default().with_port(3000).with_cors(false));

        assert_eq!(config.face.name.as_str(), "My Face");
        assert_eq!(config.face.dial, HourDial::Twelve);
        assert_eq!(config.face.layout.center, Point::new(72, 84));
        assert_eq!(config.web.port, 3000);
        assert!(!config.web.cors_permissive);
    }

    #[test]
    fn web_config_builder() {
        let web = WebConfig::default()
            .with_tick_interval_ms(0)
            .with_settings_path("/tmp/face.json")
            .with_enabled(false);

        assert_eq!(web.tick_interval_ms, 1);
        assert_eq!(web.settings_path.as_str(), "/tmp/face.json");
        assert!(!web.enabled);
    }

    #[test]
    fn short_string_truncation() {
        let long_input = "a".repeat(100);
        let s = short_string(&long_input);
        assert_eq!(s.len(), MAX_SHORT_STRING);
    }

    #[test]
    fn string_helpers_utf8_boundary() {
        let input = "⌚".repeat(20); // 3 bytes each
        let s = short_string(&input);
        assert!(s.len() <= MAX_SHORT_STRING);
        assert_eq!(s.len() % 3, 0);
        assert!(core::str::from_utf8(s.as_bytes()).is_ok());
    }
}
