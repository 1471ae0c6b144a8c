//! Inbound configuration messages from the paired companion.
//!
//! The companion sends a mapping of integer keys to string values. Every
//! entry is validated at this boundary into a closed [`ConfigCommand`];
//! anything that does not validate becomes a [`RejectReason`] and never
//! reaches the configuration.
//!
//! | Key | Setting | Values |
//! |-----|---------|--------|
//! | `0` | [`SettingKey::SecondsVisible`] | `"on"` / `"off"` |
//! | `1` | [`SettingKey::ColorInversion`] | `"on"` / `"off"` |
//!
//! # Example
//!
//! ```rust
//! use aviator_face::messages::{ConfigCommand, RejectReason, SettingKey, Toggle};
//!
//! let cmd = ConfigCommand::parse(0, "off").unwrap();
//! assert_eq!(cmd.key, SettingKey::SecondsVisible);
//! assert_eq!(cmd.value, Toggle::Off);
//!
//! assert_eq!(ConfigCommand::parse(99, "on"), Err(RejectReason::UnknownKey(99)));
//! ```

use heapless::{String, Vec};
use log::{debug, warn};

/// Maximum entries carried by one inbound message.
pub const MAX_ENTRIES: usize = 8;

/// Maximum length of an entry value.
pub const MAX_VALUE_LEN: usize = 16;

// ============================================================================
// Keys and values
// ============================================================================

/// Persisted display preference.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SettingKey {
    /// Whether the second hand is shown.
    SecondsVisible = 0,
    /// Whether the colour scheme is inverted.
    ColorInversion = 1,
}

impl SettingKey {
    /// Every key, in wire order.
    pub const ALL: [SettingKey; 2] = [SettingKey::SecondsVisible, SettingKey::ColorInversion];

    /// Wire and storage id.
    #[inline]
    pub const fn id(&self) -> u32 {
        *self as u32
    }

    /// Looks up a key by wire id.
    pub const fn from_id(id: u32) -> Option<Self> {
        match id {
            0 => Some(SettingKey::SecondsVisible),
            1 => Some(SettingKey::ColorInversion),
            _ => None,
        }
    }

    /// Value used when nothing has been stored.
    pub const fn default_value(&self) -> bool {
        match self {
            SettingKey::SecondsVisible => true,
            SettingKey::ColorInversion => false,
        }
    }
}

/// Two-valued setting value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Toggle {
    /// `"on"`
    On,
    /// `"off"`
    Off,
}

impl Toggle {
    /// Parses the literal wire strings `"on"` and `"off"`.
    ///
    /// Matching is exact: no trimming, no case folding.
    pub fn from_text(s: &str) -> Option<Self> {
        match s {
            "on" => Some(Toggle::On),
            "off" => Some(Toggle::Off),
            _ => None,
        }
    }

    /// Wire string.
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Toggle::On => "on",
            Toggle::Off => "off",
        }
    }

    /// Boolean value stored for this toggle.
    #[inline]
    pub const fn as_bool(&self) -> bool {
        matches!(self, Toggle::On)
    }
}

impl From<bool> for Toggle {
    fn from(value: bool) -> Self {
        if value {
            Toggle::On
        } else {
            Toggle::Off
        }
    }
}

// ============================================================================
// Commands
// ============================================================================

/// A validated configuration update.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConfigCommand {
    /// Setting to change.
    pub key: SettingKey,
    /// New value.
    pub value: Toggle,
}

impl ConfigCommand {
    /// Creates a command from already-typed parts.
    pub const fn new(key: SettingKey, value: Toggle) -> Self {
        Self { key, value }
    }

    /// Validates one raw wire entry.
    pub fn parse(key: u32, value: &str) -> Result<Self, RejectReason> {
        let key = SettingKey::from_id(key).ok_or(RejectReason::UnknownKey(key))?;
        let value = Toggle::from_text(value).ok_or(RejectReason::InvalidValue { key })?;
        Ok(Self { key, value })
    }
}

/// Why an entry was not applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RejectReason {
    /// The key id is not a known setting.
    UnknownKey(u32),
    /// The key is known but this face variant does not offer it.
    UnsupportedKey(SettingKey),
    /// The value is not `"on"` or `"off"`.
    InvalidValue {
        /// Key the value was sent for.
        key: SettingKey,
    },
}

// ============================================================================
// Inbound message
// ============================================================================

/// One raw key/value pair as received.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MessageEntry {
    /// Integer key.
    pub key: u32,
    /// String value, truncated to [`MAX_VALUE_LEN`] bytes.
    pub value: String<MAX_VALUE_LEN>,
}

impl MessageEntry {
    /// Creates an entry, truncating an over-long value.
    pub fn new(key: u32, value: &str) -> Self {
        let mut v = String::new();
        for c in value.chars() {
            if v.push(c).is_err() {
                break;
            }
        }
        Self { key, value: v }
    }
}

/// An inbound configuration message with one or more entries.
///
/// # Example
///
/// ```rust
/// use aviator_face::messages::InboundMessage;
///
/// let msg = InboundMessage::new().with_entry(0, "on").with_entry(1, "off");
/// assert_eq!(msg.len(), 2);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InboundMessage {
    entries: Vec<MessageEntry, MAX_ENTRIES>,
}

impl InboundMessage {
    /// Creates an empty message.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry. Entries beyond [`MAX_ENTRIES`] are dropped with a warning.
    pub fn with_entry(mut self, key: u32, value: &str) -> Self {
        self.push(key, value);
        self
    }

    /// Appends an entry in place. Returns false if the message is full.
    pub fn push(&mut self, key: u32, value: &str) -> bool {
        if self.entries.push(MessageEntry::new(key, value)).is_err() {
            warn!("inbound message full, dropping key {}", key);
            return false;
        }
        true
    }

    /// Entries in arrival order.
    pub fn entries(&self) -> impl Iterator<Item = &MessageEntry> {
        self.entries.iter()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the message carries no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ============================================================================
// Outbound notifications
// ============================================================================

/// Delivery notifications from the messaging layer.
///
/// Observational only: they are logged and never acted on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DeliveryStatus {
    /// An outbound message was acknowledged.
    Sent,
    /// An outbound message could not be delivered.
    Failed,
    /// An inbound message was dropped before it reached the face.
    Dropped,
}

impl DeliveryStatus {
    /// Logs the notification.
    pub fn log(&self) {
        match self {
            DeliveryStatus::Sent => debug!("message sent"),
            DeliveryStatus::Failed => debug!("message send failed"),
            DeliveryStatus::Dropped => debug!("message dropped"),
        }
    }
}

// ============================================================================
// Companion payload
// ============================================================================

/// Settings returned by the companion configuration page.
///
/// # JSON Example
///
/// ```json
/// {"seconds": "on", "invert": "off"}
/// ```
///
/// Both fields are optional; absent fields produce no entry.
#[cfg(feature = "serde")]
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CompanionSettings {
    /// Seconds hand visibility.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seconds: Option<String<MAX_VALUE_LEN>>,
    /// Colour inversion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invert: Option<String<MAX_VALUE_LEN>>,
}

#[cfg(feature = "serde")]
impl From<&CompanionSettings> for InboundMessage {
    fn from(settings: &CompanionSettings) -> Self {
        let mut msg = InboundMessage::new();
        if let Some(seconds) = &settings.seconds {
            msg.push(SettingKey::SecondsVisible.id(), seconds);
        }
        if let Some(invert) = &settings.invert {
            msg.push(SettingKey::ColorInversion.id(), invert);
        }
        msg
    }
}

/// Parse the companion configuration page result from JSON bytes.
///
/// Works in both `std` and `no_std` environments using `serde-json-core`.
///
/// # Example
///
/// ```
/// use aviator_face::messages::{parse_companion_settings, InboundMessage};
///
/// let settings = parse_companion_settings(br#"{"seconds":"off","invert":"on"}"#).unwrap();
/// let msg = InboundMessage::from(&settings);
/// assert_eq!(msg.len(), 2);
/// ```
#[cfg(feature = "serde-json-core")]
pub fn parse_companion_settings(json: &[u8]) -> Option<CompanionSettings> {
    serde_json_core::from_slice(json).ok().map(|(s, _)| s)
}
