//! API request and response types for the simulator.

use serde::{Deserialize, Serialize};

use crate::angle::{Angle, HourDial};
use crate::face::{ConfigOutcome, FaceError, WatchFace};
use crate::messages::InboundMessage;
use crate::traits::{RenderSurface, SettingsStore};

// ============================================================================
// Response Types
// ============================================================================

/// API response wrapper for consistent JSON structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the request was successful
    pub success: bool,
    /// Response data (present when success=true)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Error message (present when success=false)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Create a successful response with data
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Create an error response
    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Current face state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaceStateResponse {
    /// Variant name
    pub face: String,
    /// Hour scale
    pub dial: HourDial,
    /// Second hand shown
    pub seconds_visible: bool,
    /// Inverted colours
    pub inverted: bool,
    /// Second hand angle in degrees, absent while hidden
    #[serde(skip_serializing_if = "Option::is_none")]
    pub second_deg: Option<f32>,
    /// Minute hand angle in degrees
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minute_deg: Option<f32>,
    /// Hour hand angle in degrees
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hour_deg: Option<f32>,
    /// Day-of-month label
    pub date: String,
    /// Live resource generation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation: Option<u32>,
    /// Hands layer redraw count
    pub redraws: u32,
    /// Completed rebuilds
    pub rebuilds: u32,
    /// Time of the last tick, `HH:MM:SS`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
}

impl FaceStateResponse {
    /// Snapshot of `face`.
    pub fn from_face<R: RenderSurface, S: SettingsStore>(face: &WatchFace<R, S>) -> Self {
        let frame = face.frame();
        let degrees = |a: Option<Angle>| a.map(|a| a.degrees());
        Self {
            face: face.variant().name.as_str().into(),
            dial: face.variant().dial,
            seconds_visible: frame.config.seconds_visible,
            inverted: frame.config.inverted,
            second_deg: degrees(frame.second),
            minute_deg: degrees(frame.minute),
            hour_deg: degrees(frame.hour),
            date: frame.date.as_str().into(),
            generation: frame.generation,
            redraws: face.redraws(),
            rebuilds: face.rebuilds(),
            time: face.scheduler().last_time().map(|t| {
                format!("{:02}:{:02}:{:02}", t.hour(), t.minute(), t.second())
            }),
        }
    }
}

/// Result of one configuration entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EntryResponse {
    /// Key as received
    pub key: u32,
    /// `"applied"`, `"rejected"` or `"failed"`
    pub status: String,
    /// Resources were rebuilt
    pub rebuilt: bool,
    /// Rejection or failure detail
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Result of a configuration message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigResponse {
    /// One result per entry, in order
    pub entries: Vec<EntryResponse>,
}

impl ConfigResponse {
    /// Applies `message` to `face` and collects the per-entry results.
    pub fn apply<R: RenderSurface, S: SettingsStore>(
        face: &mut WatchFace<R, S>,
        message: &InboundMessage,
        now: crate::time::CalendarTime,
    ) -> Self {
        let outcomes = face.handle_message(message, now);
        let entries = message
            .entries()
            .zip(outcomes)
            .map(|(entry, outcome)| EntryResponse::new(entry.key, outcome))
            .collect();
        Self { entries }
    }

    /// Number of applied entries.
    pub fn applied(&self) -> usize {
        self.entries.iter().filter(|e| e.status == "applied").count()
    }
}

impl EntryResponse {
    fn new<E: core::fmt::Debug>(key: u32, outcome: Result<ConfigOutcome, FaceError<E>>) -> Self {
        match outcome {
            Ok(ConfigOutcome::Applied { rebuilt, .. }) => Self {
                key,
                status: "applied".into(),
                rebuilt,
                detail: None,
            },
            Ok(ConfigOutcome::Rejected { reason }) => Self {
                key,
                status: "rejected".into(),
                rebuilt: false,
                detail: Some(format!("{:?}", reason)),
            },
            Err(e) => Self {
                key,
                status: "failed".into(),
                rebuilt: false,
                detail: Some(e.to_string()),
            },
        }
    }
}

// ============================================================================
// Request Types
// ============================================================================

/// One raw message entry: `{"key": 0, "value": "on"}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageEntryRequest {
    /// Integer key
    pub key: u32,
    /// String value
    pub value: String,
}

/// Builds an inbound message from raw entries. Entries beyond capacity are dropped.
pub fn message_from_entries(entries: &[MessageEntryRequest]) -> InboundMessage {
    let mut message = InboundMessage::new();
    for entry in entries {
        if !message.push(entry.key, &entry.value) {
            break;
        }
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FaceVariant;
    use crate::hal::{MockStore, MockSurface};
    use crate::time::CalendarTime;

    #[test]
    fn api_response_serialization() {
        let ok: ApiResponse<u32> = ApiResponse::ok(7);
        let json = serde_json::to_string(&ok).unwrap();
        assert_eq!(json, r#"{"success":true,"data":7}"#);

        let err: ApiResponse<u32> = ApiResponse::err("nope");
        let json = serde_json::to_string(&err).unwrap();
        assert_eq!(json, r#"{"success":false,"error":"nope"}"#);
    }

    #[test]
    fn state_response_from_face() {
        let face = WatchFace::load(
            MockSurface::new(),
            MockStore::new(),
            FaceVariant::aviator_24h(),
            CalendarTime::new(6, 0, 0, 30),
        )
        .unwrap();
        let state = FaceStateResponse::from_face(&face);
        assert_eq!(state.face, "aviator-24h");
        assert_eq!(state.hour_deg, Some(90.0));
        assert_eq!(state.date, "30");
        assert_eq!(state.time.as_deref(), Some("06:00:00"));
    }

    #[test]
    fn config_response_per_entry() {
        let now = CalendarTime::new(6, 0, 0, 30);
        let mut face = WatchFace::load(
            MockSurface::new(),
            MockStore::new(),
            FaceVariant::aviator_24h(),
            now,
        )
        .unwrap();
        let message = InboundMessage::new()
            .with_entry(99, "on")
            .with_entry(1, "on");
        let response = ConfigResponse::apply(&mut face, &message, now);
        assert_eq!(response.entries.len(), 2);
        assert_eq!(response.entries[0].status, "rejected");
        assert_eq!(response.entries[1].status, "applied");
        assert!(response.entries[1].rebuilt);
        assert_eq!(response.applied(), 1);
    }

    #[test]
    fn entries_beyond_capacity_dropped() {
        let entries: Vec<_> = (0..20)
            .map(|key| MessageEntryRequest {
                key,
                value: "on".into(),
            })
            .collect();
        assert_eq!(
            message_from_entries(&entries).len(),
            crate::messages::MAX_ENTRIES
        );
    }
}
