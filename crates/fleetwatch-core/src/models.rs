//! Data model for the fleetwatch console.
//!
//! Everything here mirrors the backend wire format. A fleet snapshot replaces
//! each record wholesale, so none of these types carry partial-update logic.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Airframe type, drives the marker symbol and default color.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UavType {
    #[default]
    Quadcopter,
    FixedWing,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissionStatus {
    #[default]
    Idle,
    EnRoute,
    Loitering,
    Returning,
    Emergency,
    Paused,
    Rtb,
}

impl MissionStatus {
    /// Display form used on cards and popups ("EN ROUTE").
    pub fn label(&self) -> &'static str {
        match self {
            MissionStatus::Idle => "IDLE",
            MissionStatus::EnRoute => "EN ROUTE",
            MissionStatus::Loitering => "LOITERING",
            MissionStatus::Returning => "RETURNING",
            MissionStatus::Emergency => "EMERGENCY",
            MissionStatus::Paused => "PAUSED",
            MissionStatus::Rtb => "RTB",
        }
    }
}

/// Classification attribute carried by the military deployment profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThreatLevel {
    Green,
    Yellow,
    Red,
}

/// Last-known telemetry for one aircraft, replaced on every snapshot.
///
/// Optional and collection fields default on decode so a record missing e.g.
/// `waypoints` still renders; absence means "no data", not an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UavRecord {
    pub id: String,
    #[serde(rename = "type", default)]
    pub uav_type: UavType,
    #[serde(default)]
    pub model: Option<String>,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub altitude: f64,
    #[serde(default)]
    pub speed: f64,
    #[serde(default)]
    pub heading: f64,
    #[serde(default)]
    pub battery_level: f64,
    #[serde(default)]
    pub fuel_level: Option<f64>,
    #[serde(default)]
    pub mission_status: MissionStatus,
    #[serde(default)]
    pub paused: bool,
    #[serde(default)]
    pub threat_level: Option<ThreatLevel>,
    /// Chronological (lat, lon) trail; trimming is the backend's job.
    #[serde(default)]
    pub path_history: Vec<[f64; 2]>,
    /// Index-significant: position in the vector is the waypoint order.
    #[serde(default)]
    pub waypoints: Vec<[f64; 2]>,
    #[serde(default)]
    pub current_waypoint: usize,
    #[serde(default)]
    pub home_lat: f64,
    #[serde(default)]
    pub home_lon: f64,
}

impl UavRecord {
    /// Label shown next to the id: the model string when the backend sends
    /// one, otherwise the airframe type.
    pub fn model_label(&self) -> String {
        match &self.model {
            Some(model) if !model.is_empty() => model.clone(),
            _ => match self.uav_type {
                UavType::Quadcopter => "QUADCOPTER".to_string(),
                UavType::FixedWing => "FIXED WING".to_string(),
            },
        }
    }
}

/// Restricted-airspace polygon, replaced wholesale on each geofence event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Geofence {
    pub id: String,
    pub name: String,
    /// Ordered ring of (lat, lon) vertices.
    pub coordinates: Vec<[f64; 2]>,
    #[serde(default = "default_fence_color")]
    pub color: String,
}

fn default_fence_color() -> String {
    "red".to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Low,
    Medium,
    High,
}

/// Operator-facing alert pushed by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub severity: AlertSeverity,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    /// Alert category as sent on the wire (`geofence_violation`, `low_battery`).
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub uav_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// One line of the mission/event log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub message: String,
    pub level: LogLevel,
}

impl LogEntry {
    pub fn new(message: impl Into<String>, level: LogLevel) -> Self {
        Self {
            timestamp: Utc::now(),
            message: message.into(),
            level,
        }
    }
}

/// Display-only status of one downlinked video feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoFeedStatus {
    pub uav_id: String,
    pub feed_type: String,
    pub status: String,
    #[serde(default)]
    pub quality: Option<String>,
}

/// Operator command verbs accepted by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandVerb {
    /// Toggles pause/resume on the backend side.
    Pause,
    Rtb,
    Kill,
}

impl CommandVerb {
    /// Lowercase wire form (`pause`, `rtb`, `kill`).
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandVerb::Pause => "pause",
            CommandVerb::Rtb => "rtb",
            CommandVerb::Kill => "kill",
        }
    }

    /// Uppercase form used in log lines.
    pub fn label(&self) -> &'static str {
        match self {
            CommandVerb::Pause => "PAUSE",
            CommandVerb::Rtb => "RTB",
            CommandVerb::Kill => "KILL",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_decodes_with_missing_optional_fields() {
        let record: UavRecord = serde_json::from_value(serde_json::json!({
            "id": "RAVEN-03",
            "type": "quadcopter",
            "lat": 12.8406,
            "lon": 80.1530,
        }))
        .expect("minimal record");

        assert!(record.waypoints.is_empty());
        assert!(record.path_history.is_empty());
        assert_eq!(record.mission_status, MissionStatus::Idle);
        assert!(record.threat_level.is_none());
        assert!(!record.paused);
    }

    #[test]
    fn mission_status_uses_snake_case_wire_names() {
        let status: MissionStatus = serde_json::from_str("\"en_route\"").unwrap();
        assert_eq!(status, MissionStatus::EnRoute);
        assert_eq!(status.label(), "EN ROUTE");
    }

    #[test]
    fn verb_forms() {
        assert_eq!(CommandVerb::Kill.as_str(), "kill");
        assert_eq!(CommandVerb::Kill.label(), "KILL");
        assert_eq!(
            serde_json::to_string(&CommandVerb::Rtb).unwrap(),
            "\"rtb\""
        );
    }
}
