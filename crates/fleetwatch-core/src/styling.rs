//! Pure display derivations.
//!
//! These functions are the only source of marker/card styling; they depend on
//! nothing but the record, so identical input always yields identical output.

use crate::models::{MissionStatus, ThreatLevel, UavRecord, UavType};

pub const COLOR_ALERT_RED: &str = "#dc3545";
pub const COLOR_CAUTION_ORANGE: &str = "#fd7e14";
pub const COLOR_QUADCOPTER: &str = "#0dcaf0";
pub const COLOR_FIXED_WING: &str = "#198754";

/// Battery styling bucket with the 20/50 percent boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BatteryClass {
    Low,
    Medium,
    Normal,
}

impl BatteryClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            BatteryClass::Low => "low",
            BatteryClass::Medium => "medium",
            BatteryClass::Normal => "normal",
        }
    }
}

/// `< 20` is low, `< 50` is medium, everything else normal.
pub fn battery_class(level: f64) -> BatteryClass {
    if level < 20.0 {
        BatteryClass::Low
    } else if level < 50.0 {
        BatteryClass::Medium
    } else {
        BatteryClass::Normal
    }
}

/// Marker/path color for a record. Rules are evaluated in priority order and
/// the first match wins: emergency, paused, low battery, medium battery,
/// then the airframe default.
pub fn uav_color(record: &UavRecord) -> &'static str {
    if record.mission_status == MissionStatus::Emergency {
        return COLOR_ALERT_RED;
    }
    if record.paused {
        return COLOR_CAUTION_ORANGE;
    }
    if record.battery_level < 20.0 {
        return COLOR_ALERT_RED;
    }
    if record.battery_level < 50.0 {
        return COLOR_CAUTION_ORANGE;
    }
    match record.uav_type {
        UavType::Quadcopter => COLOR_QUADCOPTER,
        UavType::FixedWing => COLOR_FIXED_WING,
    }
}

/// CSS-style class for the threat badge on military-profile screens.
/// Absent threat data means no badge, never a default badge.
pub fn threat_class(record: &UavRecord) -> Option<&'static str> {
    match record.threat_level? {
        ThreatLevel::Green => Some("threat-green"),
        ThreatLevel::Yellow => Some("threat-yellow"),
        ThreatLevel::Red => Some("threat-red"),
    }
}
