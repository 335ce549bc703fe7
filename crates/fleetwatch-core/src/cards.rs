//! Card and detail-view projections for the UAV list panel.
//!
//! Pure view models only; the screen decides markup. Card clicks and the
//! three control buttons arrive as distinct operator actions, so a control
//! press can never double as a detail-view open.

use serde::Serialize;

use crate::models::{ThreatLevel, UavRecord};
use crate::store::ViewStateStore;
use crate::styling::{battery_class, BatteryClass};

/// Summary card, one per record in snapshot order.
#[derive(Debug, Clone, Serialize)]
pub struct UavCard {
    pub id: String,
    pub model: String,
    pub altitude: f64,
    pub speed: f64,
    pub heading: f64,
    pub battery_level: f64,
    pub battery_class: BatteryClass,
    pub status: &'static str,
    /// Drives the pause/resume control label.
    pub paused: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threat_level: Option<ThreatLevel>,
}

/// Full record view opened from a card or marker click.
#[derive(Debug, Clone, Serialize)]
pub struct UavDetail {
    pub id: String,
    pub model: String,
    pub uav_type: crate::models::UavType,
    pub lat: f64,
    pub lon: f64,
    pub altitude: f64,
    pub speed: f64,
    pub heading: f64,
    pub battery_level: f64,
    pub battery_class: BatteryClass,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fuel_level: Option<f64>,
    pub status: &'static str,
    pub paused: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threat_level: Option<ThreatLevel>,
    pub home_lat: f64,
    pub home_lon: f64,
    pub waypoint_count: usize,
    /// 1-based for display; the record stores a 0-based index.
    pub current_waypoint_display: usize,
}

pub fn project(store: &ViewStateStore) -> Vec<UavCard> {
    store.iter().map(card).collect()
}

pub fn card(record: &UavRecord) -> UavCard {
    UavCard {
        id: record.id.clone(),
        model: record.model_label(),
        altitude: record.altitude,
        speed: record.speed,
        heading: record.heading,
        battery_level: record.battery_level,
        battery_class: battery_class(record.battery_level),
        status: record.mission_status.label(),
        paused: record.paused,
        threat_level: record.threat_level,
    }
}

pub fn detail(record: &UavRecord) -> UavDetail {
    UavDetail {
        id: record.id.clone(),
        model: record.model_label(),
        uav_type: record.uav_type,
        lat: record.lat,
        lon: record.lon,
        altitude: record.altitude,
        speed: record.speed,
        heading: record.heading,
        battery_level: record.battery_level,
        battery_class: battery_class(record.battery_level),
        fuel_level: record.fuel_level,
        status: record.mission_status.label(),
        paused: record.paused,
        threat_level: record.threat_level,
        home_lat: record.home_lat,
        home_lon: record.home_lon,
        waypoint_count: record.waypoints.len(),
        current_waypoint_display: record.current_waypoint + 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MissionStatus, UavType};

    fn record(id: &str) -> UavRecord {
        UavRecord {
            id: id.to_string(),
            uav_type: UavType::FixedWing,
            model: Some("MQ-9 Reaper".to_string()),
            lat: 12.84,
            lon: 80.15,
            altitude: 1500.0,
            speed: 90.0,
            heading: 270.0,
            battery_level: 45.0,
            fuel_level: Some(70.0),
            mission_status: MissionStatus::EnRoute,
            paused: false,
            threat_level: None,
            path_history: Vec::new(),
            waypoints: vec![[12.9, 80.1], [12.91, 80.11], [12.92, 80.12]],
            current_waypoint: 1,
            home_lat: 12.84,
            home_lon: 80.15,
        }
    }

    #[test]
    fn cards_follow_snapshot_order() {
        let mut store = ViewStateStore::new();
        store.replace_all(vec![record("REAPER-01"), record("SHADOW-06")]);
        let cards = project(&store);
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].id, "REAPER-01");
        assert_eq!(cards[1].id, "SHADOW-06");
        assert_eq!(cards[0].battery_class, BatteryClass::Medium);
        assert_eq!(cards[0].model, "MQ-9 Reaper");
    }

    #[test]
    fn detail_displays_one_based_waypoint_index() {
        let d = detail(&record("REAPER-01"));
        assert_eq!(d.waypoint_count, 3);
        assert_eq!(d.current_waypoint_display, 2);
        assert_eq!(d.home_lat, 12.84);
    }

    #[test]
    fn missing_model_falls_back_to_type_label() {
        let mut r = record("WASP-04");
        r.model = None;
        assert_eq!(card(&r).model, "FIXED WING");
    }
}
