//! Desired-overlay computation.
//!
//! `build` turns the current record set into the overlays that should exist
//! on the map. It is a pure projection; the reconciler owns the diffing
//! against what is actually drawn.

use serde::Serialize;

use crate::models::{Geofence, MissionStatus, UavRecord, UavType};
use crate::styling::{battery_class, threat_class, uav_color, BatteryClass};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerSymbol {
    Quadcopter,
    FixedWing,
}

/// Telemetry summary embedded in a marker popup.
#[derive(Debug, Clone, Serialize)]
pub struct MarkerPopup {
    pub id: String,
    pub model: String,
    pub altitude: f64,
    pub speed: f64,
    pub heading: f64,
    pub battery_level: f64,
    pub battery_class: BatteryClass,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threat_class: Option<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MarkerSpec {
    /// Overlay id, equal to the UAV id.
    pub id: String,
    pub lat: f64,
    pub lon: f64,
    pub color: &'static str,
    pub symbol: MarkerSymbol,
    pub heading: f64,
    pub popup: MarkerPopup,
}

#[derive(Debug, Clone, Serialize)]
pub struct PathSpec {
    /// Overlay id, equal to the UAV id.
    pub id: String,
    pub points: Vec<[f64; 2]>,
    pub color: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct WaypointSpec {
    /// Overlay id, `"{uav}/wp{n}"` with a 1-based n.
    pub id: String,
    pub uav_id: String,
    pub lat: f64,
    pub lon: f64,
    /// 1-based label painted on the marker.
    pub label: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct FenceSpec {
    pub id: String,
    pub name: String,
    pub coordinates: Vec<[f64; 2]>,
    pub color: String,
}

/// Everything the map should currently show for the fleet.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Scene {
    pub markers: Vec<MarkerSpec>,
    pub paths: Vec<PathSpec>,
    pub waypoints: Vec<WaypointSpec>,
}

/// Compute the desired overlays for the given records.
///
/// Per record: one marker, a path polyline when `show_paths` is set and the
/// trail has at least two points, and numbered waypoint markers only while
/// the mission is en route.
pub fn build<'a>(records: impl Iterator<Item = &'a UavRecord>, show_paths: bool) -> Scene {
    let mut scene = Scene::default();

    for record in records {
        let color = uav_color(record);

        scene.markers.push(MarkerSpec {
            id: record.id.clone(),
            lat: record.lat,
            lon: record.lon,
            color,
            symbol: match record.uav_type {
                UavType::Quadcopter => MarkerSymbol::Quadcopter,
                UavType::FixedWing => MarkerSymbol::FixedWing,
            },
            heading: record.heading,
            popup: MarkerPopup {
                id: record.id.clone(),
                model: record.model_label(),
                altitude: record.altitude,
                speed: record.speed,
                heading: record.heading,
                battery_level: record.battery_level,
                battery_class: battery_class(record.battery_level),
                status: record.mission_status.label(),
                threat_class: threat_class(record),
            },
        });

        if show_paths && record.path_history.len() >= 2 {
            scene.paths.push(PathSpec {
                id: record.id.clone(),
                points: record.path_history.clone(),
                color,
            });
        }

        if record.mission_status == MissionStatus::EnRoute && !record.waypoints.is_empty() {
            for (i, wp) in record.waypoints.iter().enumerate() {
                scene.waypoints.push(WaypointSpec {
                    id: format!("{}/wp{}", record.id, i + 1),
                    uav_id: record.id.clone(),
                    lat: wp[0],
                    lon: wp[1],
                    label: i + 1,
                });
            }
        }
    }

    scene
}

/// Desired geofence overlays; a direct projection since geofence events
/// already arrive as the full set.
pub fn build_fences(fences: &[Geofence]) -> Vec<FenceSpec> {
    fences
        .iter()
        .map(|fence| FenceSpec {
            id: fence.id.clone(),
            name: fence.name.clone(),
            coordinates: fence.coordinates.clone(),
            color: fence.color.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str) -> UavRecord {
        UavRecord {
            id: id.to_string(),
            uav_type: UavType::Quadcopter,
            model: None,
            lat: 12.84,
            lon: 80.15,
            altitude: 120.0,
            speed: 10.0,
            heading: 45.0,
            battery_level: 80.0,
            fuel_level: None,
            mission_status: MissionStatus::Idle,
            paused: false,
            threat_level: None,
            path_history: Vec::new(),
            waypoints: Vec::new(),
            current_waypoint: 0,
            home_lat: 12.84,
            home_lon: 80.15,
        }
    }

    #[test]
    fn idle_low_battery_record_yields_marker_only() {
        let mut r = record("A");
        r.battery_level = 15.0;

        let scene = build(std::iter::once(&r), true);
        assert_eq!(scene.markers.len(), 1);
        assert!(scene.paths.is_empty());
        assert!(scene.waypoints.is_empty());
        assert_eq!(scene.markers[0].color, crate::styling::COLOR_ALERT_RED);
    }

    #[test]
    fn single_point_history_draws_no_path() {
        let mut r = record("A");
        r.path_history = vec![[12.84, 80.15]];
        let scene = build(std::iter::once(&r), true);
        assert!(scene.paths.is_empty());
    }

    #[test]
    fn two_point_history_draws_path_unless_hidden() {
        let mut r = record("A");
        r.path_history = vec![[12.84, 80.15], [12.85, 80.16]];

        let shown = build(std::iter::once(&r), true);
        assert_eq!(shown.paths.len(), 1);

        let hidden = build(std::iter::once(&r), false);
        assert!(hidden.paths.is_empty());
    }

    #[test]
    fn waypoints_only_while_en_route_with_one_based_labels() {
        let mut r = record("A");
        r.waypoints = vec![[12.9, 80.1], [12.91, 80.11]];

        let idle = build(std::iter::once(&r), true);
        assert!(idle.waypoints.is_empty());

        r.mission_status = MissionStatus::EnRoute;
        let en_route = build(std::iter::once(&r), true);
        assert_eq!(en_route.waypoints.len(), 2);
        assert_eq!(en_route.waypoints[0].label, 1);
        assert_eq!(en_route.waypoints[0].id, "A/wp1");
        assert_eq!(en_route.waypoints[1].label, 2);
    }
}
