//! Map reconciliation: keep the drawn overlays in step with the store.
//!
//! The strategy is full-replace on every snapshot: remove everything
//! previously drawn for the fleet, then redraw from the current records.
//! Snapshot cadence is low relative to render cost, so the simplicity wins;
//! the cost is that marker identity (open popups) is not preserved across
//! updates, which is accepted behavior rather than a bug.

use thiserror::Error;

use crate::models::Geofence;
use crate::scene;
use crate::store::ViewStateStore;
use crate::surface::{MapSurface, SurfaceOp};

#[derive(Debug, Error)]
#[error("unknown base layer: {0}")]
pub struct UnknownLayer(pub String);

/// Tracks what is currently drawn and issues add/remove ops against a
/// `MapSurface`. Holds overlay ids only, never records.
#[derive(Debug)]
pub struct MapReconciler {
    layer_set: Vec<String>,
    active_layer: String,
    show_paths: bool,
    drawn_markers: Vec<String>,
    drawn_paths: Vec<String>,
    drawn_waypoints: Vec<String>,
    drawn_fences: Vec<String>,
}

impl MapReconciler {
    pub fn new(
        layer_set: Vec<String>,
        default_layer: &str,
        show_paths: bool,
    ) -> Result<Self, UnknownLayer> {
        if !layer_set.iter().any(|l| l == default_layer) {
            return Err(UnknownLayer(default_layer.to_string()));
        }
        Ok(Self {
            layer_set,
            active_layer: default_layer.to_string(),
            show_paths,
            drawn_markers: Vec::new(),
            drawn_paths: Vec::new(),
            drawn_waypoints: Vec::new(),
            drawn_fences: Vec::new(),
        })
    }

    pub fn active_layer(&self) -> &str {
        &self.active_layer
    }

    pub fn show_paths(&self) -> bool {
        self.show_paths
    }

    /// Emit the initial base layer to a freshly attached surface.
    pub fn activate(&self, surface: &mut dyn MapSurface) {
        surface.apply(SurfaceOp::SetBaseLayer {
            name: self.active_layer.clone(),
        });
    }

    /// Full-replace pass: clear all fleet overlays, then redraw the current
    /// record set. After this returns, every id has at most one marker, one
    /// path and one waypoint set, and removed UAVs leave nothing behind.
    pub fn reconcile(&mut self, store: &ViewStateStore, surface: &mut dyn MapSurface) {
        self.clear_fleet_overlays(surface);

        let scene = scene::build(store.iter(), self.show_paths);

        for marker in scene.markers {
            self.drawn_markers.push(marker.id.clone());
            surface.apply(SurfaceOp::AddMarker(marker));
        }
        for path in scene.paths {
            self.drawn_paths.push(path.id.clone());
            surface.apply(SurfaceOp::AddPath(path));
        }
        for waypoint in scene.waypoints {
            self.drawn_waypoints.push(waypoint.id.clone());
            surface.apply(SurfaceOp::AddWaypoint(waypoint));
        }
    }

    /// Toggle path polylines. Turning them off removes drawn paths right
    /// away; turning them on takes effect on the next reconcile pass.
    pub fn set_show_paths(&mut self, show_paths: bool, surface: &mut dyn MapSurface) {
        self.show_paths = show_paths;
        if !show_paths {
            for id in self.drawn_paths.drain(..) {
                surface.apply(SurfaceOp::RemovePath { id });
            }
        }
    }

    /// Switch the active tile layer. The swap is one atomic op, so exactly
    /// one layer is attached at every instant.
    pub fn set_base_layer(
        &mut self,
        name: &str,
        surface: &mut dyn MapSurface,
    ) -> Result<(), UnknownLayer> {
        if !self.layer_set.iter().any(|l| l == name) {
            return Err(UnknownLayer(name.to_string()));
        }
        if name != self.active_layer {
            self.active_layer = name.to_string();
            surface.apply(SurfaceOp::SetBaseLayer {
                name: self.active_layer.clone(),
            });
        }
        Ok(())
    }

    /// Replace all geofence polygons with the new set.
    pub fn set_geofences(&mut self, fences: &[Geofence], surface: &mut dyn MapSurface) {
        for id in self.drawn_fences.drain(..) {
            surface.apply(SurfaceOp::RemoveFence { id });
        }
        for fence in scene::build_fences(fences) {
            self.drawn_fences.push(fence.id.clone());
            surface.apply(SurfaceOp::AddFence(fence));
        }
    }

    fn clear_fleet_overlays(&mut self, surface: &mut dyn MapSurface) {
        for id in self.drawn_markers.drain(..) {
            surface.apply(SurfaceOp::RemoveMarker { id });
        }
        for id in self.drawn_paths.drain(..) {
            surface.apply(SurfaceOp::RemovePath { id });
        }
        for id in self.drawn_waypoints.drain(..) {
            surface.apply(SurfaceOp::RemoveWaypoint { id });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MissionStatus, UavRecord, UavType};
    use crate::surface::RecordingSurface;

    fn layers() -> Vec<String> {
        vec![
            "satellite".to_string(),
            "terrain".to_string(),
            "street".to_string(),
        ]
    }

    fn record(id: &str) -> UavRecord {
        UavRecord {
            id: id.to_string(),
            uav_type: UavType::Quadcopter,
            model: None,
            lat: 12.84,
            lon: 80.15,
            altitude: 120.0,
            speed: 10.0,
            heading: 0.0,
            battery_level: 80.0,
            fuel_level: None,
            mission_status: MissionStatus::EnRoute,
            paused: false,
            threat_level: None,
            path_history: vec![[12.84, 80.15], [12.85, 80.16]],
            waypoints: vec![[12.9, 80.1]],
            current_waypoint: 0,
            home_lat: 12.84,
            home_lon: 80.15,
        }
    }

    fn setup() -> (MapReconciler, RecordingSurface, ViewStateStore) {
        let mut surface = RecordingSurface::new();
        let reconciler = MapReconciler::new(layers(), "satellite", true).unwrap();
        reconciler.activate(&mut surface);
        (reconciler, surface, ViewStateStore::new())
    }

    #[test]
    fn removed_uav_leaves_no_orphaned_overlays() {
        let (mut reconciler, mut surface, mut store) = setup();

        store.replace_all(vec![record("A"), record("B")]);
        reconciler.reconcile(&store, &mut surface);
        assert_eq!(surface.marker_ids().len(), 2);

        store.replace_all(vec![record("B")]);
        reconciler.reconcile(&store, &mut surface);

        assert_eq!(surface.marker_ids().len(), 1);
        assert!(surface.marker_ids().contains("B"));
        assert!(!surface.marker_ids().contains("A"));
        assert_eq!(surface.path_ids().len(), 1);
        assert_eq!(surface.waypoint_ids().len(), 1);
        assert!(surface.waypoint_ids().contains("B/wp1"));
    }

    #[test]
    fn repeated_snapshot_never_duplicates_overlays() {
        let (mut reconciler, mut surface, mut store) = setup();

        store.replace_all(vec![record("A")]);
        reconciler.reconcile(&store, &mut surface);
        reconciler.reconcile(&store, &mut surface);

        assert_eq!(surface.marker_ids().len(), 1);
        assert_eq!(surface.path_ids().len(), 1);
        assert_eq!(surface.waypoint_ids().len(), 1);
    }

    #[test]
    fn base_layer_switch_keeps_exactly_one_attached() {
        let (mut reconciler, mut surface, _store) = setup();
        assert_eq!(surface.base_layer(), Some("satellite"));

        reconciler.set_base_layer("terrain", &mut surface).unwrap();
        assert_eq!(surface.base_layer(), Some("terrain"));
        assert_eq!(reconciler.active_layer(), "terrain");

        // Every instant of the op stream has one layer: swaps are atomic.
        let layer_ops = surface
            .ops()
            .iter()
            .filter(|op| matches!(op, SurfaceOp::SetBaseLayer { .. }))
            .count();
        assert_eq!(layer_ops, 2);
    }

    #[test]
    fn unknown_layer_is_rejected_and_state_unchanged() {
        let (mut reconciler, mut surface, _store) = setup();
        assert!(reconciler.set_base_layer("sonar", &mut surface).is_err());
        assert_eq!(reconciler.active_layer(), "satellite");
        assert_eq!(surface.base_layer(), Some("satellite"));
    }

    #[test]
    fn hiding_paths_removes_them_immediately() {
        let (mut reconciler, mut surface, mut store) = setup();
        store.replace_all(vec![record("A")]);
        reconciler.reconcile(&store, &mut surface);
        assert_eq!(surface.path_ids().len(), 1);

        reconciler.set_show_paths(false, &mut surface);
        assert!(surface.path_ids().is_empty());

        // Still hidden on the next pass.
        reconciler.reconcile(&store, &mut surface);
        assert!(surface.path_ids().is_empty());

        // Re-enabled paths come back with the next snapshot.
        reconciler.set_show_paths(true, &mut surface);
        reconciler.reconcile(&store, &mut surface);
        assert_eq!(surface.path_ids().len(), 1);
    }

    #[test]
    fn geofence_set_is_replaced_wholesale() {
        let (mut reconciler, mut surface, _store) = setup();

        let fence = |id: &str| Geofence {
            id: id.to_string(),
            name: format!("Zone {id}"),
            coordinates: vec![[12.84, 80.15], [12.85, 80.15], [12.85, 80.16]],
            color: "red".to_string(),
        };

        reconciler.set_geofences(&[fence("NFZ-001"), fence("NFZ-002")], &mut surface);
        assert_eq!(surface.fence_ids().len(), 2);

        reconciler.set_geofences(&[fence("NFZ-003")], &mut surface);
        assert_eq!(surface.fence_ids().len(), 1);
        assert!(surface.fence_ids().contains("NFZ-003"));
    }
}
