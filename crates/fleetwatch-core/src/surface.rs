//! The boundary to the actual drawing surface.
//!
//! The console never touches map internals; it emits `SurfaceOp`s and the
//! attached surface (an operator screen, or a recording double in tests)
//! applies them.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::scene::{FenceSpec, MarkerSpec, PathSpec, WaypointSpec};

/// One drawing instruction. `SetBaseLayer` swaps the tile layer atomically,
/// so the surface is never without a base layer and never has two.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum SurfaceOp {
    AddMarker(MarkerSpec),
    RemoveMarker { id: String },
    AddPath(PathSpec),
    RemovePath { id: String },
    AddWaypoint(WaypointSpec),
    RemoveWaypoint { id: String },
    AddFence(FenceSpec),
    RemoveFence { id: String },
    SetBaseLayer { name: String },
}

/// Anything that can consume drawing instructions.
pub trait MapSurface {
    fn apply(&mut self, op: SurfaceOp);
}

/// In-memory surface that tracks exactly what is drawn. Used by tests and
/// by headless runs; also a reference for what a real screen must maintain.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    markers: BTreeSet<String>,
    paths: BTreeSet<String>,
    waypoints: BTreeSet<String>,
    fences: BTreeSet<String>,
    base_layer: Option<String>,
    ops: Vec<SurfaceOp>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn marker_ids(&self) -> &BTreeSet<String> {
        &self.markers
    }

    pub fn path_ids(&self) -> &BTreeSet<String> {
        &self.paths
    }

    pub fn waypoint_ids(&self) -> &BTreeSet<String> {
        &self.waypoints
    }

    pub fn fence_ids(&self) -> &BTreeSet<String> {
        &self.fences
    }

    pub fn base_layer(&self) -> Option<&str> {
        self.base_layer.as_deref()
    }

    /// Every op applied so far, in order.
    pub fn ops(&self) -> &[SurfaceOp] {
        &self.ops
    }
}

impl MapSurface for RecordingSurface {
    fn apply(&mut self, op: SurfaceOp) {
        match &op {
            SurfaceOp::AddMarker(spec) => {
                self.markers.insert(spec.id.clone());
            }
            SurfaceOp::RemoveMarker { id } => {
                self.markers.remove(id);
            }
            SurfaceOp::AddPath(spec) => {
                self.paths.insert(spec.id.clone());
            }
            SurfaceOp::RemovePath { id } => {
                self.paths.remove(id);
            }
            SurfaceOp::AddWaypoint(spec) => {
                self.waypoints.insert(spec.id.clone());
            }
            SurfaceOp::RemoveWaypoint { id } => {
                self.waypoints.remove(id);
            }
            SurfaceOp::AddFence(spec) => {
                self.fences.insert(spec.id.clone());
            }
            SurfaceOp::RemoveFence { id } => {
                self.fences.remove(id);
            }
            SurfaceOp::SetBaseLayer { name } => {
                self.base_layer = Some(name.clone());
            }
        }
        self.ops.push(op);
    }
}
