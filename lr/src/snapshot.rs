//! Baseline snapshot store
//!
//! A [`BaselineSnapshot`] is the reference state captured when a stage is
//! set up. Validators measure change against it. Capturing copies every
//! value out of the host; nothing aliases host storage.

use glam::Vec3;
use serde::Serialize;
use tracing::debug;

use crate::catalog::{self, StageKey};
use crate::host::{Host, HostResult, Transform};

/// Reference values captured at stage setup
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BaselineSnapshot {
    /// Stage the snapshot was captured for
    pub key: StageKey,
    pub position: Vec3,
    /// Euler rotation in radians
    pub rotation: Vec3,
    pub scale: Vec3,
    pub view_location: Vec3,
    pub view_distance: f32,
    pub vertex_count: usize,
    pub edge_count: usize,
    pub face_count: usize,
    /// Per-vertex positions by mesh index; only captured for sculpt stages.
    /// Index `i` is assumed to be the same vertex in the live mesh.
    #[serde(skip)]
    pub vertex_positions: Vec<Vec3>,
}

impl Default for BaselineSnapshot {
    fn default() -> Self {
        let transform = Transform::default();
        Self {
            key: StageKey::FIRST,
            position: transform.location,
            rotation: transform.rotation,
            scale: transform.scale,
            view_location: Vec3::ZERO,
            view_distance: 0.0,
            vertex_count: 0,
            edge_count: 0,
            face_count: 0,
            vertex_positions: Vec::new(),
        }
    }
}

impl BaselineSnapshot {
    /// Whether deformation can be measured against this snapshot
    pub fn has_vertex_baseline(&self) -> bool {
        !self.vertex_positions.is_empty()
    }
}

/// Read the live host state once and copy it into a new snapshot
///
/// Missing facilities leave their fields at the default: no active object
/// keeps the identity transform and zero counts, no 3D view keeps a zero
/// view baseline. An empty mesh yields an empty vertex baseline.
pub fn capture(key: StageKey, host: &dyn Host) -> HostResult<BaselineSnapshot> {
    debug!(%key, "capture: called");
    let mut snapshot = BaselineSnapshot {
        key,
        ..BaselineSnapshot::default()
    };

    if let Some(view) = host.view_state()? {
        snapshot.view_location = view.location;
        snapshot.view_distance = view.distance;
    } else {
        debug!(%key, "capture: no 3D view, view baseline left at default");
    }

    let Some(object) = host.active_object()? else {
        debug!(%key, "capture: no active object, object baseline left at default");
        return Ok(snapshot);
    };

    snapshot.position = object.transform.location;
    snapshot.rotation = object.transform.rotation;
    snapshot.scale = object.transform.scale;

    if let Some(topology) = host.mesh_topology(&object.name)? {
        snapshot.vertex_count = topology.vertices;
        snapshot.edge_count = topology.edges;
        snapshot.face_count = topology.faces;
    }

    if catalog::captures_vertices(key) {
        snapshot.vertex_positions = host.vertex_positions(&object.name)?;
        debug!(
            %key,
            object = %object.name,
            vertices = snapshot.vertex_positions.len(),
            "capture: stored vertex positions"
        );
    }

    Ok(snapshot)
}
