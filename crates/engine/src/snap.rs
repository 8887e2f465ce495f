//! Screen-space snapping to vertices and edge midpoints.

use glam::DVec3;
use kurbo::Point;

use crate::config::ToolSettings;
use crate::mesh::MeshEdit;
use crate::project::Projector;

/// What the pointer snapped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapKind {
    Vertex,
    Midpoint,
}

impl SnapKind {
    pub fn label(self) -> &'static str {
        match self {
            SnapKind::Vertex => "Vertex",
            SnapKind::Midpoint => "Midpoint",
        }
    }
}

/// An active snap: kind plus the snapped-to world point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapHit {
    pub kind: SnapKind,
    pub world: DVec3,
}

/// Status label for an optional snap.
pub fn snap_label(snap: Option<&SnapHit>) -> &'static str {
    match snap {
        Some(hit) => hit.kind.label(),
        None => "None",
    }
}

/// Find the snap target nearest the pointer, if any is inside the snap
/// radius.
///
/// Vertices strictly dominate midpoints: when any vertex is in range, edge
/// midpoints are not considered at all. Hidden geometry and unprojectable
/// candidates are skipped; ties in distance go to the first candidate in
/// mesh iteration order.
pub fn find_snap_point(
    pointer: Point,
    mesh: &dyn MeshEdit,
    projector: &dyn Projector,
    settings: &ToolSettings,
) -> Option<SnapHit> {
    let radius_sq = settings.snap_radius_px * settings.snap_radius_px;

    let mut best_dist_sq = radius_sq;
    let mut best_vertex: Option<DVec3> = None;
    for v in mesh.vertices() {
        if v.hidden {
            continue;
        }
        let Some(screen) = projector.world_to_screen(v.world) else {
            continue;
        };
        let dist_sq = (pointer - screen).hypot2();
        if dist_sq < best_dist_sq {
            best_dist_sq = dist_sq;
            best_vertex = Some(v.world);
        }
    }
    if let Some(world) = best_vertex {
        return Some(SnapHit {
            kind: SnapKind::Vertex,
            world,
        });
    }

    let mut best_dist_sq = radius_sq;
    let mut best_midpoint: Option<DVec3> = None;
    for e in mesh.edges() {
        if e.hidden {
            continue;
        }
        let midpoint = e.midpoint();
        let Some(screen) = projector.world_to_screen(midpoint) else {
            continue;
        };
        let dist_sq = (pointer - screen).hypot2();
        if dist_sq < best_dist_sq {
            best_dist_sq = dist_sq;
            best_midpoint = Some(midpoint);
        }
    }
    best_midpoint.map(|world| SnapHit {
        kind: SnapKind::Midpoint,
        world,
    })
}
