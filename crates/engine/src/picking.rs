//! Screen-space edge picking shared by both trim phases.

use glam::DVec3;
use kurbo::Point;

use crate::config::ToolSettings;
use crate::geometry::{closest_point_on_screen_segment, closest_point_on_segment};
use crate::mesh::{EdgeRef, MeshEdit};
use crate::project::Projector;

/// A picked edge plus the 3D location standing in for the click.
#[derive(Debug, Clone, Copy)]
pub struct EdgePick {
    pub edge: EdgeRef,
    /// Point on the picked edge nearest the pick ray origin; used by the
    /// directional delete to decide which side of a split goes away.
    pub world: DVec3,
}

/// Pick the visible edge whose screen-space segment passes nearest the
/// pointer, within the pick radius.
///
/// Edges with either endpoint unprojectable are skipped; ties in distance
/// go to the first edge in mesh iteration order.
pub fn pick_edge(
    pointer: Point,
    mesh: &dyn MeshEdit,
    projector: &dyn Projector,
    settings: &ToolSettings,
) -> Option<EdgePick> {
    let radius_sq = settings.pick_radius_px * settings.pick_radius_px;

    let mut best_dist_sq = f64::INFINITY;
    let mut best_edge: Option<EdgeRef> = None;

    for edge in mesh.edges() {
        if edge.hidden {
            continue;
        }
        let Some(a_screen) = projector.world_to_screen(edge.a) else {
            continue;
        };
        let Some(b_screen) = projector.world_to_screen(edge.b) else {
            continue;
        };

        let closest = closest_point_on_screen_segment(pointer, a_screen, b_screen);
        let dist_sq = (closest - pointer).hypot2();
        if dist_sq < best_dist_sq && dist_sq < radius_sq {
            best_dist_sq = dist_sq;
            best_edge = Some(edge);
        }
    }

    let edge = best_edge?;
    let ray = projector.screen_to_ray(pointer);
    let world = closest_point_on_segment(ray.origin, edge.a, edge.b);
    Some(EdgePick { edge, world })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{add_edge, fake_mesh};
    use crate::harness::FakeProjector;

    fn settings() -> ToolSettings {
        ToolSettings::default()
    }

    #[test]
    fn test_picks_edge_under_pointer() {
        let mut mesh = fake_mesh();
        let (_, _, e1) = add_edge(&mut mesh, [0.0, 0.0, 0.0], [100.0, 0.0, 0.0]);
        add_edge(&mut mesh, [0.0, 50.0, 0.0], [100.0, 50.0, 0.0]);
        let proj = FakeProjector::default();

        let pick = pick_edge(Point::new(40.0, 3.0), &mesh, &proj, &settings()).unwrap();
        assert_eq!(pick.edge.id, e1);
    }

    #[test]
    fn test_nothing_outside_radius() {
        let mut mesh = fake_mesh();
        add_edge(&mut mesh, [0.0, 0.0, 0.0], [100.0, 0.0, 0.0]);
        let proj = FakeProjector::default();

        assert!(pick_edge(Point::new(40.0, 15.0), &mesh, &proj, &settings()).is_none());
    }

    #[test]
    fn test_hidden_edges_skipped() {
        let mut mesh = fake_mesh();
        let (_, _, e) = add_edge(&mut mesh, [0.0, 0.0, 0.0], [100.0, 0.0, 0.0]);
        mesh.set_edge_hidden(e, true);
        let proj = FakeProjector::default();

        assert!(pick_edge(Point::new(40.0, 0.0), &mesh, &proj, &settings()).is_none());
    }

    #[test]
    fn test_tie_goes_to_first_edge() {
        let mut mesh = fake_mesh();
        let (_, _, first) = add_edge(&mut mesh, [0.0, 2.0, 0.0], [100.0, 2.0, 0.0]);
        add_edge(&mut mesh, [0.0, -2.0, 0.0], [100.0, -2.0, 0.0]);
        let proj = FakeProjector::default();

        let pick = pick_edge(Point::new(50.0, 0.0), &mesh, &proj, &settings()).unwrap();
        assert_eq!(pick.edge.id, first);
    }

    #[test]
    fn test_pick_world_point_tracks_ray_origin() {
        let mut mesh = fake_mesh();
        add_edge(&mut mesh, [0.0, 0.0, 0.0], [100.0, 0.0, 0.0]);
        let proj = FakeProjector::default();

        let pick = pick_edge(Point::new(70.0, 4.0), &mesh, &proj, &settings()).unwrap();
        // Ray origin sits above (70, 4); the nearest point on the edge is
        // (70, 0, 0).
        assert!(pick.world.distance(DVec3::new(70.0, 0.0, 0.0)) < 1e-9);
    }
}
