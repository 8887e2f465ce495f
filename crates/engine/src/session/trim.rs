//! Interactive edge trimming against a set of cutting edges.

use glam::DVec3;
use kurbo::Point;
use tracing::{debug, info, warn};

use shared::{EdgeId, InputEvent, Key, MouseButton, VertexId};

use super::{EventOutcome, ToolFlow};
use crate::config::ToolSettings;
use crate::geometry::{closest_point_on_segment, projection_factor, Frame};
use crate::mesh::{EdgeRef, MeshEdit};
use crate::picking::pick_edge;
use crate::project::Projector;

/// Phase of the trim tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TrimPhase {
    /// Clicks toggle cutting-edge membership; confirm moves on.
    CollectingCuts,
    /// Clicks trim target edges against the collected cutters.
    TrimmingTargets,
}

/// State machine for the trim tool.
pub struct EdgeTrimSession {
    settings: ToolSettings,
    frame: Frame,
    phase: TrimPhase,
    /// Insertion-ordered so status counts and intersection scans are
    /// deterministic.
    cutting_edges: Vec<EdgeId>,
}

impl EdgeTrimSession {
    pub fn new(mesh: &dyn MeshEdit, settings: ToolSettings) -> Self {
        Self {
            settings,
            frame: Frame::new(mesh.world_matrix()),
            phase: TrimPhase::CollectingCuts,
            cutting_edges: Vec::new(),
        }
    }

    /// Feed one input event through the state machine.
    pub fn handle_event(
        &mut self,
        event: &InputEvent,
        mesh: &mut dyn MeshEdit,
        projector: &dyn Projector,
    ) -> EventOutcome {
        match event {
            InputEvent::Scroll { .. } => EventOutcome::pass_through(),
            InputEvent::ButtonPress {
                button: MouseButton::Middle,
                ..
            } => EventOutcome::pass_through(),

            InputEvent::Cancel
            | InputEvent::KeyPress {
                key: Key::Escape, ..
            } => {
                info!("trim tool cancelled");
                EventOutcome::terminal(ToolFlow::Cancelled, "Trim tool cancelled")
            }

            InputEvent::ButtonPress {
                button: MouseButton::Left,
                screen,
            } => {
                let pointer = Point::new(screen[0], screen[1]);
                match self.phase {
                    TrimPhase::CollectingCuts => self.toggle_cutting_edge(pointer, mesh, projector),
                    TrimPhase::TrimmingTargets => self.trim_at(pointer, mesh, projector),
                }
            }

            InputEvent::ButtonPress {
                button: MouseButton::Right,
                ..
            } => self.confirm_phase(),

            _ => EventOutcome::running(),
        }
    }

    /// Confirm ends the current phase: with no cutters collected there is
    /// nothing to cut with and the session cancels; otherwise collection
    /// hands over to trimming, and trimming finishes.
    fn confirm_phase(&mut self) -> EventOutcome {
        match self.phase {
            TrimPhase::CollectingCuts => {
                if self.cutting_edges.is_empty() {
                    info!("trim tool cancelled: no cutting edges selected");
                    return EventOutcome::terminal(
                        ToolFlow::Cancelled,
                        "No cutting edges selected, trim cancelled",
                    );
                }
                self.phase = TrimPhase::TrimmingTargets;
                info!(cutters = self.cutting_edges.len(), "cutting edges confirmed");
                EventOutcome::running()
                    .with_status("Cutting edges confirmed, select edges to trim")
            }
            TrimPhase::TrimmingTargets => {
                info!("trim tool finished");
                EventOutcome::terminal(ToolFlow::Finished, "Trim tool finished")
            }
        }
    }

    // ── phase 1: collecting cutting edges ─────────────────────

    fn toggle_cutting_edge(
        &mut self,
        pointer: Point,
        mesh: &dyn MeshEdit,
        projector: &dyn Projector,
    ) -> EventOutcome {
        let Some(pick) = pick_edge(pointer, mesh, projector, &self.settings) else {
            return EventOutcome::running().with_status("No edge under pointer");
        };

        let id = pick.edge.id;
        if let Some(pos) = self.cutting_edges.iter().position(|&e| e == id) {
            self.cutting_edges.remove(pos);
            debug!(edge = %id, "cutting edge deselected");
            EventOutcome::running().with_status(format!(
                "Cutting edge {} deselected: {} selected",
                id,
                self.cutting_edges.len()
            ))
        } else {
            self.cutting_edges.push(id);
            debug!(edge = %id, "cutting edge selected");
            EventOutcome::running().with_status(format!(
                "Cutting edge {} selected: {} selected",
                id,
                self.cutting_edges.len()
            ))
        }
    }

    // ── phase 2: trimming targets ─────────────────────────────

    /// Trim the edge under the pointer: intersect it with every cutting
    /// edge, split it at the intersections in spatial order, and delete the
    /// piece nearest the click.
    fn trim_at(
        &mut self,
        pointer: Point,
        mesh: &mut dyn MeshEdit,
        projector: &dyn Projector,
    ) -> EventOutcome {
        let Some(pick) = pick_edge(pointer, mesh, projector, &self.settings) else {
            return EventOutcome::running().with_status("No edge under pointer to trim");
        };
        let target = pick.edge;
        let click_world = pick.world;

        let hits = self.collect_intersections(&target, mesh);
        if hits.is_empty() {
            info!(target = %target.id, "no intersections with cutting edges");
            return EventOutcome::running().with_status("No intersections with cutting edges");
        }

        let cuts = hits.len();
        let subdivision = match mesh.subdivide_edge(target.id, cuts) {
            Ok(s) => s,
            Err(err) => {
                warn!(error = %err, "target edge could not be subdivided");
                return EventOutcome::running().with_status("Edge to trim is no longer valid");
            }
        };

        let solved = self.solve_split_positions(&target, &hits, &subdivision.new_vertices, mesh);

        // Drop cutter handles the subdivision may have invalidated so later
        // targets skip them cleanly.
        self.prune_stale_cutters(mesh);

        if !solved {
            // Safer partial failure: the edge stays subdivided at its
            // straight-line positions and nothing is deleted.
            return EventOutcome::running()
                .with_status("Edge split but intersection positions could not be applied");
        }

        if !self.delete_nearest_segment(&subdivision.new_vertices, click_world, mesh) {
            return EventOutcome::running()
                .with_status("Could not determine which segment to delete");
        }

        EventOutcome::running().with_status("Edge trimmed")
    }

    /// Intersections of the target edge with every cutting edge, ordered by
    /// projection factor along the target.
    fn collect_intersections(
        &self,
        target: &EdgeRef,
        mesh: &dyn MeshEdit,
    ) -> Vec<(f64, DVec3)> {
        let edge_vec = target.b - target.a;
        if edge_vec.length_squared() == 0.0 {
            return Vec::new();
        }

        let mut hits: Vec<(f64, DVec3)> = Vec::new();
        for &cutter_id in &self.cutting_edges {
            if cutter_id == target.id {
                continue;
            }
            let Some(cutter) = mesh.edge_ref(cutter_id) else {
                warn!(edge = %cutter_id, "stale cutting edge skipped");
                continue;
            };
            if let Some(point) = crate::geometry::segment_intersection(
                target.a,
                target.b,
                cutter.a,
                cutter.b,
                self.settings.intersect_epsilon,
            ) {
                let factor = projection_factor(point, target.a, target.b);
                hits.push((factor, point));
            }
        }

        hits.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());
        hits
    }

    /// Match the subdivision's new vertices to the sorted intersection
    /// points and move them there.
    ///
    /// The returned vertex order is implementation-defined, so they are
    /// re-sorted by projection factor along the original edge before being
    /// paired with the (already sorted) intersections. On a count mismatch
    /// the split is kept but no positions are changed.
    fn solve_split_positions(
        &self,
        target: &EdgeRef,
        hits: &[(f64, DVec3)],
        new_vertices: &[VertexId],
        mesh: &mut dyn MeshEdit,
    ) -> bool {
        if new_vertices.len() != hits.len() {
            warn!(
                requested = hits.len(),
                returned = new_vertices.len(),
                "subdivision vertex count mismatch; positions left unsolved"
            );
            return false;
        }

        let mut ordered: Vec<(f64, VertexId)> = Vec::with_capacity(new_vertices.len());
        for &v in new_vertices {
            let Some(world) = mesh.vertex_world(v) else {
                warn!(vertex = %v, "new vertex went stale; positions left unsolved");
                return false;
            };
            ordered.push((projection_factor(world, target.a, target.b), v));
        }
        ordered.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());

        for ((_, vertex), (_, point)) in ordered.iter().zip(hits.iter()) {
            let local = self.frame.to_local(*point);
            if let Err(err) = mesh.set_vertex_position(*vertex, local) {
                warn!(error = %err, "failed to move split vertex");
                return false;
            }
        }
        true
    }

    /// Delete the edge, among those touching the split vertices, whose
    /// closest point to the click location is nearest. No distance
    /// threshold: the click picked the target, so some side always goes.
    fn delete_nearest_segment(
        &self,
        new_vertices: &[VertexId],
        click_world: DVec3,
        mesh: &mut dyn MeshEdit,
    ) -> bool {
        let mut candidates: Vec<EdgeId> = Vec::new();
        for &v in new_vertices {
            for edge in mesh.edges_of_vertex(v) {
                if !candidates.contains(&edge) {
                    candidates.push(edge);
                }
            }
        }

        let mut best: Option<(EdgeId, f64)> = None;
        for id in candidates {
            let Some(edge) = mesh.edge_ref(id) else {
                continue;
            };
            let closest = closest_point_on_segment(click_world, edge.a, edge.b);
            let dist_sq = closest.distance_squared(click_world);
            if best.map_or(true, |(_, d)| dist_sq < d) {
                best = Some((id, dist_sq));
            }
        }

        let Some((id, _)) = best else {
            warn!("no segment adjacent to the split points");
            return false;
        };
        match mesh.delete_edge(id) {
            Ok(()) => {
                info!(edge = %id, "segment deleted");
                true
            }
            Err(err) => {
                warn!(error = %err, "segment deletion failed");
                false
            }
        }
    }

    fn prune_stale_cutters(&mut self, mesh: &dyn MeshEdit) {
        self.cutting_edges.retain(|&id| mesh.edge_ref(id).is_some());
    }

    // ── inspection (for hosts and tests) ──────────────────────

    pub fn cutting_edges(&self) -> &[EdgeId] {
        &self.cutting_edges
    }

    pub fn is_collecting(&self) -> bool {
        self.phase == TrimPhase::CollectingCuts
    }
}
