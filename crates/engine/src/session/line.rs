//! Interactive line drawing: snapping, axis locks, numeric distance entry.

use glam::DVec3;
use kurbo::Point;
use tracing::{debug, info, warn};

use shared::{CursorKind, InputEvent, Key, Modifiers, MouseButton, VertexId};

use super::{axis_from_key, EventOutcome, ToolFlow};
use crate::config::ToolSettings;
use crate::constraint::{apply_constraint, ConstraintState};
use crate::geometry::Frame;
use crate::mesh::MeshEdit;
use crate::numeric::{resolve_numeric, NumericBuffer};
use crate::project::Projector;
use crate::snap::{find_snap_point, snap_label, SnapHit, SnapKind};

/// The last confirmed point: vertex handle plus its local and world
/// coordinates. This is the session's only persistent geometric memory.
#[derive(Debug, Clone, Copy)]
struct Anchor {
    vertex: VertexId,
    local: DVec3,
    world: DVec3,
}

/// State machine for the line drawing tool.
///
/// Idle until the first confirmed point, then drawing chained segments
/// from the moving anchor until finished or cancelled.
pub struct LineDrawingSession {
    settings: ToolSettings,
    frame: Frame,
    anchor: Option<Anchor>,
    constraint: ConstraintState,
    numeric: NumericBuffer,
    snap: Option<SnapHit>,
    preview_world: Option<DVec3>,
    pointer: Point,
}

impl LineDrawingSession {
    pub fn new(mesh: &dyn MeshEdit, settings: ToolSettings) -> Self {
        Self {
            settings,
            frame: Frame::new(mesh.world_matrix()),
            anchor: None,
            constraint: ConstraintState::default(),
            numeric: NumericBuffer::default(),
            snap: None,
            preview_world: None,
            pointer: Point::ZERO,
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

            InputEvent::Cancel => self.cancel(),

            InputEvent::PointerMove { screen } => {
                self.pointer = Point::new(screen[0], screen[1]);
                self.update_preview(mesh, projector);
                EventOutcome::running()
                    .with_status(self.status_line(None))
                    .with_cursor(self.cursor())
            }

            InputEvent::ButtonPress {
                button: MouseButton::Left,
                screen,
            } => {
                self.pointer = Point::new(screen[0], screen[1]);
                self.update_preview(mesh, projector);
                self.confirm_click(mesh)
            }

            InputEvent::KeyPress { key, modifiers } => self.key_press(*key, *modifiers, mesh, projector),

            InputEvent::KeyRelease { key: Key::Shift, .. } => {
                if self.constraint.exclude_axis {
                    self.constraint.clear_exclusion();
                    return EventOutcome::running()
                        .with_status(self.status_line(Some("Axis constraint reset to single axis")))
                        .with_cursor(self.cursor());
                }
                EventOutcome::running().with_cursor(self.cursor())
            }

            _ => EventOutcome::running().with_cursor(self.cursor()),
        }
    }

    // ── event handling ────────────────────────────────────────

    fn key_press(
        &mut self,
        key: Key,
        modifiers: Modifiers,
        mesh: &mut dyn MeshEdit,
        projector: &dyn Projector,
    ) -> EventOutcome {
        if let Some(axis) = axis_from_key(key) {
            self.constraint.set(axis, modifiers.shift);
            self.update_preview(mesh, projector);
            debug!(axis = axis.name(), exclude = modifiers.shift, "axis constraint set");
            return EventOutcome::running()
                .with_status(self.status_line(None))
                .with_cursor(self.cursor());
        }

        match key {
            Key::Escape => self.cancel(),
            Key::Return => self.confirm_numeric(mesh),
            Key::Backspace => {
                self.numeric.pop();
                let msg = if self.numeric.is_empty() {
                    "Input cleared".to_string()
                } else {
                    format!("Input: {}", self.numeric.as_str())
                };
                EventOutcome::running()
                    .with_status(self.status_line(Some(msg.as_str())))
                    .with_cursor(self.cursor())
            }
            _ => {
                // The minus key doubles as the exclusion modifier's
                // alternate binding, so it only types a sign unshifted.
                let ch = key.digit().or(match key {
                    Key::Period => Some('.'),
                    Key::Minus if !modifiers.shift => Some('-'),
                    _ => None,
                });
                let Some(ch) = ch else {
                    return EventOutcome::running().with_cursor(self.cursor());
                };
                if self.numeric.push(ch) {
                    let msg = format!("Input: {}", self.numeric.as_str());
                    EventOutcome::running()
                        .with_status(self.status_line(Some(msg.as_str())))
                        .with_cursor(self.cursor())
                } else {
                    EventOutcome::running().with_cursor(self.cursor())
                }
            }
        }
    }

    /// Left click: confirm the current target point, creating geometry.
    fn confirm_click(&mut self, mesh: &mut dyn MeshEdit) -> EventOutcome {
        let Some(preview) = self.preview_world else {
            return EventOutcome::running().with_cursor(self.cursor());
        };

        let mut note: Option<&str> = None;
        let target = match self.anchor {
            Some(anchor) if !self.numeric.is_empty() => {
                match resolve_numeric(
                    anchor.world,
                    preview,
                    &self.numeric,
                    &self.constraint,
                    &self.frame,
                ) {
                    Ok(point) => point,
                    Err(err) => {
                        warn!(error = %err, "numeric input ignored on click");
                        note = Some("Invalid numeric input, using pointer position");
                        preview
                    }
                }
            }
            _ => preview,
        };

        self.place_point(target, mesh, note)
    }

    /// Enter: confirm using the numeric buffer alone.
    fn confirm_numeric(&mut self, mesh: &mut dyn MeshEdit) -> EventOutcome {
        let Some(anchor) = self.anchor else {
            return EventOutcome::running()
                .with_status(self.status_line(Some("No numeric input to confirm")))
                .with_cursor(self.cursor());
        };
        if self.numeric.is_empty() {
            return EventOutcome::running()
                .with_status(self.status_line(Some("No numeric input to confirm")))
                .with_cursor(self.cursor());
        }

        let preview = self.preview_world.unwrap_or(anchor.world);
        match resolve_numeric(
            anchor.world,
            preview,
            &self.numeric,
            &self.constraint,
            &self.frame,
        ) {
            Ok(target) => self.place_point(target, mesh, Some("Segment created from numeric input")),
            Err(err) => {
                warn!(error = %err, "numeric confirm rejected");
                self.numeric.clear();
                EventOutcome::running()
                    .with_status(self.status_line(Some("Invalid numeric input")))
                    .with_cursor(self.cursor())
            }
        }
    }

    /// Create the vertex (and edge, when an anchor exists) for a confirmed
    /// target point, then advance the anchor so drawing continues chained.
    fn place_point(
        &mut self,
        target_world: DVec3,
        mesh: &mut dyn MeshEdit,
        note: Option<&str>,
    ) -> EventOutcome {
        let local = self.frame.to_local(target_world);

        match self.anchor {
            None => {
                let vertex = mesh.create_vertex(local);
                self.anchor = Some(Anchor {
                    vertex,
                    local,
                    world: target_world,
                });
                self.numeric.clear();
                info!(point = ?target_world, "line: first point set");
                EventOutcome::running()
                    .with_status(self.status_line(Some(note.unwrap_or("First point set"))))
                    .with_cursor(self.cursor())
            }
            Some(anchor) => {
                // Re-validate before mutating so a dead anchor cannot leave
                // an orphan vertex behind.
                if mesh.vertex_world(anchor.vertex).is_none() {
                    warn!(vertex = %anchor.vertex, "anchor vertex went stale; point not placed");
                    return EventOutcome::running()
                        .with_status(self.status_line(Some("Anchor vertex is no longer valid")))
                        .with_cursor(self.cursor());
                }

                let vertex = mesh.create_vertex(local);
                match mesh.create_edge(anchor.vertex, vertex) {
                    Ok(_) => {
                        self.anchor = Some(Anchor {
                            vertex,
                            local,
                            world: target_world,
                        });
                        self.numeric.clear();
                        info!(to = ?target_world, "line: segment created");
                        EventOutcome::running()
                            .with_status(self.status_line(Some(
                                note.unwrap_or("Segment created, continue or press Esc"),
                            )))
                            .with_cursor(self.cursor())
                    }
                    Err(err) => {
                        warn!(error = %err, "edge creation failed; anchor kept");
                        EventOutcome::running()
                            .with_status(self.status_line(Some("Could not create segment")))
                            .with_cursor(self.cursor())
                    }
                }
            }
        }
    }

    fn cancel(&mut self) -> EventOutcome {
        info!("line tool cancelled");
        EventOutcome::terminal(ToolFlow::Cancelled, "Line tool cancelled")
    }

    // ── point resolution ──────────────────────────────────────

    /// Raw world point for the pointer: snap first, then scene geometry,
    /// then the reference plane, then the ray origin.
    fn raw_point(&mut self, mesh: &dyn MeshEdit, projector: &dyn Projector) -> DVec3 {
        self.snap = find_snap_point(self.pointer, mesh, projector, &self.settings);
        if let Some(hit) = self.snap {
            return hit.world;
        }

        let ray = projector.screen_to_ray(self.pointer);
        if let Some(hit) = projector.scene_raycast(&ray) {
            return hit;
        }

        let target = ray.origin + ray.direction * self.settings.ray_length;
        if let Some(hit) = projector.reference_plane_intersect(ray.origin, target) {
            return hit;
        }

        ray.origin
    }

    fn update_preview(&mut self, mesh: &dyn MeshEdit, projector: &dyn Projector) {
        let raw = self.raw_point(mesh, projector);
        let point = match self.anchor {
            None => raw,
            Some(anchor) => self.frame.to_world(apply_constraint(
                anchor.local,
                self.frame.to_local(raw),
                &self.constraint,
            )),
        };
        self.preview_world = Some(point);
    }

    // ── feedback ──────────────────────────────────────────────

    fn cursor(&self) -> CursorKind {
        match self.snap.map(|hit| hit.kind) {
            Some(SnapKind::Vertex) => CursorKind::Hand,
            Some(SnapKind::Midpoint) => CursorKind::PaintCross,
            None => CursorKind::Crosshair,
        }
    }

    fn status_line(&self, message: Option<&str>) -> String {
        let mut parts = Vec::new();
        if let Some(message) = message {
            parts.push(format!("[Line] {}", message));
        }
        if self.anchor.is_some() {
            parts.push(format!("Axis: {}", self.constraint.label()));
        }
        parts.push(format!("Snap: {}", snap_label(self.snap.as_ref())));
        if !self.numeric.is_empty() {
            parts.push(format!("Input: {}", self.numeric.as_str()));
        }
        parts.join(" | ")
    }

    // ── inspection (for hosts and tests) ──────────────────────

    pub fn anchor_world(&self) -> Option<DVec3> {
        self.anchor.map(|a| a.world)
    }

    pub fn preview_world(&self) -> Option<DVec3> {
        self.preview_world
    }

    pub fn constraint(&self) -> &ConstraintState {
        &self.constraint
    }

    pub fn numeric_input(&self) -> &str {
        self.numeric.as_str()
    }
}
