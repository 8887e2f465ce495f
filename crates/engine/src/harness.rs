//! Headless test harness: fake mesh + fake projector + event drivers.
//!
//! Lets the tools run end-to-end without a host: the fake projector is a
//! top-down orthographic view of the XY plane and the fake mesh implements
//! the full editing interface with sequential handle minting.

use std::collections::BTreeMap;

use glam::{DMat4, DVec3};
use kurbo::Point;

use shared::{EdgeId, InputEvent, Key, Modifiers, MouseButton, VertexId};

use crate::command::{ActiveTool, ToolCommand};
use crate::config::ToolSettings;
use crate::geometry::line_plane_intersect;
use crate::mesh::{EdgeRef, MeshEdit, MeshError, Subdivision, VertexRef};
use crate::project::{Projector, Ray};
use crate::session::{EventOutcome, ToolFlow};

// ============================================================================
// Fake mesh
// ============================================================================

#[derive(Debug, Clone, Copy)]
struct FakeVertex {
    local: DVec3,
    hidden: bool,
}

#[derive(Debug, Clone, Copy)]
struct FakeEdge {
    a: u64,
    b: u64,
    hidden: bool,
}

/// In-memory mesh with sequential handle ids and deterministic (creation
/// order) iteration.
pub struct FakeMesh {
    world: DMat4,
    next_id: u64,
    verts: BTreeMap<u64, FakeVertex>,
    edges: BTreeMap<u64, FakeEdge>,
    /// When set, `subdivide_edge` produces this many interior vertices
    /// regardless of the requested cut count. Lets tests exercise the
    /// count-mismatch warning path.
    pub subdivide_count_override: Option<usize>,
}

impl FakeMesh {
    pub fn new() -> Self {
        Self::with_world(DMat4::IDENTITY)
    }

    pub fn with_world(world: DMat4) -> Self {
        Self {
            world,
            next_id: 1,
            verts: BTreeMap::new(),
            edges: BTreeMap::new(),
            subdivide_count_override: None,
        }
    }

    fn mint(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn to_world(&self, local: DVec3) -> DVec3 {
        self.world.transform_point3(local)
    }

    pub fn vertex_count(&self) -> usize {
        self.verts.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn set_vertex_hidden(&mut self, v: VertexId, hidden: bool) {
        if let Some(vert) = self.verts.get_mut(&v.0) {
            vert.hidden = hidden;
        }
    }

    pub fn set_edge_hidden(&mut self, e: EdgeId, hidden: bool) {
        if let Some(edge) = self.edges.get_mut(&e.0) {
            edge.hidden = hidden;
        }
    }

    /// World endpoint pairs of every live edge, for assertions.
    pub fn edges_world(&self) -> Vec<(DVec3, DVec3)> {
        self.edges()
            .into_iter()
            .map(|e| (e.a, e.b))
            .collect()
    }

    /// Create two vertices and the edge between them in one step.
    pub fn add_edge(&mut self, a: [f64; 3], b: [f64; 3]) -> (VertexId, VertexId, EdgeId) {
        let va = self.create_vertex(DVec3::from_array(a));
        let vb = self.create_vertex(DVec3::from_array(b));
        let id = self.mint();
        self.edges.insert(
            id,
            FakeEdge {
                a: va.0,
                b: vb.0,
                hidden: false,
            },
        );
        (va, vb, EdgeId(id))
    }

    /// Is there an edge between these two world points (either direction)?
    pub fn has_edge_between(&self, a: [f64; 3], b: [f64; 3]) -> bool {
        let pa = DVec3::from_array(a);
        let pb = DVec3::from_array(b);
        let close = |x: DVec3, y: DVec3| x.distance_squared(y) < 1e-9;
        self.edges_world()
            .iter()
            .any(|&(ea, eb)| (close(ea, pa) && close(eb, pb)) || (close(ea, pb) && close(eb, pa)))
    }
}

impl Default for FakeMesh {
    fn default() -> Self {
        Self::new()
    }
}

impl MeshEdit for FakeMesh {
    fn create_vertex(&mut self, local: DVec3) -> VertexId {
        let id = self.mint();
        self.verts.insert(
            id,
            FakeVertex {
                local,
                hidden: false,
            },
        );
        VertexId(id)
    }

    fn create_edge(&mut self, v1: VertexId, v2: VertexId) -> Result<EdgeId, MeshError> {
        if !self.verts.contains_key(&v1.0) {
            return Err(MeshError::StaleVertex(v1));
        }
        if !self.verts.contains_key(&v2.0) {
            return Err(MeshError::StaleVertex(v2));
        }
        let id = self.mint();
        self.edges.insert(
            id,
            FakeEdge {
                a: v1.0,
                b: v2.0,
                hidden: false,
            },
        );
        Ok(EdgeId(id))
    }

    fn subdivide_edge(&mut self, edge: EdgeId, cuts: usize) -> Result<Subdivision, MeshError> {
        let old = *self.edges.get(&edge.0).ok_or(MeshError::StaleEdge(edge))?;
        let a_local = self
            .verts
            .get(&old.a)
            .ok_or(MeshError::StaleVertex(VertexId(old.a)))?
            .local;
        let b_local = self
            .verts
            .get(&old.b)
            .ok_or(MeshError::StaleVertex(VertexId(old.b)))?
            .local;
        self.edges.remove(&edge.0);
        let count = self.subdivide_count_override.unwrap_or(cuts);

        let mut chain = vec![old.a];
        let mut new_vertices = Vec::with_capacity(count);
        for i in 0..count {
            let t = (i + 1) as f64 / (count + 1) as f64;
            let v = self.create_vertex(a_local.lerp(b_local, t));
            chain.push(v.0);
            new_vertices.push(v);
        }
        chain.push(old.b);

        let mut new_edges = Vec::with_capacity(chain.len() - 1);
        for pair in chain.windows(2) {
            let id = self.mint();
            self.edges.insert(
                id,
                FakeEdge {
                    a: pair[0],
                    b: pair[1],
                    hidden: old.hidden,
                },
            );
            new_edges.push(EdgeId(id));
        }

        // Handed back newest-first: callers must not assume the output
        // follows the edge direction.
        new_vertices.reverse();
        Ok(Subdivision {
            new_vertices,
            new_edges,
        })
    }

    fn delete_edge(&mut self, edge: EdgeId) -> Result<(), MeshError> {
        self.edges
            .remove(&edge.0)
            .map(|_| ())
            .ok_or(MeshError::StaleEdge(edge))
    }

    fn set_vertex_position(&mut self, v: VertexId, local: DVec3) -> Result<(), MeshError> {
        let vert = self
            .verts
            .get_mut(&v.0)
            .ok_or(MeshError::StaleVertex(v))?;
        vert.local = local;
        Ok(())
    }

    fn vertices(&self) -> Vec<VertexRef> {
        self.verts
            .iter()
            .map(|(&id, v)| VertexRef {
                id: VertexId(id),
                world: self.to_world(v.local),
                hidden: v.hidden,
            })
            .collect()
    }

    fn edges(&self) -> Vec<EdgeRef> {
        self.edges
            .iter()
            .filter_map(|(&id, e)| {
                let a = self.verts.get(&e.a)?;
                let b = self.verts.get(&e.b)?;
                Some(EdgeRef {
                    id: EdgeId(id),
                    a: self.to_world(a.local),
                    b: self.to_world(b.local),
                    hidden: e.hidden,
                })
            })
            .collect()
    }

    fn edges_of_vertex(&self, v: VertexId) -> Vec<EdgeId> {
        self.edges
            .iter()
            .filter(|(_, e)| e.a == v.0 || e.b == v.0)
            .map(|(&id, _)| EdgeId(id))
            .collect()
    }

    fn edge_ref(&self, edge: EdgeId) -> Option<EdgeRef> {
        let e = self.edges.get(&edge.0)?;
        let a = self.verts.get(&e.a)?;
        let b = self.verts.get(&e.b)?;
        Some(EdgeRef {
            id: edge,
            a: self.to_world(a.local),
            b: self.to_world(b.local),
            hidden: e.hidden,
        })
    }

    fn vertex_world(&self, v: VertexId) -> Option<DVec3> {
        self.verts.get(&v.0).map(|vert| self.to_world(vert.local))
    }

    fn world_matrix(&self) -> DMat4 {
        self.world
    }
}

// ============================================================================
// Fake projector
// ============================================================================

/// Orthographic top-down view of the XY plane: screen x/y are world x/y
/// times `scale`, rays point straight down, the reference plane is z = 0.
pub struct FakeProjector {
    /// Pixels per world unit.
    pub scale: f64,
    /// Height of pick ray origins.
    pub eye_z: f64,
    /// Points at or above this height fail to project.
    pub clip_z: f64,
    /// When set, scene raycasts hit this z plane.
    pub scene_z: Option<f64>,
}

impl Default for FakeProjector {
    fn default() -> Self {
        Self {
            scale: 1.0,
            eye_z: 10.0,
            clip_z: f64::INFINITY,
            scene_z: None,
        }
    }
}

impl Projector for FakeProjector {
    fn world_to_screen(&self, world: DVec3) -> Option<Point> {
        if world.z >= self.clip_z {
            return None;
        }
        Some(Point::new(world.x * self.scale, world.y * self.scale))
    }

    fn screen_to_ray(&self, screen: Point) -> Ray {
        Ray {
            origin: DVec3::new(screen.x / self.scale, screen.y / self.scale, self.eye_z),
            direction: DVec3::NEG_Z,
        }
    }

    fn scene_raycast(&self, ray: &Ray) -> Option<DVec3> {
        self.scene_z
            .map(|z| DVec3::new(ray.origin.x, ray.origin.y, z))
    }

    fn reference_plane_intersect(&self, origin: DVec3, target: DVec3) -> Option<DVec3> {
        line_plane_intersect(origin, target, DVec3::ZERO, DVec3::Z)
    }
}

// ============================================================================
// Harness
// ============================================================================

/// Drives a tool with synthetic events and records every status message.
pub struct TestHarness {
    pub mesh: FakeMesh,
    pub projector: FakeProjector,
    tool: Option<ActiveTool>,
    pub statuses: Vec<String>,
    pub last_flow: Option<ToolFlow>,
}

impl TestHarness {
    pub fn new() -> Self {
        Self {
            mesh: FakeMesh::new(),
            projector: FakeProjector::default(),
            tool: None,
            statuses: Vec::new(),
            last_flow: None,
        }
    }

    pub fn start_line(&mut self) {
        self.start(ToolCommand::StartLineDrawing);
    }

    pub fn start_trim(&mut self) {
        self.start(ToolCommand::StartEdgeTrim);
    }

    fn start(&mut self, command: ToolCommand) {
        let (tool, status) = ActiveTool::start(command, &self.mesh, ToolSettings::default());
        self.tool = Some(tool);
        self.statuses.push(status);
        self.last_flow = Some(ToolFlow::Running);
    }

    /// Deliver one event to the active tool. With no tool running this is a
    /// reported no-op.
    pub fn event(&mut self, event: InputEvent) -> EventOutcome {
        let Some(tool) = self.tool.as_mut() else {
            return EventOutcome::running().with_status("No active tool");
        };
        let outcome = tool.handle_event(&event, &mut self.mesh, &self.projector);
        if let Some(status) = &outcome.status {
            self.statuses.push(status.clone());
        }
        self.last_flow = Some(outcome.flow);
        if outcome.flow.is_terminal() {
            self.tool = None;
        }
        outcome
    }

    // ── event shorthands ──────────────────────────────────────

    pub fn move_to(&mut self, x: f64, y: f64) -> EventOutcome {
        self.event(InputEvent::PointerMove { screen: [x, y] })
    }

    pub fn click(&mut self, x: f64, y: f64) -> EventOutcome {
        self.event(InputEvent::ButtonPress {
            button: MouseButton::Left,
            screen: [x, y],
        })
    }

    pub fn right_click(&mut self, x: f64, y: f64) -> EventOutcome {
        self.event(InputEvent::ButtonPress {
            button: MouseButton::Right,
            screen: [x, y],
        })
    }

    pub fn press(&mut self, key: Key) -> EventOutcome {
        self.event(InputEvent::KeyPress {
            key,
            modifiers: Modifiers::NONE,
        })
    }

    pub fn press_shifted(&mut self, key: Key) -> EventOutcome {
        self.event(InputEvent::KeyPress {
            key,
            modifiers: Modifiers::SHIFT,
        })
    }

    pub fn release(&mut self, key: Key) -> EventOutcome {
        self.event(InputEvent::KeyRelease {
            key,
            modifiers: Modifiers::NONE,
        })
    }

    /// Type a distance string, one key per character.
    pub fn type_distance(&mut self, text: &str) {
        for c in text.chars() {
            if let Some(key) = key_for_char(c) {
                self.press(key);
            }
        }
    }

    /// Press Enter.
    pub fn confirm(&mut self) -> EventOutcome {
        self.press(Key::Return)
    }

    pub fn cancel(&mut self) -> EventOutcome {
        self.event(InputEvent::Cancel)
    }

    pub fn last_status(&self) -> Option<&str> {
        self.statuses.last().map(String::as_str)
    }

    pub fn is_running(&self) -> bool {
        self.tool.is_some()
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

fn key_for_char(c: char) -> Option<Key> {
    match c {
        '0' => Some(Key::Digit0),
        '1' => Some(Key::Digit1),
        '2' => Some(Key::Digit2),
        '3' => Some(Key::Digit3),
        '4' => Some(Key::Digit4),
        '5' => Some(Key::Digit5),
        '6' => Some(Key::Digit6),
        '7' => Some(Key::Digit7),
        '8' => Some(Key::Digit8),
        '9' => Some(Key::Digit9),
        '.' => Some(Key::Period),
        '-' => Some(Key::Minus),
        _ => None,
    }
}
