//! Abstract mesh interface the drafting tools mutate through.
//!
//! The host owns all persistent geometry; the engine only requests
//! creation, subdivision, and deletion, and reads world-space snapshots for
//! snapping and picking. Handles become invalid after any structural
//! mutation that touches them and must be re-validated before reuse.

use glam::{DMat4, DVec3};
use shared::{EdgeId, VertexId};

/// Errors surfaced by a mesh implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MeshError {
    /// A vertex handle no longer refers to a live vertex.
    StaleVertex(VertexId),
    /// An edge handle no longer refers to a live edge.
    StaleEdge(EdgeId),
}

impl std::fmt::Display for MeshError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MeshError::StaleVertex(v) => write!(f, "stale vertex handle {}", v),
            MeshError::StaleEdge(e) => write!(f, "stale edge handle {}", e),
        }
    }
}

impl std::error::Error for MeshError {}

/// World-space snapshot of one vertex.
#[derive(Debug, Clone, Copy)]
pub struct VertexRef {
    pub id: VertexId,
    pub world: DVec3,
    pub hidden: bool,
}

/// World-space snapshot of one edge.
#[derive(Debug, Clone, Copy)]
pub struct EdgeRef {
    pub id: EdgeId,
    pub a: DVec3,
    pub b: DVec3,
    pub hidden: bool,
}

impl EdgeRef {
    pub fn midpoint(&self) -> DVec3 {
        (self.a + self.b) * 0.5
    }
}

/// Result of subdividing one edge.
///
/// `new_vertices` are the interior vertices created by the split; their
/// order is implementation-defined and callers must sort them spatially
/// before using them.
#[derive(Debug, Clone)]
pub struct Subdivision {
    pub new_vertices: Vec<VertexId>,
    pub new_edges: Vec<EdgeId>,
}

/// Editing and query surface of the host mesh.
///
/// Creation takes local coordinates; snapshots are world space. Iteration
/// order must be stable between calls with no interleaved mutation, since
/// snapping and picking break distance ties by iteration order.
pub trait MeshEdit {
    fn create_vertex(&mut self, local: DVec3) -> VertexId;

    fn create_edge(&mut self, v1: VertexId, v2: VertexId) -> Result<EdgeId, MeshError>;

    /// Split an edge into `cuts + 1` collinear pieces, consuming the edge
    /// handle.
    fn subdivide_edge(&mut self, edge: EdgeId, cuts: usize) -> Result<Subdivision, MeshError>;

    fn delete_edge(&mut self, edge: EdgeId) -> Result<(), MeshError>;

    fn set_vertex_position(&mut self, v: VertexId, local: DVec3) -> Result<(), MeshError>;

    fn vertices(&self) -> Vec<VertexRef>;

    fn edges(&self) -> Vec<EdgeRef>;

    /// Live edges incident to a vertex.
    fn edges_of_vertex(&self, v: VertexId) -> Vec<EdgeId>;

    /// Re-query one edge; `None` if the handle has gone stale.
    fn edge_ref(&self, edge: EdgeId) -> Option<EdgeRef>;

    /// Re-query one vertex's world position; `None` if the handle has gone
    /// stale.
    fn vertex_world(&self, v: VertexId) -> Option<DVec3>;

    /// Local-to-world matrix of the mesh object.
    fn world_matrix(&self) -> DMat4;
}
