//! Factory helpers for building test meshes and harnesses.

use shared::{EdgeId, VertexId};

use crate::harness::{FakeMesh, TestHarness};

/// An empty fake mesh at the identity transform.
pub fn fake_mesh() -> FakeMesh {
    FakeMesh::new()
}

/// Add an edge (and its two vertices) between two world points.
pub fn add_edge(mesh: &mut FakeMesh, a: [f64; 3], b: [f64; 3]) -> (VertexId, VertexId, EdgeId) {
    mesh.add_edge(a, b)
}

/// A harness whose mesh holds the given edges.
pub fn harness_with_edges(edges: &[([f64; 3], [f64; 3])]) -> TestHarness {
    let mut harness = TestHarness::new();
    for &(a, b) in edges {
        harness.mesh.add_edge(a, b);
    }
    harness
}
