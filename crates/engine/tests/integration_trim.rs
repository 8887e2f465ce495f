//! Integration tests for the trim tool: collect cutting edges, then split
//! and delete target segments. Screen pixels map 1:1 to world XY units.

use draft_engine::fixtures::harness_with_edges;
use draft_engine::mesh::MeshEdit;
use draft_engine::session::ToolFlow;

#[test]
fn test_trim_removes_clicked_middle_segment() {
    // Target along X, one vertical cutter crossing at x = 5.
    let mut h = harness_with_edges(&[
        ([0.0, 0.0, 0.0], [10.0, 0.0, 0.0]),
        ([5.0, -5.0, 0.0], [5.0, 5.0, 0.0]),
    ]);
    h.start_trim();

    h.click(5.0, 3.0); // select the cutter
    h.right_click(0.0, 0.0); // confirm cutters
    h.click(7.0, 0.0); // trim the side of the target containing x = 7

    assert!(h.mesh.has_edge_between([0.0, 0.0, 0.0], [5.0, 0.0, 0.0]));
    assert!(!h.mesh.has_edge_between([5.0, 0.0, 0.0], [10.0, 0.0, 0.0]));
    // The cutter itself is untouched.
    assert!(h.mesh.has_edge_between([5.0, -5.0, 0.0], [5.0, 5.0, 0.0]));
    assert!(h.statuses.iter().any(|s| s.contains("Edge trimmed")));
}

#[test]
fn test_trim_other_side_when_clicked_there() {
    let mut h = harness_with_edges(&[
        ([0.0, 0.0, 0.0], [10.0, 0.0, 0.0]),
        ([5.0, -5.0, 0.0], [5.0, 5.0, 0.0]),
    ]);
    h.start_trim();

    h.click(5.0, 3.0);
    h.right_click(0.0, 0.0);
    h.click(2.0, 0.0);

    assert!(!h.mesh.has_edge_between([0.0, 0.0, 0.0], [5.0, 0.0, 0.0]));
    assert!(h.mesh.has_edge_between([5.0, 0.0, 0.0], [10.0, 0.0, 0.0]));
}

#[test]
fn test_trim_ordering_is_spatial_not_selection_order() {
    // Two cutters crossing at x = 30 and x = 70, selected far-one-first.
    let mut h = harness_with_edges(&[
        ([0.0, 0.0, 0.0], [100.0, 0.0, 0.0]),
        ([30.0, -20.0, 0.0], [30.0, 20.0, 0.0]),
        ([70.0, -20.0, 0.0], [70.0, 20.0, 0.0]),
    ]);
    h.start_trim();

    h.click(70.0, 15.0); // select the x = 70 cutter first
    h.click(30.0, 15.0); // then the x = 30 cutter
    h.right_click(0.0, 0.0);
    h.click(50.0, 0.0); // remove the middle piece

    assert!(h.mesh.has_edge_between([0.0, 0.0, 0.0], [30.0, 0.0, 0.0]));
    assert!(!h.mesh.has_edge_between([30.0, 0.0, 0.0], [70.0, 0.0, 0.0]));
    assert!(h.mesh.has_edge_between([70.0, 0.0, 0.0], [100.0, 0.0, 0.0]));
}

#[test]
fn test_trim_solves_diagonal_crossing_position() {
    // A diagonal cutter crosses the target at (30, 0); the split vertex
    // must land on the true crossing, not the naive midpoint.
    let mut h = harness_with_edges(&[
        ([0.0, 0.0, 0.0], [100.0, 0.0, 0.0]),
        ([20.0, -10.0, 0.0], [40.0, 10.0, 0.0]),
    ]);
    h.start_trim();

    h.click(25.0, -4.0); // on the cutter, away from the target
    h.right_click(0.0, 0.0);
    h.click(80.0, 0.0);

    assert!(h.mesh.has_edge_between([0.0, 0.0, 0.0], [30.0, 0.0, 0.0]));
    assert!(!h.mesh.has_edge_between([30.0, 0.0, 0.0], [100.0, 0.0, 0.0]));
}

#[test]
fn test_toggle_then_empty_confirm_cancels() {
    let mut h = harness_with_edges(&[([0.0, 0.0, 0.0], [100.0, 0.0, 0.0])]);
    h.start_trim();

    h.click(50.0, 0.0); // select
    h.click(50.0, 0.0); // deselect
    let out = h.right_click(0.0, 0.0);

    assert_eq!(out.flow, ToolFlow::Cancelled);
    assert!(!h.is_running());
    assert_eq!(h.mesh.edge_count(), 1);
}

#[test]
fn test_no_intersections_is_reported_noop() {
    let mut h = harness_with_edges(&[
        ([0.0, 0.0, 0.0], [100.0, 0.0, 0.0]),
        ([0.0, 50.0, 0.0], [100.0, 50.0, 0.0]),
    ]);
    h.start_trim();

    h.click(50.0, 0.0);
    h.right_click(0.0, 0.0);
    h.click(50.0, 50.0);

    assert_eq!(h.mesh.edge_count(), 2);
    assert!(h
        .statuses
        .iter()
        .any(|s| s.contains("No intersections with cutting edges")));
}

#[test]
fn test_skew_cutter_does_not_intersect() {
    // The cutter crosses above the target in Z: skew lines, no trim.
    let mut h = harness_with_edges(&[
        ([0.0, 0.0, 0.0], [100.0, 0.0, 0.0]),
        ([50.0, -20.0, 2.0], [50.0, 20.0, 2.0]),
    ]);
    h.start_trim();

    h.click(50.0, 15.0);
    h.right_click(0.0, 0.0);
    h.click(70.0, 0.0);

    assert_eq!(h.mesh.edge_count(), 2);
}

#[test]
fn test_subdivision_count_mismatch_keeps_split_unsolved() {
    let mut h = harness_with_edges(&[
        ([0.0, 0.0, 0.0], [10.0, 0.0, 0.0]),
        ([5.0, -5.0, 0.0], [5.0, 5.0, 0.0]),
    ]);
    h.mesh.subdivide_count_override = Some(2);
    h.start_trim();

    h.click(5.0, 3.0);
    h.right_click(0.0, 0.0);
    h.click(7.0, 0.0);

    // One cut was requested but two vertices came back: the target stays
    // split at its straight-line thirds and nothing is deleted.
    assert!(h
        .statuses
        .iter()
        .any(|s| s.contains("intersection positions could not be applied")));
    assert_eq!(h.mesh.edge_count(), 4); // 3 target pieces + the cutter
    assert!(h.mesh.has_edge_between([0.0, 0.0, 0.0], [10.0 / 3.0, 0.0, 0.0]));
    assert!(h.is_running());
}

#[test]
fn test_stale_cutter_is_skipped_with_warning() {
    let mut h = harness_with_edges(&[
        ([0.0, 0.0, 0.0], [10.0, 0.0, 0.0]),
        ([5.0, -5.0, 0.0], [5.0, 5.0, 0.0]),
    ]);
    h.start_trim();

    h.click(5.0, 3.0);
    h.right_click(0.0, 0.0);

    // The host deletes the cutter behind the tool's back.
    let cutter = h.mesh.edges()[1].id;
    h.mesh.delete_edge(cutter).unwrap();

    h.click(7.0, 0.0);
    assert!(h
        .statuses
        .iter()
        .any(|s| s.contains("No intersections with cutting edges")));
    assert_eq!(h.mesh.edge_count(), 1);
}

#[test]
fn test_two_targets_trimmed_in_sequence() {
    // One cutter across two parallel targets.
    let mut h = harness_with_edges(&[
        ([0.0, 0.0, 0.0], [100.0, 0.0, 0.0]),
        ([0.0, 30.0, 0.0], [100.0, 30.0, 0.0]),
        ([50.0, -10.0, 0.0], [50.0, 40.0, 0.0]),
    ]);
    h.start_trim();

    h.click(50.0, 38.0); // the cutter, near its top end
    h.right_click(0.0, 0.0);
    h.click(80.0, 0.0);
    h.click(20.0, 30.0);

    assert!(h.mesh.has_edge_between([0.0, 0.0, 0.0], [50.0, 0.0, 0.0]));
    assert!(!h.mesh.has_edge_between([50.0, 0.0, 0.0], [100.0, 0.0, 0.0]));
    assert!(!h.mesh.has_edge_between([0.0, 30.0, 0.0], [50.0, 30.0, 0.0]));
    assert!(h.mesh.has_edge_between([50.0, 30.0, 0.0], [100.0, 30.0, 0.0]));

    let out = h.right_click(0.0, 0.0);
    assert_eq!(out.flow, ToolFlow::Finished);
}

#[test]
fn test_miss_in_trim_phase_is_noop() {
    let mut h = harness_with_edges(&[
        ([0.0, 0.0, 0.0], [100.0, 0.0, 0.0]),
        ([50.0, -20.0, 0.0], [50.0, 20.0, 0.0]),
    ]);
    h.start_trim();

    h.click(50.0, 15.0);
    h.right_click(0.0, 0.0);
    h.click(200.0, 200.0);

    assert_eq!(h.mesh.edge_count(), 2);
    assert!(h
        .statuses
        .iter()
        .any(|s| s.contains("No edge under pointer to trim")));
}
