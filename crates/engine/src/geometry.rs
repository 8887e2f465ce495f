//! Segment/line geometry used by snapping, picking, and trimming.

use glam::{DMat4, DVec3};
use kurbo::Point;

// ============================================================================
// Local/world frame
// ============================================================================

/// Object frame captured when a session starts.
///
/// Sessions convert through this instead of asking the mesh again so that a
/// whole interactive operation sees one consistent transform.
#[derive(Debug, Clone, Copy)]
pub struct Frame {
    pub world: DMat4,
    pub world_inv: DMat4,
}

impl Frame {
    pub fn new(world: DMat4) -> Self {
        Self {
            world,
            world_inv: world.inverse(),
        }
    }

    pub fn to_world(&self, local: DVec3) -> DVec3 {
        self.world.transform_point3(local)
    }

    pub fn to_local(&self, world: DVec3) -> DVec3 {
        self.world_inv.transform_point3(world)
    }
}

// ============================================================================
// Closest points and projection factors
// ============================================================================

/// Closest point to `p` on the finite segment `a`-`b`.
/// A degenerate segment collapses to `a`.
pub fn closest_point_on_segment(p: DVec3, a: DVec3, b: DVec3) -> DVec3 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq == 0.0 {
        return a;
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}

/// Screen-space variant of [`closest_point_on_segment`].
pub fn closest_point_on_screen_segment(p: Point, a: Point, b: Point) -> Point {
    let ab = b - a;
    let len_sq = ab.hypot2();
    if len_sq == 0.0 {
        return a;
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}

/// Scalar projection factor of `p` along the segment `a`-`b`.
///
/// 0 at `a`, 1 at `b`, unclamped outside. Used as an ordering key, not a
/// containment check. Zero-length segments yield 0.
pub fn projection_factor(p: DVec3, a: DVec3, b: DVec3) -> f64 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq == 0.0 {
        return 0.0;
    }
    (p - a).dot(ab) / len_sq
}

// ============================================================================
// Line/line and segment/segment intersection
// ============================================================================

/// Closest points between the infinite lines through `a0`-`a1` and `b0`-`b1`.
/// Returns `None` for parallel (or degenerate) lines.
pub fn closest_points_on_lines(
    a0: DVec3,
    a1: DVec3,
    b0: DVec3,
    b1: DVec3,
) -> Option<(DVec3, DVec3)> {
    let d1 = a1 - a0;
    let d2 = b1 - b0;
    let r = a0 - b0;

    let a = d1.dot(d1);
    let e = d2.dot(d2);
    let b = d1.dot(d2);
    let c = d1.dot(r);
    let f = d2.dot(r);

    let denom = a * e - b * b;
    if denom.abs() < 1e-12 {
        return None;
    }

    let s = (b * f - c * e) / denom;
    let t = (a * f - b * c) / denom;

    Some((a0 + d1 * s, b0 + d2 * t))
}

/// True if `p` lies on the finite segment `a`-`b`, by the
/// sum-of-squared-distances-to-endpoints test (cheaper than a parametric
/// t-in-[0,1] check). `eps` is a squared-distance tolerance.
fn on_segment(p: DVec3, a: DVec3, b: DVec3, eps: f64) -> bool {
    p.distance_squared(a) + p.distance_squared(b) <= a.distance_squared(b) + eps
}

/// Intersection point of two finite segments, or `None`.
///
/// The supporting lines must meet within `eps` (squared distance between
/// their closest points) and the meeting point must lie on both finite
/// segments. Degenerate segments never intersect anything.
pub fn segment_intersection(
    a0: DVec3,
    a1: DVec3,
    b0: DVec3,
    b1: DVec3,
    eps: f64,
) -> Option<DVec3> {
    let (p1, p2) = closest_points_on_lines(a0, a1, b0, b1)?;

    if p1.distance_squared(p2) >= eps {
        return None;
    }

    if on_segment(p1, a0, a1, eps) && on_segment(p1, b0, b1, eps) {
        Some(p1)
    } else {
        None
    }
}

// ============================================================================
// Ray/plane
// ============================================================================

/// Intersection of the line through `origin` and `target` with a plane.
/// Returns `None` when the line is parallel to the plane.
pub fn line_plane_intersect(
    origin: DVec3,
    target: DVec3,
    plane_point: DVec3,
    plane_normal: DVec3,
) -> Option<DVec3> {
    let dir = target - origin;
    let denom = dir.dot(plane_normal);
    if denom.abs() < 1e-9 {
        return None;
    }
    let t = (plane_point - origin).dot(plane_normal) / denom;
    Some(origin + dir * t)
}
