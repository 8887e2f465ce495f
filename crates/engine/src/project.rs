//! Abstract viewport interface: projection and ray queries.

use glam::DVec3;
use kurbo::Point;

/// A ray in world space.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: DVec3,
    pub direction: DVec3,
}

/// Viewport services the host supplies.
///
/// `world_to_screen` returns `None` for points that cannot be projected
/// (behind the camera); callers skip such candidates without error.
pub trait Projector {
    fn world_to_screen(&self, world: DVec3) -> Option<Point>;

    fn screen_to_ray(&self, screen: Point) -> Ray;

    /// Nearest scene-geometry hit along the ray, if any. Must not mutate
    /// the scene.
    fn scene_raycast(&self, ray: &Ray) -> Option<DVec3>;

    /// Intersection of the line through `origin` and `target` with the
    /// host's reference plane, if any.
    fn reference_plane_intersect(&self, origin: DVec3, target: DVec3) -> Option<DVec3>;
}
