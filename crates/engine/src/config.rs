//! Tool tuning knobs.

/// Settings shared by the drafting tools.
#[derive(Debug, Clone)]
pub struct ToolSettings {
    /// Snap search radius around the pointer, in pixels.
    pub snap_radius_px: f64,
    /// Edge pick radius around the pointer, in pixels.
    pub pick_radius_px: f64,
    /// Squared-distance tolerance for declaring two segments intersecting.
    pub intersect_epsilon: f64,
    /// How far a pick ray is extended when a finite target point is needed.
    pub ray_length: f64,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            snap_radius_px: 10.0,
            pick_radius_px: 10.0,
            intersect_epsilon: 1e-4,
            ray_length: 1000.0,
        }
    }
}
