//! Axis constraints for the line drawing tool.

use glam::DVec3;

/// A world axis the drawing direction can be locked to (or off).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    pub fn unit(self) -> DVec3 {
        match self {
            Axis::X => DVec3::X,
            Axis::Y => DVec3::Y,
            Axis::Z => DVec3::Z,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Axis::X => "X",
            Axis::Y => "Y",
            Axis::Z => "Z",
        }
    }

    /// The two axes complementary to this one.
    pub fn others(self) -> [Axis; 2] {
        match self {
            Axis::X => [Axis::Y, Axis::Z],
            Axis::Y => [Axis::X, Axis::Z],
            Axis::Z => [Axis::X, Axis::Y],
        }
    }
}

/// The current axis constraint.
///
/// `exclude_axis` is meaningful only while an axis is set; releasing the
/// exclusion modifier clears it without dropping the axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConstraintState {
    pub axis: Option<Axis>,
    pub exclude_axis: bool,
}

impl ConstraintState {
    pub fn set(&mut self, axis: Axis, exclude: bool) {
        self.axis = Some(axis);
        self.exclude_axis = exclude;
    }

    pub fn clear_exclusion(&mut self) {
        self.exclude_axis = false;
    }

    pub fn label(&self) -> String {
        match self.axis {
            None => "Free".to_string(),
            Some(axis) if self.exclude_axis => format!("Shift+{}", axis.name()),
            Some(axis) => axis.name().to_string(),
        }
    }
}

/// Apply the axis constraint to a candidate point, both in the object's
/// local frame.
///
/// Locked to axis `i`: the result follows the anchor except on component
/// `i`, which tracks the candidate. Locked off axis `i` (exclusion): the
/// complement, candidate everywhere except component `i` held at the
/// anchor. No constraint passes the candidate through.
pub fn apply_constraint(anchor: DVec3, candidate: DVec3, constraint: &ConstraintState) -> DVec3 {
    let Some(axis) = constraint.axis else {
        return candidate;
    };
    let idx = axis.index();

    if constraint.exclude_axis {
        let mut out = candidate;
        out[idx] = anchor[idx];
        out
    } else {
        let mut out = anchor;
        out[idx] = candidate[idx];
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ANCHOR: DVec3 = DVec3::new(1.0, 2.0, 3.0);
    const CANDIDATE: DVec3 = DVec3::new(7.0, -4.0, 9.0);

    #[test]
    fn test_free_passes_through() {
        let c = ConstraintState::default();
        assert_eq!(apply_constraint(ANCHOR, CANDIDATE, &c), CANDIDATE);
    }

    #[test]
    fn test_axis_lock_differs_only_on_axis() {
        for axis in [Axis::X, Axis::Y, Axis::Z] {
            let c = ConstraintState {
                axis: Some(axis),
                exclude_axis: false,
            };
            let out = apply_constraint(ANCHOR, CANDIDATE, &c);
            for i in 0..3 {
                if i == axis.index() {
                    assert_eq!(out[i], CANDIDATE[i]);
                } else {
                    assert_eq!(out[i], ANCHOR[i]);
                }
            }
        }
    }

    #[test]
    fn test_axis_exclusion_is_complement() {
        for axis in [Axis::X, Axis::Y, Axis::Z] {
            let c = ConstraintState {
                axis: Some(axis),
                exclude_axis: true,
            };
            let out = apply_constraint(ANCHOR, CANDIDATE, &c);
            for i in 0..3 {
                if i == axis.index() {
                    assert_eq!(out[i], ANCHOR[i]);
                } else {
                    assert_eq!(out[i], CANDIDATE[i]);
                }
            }
        }
    }

    #[test]
    fn test_label() {
        let mut c = ConstraintState::default();
        assert_eq!(c.label(), "Free");
        c.set(Axis::Y, false);
        assert_eq!(c.label(), "Y");
        c.set(Axis::Y, true);
        assert_eq!(c.label(), "Shift+Y");
        c.clear_exclusion();
        assert_eq!(c.label(), "Y");
    }
}
