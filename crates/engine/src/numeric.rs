//! Typed distance entry for the line drawing tool.

use glam::DVec3;

use crate::constraint::{apply_constraint, ConstraintState};
use crate::geometry::Frame;

/// Errors from numeric input resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NumericError {
    /// The buffer does not parse as a real number.
    InvalidNumber(String),
}

impl std::fmt::Display for NumericError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NumericError::InvalidNumber(text) => {
                write!(f, "invalid numeric input '{}'", text)
            }
        }
    }
}

impl std::error::Error for NumericError {}

/// The distance string under construction.
///
/// Kept well-formed at entry time: digits anywhere, at most one decimal
/// point, a minus sign only in front. Cleared on every committed segment
/// and on cancellation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NumericBuffer {
    text: String,
}

impl NumericBuffer {
    /// Append one character; returns whether it was accepted.
    pub fn push(&mut self, c: char) -> bool {
        let accept = match c {
            '0'..='9' => true,
            '.' => !self.text.contains('.'),
            '-' => self.text.is_empty(),
            _ => false,
        };
        if accept {
            self.text.push(c);
        }
        accept
    }

    /// Drop the last character, if any.
    pub fn pop(&mut self) {
        self.text.pop();
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Parse the buffer as a distance. Empty, a lone "-" or ".", and other
    /// malformed contents fail.
    pub fn parse(&self) -> Result<f64, NumericError> {
        self.text
            .parse::<f64>()
            .map_err(|_| NumericError::InvalidNumber(self.text.clone()))
    }
}

/// Fallback drawing direction when the preview coincides with the anchor:
/// the locked axis, the normalized sum of the two non-excluded axes under
/// exclusion, or X with no constraint at all.
fn fallback_direction(constraint: &ConstraintState) -> DVec3 {
    match constraint.axis {
        Some(axis) if constraint.exclude_axis => {
            let [a, b] = axis.others();
            (a.unit() + b.unit()).normalize()
        }
        Some(axis) => axis.unit(),
        None => DVec3::X,
    }
}

/// Turn the typed distance into an absolute world-space target point.
///
/// Direction is from the anchor toward the preview point; a zero-length
/// preview offset falls back to the constraint-derived direction. When an
/// axis constraint is active the result is re-constrained in local space so
/// numeric entry always respects the lock. A value of zero returns the
/// anchor unchanged.
pub fn resolve_numeric(
    anchor_world: DVec3,
    preview_world: DVec3,
    buffer: &NumericBuffer,
    constraint: &ConstraintState,
    frame: &Frame,
) -> Result<DVec3, NumericError> {
    let value = buffer.parse()?;
    if value == 0.0 {
        return Ok(anchor_world);
    }

    let offset = preview_world - anchor_world;
    let direction = if offset.length_squared() == 0.0 {
        fallback_direction(constraint)
    } else {
        offset.normalize()
    };

    let mut target = anchor_world + direction * value;
    if constraint.axis.is_some() {
        let anchor_local = frame.to_local(anchor_world);
        let target_local = frame.to_local(target);
        target = frame.to_world(apply_constraint(anchor_local, target_local, constraint));
    }
    Ok(target)
}
