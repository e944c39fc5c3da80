//! Run-scoped tilt state.
//!
//! Every generator places its way-points through a [`Tilt`]: the target
//! position is shifted by the rim compensation and the orientation replaced
//! by the leaned one. A [`TiltContext`] holds the forward tilt (begin→end)
//! and the reverse tilt (end→begin) and is built fresh for every run.

use nalgebra::Vector3;
use polishkit_core::geometry::{tilt_compensation_offset, tilted_orientation};
use polishkit_core::{Craft, Pose};

/// Leaned orientation plus the translation that compensates for it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tilt {
    /// Orientation applied to every placed way-point
    pub rot: Vector3<f64>,
    /// Offset added to every placed position
    pub translation: Vector3<f64>,
}

impl Tilt {
    /// Lean `rot` by `angle_deg` towards `move_dir` for a disc of `radius`
    pub fn compute(
        rot: &Vector3<f64>,
        move_dir: &Vector3<f64>,
        radius: f64,
        angle_deg: f64,
    ) -> Self {
        Self {
            rot: tilted_orientation(rot, move_dir, angle_deg),
            translation: tilt_compensation_offset(rot, move_dir, radius, angle_deg),
        }
    }

    /// No lean, no shift
    pub fn identity(rot: Vector3<f64>) -> Self {
        Self {
            rot,
            translation: Vector3::zeros(),
        }
    }

    /// Way-point at `pos` with this tilt applied
    pub fn place(&self, pos: &Vector3<f64>) -> Pose {
        Pose::from_parts(pos + self.translation, self.rot)
    }
}

/// Forward and reverse tilt for one run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TiltContext {
    /// Tilt for passes running from begin towards end
    pub forward: Tilt,
    /// Tilt for passes running from end towards begin
    pub reverse: Tilt,
}

impl TiltContext {
    /// Derive both tilts from the begin/end points and the craft's disc
    pub fn from_points(begin: &Pose, end: &Pose, craft: &Craft) -> Self {
        let forward_dir = end.pos - begin.pos;
        let reverse_dir = begin.pos - end.pos;
        Self {
            forward: Tilt::compute(&begin.rot, &forward_dir, craft.disc_radius, craft.grind_angle),
            reverse: Tilt::compute(&end.rot, &reverse_dir, craft.disc_radius, craft.grind_angle),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polishkit_core::PathStyle;

    #[test]
    fn test_zero_grind_angle_keeps_taught_pose() {
        let craft = Craft::new("flat", PathStyle::Line);
        let begin = Pose::new(0.0, 0.0, 0.0, 180.0, 0.0, 0.0);
        let end = Pose::new(100.0, 0.0, 0.0, 180.0, 0.0, 10.0);
        let ctx = TiltContext::from_points(&begin, &end, &craft);

        let placed = ctx.forward.place(&Vector3::new(5.0, 6.0, 7.0));
        assert!((placed.pos - Vector3::new(5.0, 6.0, 7.0)).norm() < 1e-9);
        assert!(ctx.reverse.translation.norm() < 1e-9);
    }

    #[test]
    fn test_forward_and_reverse_mirror() {
        let mut craft = Craft::new("lean", PathStyle::Line);
        craft.grind_angle = 10.0;
        let begin = Pose::new(0.0, 0.0, 0.0, 0.0, 0.0, 0.0);
        let end = Pose::new(100.0, 0.0, 0.0, 0.0, 0.0, 0.0);
        let ctx = TiltContext::from_points(&begin, &end, &craft);

        // leaning in opposite directions gives opposite pitch
        assert!((ctx.forward.rot.y + ctx.reverse.rot.y).abs() < 1e-9);
        assert!((ctx.forward.translation.x + ctx.reverse.translation.x).abs() < 1e-9);
    }

    #[test]
    fn test_identity() {
        let tilt = Tilt::identity(Vector3::new(1.0, 2.0, 3.0));
        let p = tilt.place(&Vector3::new(4.0, 5.0, 6.0));
        assert_eq!(p, Pose::new(4.0, 5.0, 6.0, 1.0, 2.0, 3.0));
    }
}
