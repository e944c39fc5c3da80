//! Cartesian tool pose.

use super::rotation::tool_axis_direction;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign};

/// One of the three axes of the tool frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToolAxis {
    /// Tool X axis
    X,
    /// Tool Y axis
    Y,
    /// Tool Z axis, pointing out of the flange towards the workpiece
    Z,
}

impl ToolAxis {
    /// Unit vector of this axis in the tool frame
    pub fn unit(self) -> Vector3<f64> {
        match self {
            ToolAxis::X => Vector3::x(),
            ToolAxis::Y => Vector3::y(),
            ToolAxis::Z => Vector3::z(),
        }
    }
}

/// Tool center point pose
///
/// Position in millimeters, orientation as roll/pitch/yaw in degrees
/// composed as `Rz * Ry * Rx`. Poses are plain values; every operation
/// returns a new pose.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// Position in mm
    pub pos: Vector3<f64>,
    /// Orientation (rx, ry, rz) in degrees
    pub rot: Vector3<f64>,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            pos: Vector3::zeros(),
            rot: Vector3::zeros(),
        }
    }
}

impl Pose {
    /// Create a pose from six coordinates
    pub fn new(x: f64, y: f64, z: f64, rx: f64, ry: f64, rz: f64) -> Self {
        debug_assert!(
            x.is_finite()
                && y.is_finite()
                && z.is_finite()
                && rx.is_finite()
                && ry.is_finite()
                && rz.is_finite(),
            "Pose coordinates must be finite: x={x}, y={y}, z={z}, rx={rx}, ry={ry}, rz={rz}"
        );
        Self {
            pos: Vector3::new(x, y, z),
            rot: Vector3::new(rx, ry, rz),
        }
    }

    /// Create a pose from a position and an orientation
    pub fn from_parts(pos: Vector3<f64>, rot: Vector3<f64>) -> Self {
        Self { pos, rot }
    }

    /// Create a pose from `[x, y, z, rx, ry, rz]`
    pub fn from_coordinates(c: [f64; 6]) -> Self {
        Self::new(c[0], c[1], c[2], c[3], c[4], c[5])
    }

    /// The six coordinates `[x, y, z, rx, ry, rz]`
    pub fn coordinates(&self) -> [f64; 6] {
        [
            self.pos.x, self.pos.y, self.pos.z, self.rot.x, self.rot.y, self.rot.z,
        ]
    }

    /// Translate the pose by `distance` along one of its own tool axes.
    ///
    /// Orientation is unchanged. Negative distances along Z back the tool
    /// away from the workpiece.
    pub fn offset_along_tool(&self, axis: ToolAxis, distance: f64) -> Self {
        Self {
            pos: self.pos + tool_axis_direction(axis, &self.rot) * distance,
            rot: self.rot,
        }
    }

    /// Linear interpolation of position from `a` towards `b`.
    ///
    /// The orientation is copied from `a`; it is not interpolated.
    pub fn scale(a: &Pose, b: &Pose, t: f64) -> Self {
        Self {
            pos: a.pos + (b.pos - a.pos) * t,
            rot: a.rot,
        }
    }

    /// Same position with another orientation
    pub fn with_rot(&self, rot: Vector3<f64>) -> Self {
        Self { pos: self.pos, rot }
    }

    /// Same orientation at another position
    pub fn with_pos(&self, pos: Vector3<f64>) -> Self {
        Self { pos, rot: self.rot }
    }

    /// Check that all coordinates are finite
    pub fn is_finite(&self) -> bool {
        self.coordinates().iter().all(|c| c.is_finite())
    }
}

impl Add<Vector3<f64>> for Pose {
    type Output = Pose;

    fn add(self, rhs: Vector3<f64>) -> Pose {
        Pose {
            pos: self.pos + rhs,
            rot: self.rot,
        }
    }
}

impl AddAssign<Vector3<f64>> for Pose {
    fn add_assign(&mut self, rhs: Vector3<f64>) {
        self.pos += rhs;
    }
}

impl fmt::Display for Pose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.3}、{:.3}、{:.3}、{:.3}、{:.3}、{:.3}",
            self.pos.x, self.pos.y, self.pos.z, self.rot.x, self.rot.y, self.rot.z
        )
    }
}
