//! Machine-wide motion constants.

use crate::motion::MotionParams;
use polishkit_core::{Craft, Pose, ToolAxis};
use serde::{Deserialize, Serialize};

/// Speeds, accelerations and offsets shared by every path style
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionProfile {
    /// Velocity for transit moves (safe point, approach, retract)
    pub default_velocity: f64,
    /// Acceleration for transit and cut-in moves
    pub approach_acceleration: f64,
    /// Acceleration for moves along the polishing path
    pub path_acceleration: f64,
    /// Lift-off distance along tool Z, negative moves away from the part
    pub lift_offset_mm: f64,
    /// Step of one float perturbation along tool Z
    pub float_step_mm: f64,
    /// Blend radius used by "move to point"
    pub point_blend_radius: f64,
    /// Presses longer than this delete the last midpoint
    pub mid_delete_threshold_ms: u64,
    /// Interval of the robot idle poll
    pub poll_interval_ms: u64,
}

impl Default for MotionProfile {
    fn default() -> Self {
        Self {
            default_velocity: 200.0,
            approach_acceleration: 2000.0,
            path_acceleration: 100.0,
            lift_offset_mm: -30.0,
            float_step_mm: 10.0,
            point_blend_radius: 1.0,
            mid_delete_threshold_ms: 500,
            poll_interval_ms: 100,
        }
    }
}

impl MotionProfile {
    /// Parameters for transit moves
    pub fn approach(&self, craft: &Craft) -> MotionParams {
        MotionParams::new(
            self.default_velocity,
            self.approach_acceleration,
            craft.transition_radius,
        )
    }

    /// Parameters for moving onto and off the surface
    pub fn cut_in(&self, craft: &Craft) -> MotionParams {
        MotionParams::new(
            craft.cut_in_speed,
            self.approach_acceleration,
            craft.transition_radius,
        )
    }

    /// Parameters for moves along the polishing path
    pub fn path(&self, craft: &Craft) -> MotionParams {
        MotionParams::new(
            craft.move_speed,
            self.path_acceleration,
            craft.transition_radius,
        )
    }

    /// Parameters for "move to point"
    pub fn point_to_point(&self) -> MotionParams {
        MotionParams::new(
            self.default_velocity,
            self.approach_acceleration,
            self.point_blend_radius,
        )
    }

    /// `pose` lifted off the surface
    pub fn lift(&self, pose: &Pose) -> Pose {
        pose.offset_along_tool(ToolAxis::Z, self.lift_offset_mm)
    }

    /// Check that the profile can drive a robot
    pub fn validate(&self) -> Result<(), String> {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !positive(self.default_velocity) {
            return Err("Default velocity must be > 0".to_string());
        }
        if !positive(self.approach_acceleration) || !positive(self.path_acceleration) {
            return Err("Accelerations must be > 0".to_string());
        }
        if !self.lift_offset_mm.is_finite() || !self.float_step_mm.is_finite() {
            return Err("Offsets must be finite".to_string());
        }
        if self.poll_interval_ms == 0 {
            return Err("Poll interval must be > 0".to_string());
        }
        Ok(())
    }
}
