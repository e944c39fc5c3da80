//! Geometry kernel
//!
//! Pure math used by the trajectory generators:
//! - [`Pose`] values with tool-relative offsetting and interpolation
//! - Conversions between roll/pitch/yaw degrees, matrices and axis-angle
//! - Circumcenter and sphere-center solving through taught points
//! - Grind-angle tilting and the rim compensation that goes with it
//!
//! Nothing in here performs I/O or keeps state.

pub mod circle;
pub mod pose;
pub mod rotation;
pub mod tilt;

pub use circle::{angle_between, circumcenter, reject, spherecenter, unit, unit_or_zero};
pub use pose::{Pose, ToolAxis};
pub use rotation::{axis_angle_to_matrix, euler_to_matrix, matrix_to_euler, tool_axis_direction};
pub use tilt::{normal_aligned_orientation, tilt_compensation_offset, tilted_orientation};
