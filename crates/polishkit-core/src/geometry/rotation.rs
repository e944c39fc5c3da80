//! Rotation conversions between roll/pitch/yaw degrees, matrices and axis-angle.

use super::pose::ToolAxis;
use crate::error::GeometryError;
use nalgebra::{Matrix3, Rotation3, Unit, Vector3};

/// Below this `sy` the decomposition is treated as gimbal locked.
pub const GIMBAL_EPSILON: f64 = 1e-6;

/// Shortest axis accepted for an axis-angle rotation.
pub const AXIS_EPSILON: f64 = 1e-12;

/// Rotation matrix `Rz(rz) * Ry(ry) * Rx(rx)` for an orientation in degrees
pub fn euler_to_matrix(rot: &Vector3<f64>) -> Matrix3<f64> {
    Rotation3::from_euler_angles(rot.x.to_radians(), rot.y.to_radians(), rot.z.to_radians())
        .into_inner()
}

/// Rotation of `angle_deg` degrees about `axis` (need not be normalized)
pub fn axis_angle_to_matrix(
    axis: &Vector3<f64>,
    angle_deg: f64,
) -> Result<Matrix3<f64>, GeometryError> {
    let axis = Unit::try_new(*axis, AXIS_EPSILON).ok_or_else(|| GeometryError::ZeroLength {
        what: "rotation axis".to_string(),
    })?;
    Ok(Rotation3::from_axis_angle(&axis, angle_deg.to_radians()).into_inner())
}

/// Decompose a rotation matrix into roll/pitch/yaw degrees.
///
/// When `sqrt(m00² + m10²)` drops below [`GIMBAL_EPSILON`] the yaw is fixed
/// at zero and the remaining rotation is assigned to roll.
pub fn matrix_to_euler(m: &Matrix3<f64>) -> Vector3<f64> {
    let sy = (m[(0, 0)] * m[(0, 0)] + m[(1, 0)] * m[(1, 0)]).sqrt();

    let (x, y, z) = if sy >= GIMBAL_EPSILON {
        (
            m[(2, 1)].atan2(m[(2, 2)]),
            (-m[(2, 0)]).atan2(sy),
            m[(1, 0)].atan2(m[(0, 0)]),
        )
    } else {
        ((-m[(1, 2)]).atan2(m[(1, 1)]), (-m[(2, 0)]).atan2(sy), 0.0)
    };

    Vector3::new(x.to_degrees(), y.to_degrees(), z.to_degrees())
}

/// Direction of a tool axis in the base frame for the given orientation
pub fn tool_axis_direction(axis: ToolAxis, rot: &Vector3<f64>) -> Vector3<f64> {
    euler_to_matrix(rot) * axis.unit()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_vec_eq(a: &Vector3<f64>, b: &Vector3<f64>, tol: f64) {
        assert!((a - b).norm() < tol, "{a:?} != {b:?}");
    }

    #[test]
    fn test_euler_to_matrix_order() {
        let rot = Vector3::new(90.0, 0.0, 90.0);
        let z = tool_axis_direction(ToolAxis::Z, &rot);
        // Rx(90) * z = -y, Rz(90) * -y = x
        assert_vec_eq(&z, &Vector3::new(1.0, 0.0, 0.0), 1e-12);
    }

    #[test]
    fn test_round_trip() {
        let rot = Vector3::new(12.5, -40.0, 135.0);
        let back = matrix_to_euler(&euler_to_matrix(&rot));
        assert_vec_eq(&back, &rot, 1e-9);
    }

    #[test]
    fn test_gimbal_lock_zeroes_yaw() {
        let rot = Vector3::new(30.0, 90.0, 20.0);
        let m = euler_to_matrix(&rot);
        let back = matrix_to_euler(&m);
        assert_eq!(back.z, 0.0);
        assert!((back.y - 90.0).abs() < 1e-6);
        // Same rotation even though the angles differ
        assert!((euler_to_matrix(&back) - m).norm() < 1e-6);
    }

    #[test]
    fn test_axis_angle() {
        let m = axis_angle_to_matrix(&Vector3::new(0.0, 0.0, 2.0), 90.0).unwrap();
        assert_vec_eq(&(m * Vector3::x()), &Vector3::y(), 1e-12);
    }

    #[test]
    fn test_axis_angle_zero_axis() {
        assert!(matches!(
            axis_angle_to_matrix(&Vector3::zeros(), 10.0),
            Err(GeometryError::ZeroLength { .. })
        ));
    }
}
