//! Grind-angle tilting of the polishing disc.
//!
//! A taught orientation is leaned into the direction of travel by rotating
//! it about `toolZ × moveDirection`. Because the disc has a finite radius,
//! tilting about its center shifts the rim; [`tilt_compensation_offset`]
//! returns the translation that puts the rim point back where it was.

use super::circle::unit;
use super::pose::ToolAxis;
use super::rotation::{euler_to_matrix, matrix_to_euler, tool_axis_direction, AXIS_EPSILON};
use crate::error::GeometryError;
use nalgebra::{Matrix3, Rotation3, Unit, Vector3};

/// Tilt rotation in the base frame, `None` when the travel direction is
/// parallel to the tool axis or zero.
fn tilt_rotation(
    rot: &Vector3<f64>,
    move_dir: &Vector3<f64>,
    angle_deg: f64,
) -> Option<Matrix3<f64>> {
    let dir = move_dir.try_normalize(0.0)?;
    let z = tool_axis_direction(ToolAxis::Z, rot);
    let axis = Unit::try_new(z.cross(&dir), AXIS_EPSILON)?;
    Some(Rotation3::from_axis_angle(&axis, angle_deg.to_radians()).into_inner())
}

/// Orientation leaned by `angle_deg` towards `move_dir`.
///
/// If `move_dir` is zero or parallel to the tool Z axis there is no lean
/// plane and `rot` is returned unchanged.
pub fn tilted_orientation(
    rot: &Vector3<f64>,
    move_dir: &Vector3<f64>,
    angle_deg: f64,
) -> Vector3<f64> {
    match tilt_rotation(rot, move_dir, angle_deg) {
        Some(tilt) => matrix_to_euler(&(tilt * euler_to_matrix(rot))),
        None => *rot,
    }
}

/// Translation that keeps the disc rim fixed when tilting.
///
/// The rim point sits at `radius` from the disc center along `move_dir`
/// projected into the disc plane. Tilting about the center moves it to
/// `R * rim`; adding the returned vector to the center restores it.
pub fn tilt_compensation_offset(
    rot: &Vector3<f64>,
    move_dir: &Vector3<f64>,
    radius: f64,
    angle_deg: f64,
) -> Vector3<f64> {
    let Some(tilt) = tilt_rotation(rot, move_dir, angle_deg) else {
        return Vector3::zeros();
    };

    let z = tool_axis_direction(ToolAxis::Z, rot);
    let in_plane = move_dir - z * z.dot(move_dir);
    let Some(u) = in_plane.try_normalize(0.0) else {
        return Vector3::zeros();
    };

    let rim = u * radius;
    rim - tilt * rim
}

/// Orientation whose tool Z is `normal` and whose tool X follows `aux_axis`.
///
/// `aux_axis` is projected into the plane orthogonal to `normal`, so it only
/// needs to be roughly perpendicular.
pub fn normal_aligned_orientation(
    normal: &Vector3<f64>,
    aux_axis: &Vector3<f64>,
) -> Result<Vector3<f64>, GeometryError> {
    let z = unit(normal, "surface normal")?;
    let x = unit(&(aux_axis - z * z.dot(aux_axis)), "reference axis")?;
    let y = z.cross(&x);
    Ok(matrix_to_euler(&Matrix3::from_columns(&[x, y, z])))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-9;

    #[test]
    fn test_zero_angle_is_identity() {
        let rot = Vector3::new(180.0, 0.0, 30.0);
        let dir = Vector3::new(1.0, 0.0, 0.0);
        let r = tilted_orientation(&rot, &dir, 0.0);
        assert!((euler_to_matrix(&r) - euler_to_matrix(&rot)).norm() < TOL);
        assert!(tilt_compensation_offset(&rot, &dir, 50.0, 0.0).norm() < TOL);
    }

    #[test]
    fn test_tool_axis_leans_into_travel() {
        // Tool Z along +Z, travel along +X
        let rot = Vector3::zeros();
        let dir = Vector3::new(10.0, 0.0, 0.0);
        let r = tilted_orientation(&rot, &dir, 30.0);
        let z = tool_axis_direction(ToolAxis::Z, &r);
        let expected = Vector3::new(30f64.to_radians().sin(), 0.0, 30f64.to_radians().cos());
        assert!((z - expected).norm() < TOL);
    }

    #[test]
    fn test_rim_point_stays_fixed() {
        let rot = Vector3::new(170.0, 5.0, -20.0);
        let dir = Vector3::new(3.0, -4.0, 1.0);
        let radius = 50.0;
        let angle = 12.0;

        let z = tool_axis_direction(ToolAxis::Z, &rot);
        let u = (dir - z * z.dot(&dir)).normalize();
        let center = Vector3::new(100.0, 200.0, 300.0);
        let rim_before = center + u * radius;

        let tilted = euler_to_matrix(&tilted_orientation(&rot, &dir, angle));
        let offset = tilt_compensation_offset(&rot, &dir, radius, angle);
        // rim expressed in the tool frame is unchanged by the tilt
        let rim_tool = euler_to_matrix(&rot).transpose() * (u * radius);
        let rim_after = center + offset + tilted * rim_tool;

        assert!((rim_after - rim_before).norm() < 1e-6);
    }

    #[test]
    fn test_parallel_direction_has_no_tilt() {
        let rot = Vector3::zeros();
        let dir = Vector3::new(0.0, 0.0, -5.0);
        assert_eq!(tilted_orientation(&rot, &dir, 20.0), rot);
        assert_eq!(tilt_compensation_offset(&rot, &dir, 50.0, 20.0), Vector3::zeros());
    }

    #[test]
    fn test_normal_aligned_orientation() {
        let normal = Vector3::new(0.0, 0.0, -2.0);
        let aux = Vector3::new(1.0, 0.0, 0.3);
        let rot = normal_aligned_orientation(&normal, &aux).unwrap();
        let z = tool_axis_direction(ToolAxis::Z, &rot);
        let x = tool_axis_direction(ToolAxis::X, &rot);
        assert!((z - Vector3::new(0.0, 0.0, -1.0)).norm() < TOL);
        assert!((x - Vector3::new(1.0, 0.0, 0.0)).norm() < TOL);
    }

    #[test]
    fn test_normal_aligned_orientation_degenerate() {
        let normal = Vector3::new(0.0, 0.0, 1.0);
        assert!(normal_aligned_orientation(&normal, &Vector3::new(0.0, 0.0, 4.0)).is_err());
        assert!(normal_aligned_orientation(&Vector3::zeros(), &Vector3::x()).is_err());
    }
}
