use nalgebra::Vector3;
use polishkit_core::geometry::{
    circumcenter, euler_to_matrix, matrix_to_euler, spherecenter, tilt_compensation_offset,
    tilted_orientation, tool_axis_direction,
};
use polishkit_core::{Pose, ToolAxis};
use proptest::prelude::*;

fn axis_strategy() -> impl Strategy<Value = ToolAxis> {
    prop_oneof![Just(ToolAxis::X), Just(ToolAxis::Y), Just(ToolAxis::Z)]
}

fn pose_strategy() -> impl Strategy<Value = Pose> {
    (
        -2000.0..2000.0f64,
        -2000.0..2000.0f64,
        -2000.0..2000.0f64,
        -180.0..180.0f64,
        -180.0..180.0f64,
        -180.0..180.0f64,
    )
        .prop_map(|(x, y, z, rx, ry, rz)| Pose::new(x, y, z, rx, ry, rz))
}

fn point_strategy() -> impl Strategy<Value = Vector3<f64>> {
    (-1000.0..1000.0f64, -1000.0..1000.0f64, -1000.0..1000.0f64)
        .prop_map(|(x, y, z)| Vector3::new(x, y, z))
}

proptest! {
    #[test]
    fn offset_along_tool_round_trips(
        pose in pose_strategy(),
        axis in axis_strategy(),
        d in -500.0..500.0f64,
    ) {
        let back = pose.offset_along_tool(axis, d).offset_along_tool(axis, -d);
        prop_assert!((back.pos - pose.pos).norm() < 1e-9);
        prop_assert_eq!(back.rot, pose.rot);
    }

    #[test]
    fn euler_round_trips_away_from_gimbal_lock(
        rx in -179.0..179.0f64,
        ry in -89.0..89.0f64,
        rz in -179.0..179.0f64,
    ) {
        let rot = Vector3::new(rx, ry, rz);
        let back = matrix_to_euler(&euler_to_matrix(&rot));
        prop_assert!((back - rot).norm() < 1e-7, "{:?} -> {:?}", rot, back);
    }

    #[test]
    fn circumcenter_is_equidistant(
        a in point_strategy(),
        b in point_strategy(),
        c in point_strategy(),
    ) {
        let ab = b - a;
        let ac = c - a;
        // keep well-conditioned triangles only
        prop_assume!(ab.cross(&ac).norm() > 1e-2 * ab.norm() * ac.norm());
        prop_assume!(ab.norm() > 1.0 && ac.norm() > 1.0);

        let o = circumcenter(&a, &b, &c).unwrap();
        let ra = (a - o).norm();
        prop_assert!(((b - o).norm() - ra).abs() < 1e-6 * ra.max(1.0));
        prop_assert!(((c - o).norm() - ra).abs() < 1e-6 * ra.max(1.0));
    }

    #[test]
    fn tilt_keeps_rim_point(
        pose in pose_strategy(),
        dir in point_strategy(),
        radius in 1.0..100.0f64,
        angle in -30.0..30.0f64,
    ) {
        let z = tool_axis_direction(ToolAxis::Z, &pose.rot);
        let in_plane = dir - z * z.dot(&dir);
        prop_assume!(in_plane.norm() > 1.0);
        prop_assume!(pose.rot.y.abs() < 85.0);

        let u = in_plane.normalize();
        let rim_before = pose.pos + u * radius;

        let tilted = tilted_orientation(&pose.rot, &dir, angle);
        let offset = tilt_compensation_offset(&pose.rot, &dir, radius, angle);
        let rim_tool = euler_to_matrix(&pose.rot).transpose() * (u * radius);
        let rim_after = pose.pos + offset + euler_to_matrix(&tilted) * rim_tool;

        prop_assert!((rim_after - rim_before).norm() < 1e-6);
    }
}

#[test]
fn spherecenter_reference_quadruple() {
    let a = Vector3::new(1428.600, 1075.290, 1689.900);
    let b = Vector3::new(1261.610, -8.888, 1967.420);
    let c = Vector3::new(1143.090, 1136.160, 1084.010);
    let d = Vector3::new(812.207, -596.970, 1014.130);

    let s = spherecenter(&a, &b, &c, &d).unwrap();
    let r = (a - s).norm();
    assert!(((b - s).norm() - r).abs() < 1e-5);
    assert!(((c - s).norm() - r).abs() < 1e-5);
    assert!(((d - s).norm() - r).abs() < 1e-5);
}
