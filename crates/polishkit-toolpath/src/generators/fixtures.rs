//! Shared taught-point layouts for generator tests.

use super::PathContext;
use crate::label::PointKind;
use crate::point_set::PointSet;
use crate::profile::MotionProfile;
use crate::tilt::TiltContext;
use polishkit_core::{Craft, PathStyle, Pose};

/// Boundary arc of radius 100 around the Z axis from 0° to 90°, tool
/// pointing down, with offset points chosen for the style family.
pub struct Fixture {
    pub points: PointSet,
    pub craft: Craft,
    pub tilt: TiltContext,
    pub profile: MotionProfile,
}

fn on_circle(radius: f64, deg: f64, z: f64) -> Pose {
    around(0.0, 0.0, radius, deg, z)
}

fn around(cx: f64, cy: f64, radius: f64, deg: f64, z: f64) -> Pose {
    let a = deg.to_radians();
    Pose::new(cx + radius * a.cos(), cy + radius * a.sin(), z, 180.0, 0.0, 0.0)
}

impl Fixture {
    pub fn new(style: PathStyle, offset_count: u32) -> Self {
        let boundary = [
            on_circle(100.0, 0.0, 0.0),
            on_circle(100.0, 22.5, 0.0),
            on_circle(100.0, 45.0, 0.0),
            on_circle(100.0, 67.5, 0.0),
            on_circle(100.0, 90.0, 0.0),
        ];
        Self::with_boundary(style, offset_count, boundary)
    }

    /// Two arcs with different centers meeting at (0, 100): the quarter
    /// circle above, then a radius 50 arc about (0, 150) curving the other
    /// way to (-50, 150).
    pub fn s_curve(style: PathStyle, offset_count: u32) -> Self {
        let boundary = [
            on_circle(100.0, 0.0, 0.0),
            on_circle(100.0, 45.0, 0.0),
            on_circle(100.0, 90.0, 0.0),
            around(0.0, 150.0, 50.0, -135.0, 0.0),
            around(0.0, 150.0, 50.0, 180.0, 0.0),
        ];
        Self::with_boundary(style, offset_count, boundary)
    }

    fn with_boundary(style: PathStyle, offset_count: u32, boundary: [Pose; 5]) -> Self {
        let mut points = PointSet::new();
        points.record(PointKind::Safe, Pose::new(0.0, 0.0, 300.0, 180.0, 0.0, 0.0));
        points.record(PointKind::Begin, boundary[0]);
        points.record(PointKind::End, boundary[4]);
        for mid in &boundary[1..4] {
            points.record(PointKind::Mid, *mid);
        }
        points.record(PointKind::Aux, Pose::new(80.0, 30.0, 0.0, 180.0, 0.0, 0.0));

        if style.is_cylinder() {
            points.record(PointKind::BeginOffset, on_circle(100.0, 0.0, 50.0));
        } else {
            points.record(PointKind::BeginOffset, on_circle(60.0, 0.0, 0.0));
        }
        points.record(PointKind::EndOffset, on_circle(60.0, 90.0, 0.0));

        let mut craft = Craft::new("fixture", style);
        craft.offset_count = offset_count;

        let tilt = TiltContext::from_points(
            points.pose(PointKind::Begin).expect("begin recorded"),
            points.pose(PointKind::End).expect("end recorded"),
            &craft,
        );

        Self {
            points,
            craft,
            tilt,
            profile: MotionProfile::default(),
        }
    }

    pub fn with_craft(mut self, edit: impl FnOnce(&mut Craft)) -> Self {
        edit(&mut self.craft);
        self.tilt = TiltContext::from_points(
            self.points.pose(PointKind::Begin).expect("begin recorded"),
            self.points.pose(PointKind::End).expect("end recorded"),
            &self.craft,
        );
        self
    }

    pub fn ctx(&self) -> PathContext<'_> {
        PathContext::new(&self.points, &self.craft, &self.tilt, &self.profile)
    }
}
