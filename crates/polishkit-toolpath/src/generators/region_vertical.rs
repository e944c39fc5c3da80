//! Strokes running across the boundary arc, from the boundary inward to
//! the offset depth and back.
//!
//! The boundary is sampled evenly by arc length; every sample gives an
//! outer point on the boundary and an inner point moved towards its arc
//! center. Each stroke leans along its own direction.

use super::arc_chain::ArcChain;
use super::PathContext;
use crate::label::PointKind;
use crate::motion::{MotionParams, MotionSink};
use crate::tilt::Tilt;
use polishkit_core::geometry::unit;
use polishkit_core::{Pose, Result, ToolAxis};

/// Outer and inner end of every stroke, already tilted
struct Strokes {
    up: Vec<Pose>,
    down: Vec<Pose>,
}

impl Strokes {
    fn plan(ctx: &PathContext<'_>) -> Result<Self> {
        let begin = ctx.point(PointKind::Begin)?;
        let begin_offset = ctx.point(PointKind::BeginOffset)?;

        let (ups, downs) = if ctx.craft.offset_count == 0 {
            (vec![begin.pos], vec![begin_offset.pos])
        } else {
            let chain = ArcChain::through(&ctx.boundary()?)?;
            let first = chain.first();
            let depth = first.radius - (begin_offset.pos - first.center).norm();

            let samples = chain.sample(ctx.craft.offset_count as usize)?;
            let mut ups = Vec::with_capacity(samples.len());
            let mut downs = Vec::with_capacity(samples.len());
            for sample in samples {
                let center = sample.point - sample.radial;
                let radius = sample.radial.norm();
                let inward = unit(&sample.radial, "arc radius")?;
                ups.push(sample.point);
                downs.push(center + inward * (radius - depth));
            }
            (ups, downs)
        };

        let mut strokes = Strokes {
            up: Vec::with_capacity(ups.len()),
            down: Vec::with_capacity(downs.len()),
        };
        for (up, down) in ups.iter().zip(&downs) {
            let tilt = Tilt::compute(
                &begin.rot,
                &(down - up),
                ctx.craft.disc_radius,
                ctx.craft.grind_angle,
            );
            strokes.up.push(tilt.place(up));
            strokes.down.push(tilt.place(down));
        }
        Ok(strokes)
    }
}

/// Strokes out to the boundary and back in, with optional float cycles.
pub fn region_arc_vertical(ctx: &PathContext<'_>, sink: &mut dyn MotionSink) -> Result<Pose> {
    let strokes = Strokes::plan(ctx)?;
    let segments = strokes.down.len() - 1;
    let interval = segments.div_ceil(ctx.craft.raise_count as usize + 1);
    let path = ctx.path();

    sink.move_linear(&ctx.lift(&strokes.down[0]), ctx.approach());

    for (i, (down, up)) in strokes.down.iter().zip(&strokes.up).enumerate() {
        let params = if i == 0 { ctx.cut_in() } else { path };
        sink.move_linear(down, params);
        if interval > 0 && i != 0 && i != segments && i % interval == 0 {
            float_cycle(ctx, sink, down);
        }
        sink.move_linear(up, path);
    }

    let exit = strokes.down[segments];
    sink.move_linear(&exit, path);
    Ok(exit)
}

/// Every stroke is polished down, up and down again.
pub fn region_arc_vertical_repeat(
    ctx: &PathContext<'_>,
    sink: &mut dyn MotionSink,
) -> Result<Pose> {
    let strokes = Strokes::plan(ctx)?;
    let path = ctx.path();

    sink.move_linear(&ctx.lift(&strokes.down[0]), ctx.approach());

    let mut exit = strokes.down[0];
    for (i, (down, up)) in strokes.down.iter().zip(&strokes.up).enumerate() {
        let params = if i == 0 { ctx.cut_in() } else { path };
        sink.move_linear(down, params);
        sink.move_linear(up, path);
        sink.move_linear(down, path);
        exit = *down;
    }
    Ok(exit)
}

/// Lift off, bob the disc `float_count` times and set it back down.
///
/// Every bob dips one float step towards the part and returns to the lifted
/// pose.
fn float_cycle(ctx: &PathContext<'_>, sink: &mut dyn MotionSink, at: &Pose) {
    let params: MotionParams = ctx.cut_in();
    let lifted = ctx.lift(at);
    let dipped = lifted.offset_along_tool(ToolAxis::Z, ctx.profile.float_step_mm);
    sink.move_linear(&lifted, params);
    for _ in 0..ctx.craft.float_count {
        sink.move_linear(&dipped, params);
        sink.move_linear(&lifted, params);
    }
    sink.move_linear(
        &lifted.offset_along_tool(ToolAxis::Z, -ctx.profile.lift_offset_mm),
        params,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::fixtures::Fixture;
    use crate::motion::Trajectory;
    use nalgebra::Vector3;
    use polishkit_core::PathStyle;

    #[test]
    fn test_strokes_span_boundary_to_offset_depth() {
        let fx = Fixture::new(PathStyle::RegionArcVertical, 4);
        let strokes = Strokes::plan(&fx.ctx()).unwrap();
        assert_eq!(strokes.up.len(), 5);
        for (up, down) in strokes.up.iter().zip(&strokes.down) {
            assert!((up.pos.norm() - 100.0).abs() < 1e-9);
            assert!((down.pos.norm() - 60.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_vertical_move_counts() {
        let fx = Fixture::new(PathStyle::RegionArcVertical, 4);
        let mut t = Trajectory::new();
        let exit = region_arc_vertical(&fx.ctx(), &mut t).unwrap();

        // approach, 5 down/up pairs, exit
        assert_eq!(t.linear_count(), 12);
        assert_eq!(t.circular_count(), 0);
        assert!((exit.pos - Vector3::new(0.0, 60.0, 0.0)).norm() < 1e-9);
    }

    #[test]
    fn test_float_cycles_between_strokes() {
        let fx = Fixture::new(PathStyle::RegionArcVertical, 4).with_craft(|c| {
            c.raise_count = 1;
            c.float_count = 2;
        });
        let mut t = Trajectory::new();
        region_arc_vertical(&fx.ctx(), &mut t).unwrap();

        // one cycle at stroke 2: lift, 2 × (up, down), set down
        assert_eq!(t.linear_count(), 12 + 6);
        // the cycle lifts off the inner point of stroke 2
        let lifted = t.motions()[6].target();
        assert!((lifted.pos.z - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_float_cycle_returns_to_lifted_pose() {
        let fx = Fixture::new(PathStyle::RegionArcVertical, 4).with_craft(|c| {
            c.raise_count = 1;
            c.float_count = 2;
        });
        let mut t = Trajectory::new();
        region_arc_vertical(&fx.ctx(), &mut t).unwrap();

        let targets: Vec<&Pose> = t.motions().iter().map(|m| m.target()).collect();
        let stroke = *targets[5];
        let lifted = fx.profile.lift(&stroke);
        let dipped = lifted.offset_along_tool(ToolAxis::Z, fx.profile.float_step_mm);
        let expected = [lifted, dipped, lifted, dipped, lifted, stroke];

        for (i, want) in expected.iter().enumerate() {
            let got = targets[6 + i];
            assert!((got.pos - want.pos).norm() < 1e-9, "move {}: {}", 6 + i, got);
            assert!((got.rot - want.rot).norm() < 1e-9);
        }
        assert!((dipped.pos.z - 20.0).abs() < 1e-9);
        assert!(stroke.pos.z.abs() < 1e-9);
        // the stroke resumes outward from where the cycle set down
        assert!((targets[12].pos.norm() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_repeat_polishes_each_stroke_twice() {
        let fx = Fixture::new(PathStyle::RegionArcVerticalRepeat, 2);
        let mut t = Trajectory::new();
        region_arc_vertical_repeat(&fx.ctx(), &mut t).unwrap();
        assert_eq!(t.linear_count(), 1 + 3 * 3);
    }

    #[test]
    fn test_zero_offset_count_single_stroke() {
        let fx = Fixture::new(PathStyle::RegionArcVertical, 0);
        let mut t = Trajectory::new();
        let exit = region_arc_vertical(&fx.ctx(), &mut t).unwrap();
        assert_eq!(t.linear_count(), 4);
        assert!((exit.pos - Vector3::new(60.0, 0.0, 0.0)).norm() < 1e-9);
    }
}
