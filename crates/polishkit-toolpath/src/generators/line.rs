//! Single-pass styles: straight segments or arcs through the midpoints.

use super::PathContext;
use crate::label::PointKind;
use crate::motion::{arcs_through, MotionSink};
use polishkit_core::{Pose, Result};

/// Linear moves through every midpoint, then to the end point.
pub fn line(ctx: &PathContext<'_>, sink: &mut dyn MotionSink) -> Result<Pose> {
    let end = ctx.point(PointKind::End)?;
    let forward = &ctx.tilt.forward;
    let params = ctx.path();

    for mid in ctx.points.mid_points() {
        sink.move_linear(&forward.place(&mid.pos), params);
    }

    let exit = forward.place(&end.pos);
    sink.move_linear(&exit, params);
    Ok(exit)
}

/// Circular moves through `(mid[0], mid[1])`, `(mid[2], mid[3])`, ... with
/// the last midpoint paired with the end point.
pub fn arc(ctx: &PathContext<'_>, sink: &mut dyn MotionSink) -> Result<Pose> {
    let end = ctx.point(PointKind::End)?;
    let mids = ctx.odd_mid_points()?;
    let forward = &ctx.tilt.forward;

    let waypoints: Vec<Pose> = mids
        .iter()
        .chain(std::iter::once(end))
        .map(|p| forward.place(&p.pos))
        .collect();

    let exit = arcs_through(sink, &waypoints, ctx.path());
    match exit {
        Some(exit) => Ok(exit),
        None => ctx.default_exit(),
    }
}
