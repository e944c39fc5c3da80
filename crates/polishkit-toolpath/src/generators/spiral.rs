//! Looping arcs advancing along the begin→end line.
//!
//! The line is cut into `2 × (count + 2)` equal parts. Each loop runs
//! forward two parts over a bulge on the auxiliary side, then back one part
//! under a smaller bulge on the other side.

use super::PathContext;
use crate::label::PointKind;
use crate::motion::MotionSink;
use nalgebra::Vector3;
use polishkit_core::geometry::{circumcenter, unit};
use polishkit_core::{Pose, Result};

pub fn spiral_line(ctx: &PathContext<'_>, sink: &mut dyn MotionSink) -> Result<Pose> {
    let begin = ctx.point(PointKind::Begin)?;
    let end = ctx.point(PointKind::End)?;
    let aux = ctx.point(PointKind::Aux)?;
    let forward = &ctx.tilt.forward;
    let params = ctx.path();

    let size = ctx.craft.offset_count + 1;
    let f = 1.0 / f64::from(2 * size + 2);
    let along = |t: f64| Pose::scale(begin, end, t).pos;

    let point_end = along(4.0 * f);
    let center = circumcenter(&begin.pos, &aux.pos, &point_end)?;
    let point_aux = along(2.0 * f);

    let temp = point_aux - center;
    let up: Vector3<f64> = unit(&temp, "loop radius")? * (begin.pos - center).norm() - temp;
    let down = temp * -0.5;

    sink.move_circular(
        &forward.place(&(point_aux + up)),
        &forward.place(&point_end),
        params,
    );
    let mut exit = forward.place(&point_end);

    for i in 1..size {
        let i = f64::from(i);
        sink.move_circular(
            &forward.place(&(along((2.0 * i + 1.0) * f) + down)),
            &forward.place(&along(2.0 * i * f)),
            params,
        );
        exit = forward.place(&along((2.0 * i + 4.0) * f));
        sink.move_circular(
            &forward.place(&(along((2.0 * i + 2.0) * f) + up)),
            &exit,
            params,
        );
    }

    Ok(exit)
}
