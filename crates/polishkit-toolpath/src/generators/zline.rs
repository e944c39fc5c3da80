//! Zig-zag between the begin→end line and the same line shifted by the
//! auxiliary offset.

use super::PathContext;
use crate::label::PointKind;
use crate::motion::MotionSink;
use polishkit_core::{Pose, Result};

pub fn zline(ctx: &PathContext<'_>, sink: &mut dyn MotionSink) -> Result<Pose> {
    let begin = ctx.point(PointKind::Begin)?;
    let end = ctx.point(PointKind::End)?;
    let aux = ctx.point(PointKind::Aux)?;
    let forward = &ctx.tilt.forward;
    let params = ctx.path();

    let size = ctx.craft.offset_count + 1;
    let offset = aux.pos - begin.pos;
    let mut point = *begin;

    for i in 1..=size {
        point += offset;
        sink.move_linear(&forward.place(&point.pos), params);
        point = Pose::scale(begin, end, f64::from(i) / f64::from(size));
        sink.move_linear(&forward.place(&point.pos), params);
    }

    ctx.default_exit()
}
