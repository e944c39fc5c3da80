//! Concentric arcs stepping from the taught boundary towards the arc
//! centers, alternating direction each pass.

use super::{owning_arc, PathContext};
use crate::label::PointKind;
use crate::motion::{arcs_through, MotionSink};
use nalgebra::Vector3;
use polishkit_core::geometry::{circumcenter, unit_or_zero};
use polishkit_core::{Pose, Result};

pub fn region_arc_horizontal(ctx: &PathContext<'_>, sink: &mut dyn MotionSink) -> Result<Pose> {
    let begin_offset = ctx.point(PointKind::BeginOffset)?;
    let boundary = ctx.boundary()?;

    let centers = boundary
        .windows(3)
        .step_by(2)
        .map(|w| circumcenter(&w[0], &w[1], &w[2]))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    // radial distance covered by one pass, measured on the first arc
    let step = match centers.first() {
        Some(c) if ctx.craft.offset_count > 0 => {
            ((boundary[0] - c).norm() - (begin_offset.pos - c).norm()) / ctx.count()
        }
        _ => 0.0,
    };

    let last = boundary.len() - 1;
    let offsets: Vec<Vector3<f64>> = boundary
        .iter()
        .enumerate()
        .map(|(k, p)| {
            let center = centers[owning_arc(k, centers.len())];
            unit_or_zero(&(center - p)) * step
        })
        .collect();
    let at = |k: usize, pass: u32| boundary[k] + offsets[k] * f64::from(pass);

    let forward = &ctx.tilt.forward;
    let reverse = &ctx.tilt.reverse;
    // lift, reposition and lower between passes run at path speed
    let path = ctx.path();
    let mut exit = None;

    for pass in 0..=ctx.craft.offset_count {
        if pass % 2 == 0 {
            if pass > 0 {
                sink.move_linear(&ctx.lift(&reverse.place(&at(0, pass - 1))), path);
                sink.move_linear(&ctx.lift(&forward.place(&at(0, pass))), path);
                sink.move_linear(&forward.place(&at(0, pass)), path);
            }
            let waypoints: Vec<Pose> = (1..=last).map(|k| forward.place(&at(k, pass))).collect();
            exit = arcs_through(sink, &waypoints, path);
        } else {
            sink.move_linear(&ctx.lift(&forward.place(&at(last, pass - 1))), path);
            sink.move_linear(&ctx.lift(&reverse.place(&at(last, pass))), path);
            sink.move_linear(&reverse.place(&at(last, pass)), path);
            let waypoints: Vec<Pose> = (0..last)
                .rev()
                .map(|k| reverse.place(&at(k, pass)))
                .collect();
            exit = arcs_through(sink, &waypoints, path);
        }
    }

    match exit {
        Some(exit) => Ok(exit),
        None => ctx.default_exit(),
    }
}
