//! Region arcs swept back and forth between the boundary arc and its
//! offset.
//!
//! The first pass runs along the taught arc. Every following pass shifts the
//! midpoints by one step and alternates direction; the pass ends move two
//! steps at a time because each end is only visited every other pass. The
//! reverse pass ends start beyond the offset points so they land on them
//! after the shifts.

use super::PathContext;
use crate::label::PointKind;
use crate::motion::{arcs_through, MotionSink};
use nalgebra::Vector3;
use polishkit_core::geometry::reject;
use polishkit_core::{GeometryError, Pose, Result};

/// Per-pass displacement of the pass ends and of every midpoint
struct Steps {
    begin: Vector3<f64>,
    end: Vector3<f64>,
    mids: Vec<Vector3<f64>>,
}

/// Every point moves by the end offset's distance from the begin→end chord.
pub fn region_arc_1(ctx: &PathContext<'_>, sink: &mut dyn MotionSink) -> Result<Pose> {
    let begin = ctx.point(PointKind::Begin)?;
    let end = ctx.point(PointKind::End)?;
    let end_offset = ctx.point(PointKind::EndOffset)?;
    let mids = ctx.odd_mid_points()?;

    let step = per_pass(&reject(&(end_offset.pos - begin.pos), &(end.pos - begin.pos)), ctx);
    let steps = Steps {
        begin: step,
        end: step,
        mids: vec![step; mids.len()],
    };
    sweep(ctx, sink, steps)
}

/// Begin and end move by their own offsets; midpoints blend the two by
/// their distance from the begin point.
pub fn region_arc_2(ctx: &PathContext<'_>, sink: &mut dyn MotionSink) -> Result<Pose> {
    let begin = ctx.point(PointKind::Begin)?;
    let end = ctx.point(PointKind::End)?;
    let begin_offset = ctx.point(PointKind::BeginOffset)?;
    let end_offset = ctx.point(PointKind::EndOffset)?;
    let mids = ctx.odd_mid_points()?;

    let chord = (end.pos - begin.pos).norm();
    if chord == 0.0 {
        return Err(GeometryError::ZeroLength {
            what: "begin to end chord".to_string(),
        }
        .into());
    }

    let begin_step = per_pass(
        &reject(&(begin_offset.pos - end.pos), &(begin.pos - end.pos)),
        ctx,
    );
    let end_step = per_pass(&reject(&(end_offset.pos - begin.pos), &(end.pos - begin.pos)), ctx);

    let mid_steps = mids
        .iter()
        .map(|m| {
            let f = (m.pos - begin.pos).norm() / chord;
            begin_step * (1.0 - f) + end_step * f
        })
        .collect();

    sweep(
        ctx,
        sink,
        Steps {
            begin: begin_step,
            end: end_step,
            mids: mid_steps,
        },
    )
}

fn per_pass(total: &Vector3<f64>, ctx: &PathContext<'_>) -> Vector3<f64> {
    if ctx.craft.offset_count == 0 {
        Vector3::zeros()
    } else {
        total / ctx.count()
    }
}

fn sweep(ctx: &PathContext<'_>, sink: &mut dyn MotionSink, steps: Steps) -> Result<Pose> {
    let begin = ctx.point(PointKind::Begin)?;
    let end = ctx.point(PointKind::End)?;
    let begin_offset = ctx.point(PointKind::BeginOffset)?;
    let end_offset = ctx.point(PointKind::EndOffset)?;
    let mut mids: Vec<Pose> = ctx.odd_mid_points()?.to_vec();

    // lift, reposition and lower between sweeps run at path speed
    let path = ctx.path();
    let lead = ctx.count() + 1.0;

    let mut fwd_begin = *begin;
    let mut fwd_end = *end;
    let mut rev_begin = end_offset.with_pos(end_offset.pos - steps.end * lead);
    let mut rev_end = begin_offset.with_pos(begin_offset.pos - steps.begin * lead);
    let rot_shift = begin_offset.rot - begin.rot;

    let forward = |mids: &[Pose], to: &Pose| -> Vec<Pose> {
        mids.iter().copied().chain(std::iter::once(*to)).collect()
    };
    let reverse = |mids: &[Pose], to: &Pose| -> Vec<Pose> {
        mids.iter()
            .rev()
            .map(|m| m.with_rot(m.rot + rot_shift))
            .chain(std::iter::once(*to))
            .collect()
    };

    let mut exit = arcs_through(sink, &forward(&mids, &fwd_end), path);

    let passes = ctx.craft.offset_count + ctx.craft.add_offset_count;
    for i in 0..passes {
        for (mid, step) in mids.iter_mut().zip(&steps.mids) {
            *mid += *step;
        }

        if i % 2 == 0 {
            sink.move_linear(&ctx.lift(&fwd_end), path);
            rev_begin += steps.end * 2.0;
            rev_end += steps.begin * 2.0;
            sink.move_linear(&ctx.lift(&rev_begin), path);
            sink.move_linear(&rev_begin, path);
            exit = arcs_through(sink, &reverse(&mids, &rev_end), path);
        } else {
            sink.move_linear(&ctx.lift(&rev_end), path);
            fwd_begin += steps.begin * 2.0;
            fwd_end += steps.end * 2.0;
            sink.move_linear(&ctx.lift(&fwd_begin), path);
            sink.move_linear(&fwd_begin, path);
            exit = arcs_through(sink, &forward(&mids, &fwd_end), path);
        }
    }

    match exit {
        Some(exit) => Ok(exit),
        None => ctx.default_exit(),
    }
}
