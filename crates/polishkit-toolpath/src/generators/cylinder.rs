//! Cylinder styles. The boundary arc is a cross-section of the cylinder and
//! the begin offset point lies along its axis. The tool is held normal to
//! the surface at every way-point instead of keeping the taught orientation.

use super::arc_chain::ArcChain;
use super::{owning_arc, PathContext};
use crate::label::PointKind;
use crate::motion::{arcs_through, MotionSink};
use crate::tilt::Tilt;
use nalgebra::Vector3;
use polishkit_core::geometry::{
    angle_between, circumcenter, normal_aligned_orientation, unit, unit_or_zero,
};
use polishkit_core::{Pose, Result, Surface};

/// Tool frame on the surface: the disc faces `normal` and its X axis follows
/// the arc axis.
fn surface_tilt(
    ctx: &PathContext<'_>,
    radial: &Vector3<f64>,
    cylinder_axis: &Vector3<f64>,
    arc_axis: &Vector3<f64>,
    surface: Surface,
    lean_dir: Option<&Vector3<f64>>,
) -> Result<Tilt> {
    let across = cylinder_axis.cross(&-radial).cross(cylinder_axis);
    let normal = unit(&across, "surface normal")? * surface.sign();
    let rot = normal_aligned_orientation(&normal, arc_axis)?;

    let dir = match lean_dir {
        Some(dir) => *dir,
        None => {
            let dir = unit_or_zero(&normal.cross(arc_axis));
            if ctx.craft.mirror {
                -dir
            } else {
                dir
            }
        }
    };
    Ok(Tilt::compute(
        &rot,
        &dir,
        ctx.craft.disc_radius,
        ctx.craft.grind_angle,
    ))
}

fn oriented(axis: Vector3<f64>, surface: Surface, mirror: bool) -> Vector3<f64> {
    let axis = axis * surface.sign();
    if mirror {
        -axis
    } else {
        axis
    }
}

/// Arcs around the cylinder, reversing each pass and drifting one step
/// along the axis on the way back.
pub fn cylinder_horizontal(
    ctx: &PathContext<'_>,
    sink: &mut dyn MotionSink,
    surface: Surface,
) -> Result<Pose> {
    let begin = ctx.point(PointKind::Begin)?;
    let begin_offset = ctx.point(PointKind::BeginOffset)?;
    let boundary = ctx.boundary()?;
    let cylinder_axis = unit(&(begin_offset.pos - begin.pos), "cylinder axis")?;

    let mut windows = Vec::new();
    for w in boundary.windows(3).step_by(2) {
        let center = circumcenter(&w[0], &w[1], &w[2])?;
        let normal = unit(&(w[1] - w[0]).cross(&(w[2] - w[0])), "arc plane normal")?;
        windows.push((center, oriented(normal, surface, ctx.craft.mirror)));
    }

    let last = boundary.len() - 1;
    let mut tilts = Vec::with_capacity(boundary.len());
    let mut cumulative = Vec::with_capacity(boundary.len());
    let mut length = 0.0;
    for (k, p) in boundary.iter().enumerate() {
        let (center, arc_axis) = windows[owning_arc(k, windows.len())];
        if k > 0 {
            let a = boundary[k - 1] - center;
            let b = p - center;
            length += angle_between(&a, &b) * a.norm();
        }
        cumulative.push(length);
        tilts.push(surface_tilt(
            ctx,
            &(p - center),
            &cylinder_axis,
            &arc_axis,
            surface,
            None,
        )?);
    }

    let pass_step = if ctx.craft.offset_count == 0 {
        Vector3::zeros()
    } else {
        (begin_offset.pos - begin.pos) / ctx.count()
    };
    let drift = |k: usize| {
        if length > 0.0 {
            pass_step * (cumulative[k] / length)
        } else {
            Vector3::zeros()
        }
    };
    let place = |k: usize, shift: Vector3<f64>| tilts[k].place(&(boundary[k] + shift));

    let path = ctx.path();
    let start = place(last, Vector3::zeros());
    sink.move_linear(&ctx.lift(&start), ctx.approach());
    sink.move_linear(&start, ctx.cut_in());

    let mut exit = start;
    for pass in 0..=ctx.craft.offset_count {
        let shift = pass_step * f64::from(pass);
        let back: Vec<Pose> = (0..last).rev().map(|k| place(k, shift)).collect();
        arcs_through(sink, &back, path);

        let last_pass = pass == ctx.craft.offset_count;
        let forth: Vec<Pose> = (1..=last)
            .map(|k| {
                if last_pass {
                    place(k, shift)
                } else {
                    place(k, shift + drift(k))
                }
            })
            .collect();
        if let Some(target) = arcs_through(sink, &forth, path) {
            exit = target;
        }
    }
    Ok(exit)
}

/// Strokes along the cylinder axis, linked by arcs around it.
pub fn cylinder_vertical(
    ctx: &PathContext<'_>,
    sink: &mut dyn MotionSink,
    surface: Surface,
) -> Result<Pose> {
    let begin = ctx.point(PointKind::Begin)?;
    let begin_offset = ctx.point(PointKind::BeginOffset)?;
    let offset = begin_offset.pos - begin.pos;
    let cylinder_axis = unit(&offset, "cylinder axis")?;

    let chain = ArcChain::through(&ctx.boundary()?)?;
    let samples = if ctx.craft.offset_count == 0 {
        vec![chain.sample_at(0.0)?]
    } else {
        chain.sample(2 * ctx.craft.offset_count as usize)?
    };

    let mut ups = Vec::with_capacity(samples.len());
    let mut downs = Vec::with_capacity(samples.len());
    let mut vias = Vec::with_capacity(samples.len());
    for sample in &samples {
        let arc_axis = oriented(
            chain.segments()[sample.segment].axis,
            surface,
            ctx.craft.mirror,
        );
        let tilt = surface_tilt(
            ctx,
            &sample.radial,
            &cylinder_axis,
            &arc_axis,
            surface,
            Some(&cylinder_axis),
        )?;
        let down = sample.point + offset;
        ups.push(tilt.place(&sample.point));
        downs.push(tilt.place(&down));
        vias.push(tilt.place(&((sample.point + down) / 2.0)));
    }

    let path = ctx.path();
    sink.move_linear(&ctx.lift(&downs[0]), ctx.approach());
    sink.move_linear(&downs[0], ctx.cut_in());

    let count = ctx.craft.offset_count as usize;
    for i in 0..=count {
        sink.move_linear(&ups[2 * i], path);
        if i != count {
            sink.move_circular(&vias[2 * i + 1], &downs[2 * i + 2], path);
        }
    }
    let exit = downs[2 * count];
    sink.move_linear(&exit, path);
    Ok(exit)
}
