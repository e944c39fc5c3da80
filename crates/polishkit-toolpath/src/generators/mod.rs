//! Trajectory generators
//!
//! One generator per [`PathStyle`]. Each reads the taught points and the
//! craft through a [`PathContext`], emits its moves into a [`MotionSink`] and
//! returns the pose it finished at, from which the orchestrator lifts off.
//!
//! Generators compute the geometry they depend on before emitting motion,
//! so degenerate taught points fail early with a [`GeometryError`].
//!
//! [`GeometryError`]: polishkit_core::GeometryError

pub mod arc_chain;
pub mod cylinder;
#[cfg(test)]
mod fixtures;
pub mod line;
pub mod region_arc;
pub mod region_horizontal;
pub mod region_vertical;
pub mod spiral;
pub mod zline;

use crate::label::PointKind;
use crate::motion::{MotionParams, MotionSink};
use crate::point_set::PointSet;
use crate::profile::MotionProfile;
use crate::tilt::TiltContext;
use nalgebra::Vector3;
use polishkit_core::{Craft, PathStyle, PointError, Pose, Result};
use tracing::debug;

/// Everything a generator reads
#[derive(Debug, Clone, Copy)]
pub struct PathContext<'a> {
    /// Taught points
    pub points: &'a PointSet,
    /// Recipe
    pub craft: &'a Craft,
    /// Run-scoped forward/reverse tilt
    pub tilt: &'a TiltContext,
    /// Machine-wide constants
    pub profile: &'a MotionProfile,
}

impl<'a> PathContext<'a> {
    /// Bundle the generator inputs
    pub fn new(
        points: &'a PointSet,
        craft: &'a Craft,
        tilt: &'a TiltContext,
        profile: &'a MotionProfile,
    ) -> Self {
        Self {
            points,
            craft,
            tilt,
            profile,
        }
    }

    /// Recorded named point
    pub fn point(&self, kind: PointKind) -> Result<&'a Pose> {
        Ok(self.points.require(kind)?)
    }

    /// Midpoints, which must be an odd, non-empty list
    pub fn odd_mid_points(&self) -> Result<&'a [Pose]> {
        let mids = self.points.mid_points();
        if mids.is_empty() {
            return Err(PointError::Missing {
                names: vec![PointKind::Mid.display_name().to_string()],
            }
            .into());
        }
        if mids.len() % 2 == 0 {
            return Err(PointError::EvenMidPointCount { count: mids.len() }.into());
        }
        Ok(mids)
    }

    /// Positions `begin, mids..., end`
    pub fn boundary(&self) -> Result<Vec<Vector3<f64>>> {
        let begin = self.point(PointKind::Begin)?;
        let end = self.point(PointKind::End)?;
        let mids = self.odd_mid_points()?;
        Ok(std::iter::once(begin.pos)
            .chain(mids.iter().map(|p| p.pos))
            .chain(std::iter::once(end.pos))
            .collect())
    }

    /// Transit moves
    pub fn approach(&self) -> MotionParams {
        self.profile.approach(self.craft)
    }

    /// Moves onto and off the surface
    pub fn cut_in(&self) -> MotionParams {
        self.profile.cut_in(self.craft)
    }

    /// Moves along the path
    pub fn path(&self) -> MotionParams {
        self.profile.path(self.craft)
    }

    /// `pose` lifted off the surface
    pub fn lift(&self, pose: &Pose) -> Pose {
        self.profile.lift(pose)
    }

    /// Offset count as a float multiplier
    pub fn count(&self) -> f64 {
        f64::from(self.craft.offset_count)
    }

    /// Forward-tilted end point, where styles without their own exit finish
    pub fn default_exit(&self) -> Result<Pose> {
        let end = self.point(PointKind::End)?;
        Ok(self.tilt.forward.place(&end.pos))
    }
}

/// Index of the arc a boundary point belongs to, for a boundary of `arcs`
/// arcs `(p0 p1 p2)`, `(p2 p3 p4)`, ... A junction shared by two arcs
/// belongs to the arc ending there.
pub(crate) fn owning_arc(k: usize, arcs: usize) -> usize {
    (k.saturating_sub(1) / 2).min(arcs.saturating_sub(1))
}

/// Run the generator for the craft's path style.
pub fn generate(ctx: &PathContext<'_>, sink: &mut dyn MotionSink) -> Result<Pose> {
    debug!(
        "Generating {} path with {} midpoints, offset count {}",
        ctx.craft.way,
        ctx.points.mid_points().len(),
        ctx.craft.offset_count
    );

    match ctx.craft.way {
        PathStyle::Arc => line::arc(ctx, sink),
        PathStyle::Line => line::line(ctx, sink),
        PathStyle::RegionArcHorizontal => region_horizontal::region_arc_horizontal(ctx, sink),
        PathStyle::RegionArcVertical => region_vertical::region_arc_vertical(ctx, sink),
        PathStyle::RegionArcVerticalRepeat => {
            region_vertical::region_arc_vertical_repeat(ctx, sink)
        }
        PathStyle::RegionArc1 => region_arc::region_arc_1(ctx, sink),
        PathStyle::RegionArc2 => region_arc::region_arc_2(ctx, sink),
        PathStyle::CylinderHorizontal(surface) => {
            cylinder::cylinder_horizontal(ctx, sink, surface)
        }
        PathStyle::CylinderVertical(surface) => cylinder::cylinder_vertical(ctx, sink, surface),
        PathStyle::ZLine => zline::zline(ctx, sink),
        PathStyle::SpiralLine => spiral::spiral_line(ctx, sink),
    }
}
