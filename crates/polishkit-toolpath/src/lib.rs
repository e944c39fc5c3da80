//! # PolishKit Toolpath
//!
//! Turns taught robot poses into polishing trajectories.
//!
//! ## Core Components
//!
//! ### Point Capture
//! - **Point Set**: Named taught points plus an ordered midpoint list, with
//!   record/unrecord toggling, cover-by-label and completeness checks
//! - **Labels**: `name：x、y、z、rx、ry、rz` strings shown to the operator and
//!   parsed back for "cover" and "move to point"
//!
//! ### Trajectory Generation
//! - **Tilt**: Lean the disc by the grind angle and shift the way-points so
//!   the rim keeps contact
//! - **Generators**: One per path style (arc, line, region arcs, cylinders,
//!   zig-zag, spiral)
//! - **Motion**: Linear and circular moves sent to a [`MotionSink`], or
//!   collected into a [`Trajectory`] for inspection
//!
//! ## Architecture
//!
//! ```text
//! PointSet ──┐
//! Craft ─────┼── PathContext ── generate() ──> MotionSink
//! Profile ───┤                                  ├── Trajectory
//! TiltContext┘                                  └── robot adapter
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use polishkit_toolpath::{plan, MotionProfile, PointSet};
//!
//! let planned = plan(&points, &craft, &MotionProfile::default())?;
//! println!("{} moves, ending at {}", planned.trajectory.len(), planned.exit);
//! ```

pub mod generators;
pub mod label;
pub mod motion;
pub mod point_set;
pub mod profile;
pub mod tilt;

pub use generators::arc_chain::{ArcChain, ArcSample, ArcSegment};
pub use generators::{generate, PathContext};
pub use label::{format_label, parse_coordinates, parse_point_ref, PointKind, PointRef};
pub use motion::{arcs_through, Motion, MotionParams, MotionSink, Trajectory};
pub use point_set::{Capture, MidCapture, PointSet, TaughtPoint, DEFAULT_LIFT_OFFSET};
pub use profile::MotionProfile;
pub use tilt::{Tilt, TiltContext};

use polishkit_core::{Craft, Pose, Result};

/// Moves of one run and the pose the path finished at
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedPath {
    /// Path moves, excluding the safe-point transits around them
    pub trajectory: Trajectory,
    /// Pose to lift off from
    pub exit: Pose,
    /// Tilts used for the run
    pub tilt: TiltContext,
}

/// Validate the points for the craft's style and generate its path.
///
/// Nothing is emitted when the points are incomplete or degenerate.
pub fn plan(points: &PointSet, craft: &Craft, profile: &MotionProfile) -> Result<PlannedPath> {
    points.check_all_points(craft.way)?;
    let begin = points.require(PointKind::Begin)?;
    let end = points.require(PointKind::End)?;
    let tilt = TiltContext::from_points(begin, end, craft);

    let ctx = PathContext::new(points, craft, &tilt, profile);
    let mut trajectory = Trajectory::new();
    let exit = generate(&ctx, &mut trajectory)?;

    Ok(PlannedPath {
        trajectory,
        exit,
        tilt,
    })
}
