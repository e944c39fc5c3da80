//! Move commands and the sinks that receive them.

use polishkit_core::Pose;

/// Speed, acceleration and blending of one move
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionParams {
    /// Cartesian velocity
    pub velocity: f64,
    /// Cartesian acceleration
    pub acceleration: f64,
    /// Blend radius into the next move, mm
    pub blend_radius: f64,
}

impl MotionParams {
    /// Creates motion parameters.
    pub fn new(velocity: f64, acceleration: f64, blend_radius: f64) -> Self {
        Self {
            velocity,
            acceleration,
            blend_radius,
        }
    }
}

/// A single Cartesian move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Motion {
    /// Straight line to `target`
    Linear {
        /// End pose
        target: Pose,
        /// Speed and blending
        params: MotionParams,
    },
    /// Circular arc through `via` to `target`
    Circular {
        /// Intermediate pose on the arc
        via: Pose,
        /// End pose
        target: Pose,
        /// Speed and blending
        params: MotionParams,
    },
}

impl Motion {
    /// End pose of the move
    pub fn target(&self) -> &Pose {
        match self {
            Motion::Linear { target, .. } | Motion::Circular { target, .. } => target,
        }
    }

    /// Speed and blending of the move
    pub fn params(&self) -> &MotionParams {
        match self {
            Motion::Linear { params, .. } | Motion::Circular { params, .. } => params,
        }
    }

    /// Whether this is a linear move
    pub fn is_linear(&self) -> bool {
        matches!(self, Motion::Linear { .. })
    }
}

/// Receiver of the moves a generator emits
pub trait MotionSink {
    /// Linear move to `target`
    fn move_linear(&mut self, target: &Pose, params: MotionParams);

    /// Circular move through `via` to `target`
    fn move_circular(&mut self, via: &Pose, target: &Pose, params: MotionParams);
}

/// Emit circular moves through consecutive `(via, target)` pairs.
///
/// Returns the last target, `None` when fewer than two way-points are given.
/// A trailing unpaired way-point is ignored.
pub fn arcs_through(
    sink: &mut dyn MotionSink,
    waypoints: &[Pose],
    params: MotionParams,
) -> Option<Pose> {
    let mut last = None;
    for pair in waypoints.chunks_exact(2) {
        sink.move_circular(&pair[0], &pair[1], params);
        last = Some(pair[1]);
    }
    last
}

/// A complete, ordered list of moves.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trajectory {
    motions: Vec<Motion>,
}

impl Trajectory {
    /// Creates a new empty trajectory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves in emission order
    pub fn motions(&self) -> &[Motion] {
        &self.motions
    }

    /// Number of moves
    pub fn len(&self) -> usize {
        self.motions.len()
    }

    /// Whether no move was emitted
    pub fn is_empty(&self) -> bool {
        self.motions.is_empty()
    }

    /// Number of linear moves
    pub fn linear_count(&self) -> usize {
        self.motions.iter().filter(|m| m.is_linear()).count()
    }

    /// Number of circular moves
    pub fn circular_count(&self) -> usize {
        self.motions.len() - self.linear_count()
    }

    /// Target of the last move
    pub fn last_target(&self) -> Option<&Pose> {
        self.motions.last().map(Motion::target)
    }

    /// Sum of straight-line distances between consecutive targets.
    ///
    /// Arcs are measured through their via point.
    pub fn chord_length(&self) -> f64 {
        let mut length = 0.0;
        let mut prev: Option<&Pose> = None;
        for motion in &self.motions {
            if let Some(p) = prev {
                length += match motion {
                    Motion::Linear { target, .. } => (target.pos - p.pos).norm(),
                    Motion::Circular { via, target, .. } => {
                        (via.pos - p.pos).norm() + (target.pos - via.pos).norm()
                    }
                };
            }
            prev = Some(motion.target());
        }
        length
    }

    /// Replay every move into another sink
    pub fn replay(&self, sink: &mut dyn MotionSink) {
        for motion in &self.motions {
            match motion {
                Motion::Linear { target, params } => sink.move_linear(target, *params),
                Motion::Circular {
                    via,
                    target,
                    params,
                } => sink.move_circular(via, target, *params),
            }
        }
    }
}

impl MotionSink for Trajectory {
    fn move_linear(&mut self, target: &Pose, params: MotionParams) {
        self.motions.push(Motion::Linear {
            target: *target,
            params,
        });
    }

    fn move_circular(&mut self, via: &Pose, target: &Pose, params: MotionParams) {
        self.motions.push(Motion::Circular {
            via: *via,
            target: *target,
            params,
        });
    }
}

impl IntoIterator for Trajectory {
    type Item = Motion;
    type IntoIter = std::vec::IntoIter<Motion>;

    fn into_iter(self) -> Self::IntoIter {
        self.motions.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pose(x: f64) -> Pose {
        Pose::new(x, 0.0, 0.0, 0.0, 0.0, 0.0)
    }

    #[test]
    fn test_arcs_through_pairs() {
        let mut t = Trajectory::new();
        let params = MotionParams::new(80.0, 100.0, 0.0);
        let last = arcs_through(&mut t, &[pose(1.0), pose(2.0), pose(3.0), pose(4.0)], params);
        assert_eq!(last, Some(pose(4.0)));
        assert_eq!(t.circular_count(), 2);
        assert_eq!(
            t.motions()[1],
            Motion::Circular {
                via: pose(3.0),
                target: pose(4.0),
                params
            }
        );
    }

    #[test]
    fn test_arcs_through_too_short() {
        let mut t = Trajectory::new();
        let params = MotionParams::new(80.0, 100.0, 0.0);
        assert_eq!(arcs_through(&mut t, &[pose(1.0)], params), None);
        assert!(t.is_empty());
    }

    #[test]
    fn test_chord_length_and_replay() {
        let params = MotionParams::new(80.0, 100.0, 0.0);
        let mut t = Trajectory::new();
        t.move_linear(&pose(0.0), params);
        t.move_linear(&pose(10.0), params);
        t.move_circular(&pose(15.0), &pose(20.0), params);
        assert!((t.chord_length() - 20.0).abs() < 1e-12);
        assert_eq!(t.linear_count(), 2);

        let mut copy = Trajectory::new();
        t.replay(&mut copy);
        assert_eq!(copy, t);
        assert_eq!(copy.last_target(), Some(&pose(20.0)));
    }
}
