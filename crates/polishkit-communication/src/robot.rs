//! Robot arm adapter
//!
//! One trait for every arm vendor. Implementations translate the calls into
//! the vendor's SDK or wire protocol; the controller only sees this
//! interface and picks the back-end at configuration time.
//!
//! All methods take `&self`: adapters are shared between the capture
//! session and the motion task, so they keep their own interior locking.

use polishkit_core::{AdapterError, Pose};
use polishkit_toolpath::MotionParams;

/// Result type for adapter operations
pub type AdapterResult<T> = std::result::Result<T, AdapterError>;

/// Capability set of a six-axis arm
pub trait RobotAdapter: Send + Sync {
    /// Short vendor name for logs
    fn name(&self) -> &str;

    /// Connect to the controller at `address`
    fn connect(&self, address: &str) -> AdapterResult<()>;

    /// Current tool center point pose
    fn current_tcp_pose(&self) -> AdapterResult<Pose>;

    /// Straight-line move to `target`
    fn move_linear(&self, target: &Pose, params: MotionParams) -> AdapterResult<()>;

    /// Circular move through `via` to `target`
    fn move_circular(&self, via: &Pose, target: &Pose, params: MotionParams)
        -> AdapterResult<()>;

    /// Whether a move is still executing
    fn is_moving(&self) -> bool;

    /// Whether the drives are enabled
    fn is_enabled(&self) -> bool;

    /// Whether the arm is powered on
    fn is_powered_on(&self) -> bool;

    /// Abort the current move
    fn stop(&self) -> AdapterResult<()>;

    /// Clear errors after a stop
    fn reset(&self) -> AdapterResult<()>;

    /// Enter or leave free-drive; returns whether teach mode is now active
    fn teach_mode_toggle(&self, reference_position: f64) -> AdapterResult<bool>;

    /// Leave free-drive if active; returns whether it was active
    fn end_teach_mode(&self) -> AdapterResult<bool>;
}

/// A recorded robot command
#[derive(Debug, Clone, PartialEq)]
pub enum RobotCommand {
    /// `move_linear`
    Linear {
        /// Target pose
        target: Pose,
        /// Speed and blending
        params: MotionParams,
    },
    /// `move_circular`
    Circular {
        /// Intermediate pose
        via: Pose,
        /// Target pose
        target: Pose,
        /// Speed and blending
        params: MotionParams,
    },
    /// `stop`
    Stop,
    /// `reset`
    Reset,
    /// `teach_mode_toggle`
    TeachToggle(f64),
    /// `end_teach_mode`
    EndTeach,
}

impl RobotCommand {
    /// Whether this command moves the arm
    pub fn is_motion(&self) -> bool {
        matches!(self, RobotCommand::Linear { .. } | RobotCommand::Circular { .. })
    }

    /// Target of a motion command
    pub fn target(&self) -> Option<&Pose> {
        match self {
            RobotCommand::Linear { target, .. } | RobotCommand::Circular { target, .. } => {
                Some(target)
            }
            _ => None,
        }
    }
}
