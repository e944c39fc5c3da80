//! Run lifecycle and outcome.

use polishkit_core::Pose;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Phase of the motion task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RunState {
    /// No run in progress
    #[default]
    Idle,
    /// Moving to the safe point and the path entry
    Approaching,
    /// Configuring and spinning up the head
    HeadSpinUp,
    /// Executing the polishing path
    OnPath,
    /// Lifting off and returning to the safe point
    Retracting,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Approaching => write!(f, "approaching"),
            Self::HeadSpinUp => write!(f, "head spin-up"),
            Self::OnPath => write!(f, "on path"),
            Self::Retracting => write!(f, "retracting"),
        }
    }
}

/// Outcome of one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Run id, also recorded on the run's tracing span
    pub id: Uuid,
    /// Craft that was run
    pub craft: String,
    /// Moves sent to the robot
    pub issued: usize,
    /// Moves dropped after a stop
    pub suppressed: usize,
    /// Moves the robot rejected
    pub failed: usize,
    /// Pose the path finished at, before lifting off
    pub exit: Pose,
    /// Whether a stop was requested during the run
    pub cancelled: bool,
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "run {} ({}): {} moves issued, {} suppressed, {} failed{}",
            self.id,
            self.craft,
            self.issued,
            self.suppressed,
            self.failed,
            if self.cancelled { ", cancelled" } else { "" }
        )
    }
}
