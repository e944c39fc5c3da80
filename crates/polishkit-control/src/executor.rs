//! Forwarding planned moves to the robot.

use crate::cancel::CancelToken;
use crate::compensation::ToolCompensation;
use polishkit_communication::RobotAdapter;
use polishkit_core::Pose;
use polishkit_toolpath::{MotionParams, MotionSink};
use tracing::{debug, warn};

/// Move counters of one execution
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveCounts {
    /// Moves accepted by the robot
    pub issued: usize,
    /// Moves skipped because the token was cancelled
    pub suppressed: usize,
    /// Moves the robot rejected
    pub failed: usize,
}

/// `MotionSink` that compensates targets and sends them to the robot.
///
/// Every move checks the token first; once cancelled, the remaining moves
/// are counted and dropped.
pub struct RobotExecutor<'a> {
    robot: &'a dyn RobotAdapter,
    cancel: &'a CancelToken,
    compensation: ToolCompensation,
    counts: MoveCounts,
}

impl<'a> RobotExecutor<'a> {
    pub fn new(
        robot: &'a dyn RobotAdapter,
        cancel: &'a CancelToken,
        compensation: ToolCompensation,
    ) -> Self {
        Self {
            robot,
            cancel,
            compensation,
            counts: MoveCounts::default(),
        }
    }

    pub fn counts(&self) -> MoveCounts {
        self.counts
    }

    fn suppressed(&mut self) -> bool {
        if self.cancel.is_cancelled() {
            self.counts.suppressed += 1;
            if self.counts.suppressed == 1 {
                debug!("Stop requested, suppressing remaining moves");
            }
            true
        } else {
            false
        }
    }

    fn tally(&mut self, result: polishkit_communication::AdapterResult<()>) {
        match result {
            Ok(()) => self.counts.issued += 1,
            Err(e) => {
                warn!("Robot rejected move: {}", e);
                self.counts.failed += 1;
            }
        }
    }
}

impl MotionSink for RobotExecutor<'_> {
    fn move_linear(&mut self, target: &Pose, params: MotionParams) {
        if self.suppressed() {
            return;
        }
        let target = self.compensation.commanded(target);
        let result = self.robot.move_linear(&target, params);
        self.tally(result);
    }

    fn move_circular(&mut self, via: &Pose, target: &Pose, params: MotionParams) {
        if self.suppressed() {
            return;
        }
        let via = self.compensation.commanded(via);
        let target = self.compensation.commanded(target);
        let result = self.robot.move_circular(&via, &target, params);
        self.tally(result);
    }
}
