//! In-process back-ends
//!
//! `SimulatedRobot` executes every move instantly, tracks the TCP pose as
//! the last target and records each command. `SimulatedHead` records every
//! register write. Clones share their state, so a test can keep a handle
//! while the controller owns another.

use crate::head::{HeadAdapter, HeadCommand, HeadMode, HeadStatus};
use crate::robot::{AdapterResult, RobotAdapter, RobotCommand};
use polishkit_core::{thread_safe, AdapterError, Pose, ThreadSafe};
use polishkit_toolpath::MotionParams;
use tracing::{debug, trace};

#[derive(Debug, Default)]
struct RobotState {
    address: Option<String>,
    pose: Pose,
    commands: Vec<RobotCommand>,
    teaching: bool,
    pose_failure: Option<String>,
    busy_polls: u32,
}

/// Robot arm that executes moves instantly
#[derive(Debug, Clone, Default)]
pub struct SimulatedRobot {
    state: ThreadSafe<RobotState>,
}

impl SimulatedRobot {
    /// Disconnected robot resting at the origin
    pub fn new() -> Self {
        Self::default()
    }

    /// Connected robot resting at `pose`
    pub fn connected_at(pose: Pose) -> Self {
        let robot = Self::new();
        {
            let mut state = robot.state.lock();
            state.address = Some("simulated".to_string());
            state.pose = pose;
        }
        robot
    }

    /// Move the TCP without recording a command, as a hand-guided arm would
    pub fn jog_to(&self, pose: Pose) {
        self.state.lock().pose = pose;
    }

    /// Make pose reads fail with `reason`, or succeed again with `None`
    pub fn fail_pose_reads(&self, reason: Option<&str>) {
        self.state.lock().pose_failure = reason.map(str::to_string);
    }

    /// Report moving for the next `polls` calls to `is_moving`
    pub fn stay_busy_for(&self, polls: u32) {
        self.state.lock().busy_polls = polls;
    }

    /// Every recorded command
    pub fn commands(&self) -> Vec<RobotCommand> {
        self.state.lock().commands.clone()
    }

    /// Number of recorded motion commands
    pub fn motion_count(&self) -> usize {
        self.state.lock().commands.iter().filter(|c| c.is_motion()).count()
    }

    /// Whether free-drive is active
    pub fn is_teaching(&self) -> bool {
        self.state.lock().teaching
    }

    fn record_motion(&self, command: RobotCommand) -> AdapterResult<()> {
        let mut state = self.state.lock();
        if state.address.is_none() {
            return Err(AdapterError::NotConnected {
                device: "robot".to_string(),
            });
        }
        if let Some(target) = command.target() {
            state.pose = *target;
        }
        trace!("Simulated robot: {:?}", command);
        state.commands.push(command);
        Ok(())
    }
}

impl RobotAdapter for SimulatedRobot {
    fn name(&self) -> &str {
        "simulated"
    }

    fn connect(&self, address: &str) -> AdapterResult<()> {
        if address.trim().is_empty() {
            return Err(AdapterError::ConnectFailed {
                address: address.to_string(),
                reason: "empty address".to_string(),
            });
        }
        debug!("Simulated robot connected at {}", address);
        self.state.lock().address = Some(address.to_string());
        Ok(())
    }

    fn current_tcp_pose(&self) -> AdapterResult<Pose> {
        let state = self.state.lock();
        if state.address.is_none() {
            return Err(AdapterError::NotConnected {
                device: "robot".to_string(),
            });
        }
        match &state.pose_failure {
            Some(reason) => Err(AdapterError::PoseUnavailable {
                reason: reason.clone(),
            }),
            None => Ok(state.pose),
        }
    }

    fn move_linear(&self, target: &Pose, params: MotionParams) -> AdapterResult<()> {
        self.record_motion(RobotCommand::Linear {
            target: *target,
            params,
        })
    }

    fn move_circular(
        &self,
        via: &Pose,
        target: &Pose,
        params: MotionParams,
    ) -> AdapterResult<()> {
        self.record_motion(RobotCommand::Circular {
            via: *via,
            target: *target,
            params,
        })
    }

    fn is_moving(&self) -> bool {
        let mut state = self.state.lock();
        if state.busy_polls > 0 {
            state.busy_polls -= 1;
            true
        } else {
            false
        }
    }

    fn is_enabled(&self) -> bool {
        self.state.lock().address.is_some()
    }

    fn is_powered_on(&self) -> bool {
        self.state.lock().address.is_some()
    }

    fn stop(&self) -> AdapterResult<()> {
        let mut state = self.state.lock();
        state.busy_polls = 0;
        state.commands.push(RobotCommand::Stop);
        Ok(())
    }

    fn reset(&self) -> AdapterResult<()> {
        self.state.lock().commands.push(RobotCommand::Reset);
        Ok(())
    }

    fn teach_mode_toggle(&self, reference_position: f64) -> AdapterResult<bool> {
        let mut state = self.state.lock();
        state.teaching = !state.teaching;
        state
            .commands
            .push(RobotCommand::TeachToggle(reference_position));
        Ok(state.teaching)
    }

    fn end_teach_mode(&self) -> AdapterResult<bool> {
        let mut state = self.state.lock();
        let was_teaching = state.teaching;
        state.teaching = false;
        state.commands.push(RobotCommand::EndTeach);
        Ok(was_teaching)
    }
}

#[derive(Debug, Default)]
struct HeadState {
    address: Option<String>,
    writes: Vec<HeadCommand>,
    status: HeadStatus,
    position: i32,
}

/// Polishing head that records register writes
#[derive(Debug, Clone, Default)]
pub struct SimulatedHead {
    state: ThreadSafe<HeadState>,
}

impl SimulatedHead {
    pub fn new() -> Self {
        Self {
            state: thread_safe(HeadState::default()),
        }
    }

    /// Every recorded register write
    pub fn writes(&self) -> Vec<HeadCommand> {
        self.state.lock().writes.clone()
    }

    /// Forget recorded writes
    pub fn clear_writes(&self) {
        self.state.lock().writes.clear();
    }

    /// Set the extension reported by `read_position`
    pub fn set_position(&self, units: i32) {
        self.state.lock().position = units;
    }

    fn write(&self, command: HeadCommand) -> AdapterResult<()> {
        let mut state = self.state.lock();
        if state.address.is_none() {
            return Err(AdapterError::NotConnected {
                device: "head".to_string(),
            });
        }
        match &command {
            HeadCommand::Reset => state.status = state.status.with(HeadStatus::FAULT, false),
            HeadCommand::Enable => state.status = state.status.with(HeadStatus::ENABLED, true),
            HeadCommand::RotationSpeed(rpm) => {
                state.status = state.status.with(HeadStatus::ROTATING, *rpm > 0.0)
            }
            HeadCommand::TargetPosition(units) => state.position = *units,
            _ => {}
        }
        trace!("Simulated head: {:?}", command);
        state.writes.push(command);
        Ok(())
    }
}

impl HeadAdapter for SimulatedHead {
    fn name(&self) -> &str {
        "simulated"
    }

    fn connect(&self, address: &str) -> AdapterResult<()> {
        if address.trim().is_empty() {
            return Err(AdapterError::ConnectFailed {
                address: address.to_string(),
                reason: "empty address".to_string(),
            });
        }
        debug!("Simulated head connected at {}", address);
        self.state.lock().address = Some(address.to_string());
        Ok(())
    }

    fn reset(&self) -> AdapterResult<()> {
        self.write(HeadCommand::Reset)
    }

    fn enable(&self) -> AdapterResult<()> {
        self.write(HeadCommand::Enable)
    }

    fn set_mode(&self, mode: HeadMode) -> AdapterResult<()> {
        self.write(HeadCommand::Mode(mode))
    }

    fn set_load_weight(&self, kg: f64) -> AdapterResult<()> {
        self.write(HeadCommand::LoadWeight(kg))
    }

    fn set_rotation_speed(&self, rpm: f64) -> AdapterResult<()> {
        self.write(HeadCommand::RotationSpeed(rpm))
    }

    fn set_touch_force(&self, newtons: f64) -> AdapterResult<()> {
        self.write(HeadCommand::TouchForce(newtons))
    }

    fn set_ramp_time(&self, ms: u32) -> AdapterResult<()> {
        self.write(HeadCommand::RampTime(ms))
    }

    fn set_target_force(&self, newtons: f64) -> AdapterResult<()> {
        self.write(HeadCommand::TargetForce(newtons))
    }

    fn set_target_position(&self, units: i32) -> AdapterResult<()> {
        self.write(HeadCommand::TargetPosition(units))
    }

    fn read_status(&self) -> AdapterResult<HeadStatus> {
        Ok(self.state.lock().status)
    }

    fn read_position(&self) -> AdapterResult<i32> {
        let state = self.state.lock();
        if state.address.is_none() {
            return Err(AdapterError::NotConnected {
                device: "head".to_string(),
            });
        }
        Ok(state.position)
    }
}
