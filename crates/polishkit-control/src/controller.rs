//! Capture session and motion orchestration.
//!
//! A `PolishController` owns the taught points and drives the robot and the
//! head through their adapters. Captures and point edits happen between
//! runs; a run plans the whole path first, then executes it on the calling
//! thread (or on a blocking task with [`PolishController::spawn_run`]).

use crate::cancel::CancelToken;
use crate::compensation::ToolCompensation;
use crate::executor::RobotExecutor;
use crate::state::{RunReport, RunState};
use parking_lot::Mutex;
use polishkit_communication::{AdapterResult, HeadAdapter, HeadMode, RobotAdapter};
use polishkit_core::{AdapterError, Craft, PathStyle, PointError, Pose, Result};
use polishkit_settings::Config;
use polishkit_toolpath::{
    parse_coordinates, plan, Capture, MidCapture, MotionProfile, MotionSink, PointKind, PointSet,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, info_span, warn};
use uuid::Uuid;

/// Head force while hand-guiding in teach mode, N
const TEACH_TARGET_FORCE: f64 = 200.0;

/// Controller settings taken from the application config
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerOptions {
    /// Motion constants
    pub profile: MotionProfile,
    /// Polishing disc thickness, mm
    pub disc_thickness_mm: f64,
    /// Weight carried by the head, kg
    pub head_load_weight_kg: f64,
    /// Force held by the head while idle, N
    pub head_idle_force: f64,
    /// Teach reference used before teach mode is entered, mm
    pub teach_reference_mm: f64,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for ControllerOptions {
    fn from(config: &Config) -> Self {
        Self {
            profile: config.motion,
            disc_thickness_mm: config.tool.disc_thickness_mm,
            head_load_weight_kg: config.head.load_weight_kg,
            head_idle_force: config.head.idle_force,
            teach_reference_mm: Craft::default().teach_reference_mm,
        }
    }
}

/// Capture session plus motion orchestrator
pub struct PolishController {
    robot: Arc<dyn RobotAdapter>,
    head: Option<Arc<dyn HeadAdapter>>,
    head_connected: AtomicBool,
    options: ControllerOptions,
    points: Mutex<PointSet>,
    teach_reference_mm: Mutex<f64>,
    teaching: AtomicBool,
    cancel: CancelToken,
    state: watch::Sender<RunState>,
}

impl PolishController {
    /// Create a controller. Moves are blocked until a run or point move
    /// releases them.
    pub fn new(
        robot: Arc<dyn RobotAdapter>,
        head: Option<Arc<dyn HeadAdapter>>,
        options: ControllerOptions,
    ) -> Self {
        let (state, _) = watch::channel(RunState::Idle);
        Self {
            robot,
            head,
            head_connected: AtomicBool::new(false),
            points: Mutex::new(PointSet::with_lift_offset(options.profile.lift_offset_mm)),
            teach_reference_mm: Mutex::new(options.teach_reference_mm),
            options,
            teaching: AtomicBool::new(false),
            cancel: CancelToken::cancelled(),
            state,
        }
    }

    /// Receiver of run state changes
    pub fn subscribe(&self) -> watch::Receiver<RunState> {
        self.state.subscribe()
    }

    pub fn run_state(&self) -> RunState {
        *self.state.borrow()
    }

    /// Token checked before every move
    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    /// Snapshot of the taught points
    pub fn points(&self) -> PointSet {
        self.points.lock().clone()
    }

    /// Labels of every recorded point
    pub fn labels(&self) -> Vec<String> {
        self.points.lock().labels()
    }

    pub fn is_teaching(&self) -> bool {
        self.teaching.load(Ordering::SeqCst)
    }

    fn set_state(&self, state: RunState) {
        debug!("Run state: {}", state);
        self.state.send_replace(state);
    }

    fn connected_head(&self) -> Option<&Arc<dyn HeadAdapter>> {
        self.head
            .as_ref()
            .filter(|_| self.head_connected.load(Ordering::SeqCst))
    }

    fn teach_compensation(&self) -> ToolCompensation {
        ToolCompensation::new(*self.teach_reference_mm.lock(), self.options.disc_thickness_mm)
    }

    // ---------------------------------------------------------------------
    // Connection
    // ---------------------------------------------------------------------

    /// Connect the robot arm
    pub fn connect_robot(&self, address: &str) -> bool {
        match self.robot.connect(address) {
            Ok(()) => {
                info!("Connected to {} robot at {}", self.robot.name(), address);
                true
            }
            Err(e) => {
                warn!("Robot connection failed: {}", e);
                false
            }
        }
    }

    /// Connect the head and put it into its idle state
    pub fn connect_head(&self, address: &str) -> bool {
        let Some(head) = &self.head else {
            warn!("No polishing head configured");
            return false;
        };
        if let Err(e) = head.connect(address) {
            warn!("Head connection failed: {}", e);
            return false;
        }

        let options = &self.options;
        let init = || -> AdapterResult<()> {
            head.reset()?;
            head.enable()?;
            head.set_mode(HeadMode::Force)?;
            head.set_load_weight(options.head_load_weight_kg)?;
            head.set_target_force(options.head_idle_force)?;
            head.set_rotation_speed(0.0)
        };
        if let Err(e) = init() {
            warn!("Head initialisation failed: {}", e);
            return false;
        }

        self.head_connected.store(true, Ordering::SeqCst);
        info!("Connected to {} head at {}", head.name(), address);
        true
    }

    // ---------------------------------------------------------------------
    // Capture
    // ---------------------------------------------------------------------

    /// Current disc face pose
    fn read_pose(&self) -> std::result::Result<Pose, AdapterError> {
        let tcp = self.robot.current_tcp_pose()?;
        let head_position = self.connected_head().and_then(|head| match head.read_position() {
            Ok(units) => Some(units),
            Err(e) => {
                warn!("Head position unavailable, using teach reference: {}", e);
                None
            }
        });
        Ok(self.teach_compensation().captured(&tcp, head_position))
    }

    /// Toggle a named point
    pub fn capture(&self, kind: PointKind) -> Capture {
        self.points.lock().capture(kind, || self.read_pose())
    }

    pub fn capture_safe(&self) -> Capture {
        self.capture(PointKind::Safe)
    }

    pub fn capture_begin(&self) -> Capture {
        self.capture(PointKind::Begin)
    }

    pub fn capture_end(&self) -> Capture {
        self.capture(PointKind::End)
    }

    pub fn capture_aux(&self) -> Capture {
        self.capture(PointKind::Aux)
    }

    pub fn capture_begin_offset(&self) -> Capture {
        self.capture(PointKind::BeginOffset)
    }

    pub fn capture_end_offset(&self) -> Capture {
        self.capture(PointKind::EndOffset)
    }

    /// Append a midpoint, or delete the last one on a long press
    pub fn capture_mid(&self, press_duration_ms: u64) -> MidCapture {
        let threshold = self.options.profile.mid_delete_threshold_ms;
        self.points
            .lock()
            .capture_mid(press_duration_ms, threshold, || self.read_pose())
    }

    /// Re-capture the point `label` refers to; returns the new label
    pub fn cover_point(&self, label: &str) -> String {
        self.points.lock().cover(label, || self.read_pose())
    }

    /// Record saved labels, one per line. Blank lines are skipped.
    ///
    /// Returns the number of points restored.
    pub fn restore_labels<'l, I>(&self, labels: I) -> Result<usize>
    where
        I: IntoIterator<Item = &'l str>,
    {
        let mut points = self.points.lock();
        let mut restored = 0;
        for label in labels.into_iter().map(str::trim).filter(|l| !l.is_empty()) {
            let point = points.restore(label)?;
            debug!("Restored {:?}", point);
            restored += 1;
        }
        Ok(restored)
    }

    pub fn clear_all(&self) {
        self.points.lock().clear_all();
    }

    pub fn clear_mid(&self) {
        self.points.lock().clear_mid();
    }

    /// Remove the last midpoint; returns how many remain
    pub fn delete_last_mid(&self) -> usize {
        self.points.lock().delete_last_mid()
    }

    /// Whether `style` can run, and what is missing if not
    pub fn check_all_points(&self, style: PathStyle) -> (bool, Vec<String>) {
        match self.points.lock().check_all_points(style) {
            Ok(()) => (true, Vec::new()),
            Err(PointError::Missing { names }) => (false, names),
            Err(e) => (false, vec![e.to_string()]),
        }
    }

    // ---------------------------------------------------------------------
    // Teach mode
    // ---------------------------------------------------------------------

    /// Enter or leave hand-guiding with the head held at `reference_mm`
    pub fn toggle_teach(&self, reference_mm: f64) -> Result<bool> {
        *self.teach_reference_mm.lock() = reference_mm;

        if let Some(head) = self.connected_head() {
            let units = self.teach_compensation().head_units();
            head.reset()?;
            head.enable()?;
            head.set_mode(HeadMode::Position)?;
            head.set_target_position(units)?;
            head.set_target_force(TEACH_TARGET_FORCE)?;
            head.set_touch_force(0.0)?;
            head.set_ramp_time(0)?;
        }

        let active = self.robot.teach_mode_toggle(reference_mm)?;
        self.teaching.store(active, Ordering::SeqCst);
        info!("Teach mode {}", if active { "on" } else { "off" });
        Ok(active)
    }

    /// Leave hand-guiding if active
    pub fn end_teach(&self) -> Result<bool> {
        let was_active = self.robot.end_teach_mode()?;
        self.teaching.store(false, Ordering::SeqCst);
        Ok(was_active)
    }

    // ---------------------------------------------------------------------
    // Motion
    // ---------------------------------------------------------------------

    /// Stop the robot and the head. Moves still queued by a run are dropped.
    pub fn stop(&self) {
        info!("Stop requested");
        self.cancel.cancel();
        if let Err(e) = self.robot.stop() {
            warn!("Robot stop failed: {}", e);
        }
        if let Some(head) = self.connected_head() {
            if let Err(e) = head.set_rotation_speed(0.0).and_then(|_| head.reset()) {
                warn!("Head stop failed: {}", e);
            }
        }
        if let Err(e) = self.robot.reset() {
            warn!("Robot reset failed: {}", e);
        }
        self.teaching.store(false, Ordering::SeqCst);
    }

    /// Linear move to a label or six coordinates, then wait for the robot
    pub fn move_to_point(&self, target: &str) -> Result<()> {
        let pose = parse_coordinates(target)?;
        let params = self.options.profile.point_to_point();

        self.cancel.reset();
        let counts = {
            let mut exec = RobotExecutor::new(
                self.robot.as_ref(),
                &self.cancel,
                self.teach_compensation(),
            );
            exec.move_linear(&pose, params);
            exec.counts()
        };
        self.wait_idle();
        self.cancel.cancel();

        if counts.failed > 0 {
            return Err(AdapterError::CommandRejected {
                device: self.robot.name().to_string(),
                reason: format!("move to {} failed", pose),
            }
            .into());
        }
        Ok(())
    }

    /// Block until the robot reports it is no longer moving
    fn wait_idle(&self) {
        let interval = Duration::from_millis(self.options.profile.poll_interval_ms);
        while self.robot.is_moving() {
            std::thread::sleep(interval);
        }
    }

    /// Run `craft` on the taught points.
    ///
    /// Incomplete points and degenerate geometry refuse the run before the
    /// robot moves. A stop during the run drops the remaining moves; the
    /// report says how many were issued and how many were dropped.
    pub fn run(&self, craft: &Craft, spin_head: bool) -> Result<RunReport> {
        let id = Uuid::new_v4();
        let span = info_span!("run", id = %id, craft = %craft.name);
        let _guard = span.enter();

        craft.validate()?;
        let (planned, safe, begin) = {
            let points = self.points.lock();
            let planned = plan(&points, craft, &self.options.profile)?;
            let safe = *points.require(PointKind::Safe)?;
            let begin = *points.require(PointKind::Begin)?;
            (planned, safe, begin)
        };
        info!(
            "Starting {} run: {} planned moves",
            craft.way,
            planned.trajectory.len()
        );

        if self.is_teaching() {
            if let Err(e) = self.end_teach() {
                warn!("Failed to end teach mode: {}", e);
            }
        }

        let profile = &self.options.profile;
        let approach = profile.approach(craft);
        let compensation =
            ToolCompensation::new(craft.teach_reference_mm, self.options.disc_thickness_mm);

        self.cancel.reset();
        let mut exec = RobotExecutor::new(self.robot.as_ref(), &self.cancel, compensation);

        self.set_state(RunState::Approaching);
        exec.move_linear(&safe, approach);

        self.set_state(RunState::HeadSpinUp);
        if let Some(head) = self.connected_head() {
            if let Err(e) = self.start_head(head.as_ref(), craft, spin_head, &compensation) {
                warn!("Head set-up failed: {}", e);
            }
        }

        // Entry is part of the path, as for styles that enter inside their
        // own trajectory.
        self.set_state(RunState::OnPath);
        if !craft.way.has_own_entry() {
            let entry = if craft.way.enters_untilted() {
                begin
            } else {
                planned.tilt.forward.place(&begin.pos)
            };
            exec.move_linear(&profile.lift(&entry), approach);
            exec.move_linear(&entry, profile.cut_in(craft));
        }
        planned.trajectory.replay(&mut exec);

        self.set_state(RunState::Retracting);
        exec.move_linear(&profile.lift(&planned.exit), profile.cut_in(craft));
        exec.move_linear(&safe, approach);
        let counts = exec.counts();

        self.wait_idle();
        if spin_head {
            if let Some(head) = self.connected_head() {
                if let Err(e) = head.set_rotation_speed(0.0) {
                    warn!("Head spin-down failed: {}", e);
                }
            }
        }

        let cancelled = self.cancel.is_cancelled();
        self.cancel.cancel();
        self.set_state(RunState::Idle);

        let report = RunReport {
            id,
            craft: craft.name.clone(),
            issued: counts.issued,
            suppressed: counts.suppressed,
            failed: counts.failed,
            exit: planned.exit,
            cancelled,
        };
        info!("{}", report);
        Ok(report)
    }

    fn start_head(
        &self,
        head: &dyn HeadAdapter,
        craft: &Craft,
        spin: bool,
        compensation: &ToolCompensation,
    ) -> AdapterResult<()> {
        head.reset()?;
        head.enable()?;
        head.set_mode(craft.mode.into())?;
        head.set_rotation_speed(if spin { craft.rotate_speed } else { 0.0 })?;
        head.set_touch_force(craft.contact_force)?;
        head.set_ramp_time(craft.transition_time_ms)?;
        head.set_target_force(craft.setting_force)?;
        head.set_target_position(compensation.head_units())
    }

    /// Run `craft` on a blocking task
    pub fn spawn_run(
        self: &Arc<Self>,
        craft: Craft,
        spin_head: bool,
    ) -> JoinHandle<Result<RunReport>> {
        let controller = Arc::clone(self);
        tokio::task::spawn_blocking(move || controller.run(&craft, spin_head))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polishkit_communication::{HeadCommand, RobotCommand, SimulatedHead, SimulatedRobot};

    fn controller() -> (PolishController, SimulatedRobot, SimulatedHead) {
        let robot = SimulatedRobot::connected_at(Pose::new(0.0, 0.0, 100.0, 180.0, 0.0, 0.0));
        let head = SimulatedHead::new();
        let controller = PolishController::new(
            Arc::new(robot.clone()),
            Some(Arc::new(head.clone())),
            ControllerOptions::default(),
        );
        (controller, robot, head)
    }

    #[test]
    fn test_capture_applies_teach_reference() {
        let (controller, _, _) = controller();
        let capture = controller.capture_safe();
        assert!(capture.recorded);
        // tool Z points down, 7 mm teach reference
        let safe = *controller.points().pose(PointKind::Safe).unwrap();
        assert!((safe.pos.z - 93.0).abs() < 1e-9);
        assert!(capture.label.starts_with("安全点：0.000、0.000、93.000"));
    }

    #[test]
    fn test_capture_uses_head_extension_when_connected() {
        let (controller, _, head) = controller();
        assert!(controller.connect_head("10.0.0.3"));
        head.set_position(1000);
        controller.capture_begin();
        let begin = *controller.points().pose(PointKind::Begin).unwrap();
        assert!((begin.pos.z - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_head_init_sequence() {
        let (controller, _, head) = controller();
        assert!(controller.connect_head("10.0.0.3"));
        assert_eq!(
            head.writes(),
            vec![
                HeadCommand::Reset,
                HeadCommand::Enable,
                HeadCommand::Mode(HeadMode::Force),
                HeadCommand::LoadWeight(22.0),
                HeadCommand::TargetForce(20.0),
                HeadCommand::RotationSpeed(0.0),
            ]
        );
    }

    #[test]
    fn test_connect_head_without_head() {
        let robot = SimulatedRobot::new();
        let controller =
            PolishController::new(Arc::new(robot), None, ControllerOptions::default());
        assert!(!controller.connect_head("10.0.0.3"));
    }

    #[test]
    fn test_capture_mid_long_press_deletes() {
        let (controller, _, _) = controller();
        assert_eq!(controller.capture_mid(100).count, 1);
        assert_eq!(controller.capture_mid(100).count, 2);
        let deleted = controller.capture_mid(800);
        assert_eq!(deleted.count, 1);
        assert!(deleted.label.is_empty());
    }

    #[test]
    fn test_check_all_points_reports_missing_names() {
        let (controller, _, _) = controller();
        controller.capture_safe();
        controller.capture_begin();
        controller.capture_end();

        assert_eq!(controller.check_all_points(PathStyle::Line), (true, vec![]));
        let (ok, missing) = controller.check_all_points(PathStyle::Arc);
        assert!(!ok);
        assert_eq!(missing, vec!["中间点".to_string()]);
    }

    #[test]
    fn test_teach_toggle_sets_head_position() {
        let (controller, robot, head) = controller();
        controller.connect_head("10.0.0.3");
        head.clear_writes();

        assert!(controller.toggle_teach(6.5).unwrap());
        assert!(controller.is_teaching());
        assert!(head.writes().contains(&HeadCommand::TargetPosition(650)));
        assert!(head.writes().contains(&HeadCommand::Mode(HeadMode::Position)));
        assert_eq!(robot.commands(), vec![RobotCommand::TeachToggle(6.5)]);

        assert!(controller.end_teach().unwrap());
        assert!(!controller.is_teaching());
    }

    #[test]
    fn test_move_to_point_accepts_label() {
        let (controller, robot, _) = controller();
        controller
            .move_to_point("起始点：10.000、20.000、30.000、180.000、0.000、0.000")
            .unwrap();
        assert_eq!(robot.motion_count(), 1);
        // moves are blocked again afterwards
        assert!(controller.cancel_token().is_cancelled());
    }

    #[test]
    fn test_move_to_point_rejects_garbage() {
        let (controller, robot, _) = controller();
        assert!(controller.move_to_point("1, 2, 3").is_err());
        assert_eq!(robot.motion_count(), 0);
    }

    #[test]
    fn test_restore_labels() {
        let (controller, _, _) = controller();
        let text = "安全点：0、0、300、180、0、0\n\n起始点：0、0、0、180、0、0\n中间点1：50、0、0、180、0、0\n";
        assert_eq!(controller.restore_labels(text.lines()).unwrap(), 3);
        assert_eq!(controller.labels().len(), 3);

        let err = controller.restore_labels(["顶点：0、0、0、0、0、0"]).unwrap_err();
        assert!(err.is_point_error());
    }

    #[test]
    fn test_stop_sequence() {
        let (controller, robot, head) = controller();
        controller.connect_head("10.0.0.3");
        head.clear_writes();
        controller.stop();

        assert!(controller.cancel_token().is_cancelled());
        assert_eq!(robot.commands(), vec![RobotCommand::Stop, RobotCommand::Reset]);
        assert_eq!(
            head.writes(),
            vec![HeadCommand::RotationSpeed(0.0), HeadCommand::Reset]
        );
    }
}
