//! # PolishKit
//!
//! Trajectory planning and motion orchestration for robotic-arm polishing:
//! - Taught reference points captured through a toggle state machine
//! - Eleven path styles (arc, line, region, cylinder, zig-zag, spiral)
//! - Disc tilt and tool-length compensation
//! - Robot and polishing head driven through adapter traits
//!
//! ## Architecture
//!
//! PolishKit is organized as a workspace with multiple crates:
//!
//! 1. **polishkit-core** - Geometry kernel, craft recipes, errors
//! 2. **polishkit-toolpath** - Point set, labels, trajectory generators
//! 3. **polishkit-communication** - Robot/head adapter traits, simulated back-ends
//! 4. **polishkit-control** - Capture session and motion orchestrator
//! 5. **polishkit-settings** - Configuration files
//! 6. **polishkit** - Main binary that integrates all crates

use std::sync::Arc;

pub use polishkit_communication::{
    AdapterResult, HeadAdapter, HeadMode, HeadStatus, RobotAdapter, SimulatedHead,
    SimulatedRobot,
};
pub use polishkit_control::{
    CancelToken, ControllerOptions, PolishController, RunReport, RunState, ToolCompensation,
};
pub use polishkit_core::{
    AdapterError, Craft, CraftError, Error, GeometryError, PathStyle, PointError, PolishMode,
    Pose, Result, Surface,
};
pub use polishkit_settings::Config;
pub use polishkit_toolpath::{plan, MotionProfile, PlannedPath, PointKind, PointSet, Trajectory};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output with pretty formatting
/// - RUST_LOG environment variable support
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true)
        .with_level(true)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_line_number(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

/// Controller wired to simulated adapters at the configured addresses
pub fn simulated_controller(config: &Config) -> anyhow::Result<PolishController> {
    let robot = SimulatedRobot::new();
    let head = SimulatedHead::new();
    let controller = PolishController::new(
        Arc::new(robot),
        Some(Arc::new(head)),
        ControllerOptions::from(config),
    );

    if !controller.connect_robot(&config.robot.address) {
        anyhow::bail!("Robot at {} did not connect", config.robot.address);
    }
    if let Some(address) = &config.head.address {
        if !controller.connect_head(address) {
            tracing::warn!("Running without the polishing head");
        }
    }
    Ok(controller)
}

/// Replay `labels` into a simulated session and run the craft named `craft`
pub fn dry_run(config: &Config, labels: &str, craft: &str) -> anyhow::Result<RunReport> {
    let craft = config
        .craft(craft)
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("No craft named '{}' in the configuration", craft))?;

    let controller = simulated_controller(config)?;
    let restored = controller.restore_labels(labels.lines())?;
    tracing::info!("Restored {} points", restored);

    let (ready, missing) = controller.check_all_points(craft.way);
    if !ready {
        anyhow::bail!("{} cannot run: {}", craft.way, missing.join(", "));
    }

    Ok(controller.run(&craft, true)?)
}
