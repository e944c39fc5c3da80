//! # PolishKit Control
//!
//! Capture session and motion orchestration.
//!
//! The controller records taught points through the robot adapter, plans a
//! trajectory for a craft and executes it with head set-up, entry and
//! retract moves around it. A stop request is honoured at the next move
//! boundary.

pub mod cancel;
pub mod compensation;
pub mod controller;
pub mod executor;
pub mod state;

pub use cancel::CancelToken;
pub use compensation::{ToolCompensation, HEAD_UNITS_PER_MM};
pub use controller::{ControllerOptions, PolishController};
pub use executor::{MoveCounts, RobotExecutor};
pub use state::{RunReport, RunState};
