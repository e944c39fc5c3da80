//! # PolishKit Communication
//!
//! Hardware adapters for PolishKit.
//! Defines the capability sets the controller drives, one trait for the
//! robot arm and one for the polishing head, plus simulated back-ends that
//! run in-process for dry runs and tests.

pub mod head;
pub mod robot;
pub mod simulated;

pub use head::{HeadAdapter, HeadCommand, HeadMode, HeadStatus};
pub use robot::{AdapterResult, RobotAdapter, RobotCommand};
pub use simulated::{SimulatedHead, SimulatedRobot};
