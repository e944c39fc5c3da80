//! # PolishKit Core
//!
//! Core types and math for PolishKit.
//! Provides the geometry kernel, polishing recipes and the error hierarchy
//! shared by the planner, the adapters and the controller.

pub mod data;
pub mod error;
pub mod geometry;
pub mod types;

pub use data::{Craft, PathStyle, PolishMode, Surface};

pub use error::{AdapterError, CraftError, Error, GeometryError, PointError, Result};

pub use geometry::{Pose, ToolAxis};

// Re-export type aliases for convenience
pub use types::{thread_safe, ThreadSafe};
